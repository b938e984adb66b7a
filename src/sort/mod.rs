//! Stable sorts backed by a priority queue or a treap.
//!
//! Both sorts tag every item with its position in the input before ordering it, so items with
//! equal keys keep their relative order, including when `reverse` is set. Both return an iterator
//! that produces the sorted items lazily and can only be consumed once.
//!
//! `heap_sort` suits consumers that want the first results early or only need the first few.
//! `treap_sort` keeps a fully ordered structure at every point while the input is being consumed.

mod heap_sort;
mod tag;
mod treap_sort;

pub use self::heap_sort::{heap_sort, heap_sort_by_key, HeapSort, HeapSortByKey};
pub use self::treap_sort::{
    treap_sort, treap_sort_by_key, treap_sort_with_seed, TreapSort, TreapSortByKey,
};
