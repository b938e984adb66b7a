use crate::sort::tag::Tagged;
use crate::treap::{TreapMultiset, TreapMultisetIntoIter};
use log::debug;

fn build_treap<I, K, V, F>(
    items: I,
    mut tag: F,
    reverse: bool,
    mut multiset: TreapMultiset<Tagged<K, V>>,
) -> Drain<K, V>
where
    I: IntoIterator,
    K: Ord,
    F: FnMut(I::Item) -> (K, V),
{
    for (index, item) in items.into_iter().enumerate() {
        let (key, value) = tag(item);
        multiset.insert(Tagged::new(key, index, reverse, value));
    }
    debug!(
        "treap sort of {} items, height: {}, reverse: {}",
        multiset.len(),
        multiset.height(),
        reverse,
    );
    Drain {
        iter: multiset.into_iter(),
        reverse,
    }
}

// Drains tagged values from the front, or from the back under `reverse`.
struct Drain<K, V> {
    iter: TreapMultisetIntoIter<Tagged<K, V>>,
    reverse: bool,
}

impl<K, V> Drain<K, V> {
    fn next(&mut self) -> Option<Tagged<K, V>> {
        if self.reverse {
            self.iter.next_back()
        } else {
            self.iter.next()
        }
    }

    fn len(&self) -> usize {
        self.iter.len()
    }
}

/// Sorts values by inserting them one at a time into a treap with independently random priorities
/// and then traversing it in-order. Building the treap takes expected `O(N log N)` time; it can
/// proceed while the input is still being produced.
///
/// The sort is stable: equal values are yielded in input order, whether or not `reverse` is set.
///
/// # Examples
///
/// ```
/// use treap_sort::sort::treap_sort;
///
/// let sorted = treap_sort(vec![1, 7, 8, 0, 4, 6, 2, 3, 5], false).collect::<Vec<u32>>();
/// assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
/// ```
pub fn treap_sort<I>(items: I, reverse: bool) -> TreapSort<I::Item>
where
    I: IntoIterator,
    I::Item: Ord,
{
    TreapSort {
        drain: build_treap(items, |item| (item, ()), reverse, TreapMultiset::new()),
    }
}

/// Same as `treap_sort`, drawing priorities from a generator seeded with `seed`. The seed must
/// not be all zeros.
pub fn treap_sort_with_seed<I>(items: I, reverse: bool, seed: [u32; 4]) -> TreapSort<I::Item>
where
    I: IntoIterator,
    I::Item: Ord,
{
    TreapSort {
        drain: build_treap(
            items,
            |item| (item, ()),
            reverse,
            TreapMultiset::with_seed(seed),
        ),
    }
}

/// Sorts items by the key extracted with `key` using a treap. See `treap_sort`.
///
/// # Examples
///
/// ```
/// use treap_sort::sort::treap_sort_by_key;
///
/// let items = vec![(1, "a"), (1, "b"), (0, "c")];
/// let sorted = treap_sort_by_key(items, |item| item.0, true).collect::<Vec<_>>();
/// assert_eq!(sorted, vec![(1, "a"), (1, "b"), (0, "c")]);
/// ```
pub fn treap_sort_by_key<I, K, F>(items: I, mut key: F, reverse: bool) -> TreapSortByKey<I::Item, K>
where
    I: IntoIterator,
    K: Ord,
    F: FnMut(&I::Item) -> K,
{
    TreapSortByKey {
        drain: build_treap(
            items,
            |item| (key(&item), item),
            reverse,
            TreapMultiset::new(),
        ),
    }
}

/// An iterator yielding the values passed to `treap_sort` in sorted order.
pub struct TreapSort<T> {
    drain: Drain<T, ()>,
}

impl<T> Iterator for TreapSort<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.drain.next().map(|tagged| tagged.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.drain.len(), Some(self.drain.len()))
    }
}

impl<T> ExactSizeIterator for TreapSort<T> {}

/// An iterator yielding the items passed to `treap_sort_by_key` in sorted order.
pub struct TreapSortByKey<T, K> {
    drain: Drain<K, T>,
}

impl<T, K> Iterator for TreapSortByKey<T, K> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.drain.next().map(|tagged| tagged.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.drain.len(), Some(self.drain.len()))
    }
}

impl<T, K> ExactSizeIterator for TreapSortByKey<T, K> {}
