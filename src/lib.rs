//! Treap-backed ordered collections and the stable sorts built on them.

pub mod sort;
pub mod treap;
