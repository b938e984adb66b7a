use std::cmp::Ordering;

/// A value tagged with its sort key and its position in the input.
///
/// Tags are ordered by key first and position second. Under `reverse` the position is negated so
/// that walking the tags in descending order still visits equal keys in input order.
pub struct Tagged<K, V> {
    pub key: K,
    pub index: isize,
    pub value: V,
}

impl<K, V> Tagged<K, V> {
    pub fn new(key: K, index: usize, reverse: bool, value: V) -> Self {
        let index = index as isize;
        Tagged {
            key,
            index: if reverse { -index } else { index },
            value,
        }
    }
}

impl<K, V> Ord for Tagged<K, V>
where
    K: Ord,
{
    fn cmp(&self, other: &Tagged<K, V>) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl<K, V> PartialOrd for Tagged<K, V>
where
    K: Ord,
{
    fn partial_cmp(&self, other: &Tagged<K, V>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K, V> PartialEq for Tagged<K, V>
where
    K: Ord,
{
    fn eq(&self, other: &Tagged<K, V>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K, V> Eq for Tagged<K, V> where K: Ord {}
