use crate::treap::multiset::{
    TreapMultiset, TreapMultisetIntoIter, TreapMultisetIter, TreapMultisetNodes,
};
use crate::treap::tree::{self, Tree};
use crate::treap::Result;
use log::trace;
use std::fmt;
use std::iter::FromIterator;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Sub, SubAssign};

/// An ordered set implemented using a treap.
///
/// A treap is a tree that satisfies both the binary search tree property and a heap property. Each
/// node has a value and a priority. The value of any node is greater than the values in its left
/// subtree and less than the values in its right subtree. The priority of a node is less than or
/// equal to the priorities of the nodes in its subtrees. By randomly generating priorities, the
/// expected height of the tree is proportional to the logarithm of the number of values.
///
/// Inserting a value equal to one already in the set leaves the set unchanged.
///
/// # Examples
///
/// ```
/// use treap_sort::treap::TreapSet;
///
/// let mut set = TreapSet::new();
/// set.insert(0);
/// set.insert(3);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.min(), Ok(&0));
///
/// assert_eq!(set.remove(&0), Ok(0));
/// assert!(set.remove(&1).is_err());
/// ```
pub struct TreapSet<T> {
    multiset: TreapMultiset<T>,
}

impl<T> TreapSet<T>
where
    T: Ord,
{
    /// Constructs a new, empty `TreapSet<T>` whose priorities are drawn from a randomly seeded
    /// generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapSet;
    ///
    /// let set: TreapSet<u32> = TreapSet::new();
    /// ```
    pub fn new() -> Self {
        TreapSet {
            multiset: TreapMultiset::new(),
        }
    }

    /// Constructs a new, empty `TreapSet<T>` whose priorities are drawn from a generator seeded
    /// with `seed`. The seed must not be all zeros.
    pub fn with_seed(seed: [u32; 4]) -> Self {
        TreapSet {
            multiset: TreapMultiset::with_seed(seed),
        }
    }

    /// Inserts a value into the set if no equal value exists. Returns `true` if the value was
    /// inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        self.multiset.add(value)
    }

    /// Same as `insert`.
    pub fn add(&mut self, value: T) -> bool {
        self.insert(value)
    }

    /// Collapses equal values. A set never holds equal values, so this always returns `0`.
    pub fn unique(&mut self) -> usize {
        0
    }

    /// Checks if a value exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.multiset.contains(value)
    }

    /// Returns a reference to the value in the set equal to `value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the set is empty and `Error::NotFound` if no equal value exists.
    pub fn search(&self, value: &T) -> Result<&T> {
        self.multiset.search(value)
    }

    /// Removes the value equal to `value` from the set and returns it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the set is empty and `Error::NotFound` if no equal value exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::{Error, TreapSet};
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), Ok(1));
    /// assert_eq!(set.remove(&1), Err(Error::Empty));
    /// ```
    pub fn remove(&mut self, value: &T) -> Result<T> {
        self.multiset.remove(value)
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.multiset.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.multiset.is_empty()
    }

    /// Clears the set, removing all values.
    pub fn clear(&mut self) {
        self.multiset.clear();
    }

    /// Returns the height of the underlying tree.
    pub fn height(&self) -> usize {
        self.multiset.height()
    }

    /// Returns the minimum value of the set.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the set is empty.
    pub fn min(&self) -> Result<&T> {
        self.multiset.min()
    }

    /// Returns the maximum value of the set.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the set is empty.
    pub fn max(&self) -> Result<&T> {
        self.multiset.max()
    }

    /// Removes and returns the minimum value.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the set is empty.
    pub fn pop_min(&mut self) -> Result<T> {
        self.multiset.pop_min()
    }

    /// Removes and returns the maximum value.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the set is empty.
    pub fn pop_max(&mut self) -> Result<T> {
        self.multiset.pop_max()
    }

    /// Splits the set into the values less than `value` and the values greater than or equal to
    /// `value`.
    pub fn split(self, value: &T) -> (Self, Self) {
        let (left, right) = self.multiset.split(value);
        (TreapSet { multiset: left }, TreapSet { multiset: right })
    }

    /// Concatenates two sets. Every value in `self` must be less than every value in `other`.
    /// This precondition is not checked.
    pub fn join(self, other: Self) -> Self {
        TreapSet {
            multiset: self.multiset.join(other.multiset),
        }
    }

    fn combine<F>(mut self, other: Self, f: F) -> Self
    where
        F: FnOnce(Tree<T>, Tree<T>) -> Tree<T>,
    {
        self.multiset.tree = f(self.multiset.tree.take(), other.multiset.tree);
        self
    }

    /// Returns the union of two sets. The `|` operator is implemented to take the union of two
    /// sets.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapSet;
    ///
    /// let n: TreapSet<u32> = vec![1, 2].into_iter().collect();
    /// let m: TreapSet<u32> = vec![2, 3].into_iter().collect();
    /// let union = n | m;
    /// assert_eq!(union.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3]);
    /// ```
    pub fn union(self, other: Self) -> Self {
        trace!("set union of {} and {} values", self.len(), other.len());
        self.combine(other, tree::union)
    }

    /// Returns the intersection of two sets. The `&` operator is implemented to take the
    /// intersection of two sets.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapSet;
    ///
    /// let n: TreapSet<u32> = vec![1, 2].into_iter().collect();
    /// let m: TreapSet<u32> = vec![2, 3].into_iter().collect();
    /// let intersection = n & m;
    /// assert_eq!(intersection.iter().collect::<Vec<&u32>>(), vec![&2]);
    /// ```
    pub fn intersection(self, other: Self) -> Self {
        trace!("set intersection of {} and {} values", self.len(), other.len());
        self.combine(other, tree::intersection)
    }

    /// Returns the values of `self` that do not occur in `other`. The `-` operator is implemented
    /// to take the difference of two sets.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapSet;
    ///
    /// let n: TreapSet<u32> = vec![1, 2].into_iter().collect();
    /// let m: TreapSet<u32> = vec![2, 3].into_iter().collect();
    /// let difference = n - m;
    /// assert_eq!(difference.iter().collect::<Vec<&u32>>(), vec![&1]);
    /// ```
    pub fn difference(self, other: Self) -> Self {
        trace!("set difference of {} and {} values", self.len(), other.len());
        self.combine(other, tree::difference)
    }

    /// Returns the values that occur in exactly one of the two sets. The `^` operator is
    /// implemented to take the symmetric difference of two sets.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapSet;
    ///
    /// let n: TreapSet<u32> = vec![1, 2].into_iter().collect();
    /// let m: TreapSet<u32> = vec![2, 3].into_iter().collect();
    /// let symmetric_difference = n ^ m;
    /// assert_eq!(symmetric_difference.iter().collect::<Vec<&u32>>(), vec![&1, &3]);
    /// ```
    pub fn symmetric_difference(self, other: Self) -> Self {
        trace!("set symmetric difference of {} and {} values", self.len(), other.len());
        self.combine(other, tree::symmetric_difference)
    }

    /// Returns an iterator over the set. The iterator yields values in ascending order using
    /// in-order traversal and can be reversed.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(3);
    /// set.insert(1);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> TreapSetIter<'_, T> {
        TreapSetIter {
            multiset_iter: self.multiset.iter(),
        }
    }

    /// Returns an iterator over the nodes of the set using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapSet;
    ///
    /// let set: TreapSet<u32> = vec![2, 1].into_iter().collect();
    /// let values = set.nodes().map(|node| *node.value()).collect::<Vec<u32>>();
    /// assert_eq!(values, vec![1, 2]);
    /// ```
    pub fn nodes(&self) -> TreapMultisetNodes<'_, T> {
        self.multiset.nodes()
    }

    /// Returns `true` if no value occurs in both sets.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.multiset.is_disjoint(&other.multiset)
    }

    /// Returns `true` if the underlying treap is well formed and holds no two equal values.
    pub fn is_valid(&self) -> bool {
        self.multiset.is_valid() && self.multiset.distinct_len() == self.multiset.len()
    }
}

impl<T> TreapSet<T>
where
    T: Ord + Clone,
{
    /// Returns `true` if every value of `self` occurs in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        tree::difference(self.multiset.tree.clone(), other.multiset.tree.clone()).is_none()
    }

    /// Returns `true` if `self` is a subset of `other` and the sets are not equal.
    pub fn is_proper_subset(&self, other: &Self) -> bool {
        self.len() != other.len() && self.is_subset(other)
    }

    /// Returns `true` if every value of `other` occurs in `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Returns `true` if `self` is a superset of `other` and the sets are not equal.
    pub fn is_proper_superset(&self, other: &Self) -> bool {
        other.is_proper_subset(self)
    }
}

impl<T> IntoIterator for TreapSet<T>
where
    T: Ord,
{
    type Item = T;
    type IntoIter = TreapSetIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            multiset_iter: self.multiset.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a TreapSet<T>
where
    T: 'a + Ord,
{
    type Item = &'a T;
    type IntoIter = TreapSetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `TreapSet<T>`.
///
/// This iterator lazily removes values from either end of the set.
pub struct TreapSetIntoIter<T> {
    multiset_iter: TreapMultisetIntoIter<T>,
}

impl<T> Iterator for TreapSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.multiset_iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.multiset_iter.size_hint()
    }
}

impl<T> DoubleEndedIterator for TreapSetIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.multiset_iter.next_back()
    }
}

/// An iterator for `TreapSet<T>`.
///
/// This iterator traverses the values of the set in-order and yields immutable references.
pub struct TreapSetIter<'a, T> {
    multiset_iter: TreapMultisetIter<'a, T>,
}

impl<'a, T> Iterator for TreapSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.multiset_iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.multiset_iter.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for TreapSetIter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.multiset_iter.next_back()
    }
}

impl<T> Default for TreapSet<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for TreapSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = TreapSet::new();
        set.extend(iter);
        set
    }
}

impl<T> Extend<T> for TreapSet<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> Clone for TreapSet<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        TreapSet {
            multiset: self.multiset.clone(),
        }
    }
}

impl<T> fmt::Debug for TreapSet<T>
where
    T: Ord + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for TreapSet<T>
where
    T: Ord,
{
    fn eq(&self, other: &TreapSet<T>) -> bool {
        self.multiset == other.multiset
    }
}

impl<T> Eq for TreapSet<T> where T: Ord {}

macro_rules! impl_set_op {
    ($op_trait:ident, $op_fn:ident, $assign_trait:ident, $assign_fn:ident, $method:ident) => {
        impl<T> $op_trait for TreapSet<T>
        where
            T: Ord,
        {
            type Output = TreapSet<T>;

            fn $op_fn(self, other: TreapSet<T>) -> TreapSet<T> {
                self.$method(other)
            }
        }

        impl<'a, T> $op_trait<&'a TreapSet<T>> for &'a TreapSet<T>
        where
            T: Ord + Clone,
        {
            type Output = TreapSet<T>;

            fn $op_fn(self, other: &'a TreapSet<T>) -> TreapSet<T> {
                self.clone().$method(other.clone())
            }
        }

        impl<'a, T> $assign_trait<&'a TreapSet<T>> for TreapSet<T>
        where
            T: Ord + Clone,
        {
            fn $assign_fn(&mut self, other: &'a TreapSet<T>) {
                let lhs = self.multiset.tree.take();
                self.multiset.tree = tree::$method(lhs, other.multiset.tree.clone());
            }
        }
    };
}

impl_set_op!(BitOr, bitor, BitOrAssign, bitor_assign, union);
impl_set_op!(BitAnd, bitand, BitAndAssign, bitand_assign, intersection);
impl_set_op!(Sub, sub, SubAssign, sub_assign, difference);
impl_set_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, symmetric_difference);
