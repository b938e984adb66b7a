use crate::treap::node::{Node, NodeId};
use crate::treap::tree::{self, Tree};
use crate::treap::{Error, Result};
use log::trace;
use rand::{Rng, SeedableRng, XorShiftRng};
use std::fmt;
use std::iter::FromIterator;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Sub,
    SubAssign,
};

// Seeds a new generator from `rng`. The first word is odd because an all-zero seed is rejected.
fn fork(rng: &mut XorShiftRng) -> XorShiftRng {
    let seed = [rng.next_u32() | 1, rng.next_u32(), rng.next_u32(), rng.next_u32()];
    XorShiftRng::from_seed(seed)
}

/// An ordered multiset implemented using a treap.
///
/// A treap is a tree that satisfies both the binary search tree property and a heap property. Each
/// node has a value and a priority. The value of any node is not less than the values in its left
/// subtree and not greater than the values in its right subtree. The priority of a node is less
/// than or equal to the priorities of the nodes in its subtrees. By randomly generating priorities,
/// the expected height of the tree is proportional to the logarithm of the number of values.
///
/// Equal values are kept in the order they were inserted in. The set operations (`|`, `&`, `-`,
/// `^`) first collapse equal values so that they act on the distinct values of each operand,
/// while `+` keeps every value of both operands. The operators consume owned operands and reuse
/// their nodes; applied to references they copy both operands first.
///
/// # Examples
///
/// ```
/// use treap_sort::treap::TreapMultiset;
///
/// let mut multiset = TreapMultiset::new();
/// multiset.insert(3);
/// multiset.insert(1);
/// multiset.insert(3);
///
/// assert_eq!(multiset.len(), 3);
/// assert_eq!(multiset.count(&3), 2);
/// assert_eq!(multiset.min(), Ok(&1));
///
/// assert_eq!(multiset.remove(&3), Ok(3));
/// assert_eq!(multiset.iter().collect::<Vec<&u32>>(), vec![&1, &3]);
/// ```
pub struct TreapMultiset<T> {
    pub(crate) tree: Tree<T>,
    pub(crate) rng: XorShiftRng,
}

impl<T> TreapMultiset<T>
where
    T: Ord,
{
    /// Constructs a new, empty `TreapMultiset<T>` whose priorities are drawn from a randomly
    /// seeded generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let multiset: TreapMultiset<u32> = TreapMultiset::new();
    /// ```
    pub fn new() -> Self {
        TreapMultiset {
            tree: None,
            rng: rand::weak_rng(),
        }
    }

    /// Constructs a new, empty `TreapMultiset<T>` whose priorities are drawn from a generator
    /// seeded with `seed`. The seed must not be all zeros.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let multiset: TreapMultiset<u32> = TreapMultiset::with_seed([1, 2, 3, 4]);
    /// ```
    pub fn with_seed(seed: [u32; 4]) -> Self {
        TreapMultiset {
            tree: None,
            rng: XorShiftRng::from_seed(seed),
        }
    }

    fn new_node(&mut self, value: T) -> Node<T> {
        Node::new(value, self.rng.gen::<f64>())
    }

    fn fork_rng(&mut self) -> XorShiftRng {
        fork(&mut self.rng)
    }

    /// Inserts a value into the multiset. The value is placed after every value equal to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let mut multiset = TreapMultiset::new();
    /// multiset.insert(1);
    /// multiset.insert(1);
    /// assert_eq!(multiset.len(), 2);
    /// ```
    pub fn insert(&mut self, value: T) {
        let new_node = self.new_node(value);
        tree::insert(&mut self.tree, new_node);
    }

    /// Inserts a value into the multiset only if no equal value exists. Returns `true` if the
    /// value was inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let mut multiset = TreapMultiset::new();
    /// assert!(multiset.add(1));
    /// assert!(!multiset.add(1));
    /// assert_eq!(multiset.len(), 1);
    /// ```
    pub fn add(&mut self, value: T) -> bool {
        let new_node = self.new_node(value);
        tree::add(&mut self.tree, new_node)
    }

    /// Checks if a value exists in the multiset.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let mut multiset = TreapMultiset::new();
    /// multiset.insert(1);
    /// assert!(!multiset.contains(&0));
    /// assert!(multiset.contains(&1));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        tree::contains(&self.tree, value)
    }

    /// Returns a reference to a value in the multiset equal to `value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the multiset is empty and `Error::NotFound` if no equal value
    /// exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::{Error, TreapMultiset};
    ///
    /// let mut multiset = TreapMultiset::new();
    /// assert_eq!(multiset.search(&1), Err(Error::Empty));
    /// multiset.insert(1);
    /// assert_eq!(multiset.search(&1), Ok(&1));
    /// assert_eq!(multiset.search(&2), Err(Error::NotFound));
    /// ```
    pub fn search(&self, value: &T) -> Result<&T> {
        self.search_node(value).map(|node| &node.value)
    }

    /// Returns the node of the first value equal to `value` on the search path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the multiset is empty and `Error::NotFound` if no equal value
    /// exists.
    pub fn search_node(&self, value: &T) -> Result<&Node<T>> {
        if self.tree.is_none() {
            return Err(Error::Empty);
        }
        tree::search(&self.tree, value)
    }

    /// Returns the number of values in the multiset equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let multiset: TreapMultiset<u32> = vec![2, 1, 2].into_iter().collect();
    /// assert_eq!(multiset.count(&2), 2);
    /// assert_eq!(multiset.count(&3), 0);
    /// ```
    pub fn count(&self, value: &T) -> usize {
        tree::count(&self.tree, value)
    }

    /// Removes a value equal to `value` from the multiset and returns it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the multiset is empty and `Error::NotFound` if no equal value
    /// exists. The multiset is unchanged on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::{Error, TreapMultiset};
    ///
    /// let mut multiset = TreapMultiset::new();
    /// multiset.insert(1);
    /// assert_eq!(multiset.remove(&2), Err(Error::NotFound));
    /// assert_eq!(multiset.remove(&1), Ok(1));
    /// assert_eq!(multiset.remove(&1), Err(Error::Empty));
    /// ```
    pub fn remove(&mut self, value: &T) -> Result<T> {
        if self.tree.is_none() {
            return Err(Error::Empty);
        }
        tree::remove(&mut self.tree, value)
    }

    /// Removes the node with identity `id`, located by comparing against `value`, and returns its
    /// value. Useful to remove one particular value among several equal ones.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the multiset is empty and `Error::NotFound` if no node with
    /// identity `id` holds a value equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let mut multiset = TreapMultiset::new();
    /// multiset.insert((1, 'a'));
    /// multiset.insert((2, 'b'));
    /// let id = multiset.nodes().next().map(|node| node.id()).unwrap();
    /// assert_eq!(multiset.remove_node(&(1, 'a'), id), Ok((1, 'a')));
    /// assert_eq!(multiset.len(), 1);
    /// ```
    pub fn remove_node(&mut self, value: &T, id: NodeId) -> Result<T> {
        if self.tree.is_none() {
            return Err(Error::Empty);
        }
        tree::remove_node(&mut self.tree, value, id)
    }

    /// Removes every value equal to `value`. Returns the number of removed values.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let mut multiset: TreapMultiset<u32> = vec![3, 1, 3, 3].into_iter().collect();
    /// assert_eq!(multiset.remove_all(&3), 3);
    /// assert_eq!(multiset.iter().collect::<Vec<&u32>>(), vec![&1]);
    /// ```
    pub fn remove_all(&mut self, value: &T) -> usize {
        tree::remove_all(&mut self.tree, value)
    }

    /// Removes every value equal to `value` except the earliest inserted one. Returns the number
    /// of removed values.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let mut multiset: TreapMultiset<u32> = vec![5, 3, 3, 7].into_iter().collect();
    /// assert_eq!(multiset.remove_all_except(&3), 1);
    /// assert_eq!(multiset.iter().collect::<Vec<&u32>>(), vec![&3, &5, &7]);
    /// ```
    pub fn remove_all_except(&mut self, value: &T) -> usize {
        tree::remove_all_except(&mut self.tree, value)
    }

    /// Removes values so that no two values in the multiset are equal, keeping the earliest
    /// inserted of each group of equal values. Returns the number of removed values.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let mut multiset: TreapMultiset<u32> = vec![2, 1, 2, 1].into_iter().collect();
    /// assert_eq!(multiset.unique(), 2);
    /// assert_eq!(multiset.iter().collect::<Vec<&u32>>(), vec![&1, &2]);
    /// ```
    pub fn unique(&mut self) -> usize {
        tree::unique(&mut self.tree)
    }

    /// Returns the number of values in the multiset.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let mut multiset = TreapMultiset::new();
    /// multiset.insert(1);
    /// assert_eq!(multiset.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        tree::len(&self.tree)
    }

    /// Returns `true` if the multiset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let multiset: TreapMultiset<u32> = TreapMultiset::new();
    /// assert!(multiset.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }

    /// Clears the multiset, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let mut multiset = TreapMultiset::new();
    /// multiset.insert(1);
    /// multiset.clear();
    /// assert!(multiset.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.tree = None;
    }

    /// Returns the height of the underlying tree.
    pub fn height(&self) -> usize {
        tree::height(&self.tree)
    }

    /// Returns the minimum value of the multiset.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the multiset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::{Error, TreapMultiset};
    ///
    /// let mut multiset = TreapMultiset::new();
    /// assert_eq!(multiset.min(), Err(Error::Empty));
    /// multiset.insert(3);
    /// multiset.insert(1);
    /// assert_eq!(multiset.min(), Ok(&1));
    /// ```
    pub fn min(&self) -> Result<&T> {
        tree::min(&self.tree).ok_or(Error::Empty)
    }

    /// Returns the maximum value of the multiset.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the multiset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::{Error, TreapMultiset};
    ///
    /// let mut multiset = TreapMultiset::new();
    /// assert_eq!(multiset.max(), Err(Error::Empty));
    /// multiset.insert(3);
    /// multiset.insert(1);
    /// assert_eq!(multiset.max(), Ok(&3));
    /// ```
    pub fn max(&self) -> Result<&T> {
        tree::max(&self.tree).ok_or(Error::Empty)
    }

    /// Removes and returns the minimum value. Among equal values the earliest inserted one is
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the multiset is empty.
    pub fn pop_min(&mut self) -> Result<T> {
        tree::remove_min(&mut self.tree)
            .map(|node| node.value)
            .ok_or(Error::Empty)
    }

    /// Removes and returns the maximum value. Among equal values the latest inserted one is
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the multiset is empty.
    pub fn pop_max(&mut self) -> Result<T> {
        tree::remove_max(&mut self.tree)
            .map(|node| node.value)
            .ok_or(Error::Empty)
    }

    /// Splits the multiset into the values less than `value` and the values greater than or
    /// equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let multiset: TreapMultiset<u32> = vec![1, 2, 3, 4, 5].into_iter().collect();
    /// let (left, right) = multiset.split(&3);
    /// assert_eq!(left.iter().collect::<Vec<&u32>>(), vec![&1, &2]);
    /// assert_eq!(right.iter().collect::<Vec<&u32>>(), vec![&3, &4, &5]);
    /// ```
    pub fn split(mut self, value: &T) -> (Self, Self) {
        let rng = self.fork_rng();
        let (left, right) = tree::split(self.tree.take(), value, false);
        (
            TreapMultiset {
                tree: left,
                rng: self.rng,
            },
            TreapMultiset { tree: right, rng },
        )
    }

    /// Concatenates two multisets. Every value in `self` must be less than or equal to every
    /// value in `other`. This precondition is not checked; violating it leaves the multiset with
    /// an invalid order.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let left: TreapMultiset<u32> = vec![1, 2].into_iter().collect();
    /// let right: TreapMultiset<u32> = vec![3, 4].into_iter().collect();
    /// let joined = left.join(right);
    /// assert_eq!(joined.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3, &4]);
    /// ```
    pub fn join(mut self, other: Self) -> Self {
        self.tree = tree::merge(self.tree.take(), other.tree);
        self
    }

    fn combine<F>(&mut self, mut other: Tree<T>, f: F)
    where
        F: FnOnce(Tree<T>, Tree<T>) -> Tree<T>,
    {
        tree::unique(&mut self.tree);
        tree::unique(&mut other);
        self.tree = f(self.tree.take(), other);
    }

    /// Returns the union of two multisets. Both operands are consumed and every value occurs
    /// once in the result. The `|` operator is implemented to take the union of two multisets.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let n: TreapMultiset<u32> = vec![1, 2, 2].into_iter().collect();
    /// let m: TreapMultiset<u32> = vec![2, 3].into_iter().collect();
    /// let union = n.union(m);
    /// assert_eq!(union.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3]);
    /// ```
    pub fn union(mut self, other: Self) -> Self {
        trace!("union of {} and {} values", self.len(), other.len());
        self.combine(other.tree, tree::union);
        self
    }

    /// Returns the intersection of two multisets. Both operands are consumed and every value
    /// occurs once in the result. The `&` operator is implemented to take the intersection of two
    /// multisets.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let n: TreapMultiset<u32> = vec![1, 2, 2].into_iter().collect();
    /// let m: TreapMultiset<u32> = vec![2, 3].into_iter().collect();
    /// let intersection = n.intersection(m);
    /// assert_eq!(intersection.iter().collect::<Vec<&u32>>(), vec![&2]);
    /// ```
    pub fn intersection(mut self, other: Self) -> Self {
        trace!("intersection of {} and {} values", self.len(), other.len());
        self.combine(other.tree, tree::intersection);
        self
    }

    /// Returns the values of `self` that do not occur in `other`. Both operands are consumed and
    /// every value occurs once in the result. The `-` operator is implemented to take the
    /// difference of two multisets.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let n: TreapMultiset<u32> = vec![1, 1, 2].into_iter().collect();
    /// let m: TreapMultiset<u32> = vec![2, 3].into_iter().collect();
    /// let difference = n.difference(m);
    /// assert_eq!(difference.iter().collect::<Vec<&u32>>(), vec![&1]);
    /// ```
    pub fn difference(mut self, other: Self) -> Self {
        trace!("difference of {} and {} values", self.len(), other.len());
        self.combine(other.tree, tree::difference);
        self
    }

    /// Returns the values that occur in exactly one of the two multisets. Both operands are
    /// consumed and every value occurs once in the result. The `^` operator is implemented to take
    /// the symmetric difference of two multisets.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let n: TreapMultiset<u32> = vec![1, 2].into_iter().collect();
    /// let m: TreapMultiset<u32> = vec![2, 3, 3].into_iter().collect();
    /// let symmetric_difference = n.symmetric_difference(m);
    /// assert_eq!(symmetric_difference.iter().collect::<Vec<&u32>>(), vec![&1, &3]);
    /// ```
    pub fn symmetric_difference(mut self, other: Self) -> Self {
        trace!("symmetric difference of {} and {} values", self.len(), other.len());
        self.combine(other.tree, tree::symmetric_difference);
        self
    }

    /// Returns every value of both multisets, keeping duplicates. Values of `self` precede equal
    /// values of `other`. The `+` operator is implemented to take the sum of two multisets.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let n: TreapMultiset<u32> = vec![1, 2].into_iter().collect();
    /// let m: TreapMultiset<u32> = vec![2, 3].into_iter().collect();
    /// let sum = n.sum(m);
    /// assert_eq!(sum.iter().collect::<Vec<&u32>>(), vec![&1, &2, &2, &3]);
    /// ```
    pub fn sum(mut self, other: Self) -> Self {
        trace!("sum of {} and {} values", self.len(), other.len());
        self.tree = tree::sum(self.tree.take(), other.tree);
        self
    }

    /// Returns the number of distinct values in the multiset.
    pub fn distinct_len(&self) -> usize {
        let mut iter = self.iter();
        let mut prev = match iter.next() {
            Some(value) => value,
            None => return 0,
        };
        let mut len = 1;
        for value in iter {
            if value != prev {
                len += 1;
                prev = value;
            }
        }
        len
    }

    /// Returns an iterator over the multiset. The iterator yields values in ascending order using
    /// in-order traversal and can be reversed.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let multiset: TreapMultiset<u32> = vec![3, 1, 2].into_iter().collect();
    ///
    /// let mut iterator = multiset.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next_back(), Some(&3));
    /// assert_eq!(iterator.next(), Some(&2));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> TreapMultisetIter<'_, T> {
        TreapMultisetIter {
            nodes: self.nodes(),
        }
    }

    /// Returns an iterator over the nodes of the multiset using in-order traversal.
    pub fn nodes(&self) -> TreapMultisetNodes<'_, T> {
        TreapMultisetNodes::new(&self.tree)
    }

    /// Returns `true` if every node respects the search order and the heap order of its subtree
    /// and caches the correct subtree size.
    pub fn is_valid(&self) -> bool {
        tree::is_valid(&self.tree)
    }

    /// Returns `true` if no value occurs in both multisets.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let n: TreapMultiset<u32> = vec![1, 2].into_iter().collect();
    /// let m: TreapMultiset<u32> = vec![3, 4].into_iter().collect();
    /// assert!(n.is_disjoint(&m));
    /// assert!(n.is_disjoint(&TreapMultiset::new()));
    /// ```
    pub fn is_disjoint(&self, other: &Self) -> bool {
        tree::is_disjoint(&self.tree, &other.tree)
    }
}

impl<T> TreapMultiset<T>
where
    T: Ord + Clone,
{
    /// Returns `true` if every value of `self` occurs in `other`. Duplicate values are ignored on
    /// both sides.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_sort::treap::TreapMultiset;
    ///
    /// let n: TreapMultiset<u32> = vec![1, 1, 2].into_iter().collect();
    /// let m: TreapMultiset<u32> = vec![1, 2, 3].into_iter().collect();
    /// assert!(n.is_subset(&m));
    /// assert!(!m.is_subset(&n));
    /// ```
    pub fn is_subset(&self, other: &Self) -> bool {
        let mut left = self.tree.clone();
        let mut right = other.tree.clone();
        tree::unique(&mut left);
        tree::unique(&mut right);
        tree::difference(left, right).is_none()
    }

    /// Returns `true` if `self` is a subset of `other` and `other` has more distinct values.
    pub fn is_proper_subset(&self, other: &Self) -> bool {
        self.is_subset(other) && self.distinct_len() != other.distinct_len()
    }

    /// Returns `true` if every value of `other` occurs in `self`. Duplicate values are ignored on
    /// both sides.
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Returns `true` if `self` is a superset of `other` and `self` has more distinct values.
    pub fn is_proper_superset(&self, other: &Self) -> bool {
        other.is_proper_subset(self)
    }
}

impl<T> IntoIterator for TreapMultiset<T>
where
    T: Ord,
{
    type Item = T;
    type IntoIter = TreapMultisetIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter { tree: self.tree }
    }
}

impl<'a, T> IntoIterator for &'a TreapMultiset<T>
where
    T: 'a + Ord,
{
    type Item = &'a T;
    type IntoIter = TreapMultisetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `TreapMultiset<T>`.
///
/// This iterator lazily removes values from either end of the multiset, yielding them in
/// ascending order from the front and in descending order from the back.
pub struct TreapMultisetIntoIter<T> {
    tree: Tree<T>,
}

impl<T> Iterator for TreapMultisetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        tree::remove_min(&mut self.tree).map(|node| node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = tree::len(&self.tree);
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for TreapMultisetIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        tree::remove_max(&mut self.tree).map(|node| node.value)
    }
}

impl<T> ExactSizeIterator for TreapMultisetIntoIter<T> {}

/// An iterator over the nodes of a `TreapMultiset<T>`.
///
/// This iterator traverses the nodes in-order from the front and in reverse order from the back.
pub struct TreapMultisetNodes<'a, T> {
    front: Vec<&'a Node<T>>,
    back: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> TreapMultisetNodes<'a, T> {
    fn new(tree: &'a Tree<T>) -> Self {
        let mut nodes = TreapMultisetNodes {
            front: Vec::new(),
            back: Vec::new(),
            remaining: tree::len(tree),
        };
        nodes.push_left_spine(tree);
        nodes.push_right_spine(tree);
        nodes
    }

    fn push_left_spine(&mut self, mut tree: &'a Tree<T>) {
        while let Some(ref node) = tree {
            self.front.push(&**node);
            tree = &node.left;
        }
    }

    fn push_right_spine(&mut self, mut tree: &'a Tree<T>) {
        while let Some(ref node) = tree {
            self.back.push(&**node);
            tree = &node.right;
        }
    }
}

impl<'a, T> Iterator for TreapMultisetNodes<'a, T>
where
    T: 'a,
{
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.front.pop().map(|node| {
            self.remaining -= 1;
            self.push_left_spine(&node.right);
            node
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for TreapMultisetNodes<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.back.pop().map(|node| {
            self.remaining -= 1;
            self.push_right_spine(&node.left);
            node
        })
    }
}

impl<'a, T> ExactSizeIterator for TreapMultisetNodes<'a, T> where T: 'a {}

/// An iterator for `TreapMultiset<T>`.
///
/// This iterator traverses the values of the multiset in-order and yields immutable references.
pub struct TreapMultisetIter<'a, T> {
    nodes: TreapMultisetNodes<'a, T>,
}

impl<'a, T> Iterator for TreapMultisetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.nodes.next().map(|node| &node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for TreapMultisetIter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.nodes.next_back().map(|node| &node.value)
    }
}

impl<'a, T> ExactSizeIterator for TreapMultisetIter<'a, T> where T: 'a {}

impl<T> Default for TreapMultiset<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for TreapMultiset<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut multiset = TreapMultiset::new();
        multiset.extend(iter);
        multiset
    }
}

impl<T> Extend<T> for TreapMultiset<T>
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

impl<T> Clone for TreapMultiset<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        TreapMultiset {
            tree: self.tree.clone(),
            rng: fork(&mut self.rng.clone()),
        }
    }
}

impl<T> fmt::Debug for TreapMultiset<T>
where
    T: Ord + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for TreapMultiset<T>
where
    T: Ord,
{
    fn eq(&self, other: &TreapMultiset<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T> Eq for TreapMultiset<T> where T: Ord {}

macro_rules! impl_multiset_op {
    ($op_trait:ident, $op_fn:ident, $assign_trait:ident, $assign_fn:ident, $method:ident) => {
        impl<T> $op_trait for TreapMultiset<T>
        where
            T: Ord,
        {
            type Output = TreapMultiset<T>;

            fn $op_fn(self, other: TreapMultiset<T>) -> TreapMultiset<T> {
                self.$method(other)
            }
        }

        impl<'a, T> $op_trait<&'a TreapMultiset<T>> for &'a TreapMultiset<T>
        where
            T: Ord + Clone,
        {
            type Output = TreapMultiset<T>;

            fn $op_fn(self, other: &'a TreapMultiset<T>) -> TreapMultiset<T> {
                self.clone().$method(other.clone())
            }
        }

        impl<'a, T> $assign_trait<&'a TreapMultiset<T>> for TreapMultiset<T>
        where
            T: Ord + Clone,
        {
            fn $assign_fn(&mut self, other: &'a TreapMultiset<T>) {
                let rng = self.fork_rng();
                let lhs = TreapMultiset {
                    tree: self.tree.take(),
                    rng,
                };
                self.tree = lhs.$method(other.clone()).tree;
            }
        }
    };
}

impl_multiset_op!(BitOr, bitor, BitOrAssign, bitor_assign, union);
impl_multiset_op!(BitAnd, bitand, BitAndAssign, bitand_assign, intersection);
impl_multiset_op!(Sub, sub, SubAssign, sub_assign, difference);
impl_multiset_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, symmetric_difference);
impl_multiset_op!(Add, add, AddAssign, add_assign, sum);

#[cfg(test)]
mod tests {
    use super::TreapMultiset;
    use crate::treap::tree;
    use crate::treap::Error;

    fn from_slice(values: &[u32]) -> TreapMultiset<u32> {
        let mut multiset = TreapMultiset::with_seed([1, 1, 1, 1]);
        multiset.extend(values.iter().cloned());
        multiset
    }

    fn to_vec(multiset: &TreapMultiset<u32>) -> Vec<u32> {
        multiset.iter().cloned().collect()
    }

    #[test]
    fn test_len_empty() {
        let multiset: TreapMultiset<u32> = TreapMultiset::new();
        assert_eq!(multiset.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let multiset: TreapMultiset<u32> = TreapMultiset::new();
        assert!(multiset.is_empty());
    }

    #[test]
    fn test_empty_errors() {
        let mut multiset: TreapMultiset<u32> = TreapMultiset::new();
        assert_eq!(multiset.search(&1), Err(Error::Empty));
        assert_eq!(multiset.remove(&1), Err(Error::Empty));
        assert_eq!(multiset.min(), Err(Error::Empty));
        assert_eq!(multiset.max(), Err(Error::Empty));
        assert_eq!(multiset.pop_min(), Err(Error::Empty));
        assert_eq!(multiset.pop_max(), Err(Error::Empty));
    }

    #[test]
    fn test_search_not_found_leaves_multiset_unchanged() {
        let multiset = from_slice(&[4, 2, 6]);
        assert_eq!(multiset.search(&5), Err(Error::NotFound));
        assert_eq!(to_vec(&multiset), vec![2, 4, 6]);
        assert!(tree::is_valid(&multiset.tree));
    }

    #[test]
    fn test_insert_duplicates() {
        let multiset = from_slice(&[2, 1, 2, 2]);
        assert_eq!(multiset.len(), 4);
        assert_eq!(multiset.count(&2), 3);
        assert_eq!(to_vec(&multiset), vec![1, 2, 2, 2]);
    }

    #[test]
    fn test_insert_stable() {
        let mut multiset = TreapMultiset::with_seed([1, 1, 1, 1]);
        let values = vec![(1, 'a'), (0, 'b'), (1, 'c'), (1, 'd'), (0, 'e')];
        for value in values {
            multiset.insert(Key(value));
        }
        assert_eq!(
            multiset.iter().map(|key| (key.0).1).collect::<String>(),
            "beacd",
        );
    }

    #[derive(Clone, Debug)]
    struct Key((u32, char));

    impl PartialEq for Key {
        fn eq(&self, other: &Key) -> bool {
            (self.0).0 == (other.0).0
        }
    }

    impl Eq for Key {}

    impl PartialOrd for Key {
        fn partial_cmp(&self, other: &Key) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Key {
        fn cmp(&self, other: &Key) -> std::cmp::Ordering {
            (self.0).0.cmp(&(other.0).0)
        }
    }

    #[test]
    fn test_remove_all_except() {
        let mut multiset = from_slice(&[5, 3, 3, 7]);
        assert_eq!(multiset.remove_all_except(&3), 1);
        assert_eq!(to_vec(&multiset), vec![3, 5, 7]);
        assert_eq!(multiset.remove_all_except(&4), 0);
    }

    #[test]
    fn test_remove_node_picks_identity() {
        let mut multiset = TreapMultiset::with_seed([1, 1, 1, 1]);
        for &value in &[(1, 'a'), (1, 'b'), (1, 'c')] {
            multiset.insert(Key(value));
        }
        let id = multiset.nodes().nth(1).map(|node| node.id()).unwrap();
        let removed = multiset.remove_node(&Key((1, 'x')), id).unwrap();
        assert_eq!((removed.0).1, 'b');
        assert_eq!(
            multiset.iter().map(|key| (key.0).1).collect::<String>(),
            "ac",
        );
    }

    #[test]
    fn test_min_max_pop() {
        let mut multiset = from_slice(&[3, 1, 4, 1, 5]);
        assert_eq!(multiset.min(), Ok(&1));
        assert_eq!(multiset.max(), Ok(&5));
        assert_eq!(multiset.pop_min(), Ok(1));
        assert_eq!(multiset.pop_max(), Ok(5));
        assert_eq!(to_vec(&multiset), vec![1, 3, 4]);
    }

    #[test]
    fn test_iter_both_ends() {
        let multiset = from_slice(&[1, 2, 3, 4, 5, 6]);
        let mut iter = multiset.iter();
        assert_eq!(iter.len(), 6);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&6));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.collect::<Vec<&u32>>(), vec![&3, &4]);
        assert_eq!(
            multiset.iter().rev().cloned().collect::<Vec<u32>>(),
            vec![6, 5, 4, 3, 2, 1],
        );
    }

    #[test]
    fn test_into_iter_both_ends() {
        let multiset = from_slice(&[3, 1, 2]);
        let mut iter = multiset.into_iter();
        assert_eq!(iter.next_back(), Some(3));
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next(), Some(2));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let multiset = from_slice(&[1, 2, 3]);
        let mut copy = multiset.clone();
        assert_eq!(copy, multiset);
        copy.insert(4);
        copy.remove(&1).unwrap();
        assert_eq!(to_vec(&multiset), vec![1, 2, 3]);
        assert_eq!(to_vec(&copy), vec![2, 3, 4]);
        let ids = multiset.nodes().map(|node| node.id()).collect::<Vec<_>>();
        assert!(copy.nodes().all(|node| !ids.contains(&node.id())));
    }

    #[test]
    fn test_split_join() {
        let multiset = from_slice(&[1, 2, 3, 4, 5]);
        let (left, right) = multiset.split(&3);
        assert_eq!(to_vec(&left), vec![1, 2]);
        assert_eq!(to_vec(&right), vec![3, 4, 5]);
        let joined = left.join(right);
        assert!(tree::is_valid(&joined.tree));
        assert_eq!(to_vec(&joined), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_union() {
        let union = from_slice(&[1, 2, 2]) | from_slice(&[2, 3]);
        assert!(tree::is_valid(&union.tree));
        assert_eq!(to_vec(&union), vec![1, 2, 3]);
    }

    #[test]
    fn test_intersection() {
        let intersection = from_slice(&[1, 2, 2, 4]) & from_slice(&[2, 3, 4, 4]);
        assert!(tree::is_valid(&intersection.tree));
        assert_eq!(to_vec(&intersection), vec![2, 4]);
    }

    #[test]
    fn test_difference() {
        let difference = from_slice(&[1, 1, 2, 4]) - from_slice(&[2, 3]);
        assert!(tree::is_valid(&difference.tree));
        assert_eq!(to_vec(&difference), vec![1, 4]);
    }

    #[test]
    fn test_symmetric_difference() {
        let symmetric_difference = from_slice(&[1, 2, 2]) ^ from_slice(&[2, 3, 3]);
        assert!(tree::is_valid(&symmetric_difference.tree));
        assert_eq!(to_vec(&symmetric_difference), vec![1, 3]);
    }

    #[test]
    fn test_sum() {
        let sum = from_slice(&[1, 2]) + from_slice(&[2, 2, 3]);
        assert!(tree::is_valid(&sum.tree));
        assert_eq!(to_vec(&sum), vec![1, 2, 2, 2, 3]);
    }

    #[test]
    fn test_reference_operators_are_non_destructive() {
        let n = from_slice(&[1, 2, 2]);
        let m = from_slice(&[2, 3]);
        assert_eq!(to_vec(&(&n | &m)), vec![1, 2, 3]);
        assert_eq!(to_vec(&(&n + &m)), vec![1, 2, 2, 2, 3]);
        assert_eq!(to_vec(&n), vec![1, 2, 2]);
        assert_eq!(to_vec(&m), vec![2, 3]);
    }

    #[test]
    fn test_assign_operators() {
        let other = from_slice(&[2, 3]);

        let mut multiset = from_slice(&[1, 2]);
        multiset |= &other;
        assert_eq!(to_vec(&multiset), vec![1, 2, 3]);

        let mut multiset = from_slice(&[1, 2]);
        multiset &= &other;
        assert_eq!(to_vec(&multiset), vec![2]);

        let mut multiset = from_slice(&[1, 2]);
        multiset -= &other;
        assert_eq!(to_vec(&multiset), vec![1]);

        let mut multiset = from_slice(&[1, 2]);
        multiset ^= &other;
        assert_eq!(to_vec(&multiset), vec![1, 3]);

        let mut multiset = from_slice(&[1, 2]);
        multiset += &other;
        assert_eq!(to_vec(&multiset), vec![1, 2, 2, 3]);

        assert_eq!(to_vec(&other), vec![2, 3]);
    }

    #[test]
    fn test_idempotence() {
        let n = from_slice(&[3, 1, 3, 2]);
        assert_eq!(to_vec(&(&n | &n)), vec![1, 2, 3]);
        assert_eq!(to_vec(&(&n & &n)), vec![1, 2, 3]);
        assert!((&n ^ &n).is_empty());
        assert!((&n - &n).is_empty());
    }

    #[test]
    fn test_empty_operands() {
        let n = from_slice(&[1, 2]);
        let empty = TreapMultiset::new();
        assert_eq!(&n | &empty, n);
        assert!((&empty & &n).is_empty());
        assert_eq!(&n - &empty, n);
        assert!(n.is_disjoint(&empty));
        assert!(empty.is_disjoint(&empty));
    }

    #[test]
    fn test_subset_family() {
        let n = from_slice(&[1, 2]);
        let m = from_slice(&[1, 2, 3]);
        assert!(n.is_subset(&m));
        assert!(n.is_proper_subset(&m));
        assert!(m.is_superset(&n));
        assert!(m.is_proper_superset(&n));
        assert!(!m.is_subset(&n));
        assert!(n.is_subset(&n));
        assert!(!n.is_proper_subset(&n));
    }

    // Subset tests compare distinct values only, so a multiset with extra copies of the same
    // values is a subset but not a proper subset, while still comparing unequal.
    #[test]
    fn test_subset_ignores_multiplicity() {
        let n = from_slice(&[1, 1, 2]);
        let m = from_slice(&[1, 2]);
        assert_ne!(n, m);
        assert!(n.is_subset(&m));
        assert!(m.is_subset(&n));
        assert!(!n.is_proper_subset(&m));
        assert!(!n.is_proper_superset(&m));
    }

    #[test]
    fn test_is_disjoint() {
        let n = from_slice(&[1, 3, 5]);
        assert!(n.is_disjoint(&from_slice(&[2, 4, 6])));
        assert!(!n.is_disjoint(&from_slice(&[2, 5])));
    }

    thread_local! {
        static CLONES: std::cell::Cell<usize> = std::cell::Cell::new(0);
    }

    #[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
    struct Counted(u32);

    impl Clone for Counted {
        fn clone(&self) -> Self {
            CLONES.with(|clones| clones.set(clones.get() + 1));
            Counted(self.0)
        }
    }

    #[test]
    fn test_is_disjoint_borrows_operands() {
        let small: TreapMultiset<Counted> = vec![Counted(5)].into_iter().collect();
        let big: TreapMultiset<Counted> = (0..10_000).map(Counted).collect();
        let other: TreapMultiset<Counted> = vec![Counted(20_000)].into_iter().collect();

        CLONES.with(|clones| clones.set(0));
        assert!(!small.is_disjoint(&big));
        assert!(!big.is_disjoint(&small));
        assert!(other.is_disjoint(&big));
        assert_eq!(CLONES.with(|clones| clones.get()), 0);
        assert_eq!(big.len(), 10_000);
    }

    #[test]
    fn test_set_operations_keep_first_equal_value() {
        let keys = |values: &[(u32, char)]| {
            let mut multiset = TreapMultiset::with_seed([1, 1, 1, 1]);
            for &value in values {
                multiset.insert(Key(value));
            }
            multiset
        };
        let payloads = |multiset: &TreapMultiset<Key>| {
            multiset.iter().map(|key| (key.0).1).collect::<String>()
        };

        let left = keys(&[(1, 'a'), (2, 'b'), (1, 'c'), (1, 'd')]);
        let right = keys(&[(1, 'x'), (3, 'y'), (1, 'z')]);
        assert_eq!(payloads(&(&left | &right)), "aby");
        assert_eq!(payloads(&(&left & &right)), "a");
        assert_eq!(payloads(&(&right | &left)), "xby");

        let mut unique = left.clone();
        assert_eq!(unique.unique(), 2);
        assert_eq!(payloads(&unique), "ab");
    }

    #[test]
    fn test_clone_draws_independent_priorities() {
        let mut multiset: TreapMultiset<u32> = TreapMultiset::with_seed([1, 1, 1, 1]);
        let mut copy = multiset.clone();
        multiset.insert(1);
        copy.insert(1);
        let priority = |multiset: &TreapMultiset<u32>| {
            multiset.nodes().next().map(|node| node.priority())
        };
        assert!(priority(&multiset).is_some());
        assert_ne!(priority(&multiset), priority(&copy));
    }

    #[test]
    fn test_distinct_len() {
        assert_eq!(from_slice(&[]).distinct_len(), 0);
        assert_eq!(from_slice(&[2, 1, 2, 3, 3]).distinct_len(), 3);
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", from_slice(&[2, 1, 2])), "[1, 2, 2]");
    }
}
