use crate::treap::node::{Node, NodeId};
use crate::treap::{Error, Result};
use std::cmp::{self, Ordering};
use std::mem;

pub type Tree<T> = Option<Box<Node<T>>>;

pub fn len<T>(tree: &Tree<T>) -> usize {
    match tree {
        Some(ref node) => node.len,
        None => 0,
    }
}

pub fn height<T>(tree: &Tree<T>) -> usize {
    match tree {
        Some(ref node) => cmp::max(height(&node.left), height(&node.right)) + 1,
        None => 0,
    }
}

//   node           child
//   / \            / \
//  a  child  ->  node  c
//      / \       / \
//     b   c     a   b
fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut child = match node.right.take() {
        Some(child) => child,
        None => unreachable!(),
    };
    node.right = child.left.take();
    node.update();
    child.left = Some(node);
    child.update();
    child
}

//     node       child
//     / \         / \
//  child c  ->   a  node
//   / \             / \
//  a   b           b   c
fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut child = match node.left.take() {
        Some(child) => child,
        None => unreachable!(),
    };
    node.left = child.right.take();
    node.update();
    child.right = Some(node);
    child.update();
    child
}

/// Inserts a node, placing it after every node with an equal value.
pub fn insert<T>(tree: &mut Tree<T>, new_node: Node<T>)
where
    T: Ord,
{
    let mut node = match tree.take() {
        Some(node) => node,
        None => {
            *tree = Some(Box::new(new_node));
            return;
        },
    };

    if new_node.value < node.value {
        insert(&mut node.left, new_node);
        node.update();
        if node.is_heap_property_violated(&node.left) {
            node = rotate_right(node);
        }
    } else {
        insert(&mut node.right, new_node);
        node.update();
        if node.is_heap_property_violated(&node.right) {
            node = rotate_left(node);
        }
    }

    *tree = Some(node);
}

/// Inserts a node only if no node with an equal value exists. Returns `true` if the node was
/// inserted.
pub fn add<T>(tree: &mut Tree<T>, new_node: Node<T>) -> bool
where
    T: Ord,
{
    let mut node = match tree.take() {
        Some(node) => node,
        None => {
            *tree = Some(Box::new(new_node));
            return true;
        },
    };

    let inserted = match new_node.value.cmp(&node.value) {
        Ordering::Less => {
            let inserted = add(&mut node.left, new_node);
            node.update();
            if node.is_heap_property_violated(&node.left) {
                node = rotate_right(node);
            }
            inserted
        },
        Ordering::Greater => {
            let inserted = add(&mut node.right, new_node);
            node.update();
            if node.is_heap_property_violated(&node.right) {
                node = rotate_left(node);
            }
            inserted
        },
        Ordering::Equal => false,
    };

    *tree = Some(node);
    inserted
}

pub fn get<'a, T>(tree: &'a Tree<T>, value: &T) -> Option<&'a Node<T>>
where
    T: Ord,
{
    tree.as_ref().and_then(|node| match value.cmp(&node.value) {
        Ordering::Less => get(&node.left, value),
        Ordering::Greater => get(&node.right, value),
        Ordering::Equal => Some(&**node),
    })
}

pub fn search<'a, T>(tree: &'a Tree<T>, value: &T) -> Result<&'a Node<T>>
where
    T: Ord,
{
    get(tree, value).ok_or(Error::NotFound)
}

pub fn contains<T>(tree: &Tree<T>, value: &T) -> bool
where
    T: Ord,
{
    get(tree, value).is_some()
}

/// Returns the number of nodes holding a value equal to `value`.
pub fn count<T>(tree: &Tree<T>, value: &T) -> usize
where
    T: Ord,
{
    match tree {
        Some(ref node) => match value.cmp(&node.value) {
            Ordering::Less => count(&node.left, value),
            Ordering::Greater => count(&node.right, value),
            Ordering::Equal => 1 + count(&node.left, value) + count(&node.right, value),
        },
        None => 0,
    }
}

// Collects the identities of all nodes equal to `value` in in-order.
fn collect_equal_ids<T>(tree: &Tree<T>, value: &T, ids: &mut Vec<NodeId>)
where
    T: Ord,
{
    if let Some(ref node) = tree {
        match value.cmp(&node.value) {
            Ordering::Less => collect_equal_ids(&node.left, value, ids),
            Ordering::Greater => collect_equal_ids(&node.right, value, ids),
            Ordering::Equal => {
                collect_equal_ids(&node.left, value, ids);
                ids.push(node.id);
                collect_equal_ids(&node.right, value, ids);
            },
        }
    }
}

pub fn min<T>(tree: &Tree<T>) -> Option<&T> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref left_node) = curr.left {
            curr = left_node;
        }
        &curr.value
    })
}

pub fn max<T>(tree: &Tree<T>) -> Option<&T> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref right_node) = curr.right {
            curr = right_node;
        }
        &curr.value
    })
}

/// Removes the root of a tree, rotating it down towards the child with the lower priority until
/// it has at most one child.
pub fn remove_root<T>(tree: &mut Tree<T>) -> Option<Box<Node<T>>> {
    let mut node = tree.take()?;
    match (node.left.take(), node.right.take()) {
        (None, child) | (child, None) => {
            *tree = child;
            node.update();
            Some(node)
        },
        (Some(left), Some(right)) => {
            let left_rises = left.priority < right.priority;
            node.left = Some(left);
            node.right = Some(right);
            let mut new_root;
            let removed;
            if left_rises {
                new_root = rotate_right(node);
                removed = remove_root(&mut new_root.right);
            } else {
                new_root = rotate_left(node);
                removed = remove_root(&mut new_root.left);
            }
            new_root.update();
            *tree = Some(new_root);
            removed
        },
    }
}

/// Removes the first node equal to `value` on the search path.
pub fn remove<T>(tree: &mut Tree<T>, value: &T) -> Result<T>
where
    T: Ord,
{
    let node = match tree {
        Some(node) => node,
        None => return Err(Error::NotFound),
    };
    let ret = match value.cmp(&node.value) {
        Ordering::Less => remove(&mut node.left, value),
        Ordering::Greater => remove(&mut node.right, value),
        Ordering::Equal => {
            return remove_root(tree)
                .map(|node| node.value)
                .ok_or(Error::NotFound);
        },
    };
    node.update();
    ret
}

/// Removes the node with identity `id`. The node is located by comparing against `value`; among
/// nodes equal to `value` both subtrees are scanned.
pub fn remove_node<T>(tree: &mut Tree<T>, value: &T, id: NodeId) -> Result<T>
where
    T: Ord,
{
    let node = match tree {
        Some(node) => node,
        None => return Err(Error::NotFound),
    };
    if node.id == id {
        return remove_root(tree)
            .map(|node| node.value)
            .ok_or(Error::NotFound);
    }
    let ret = match value.cmp(&node.value) {
        Ordering::Less => remove_node(&mut node.left, value, id),
        Ordering::Greater => remove_node(&mut node.right, value, id),
        Ordering::Equal => match remove_node(&mut node.left, value, id) {
            Err(Error::NotFound) => remove_node(&mut node.right, value, id),
            res => res,
        },
    };
    node.update();
    ret
}

pub fn remove_min<T>(tree: &mut Tree<T>) -> Option<Box<Node<T>>> {
    let node = tree.as_mut()?;
    if node.left.is_some() {
        let ret = remove_min(&mut node.left);
        node.update();
        return ret;
    }
    remove_root(tree)
}

pub fn remove_max<T>(tree: &mut Tree<T>) -> Option<Box<Node<T>>> {
    let node = tree.as_mut()?;
    if node.right.is_some() {
        let ret = remove_max(&mut node.right);
        node.update();
        return ret;
    }
    remove_root(tree)
}

/// Removes every node equal to `value`. Returns the number of removed nodes.
pub fn remove_all<T>(tree: &mut Tree<T>, value: &T) -> usize
where
    T: Ord,
{
    let mut removed = 0;
    while remove(tree, value).is_ok() {
        removed += 1;
    }
    removed
}

/// Removes every node equal to `value` except the first one in in-order. Returns the number of
/// removed nodes.
pub fn remove_all_except<T>(tree: &mut Tree<T>, value: &T) -> usize
where
    T: Ord,
{
    let mut ids = Vec::new();
    collect_equal_ids(tree, value, &mut ids);
    let mut removed = 0;
    for id in ids.into_iter().skip(1) {
        if remove_node(tree, value, id).is_ok() {
            removed += 1;
        }
    }
    removed
}

/// Collapses runs of equal values so that every value occurs at most once, keeping the first node
/// of each run in in-order. Returns the number of removed nodes.
pub fn unique<T>(tree: &mut Tree<T>) -> usize
where
    T: Ord,
{
    let mut node = match tree.take() {
        Some(node) => node,
        None => return 0,
    };
    let mut removed = {
        let Node {
            ref value,
            ref mut left,
            ref mut right,
            ..
        } = *node;
        unique(left) + unique(right) + remove_all(right, value)
    };
    // After collapsing the left subtree, its maximum is the only node there that can equal this one.
    if max(&node.left) == Some(&node.value) {
        removed += 1;
        *tree = merge(node.left.take(), node.right.take());
    } else {
        node.update();
        *tree = Some(node);
    }
    removed
}

/// Splits a tree into the nodes preceding `value` and the remaining nodes. If `left_inclusive` is
/// `true`, nodes equal to `value` are placed in the left tree, otherwise in the right tree.
pub fn split<T>(tree: Tree<T>, value: &T, left_inclusive: bool) -> (Tree<T>, Tree<T>)
where
    T: Ord,
{
    match tree {
        Some(mut node) => {
            let goes_left = match node.value.cmp(value) {
                Ordering::Less => true,
                Ordering::Equal => left_inclusive,
                Ordering::Greater => false,
            };
            if goes_left {
                let (left, right) = split(node.right.take(), value, left_inclusive);
                node.right = left;
                node.update();
                (Some(node), right)
            } else {
                let (left, right) = split(node.left.take(), value, left_inclusive);
                node.left = right;
                node.update();
                (left, Some(node))
            }
        },
        None => (None, None),
    }
}

// Splits a tree into the nodes less than, equal to, and greater than `value`.
fn partition<T>(tree: Tree<T>, value: &T) -> (Tree<T>, Tree<T>, Tree<T>)
where
    T: Ord,
{
    let (less, rest) = split(tree, value, false);
    let (equal, greater) = split(rest, value, true);
    (less, equal, greater)
}

/// Concatenates two trees. Every value in `left_tree` must be less than or equal to every value
/// in `right_tree`; this is not checked.
pub fn merge<T>(left_tree: Tree<T>, right_tree: Tree<T>) -> Tree<T> {
    match (left_tree, right_tree) {
        (Some(mut left_node), Some(mut right_node)) => {
            if left_node.priority <= right_node.priority {
                left_node.right = merge(left_node.right.take(), Some(right_node));
                left_node.update();
                Some(left_node)
            } else {
                right_node.left = merge(Some(left_node), right_node.left.take());
                right_node.update();
                Some(right_node)
            }
        },
        (tree, None) | (None, tree) => tree,
    }
}

/// Combines two trees keeping every node of both. Nodes from `left_tree` precede equal nodes from
/// `right_tree`.
pub fn sum<T>(left_tree: Tree<T>, right_tree: Tree<T>) -> Tree<T>
where
    T: Ord,
{
    match (left_tree, right_tree) {
        (Some(mut left_node), Some(mut right_node)) => {
            if left_node.priority <= right_node.priority {
                let (less, greater) = split(Some(right_node), &left_node.value, false);
                left_node.left = sum(left_node.left.take(), less);
                left_node.right = sum(left_node.right.take(), greater);
                left_node.update();
                Some(left_node)
            } else {
                let (less, greater) = split(Some(left_node), &right_node.value, true);
                right_node.left = sum(less, right_node.left.take());
                right_node.right = sum(greater, right_node.right.take());
                right_node.update();
                Some(right_node)
            }
        },
        (tree, None) | (None, tree) => tree,
    }
}

/// Returns the union of two trees without duplicate values. When both trees hold an equal value,
/// the value and identity of the node from `left_tree` are kept.
pub fn union<T>(left_tree: Tree<T>, right_tree: Tree<T>) -> Tree<T>
where
    T: Ord,
{
    match (left_tree, right_tree) {
        (Some(mut left_node), Some(mut right_node)) => {
            if left_node.priority <= right_node.priority {
                let (less, _, greater) = partition(Some(right_node), &left_node.value);
                left_node.left = union(left_node.left.take(), less);
                left_node.right = union(left_node.right.take(), greater);
                left_node.update();
                Some(left_node)
            } else {
                let (less, equal, greater) = partition(Some(left_node), &right_node.value);
                right_node.left = union(less, right_node.left.take());
                right_node.right = union(greater, right_node.right.take());
                if let Some(mut equal_node) = equal {
                    mem::swap(&mut right_node.value, &mut equal_node.value);
                    mem::swap(&mut right_node.id, &mut equal_node.id);
                }
                right_node.update();
                Some(right_node)
            }
        },
        (tree, None) | (None, tree) => tree,
    }
}

/// Returns the intersection of two trees without duplicate values. The value and identity of the
/// node from `left_tree` are kept.
pub fn intersection<T>(left_tree: Tree<T>, right_tree: Tree<T>) -> Tree<T>
where
    T: Ord,
{
    match (left_tree, right_tree) {
        (Some(left_node), Some(right_node)) => {
            let swapped = right_node.priority < left_node.priority;
            let (mut root, other) = if swapped {
                (right_node, left_node)
            } else {
                (left_node, right_node)
            };
            let (less, equal, greater) = partition(Some(other), &root.value);
            let (left, right) = if swapped {
                (
                    intersection(less, root.left.take()),
                    intersection(greater, root.right.take()),
                )
            } else {
                (
                    intersection(root.left.take(), less),
                    intersection(root.right.take(), greater),
                )
            };
            match equal {
                Some(mut equal_node) => {
                    if swapped {
                        mem::swap(&mut root.value, &mut equal_node.value);
                        mem::swap(&mut root.id, &mut equal_node.id);
                    }
                    root.left = left;
                    root.right = right;
                    root.update();
                    Some(root)
                },
                None => merge(left, right),
            }
        },
        _ => None,
    }
}

/// Returns the values of `left_tree` that do not occur in `right_tree`.
pub fn difference<T>(left_tree: Tree<T>, right_tree: Tree<T>) -> Tree<T>
where
    T: Ord,
{
    match (left_tree, right_tree) {
        (Some(mut left_node), Some(mut right_node)) => {
            if left_node.priority <= right_node.priority {
                let (less, equal, greater) = partition(Some(right_node), &left_node.value);
                let left = difference(left_node.left.take(), less);
                let right = difference(left_node.right.take(), greater);
                if equal.is_some() {
                    merge(left, right)
                } else {
                    left_node.left = left;
                    left_node.right = right;
                    left_node.update();
                    Some(left_node)
                }
            } else {
                let (less, _, greater) = partition(Some(left_node), &right_node.value);
                merge(
                    difference(less, right_node.left.take()),
                    difference(greater, right_node.right.take()),
                )
            }
        },
        (left_tree, _) => left_tree,
    }
}

/// Returns the values that occur in exactly one of the two trees.
pub fn symmetric_difference<T>(left_tree: Tree<T>, right_tree: Tree<T>) -> Tree<T>
where
    T: Ord,
{
    match (left_tree, right_tree) {
        (Some(left_node), Some(right_node)) => {
            let (mut root, other) = if right_node.priority < left_node.priority {
                (right_node, left_node)
            } else {
                (left_node, right_node)
            };
            let (less, equal, greater) = partition(Some(other), &root.value);
            let left = symmetric_difference(root.left.take(), less);
            let right = symmetric_difference(root.right.take(), greater);
            if equal.is_some() {
                merge(left, right)
            } else {
                root.left = left;
                root.right = right;
                root.update();
                Some(root)
            }
        },
        (tree, None) | (None, tree) => tree,
    }
}

// Descends past every node whose subtree on one side lies outside the open range
// `(lower, upper)`. Nodes of the returned subtree inside the range are exactly those of `tree`.
fn narrow<'a, T>(mut tree: &'a Tree<T>, lower: Option<&T>, upper: Option<&T>) -> &'a Tree<T>
where
    T: Ord,
{
    while let Some(ref node) = tree {
        if lower.map_or(false, |lower| node.value <= *lower) {
            tree = &node.right;
        } else if upper.map_or(false, |upper| node.value >= *upper) {
            tree = &node.left;
        } else {
            break;
        }
    }
    tree
}

fn is_disjoint_between<T>(
    left_tree: &Tree<T>,
    right_tree: &Tree<T>,
    lower: Option<&T>,
    upper: Option<&T>,
) -> bool
where
    T: Ord,
{
    let left_tree = narrow(left_tree, lower, upper);
    let right_tree = narrow(right_tree, lower, upper);
    match (left_tree, right_tree) {
        (Some(ref left_node), Some(ref right_node)) => {
            let (root, other) = if right_node.priority < left_node.priority {
                (right_node, left_tree)
            } else {
                (left_node, right_tree)
            };
            !contains(other, &root.value)
                && is_disjoint_between(&root.left, other, lower, Some(&root.value))
                && is_disjoint_between(&root.right, other, Some(&root.value), upper)
        },
        _ => true,
    }
}

/// Returns `true` if no value occurs in both trees. Neither tree is modified and the search stops
/// at the first shared value.
pub fn is_disjoint<T>(left_tree: &Tree<T>, right_tree: &Tree<T>) -> bool
where
    T: Ord,
{
    is_disjoint_between(left_tree, right_tree, None, None)
}

fn is_valid_between<T>(tree: &Tree<T>, lower: Option<&T>, upper: Option<&T>) -> bool
where
    T: Ord,
{
    match tree {
        Some(ref node) => {
            let in_bounds = lower.map_or(true, |lower| *lower <= node.value)
                && upper.map_or(true, |upper| node.value <= *upper);
            in_bounds
                && node.len == 1 + len(&node.left) + len(&node.right)
                && !node.is_heap_property_violated(&node.left)
                && !node.is_heap_property_violated(&node.right)
                && is_valid_between(&node.left, lower, Some(&node.value))
                && is_valid_between(&node.right, Some(&node.value), upper)
        },
        None => true,
    }
}

/// Checks the search order, heap order, and cached subtree sizes of every node.
pub fn is_valid<T>(tree: &Tree<T>) -> bool
where
    T: Ord,
{
    is_valid_between(tree, None, None)
}
