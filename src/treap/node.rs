use crate::treap::tree::{self, Tree};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A process-unique identity of a node, independent of the value it holds.
///
/// Two nodes holding equal values always have distinct identities, and a deep copy of a node is
/// given a fresh identity.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct NodeId(usize);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A struct representing an internal node of a treap.
///
/// The node with the lowest priority of a subtree is its root.
pub struct Node<T> {
    pub value: T,
    pub priority: f64,
    pub id: NodeId,
    pub len: usize,
    pub left: Tree<T>,
    pub right: Tree<T>,
}

impl<T> Node<T> {
    pub fn new(value: T, priority: f64) -> Self {
        Node {
            value,
            priority,
            id: NodeId::next(),
            len: 1,
            left: None,
            right: None,
        }
    }

    /// Returns the identity of the node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the value stored in the node.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the priority of the node.
    pub fn priority(&self) -> f64 {
        self.priority
    }

    pub fn update(&mut self) {
        let Node {
            ref mut len,
            ref left,
            ref right,
            ..
        } = self;
        *len = 1 + tree::len(left) + tree::len(right);
    }

    pub fn is_heap_property_violated(&self, child: &Tree<T>) -> bool {
        match child {
            Some(ref child_node) => child_node.priority < self.priority,
            None => false,
        }
    }
}

impl<T> Clone for Node<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Node {
            value: self.value.clone(),
            priority: self.priority,
            id: NodeId::next(),
            len: self.len,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}
