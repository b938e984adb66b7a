//! Probabilistic binary search tree where each node also maintains the heap invariant.
//!
//! Every node holds a value and a random priority. Values are kept in search order and
//! priorities in heap order, with the lowest priority at the root. Because priorities are drawn
//! independently of the values, the expected height of the tree is proportional to the logarithm
//! of the number of values, whatever order they were inserted in.
//!
//! Values that compare equal are allowed in a `TreapMultiset` and are kept in insertion order.
//! A `TreapSet` never holds two equal values.

mod multiset;
mod node;
mod set;
mod tree;

pub use self::multiset::{TreapMultiset, TreapMultisetIntoIter, TreapMultisetIter, TreapMultisetNodes};
pub use self::node::{Node, NodeId};
pub use self::set::{TreapSet, TreapSetIntoIter, TreapSetIter};

use std::error;
use std::fmt;
use std::result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// No node holds the requested value or identity.
    NotFound,
    /// The operation requires a non-empty container.
    Empty,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "value not found in treap"),
            Error::Empty => write!(f, "treap is empty"),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
