//! Self-adjusting binary search tree with the additional property that recently accessed elements
//! are quick to access again.

mod config;
mod node;
mod set;
mod tree;

#[cfg(test)]
mod proptests;

pub use self::config::{MissPolicy, SplayConfig};
pub use self::set::{SplaySet, SplaySetIntoIter, SplaySetIter};

use std::error;
use std::fmt;
use std::result;

/// A structural invariant of a splay tree that `SplaySet::validate` found broken.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A key is not strictly between the keys bounding its subtree.
    OrderViolation,
    /// A child's parent link does not name the node holding it.
    ParentMismatch,
    /// The root has a parent link.
    RootHasParent,
    /// The element count disagrees with the number of nodes reachable from the root.
    LengthMismatch { expected: usize, actual: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OrderViolation => write!(f, "key is out of order with its subtree bounds"),
            Error::ParentMismatch => write!(f, "child does not link back to its parent"),
            Error::RootHasParent => write!(f, "root has a parent link"),
            Error::LengthMismatch { expected, actual } => write!(
                f,
                "expected {} reachable nodes, found {}",
                expected, actual,
            ),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
