use thiserror::Error;

use crate::MIN_ORDER;

/// Alias for results returned by [`BTree`](crate::BTree) operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Failures reported by [`BTree`](crate::BTree).
///
/// Every variant is an ordinary value: none of them leaves the tree in a modified state.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The tree was constructed with a branching factor below [`MIN_ORDER`].
    #[error("order must be at least {}, got {order}", MIN_ORDER)]
    InvalidOrder {
        /// The rejected branching factor.
        order: usize,
    },
    /// A lookup or removal named a key the tree does not hold.
    #[error("key not found")]
    KeyNotFound,
    /// A removal was attempted on a tree with no entries.
    #[error("tree is empty")]
    TreeEmpty,
}

/// A structural defect found by [`BTree::check_invariants`](crate::BTree::check_invariants).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum InvariantViolation {
    /// The root node is present but holds no keys.
    #[error("root node holds no keys")]
    EmptyRoot,
    /// A node holds more keys than a node may keep at rest.
    #[error("node holds {keys} keys, at most {max} allowed")]
    Overfull {
        /// Keys found in the node.
        keys: usize,
        /// Largest count allowed at rest.
        max: usize,
    },
    /// A non-root node holds fewer keys than the occupancy minimum.
    #[error("non-root node holds {keys} keys, at least {min} required")]
    Underfull {
        /// Keys found in the node.
        keys: usize,
        /// Smallest count allowed for a non-root node.
        min: usize,
    },
    /// An internal node does not have exactly one more child than keys.
    #[error("internal node has {children} children for {keys} keys")]
    ChildCount {
        /// Keys found in the node.
        keys: usize,
        /// Children found in the node.
        children: usize,
    },
    /// Keys inside one node are not strictly ascending.
    #[error("node keys are not strictly ascending")]
    Unsorted,
    /// A key lies outside the range its parent separators allow.
    #[error("key lies outside the range bounded by its parent separators")]
    Separation,
    /// Leaves sit at different depths.
    #[error("leaves found at depths {expected} and {found}")]
    UnevenDepth {
        /// Depth of the first leaf visited.
        expected: usize,
        /// Depth of the offending leaf.
        found: usize,
    },
    /// The cached entry count disagrees with the entries actually reachable.
    #[error("tree reports {expected} entries but {found} are reachable")]
    LengthMismatch {
        /// Cached entry count.
        expected: usize,
        /// Entries reachable from the root.
        found: usize,
    },
    /// Some allocated nodes are not reachable from the root.
    #[error("{allocated} nodes allocated but {reachable} are reachable")]
    LeakedNodes {
        /// Live arena slots.
        allocated: usize,
        /// Nodes reachable from the root.
        reachable: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(Error::InvalidOrder { order: 2 }.to_string(), "order must be at least 3, got 2");
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
        assert_eq!(Error::TreeEmpty.to_string(), "tree is empty");
        assert_eq!(
            InvariantViolation::Underfull { keys: 0, min: 1 }.to_string(),
            "non-root node holds 0 keys, at least 1 required"
        );
    }
}
