//! Error and result types

use std::fmt;

/// The point set a coordinate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSet {
    /// Source points.
    Sources,
    /// Target points.
    Targets,
}

impl fmt::Display for PointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointSet::Sources => write!(f, "source"),
            PointSet::Targets => write!(f, "target"),
        }
    }
}

/// Contract violations reported by tree construction, navigation and the ragged store.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Leaf capacity below one.
    #[error("Leaf capacity must be at least one, got {0}")]
    InvalidCapacity(usize),

    /// Zero dimensional trees are not defined.
    #[error("Orthant trees need at least one dimension")]
    InvalidDimension,

    /// A coordinate is not finite or lies outside of the root box `[-1, 1]^D`.
    #[error("The {set} point at index {index} lies outside of the root box")]
    PointOutsideDomain {
        /// Which point set the offending point belongs to.
        set: PointSet,
        /// Index of the point within its set.
        index: usize,
    },

    /// Direction entries must be in {-1, 0, +1} and not all zero.
    #[error("Invalid direction {0:?}, entries must be -1, 0 or +1 and not all zero")]
    InvalidDirection(Vec<i64>),

    /// Octant entries must be in {-1, +1}.
    #[error("Invalid octant {0:?}, entries must be -1 or +1")]
    InvalidOctant(Vec<i64>),

    /// Box index does not exist in the tree.
    #[error("Box {index} out of range for a tree with {nboxes} boxes")]
    BoxOutOfRange {
        /// Requested box.
        index: usize,
        /// Number of boxes in the tree.
        nboxes: usize,
    },

    /// Child lookup on a leaf.
    #[error("Box {0} is terminal and has no children")]
    TerminalBox(usize),

    /// Owner outside of the domain of a ragged store.
    #[error("Owner {owner} out of range for a ragged store with {nowners} owners")]
    OwnerOutOfRange {
        /// Requested owner.
        owner: usize,
        /// Number of owners in the store.
        nowners: usize,
    },

    /// Group counts do not add up to the number of values.
    #[error("Group counts add up to {found}, expected {expected}")]
    CountMismatch {
        /// Number of values supplied.
        expected: usize,
        /// Sum of the group counts.
        found: usize,
    },
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
