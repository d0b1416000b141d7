//! Tree traits
use crate::types::Result;

/// Tree is the interface through which the expansion stage of an FMM accesses the boxes of a tree
/// and the leaf assignment of its points. Boxes are identified by their index.
pub trait Tree {
    /// Floating point type of the coordinates.
    type Scalar;

    /// A box of the tree.
    type Node;

    /// Signed per axis offsets used for octants and directions.
    type Offset;

    /// Number of boxes.
    fn nboxes(&self) -> usize;

    /// Depth of the deepest box.
    fn depth(&self) -> u64;

    /// Get a box from its index.
    fn node(&self, index: usize) -> Option<&Self::Node>;

    /// All boxes, ordered by index.
    fn nodes(&self) -> &[Self::Node];

    /// Indices of the boxes at a given depth.
    fn boxes_at_depth(&self, depth: u64) -> &[usize];

    /// Leaf box of each source point.
    fn source_leaves(&self) -> &[usize];

    /// Leaf box of each target point.
    fn target_leaves(&self) -> &[usize];

    /// Child of a non-terminal box in a given octant.
    fn child(&self, index: usize, octant: &Self::Offset) -> Result<usize>;

    /// Box at the same depth in a given direction, a coarser leaf if the region is less refined,
    /// or `None` outside of the root box.
    fn neighbour(&self, index: usize, direction: &Self::Offset) -> Result<Option<usize>>;
}
