//! Data structures for orthant trees.
use std::ops::Range;

use num::Float;

use crate::constants::{DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH, ROOT};
use crate::ragged::Ragged;
use crate::tree::helpers::half_width;

/// A box of an orthant tree.
///
/// Boxes are stored in a flat vector in the order they were created, breadth first, so a box's
/// `id` is its position in [OrthantTree::nodes]. The root has id 0 and spans `[-1, 1]^D`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node<const D: usize, T> {
    /// Position of this box in the tree.
    pub id: usize,

    /// Parent box, `None` for the root.
    pub parent: Option<usize>,

    /// Number of subdivisions from the root, the root has depth 0.
    pub depth: u64,

    /// Geometric centre of the box.
    pub center: [T; D],

    /// Octant of the parent occupied by this box, `-1` or `+1` along each axis. All zero for the
    /// root.
    pub descent: [i64; D],

    /// First of the `2^D` contiguous children, `None` for terminal boxes.
    pub first_child: Option<usize>,
}

impl<const D: usize, T: Float> Node<D, T> {
    pub(crate) fn root() -> Self {
        Node {
            id: ROOT,
            parent: None,
            depth: 0,
            center: [T::zero(); D],
            descent: [0; D],
            first_child: None,
        }
    }

    /// A box is terminal (a leaf) if it has no children.
    pub fn is_terminal(&self) -> bool {
        self.first_child.is_none()
    }

    /// Ids of the `2^D` children, indexed by [octant_index](crate::tree::helpers::octant_index).
    pub fn children(&self) -> Option<Range<usize>> {
        self.first_child
            .map(|first_child| first_child..first_child + (1 << D))
    }

    /// Half of the side length of this box.
    pub fn half_width(&self) -> T {
        half_width(self.depth)
    }

    /// Check whether a point lies in the closed region of this box.
    pub fn contains(&self, point: &[T; D]) -> bool {
        let w = self.half_width();
        point
            .iter()
            .zip(self.center.iter())
            .all(|(&x, &c)| (x - c).abs() <= w)
    }
}

/// Parameters controlling subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Maximum number of sources, and independently of targets, in a leaf box.
    pub capacity: usize,

    /// Depth at which overfull boxes are accepted as leaves, `None` for no limit.
    pub max_depth: Option<u64>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        TreeOptions {
            capacity: DEFAULT_CAPACITY,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

/// An adaptive orthant tree over a set of sources and a set of targets.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthantTree<const D: usize, T> {
    pub(crate) nodes: Vec<Node<D, T>>,

    /// Leaf of each source point.
    pub(crate) source_leaves: Vec<usize>,

    /// Leaf of each target point.
    pub(crate) target_leaves: Vec<usize>,

    /// Source point indices grouped by leaf.
    pub(crate) sources_by_leaf: Ragged<usize>,

    /// Target point indices grouped by leaf.
    pub(crate) targets_by_leaf: Ragged<usize>,

    /// Box ids grouped by depth.
    pub(crate) depths: Ragged<usize>,

    pub(crate) options: TreeOptions,
}

impl<const D: usize, T: Float> OrthantTree<D, T> {
    /// Number of boxes, leaves and interior boxes together.
    pub fn nboxes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaf boxes, including empty ones.
    pub fn nleaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_terminal()).count()
    }

    /// Depth of the deepest box.
    pub fn depth(&self) -> u64 {
        (self.depths.nowners() - 1) as u64
    }

    /// All boxes, indexed by id.
    pub fn nodes(&self) -> &[Node<D, T>] {
        &self.nodes
    }

    /// Box with a given id.
    pub fn node(&self, index: usize) -> Option<&Node<D, T>> {
        self.nodes.get(index)
    }

    /// Ids of the leaf boxes in ascending order.
    pub fn leaves(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().filter(|n| n.is_terminal()).map(|n| n.id)
    }

    /// Box ids grouped by the depth they were created at.
    pub fn depths(&self) -> &Ragged<usize> {
        &self.depths
    }

    /// Ids of the boxes at a given depth, empty beyond the deepest level.
    pub fn boxes_at_depth(&self, depth: u64) -> &[usize] {
        match usize::try_from(depth) {
            Ok(depth) => self.depths.get(depth),
            Err(_) => &[],
        }
    }

    /// Leaf of each source point, aligned with the input sources.
    pub fn source_leaves(&self) -> &[usize] {
        &self.source_leaves
    }

    /// Leaf of each target point, aligned with the input targets.
    pub fn target_leaves(&self) -> &[usize] {
        &self.target_leaves
    }

    /// Indices of the source points in each box, empty for interior boxes.
    pub fn sources_by_leaf(&self) -> &Ragged<usize> {
        &self.sources_by_leaf
    }

    /// Indices of the target points in each box, empty for interior boxes.
    pub fn targets_by_leaf(&self) -> &Ragged<usize> {
        &self.targets_by_leaf
    }

    /// Options the tree was built with.
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::{Node, TreeOptions};
    use crate::constants::{DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH};

    #[test]
    fn test_root() {
        let root = Node::<3, f64>::root();
        assert!(root.is_terminal());
        assert!(root.children().is_none());
        assert_eq!(root.parent, None);
        assert_relative_eq!(root.half_width(), 1.0);
        assert!(root.contains(&[1.0, -1.0, 0.3]));
        assert!(!root.contains(&[1.1, 0.0, 0.0]));
    }

    #[test]
    fn test_children_range() {
        let mut node = Node::<2, f64>::root();
        node.first_child = Some(5);
        assert_eq!(node.children(), Some(5..9));
        assert!(!node.is_terminal());
    }

    #[test]
    fn test_default_options() {
        let options = TreeOptions::default();
        assert_eq!(options.capacity, DEFAULT_CAPACITY);
        assert_eq!(options.max_depth, Some(DEFAULT_MAX_DEPTH));
    }
}
