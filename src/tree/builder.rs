//! Level-synchronous construction of orthant trees.
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Range;

use log::{debug, info, warn};
use num::Float;
use rayon::prelude::{
    IndexedParallelIterator, IntoParallelRefIterator, IntoParallelRefMutIterator, ParallelIterator,
};

use crate::constants::ROOT;
use crate::ragged::Ragged;
use crate::tree::helpers::{half_width, octants};
use crate::tree::types::{Node, OrthantTree, TreeOptions};
use crate::types::{Error, PointSet, Result};

/// Builder for [OrthantTree].
#[derive(Debug, Clone, Copy)]
pub struct OrthantTreeBuilder<const D: usize, T> {
    options: TreeOptions,
    _marker: PhantomData<T>,
}

impl<const D: usize, T> Default for OrthantTreeBuilder<D, T>
where
    T: Float + Debug + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const D: usize, T> OrthantTreeBuilder<D, T>
where
    T: Float + Debug + Send + Sync,
{
    /// Initialise a builder with the default [TreeOptions].
    pub fn new() -> Self {
        OrthantTreeBuilder {
            options: TreeOptions::default(),
            _marker: PhantomData,
        }
    }

    /// Maximum number of sources, and independently of targets, in a leaf box.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.options.capacity = capacity;
        self
    }

    /// Depth at which overfull boxes are accepted as leaves.
    ///
    /// With `None` subdivision only stops once every leaf is within capacity, which never
    /// happens if more than `capacity` points share a coordinate.
    pub fn max_depth(mut self, max_depth: Option<u64>) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, options: TreeOptions) -> Self {
        self.options = options;
        self
    }

    /// Construct the tree.
    ///
    /// Starting from the root box, every box created at the current depth that holds more than
    /// `capacity` sources or more than `capacity` targets is split into `2^D` children and its
    /// points are moved into them. Depths are processed one after another, the work within a
    /// depth is done in parallel.
    ///
    /// # Arguments
    /// * `sources` - Source coordinates, each inside the root box `[-1, 1]^D`.
    /// * `targets` - Target coordinates, each inside the root box `[-1, 1]^D`.
    pub fn build(&self, sources: &[[T; D]], targets: &[[T; D]]) -> Result<OrthantTree<D, T>> {
        if D == 0 {
            return Err(Error::InvalidDimension);
        }
        let capacity = self.options.capacity;
        if capacity < 1 {
            return Err(Error::InvalidCapacity(capacity));
        }
        check_domain(sources, PointSet::Sources)?;
        check_domain(targets, PointSet::Targets)?;

        let nchildren = 1 << D;
        let octants = octants::<D>();

        let mut nodes = vec![Node::<D, T>::root()];
        let mut source_leaves = vec![ROOT; sources.len()];
        let mut target_leaves = vec![ROOT; targets.len()];
        let mut depth_counts = vec![1];

        // Boxes created at the current depth
        let mut level = ROOT..ROOT + 1;
        let mut depth = 0;

        loop {
            let source_counts = occupancy(&source_leaves, &level);
            let target_counts = occupancy(&target_leaves, &level);

            let overfull: Vec<usize> = level
                .clone()
                .zip(source_counts.iter().zip(target_counts.iter()))
                .filter(|(_, (&s, &t))| s > capacity || t > capacity)
                .map(|(index, _)| index)
                .collect();

            if overfull.is_empty() {
                break;
            }

            if let Some(max_depth) = self.options.max_depth {
                if depth >= max_depth {
                    warn!(
                        "Reached maximum depth {} with {} boxes above capacity {}, accepting them as leaves",
                        max_depth,
                        overfull.len(),
                        capacity
                    );
                    break;
                }
            }

            // Boxes whose children would not be representable in T stay as leaves
            let child_width = half_width::<T>(depth + 1);
            let (overfull, unresolved): (Vec<usize>, Vec<usize>) = overfull
                .into_iter()
                .partition(|&index| can_split(&nodes[index].center, child_width));

            if !unresolved.is_empty() {
                warn!(
                    "{} boxes above capacity {} at depth {} are too small to split at the precision of {}, accepting them as leaves",
                    unresolved.len(),
                    capacity,
                    depth,
                    std::any::type_name::<T>()
                );
            }

            if overfull.is_empty() {
                break;
            }

            depth += 1;
            let first = nodes.len();

            // First child of each box at this depth, if it is split
            let mut first_children = vec![None; level.len()];

            for (k, &parent) in overfull.iter().enumerate() {
                let first_child = first + nchildren * k;
                first_children[parent - level.start] = Some(first_child);
                nodes[parent].first_child = Some(first_child);

                let center = nodes[parent].center;
                for (i, octant) in octants.iter().enumerate() {
                    nodes.push(Node {
                        id: first_child + i,
                        parent: Some(parent),
                        depth,
                        center: child_center(&center, octant, child_width),
                        descent: *octant,
                        first_child: None,
                    });
                }
            }

            reassign(&mut source_leaves, sources, &level, &first_children, &nodes);
            reassign(&mut target_leaves, targets, &level, &first_children, &nodes);

            debug!(
                "Depth {}: split {} of {} boxes into {} children",
                depth,
                overfull.len(),
                level.len(),
                nodes.len() - first
            );

            level = first..nodes.len();
            depth_counts.push(level.len());
        }

        let nboxes = nodes.len();
        let depths = Ragged::from_counts((0..nboxes).collect(), &depth_counts)?;
        let sources_by_leaf = group_by_leaf(&source_leaves, nboxes)?;
        let targets_by_leaf = group_by_leaf(&target_leaves, nboxes)?;

        info!(
            "Built orthant tree of depth {} with {} boxes ({} leaves) from {} sources and {} targets",
            depth,
            nboxes,
            nodes.iter().filter(|n| n.is_terminal()).count(),
            sources.len(),
            targets.len()
        );

        Ok(OrthantTree {
            nodes,
            source_leaves,
            target_leaves,
            sources_by_leaf,
            targets_by_leaf,
            depths,
            options: self.options,
        })
    }
}

impl<const D: usize, T> OrthantTree<D, T>
where
    T: Float + Debug + Send + Sync,
{
    /// Build a tree with the given leaf capacity and otherwise default [TreeOptions].
    pub fn new(sources: &[[T; D]], targets: &[[T; D]], capacity: usize) -> Result<Self> {
        OrthantTreeBuilder::new()
            .capacity(capacity)
            .build(sources, targets)
    }
}

fn check_domain<const D: usize, T: Float>(points: &[[T; D]], set: PointSet) -> Result<()> {
    // Written so that NaN coordinates fail the check
    match points
        .iter()
        .position(|p| p.iter().any(|x| !(x.abs() <= T::one())))
    {
        Some(index) => Err(Error::PointOutsideDomain { set, index }),
        None => Ok(()),
    }
}

/// Count the points assigned to each box in `level`.
fn occupancy(leaves: &[usize], level: &Range<usize>) -> Vec<usize> {
    let n = level.len();
    leaves
        .par_iter()
        .fold(
            || vec![0usize; n],
            |mut counts, leaf| {
                if level.contains(leaf) {
                    counts[leaf - level.start] += 1;
                }
                counts
            },
        )
        .reduce(
            || vec![0usize; n],
            |mut a, b| {
                a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                a
            },
        )
}

fn child_center<const D: usize, T: Float>(center: &[T; D], octant: &[i64; D], width: T) -> [T; D] {
    let mut result = *center;
    for (c, &o) in result.iter_mut().zip(octant.iter()) {
        if o > 0 {
            *c = *c + width;
        } else {
            *c = *c - width;
        }
    }
    result
}

/// Check that both children of a box along every axis have centres exactly `width` away.
fn can_split<const D: usize, T: Float>(center: &[T; D], width: T) -> bool {
    center
        .iter()
        .all(|&c| (c + width) - c == width && c - (c - width) == width)
}

/// Offset of the child of a box with the given centre that contains a point.
fn child_offset<const D: usize, T: Float>(point: &[T; D], center: &[T; D]) -> usize {
    point
        .iter()
        .zip(center.iter())
        .fold(0, |offset, (x, c)| (offset << 1) | usize::from(x >= c))
}

/// Move the points of split boxes into the children containing them.
fn reassign<const D: usize, T>(
    leaves: &mut [usize],
    points: &[[T; D]],
    level: &Range<usize>,
    first_children: &[Option<usize>],
    nodes: &[Node<D, T>],
) where
    T: Float + Send + Sync,
{
    leaves
        .par_iter_mut()
        .zip(points.par_iter())
        .for_each(|(leaf, point)| {
            if level.contains(&*leaf) {
                if let Some(first_child) = first_children[*leaf - level.start] {
                    *leaf = first_child + child_offset(point, &nodes[*leaf].center);
                }
            }
        });
}

fn group_by_leaf(leaves: &[usize], nboxes: usize) -> Result<Ragged<usize>> {
    Ragged::from_pairs(
        leaves
            .iter()
            .enumerate()
            .map(|(index, &leaf)| (leaf, index))
            .collect(),
        nboxes,
    )
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::{can_split, child_center, child_offset, OrthantTreeBuilder};
    use crate::tree::helpers::points_fixture;
    use crate::tree::OrthantTree;
    use crate::types::{Error, PointSet};

    #[test]
    fn test_child_offset() {
        let center = [0.0, 0.0, 0.0];
        assert_eq!(child_offset(&[-0.5, -0.5, -0.5], &center), 0);
        assert_eq!(child_offset(&[-0.5, -0.5, 0.5], &center), 1);
        assert_eq!(child_offset(&[0.5, -0.5, -0.5], &center), 4);

        // Points on the centre plane belong to the upper side
        assert_eq!(child_offset(&[0.0, 0.0, 0.0], &center), 7);
    }

    #[test]
    fn test_child_center() {
        let center = child_center(&[0.5, -0.5], &[-1, 1], 0.25);
        assert_relative_eq!(center[0], 0.25);
        assert_relative_eq!(center[1], -0.25);
    }

    #[test]
    fn test_can_split() {
        assert!(can_split(&[0.5_f32, -0.25], 0.125));
        assert!(!can_split(&[0.3_f32, 0.0], 2.0_f32.powi(-30)));
        assert!(can_split(&[0.3_f64, 0.0], 2.0_f64.powi(-30)));
    }

    #[test]
    fn test_coincident_f32_points_stop_at_precision() {
        let sources = vec![[0.3_f32, -0.7_f32]; 3];
        let tree = OrthantTree::new(&sources, &[], 1).unwrap();

        assert!(tree.depth() < 32);
        let leaf = tree.source_leaves()[0];
        assert_eq!(tree.sources_by_leaf().get(leaf), &[0, 1, 2]);

        for node in tree.nodes().iter().skip(1) {
            let parent = &tree.nodes()[node.parent.unwrap()];
            let width = node.half_width();
            for i in 0..2 {
                assert_ne!(node.center[i], parent.center[i]);
                assert_eq!(
                    node.center[i] - parent.center[i],
                    node.descent[i] as f32 * width
                );
            }
        }
    }

    #[test]
    fn test_root_only() {
        let tree = OrthantTree::new(&[[0.0, 0.0, 0.0]], &[[0.0, 0.0, 0.0]], 8).unwrap();

        assert_eq!(tree.nboxes(), 1);
        assert_eq!(tree.depth(), 0);
        assert!(tree.nodes()[0].is_terminal());
        assert_eq!(tree.source_leaves(), &[0]);
        assert_eq!(tree.target_leaves(), &[0]);
        assert_eq!(tree.boxes_at_depth(0), &[0]);
    }

    #[test]
    fn test_single_split() {
        let sources = [[-0.5, -0.5], [-0.5, 0.5], [0.5, -0.5], [0.5, 0.5]];
        let tree = OrthantTreeBuilder::new()
            .capacity(1)
            .build(&sources, &[])
            .unwrap();

        assert_eq!(tree.nboxes(), 5);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.nodes()[0].children(), Some(1..5));
        assert_eq!(tree.source_leaves(), &[1, 2, 3, 4]);
        assert_eq!(tree.boxes_at_depth(1), &[1, 2, 3, 4]);

        for (i, &leaf) in tree.source_leaves().iter().enumerate() {
            let node = &tree.nodes()[leaf];
            assert!(node.is_terminal());
            assert_eq!(node.depth, 1);
            assert_eq!(node.parent, Some(0));
            assert!(node.contains(&sources[i]));
            assert_eq!(tree.sources_by_leaf().get(leaf), &[i]);
        }
    }

    #[test]
    fn test_capacity_applies_to_sources_and_targets_independently() {
        // 9 sources and 2 targets split with capacity 8
        let sources = points_fixture::<2>(9, None, None, Some(1));
        let targets = points_fixture::<2>(2, None, None, Some(2));
        let tree = OrthantTree::new(&sources, &targets, 8).unwrap();
        assert!(tree.nboxes() > 1);

        // Exactly capacity sources does not split
        let tree = OrthantTree::new(&sources[..8], &targets, 8).unwrap();
        assert_eq!(tree.nboxes(), 1);

        // Targets alone can trigger a split
        let tree = OrthantTree::new(&targets, &sources, 8).unwrap();
        assert!(tree.nboxes() > 1);
    }

    #[test]
    fn test_max_depth_accepts_overfull_leaves() {
        let sources = vec![[0.25, 0.25]; 4];
        let tree = OrthantTreeBuilder::new()
            .capacity(1)
            .max_depth(Some(3))
            .build(&sources, &[])
            .unwrap();

        assert_eq!(tree.depth(), 3);
        let leaf = tree.source_leaves()[0];
        assert!(tree.source_leaves().iter().all(|&l| l == leaf));
        assert_eq!(tree.nodes()[leaf].depth, 3);
        assert!(tree.nodes()[leaf].is_terminal());
    }

    #[test]
    fn test_contract_violations() {
        let points = [[0.0, 0.0]];
        assert_eq!(
            OrthantTree::new(&points, &points, 0),
            Err(Error::InvalidCapacity(0))
        );

        let outside = [[0.0, 0.0], [0.0, 1.5]];
        assert_eq!(
            OrthantTree::new(&points, &outside, 1),
            Err(Error::PointOutsideDomain {
                set: PointSet::Targets,
                index: 1
            })
        );

        let nan = [[f64::NAN, 0.0]];
        assert_eq!(
            OrthantTree::new(&nan, &points, 1),
            Err(Error::PointOutsideDomain {
                set: PointSet::Sources,
                index: 0
            })
        );
    }
}
