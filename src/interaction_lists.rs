//! Interaction lists for FMMs on orthant trees.
//!
//! Following the adaptive FMM of Ying, Biros and Zorin, every box of a tree is associated with four
//! lists of partner boxes:
//!
//! - U list, only for leaves: the adjacent leaves, evaluated directly.
//! - V list: the children of the neighbours of a box's parent that are not adjacent to the box,
//!   these are translated from multipole to local expansions.
//! - W list, only for leaves: descendants of finer neighbours of a leaf that are not adjacent to
//!   it but whose parents are.
//! - X list: the reverse of the W list.
//!
//! All four lists are derived from a table holding, for every box and every direction, the
//! neighbour found by [OrthantTree::neighbour].
use std::fmt::Debug;

use itertools::iproduct;
use log::debug;
use num::Float;
use rayon::prelude::{
    IndexedParallelIterator, IntoParallelIterator, ParallelIterator, ParallelSliceMut,
};

use crate::ragged::Ragged;
use crate::traits::InteractionLists;
use crate::tree::helpers::{directions, octant_index, octants};
use crate::tree::{Node, OrthantTree};
use crate::types::Result;

/// Entry of a V list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VListEntry<const D: usize> {
    /// The well separated box.
    pub friend: usize,

    /// Position of the friend relative to the owning box, in units of the box width.
    pub offset: [i64; D],

    /// Depth of both boxes.
    pub depth: u64,
}

/// Neighbours of every box in every nonzero direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighbourTable<const D: usize> {
    directions: Vec<[i64; D]>,

    /// Row major, one row of `directions.len()` entries per box.
    neighbours: Vec<Option<usize>>,
}

impl<const D: usize> NeighbourTable<D> {
    /// Compute the neighbour of every box in every direction.
    pub fn new<T: Float + Send + Sync>(tree: &OrthantTree<D, T>) -> Self {
        let directions = directions::<D>();
        let ndirections = directions.len();
        let mut neighbours = vec![None; tree.nboxes() * ndirections];

        neighbours
            .par_chunks_mut(ndirections)
            .enumerate()
            .for_each(|(index, row)| {
                for (slot, direction) in row.iter_mut().zip(directions.iter()) {
                    *slot = tree.find_neighbour(index, direction);
                }
            });

        Self {
            directions,
            neighbours,
        }
    }

    /// The directions, in the order of the entries of a row.
    pub fn directions(&self) -> &[[i64; D]] {
        &self.directions
    }

    /// Neighbours of a box, one per direction.
    pub fn row(&self, index: usize) -> &[Option<usize>] {
        let n = self.directions.len();
        &self.neighbours[index * n..(index + 1) * n]
    }
}

/// The U, V, W and X lists of every box in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionScheme<const D: usize> {
    /// Near field of each leaf.
    pub u: Ragged<usize>,

    /// Well separated boxes of each box.
    pub v: Ragged<VListEntry<D>>,

    /// Finer non-adjacent boxes of each leaf.
    pub w: Ragged<usize>,

    /// Reverse of the W list.
    pub x: Ragged<usize>,

    /// Neighbour table the lists were derived from.
    pub neighbours: NeighbourTable<D>,
}

impl<const D: usize> InteractionScheme<D> {
    /// Compute all four interaction lists of a tree.
    pub fn new<T: Float + Debug + Send + Sync>(tree: &OrthantTree<D, T>) -> Result<Self> {
        let nboxes = tree.nboxes();
        let neighbours = NeighbourTable::new(tree);

        let u = Ragged::from_pairs(u_pairs(tree.nodes(), &neighbours), nboxes)?;
        let v = Ragged::from_pairs(v_pairs(tree, &neighbours), nboxes)?;

        let w_pairs = w_pairs(tree.nodes(), &neighbours);
        let x_pairs = w_pairs.iter().map(|&(b, f)| (f, b)).collect();
        let w = Ragged::from_pairs(w_pairs, nboxes)?;
        let x = Ragged::from_pairs(x_pairs, nboxes)?;

        debug!(
            "Interaction lists for {} boxes: {} U, {} V, {} W and {} X entries",
            nboxes,
            u.len(),
            v.len(),
            w.len(),
            x.len()
        );

        Ok(Self { u, v, w, x, neighbours })
    }
}

impl<const D: usize> InteractionLists for InteractionScheme<D> {
    type VEntry = VListEntry<D>;

    fn u_list(&self, index: usize) -> &[usize] {
        self.u.get(index)
    }

    fn v_list(&self, index: usize) -> &[VListEntry<D>] {
        self.v.get(index)
    }

    fn w_list(&self, index: usize) -> &[usize] {
        self.w.get(index)
    }

    fn x_list(&self, index: usize) -> &[usize] {
        self.x.get(index)
    }
}

/// Pairs of adjacent leaves.
///
/// Each leaf is paired with its distinct leaf neighbours. A neighbour lookup never returns a finer
/// box, so when the partner is coarser the reverse pair is added as well.
fn u_pairs<const D: usize, T>(nodes: &[Node<D, T>], table: &NeighbourTable<D>) -> Vec<(usize, usize)>
where
    T: Float + Send + Sync,
{
    let direct: Vec<Vec<(usize, usize)>> = (0..nodes.len())
        .into_par_iter()
        .map(|b| {
            if !nodes[b].is_terminal() {
                return Vec::new();
            }
            let mut partners: Vec<usize> = table
                .row(b)
                .iter()
                .flatten()
                .copied()
                .filter(|&p| p != b && nodes[p].is_terminal())
                .collect();
            partners.sort_unstable_by(|x, y| y.cmp(x));
            partners.dedup();
            partners.into_iter().map(|p| (b, p)).collect()
        })
        .collect();

    let direct: Vec<(usize, usize)> = direct.into_iter().flatten().collect();
    let reciprocal: Vec<(usize, usize)> = direct
        .iter()
        .filter(|&&(b, p)| nodes[b].depth > nodes[p].depth)
        .map(|&(b, p)| (p, b))
        .collect();

    direct.into_iter().chain(reciprocal).collect()
}

/// V list entries, computed separately for each depth.
///
/// For a box `b` with descent `s` and a non-terminal neighbour `c` of its parent in direction `d`,
/// the child of `c` with descent `f` sits at `(-s + 4d + f) / 2` box widths from `b`. It is part of
/// the V list unless that offset makes it adjacent to `b`.
fn v_pairs<const D: usize, T>(
    tree: &OrthantTree<D, T>,
    table: &NeighbourTable<D>,
) -> Vec<(usize, VListEntry<D>)>
where
    T: Float + Send + Sync,
{
    let nodes = tree.nodes();
    let octants = octants::<D>();
    let noctants = octants.len();

    // Offsets indexed by (direction, own octant, friend octant), None if adjacent
    let offsets: Vec<Option<[i64; D]>> = iproduct!(table.directions(), &octants, &octants)
        .map(|(direction, own, friend)| {
            let mut offset = [0; D];
            for (i, o) in offset.iter_mut().enumerate() {
                *o = (-own[i] + 4 * direction[i] + friend[i]) / 2;
            }
            offset.iter().any(|o| o.abs() > 1).then_some(offset)
        })
        .collect();

    let per_depth: Vec<Vec<(usize, VListEntry<D>)>> = (0..=tree.depth())
        .into_par_iter()
        .map(|depth| {
            let mut result = Vec::new();
            for &b in tree.boxes_at_depth(depth) {
                let node = &nodes[b];
                let Some(parent) = node.parent else {
                    continue;
                };
                let own = octant_index(&node.descent);

                for (d, colleague) in table.row(parent).iter().enumerate() {
                    let Some(first_child) = colleague.and_then(|c| nodes[c].first_child) else {
                        continue;
                    };
                    for f in 0..noctants {
                        if let Some(offset) = offsets[(d * noctants + own) * noctants + f] {
                            result.push((
                                b,
                                VListEntry {
                                    friend: first_child + f,
                                    offset,
                                    depth,
                                },
                            ));
                        }
                    }
                }
            }
            result
        })
        .collect();

    per_depth.into_iter().flatten().collect()
}

/// Pairs of a leaf and a W list box.
///
/// Starting from the non-terminal neighbours of a leaf at its own depth, children that lie on the
/// far side of the neighbour in the direction of travel are not adjacent to the leaf and belong to
/// its W list. Children on the near side are adjacent, and if they are not leaves their children
/// are examined in turn.
fn w_pairs<const D: usize, T>(nodes: &[Node<D, T>], table: &NeighbourTable<D>) -> Vec<(usize, usize)>
where
    T: Float + Send + Sync,
{
    let per_box: Vec<Vec<(usize, usize)>> = (0..nodes.len())
        .into_par_iter()
        .map(|b| {
            let node = &nodes[b];
            let mut result = Vec::new();
            if !node.is_terminal() {
                return result;
            }

            let mut frontier: Vec<(usize, &[i64; D])> = table
                .row(b)
                .iter()
                .zip(table.directions())
                .filter_map(|(&colleague, direction)| {
                    colleague
                        .filter(|&c| nodes[c].depth == node.depth && !nodes[c].is_terminal())
                        .map(|c| (c, direction))
                })
                .collect();

            while !frontier.is_empty() {
                let mut next = Vec::new();
                for (parent, direction) in frontier {
                    for friend in nodes[parent].children().into_iter().flatten() {
                        let distant = nodes[friend]
                            .descent
                            .iter()
                            .zip(direction.iter())
                            .any(|(s, d)| s == d);

                        if distant {
                            result.push((b, friend));
                        } else if !nodes[friend].is_terminal() {
                            next.push((friend, direction));
                        }
                    }
                }
                frontier = next;
            }
            result
        })
        .collect();

    per_box.into_iter().flatten().collect()
}
