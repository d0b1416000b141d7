//! Child and neighbour lookup on orthant trees.
use num::Float;

use crate::tree::helpers::{is_direction, is_octant, octant_index};
use crate::tree::types::{Node, OrthantTree};
use crate::types::{Error, Result};

impl<const D: usize, T: Float> OrthantTree<D, T> {
    fn checked_node(&self, index: usize) -> Result<&Node<D, T>> {
        self.nodes.get(index).ok_or(Error::BoxOutOfRange {
            index,
            nboxes: self.nodes.len(),
        })
    }

    /// Child of a box occupying a given octant.
    ///
    /// # Arguments
    /// * `index` - A non-terminal box.
    /// * `octant` - Sign pattern with entries `-1` or `+1`.
    pub fn child(&self, index: usize, octant: &[i64; D]) -> Result<usize> {
        let node = self.checked_node(index)?;
        if !is_octant(octant) {
            return Err(Error::InvalidOctant(octant.to_vec()));
        }
        let first_child = node.first_child.ok_or(Error::TerminalBox(index))?;
        Ok(first_child + octant_index(octant))
    }

    /// Box at the same depth as `index` in a given direction.
    ///
    /// Returns `None` if the direction leads out of the root box. If the neighbouring region is
    /// less refined than `index`, the returned box is the coarser leaf covering it, so callers
    /// must compare depths if they need a box at the same depth.
    ///
    /// # Arguments
    /// * `index` - Any box.
    /// * `direction` - Entries `-1`, `0` or `+1`, not all zero. Zero along an axis means the
    ///   neighbour is aligned with `index` along that axis.
    pub fn neighbour(&self, index: usize, direction: &[i64; D]) -> Result<Option<usize>> {
        self.checked_node(index)?;
        if !is_direction(direction) {
            return Err(Error::InvalidDirection(direction.to_vec()));
        }
        Ok(self.find_neighbour(index, direction))
    }

    /// Neighbour lookup for a valid box and direction.
    ///
    /// Climbs towards the root until the remaining direction vanishes, recording at each level the
    /// octant the neighbour's ancestor occupies, then descends along the recorded octants, stopping
    /// early at a leaf.
    pub(crate) fn find_neighbour(&self, index: usize, direction: &[i64; D]) -> Option<usize> {
        let mut direction = *direction;
        let mut current = Some(index);
        let mut targets = Vec::new();

        while direction.iter().any(|&d| d != 0) {
            let Some(c) = current else {
                break;
            };
            let node = &self.nodes[c];

            let mut target = [0; D];
            for ((t, d), &s) in target
                .iter_mut()
                .zip(direction.iter_mut())
                .zip(node.descent.iter())
            {
                *t = s * (1 - 2 * d.abs());
                // Integer division truncates towards zero, so the direction only survives if the
                // box sits on the side of its parent that it points to
                *d = (s + *d) / 2;
            }
            targets.push(target);
            current = node.parent;
        }

        let mut current = current?;
        for target in targets.iter().rev() {
            match self.nodes[current].first_child {
                Some(first_child) => current = first_child + octant_index(target),
                None => break,
            }
        }
        Some(current)
    }
}
