//! Implementation of the tree trait for orthant trees
use num::Float;

use crate::traits::Tree;
use crate::tree::types::{Node, OrthantTree};
use crate::types::Result;

impl<const D: usize, T: Float> Tree for OrthantTree<D, T> {
    type Scalar = T;
    type Node = Node<D, T>;
    type Offset = [i64; D];

    fn nboxes(&self) -> usize {
        OrthantTree::nboxes(self)
    }

    fn depth(&self) -> u64 {
        OrthantTree::depth(self)
    }

    fn node(&self, index: usize) -> Option<&Self::Node> {
        OrthantTree::node(self, index)
    }

    fn nodes(&self) -> &[Self::Node] {
        OrthantTree::nodes(self)
    }

    fn boxes_at_depth(&self, depth: u64) -> &[usize] {
        OrthantTree::boxes_at_depth(self, depth)
    }

    fn source_leaves(&self) -> &[usize] {
        OrthantTree::source_leaves(self)
    }

    fn target_leaves(&self) -> &[usize] {
        OrthantTree::target_leaves(self)
    }

    fn child(&self, index: usize, octant: &Self::Offset) -> Result<usize> {
        OrthantTree::child(self, index, octant)
    }

    fn neighbour(&self, index: usize, direction: &Self::Offset) -> Result<Option<usize>> {
        OrthantTree::neighbour(self, index, direction)
    }
}
