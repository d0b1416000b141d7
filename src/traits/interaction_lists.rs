//! Interaction list traits

/// Interaction lists of an FMM, queried by box index. Boxes without a list of a given kind return
/// an empty slice.
pub trait InteractionLists {
    /// Entry of the V list.
    type VEntry;

    /// Near field of a leaf, the adjacent leaves evaluated directly (U list).
    fn u_list(&self, index: usize) -> &[usize];

    /// Well separated boxes of the same depth translated multipole to local (V list).
    fn v_list(&self, index: usize) -> &[Self::VEntry];

    /// Finer boxes, children of a neighbour of a leaf, that are not adjacent to it (W list).
    fn w_list(&self, index: usize) -> &[usize];

    /// Leaves that hold a box in their W list (X list).
    fn x_list(&self, index: usize) -> &[usize];
}
