//! Trait definitions

mod interaction_lists;
mod tree;

pub use interaction_lists::InteractionLists;
pub use tree::Tree;
