//! Adaptive orthant trees over source and target points

mod builder;
pub mod helpers;
mod navigation;
mod traits_impl;
mod types;

pub use builder::OrthantTreeBuilder;
pub use types::{Node, OrthantTree, TreeOptions};
