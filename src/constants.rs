//! Crate wide constants

/// Default maximum number of sources, and independently of targets, held by a leaf box.
pub const DEFAULT_CAPACITY: usize = 8;

/// Default depth at which subdivision stops even if boxes remain overfull.
///
/// Coincident points can never be separated by halving, so without a bound construction would not
/// terminate. At depth 32 a box has a half-width of 2^-32 of the root.
pub const DEFAULT_MAX_DEPTH: u64 = 32;

/// Index of the root box.
pub const ROOT: usize = 0;
