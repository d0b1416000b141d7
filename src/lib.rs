//! # Orthant trees for fast multipole methods
//!
//! Adaptive orthant trees (the `D` dimensional generalisation of quad and octrees) built over a
//! set of source points and a set of target points, together with the four interaction lists
//! (U, V, W and X) that a fast multipole method needs to decide which boxes interact directly and
//! which interact through multipole and local expansions.
//!
//! Points are expected to have been scaled into the root box, which is centred at the origin with
//! half-width one, i.e. every coordinate lies in `[-1, 1]`.
//!
//! ```
//! use orthantree::interaction_lists::InteractionScheme;
//! use orthantree::traits::InteractionLists;
//! use orthantree::tree::OrthantTreeBuilder;
//!
//! let sources = [[-0.5, -0.5], [-0.5, 0.5], [0.5, -0.5], [0.5, 0.5]];
//! let targets: [[f64; 2]; 0] = [];
//!
//! let tree = OrthantTreeBuilder::new()
//!     .capacity(1)
//!     .build(&sources, &targets)
//!     .unwrap();
//! let scheme = InteractionScheme::new(&tree).unwrap();
//!
//! assert_eq!(tree.nboxes(), 5);
//! assert_eq!(scheme.u_list(1).len(), 3);
//! ```
//!
//! ## References
//! \[1\] Greengard, Leslie, and Vladimir Rokhlin. "A fast algorithm for particle simulations."
//! Journal of Computational Physics 73.2 (1987): 325-348.
//!
//! \[2\] Ying, Lexing, George Biros, and Denis Zorin. "A kernel-independent adaptive fast multipole
//! algorithm in two and three dimensions." Journal of Computational Physics 196.2 (2004): 591-626.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod constants;
pub mod interaction_lists;
pub mod ragged;
pub mod traits;
pub mod tree;
pub mod types;
