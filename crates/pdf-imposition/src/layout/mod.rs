//! Layout calculation modules for imposition
//!
//! This module handles the geometric side of imposition:
//! - Grid shapes and cell geometry
//! - Page ordering (which source page goes in which cell, and how it is turned)
//! - Content placement (rotation, scaling, centering)

mod grid;
mod order;
mod placement;
mod types;

pub use grid::*;
pub use order::*;
pub use placement::*;
pub use types::*;
