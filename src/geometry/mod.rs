//! Integer box geometry and neighbour direction tables.

pub mod grid_box;
pub mod neighbours;

pub use grid_box::{BoxPoints, GridBox, Index, flat_size};
pub use neighbours::{Connectivity, Full, Neighbours, Star};
