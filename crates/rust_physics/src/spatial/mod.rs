//! Spatial partitioning data structures
//!
//! Provides the broad-phase acceleration structure used to cut all-pairs
//! collision checking down to a small candidate set.

mod hash_grid;

pub use hash_grid::{CellCoord, SpatialHashGrid};
