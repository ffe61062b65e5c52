//! Spatial partitioning for broad-phase queries
//!
//! A uniform grid rebuilt once per frame. Cheaper than a tree for a
//! bounded 2D arena whose entities are all roughly the same size.

pub mod grid;

pub use grid::{CellCoord, SpatialGrid};
