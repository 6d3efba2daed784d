//! Spatial partitioning data structures
//!
//! Provides the uniform-grid broad phase used to cull collision candidates
//! before exact AABB testing.

mod grid;

pub use grid::{GridConfig, QueryHit, SpatialGrid};
