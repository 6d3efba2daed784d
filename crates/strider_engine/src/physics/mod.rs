//! Collision geometry and filtering
//!
//! Provides the axis-aligned box primitive used for all hit testing and
//! the layer masks that scope spatial queries to object categories.

pub mod bounds;
pub mod layers;

pub use bounds::{Axis, Bounds, Penetration};
pub use layers::Layers;
