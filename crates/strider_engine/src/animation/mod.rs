//! Frame animation and value tweening
//!
//! A [`Timeline`] plays registered frame clips under caller-chosen ids and
//! drives numeric tweens toward target values. Everything advances from
//! the single `update(dt)` call made once per frame.

mod clip;
mod easing;
mod timeline;

pub use clip::{AnimationClip, AnimationInstance};
pub use easing::Easing;
pub use timeline::{Timeline, TweenKey};
