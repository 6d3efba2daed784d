//! Player motion: entity state, finite state machine, physics integration
//!
//! The machine owns the single controlled entity, interprets input, and
//! drives the transition table. State behavior lives in a per-state
//! behavior table rather than a class hierarchy.

mod entity;
mod machine;
mod state;

pub use entity::MotionEntity;
pub use machine::{MotionStateMachine, ENTITY_ANIMATION_ID};
pub use state::{MotionState, StateBehavior};
