//! # Strider Engine
//!
//! The runtime core of a 2D side-scrolling action game.
//!
//! ## Features
//!
//! - **Motion State Machine**: player physics, input interpretation, and
//!   state transitions with coyote time and landing grace
//! - **Spatial Collision Index**: uniform-grid broad phase with exact AABB
//!   narrow phase and layer filtering
//! - **Animation Timeline**: per-id frame-clip playback and value tweening
//! - **Object Pooling**: bounded reuse of short-lived world objects
//! - **Adaptive Performance**: frame-time tracking and quality-factor control
//!
//! The crate performs no rendering, input polling, or UI work. An external
//! driver feeds one [`InputSnapshot`](input::InputSnapshot) per frame into
//! [`Engine::step`] and reads motion/animation state back out for display.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use strider_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let mut engine = Engine::new(GameConfig::default())?;
//!     engine.events_mut().subscribe(|event| {
//!         if let GameEvent::PickupCollected { value, .. } = event {
//!             println!("scored {value}");
//!         }
//!     });
//!
//!     loop {
//!         let input = InputSnapshot { right: true, dt: 1.0 / 60.0, ..Default::default() };
//!         engine.step(&input);
//!         if engine.is_game_over() {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod foundation;
pub mod events;
pub mod physics;
pub mod spatial;
pub mod input;
pub mod motion;
pub mod animation;
pub mod world;
pub mod perf;

mod engine;

pub use engine::{Engine, EngineError, EntityView};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Engine, EngineError, EntityView,
        core::config::{Config, ConfigError, GameConfig},
        foundation::{
            math::Vec2,
            time::{Stopwatch, Timer},
        },
        events::{EventBus, GameEvent, ListenerKey},
        physics::{bounds::Bounds, layers::Layers},
        spatial::{GridConfig, QueryHit, SpatialGrid},
        input::InputSnapshot,
        motion::{MotionEntity, MotionState, MotionStateMachine},
        animation::{AnimationClip, Easing, Timeline, TweenKey},
        world::{ObjectKey, ObjectKind, ObjectManager, WorldObject, pool::ObjectPool},
        perf::{PerfMonitor, Phase},
    };
}
