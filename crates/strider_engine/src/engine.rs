//! Core engine implementation
//!
//! The engine owns every subsystem and advances them in a fixed order
//! each step: input interpretation and state-machine physics, world-object
//! movement and spatial registration, the collision query against the
//! entity, animation/tween advance, and performance accounting. Collision
//! queries always see the position computed earlier in the same step and
//! run exactly once per step.

use thiserror::Error;

use crate::animation::Timeline;
use crate::core::config::GameConfig;
use crate::events::{EventBus, GameEvent};
use crate::foundation::math::Vec2;
use crate::foundation::time::Timer;
use crate::input::InputSnapshot;
use crate::motion::{MotionState, MotionStateMachine, ENTITY_ANIMATION_ID};
use crate::perf::{PerfMonitor, Phase};
use crate::physics::layers::Layers;
use crate::spatial::{GridConfig, SpatialGrid};
use crate::world::{ObjectKey, ObjectKind, ObjectManager};

/// Read-only motion/animation state for a rendering layer
#[derive(Debug, Clone, Copy)]
pub struct EntityView {
    /// Entity position (top-left corner)
    pub position: Vec2,
    /// Entity box extents
    pub size: Vec2,
    /// True while the entity is off the ground
    pub airborne: bool,
    /// Current motion state
    pub state: MotionState,
    /// Current animation frame value for the entity's clip
    pub animation_frame: u32,
}

/// Main engine struct
///
/// Coordinates the motion state machine, spatial index, object manager,
/// animation timeline, and performance monitor. An external driver calls
/// [`step`](Self::step) once per frame.
pub struct Engine {
    config: GameConfig,
    timer: Timer,
    machine: MotionStateMachine,
    grid: SpatialGrid,
    timeline: Timeline,
    objects: ObjectManager,
    perf: PerfMonitor,
    events: EventBus,
    game_over: bool,
    score: u32,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        config.validate().map_err(EngineError::ConfigError)?;

        let machine = MotionStateMachine::new(&config);
        let grid = SpatialGrid::new(GridConfig {
            cell_size: config.cell_size,
            width: config.play_width,
            height: config.play_height,
        });
        let objects = ObjectManager::new(config.pool_max_free);
        let perf = PerfMonitor::new(config.target_fps, config.quality_step, config.frame_history);

        Ok(Self {
            config,
            timer: Timer::new(),
            machine,
            grid,
            timeline: Timeline::new(),
            objects,
            perf,
            events: EventBus::new(),
            game_over: false,
            score: 0,
        })
    }

    /// Advance the simulation by one step
    pub fn step(&mut self, input: &InputSnapshot) {
        self.perf.begin_frame();
        self.timer.advance(input.dt);

        // Input interpretation, state transitions, physics integration
        self.perf.span_start(Phase::Update);
        self.machine
            .update(input, &self.config, &mut self.timeline, &mut self.events);
        self.perf.span_end(Phase::Update);

        // World-object movement, spatial registration, collision query
        self.perf.span_start(Phase::Collision);
        self.objects.advance(input.dt);
        self.objects.despawn_offscreen(0.0);
        self.grid.clear();
        self.objects.register_all(&mut self.grid);
        self.resolve_collisions();
        self.perf.span_end(Phase::Collision);

        // Animation and tween advance
        self.perf.span_start(Phase::Animation);
        self.timeline.update(input.dt);
        self.perf.span_end(Phase::Animation);

        self.perf.end_frame();
    }

    /// Query the entity's bounds against the index and report outcomes
    fn resolve_collisions(&mut self) {
        let entity_bounds = self.machine.entity().bounds();
        let mut hits = self.grid.acquire_hits();
        self.grid
            .query(&entity_bounds, Layers::HAZARD | Layers::PICKUP, &mut hits);

        for hit in &hits {
            let Some(object) = self.objects.get(hit.key) else {
                continue;
            };
            match object.kind {
                ObjectKind::Hazard => {
                    if !self.game_over {
                        self.game_over = true;
                        log::info!("fatal collision with {:?}", hit.key);
                        self.events
                            .dispatch(&GameEvent::FatalCollision { object: hit.key });
                    }
                }
                ObjectKind::Pickup => {
                    if !object.consumed {
                        let value = object.value;
                        self.objects.mark_consumed(hit.key);
                        self.score += value;
                        self.events.dispatch(&GameEvent::PickupCollected {
                            object: hit.key,
                            value,
                        });
                    }
                }
            }
        }

        self.grid.release_hits(hits);
    }

    /// Spawn a hazard moving at `velocity`
    pub fn spawn_hazard(&mut self, position: Vec2, size: Vec2, velocity: Vec2, damage: u32) -> ObjectKey {
        self.objects.spawn_hazard(position, size, velocity, damage)
    }

    /// Spawn a pickup worth `score` points
    pub fn spawn_pickup(&mut self, position: Vec2, size: Vec2, velocity: Vec2, score: u32) -> ObjectKey {
        self.objects.spawn_pickup(position, size, velocity, score)
    }

    /// Read-only view of the entity for rendering
    pub fn view(&self) -> EntityView {
        let entity = self.machine.entity();
        EntityView {
            position: entity.position,
            size: entity.size,
            airborne: entity.is_airborne(),
            state: entity.state,
            animation_frame: self.timeline.current_frame(ENTITY_ANIMATION_ID),
        }
    }

    /// The engine's configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Accumulated score from collected pickups
    pub fn score(&self) -> u32 {
        self.score
    }

    /// True once the entity has hit a hazard
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Total frames stepped
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }

    /// The event bus for subscriptions
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// The animation timeline (clip registration, tween creation)
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    /// The performance monitor
    pub fn perf(&self) -> &PerfMonitor {
        &self.perf
    }

    /// The world-object manager
    pub fn objects(&self) -> &ObjectManager {
        &self.objects
    }

    /// Mutable world-object access, e.g. for host behavior scripts
    pub fn objects_mut(&mut self) -> &mut ObjectManager {
        &mut self.objects
    }

    /// The motion state machine
    pub fn machine(&self) -> &MotionStateMachine {
        &self.machine
    }

    /// Restart: entity, objects, score, and game-over flag return to
    /// initial values; subscriptions and registered clips survive
    pub fn reset(&mut self) {
        log::info!("Resetting engine state");
        self.machine
            .reset(&self.config, &mut self.timeline, &mut self.events);
        self.objects.reset(self.config.pool_trim_floor);
        self.grid.clear();
        self.game_over = false;
        self.score = 0;
    }

    /// Trim pool free lists and truncate frame-time history
    pub fn cleanup(&mut self) {
        self.objects.trim_pool(self.config.pool_trim_floor);
        self.perf.cleanup();
        log::debug!("engine cleanup complete");
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Initialization error
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
