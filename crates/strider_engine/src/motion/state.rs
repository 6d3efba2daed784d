//! Motion states and the per-state behavior table
//!
//! Each state is a tag in a closed enumeration; its behavior lives in a
//! static [`StateBehavior`] record of enter/update/exit functions plus the
//! set of states it may legally transition to. The machine evaluates the
//! current state's `update` once per step and applies whatever transition
//! it returns.

use crate::core::config::GameConfig;
use crate::input::InputSnapshot;
use crate::motion::entity::MotionEntity;

/// The closed set of motion states
///
/// The machine cycles indefinitely; there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionState {
    /// Grounded, no horizontal input
    Idle,
    /// Grounded, moving horizontally
    Running,
    /// Airborne, moving upward
    Jumping,
    /// Airborne, moving downward
    Falling,
    /// Grounded recovery window after a fall
    Landing,
}

/// Behavior record backing one state
pub struct StateBehavior {
    /// State-specific initialization on entry
    pub enter: fn(&mut MotionEntity, &GameConfig),
    /// Per-step behavior; returns the next state, or `None` for no change
    pub update: fn(&mut MotionEntity, &InputSnapshot, &GameConfig, f64) -> Option<MotionState>,
    /// Teardown on exit
    pub exit: fn(&mut MotionEntity),
    /// States this one may legally transition to (non-forced)
    pub allowed: &'static [MotionState],
}

impl MotionState {
    /// The behavior record for this state
    pub fn behavior(self) -> &'static StateBehavior {
        match self {
            MotionState::Idle => &IDLE,
            MotionState::Running => &RUNNING,
            MotionState::Jumping => &JUMPING,
            MotionState::Falling => &FALLING,
            MotionState::Landing => &LANDING,
        }
    }

    /// Name of the animation clip played while in this state
    pub fn clip_name(self) -> &'static str {
        match self {
            MotionState::Idle => "idle",
            MotionState::Running => "run",
            MotionState::Jumping => "jump",
            MotionState::Falling => "fall",
            MotionState::Landing => "land",
        }
    }
}

static IDLE: StateBehavior = StateBehavior {
    enter: idle_enter,
    update: idle_update,
    exit: no_exit,
    allowed: &[MotionState::Jumping, MotionState::Running, MotionState::Falling],
};

static RUNNING: StateBehavior = StateBehavior {
    enter: no_enter,
    update: running_update,
    exit: no_exit,
    allowed: &[MotionState::Jumping, MotionState::Idle, MotionState::Falling],
};

static JUMPING: StateBehavior = StateBehavior {
    enter: jumping_enter,
    update: jumping_update,
    exit: no_exit,
    allowed: &[MotionState::Falling, MotionState::Running, MotionState::Idle],
};

static FALLING: StateBehavior = StateBehavior {
    enter: no_enter,
    update: falling_update,
    exit: no_exit,
    allowed: &[MotionState::Landing, MotionState::Jumping],
};

static LANDING: StateBehavior = StateBehavior {
    enter: landing_enter,
    update: landing_update,
    exit: no_exit,
    allowed: &[MotionState::Running, MotionState::Idle, MotionState::Jumping],
};

fn no_enter(_entity: &mut MotionEntity, _config: &GameConfig) {}

fn no_exit(_entity: &mut MotionEntity) {}

fn idle_enter(entity: &mut MotionEntity, _config: &GameConfig) {
    entity.horizontal_velocity = 0.0;
}

fn idle_update(
    entity: &mut MotionEntity,
    input: &InputSnapshot,
    config: &GameConfig,
    now: f64,
) -> Option<MotionState> {
    entity.integrate_vertical(config.gravity, config.ground_y, input.dt, now);

    if input.jump_requested && entity.can_jump(now) {
        return Some(MotionState::Jumping);
    }
    if input.has_horizontal() {
        return Some(MotionState::Running);
    }
    if entity.is_airborne() && entity.vertical_velocity > 0.0 {
        return Some(MotionState::Falling);
    }
    None
}

fn running_update(
    entity: &mut MotionEntity,
    input: &InputSnapshot,
    config: &GameConfig,
    now: f64,
) -> Option<MotionState> {
    entity.apply_horizontal(input.horizontal_dir(), config.run_speed, config.play_width, input.dt);
    entity.integrate_vertical(config.gravity, config.ground_y, input.dt, now);

    if input.jump_requested && entity.can_jump(now) {
        return Some(MotionState::Jumping);
    }
    if !input.has_horizontal() {
        return Some(MotionState::Idle);
    }
    if entity.is_airborne() && entity.vertical_velocity > 0.0 {
        return Some(MotionState::Falling);
    }
    None
}

fn jumping_enter(entity: &mut MotionEntity, config: &GameConfig) {
    entity.launch(config.jump_impulse);
    // Consume the coyote allowance so midair re-jumps are impossible
    entity.last_grounded_at = f64::NEG_INFINITY;
}

fn jumping_update(
    entity: &mut MotionEntity,
    input: &InputSnapshot,
    config: &GameConfig,
    now: f64,
) -> Option<MotionState> {
    // Air control at run speed
    entity.apply_horizontal(input.horizontal_dir(), config.run_speed, config.play_width, input.dt);
    let landed = entity.integrate_vertical(config.gravity, config.ground_y, input.dt, now);

    if entity.is_airborne() && entity.vertical_velocity > 0.0 {
        // Apex passed
        return Some(MotionState::Falling);
    }
    if landed && input.has_horizontal() {
        return Some(MotionState::Running);
    }
    if landed {
        return Some(MotionState::Idle);
    }
    None
}

fn falling_update(
    entity: &mut MotionEntity,
    input: &InputSnapshot,
    config: &GameConfig,
    now: f64,
) -> Option<MotionState> {
    entity.apply_horizontal(input.horizontal_dir(), config.run_speed, config.play_width, input.dt);
    let landed = entity.integrate_vertical(config.gravity, config.ground_y, input.dt, now);

    if landed {
        return Some(MotionState::Landing);
    }
    if input.jump_requested && entity.can_jump(now) {
        // Coyote window: jump input shortly after leaving the ground
        return Some(MotionState::Jumping);
    }
    None
}

fn landing_enter(entity: &mut MotionEntity, _config: &GameConfig) {
    entity.vertical_velocity = 0.0;
    entity.grounded = true;
    entity.horizontal_velocity = 0.0;
}

fn landing_update(
    entity: &mut MotionEntity,
    input: &InputSnapshot,
    config: &GameConfig,
    now: f64,
) -> Option<MotionState> {
    if input.jump_requested && entity.can_jump(now) {
        return Some(MotionState::Jumping);
    }
    if entity.time_in_state(now) >= config.landing_grace {
        if input.has_horizontal() {
            return Some(MotionState::Running);
        }
        return Some(MotionState::Idle);
    }
    None
}
