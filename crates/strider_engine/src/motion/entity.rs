//! Motion-state record for the controlled entity

use crate::core::config::GameConfig;
use crate::foundation::math::Vec2;
use crate::physics::bounds::Bounds;
use crate::motion::state::MotionState;

/// The player entity's motion state
///
/// Created once at game start, mutated every frame by the state machine,
/// reset to initial values on restart.
///
/// Invariant: `grounded` implies `vertical_velocity == 0`.
#[derive(Debug, Clone)]
pub struct MotionEntity {
    /// Top-left corner; `position.y` sits on the ground reference line
    /// when grounded
    pub position: Vec2,
    /// Box extents
    pub size: Vec2,
    /// Units per second, positive rightward
    pub horizontal_velocity: f32,
    /// Units per second, positive downward (screen coordinates)
    pub vertical_velocity: f32,
    /// True while resting on the ground reference line
    pub grounded: bool,
    /// Current motion state
    pub state: MotionState,
    /// State before the most recent transition
    pub previous_state: MotionState,
    /// Machine clock at the most recent transition (seconds)
    pub state_entered_at: f64,
    /// Machine clock when the entity last touched the ground (seconds)
    pub last_grounded_at: f64,
    /// Grace period after leaving the ground during which jump input is
    /// still honored (seconds)
    pub coyote_window: f32,
}

impl MotionEntity {
    /// Create the entity at its initial grounded position
    pub fn new(config: &GameConfig) -> Self {
        Self {
            position: Vec2::new(config.start_x, config.ground_y),
            size: Vec2::new(config.entity_width, config.entity_height),
            horizontal_velocity: 0.0,
            vertical_velocity: 0.0,
            grounded: true,
            state: MotionState::Idle,
            previous_state: MotionState::Idle,
            state_entered_at: 0.0,
            last_grounded_at: 0.0,
            coyote_window: config.coyote_window,
        }
    }

    /// Current bounds of the entity
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    /// True while not resting on the ground
    pub fn is_airborne(&self) -> bool {
        !self.grounded
    }

    /// Apply horizontal movement, clamped to the play area
    pub fn apply_horizontal(&mut self, dir: f32, speed: f32, play_width: f32, dt: f32) {
        self.horizontal_velocity = dir * speed;
        let max_x = (play_width - self.size.x).max(0.0);
        self.position.x = (self.position.x + self.horizontal_velocity * dt).clamp(0.0, max_x);
    }

    /// Integrate vertical motion for one step while airborne
    ///
    /// Position moves by the current velocity first, then gravity
    /// accelerates the velocity; reaching the ground reference line clamps
    /// position to it, zeroes vertical velocity, and re-grounds the
    /// entity. Returns true if the entity landed this step.
    pub fn integrate_vertical(&mut self, gravity: f32, ground_y: f32, dt: f32, now: f64) -> bool {
        if self.grounded {
            self.last_grounded_at = now;
            return false;
        }

        self.position.y += self.vertical_velocity * dt;

        if self.position.y >= ground_y {
            self.position.y = ground_y;
            self.vertical_velocity = 0.0;
            self.grounded = true;
            self.last_grounded_at = now;
            true
        } else {
            self.vertical_velocity += gravity * dt;
            false
        }
    }

    /// Leave the ground with an upward launch impulse
    pub fn launch(&mut self, impulse: f32) {
        self.vertical_velocity = -impulse;
        self.grounded = false;
    }

    /// Time spent in the current state as of `now`
    pub fn time_in_state(&self, now: f64) -> f32 {
        (now - self.state_entered_at).max(0.0) as f32
    }

    /// True while a jump request would be honored
    ///
    /// Grounded entities can always jump; airborne ones only within the
    /// coyote window after leaving the ground.
    pub fn can_jump(&self, now: f64) -> bool {
        self.grounded || (now - self.last_grounded_at) <= f64::from(self.coyote_window)
    }
}
