//! The motion state machine
//!
//! Owns the controlled entity, advances its physics, evaluates the
//! transition table, and notifies listeners of every state change. Each
//! transition also requests playback of the state's animation clip.

use crate::animation::Timeline;
use crate::core::config::GameConfig;
use crate::events::{EventBus, GameEvent};
use crate::input::InputSnapshot;
use crate::motion::entity::MotionEntity;
use crate::motion::state::MotionState;

/// Timeline id under which the entity's clips play
pub const ENTITY_ANIMATION_ID: &str = "player";

/// Finite state machine driving the player entity
pub struct MotionStateMachine {
    entity: MotionEntity,
    clock: f64,
}

impl MotionStateMachine {
    /// Create the machine with a freshly initialized entity
    pub fn new(config: &GameConfig) -> Self {
        Self {
            entity: MotionEntity::new(config),
            clock: 0.0,
        }
    }

    /// Read access to the entity's motion state
    pub fn entity(&self) -> &MotionEntity {
        &self.entity
    }

    /// The machine's accumulated clock in seconds
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// True while a jump request would be honored (coyote-time aware)
    pub fn can_jump(&self) -> bool {
        self.entity.can_jump(self.clock)
    }

    /// Advance one step: interpret input, integrate physics, transition
    ///
    /// A delta larger than the configured multiple of the target frame
    /// time skips physics for the step so a stalled frame cannot tunnel
    /// the entity through thin objects.
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        config: &GameConfig,
        timeline: &mut Timeline,
        events: &mut EventBus,
    ) {
        self.clock += f64::from(input.dt);

        if input.dt > config.max_frame_scale * config.target_frame_time() {
            log::debug!(
                "frame delta {:.4}s exceeds budget; skipping physics step",
                input.dt
            );
            return;
        }

        let behavior = self.entity.state.behavior();
        if let Some(next) = (behavior.update)(&mut self.entity, input, config, self.clock) {
            self.transition(next, false, config, timeline, events);
        }
    }

    /// Request a transition, honoring the current state's allowed set
    ///
    /// Returns false and leaves the state unchanged when the target is not
    /// in the current state's transition table.
    pub fn try_set_state(
        &mut self,
        to: MotionState,
        config: &GameConfig,
        timeline: &mut Timeline,
        events: &mut EventBus,
    ) -> bool {
        self.transition(to, false, config, timeline, events)
    }

    /// Force a transition, bypassing the allowed-set check
    pub fn force_state(
        &mut self,
        to: MotionState,
        config: &GameConfig,
        timeline: &mut Timeline,
        events: &mut EventBus,
    ) {
        self.transition(to, true, config, timeline, events);
    }

    /// Restore the entity to its initial values and force `Idle`
    ///
    /// The machine clock keeps running so transition timestamps stay
    /// monotonic across restarts.
    pub fn reset(&mut self, config: &GameConfig, timeline: &mut Timeline, events: &mut EventBus) {
        let state = self.entity.state;
        let previous_state = self.entity.previous_state;
        let state_entered_at = self.entity.state_entered_at;

        self.entity = MotionEntity::new(config);
        self.entity.state = state;
        self.entity.previous_state = previous_state;
        self.entity.state_entered_at = state_entered_at;
        self.entity.last_grounded_at = self.clock;

        self.force_state(MotionState::Idle, config, timeline, events);
    }

    fn transition(
        &mut self,
        to: MotionState,
        forced: bool,
        config: &GameConfig,
        timeline: &mut Timeline,
        events: &mut EventBus,
    ) -> bool {
        let from = self.entity.state;

        if !forced && !from.behavior().allowed.contains(&to) {
            log::debug!("rejected transition {from:?} -> {to:?}");
            return false;
        }

        (from.behavior().exit)(&mut self.entity);
        self.entity.previous_state = from;
        self.entity.state = to;
        self.entity.state_entered_at = self.clock;
        (to.behavior().enter)(&mut self.entity, config);

        timeline.play(ENTITY_ANIMATION_ID, to.clip_name(), 1.0);
        events.dispatch(&GameEvent::StateChanged {
            from,
            to,
            timestamp: self.clock,
        });
        log::trace!("transition {from:?} -> {to:?} at {:.3}s", self.clock);
        true
    }
}
