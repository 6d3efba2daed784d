//! Game event bus
//!
//! State transitions and game-progress outcomes are delivered synchronously
//! to subscribed listeners. Subscriptions are handle-based: `subscribe`
//! returns a key that `unsubscribe` takes back.
//!
//! Delivery is fault-isolated per listener: a panicking subscriber is
//! caught and logged, and the remaining listeners still receive the event.
//! The bus itself is never corrupted by a subscriber's failure.

use std::panic::{catch_unwind, AssertUnwindSafe};

use slotmap::{new_key_type, SlotMap};

use crate::motion::MotionState;
use crate::world::ObjectKey;

new_key_type! {
    /// Handle identifying one subscription
    pub struct ListenerKey;
}

/// Events emitted by the engine core
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// The motion state machine transitioned
    StateChanged {
        /// State being left
        from: MotionState,
        /// State being entered
        to: MotionState,
        /// Machine clock at the moment of transition (seconds)
        timestamp: f64,
    },
    /// The entity intersected a hazard; the run is over
    FatalCollision {
        /// The hazard that was hit
        object: ObjectKey,
    },
    /// The entity collected a pickup
    PickupCollected {
        /// The consumed object
        object: ObjectKey,
        /// Score awarded by the pickup
        value: u32,
    },
}

type Listener = Box<dyn FnMut(&GameEvent)>;

/// Synchronous event dispatcher with per-listener fault isolation
#[derive(Default)]
pub struct EventBus {
    listeners: SlotMap<ListenerKey, Listener>,
}

impl EventBus {
    /// Create a new empty bus
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
        }
    }

    /// Register a listener; the returned key unsubscribes it later
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> ListenerKey {
        self.listeners.insert(Box::new(listener))
    }

    /// Remove a listener; returns false if the handle was already gone
    pub fn unsubscribe(&mut self, key: ListenerKey) -> bool {
        self.listeners.remove(key).is_some()
    }

    /// Number of active subscriptions
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver an event to every listener
    ///
    /// A listener that panics is logged and skipped; delivery continues
    /// with the remaining listeners.
    pub fn dispatch(&mut self, event: &GameEvent) {
        for (key, listener) in &mut self.listeners {
            let outcome = catch_unwind(AssertUnwindSafe(|| listener(event)));
            if outcome.is_err() {
                log::error!("event listener {key:?} panicked on {event:?}; continuing delivery");
            }
        }
    }
}
