//! Transient world objects and their allocation lifecycle
//!
//! Hazards and pickups stream through the play area, live for a few
//! seconds, and despawn off-screen. Instances are recycled through an
//! [`ObjectPool`] rather than allocated per spawn; live objects sit in a
//! slotmap so the spatial index can reference them by stable key.

pub mod pool;

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::Vec2;
use crate::physics::bounds::Bounds;
use crate::physics::layers::Layers;
use crate::spatial::SpatialGrid;
use crate::world::pool::ObjectPool;

new_key_type! {
    /// Stable key for a live world object
    pub struct ObjectKey;
}

/// Category of a world object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectKind {
    /// Lethal on contact
    #[default]
    Hazard,
    /// Awards score on contact
    Pickup,
}

/// A reusable world object
///
/// Spawn code must overwrite every field after acquiring an instance;
/// the pool's reset only restores the inert initial state.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldObject {
    /// Top-left corner in play-area coordinates
    pub position: Vec2,
    /// Box extents
    pub size: Vec2,
    /// Units per second; hazards and pickups drift with the world scroll
    pub velocity: Vec2,
    /// Hazard or pickup
    pub kind: ObjectKind,
    /// Set once a pickup has been collected; consumed objects no longer
    /// register for collision
    pub consumed: bool,
    /// Damage for hazards, score for pickups
    pub value: u32,
}

impl Default for WorldObject {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            size: Vec2::zeros(),
            velocity: Vec2::zeros(),
            kind: ObjectKind::Hazard,
            consumed: false,
            value: 0,
        }
    }
}

impl WorldObject {
    /// Restore every field to its initial value (the pool's reset function)
    pub fn clear(&mut self) {
        *self = WorldObject::default();
    }

    /// Current bounds of this object
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    /// Collision layer for this object's kind
    pub fn layer(&self) -> Layers {
        match self.kind {
            ObjectKind::Hazard => Layers::HAZARD,
            ObjectKind::Pickup => Layers::PICKUP,
        }
    }
}

/// Owns all live world objects and the pool they recycle through
pub struct ObjectManager {
    live: SlotMap<ObjectKey, WorldObject>,
    pool: ObjectPool<WorldObject>,
    despawn_scratch: Vec<ObjectKey>,
}

impl ObjectManager {
    /// Create a manager whose pool keeps at most `max_free` idle instances
    pub fn new(max_free: usize) -> Self {
        Self {
            live: SlotMap::with_key(),
            pool: ObjectPool::new(max_free, WorldObject::default, WorldObject::clear),
            despawn_scratch: Vec::new(),
        }
    }

    /// Spawn a hazard moving at `velocity`
    pub fn spawn_hazard(&mut self, position: Vec2, size: Vec2, velocity: Vec2, damage: u32) -> ObjectKey {
        self.spawn(ObjectKind::Hazard, position, size, velocity, damage)
    }

    /// Spawn a pickup worth `score` points
    pub fn spawn_pickup(&mut self, position: Vec2, size: Vec2, velocity: Vec2, score: u32) -> ObjectKey {
        self.spawn(ObjectKind::Pickup, position, size, velocity, score)
    }

    fn spawn(
        &mut self,
        kind: ObjectKind,
        position: Vec2,
        size: Vec2,
        velocity: Vec2,
        value: u32,
    ) -> ObjectKey {
        let mut object = self.pool.acquire();
        // Overwrite every field; pooled instances carry no frame data
        object.position = position;
        object.size = size;
        object.velocity = velocity;
        object.kind = kind;
        object.consumed = false;
        object.value = value;

        let key = self.live.insert(object);
        log::trace!("spawned {kind:?} {key:?} at ({}, {})", position.x, position.y);
        key
    }

    /// Integrate object velocities for this frame
    pub fn advance(&mut self, dt: f32) {
        for object in self.live.values_mut() {
            object.position += object.velocity * dt;
        }
    }

    /// Release every object whose box has scrolled past `left_edge`
    pub fn despawn_offscreen(&mut self, left_edge: f32) {
        self.despawn_scratch.clear();
        for (key, object) in &self.live {
            if object.bounds().right() < left_edge {
                self.despawn_scratch.push(key);
            }
        }
        for index in 0..self.despawn_scratch.len() {
            let key = self.despawn_scratch[index];
            if let Some(object) = self.live.remove(key) {
                self.pool.release(object);
            }
        }
    }

    /// Release a single object back to the pool
    pub fn despawn(&mut self, key: ObjectKey) -> bool {
        if let Some(object) = self.live.remove(key) {
            self.pool.release(object);
            true
        } else {
            false
        }
    }

    /// Register every live, unconsumed object into the spatial index
    pub fn register_all(&self, grid: &mut SpatialGrid) {
        for (key, object) in &self.live {
            if !object.consumed {
                grid.register(key, object.bounds(), object.layer());
            }
        }
    }

    /// Mark a pickup as collected; it stops registering for collision
    pub fn mark_consumed(&mut self, key: ObjectKey) -> bool {
        if let Some(object) = self.live.get_mut(key) {
            object.consumed = true;
            true
        } else {
            false
        }
    }

    /// Look up a live object
    pub fn get(&self, key: ObjectKey) -> Option<&WorldObject> {
        self.live.get(key)
    }

    /// Mutable lookup, e.g. for host-driven behavior scripts steering
    /// hazards between steps
    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut WorldObject> {
        self.live.get_mut(key)
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// True when no objects are live
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Release every live object and trim the pool's free list
    pub fn reset(&mut self, trim_floor: usize) {
        self.despawn_scratch.clear();
        self.despawn_scratch.extend(self.live.keys());
        for index in 0..self.despawn_scratch.len() {
            let key = self.despawn_scratch[index];
            if let Some(object) = self.live.remove(key) {
                self.pool.release(object);
            }
        }
        self.pool.trim(trim_floor);
    }

    /// Shrink the pool's free list (periodic cleanup)
    pub fn trim_pool(&mut self, floor: usize) {
        self.pool.trim(floor);
    }

    /// Pool statistics: (free, created, reused)
    pub fn pool_stats(&self) -> (usize, usize, usize) {
        (self.pool.free_len(), self.pool.created(), self.pool.reused())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::GridConfig;

    #[test]
    fn test_spawn_overwrites_pooled_instance() {
        let mut manager = ObjectManager::new(8);

        let key = manager.spawn_hazard(
            Vec2::new(100.0, 50.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(-60.0, 0.0),
            1,
        );
        manager.despawn(key);

        // Reused instance must show only the new spawn's data
        let key = manager.spawn_pickup(
            Vec2::new(300.0, 80.0),
            Vec2::new(12.0, 12.0),
            Vec2::new(-60.0, 0.0),
            10,
        );
        let object = manager.get(key).unwrap();
        assert_eq!(object.kind, ObjectKind::Pickup);
        assert_eq!(object.position, Vec2::new(300.0, 80.0));
        assert_eq!(object.value, 10);
        assert!(!object.consumed);

        let (_, created, reused) = manager.pool_stats();
        assert_eq!(created, 1);
        assert_eq!(reused, 1);
    }

    #[test]
    fn test_advance_moves_objects() {
        let mut manager = ObjectManager::new(8);
        let key = manager.spawn_hazard(
            Vec2::new(100.0, 50.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(-60.0, 0.0),
            1,
        );

        manager.advance(0.5);
        assert_eq!(manager.get(key).unwrap().position, Vec2::new(70.0, 50.0));
    }

    #[test]
    fn test_despawn_offscreen_releases_to_pool() {
        let mut manager = ObjectManager::new(8);
        manager.spawn_hazard(
            Vec2::new(-40.0, 50.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(0.0, 0.0),
            1,
        );
        let kept = manager.spawn_hazard(
            Vec2::new(200.0, 50.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(0.0, 0.0),
            1,
        );

        manager.despawn_offscreen(0.0);
        assert_eq!(manager.len(), 1);
        assert!(manager.get(kept).is_some());

        let (free, _, _) = manager.pool_stats();
        assert_eq!(free, 1);
    }

    #[test]
    fn test_consumed_objects_skip_registration() {
        let mut manager = ObjectManager::new(8);
        let key = manager.spawn_pickup(
            Vec2::new(50.0, 50.0),
            Vec2::new(16.0, 16.0),
            Vec2::zeros(),
            5,
        );
        manager.mark_consumed(key);

        let mut grid = SpatialGrid::new(GridConfig::default());
        manager.register_all(&mut grid);
        assert_eq!(grid.registered_count(), 0);
    }

    #[test]
    fn test_reset_releases_everything() {
        let mut manager = ObjectManager::new(8);
        for _ in 0..5 {
            manager.spawn_hazard(
                Vec2::new(100.0, 50.0),
                Vec2::new(20.0, 20.0),
                Vec2::zeros(),
                1,
            );
        }

        manager.reset(2);
        assert!(manager.is_empty());
        let (free, _, _) = manager.pool_stats();
        assert_eq!(free, 2);
    }
}
