//! Collision layer system for filtering collision detection
//!
//! Spatial queries take a layer mask so the caller only pays for the object
//! categories it cares about (hazard sweep vs pickup sweep).

use bitflags::bitflags;

bitflags! {
    /// Collision layer bitmask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Layers: u32 {
        /// The player entity
        const PLAYER = 1 << 0;
        /// Lethal world objects
        const HAZARD = 1 << 1;
        /// Collectible world objects
        const PICKUP = 1 << 2;
        /// Every layer
        const ALL = u32::MAX;
    }
}

impl Layers {
    /// Check if this layer set overlaps a query mask
    pub fn matches(&self, mask: Layers) -> bool {
        self.intersects(mask)
    }
}
