//! Axis-aligned box primitive and exact intersection math
//!
//! `Bounds` is pure geometry: it carries no velocity or identity. The
//! rectangle is half-open, so two boxes that merely share an edge do not
//! intersect.

use crate::foundation::math::Vec2;

/// Axis of minimum separation for a resolved overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal axis
    X,
    /// Vertical axis
    Y,
}

/// Penetration of one box into another
///
/// Produced by the minimum-translation-axis method: overlap is measured on
/// both axes and the smaller one wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Axis along which separation is cheapest
    pub axis: Axis,
    /// Overlap depth along that axis (always positive)
    pub depth: f32,
    /// Translation that moves `self` out of `other` along the chosen axis
    pub push: Vec2,
}

/// An axis-aligned rectangle in play-area coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Bounds {
    /// Create a new box from its top-left corner and extents
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point of the box
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Check if a point lies inside the box (half-open on the far edges)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() &&
        point.y >= self.y && point.y < self.bottom()
    }

    /// Exact intersection test against another box
    ///
    /// Touching edges do not count as an intersection.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right() && self.right() > other.x &&
        self.y < other.bottom() && self.bottom() > other.y
    }

    /// Penetration depth and separation axis, if the boxes intersect
    ///
    /// Compares the overlap on X against the overlap on Y and picks the
    /// smaller as the separation axis. The returned push vector moves
    /// `self` out of `other`.
    pub fn penetration(&self, other: &Bounds) -> Option<Penetration> {
        if !self.intersects(other) {
            return None;
        }

        let overlap_x = (self.right().min(other.right())) - (self.x.max(other.x));
        let overlap_y = (self.bottom().min(other.bottom())) - (self.y.max(other.y));

        if overlap_x < overlap_y {
            let sign = if self.center().x < other.center().x { -1.0 } else { 1.0 };
            Some(Penetration {
                axis: Axis::X,
                depth: overlap_x,
                push: Vec2::new(sign * overlap_x, 0.0),
            })
        } else {
            let sign = if self.center().y < other.center().y { -1.0 } else { 1.0 };
            Some(Penetration {
                axis: Axis::Y,
                depth: overlap_y,
                push: Vec2::new(0.0, sign * overlap_y),
            })
        }
    }

    /// Copy of this box translated by an offset
    pub fn translated(&self, offset: Vec2) -> Bounds {
        Bounds::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}
