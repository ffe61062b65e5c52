//! Math utilities and types
//!
//! Provides the 2D vector and rectangle types the simulation works in.
//! World space is screen-like: origin at the top-left, Y grows downward.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Axis-aligned rectangle described by its top-left origin and extent
///
/// Intersection uses half-open intervals: rectangles that only share an
/// edge do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,

    /// Top edge
    pub y: f32,

    /// Width (non-negative)
    pub width: f32,

    /// Height (non-negative)
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from origin and extent
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle at `position` with the given `extent`
    pub fn from_position(position: Vec2, extent: Extent) -> Self {
        Self::new(position.x, position.y, extent.width, extent.height)
    }

    /// Top-left corner
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check whether two rectangles overlap with non-zero area
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Check whether a point lies inside the rectangle
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Fixed sprite extent used to derive bounds from a position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Width in world units
    pub width: f32,

    /// Height in world units
    pub height: f32,
}

impl Extent {
    /// Create a new extent
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Create a square extent
    pub const fn square(size: f32) -> Self {
        Self::new(size, size)
    }

    /// Half of the extent as a vector, the offset from origin to center
    pub fn half(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Extent of the playable world, supplied by the integrating layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Viewport width
    pub width: f32,

    /// Viewport height
    pub height: f32,
}

impl WorldBounds {
    /// Create world bounds from a viewport size
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Math utility functions
pub mod utils {
    use super::Vec2;

    /// Clamp a value between min and max
    ///
    /// Unlike `f32::clamp` this never panics when `max < min`; `min` wins,
    /// which is what an entity larger than the world needs.
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min {
            min
        } else if value > max {
            max.max(min)
        } else {
            value
        }
    }

    /// Normalize a vector, leaving the zero vector untouched
    pub fn normalize_or_zero(v: Vec2) -> Vec2 {
        let length = v.norm();
        if length > f32::EPSILON {
            v / length
        } else {
            Vec2::zeros()
        }
    }
}
