//! Physics module for collision detection
//!
//! Axis-aligned rectangle overlap only. Broad phase is a uniform grid
//! neighbourhood scan, narrow phase a half-open rectangle intersection.

pub mod collision;
pub mod collision_system;

pub use collision::{Collidable, ColliderLookup};
pub use collision_system::{CollisionDetector, CollisionEvent, CollisionKind};
