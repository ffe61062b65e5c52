//! Collision capability shared by every collidable entity variant

use crate::foundation::math::Rect;

/// Capability required to take part in collision detection
pub trait Collidable {
    /// Inactive entities are skipped by every collision pass
    fn is_active(&self) -> bool;

    /// Current bounds, derived from live position every call
    fn bounds(&self) -> Rect;
}

/// Resolves grid item handles back to collidable entities
///
/// Grids only store handles; the detector uses this to read the
/// current active flag and bounds behind each one.
pub trait ColliderLookup<H> {
    /// The collidable behind `handle`, if it still exists
    fn collider(&self, handle: H) -> Option<&dyn Collidable>;
}
