//! Entity capability trait

use crate::foundation::collections::InstanceId;
use crate::foundation::math::{Vec2, WorldBounds};
use crate::physics::Collidable;
use crate::render::RenderSink;

/// Everything the registry needs from a simulated entity
///
/// Bounds come from [`Collidable`] and must be derived from the current
/// position on every call.
pub trait SimEntity: Collidable {
    /// Physical identity; registry membership is keyed on it
    fn instance_id(&self) -> InstanceId;

    /// Current top-left position
    fn position(&self) -> Vec2;

    /// Advance motion by `dt` seconds and deactivate if out of `world`
    fn update(&mut self, dt: f32, world: WorldBounds);

    /// Submit draw calls for this entity
    fn draw(&self, surface: &mut dyn RenderSink);
}
