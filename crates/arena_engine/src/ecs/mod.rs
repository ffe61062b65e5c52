//! Entity management
//!
//! The registry owns which entities exist and drives their per-frame
//! update and draw dispatch. Entities are plain values behind the
//! [`SimEntity`] capability trait; the game decides their variants.

pub mod entity;
pub mod registry;

pub use entity::SimEntity;
pub use registry::{DiscardReclaimer, EntityRegistry, Reclaim};
