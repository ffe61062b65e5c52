//! # Twinstick
//!
//! Twin-stick arena shooter rules on top of `arena_engine`: players,
//! pooled bullets and hostiles, scoring with combos and the per-frame
//! simulation order that ties them together.

#![warn(missing_docs)]

pub mod config;
pub mod entities;
pub mod scoring;
pub mod session;
pub mod simulation;
pub mod spawner;

#[cfg(test)]
mod tests;

pub use config::GameConfig;
pub use entities::{Entity, EntityKind, EntitySnapshot};
pub use session::{Session, SessionState};
pub use simulation::{DestructionNotice, DestructionRecord, FrameInput, FrameStats, SimulationStep};
pub use spawner::{Aim, ShootCommand};
