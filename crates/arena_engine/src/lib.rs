//! # Arena Engine
//!
//! Real-time 2D entity simulation core for arena shooters.
//!
//! ## Features
//!
//! - **Spatial Grid**: uniform broad-phase partitioning rebuilt every frame
//! - **Object Pools**: recycled entity instances with unbounded fallback
//! - **Collision Detection**: first-hit grid neighbourhood scan
//! - **Entity Registry**: ordered update/draw dispatch and end-of-frame reclamation
//! - **Deferred Events**: rate-limited destruction queue and owned observer bus
//!
//! ## Quick Start
//!
//! ```rust
//! use arena_engine::prelude::*;
//!
//! let mut grid: SpatialGrid<u32> = SpatialGrid::new(800.0, 600.0, 64.0);
//! grid.insert(7, &Rect::new(100.0, 100.0, 8.0, 8.0));
//! assert_eq!(grid.cell_at(1, 1), &[7]);
//! ```

#![warn(missing_docs)]

pub mod foundation;
pub mod spatial;
pub mod physics;
pub mod ecs;
pub mod events;
pub mod render;
pub mod config;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        ecs::{DiscardReclaimer, EntityRegistry, Reclaim, SimEntity},
        events::{DestructionQueue, EventBus, EventHandler},
        foundation::{
            collections::{EntityId, InstanceId, TypedHandle},
            math::{Extent, Rect, Vec2, WorldBounds},
            memory::{ObjectPool, Poolable},
            time::{FrameClock, Stopwatch},
        },
        physics::{Collidable, ColliderLookup, CollisionDetector, CollisionEvent, CollisionKind},
        render::{Color, DrawRecorder, RenderSink},
        spatial::{CellCoord, SpatialGrid},
    };
}
