//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types (vectors, rectangles, world bounds)
//! - Object pooling
//! - Identity and handle types
//! - Frame timing
//! - Logging utilities

pub mod math;
pub mod memory;
pub mod collections;
pub mod time;
pub mod logging;
