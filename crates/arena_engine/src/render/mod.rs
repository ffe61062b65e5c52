//! Render sink consumed by entity draw hooks
//!
//! The simulation never touches pixels. Entities describe what to draw
//! through [`RenderSink`]; the integrating layer maps those calls onto its
//! own renderer.

use crate::foundation::math::Rect;
use serde::{Deserialize, Serialize};

/// RGBA color, components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque yellow
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    /// Opaque red
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque cyan
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);

    /// Opaque color from components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Opaque drawing surface handed to entity draw hooks
pub trait RenderSink {
    /// Draw a filled sprite covering `bounds`, tinted with `tint`
    fn draw_sprite(&mut self, bounds: Rect, tint: Color);
}

/// Surface that records draw calls instead of rendering them
///
/// Used by the headless driver and by tests.
#[derive(Debug, Default, Clone)]
pub struct DrawRecorder {
    calls: Vec<(Rect, Color)>,
}

impl DrawRecorder {
    /// Calls recorded since the last reset, in submission order
    pub fn calls(&self) -> &[(Rect, Color)] {
        &self.calls
    }

    /// Number of calls with the given tint
    pub fn count_tinted(&self, tint: Color) -> usize {
        self.calls.iter().filter(|(_, c)| *c == tint).count()
    }

    /// Forget recorded calls
    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl RenderSink for DrawRecorder {
    fn draw_sprite(&mut self, bounds: Rect, tint: Color) {
        self.calls.push((bounds, tint));
    }
}
