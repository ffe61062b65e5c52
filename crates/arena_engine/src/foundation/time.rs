//! Time management utilities

use std::time::{Duration, Instant};

/// Frame clock feeding `dt` into the simulation
///
/// Runs either from the wall clock or from a fixed step. A fixed step is
/// what the headless driver and tests use.
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: ClockMode,
    delta_time: f32,
    total_time: f64,
    frame_count: u64,
}

#[derive(Debug, Clone, Copy)]
enum ClockMode {
    WallClock { last_frame: Instant },
    Fixed { step: f32 },
}

impl FrameClock {
    /// Create a clock measuring real elapsed time between ticks
    pub fn wall_clock() -> Self {
        Self::with_mode(ClockMode::WallClock {
            last_frame: Instant::now(),
        })
    }

    /// Create a clock that advances by `step` seconds every tick
    pub fn fixed(step: f32) -> Self {
        Self::with_mode(ClockMode::Fixed { step })
    }

    fn with_mode(mode: ClockMode) -> Self {
        Self {
            mode,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance one frame and return its delta in seconds
    pub fn tick(&mut self) -> f32 {
        self.delta_time = match &mut self.mode {
            ClockMode::WallClock { last_frame } => {
                let now = Instant::now();
                let elapsed = now.duration_since(*last_frame);
                *last_frame = now;
                elapsed.as_secs_f32()
            }
            ClockMode::Fixed { step } => *step,
        };
        self.total_time += f64::from(self.delta_time);
        self.frame_count += 1;
        self.delta_time
    }

    /// Delta of the most recent tick
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total simulated seconds since creation
    pub const fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Number of ticks so far
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Simple stopwatch for measuring per-phase frame cost
pub struct Stopwatch {
    start_time: Instant,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start_new()
    }
}

impl Stopwatch {
    /// Create a stopwatch that starts immediately
    pub fn start_new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Elapsed time since start or the last lap
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Return the elapsed time and restart from now
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time);
        self.start_time = now;
        elapsed
    }
}
