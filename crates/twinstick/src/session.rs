//! Play/pause orchestration around the simulation
//!
//! Pausing never reaches into the simulation: a paused frame simply does
//! not call [`SimulationStep::step`], so every timer, queue and entity is
//! left exactly as it was.

use crate::simulation::{FrameInput, FrameStats, SimulationStep};

/// Whether frames advance the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Frames advance the simulation
    #[default]
    Playing,
    /// Frames are skipped
    Paused,
}

/// A running game
pub struct Session {
    simulation: SimulationStep,
    state: SessionState,
}

impl Session {
    /// Start playing `simulation`
    pub const fn new(simulation: SimulationStep) -> Self {
        Self {
            simulation,
            state: SessionState::Playing,
        }
    }

    /// Flip between playing and paused; returns the new state
    pub fn toggle_pause(&mut self) -> SessionState {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
        };
        match self.state {
            SessionState::Playing => log::info!("Session resumed"),
            SessionState::Paused => log::info!("Session paused"),
        }
        self.state
    }

    /// Run one frame; `None` when paused
    pub fn frame(&mut self, dt: f32, input: &FrameInput) -> Option<&FrameStats> {
        match self.state {
            SessionState::Playing => Some(self.simulation.step(dt, input)),
            SessionState::Paused => None,
        }
    }

    /// Current state
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Whether frames are being skipped
    pub fn is_paused(&self) -> bool {
        self.state == SessionState::Paused
    }

    /// The wrapped simulation
    pub const fn simulation(&self) -> &SimulationStep {
        &self.simulation
    }

    /// The wrapped simulation, mutably
    pub fn simulation_mut(&mut self) -> &mut SimulationStep {
        &mut self.simulation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_toggle_pause() {
        let simulation = SimulationStep::with_seed(GameConfig::default(), 1).unwrap();
        let mut session = Session::new(simulation);
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.toggle_pause(), SessionState::Paused);
        assert!(session.is_paused());
        assert_eq!(session.toggle_pause(), SessionState::Playing);
    }

    #[test]
    fn test_frame_runs_only_while_playing() {
        let simulation = SimulationStep::with_seed(GameConfig::default(), 1).unwrap();
        let mut session = Session::new(simulation);

        assert_eq!(session.frame(0.016, &FrameInput::idle()).map(|stats| stats.frame), Some(1));
        session.toggle_pause();
        assert!(session.frame(0.016, &FrameInput::idle()).is_none());
        assert_eq!(session.simulation().stats().frame, 1);
    }
}
