//! Score and combo rules applied to drained destruction records

use crate::config::ScoringConfig;

/// Kill streak with a decaying timeout
#[derive(Debug, Clone, PartialEq)]
pub struct ComboTracker {
    count: u32,
    timer: f32,
    timeout: f32,
    step: u32,
}

impl ComboTracker {
    /// Tracker resetting after `timeout` seconds, stepping the multiplier every `step` kills
    pub fn new(timeout: f32, step: u32) -> Self {
        Self {
            count: 0,
            timer: 0.0,
            timeout,
            step: step.max(1),
        }
    }

    /// Count one kill and restart the timeout
    pub fn add(&mut self) {
        self.count += 1;
        self.timer = self.timeout;
    }

    /// Let `dt` seconds pass; the streak ends when the timer runs out
    pub fn tick(&mut self, dt: f32) {
        if self.timer > 0.0 {
            self.timer -= dt;
            if self.timer <= 0.0 {
                self.timer = 0.0;
                self.count = 0;
            }
        }
    }

    /// Current score multiplier, at least 1
    pub const fn multiplier(&self) -> u32 {
        let steps = self.count / self.step;
        if steps > 1 {
            steps
        } else {
            1
        }
    }

    /// Kills in the current streak
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// End the streak immediately
    pub fn reset(&mut self) {
        self.count = 0;
        self.timer = 0.0;
    }
}

/// Shared score state mutated while draining destruction records
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBoard {
    score: u64,
    base_points: u64,
    combo: ComboTracker,
}

impl ScoreBoard {
    /// Empty board for `config`
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            score: 0,
            base_points: config.base_points,
            combo: ComboTracker::new(config.combo_timeout, config.combo_step),
        }
    }

    /// Apply one destroyed hostile; returns the points awarded
    pub fn award(&mut self) -> u64 {
        self.combo.add();
        let points = self.base_points * u64::from(self.combo.multiplier());
        self.score += points;
        points
    }

    /// Let combo time pass
    pub fn tick(&mut self, dt: f32) {
        self.combo.tick(dt);
    }

    /// Total score
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Combo state
    pub const fn combo(&self) -> &ComboTracker {
        &self.combo
    }

    /// Zero the score and end the streak
    pub fn reset(&mut self) {
        self.score = 0;
        self.combo.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_steps() {
        let mut combo = ComboTracker::new(3.0, 3);
        for expected in [1, 1, 1, 1, 1, 2, 2, 2, 3] {
            combo.add();
            assert_eq!(combo.multiplier(), expected, "after {} kills", combo.count());
        }
    }

    #[test]
    fn test_combo_times_out() {
        let mut combo = ComboTracker::new(3.0, 3);
        combo.add();
        combo.add();
        combo.tick(2.0);
        assert_eq!(combo.count(), 2);
        combo.add();
        combo.tick(2.5);
        assert_eq!(combo.count(), 3, "add() restarts the timeout");
        combo.tick(0.5);
        assert_eq!(combo.count(), 0);
        assert_eq!(combo.multiplier(), 1);
    }

    #[test]
    fn test_scoreboard_awards_base_times_multiplier() {
        let mut board = ScoreBoard::new(&ScoringConfig::default());
        let points: Vec<u64> = (0..6).map(|_| board.award()).collect();
        assert_eq!(points, vec![100, 100, 100, 100, 100, 200]);
        assert_eq!(board.score(), 700);

        board.reset();
        assert_eq!(board.score(), 0);
        assert_eq!(board.combo().count(), 0);
    }
}
