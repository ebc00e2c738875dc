//! Round lifecycle: in progress until the player dies, then ended for good

use serde::{Deserialize, Serialize};

/// Current round state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    InProgress,
    /// Terminal; holds the score at the moment of death
    Ended { final_score: u64 },
}

/// Two-state machine guarding the single `InProgress → Ended` transition
#[derive(Debug, Clone)]
pub struct RoundController {
    state: RoundState,
    /// Results screen is up and Confirm may restart
    results_shown: bool,
}

impl Default for RoundController {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundController {
    pub fn new() -> Self {
        Self {
            state: RoundState::InProgress,
            results_shown: false,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn in_progress(&self) -> bool {
        self.state == RoundState::InProgress
    }

    pub fn final_score(&self) -> Option<u64> {
        match self.state {
            RoundState::InProgress => None,
            RoundState::Ended { final_score } => Some(final_score),
        }
    }

    /// End the round. Only the first call transitions; later calls return false.
    pub fn end(&mut self, final_score: u64) -> bool {
        if !self.in_progress() {
            return false;
        }
        self.state = RoundState::Ended { final_score };
        true
    }

    /// Mark the results screen visible. Returns the final score the first time.
    pub fn show_results(&mut self) -> Option<u64> {
        if self.results_shown {
            return None;
        }
        let score = self.final_score()?;
        self.results_shown = true;
        Some(score)
    }

    /// Whether a Confirm intent should start a new round
    pub fn accepts_restart(&self) -> bool {
        self.results_shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ends_exactly_once() {
        let mut round = RoundController::new();
        assert!(round.in_progress());
        assert!(round.end(120));
        assert!(!round.end(999));
        assert_eq!(round.state(), RoundState::Ended { final_score: 120 });
        assert_eq!(round.final_score(), Some(120));
    }

    #[test]
    fn test_results_only_after_end() {
        let mut round = RoundController::new();
        assert_eq!(round.show_results(), None);
        assert!(!round.accepts_restart());

        round.end(40);
        assert!(!round.accepts_restart());
        assert_eq!(round.show_results(), Some(40));
        assert_eq!(round.show_results(), None);
        assert!(round.accepts_restart());
    }
}
