//! Score and difficulty tier
//!
//! Tier is always recomputed from the absolute score, never incremented, so
//! it cannot drift no matter how many kills land in one tick.

use serde::{Deserialize, Serialize};

/// Tier for a score: the number of thresholds the score strictly exceeds.
/// With the default thresholds `[100, 150]` this is `>150 → 2`, `>100 → 1`, else 0.
pub fn tier_for_score(score: u64, thresholds: &[u64]) -> u32 {
    thresholds.iter().filter(|&&cutoff| score > cutoff).count() as u32
}

/// Running score for one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scoreboard {
    score: u64,
    tier: u32,
    kills: u32,
    points_per_kill: u64,
    thresholds: Vec<u64>,
    /// Set once the round ends; kills are no longer counted
    frozen: bool,
}

impl Scoreboard {
    pub fn new(points_per_kill: u64, thresholds: Vec<u64>) -> Self {
        Self {
            score: 0,
            tier: 0,
            kills: 0,
            points_per_kill,
            thresholds,
            frozen: false,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn tier(&self) -> u32 {
        self.tier
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    /// Count a kill. Returns the new tier if it changed.
    pub fn on_enemy_killed(&mut self) -> Option<u32> {
        if self.frozen {
            return None;
        }
        self.kills += 1;
        self.score = self.score.saturating_add(self.points_per_kill);

        let tier = tier_for_score(self.score, &self.thresholds);
        if tier != self.tier {
            self.tier = tier;
            Some(tier)
        } else {
            None
        }
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scoreboard() -> Scoreboard {
        Scoreboard::new(10, vec![100, 150])
    }

    #[test]
    fn test_tier_formula() {
        let t = [100, 150];
        assert_eq!(tier_for_score(0, &t), 0);
        assert_eq!(tier_for_score(100, &t), 0);
        assert_eq!(tier_for_score(110, &t), 1);
        assert_eq!(tier_for_score(150, &t), 1);
        assert_eq!(tier_for_score(160, &t), 2);
        assert_eq!(tier_for_score(10_000, &t), 2);
    }

    #[test]
    fn test_tier_progression_by_kills() {
        let mut board = scoreboard();
        for _ in 0..10 {
            board.on_enemy_killed();
        }
        assert_eq!((board.score(), board.tier()), (100, 0));

        assert_eq!(board.on_enemy_killed(), Some(1));
        assert_eq!((board.score(), board.tier()), (110, 1));

        for _ in 0..4 {
            assert_eq!(board.on_enemy_killed(), None);
        }
        assert_eq!(board.score(), 150);
        assert_eq!(board.on_enemy_killed(), Some(2));
        assert_eq!((board.score(), board.tier(), board.kills()), (160, 2, 16));
    }

    #[test]
    fn test_frozen_board_ignores_kills() {
        let mut board = scoreboard();
        board.on_enemy_killed();
        board.freeze();
        assert_eq!(board.on_enemy_killed(), None);
        assert_eq!(board.score(), 10);
        assert_eq!(board.kills(), 1);
    }

    proptest! {
        #[test]
        fn prop_score_is_multiple_of_ten_and_tier_matches(kills in 0u32..64) {
            let mut board = scoreboard();
            let mut last_tier = 0;
            for _ in 0..kills {
                board.on_enemy_killed();
                prop_assert!(board.tier() >= last_tier);
                last_tier = board.tier();
            }
            prop_assert_eq!(board.score(), kills as u64 * 10);
            prop_assert_eq!(board.score() % 10, 0);
            prop_assert_eq!(board.tier(), tier_for_score(board.score(), &[100, 150]));
        }

        #[test]
        fn prop_tier_is_monotonic_in_score(a in 0u64..1000, b in 0u64..1000) {
            let t = [100, 150];
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(tier_for_score(lo, &t) <= tier_for_score(hi, &t));
        }
    }
}
