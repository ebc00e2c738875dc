//! Enemy spawn scheduling
//!
//! One countdown, ticked by elapsed time. When it runs out an enemy is rolled
//! for the current tier and the countdown is refilled with that tier's
//! interval. Overshoot is carried into the next interval so the cadence does
//! not depend on frame timing.

use glam::Vec2;
use rand::Rng;

use super::entity::{ENEMY_WAVES, EnemyKind};
use crate::tuning::Tuning;

/// Slack for f32 accumulation error when many small ticks sum to an interval
pub const TIMER_EPSILON: f32 = 1e-4;

/// Upper bound on spawns from a single huge tick (e.g. after a stall)
pub const MAX_SPAWNS_PER_TICK: usize = 8;

/// A rolled enemy, ready to be placed in the store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnOrder {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub health: u32,
    /// Downward speed (pixels/s)
    pub speed: f32,
}

/// Countdown to the next enemy
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    remaining: f32,
    running: bool,
    spawned: u32,
}

impl SpawnScheduler {
    /// Start waiting; the first enemy appears after `first_delay` seconds
    pub fn new(first_delay: f32) -> Self {
        Self {
            remaining: first_delay,
            running: true,
            spawned: 0,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Stop for good; used when the round ends
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Count down by `dt` and roll an enemy for every expiry
    pub fn advance<R: Rng>(
        &mut self,
        dt: f32,
        tier: u32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Vec<SpawnOrder> {
        let mut orders = Vec::new();
        if !self.running {
            return orders;
        }

        self.remaining -= dt;
        while self.remaining <= TIMER_EPSILON {
            if orders.len() == MAX_SPAWNS_PER_TICK {
                log::warn!("Spawn backlog dropped after {} spawns in one tick", orders.len());
                self.remaining = tuning.spawn_interval(tier);
                break;
            }
            orders.push(roll_enemy(tier, tuning, rng));
            self.spawned += 1;
            self.remaining += tuning.spawn_interval(tier);
        }
        orders
    }
}

/// Pick an enemy for `tier`: a uniformly chosen unlocked wave, then a uniformly
/// chosen kind within it, at a random x along the top edge. Health and speed
/// scale with `tier + 1`.
pub fn roll_enemy<R: Rng>(tier: u32, tuning: &Tuning, rng: &mut R) -> SpawnOrder {
    let unlocked = (tier as usize).min(ENEMY_WAVES.len() - 1);
    let wave = ENEMY_WAVES[rng.random_range(0..=unlocked)];
    let kind = wave[rng.random_range(0..wave.len())];

    let scale = (tier + 1) as f32;
    let x = rng.random_range(0.0..=tuning.width);
    let speed = rng.random_range(0.5..=1.5) * tuning.enemy_base_speed * scale;

    SpawnOrder {
        kind,
        // Just above the top edge, sliding into view
        pos: Vec2::new(x, -tuning.enemy_size.y / 2.0),
        health: tuning.enemy_base_health.saturating_mul(tier + 1),
        speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn run(scheduler: &mut SpawnScheduler, dts: &[f32], tier: u32) -> usize {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        dts.iter()
            .map(|dt| scheduler.advance(*dt, tier, &tuning, &mut rng).len())
            .sum()
    }

    #[test]
    fn test_many_small_ticks_make_one_spawn() {
        let mut scheduler = SpawnScheduler::new(1.0);
        assert_eq!(run(&mut scheduler, &[0.01; 99], 0), 0);
        assert_eq!(run(&mut scheduler, &[0.01], 0), 1);
        // Next one is a full interval away
        assert_eq!(run(&mut scheduler, &[0.01; 99], 0), 0);
        assert_eq!(run(&mut scheduler, &[0.01], 0), 1);
    }

    #[test]
    fn test_sixty_hz_one_spawn_per_second() {
        let mut scheduler = SpawnScheduler::new(1.0);
        assert_eq!(run(&mut scheduler, &[1.0 / 60.0; 600], 0), 10);
    }

    #[test]
    fn test_interval_shrinks_with_tier() {
        let mut scheduler = SpawnScheduler::new(0.5);
        // 0.5s to the first spawn, then 0.5s each at tier 2
        assert_eq!(run(&mut scheduler, &[0.1; 30], 2), 6);

        let mut scheduler = SpawnScheduler::new(0.7);
        assert_eq!(run(&mut scheduler, &[0.05; 42], 1), 3);
    }

    #[test]
    fn test_tier_beyond_table_uses_last_interval() {
        let mut scheduler = SpawnScheduler::new(0.5);
        assert_eq!(run(&mut scheduler, &[0.25; 8], 7), 4);
    }

    #[test]
    fn test_stopped_scheduler_is_silent() {
        let mut scheduler = SpawnScheduler::new(0.0);
        scheduler.stop();
        assert_eq!(run(&mut scheduler, &[1.0; 5], 0), 0);
        assert_eq!(scheduler.spawned(), 0);
    }

    #[test]
    fn test_huge_tick_is_capped() {
        let mut scheduler = SpawnScheduler::new(1.0);
        assert_eq!(run(&mut scheduler, &[100.0], 0), MAX_SPAWNS_PER_TICK);
        assert!(scheduler.remaining() > 0.0);
    }

    #[test]
    fn test_tier_zero_only_rolls_wave_zero() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1234);
        for _ in 0..200 {
            let order = roll_enemy(0, &tuning, &mut rng);
            assert_eq!(order.kind.wave(), 0);
            assert_eq!(order.health, 4);
            assert!(order.speed >= 60.0 && order.speed <= 180.0);
            assert!(order.pos.x >= 0.0 && order.pos.x <= tuning.width);
            assert!(order.pos.y < 0.0);
        }
    }

    #[test]
    fn test_enemy_health_saturates_at_high_tiers() {
        let tuning = Tuning {
            enemy_base_health: u32::MAX / 2,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(roll_enemy(5, &tuning, &mut rng).health, u32::MAX);
    }

    #[test]
    fn test_higher_tiers_scale_stats_and_unlock_waves() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(99);
        let mut waves_seen = [false; 3];
        for _ in 0..300 {
            let order = roll_enemy(2, &tuning, &mut rng);
            waves_seen[order.kind.wave() as usize] = true;
            assert_eq!(order.health, 12);
            assert!(order.speed >= 180.0 && order.speed <= 540.0);
        }
        assert_eq!(waves_seen, [true, true, true]);
    }

    #[test]
    fn test_same_seed_same_rolls() {
        let tuning = Tuning::default();
        let mut a = Pcg32::seed_from_u64(5);
        let mut b = Pcg32::seed_from_u64(5);
        for tier in 0..3 {
            assert_eq!(
                roll_enemy(tier, &tuning, &mut a),
                roll_enemy(tier, &tuning, &mut b)
            );
        }
    }

    proptest! {
        #[test]
        fn prop_cadence_independent_of_tick_size(steps in prop::collection::vec(1u32..50, 1..200)) {
            // Millisecond-sized ticks summing to `total` seconds
            let dts: Vec<f32> = steps.iter().map(|ms| *ms as f32 / 1000.0).collect();
            let total_ms: u32 = steps.iter().sum();

            let mut scheduler = SpawnScheduler::new(1.0);
            let spawned = run(&mut scheduler, &dts, 0) as u32;

            // One spawn per whole second elapsed, including one landing exactly on the total
            prop_assert_eq!(spawned, total_ms / 1000);
        }
    }
}
