//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so a round can be
//! rebalanced from a JSON file without touching code.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    /// Playfield width in pixels
    pub width: f32,
    /// Playfield height in pixels
    pub height: f32,

    // === Player ===
    /// Starting (and maximum) player health
    pub player_health: u32,
    /// Horizontal speed while a move intent is held (pixels/s)
    pub player_speed: f32,
    /// Distance of the player's centre above the bottom edge
    pub player_baseline: f32,
    /// Player bounding box size
    pub player_size: Vec2,

    // === Bullets ===
    /// Upward bullet speed (pixels/s)
    pub bullet_speed: f32,
    /// Horizontal offset of each of the twin bullets from the player centre
    pub bullet_spread: f32,
    /// Bullet bounding box size
    pub bullet_size: Vec2,
    /// Damage a bullet deals to an enemy
    pub bullet_damage: u32,

    // === Enemies ===
    /// Enemy health at tier 0 (scaled by tier + 1)
    pub enemy_base_health: u32,
    /// Enemy descent speed at tier 0 (scaled by tier + 1 and a random factor)
    pub enemy_base_speed: f32,
    /// Enemy bounding box size
    pub enemy_size: Vec2,
    /// Damage the player takes when rammed by an enemy
    pub ram_damage: u32,

    // === Difficulty ===
    /// Score awarded per enemy kill
    pub kill_score: u64,
    /// Ascending score cutoffs; tier = number of cutoffs strictly exceeded
    pub tier_thresholds: Vec<u64>,
    /// Seconds between spawns, indexed by tier (last entry reused above)
    pub spawn_intervals: Vec<f32>,

    // === Round flow ===
    /// Delay between player death and the results screen (seconds)
    pub results_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,

            player_health: 50,
            player_speed: 480.0,
            player_baseline: 64.0,
            player_size: Vec2::new(64.0, 64.0),

            bullet_speed: 1200.0,
            bullet_spread: 16.0,
            bullet_size: Vec2::new(12.0, 48.0),
            bullet_damage: 1,

            enemy_base_health: 4,
            enemy_base_speed: 120.0,
            enemy_size: Vec2::new(48.0, 48.0),
            ram_damage: 10,

            kill_score: 10,
            tier_thresholds: vec![100, 150],
            spawn_intervals: vec![1.0, 0.7, 0.5],

            results_delay: 1.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning in {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp out-of-range values back into something the simulation can run
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        positive("width", &mut self.width, defaults.width);
        positive("height", &mut self.height, defaults.height);
        positive("player_speed", &mut self.player_speed, defaults.player_speed);
        positive("bullet_speed", &mut self.bullet_speed, defaults.bullet_speed);
        positive("enemy_base_speed", &mut self.enemy_base_speed, defaults.enemy_base_speed);
        finite("player_baseline", &mut self.player_baseline, defaults.player_baseline);
        finite("bullet_spread", &mut self.bullet_spread, defaults.bullet_spread);
        positive_size("player_size", &mut self.player_size, defaults.player_size);
        positive_size("bullet_size", &mut self.bullet_size, defaults.bullet_size);
        positive_size("enemy_size", &mut self.enemy_size, defaults.enemy_size);

        self.tier_thresholds.sort_unstable();
        self.tier_thresholds.dedup();

        self.player_health = self.player_health.max(1);
        // Enemy health is multiplied by (tier + 1); keep the top tier in range
        let max_scale = self.tier_thresholds.len() as u32 + 1;
        self.enemy_base_health = self.enemy_base_health.clamp(1, u32::MAX / max_scale);

        self.spawn_intervals.retain(|s| s.is_finite() && *s > 0.0);
        if self.spawn_intervals.is_empty() {
            log::warn!("Tuning: no usable spawn intervals, restoring defaults");
            self.spawn_intervals = defaults.spawn_intervals;
        }
        finite("results_delay", &mut self.results_delay, defaults.results_delay);
        self.results_delay = self.results_delay.max(0.0);

        self
    }

    /// Where a fresh player is placed
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - self.player_baseline)
    }

    /// Spawn interval for a tier, clamped to the last defined entry
    pub fn spawn_interval(&self, tier: u32) -> f32 {
        let idx = (tier as usize).min(self.spawn_intervals.len().saturating_sub(1));
        self.spawn_intervals.get(idx).copied().unwrap_or(1.0)
    }
}

fn finite(name: &str, value: &mut f32, default: f32) {
    if !value.is_finite() {
        log::warn!("Tuning: {} {} rejected", name, value);
        *value = default;
    }
}

fn positive(name: &str, value: &mut f32, default: f32) {
    if !(value.is_finite() && *value > 0.0) {
        log::warn!("Tuning: {} {} rejected", name, value);
        *value = default;
    }
}

fn positive_size(name: &str, value: &mut Vec2, default: Vec2) {
    if !(value.is_finite() && value.min_element() > 0.0) {
        log::warn!("Tuning: {} {} rejected", name, value);
        *value = default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_health": 30, "width": 800.0 }"#).unwrap();
        assert_eq!(tuning.player_health, 30);
        assert_eq!(tuning.width, 800.0);
        assert_eq!(tuning.height, Tuning::default().height);
        assert_eq!(tuning.tier_thresholds, vec![100, 150]);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_sanitize_repairs_bad_values() {
        let tuning = Tuning {
            width: -5.0,
            player_health: 0,
            tier_thresholds: vec![150, 100, 150],
            spawn_intervals: vec![0.0, -1.0],
            ..Default::default()
        }
        .sanitized();

        assert_eq!(tuning.width, 1280.0);
        assert_eq!(tuning.player_health, 1);
        assert_eq!(tuning.tier_thresholds, vec![100, 150]);
        assert_eq!(tuning.spawn_intervals, vec![1.0, 0.7, 0.5]);
    }

    #[test]
    fn test_sanitize_rejects_non_finite_and_oversized_values() {
        // 1e39 overflows f32 to infinity
        let tuning = Tuning::from_json(
            r#"{ "width": 1e39, "enemy_base_speed": -1e39, "enemy_size": [48.0, 1e39],
                 "spawn_intervals": [1e39, 0.5], "results_delay": 1e39,
                 "enemy_base_health": 3000000000, "tier_thresholds": [0] }"#,
        )
        .unwrap();

        assert_eq!(tuning.width, 1280.0);
        assert_eq!(tuning.enemy_base_speed, 120.0);
        assert_eq!(tuning.enemy_size, Vec2::new(48.0, 48.0));
        assert_eq!(tuning.spawn_intervals, vec![0.5]);
        assert_eq!(tuning.results_delay, 1.0);
        let top_tier = tuning.tier_thresholds.len() as u32;
        assert!(tuning.enemy_base_health.checked_mul(top_tier + 1).is_some());
    }

    #[test]
    fn test_spawn_interval_clamps_to_last_tier() {
        let tuning = Tuning::default();
        assert_eq!(tuning.spawn_interval(0), 1.0);
        assert_eq!(tuning.spawn_interval(1), 0.7);
        assert_eq!(tuning.spawn_interval(2), 0.5);
        assert_eq!(tuning.spawn_interval(9), 0.5);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let tuning = Tuning::load(Path::new("/definitely/not/here.json"));
        assert_eq!(tuning, Tuning::default());
    }
}
