//! Round session state
//!
//! Everything that changes during a round is owned by one `GameState`:
//! entities, score, spawning, timers, the RNG. Restarting replaces the whole
//! thing, so nothing leaks from one round into the next.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionWorld;
use super::entity::{EffectKind, EnemyKind, EntityId, EntityKind, EntityStore, SpawnParams};
use super::health::{DamageOutcome, apply_damage};
use super::round::{RoundController, RoundState};
use super::score::Scoreboard;
use super::spawn::SpawnScheduler;
use super::tick::Intent;
use super::timers::{Banner, Deferred, TimerQueue};
use crate::tuning::Tuning;

/// Screen shake requested when an enemy is hit but survives
pub const SHAKE_ENEMY_HURT: f32 = 1.0;
/// Screen shake when an enemy dies
pub const SHAKE_ENEMY_KILLED: f32 = 2.0;
/// Screen shake when the player is rammed
pub const SHAKE_PLAYER_RAMMED: f32 = 12.0;
/// Screen shake when the player dies
pub const SHAKE_PLAYER_DIED: f32 = 120.0;

/// Lifetime of debris squares (seconds)
pub const DEBRIS_TTL: f32 = 0.1;
/// Base size of a debris square
pub const DEBRIS_SIZE: f32 = 4.0;
/// Lifetime of the burst left by a dead enemy
pub const KABOOM_TTL: f32 = 0.5;
pub const KABOOM_SIZE: f32 = 96.0;

/// How long the intro banners stay up
pub const BANNER_POWER_UNTIL: f32 = 1.0;
pub const BANNER_MOWER_UNTIL: f32 = 4.0;

/// Events older than this many undrained entries are dropped
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Notifications for presentation (audio, shake, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { seed: u64 },
    BannerShown(Banner),
    BannerHidden(Banner),
    EnemySpawned { id: EntityId, kind: EnemyKind },
    BulletFired { pos: Vec2 },
    EnemyHurt { pos: Vec2 },
    EnemyKilled { pos: Vec2 },
    Explosion { pos: Vec2 },
    ScreenShake { intensity: f32 },
    PlayerHurt { health: u32 },
    PlayerDied,
    TierChanged { tier: u32 },
    RoundEnded { final_score: u64 },
}

/// Complete state of one round
#[derive(Debug, Clone)]
pub struct GameState {
    /// Round seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Accumulated simulation time (seconds)
    pub clock: f32,
    pub store: EntityStore,
    pub scoreboard: Scoreboard,
    pub spawner: SpawnScheduler,
    pub round: RoundController,
    pub timers: TimerQueue,
    /// The player's entity; it stays valid as an id after the player dies
    pub player: EntityId,
    /// Intro banners currently on screen
    pub banners: Vec<Banner>,
    /// Seconds until the autopilot may fire again
    pub(crate) autopilot_cooldown: f32,
    /// Intents queued by collaborators for the next tick
    pending: Vec<Intent>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a round with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a round with the given tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let mut store = EntityStore::new();
        let player = store.spawn(
            EntityKind::Player,
            SpawnParams::at(tuning.player_start(), tuning.player_size)
                .with_health(tuning.player_health),
        );

        let mut timers = TimerQueue::new();
        timers.schedule(BANNER_POWER_UNTIL, Deferred::HideBanner(Banner::Power));
        timers.schedule(BANNER_POWER_UNTIL, Deferred::ShowBanner(Banner::Mower));
        timers.schedule(BANNER_MOWER_UNTIL, Deferred::HideBanner(Banner::Mower));

        log::info!("Round started with seed {}", seed);

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            scoreboard: Scoreboard::new(tuning.kill_score, tuning.tier_thresholds.clone()),
            // First enemy arrives on the first tick
            spawner: SpawnScheduler::new(0.0),
            tuning,
            time_ticks: 0,
            clock: 0.0,
            store,
            round: RoundController::new(),
            timers,
            player,
            banners: vec![Banner::Power],
            autopilot_cooldown: 0.0,
            pending: Vec::new(),
            events: vec![
                GameEvent::RoundStarted { seed },
                GameEvent::BannerShown(Banner::Power),
            ],
        }
    }

    /// Seed used by the round that follows this one
    pub fn next_seed(&self) -> u64 {
        self.seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407)
    }

    /// Throw this round away and start a fresh one with the same tuning
    pub fn restart(&mut self) {
        let seed = self.next_seed();
        let tuning = std::mem::take(&mut self.tuning);
        *self = Self::with_tuning(seed, tuning);
    }

    /// Queue an intent for the start of the next tick
    pub fn enqueue(&mut self, intent: Intent) {
        self.pending.push(intent);
    }

    pub(crate) fn take_pending(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.pending)
    }

    /// Events emitted since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let excess = self.events.len() + 1 - MAX_PENDING_EVENTS;
            self.events.drain(..excess);
        }
        self.events.push(event);
    }

    pub fn score(&self) -> u64 {
        self.scoreboard.score()
    }

    pub fn tier(&self) -> u32 {
        self.scoreboard.tier()
    }

    pub fn round_state(&self) -> RoundState {
        self.round.state()
    }

    /// Player health, or None once the player has been destroyed
    pub fn player_health(&self) -> Option<u32> {
        self.store
            .get(self.player)
            .and_then(|p| p.health)
            .map(|h| h.current())
    }

    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.tuning.width, self.tuning.height)
    }

    /// Place a rolled enemy. Rejected once the round has ended.
    pub fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        pos: Vec2,
        health: u32,
        speed: f32,
    ) -> Option<EntityId> {
        if !self.round.in_progress() {
            return None;
        }
        let id = self.store.spawn(
            EntityKind::Enemy(kind),
            SpawnParams::at(pos, self.tuning.enemy_size)
                .moving(Vec2::new(0.0, speed))
                .with_health(health),
        );
        log::debug!("Spawned {:?} #{} at x={:.0} speed={:.0}", kind, id.0, pos.x, speed);
        self.emit(GameEvent::EnemySpawned { id, kind });
        Some(id)
    }

    /// Fire the twin bullets. Returns false if the round is over or the player is gone.
    pub fn fire(&mut self) -> bool {
        if !self.round.in_progress() {
            return false;
        }
        let Some(origin) = self.store.get(self.player).map(|p| p.pos) else {
            return false;
        };

        let vel = Vec2::new(0.0, -self.tuning.bullet_speed);
        for dx in [-self.tuning.bullet_spread, self.tuning.bullet_spread] {
            self.store.spawn(
                EntityKind::Projectile,
                SpawnParams::at(origin + Vec2::new(dx, 0.0), self.tuning.bullet_size).moving(vel),
            );
        }
        self.emit(GameEvent::BulletFired { pos: origin });
        true
    }

    /// Move the player horizontally by `dx`, wrapping around the playfield edges
    pub fn move_player(&mut self, dx: f32) {
        if !self.round.in_progress() {
            return;
        }
        let width = self.tuning.width;
        if let Some(player) = self.store.get_mut(self.player) {
            player.pos.x += dx;
            if player.pos.x < 0.0 {
                player.pos.x = width;
            } else if player.pos.x > width {
                player.pos.x = 0.0;
            }
        }
    }

    /// Apply damage and route the outcome by entity kind
    pub fn damage(&mut self, id: EntityId, amount: u32) -> DamageOutcome {
        let Some((kind, pos)) = self.store.get(id).map(|e| (e.kind, e.pos)) else {
            return DamageOutcome::Ignored;
        };

        let outcome = apply_damage(&mut self.store, id, amount);
        match (kind, outcome) {
            (EntityKind::Player, DamageOutcome::Hurt { remaining }) => {
                self.emit(GameEvent::PlayerHurt { health: remaining });
            }
            (EntityKind::Player, DamageOutcome::Died) => self.on_player_died(),
            (EntityKind::Enemy(_), DamageOutcome::Hurt { .. }) => {
                self.emit(GameEvent::EnemyHurt { pos });
                self.emit(GameEvent::ScreenShake {
                    intensity: SHAKE_ENEMY_HURT,
                });
            }
            (EntityKind::Enemy(enemy), DamageOutcome::Died) => self.on_enemy_died(enemy, pos),
            _ => {}
        }
        outcome
    }

    fn on_enemy_died(&mut self, kind: EnemyKind, pos: Vec2) {
        log::debug!("{:?} destroyed at ({:.0}, {:.0})", kind, pos.x, pos.y);
        self.emit(GameEvent::EnemyKilled { pos });
        self.emit(GameEvent::ScreenShake {
            intensity: SHAKE_ENEMY_KILLED,
        });
        self.store.spawn(
            EntityKind::Effect(EffectKind::Kaboom),
            SpawnParams::at(pos, Vec2::splat(KABOOM_SIZE)).expiring(KABOOM_TTL, 0.0),
        );

        if let Some(tier) = self.scoreboard.on_enemy_killed() {
            log::info!("Score {} reached tier {}", self.scoreboard.score(), tier);
            self.emit(GameEvent::TierChanged { tier });
        }
    }

    fn on_player_died(&mut self) {
        let score = self.scoreboard.score();
        if !self.round.end(score) {
            return;
        }
        self.spawner.stop();
        self.scoreboard.freeze();

        log::info!(
            "Player died at {:.1}s with score {} (tier {})",
            self.clock,
            score,
            self.scoreboard.tier()
        );
        self.emit(GameEvent::ScreenShake {
            intensity: SHAKE_PLAYER_DIED,
        });
        self.emit(GameEvent::PlayerDied);
        self.timers
            .schedule(self.clock + self.tuning.results_delay, Deferred::ShowResults);
    }

    /// Schedule `count` debris bursts around `pos`, each after a short random delay
    pub fn explode(&mut self, pos: Vec2, count: u32, radius: f32, size: f32) {
        self.emit(GameEvent::Explosion { pos });
        for _ in 0..count {
            let delay = self.rng.random_range(0.0..=count as f32 * 0.1);
            self.timers
                .schedule(self.clock + delay, Deferred::Explosion { pos, radius, size });
        }
    }

    /// Carry out a deferred action whose time has come
    pub fn run_deferred(&mut self, action: Deferred) {
        match action {
            Deferred::Explosion { pos, radius, size } => {
                for _ in 0..2 {
                    let jitter = Vec2::new(
                        self.rng.random_range(-radius..=radius),
                        self.rng.random_range(-radius..=radius),
                    );
                    let growth = self.rng.random_range(48.0..=72.0) * size;
                    self.store.spawn(
                        EntityKind::Effect(EffectKind::Debris),
                        SpawnParams::at(pos + jitter, Vec2::splat(DEBRIS_SIZE * size))
                            .expiring(DEBRIS_TTL, growth),
                    );
                }
            }
            Deferred::ShowResults => {
                if let Some(final_score) = self.round.show_results() {
                    log::info!("Round over - final score {}", final_score);
                    self.emit(GameEvent::RoundEnded { final_score });
                }
            }
            Deferred::ShowBanner(banner) => {
                if !self.banners.contains(&banner) {
                    self.banners.push(banner);
                    self.emit(GameEvent::BannerShown(banner));
                }
            }
            Deferred::HideBanner(banner) => {
                if let Some(idx) = self.banners.iter().position(|b| *b == banner) {
                    self.banners.remove(idx);
                    self.emit(GameEvent::BannerHidden(banner));
                }
            }
        }
    }
}

impl CollisionWorld for GameState {
    fn store(&self) -> &EntityStore {
        &self.store
    }
}
