//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entity;
pub mod health;
pub mod round;
pub mod score;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{Contact, PairRule, overlapping_pairs, resolve};
pub use entity::{
    ENEMY_WAVES, EffectKind, EnemyKind, Entity, EntityId, EntityKind, EntityStore, SpawnParams,
    Tag, TagSet,
};
pub use health::{DamageOutcome, Health, apply_damage};
pub use round::{RoundController, RoundState};
pub use score::{Scoreboard, tier_for_score};
pub use snapshot::{EntityView, Snapshot};
pub use spawn::{SpawnOrder, SpawnScheduler, roll_enemy};
pub use state::{GameEvent, GameState};
pub use tick::{Intent, TickInput, player_position, tick};
pub use timers::{Banner, Deferred, TimerQueue};
