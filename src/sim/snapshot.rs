//! Read-only view of a round for presentation code
//!
//! Built after a tick completes. Renderers and HUDs read this instead of
//! touching `GameState`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind};
use super::round::RoundState;
use super::state::GameState;
use super::timers::Banner;

/// One live entity as presentation sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub half_extents: Vec2,
    pub scale: f32,
    pub health: Option<u32>,
}

/// Everything presentation needs to draw a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time_ticks: u64,
    pub clock: f32,
    pub score: u64,
    pub tier: u32,
    pub round: RoundState,
    /// Whether the results screen is up
    pub results_shown: bool,
    pub player_health: Option<u32>,
    pub player_max_health: u32,
    pub banners: Vec<Banner>,
    /// Live entities in id order
    pub entities: Vec<EntityView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = state.store.get(state.player).and_then(|e| e.health);
        let entities = state
            .store
            .live()
            .map(|e| EntityView {
                id: e.id,
                kind: e.kind,
                pos: e.pos,
                half_extents: e.half_extents,
                scale: e.scale,
                health: e.health.map(|h| h.current()),
            })
            .collect();

        Self {
            time_ticks: state.time_ticks,
            clock: state.clock,
            score: state.score(),
            tier: state.tier(),
            round: state.round_state(),
            results_shown: state.round.accepts_restart(),
            player_health: player.map(|h| h.current()),
            player_max_health: player.map_or(state.tuning.player_health, |h| h.max()),
            banners: state.banners.clone(),
            entities,
        }
    }

    /// Health bar fill, 0.0 once the player is gone
    pub fn health_fraction(&self) -> f32 {
        match self.player_health {
            Some(hp) if self.player_max_health > 0 => hp as f32 / self.player_max_health as f32,
            _ => 0.0,
        }
    }

    pub fn count(&self, matches: impl Fn(EntityKind) -> bool) -> usize {
        self.entities.iter().filter(|e| matches(e.kind)).count()
    }
}
