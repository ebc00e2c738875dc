//! Simulation tick
//!
//! Advances the round by one frame: intents, motion, timers, spawning,
//! collisions, then the end-of-tick flush of destroyed entities.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, PairRule, resolve};
use super::entity::Tag;
use super::state::{GameEvent, GameState, SHAKE_PLAYER_RAMMED};

/// Logical input, decoupled from any device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Move left; magnitude 1.0 is the key held for the whole tick
    MoveLeft(f32),
    MoveRight(f32),
    Fire,
    /// Restart from the results screen
    Confirm,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub intents: Vec<Intent>,
    /// Demo mode - a simple pilot steers and fires
    pub autopilot: bool,
}

impl TickInput {
    pub fn with(intents: &[Intent]) -> Self {
        Self {
            intents: intents.to_vec(),
            autopilot: false,
        }
    }
}

/// Seconds between autopilot volleys
const AUTOPILOT_FIRE_COOLDOWN: f32 = 0.2;

/// Collision rules, applied in order every tick
const COLLISION_RULES: [PairRule<GameState>; 2] = [
    PairRule {
        a: Tag::Bullet,
        b: Tag::Enemy,
        handler: bullet_hits_enemy,
    },
    PairRule {
        a: Tag::Player,
        b: Tag::Enemy,
        handler: enemy_rams_player,
    },
];

/// Bullet is spent, enemy takes a hit
fn bullet_hits_enemy(state: &mut GameState, contact: Contact) {
    // Enemy already died this tick; the bullet flies on
    if !state.store.is_live(contact.b) {
        return;
    }

    state.store.destroy(contact.a);
    let damage = state.tuning.bullet_damage;
    state.damage(contact.b, damage);
    state.explode(contact.a_pos, 1, 24.0, 1.0);
}

/// Enemy crashes into the player and is destroyed outright
fn enemy_rams_player(state: &mut GameState, contact: Contact) {
    if !state.store.is_live(contact.a) || !state.store.is_live(contact.b) {
        return;
    }

    state.store.destroy(contact.b);
    state.explode(contact.b_pos, 1, 24.0, 1.0);
    state.emit(GameEvent::ScreenShake {
        intensity: SHAKE_PLAYER_RAMMED,
    });
    let damage = state.tuning.ram_damage;
    state.damage(contact.a, damage);
}

/// Advance the round by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Frame clock is monotonic; a bogus negative step is treated as no time passing
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    let mut intents = state.take_pending();
    intents.extend(input.intents.iter().copied());
    if input.autopilot {
        autopilot(state, dt, &mut intents);
    }

    for intent in intents {
        match intent {
            Intent::Confirm => {
                if state.round.accepts_restart() {
                    state.restart();
                    return;
                }
            }
            Intent::MoveLeft(magnitude) => {
                let dx = -state.tuning.player_speed * magnitude.max(0.0) * dt;
                state.move_player(dx);
            }
            Intent::MoveRight(magnitude) => {
                let dx = state.tuning.player_speed * magnitude.max(0.0) * dt;
                state.move_player(dx);
            }
            Intent::Fire => {
                state.fire();
            }
        }
    }

    state.time_ticks += 1;
    state.clock += dt;

    // Motion, effect growth and lifetimes
    let bounds = state.bounds();
    state.store.integrate(dt, bounds);

    // Deferred actions that have come due
    for action in state.timers.drain_due(state.clock) {
        state.run_deferred(action);
    }

    // New enemies
    let tier = state.scoreboard.tier();
    let orders = state.spawner.advance(dt, tier, &state.tuning, &mut state.rng);
    for order in orders {
        state.spawn_enemy(order.kind, order.pos, order.health, order.speed);
    }

    resolve(state, &COLLISION_RULES);

    state.store.flush();
}

/// Steer toward the lowest enemy and fire when lined up.
/// Confirms the results screen so demo runs keep going.
fn autopilot(state: &mut GameState, dt: f32, intents: &mut Vec<Intent>) {
    state.autopilot_cooldown = (state.autopilot_cooldown - dt).max(0.0);

    if state.round.accepts_restart() {
        intents.push(Intent::Confirm);
        return;
    }
    let Some(player_pos) = state.store.get(state.player).map(|p| p.pos) else {
        return;
    };

    // Most dangerous enemy: the one closest to the bottom
    let target = state
        .store
        .query(Tag::Enemy)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|e| (e.pos, e.half_extents));
    let Some((target_pos, target_half)) = target else {
        return;
    };

    let dx = target_pos.x - player_pos.x;
    let step = state.tuning.player_speed * dt;
    if step > 0.0 && dx.abs() > 1.0 {
        let magnitude = (dx.abs() / step).min(1.0);
        intents.push(if dx < 0.0 {
            Intent::MoveLeft(magnitude)
        } else {
            Intent::MoveRight(magnitude)
        });
    }

    let lined_up = dx.abs() <= target_half.x + state.tuning.bullet_spread;
    if lined_up && target_pos.y < player_pos.y && state.autopilot_cooldown <= 0.0 {
        intents.push(Intent::Fire);
        state.autopilot_cooldown = AUTOPILOT_FIRE_COOLDOWN;
    }
}

/// Player position, if alive (convenience for presentation code)
pub fn player_position(state: &GameState) -> Option<Vec2> {
    state.store.get(state.player).map(|p| p.pos)
}
