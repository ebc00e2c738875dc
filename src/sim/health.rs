//! Damage and health
//!
//! Player and enemies go through the same path: anything tagged `Health` that
//! carries a counter can be damaged, and reaching zero destroys it in the same call.

use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityStore, Tag};

/// Non-negative health counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// A zero-health entity would be dead on arrival, so the floor is 1
    pub fn new(max: u32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }
}

/// Result of a single damage application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Survived with this much health left
    Hurt { remaining: u32 },
    /// Health hit zero; the entity has been destroyed
    Died,
    /// Target missing, already destroyed, or without health
    Ignored,
}

/// Apply `amount` damage to `id`.
///
/// `Hurt` and `Died` are mutually exclusive: a lethal hit only reports death.
pub fn apply_damage(store: &mut EntityStore, id: EntityId, amount: u32) -> DamageOutcome {
    let Some(health) = store
        .get_mut(id)
        .filter(|e| e.has_tag(Tag::Health))
        .and_then(|e| e.health.as_mut())
    else {
        return DamageOutcome::Ignored;
    };

    health.current = health.current.saturating_sub(amount);
    if health.is_depleted() {
        store.destroy(id);
        DamageOutcome::Died
    } else {
        DamageOutcome::Hurt {
            remaining: health.current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EffectKind, EnemyKind, EntityKind, SpawnParams, TagSet};
    use glam::Vec2;

    fn spawn_enemy(store: &mut EntityStore, hp: u32) -> EntityId {
        store.spawn(
            EntityKind::Enemy(EnemyKind::Mole),
            SpawnParams::at(Vec2::ZERO, Vec2::splat(48.0)).with_health(hp),
        )
    }

    #[test]
    fn test_hurt_then_die() {
        let mut store = EntityStore::new();
        let id = spawn_enemy(&mut store, 2);

        assert_eq!(
            apply_damage(&mut store, id, 1),
            DamageOutcome::Hurt { remaining: 1 }
        );
        assert_eq!(apply_damage(&mut store, id, 1), DamageOutcome::Died);
        assert!(!store.is_live(id));
    }

    #[test]
    fn test_overkill_dies_once() {
        let mut store = EntityStore::new();
        let id = spawn_enemy(&mut store, 4);

        assert_eq!(apply_damage(&mut store, id, 100), DamageOutcome::Died);
        // Already destroyed this tick: further damage is absorbed
        assert_eq!(apply_damage(&mut store, id, 1), DamageOutcome::Ignored);
    }

    #[test]
    fn test_missing_or_healthless_targets_ignored() {
        let mut store = EntityStore::new();
        assert_eq!(
            apply_damage(&mut store, EntityId(42), 1),
            DamageOutcome::Ignored
        );

        let fx = store.spawn(
            EntityKind::Effect(EffectKind::Kaboom),
            SpawnParams::at(Vec2::ZERO, Vec2::splat(8.0)),
        );
        assert_eq!(apply_damage(&mut store, fx, 1), DamageOutcome::Ignored);
        assert!(store.is_live(fx));
    }

    #[test]
    fn test_untagged_counter_is_not_damaged() {
        let mut store = EntityStore::new();
        let id = spawn_enemy(&mut store, 2);
        if let Some(e) = store.get_mut(id) {
            e.tags = TagSet::of(&[Tag::Enemy]);
        }

        assert_eq!(apply_damage(&mut store, id, 5), DamageOutcome::Ignored);
        assert!(store.is_live(id));
        assert_eq!(store.get(id).and_then(|e| e.health).map(|h| h.current()), Some(2));
    }

    #[test]
    fn test_zero_health_floor() {
        let health = Health::new(0);
        assert_eq!(health.current(), 1);
        assert_eq!(health.max(), 1);
        assert!(!health.is_depleted());
    }
}
