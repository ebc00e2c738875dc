//! Entity storage for the round
//!
//! Entities are kept in a single vector sorted by id, so iteration order is
//! stable and deterministic. Destruction is deferred: `destroy` only marks an
//! entity, marked entities vanish from every lookup immediately, and `flush`
//! drops them at the end of the tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::health::Health;

/// Unique entity identifier (never reused within a round)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Enemy types, grouped into waves that unlock with difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    // Wave 0
    Dandelion,
    Thistle,
    // Wave 1
    Mole,
    Gopher,
    // Wave 2
    Badger,
    Boulder,
}

/// Enemy kinds per wave; wave `n` is unlocked at tier `n`
pub const ENEMY_WAVES: [&[EnemyKind]; 3] = [
    &[EnemyKind::Dandelion, EnemyKind::Thistle],
    &[EnemyKind::Mole, EnemyKind::Gopher],
    &[EnemyKind::Badger, EnemyKind::Boulder],
];

impl EnemyKind {
    /// The wave this kind belongs to
    pub fn wave(self) -> u32 {
        match self {
            EnemyKind::Dandelion | EnemyKind::Thistle => 0,
            EnemyKind::Mole | EnemyKind::Gopher => 1,
            EnemyKind::Badger | EnemyKind::Boulder => 2,
        }
    }
}

/// Short-lived visual effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Small square of debris from a bullet or ram impact
    Debris,
    /// Large burst left behind by a destroyed enemy
    Kaboom,
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy(EnemyKind),
    Projectile,
    Effect(EffectKind),
}

impl EntityKind {
    /// Default tag set for this kind
    pub fn tags(self) -> TagSet {
        match self {
            EntityKind::Player => TagSet::of(&[Tag::Player, Tag::Health]),
            EntityKind::Enemy(_) => TagSet::of(&[Tag::Enemy, Tag::Health]),
            EntityKind::Projectile => TagSet::of(&[Tag::Bullet]),
            EntityKind::Effect(_) => TagSet::of(&[Tag::Effect]),
        }
    }
}

/// Capability tags used by queries and collision rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Player,
    Enemy,
    Bullet,
    Effect,
    /// Has a health counter and routes through the damage model
    Health,
}

impl Tag {
    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Bitmask of tags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet(u8);

impl TagSet {
    pub const EMPTY: TagSet = TagSet(0);

    pub fn of(tags: &[Tag]) -> Self {
        tags.iter().fold(Self::EMPTY, |set, tag| set.with(*tag))
    }

    #[inline]
    pub fn with(self, tag: Tag) -> Self {
        TagSet(self.0 | tag.bit())
    }

    #[inline]
    pub fn contains(self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }
}

/// Initial attributes for a new entity
#[derive(Debug, Clone)]
pub struct SpawnParams {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub health: Option<u32>,
    /// Seconds until the entity expires on its own
    pub ttl: Option<f32>,
    /// Scale growth per second (effects only)
    pub growth: f32,
}

impl SpawnParams {
    pub fn at(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            health: None,
            ttl: None,
            growth: 0.0,
        }
    }

    pub fn moving(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_health(mut self, hp: u32) -> Self {
        self.health = Some(hp);
        self
    }

    pub fn expiring(mut self, ttl: f32, growth: f32) -> Self {
        self.ttl = Some(ttl);
        self.growth = growth;
        self
    }
}

/// A live simulation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub tags: TagSet,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Half of the bounding box size (box is centred on `pos`)
    pub half_extents: Vec2,
    pub health: Option<Health>,
    pub ttl: Option<f32>,
    pub scale: f32,
    pub growth: f32,
    /// Marked for removal at end of tick
    #[serde(skip)]
    doomed: bool,
}

impl Entity {
    /// Axis-aligned bounding box as (min, max), accounting for scale
    pub fn aabb(&self) -> (Vec2, Vec2) {
        let half = self.half_extents * self.scale;
        (self.pos - half, self.pos + half)
    }

    /// True if the bounding boxes overlap (touching edges count)
    pub fn overlaps(&self, other: &Entity) -> bool {
        let (a_min, a_max) = self.aabb();
        let (b_min, b_max) = other.aabb();
        a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Whether the entity has left the playfield for good
    fn left_playfield(&self, bounds: Vec2) -> bool {
        let (min, max) = self.aabb();
        match self.kind {
            // Enemies enter from above, so only the bottom edge counts
            EntityKind::Enemy(_) => min.y > bounds.y,
            EntityKind::Projectile => {
                max.y < 0.0 || min.y > bounds.y || max.x < 0.0 || min.x > bounds.x
            }
            EntityKind::Player | EntityKind::Effect(_) => false,
        }
    }
}

/// Owns every entity in the round
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    /// Sorted by id
    entities: Vec<Entity>,
    next_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Create an entity and return its id
    pub fn spawn(&mut self, kind: EntityKind, params: SpawnParams) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        // Ids are monotonic, so pushing keeps the vector sorted
        self.entities.push(Entity {
            id,
            kind,
            tags: kind.tags(),
            pos: params.pos,
            vel: params.vel,
            half_extents: params.size / 2.0,
            health: params.health.map(Health::new),
            ttl: params.ttl,
            scale: 1.0,
            growth: params.growth,
            doomed: false,
        });
        id
    }

    /// Mark an entity for removal. Unknown or already destroyed ids are ignored.
    /// Returns true if the entity was live.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        match self.index_of(id) {
            Some(idx) if !self.entities[idx].doomed => {
                self.entities[idx].doomed = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id)
            .map(|idx| &self.entities[idx])
            .filter(|e| !e.doomed)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id)
            .map(|idx| &mut self.entities[idx])
            .filter(|e| !e.doomed)
    }

    /// Live entities carrying `tag`, in id order
    pub fn query(&self, tag: Tag) -> impl Iterator<Item = &Entity> {
        self.live().filter(move |e| e.has_tag(tag))
    }

    /// Run `f` on every live entity carrying `tag`
    pub fn for_each(&mut self, tag: Tag, mut f: impl FnMut(&mut Entity)) {
        for entity in self
            .entities
            .iter_mut()
            .filter(|e| !e.doomed && e.has_tag(tag))
        {
            f(entity);
        }
    }

    /// All live entities, in id order
    pub fn live(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| !e.doomed)
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Advance motion, effect growth and lifetimes by `dt`.
    /// Returns the ids destroyed because they expired or left the playfield.
    pub fn integrate(&mut self, dt: f32, bounds: Vec2) -> Vec<EntityId> {
        let mut gone = Vec::new();
        for entity in self.entities.iter_mut().filter(|e| !e.doomed) {
            entity.pos += entity.vel * dt;
            entity.scale += entity.growth * dt;

            if let Some(ttl) = entity.ttl.as_mut() {
                *ttl -= dt;
                if *ttl <= 0.0 {
                    entity.doomed = true;
                }
            }
            if !entity.doomed && entity.left_playfield(bounds) {
                entity.doomed = true;
            }
            if entity.doomed {
                gone.push(entity.id);
            }
        }
        gone
    }

    /// Drop every entity destroyed during this tick
    pub fn flush(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| !e.doomed);
        before - self.entities.len()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }
}
