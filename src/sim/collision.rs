//! Tag-pair collision detection and dispatch
//!
//! Rules are a plain table of `(tag_a, tag_b, handler)`. For each rule the
//! overlapping pairs are collected up front from the live entities, then the
//! handler runs once per pair. Destruction inside a handler is deferred by the
//! store, so a bullet touching two enemies still reaches both of them.

use glam::Vec2;

use super::entity::{EntityId, EntityStore, Tag};

/// An overlapping pair, ordered as the rule's `(a, b)`.
/// Positions are captured at detection time; handlers may destroy either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
    pub a_pos: Vec2,
    pub b_pos: Vec2,
}

/// Gives the resolver read access to the entity store of a context
pub trait CollisionWorld {
    fn store(&self) -> &EntityStore;
}

/// A collision rule over context type `C`
pub struct PairRule<C> {
    pub a: Tag,
    pub b: Tag,
    pub handler: fn(&mut C, Contact),
}

impl<C> Clone for PairRule<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for PairRule<C> {}

impl<C> std::fmt::Debug for PairRule<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairRule")
            .field("a", &self.a)
            .field("b", &self.b)
            .finish()
    }
}

/// All overlapping `(a, b)` pairs between live entities tagged `a` and `b`.
///
/// O(n·m); entity counts in a round stay small enough that no spatial index
/// is needed. An entity carrying both tags never pairs with itself.
pub fn overlapping_pairs(store: &EntityStore, a: Tag, b: Tag) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for ea in store.query(a) {
        for eb in store.query(b) {
            if ea.id != eb.id && ea.overlaps(eb) {
                contacts.push(Contact {
                    a: ea.id,
                    b: eb.id,
                    a_pos: ea.pos,
                    b_pos: eb.pos,
                });
            }
        }
    }
    contacts
}

/// Run every rule in order. Returns the number of handler invocations.
pub fn resolve<C: CollisionWorld>(ctx: &mut C, rules: &[PairRule<C>]) -> usize {
    let mut dispatched = 0;
    for rule in rules {
        let contacts = overlapping_pairs(ctx.store(), rule.a, rule.b);
        for contact in contacts {
            (rule.handler)(ctx, contact);
            dispatched += 1;
        }
    }
    dispatched
}
