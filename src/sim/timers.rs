//! Deferred actions keyed to accumulated simulation time
//!
//! "Wait N seconds, then do X" is a heap entry, drained once per tick. Nothing
//! ever blocks; an entry simply fires on the first tick whose clock has
//! reached its deadline.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Intro text shown at round start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Banner {
    Power,
    Mower,
}

/// Something to do later
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    /// Scatter debris around `pos`
    Explosion { pos: Vec2, radius: f32, size: f32 },
    /// Round is over; show the final score and accept Confirm
    ShowResults,
    ShowBanner(Banner),
    HideBanner(Banner),
}

#[derive(Debug, Clone)]
struct Entry {
    fire_at: f32,
    /// Insertion order, so equal deadlines fire first-in first-out
    seq: u64,
    action: Deferred,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap and we want the earliest deadline on top
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-heap of deferred actions
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire once the clock reaches `fire_at`
    pub fn schedule(&mut self, fire_at: f32, action: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            fire_at,
            seq,
            action,
        });
    }

    /// Pop every action due at or before `now`, earliest first
    pub fn drain_due(&mut self, now: f32) -> Vec<Deferred> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|e| e.fire_at <= now) {
            if let Some(entry) = self.heap.pop() {
                due.push(entry.action);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
