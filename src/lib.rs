//! Power Mower - a vertically scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, spawning, scoring, round flow)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio and input devices are collaborators outside this crate:
//! they feed `sim::Intent`s in and read `sim::Snapshot`s and `sim::GameEvent`s out.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will feed into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;
}
