//! `evac-agent` — who is evacuating, and in what behavioral phase.
//!
//! | Module      | Contents                                             |
//! |-------------|------------------------------------------------------|
//! | [`profile`] | `MobilityProfile`, `ProfileSet`, JSON loader         |
//! | [`phase`]   | `Phase`, `PhaseEvent`, pure `next_phase` transition  |
//! | [`agent`]   | `Agent` — position, cached path, journal, history    |
//! | [`journal`] | `Action`, `SnapshotRecord`                           |
//! | [`error`]   | `ProfileError`                                       |
//!
//! The phase machine is a pure function over `(phase, event, input)`; the
//! [`Agent`] applies its result, records the transition, and owns the
//! side effects (first-alarm stamping, path invalidation on `Avoid`).
//! The scheduler in `evac-sim` owns movement itself.

pub mod agent;
pub mod error;
pub mod journal;
pub mod phase;
pub mod profile;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use agent::{Agent, PhaseTransition};
pub use error::ProfileError;
pub use journal::{Action, SYSTEM_NAME, SnapshotRecord};
pub use phase::{Phase, PhaseEvent, PhaseInput, next_phase};
pub use profile::{MobilityProfile, ProfileSet};
