//! `evac-core` — foundational types for the `rust_evac` evacuation simulator.
//!
//! This crate is a dependency of every other `evac-*` crate.  It intentionally
//! has no `evac-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                          |
//! |-------------|---------------------------------------------------|
//! | [`ids`]     | `AgentId`                                         |
//! | [`cell`]    | `CellPos`, Manhattan/Euclidean distance           |
//! | [`terrain`] | `Terrain`, `TerrainSet`, `TerrainAccess`          |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`                   |
//! | [`rng`]     | `AgentRng` (per-agent), `SimRng` (global)         |
//! | [`error`]   | `EvacError`, `EvacResult`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                |
//! |---------|-------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.   |

pub mod cell;
pub mod error;
pub mod ids;
pub mod rng;
pub mod terrain;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::CellPos;
pub use error::{EvacError, EvacResult};
pub use ids::AgentId;
pub use rng::{AgentRng, SimRng};
pub use terrain::{Terrain, TerrainAccess, TerrainSet};
pub use time::{SimClock, SimConfig, Tick};
