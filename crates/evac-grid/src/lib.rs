//! `evac-grid` — the grid map for the rust_evac simulator.
//!
//! Owns terrain classification and live per-cell occupancy, and answers the
//! two questions everything else asks:
//!
//! - **Walkability** (hard): can this profile enter this cell at all?
//! - **Congestion** (soft): how crowded is this cell right now?
//!
//! Congestion never makes a cell unwalkable — it only raises its cost.
//!
//! | Module         | Contents                                            |
//! |----------------|-----------------------------------------------------|
//! | [`map`]        | `GridMap`                                           |
//! | [`congestion`] | `CongestionSource`, `LocalOccupancy`, `SpreadField` |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                             |
//! |------------|----------------------------------------------------|
//! | `parallel` | Spread-field rebuild runs row-parallel on Rayon.   |

pub mod congestion;
pub mod map;


pub use congestion::{CongestionSource, LocalOccupancy, SpreadField};
pub use map::GridMap;
