//! `evac-sim` — tick loop orchestrator for the rust_evac simulator.
//!
//! # Per-tick sequence
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Events     — drain this tick's schedule: global events first (alarm
//!                  broadcast), terrain events second (block/clear cells).
//!   ② Congestion — rebuild the congestion source if occupancy changed.
//!   ③ Agents     — for each active agent, in fixed spawn order:
//!                  arrival check → local congestion → phase step →
//!                  replan decision → exactly one cell move or one wait,
//!                  re-validated against current walkability at commit.
//!   ④ Telemetry  — emit a live-state frame at the configured cadence.
//!   Early exit when every agent has arrived.
//! ```
//!
//! Agent order within a tick is significant (earlier agents can occupy cells
//! that block later agents the same tick) and fixed, so identical seeds and
//! scenarios produce identical record streams.
//!
//! | Module       | Contents                                        |
//! |--------------|-------------------------------------------------|
//! | [`events`]   | `EnvEvent`, `EventSchedule`                     |
//! | [`scenario`] | `Scenario` + JSON loader and validation         |
//! | [`sim`]      | `Sim<P, C, Q>` and the tick loop                |
//! | [`builder`]  | `SimBuilder`                                    |
//! | [`observer`] | `SimObserver`, `NoopObserver`, `LiveFrame`      |

pub mod builder;
pub mod error;
pub mod events;
pub mod observer;
pub mod scenario;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{ScenarioError, SimError, SimResult};
pub use events::{EnvEvent, EventSchedule};
pub use observer::{AgentFrame, LiveFrame, NoopObserver, SimObserver};
pub use scenario::{Scenario, SpawnSpec};
pub use sim::Sim;
