//! Simulation observer trait, live-state frames, and the no-op observer.

use evac_agent::SnapshotRecord;
use evac_core::{CellPos, Tick};

use crate::EnvEvent;

// ── LiveFrame ─────────────────────────────────────────────────────────────────

/// One agent's live state inside a [`LiveFrame`].
#[derive(Clone, Debug, serde::Serialize)]
pub struct AgentFrame {
    pub id: u32,
    pub name: String,
    pub position: CellPos,
    pub goal: CellPos,
    /// The not-yet-traversed remainder of the cached path.
    pub path: Vec<CellPos>,
    pub arrived: bool,
}

/// A point-in-time view of the whole simulation, pushed to telemetry
/// consumers (an external renderer, a dashboard) at a configurable cadence.
///
/// Dropping or delaying frames cannot change simulation outcomes: frames are
/// built read-only after the tick's agent processing completes.
#[derive(Clone, Debug, serde::Serialize)]
pub struct LiveFrame {
    pub tick: u64,
    pub agents: Vec<AgentFrame>,
    /// Normalized congestion per cell, row-major.
    pub congestion: Vec<f32>,
    pub grid_width: i32,
    pub grid_height: i32,
}

// ── SimObserver ───────────────────────────────────────────────────────────────

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_record(&mut self, record: &SnapshotRecord) {
///         println!("{} {} {}", record.tick, record.name, record.action);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for every scheduled event at its tick.
    ///
    /// `applied` is `false` when the event was ignored (terrain event on an
    /// out-of-bounds cell); this callback is the log entry for such events.
    fn on_event(&mut self, _tick: Tick, _event: &EnvEvent, _applied: bool) {}

    /// Called for every snapshot record, in emission order: terrain-event
    /// system records first, then agent records in agent order.  The stream
    /// across a whole run is the durable per-tick snapshot output.
    fn on_record(&mut self, _record: &SnapshotRecord) {}

    /// Called every `config.telemetry_interval_ticks` ticks with the
    /// live-state frame (never called when the interval is 0).
    fn on_frame(&mut self, _frame: &LiveFrame) {}

    /// Called at the end of each tick, after all agents acted.
    fn on_tick_end(&mut self, _tick: Tick) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
