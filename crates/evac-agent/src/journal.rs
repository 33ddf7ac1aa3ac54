//! Snapshot records — the rows the simulation emits and the writers persist.

use evac_core::{CellPos, Tick};

use crate::Phase;

/// Name used on records describing environment events rather than an agent.
pub const SYSTEM_NAME: &str = "SYSTEM";

// ── Action ────────────────────────────────────────────────────────────────────

/// What happened in one record.  This vocabulary is closed: downstream
/// analysis tools match on these exact tags.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Action {
    /// The agent committed a one-cell move.
    Moved,
    /// The agent's move attempt failed against current walkability.
    Blocked,
    /// The agent stayed put this tick (idle, reacting, congested, or
    /// blocked by another occupant).
    Wait,
    /// The agent discarded its cached path; a fresh plan follows.
    Replan,
    /// The agent reached the exit.
    Arrived,
    /// The agent's intended step left the grid and was rejected.
    OutOfBounds,
    /// Environment event: a cell became blocked.
    BlockCell,
    /// Environment event: a blocked cell was cleared.
    ClearCell,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Moved => "Moved",
            Action::Blocked => "Blocked",
            Action::Wait => "Wait",
            Action::Replan => "Replan",
            Action::Arrived => "Arrived",
            Action::OutOfBounds => "OutOfBounds",
            Action::BlockCell => "BlockCell",
            Action::ClearCell => "ClearCell",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SnapshotRecord ────────────────────────────────────────────────────────────

/// One timestamped observation: an agent acted, or an environment event was
/// applied.  Records are append-only — the log is never truncated during a
/// run.
#[derive(Clone, PartialEq, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SnapshotRecord {
    /// Wall-clock stamp derived from the sim clock.
    pub unix_time_secs: i64,
    pub tick: Tick,
    /// Agent name, or [`SYSTEM_NAME`] for environment records.
    pub name: String,
    /// The agent's position, or the affected cell for terrain events.
    /// `None` for records with no location (a system record for a global
    /// event would be one, if emitted).
    pub position: Option<CellPos>,
    /// The agent's phase after acting; `None` on system records.
    pub phase: Option<Phase>,
    pub action: Action,
}

impl SnapshotRecord {
    /// Build a record describing an agent's action this tick.
    pub fn agent(
        unix_time_secs: i64,
        tick: Tick,
        name: &str,
        position: CellPos,
        phase: Phase,
        action: Action,
    ) -> Self {
        Self {
            unix_time_secs,
            tick,
            name: name.to_owned(),
            position: Some(position),
            phase: Some(phase),
            action,
        }
    }

    /// Build a record describing an applied terrain event.
    pub fn system(unix_time_secs: i64, tick: Tick, cell: CellPos, action: Action) -> Self {
        Self {
            unix_time_secs,
            tick,
            name: SYSTEM_NAME.to_owned(),
            position: Some(cell),
            phase: None,
            action,
        }
    }
}
