//! Error types for scenario loading and simulation setup.
//!
//! Everything here is a configuration-time failure: once a `Sim` is built,
//! runtime anomalies (no path, rejected moves, out-of-bounds events) are
//! absorbed locally and reflected in the snapshot log, never raised.

use thiserror::Error;

use evac_core::CellPos;

/// Errors raised while loading or validating a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("terrain matrix is empty")]
    EmptyGrid,

    #[error("terrain matrix row {row} has a different length than row 0")]
    RaggedGrid { row: usize },

    #[error("unknown terrain code {code} at ({x},{y})")]
    UnknownTerrainCode { code: u8, x: usize, y: usize },

    #[error("exit {0} is outside the grid")]
    ExitOutOfBounds(CellPos),

    #[error("exit {0} is on blocked terrain")]
    ExitBlocked(CellPos),

    #[error("spawn for class {class:?} at {pos} is outside the grid")]
    SpawnOutOfBounds { class: String, pos: CellPos },

    #[error("unknown event kind {kind:?} at tick {tick}")]
    UnknownEventKind { kind: String, tick: u64 },

    #[error("event kind {kind:?} at tick {tick} requires a cell")]
    MissingEventCell { kind: String, tick: u64 },
}

/// Errors raised while building or running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("spawn {name:?} references unknown agent class {class:?}")]
    UnknownClass { name: String, class: String },

    #[error("spawn {name:?} (class {class:?}) at {pos} is not walkable for that class")]
    SpawnUnwalkable {
        name: String,
        class: String,
        pos: CellPos,
    },

    #[error("simulation configuration error: {0}")]
    Config(String),
}

pub type SimResult<T> = Result<T, SimError>;
