//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `EvacError` via `From` impls or keep them separate and wrap `EvacError`
//! as one variant.  Both patterns are acceptable; prefer whichever keeps
//! error sites clean.

use thiserror::Error;

use crate::{AgentId, CellPos};

/// The top-level error type for `evac-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EvacError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("cell {0} is outside the grid")]
    OutOfBounds(CellPos),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `evac-*` crates.
pub type EvacResult<T> = Result<T, EvacError>;
