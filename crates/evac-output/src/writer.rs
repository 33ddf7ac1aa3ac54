//! The `SnapshotWriter` trait implemented by all backend writers.

use evac_agent::SnapshotRecord;

use crate::OutputResult;

/// Trait implemented by the CSV, JSON, and SQLite writers.
///
/// Writers never see the simulation — they receive finished records from
/// [`SnapshotObserver`][crate::SnapshotObserver], which also holds their
/// errors (observer callbacks have no return value).
pub trait SnapshotWriter {
    /// Persist a batch of records, in order.
    fn write_records(&mut self, records: &[SnapshotRecord]) -> OutputResult<()>;

    /// Flush and close all underlying resources.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
