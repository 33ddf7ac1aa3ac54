//! `SnapshotObserver<W>` — bridges `SimObserver` to a `SnapshotWriter`.

use evac_agent::SnapshotRecord;
use evac_core::Tick;
use evac_sim::SimObserver;

use crate::writer::SnapshotWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that batches each tick's records and hands them to any
/// [`SnapshotWriter`] backend (CSV, JSON, SQLite).
///
/// Writing happens at tick boundaries, explicitly outside the core loop's
/// critical path.  Errors from the writer are stored internally because
/// `SimObserver` methods have no return value; after `sim.run()` returns,
/// check with [`take_error`][Self::take_error].
pub struct SnapshotObserver<W: SnapshotWriter> {
    writer: W,
    pending: Vec<SnapshotRecord>,
    last_error: Option<OutputError>,
}

impl<W: SnapshotWriter> SnapshotObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending: Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect buffered records).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.pending);
        let result = self.writer.write_records(&batch);
        self.store_err(result);
    }
}

impl<W: SnapshotWriter> SimObserver for SnapshotObserver<W> {
    fn on_record(&mut self, record: &SnapshotRecord) {
        self.pending.push(record.clone());
    }

    fn on_tick_end(&mut self, _tick: Tick) {
        self.flush_pending();
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        self.flush_pending();
        let result = self.writer.finish();
        self.store_err(result);
    }
}
