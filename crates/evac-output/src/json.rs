//! JSON output backend.
//!
//! Writes the whole run as one JSON array in `snapshot_log.json` — the shape
//! the statistics tooling consumes.  Records are buffered in memory and
//! serialized once at `finish`, so the file is always a complete, valid
//! document.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use evac_agent::SnapshotRecord;

use crate::OutputResult;
use crate::writer::SnapshotWriter;

/// Writes the snapshot log as a single JSON array.
pub struct JsonWriter {
    path: PathBuf,
    records: Vec<SnapshotRecord>,
    finished: bool,
}

impl JsonWriter {
    /// Target `snapshot_log.json` inside `dir`.  The file is created at
    /// `finish`, not here.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join("snapshot_log.json"),
            records: Vec::new(),
            finished: false,
        }
    }

    /// Records buffered so far (useful for in-process summaries).
    pub fn records(&self) -> &[SnapshotRecord] {
        &self.records
    }
}

impl SnapshotWriter for JsonWriter {
    fn write_records(&mut self, records: &[SnapshotRecord]) -> OutputResult<()> {
        self.records.extend_from_slice(records);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        let file = std::fs::File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.records)?;
        Ok(())
    }
}
