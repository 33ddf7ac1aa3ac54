//! CSV output backend.
//!
//! Creates `snapshot_log.csv` in the configured output directory, one row
//! per record.  System records (terrain events) leave the `phase` column
//! empty.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use evac_agent::SnapshotRecord;

use crate::OutputResult;
use crate::writer::SnapshotWriter;

/// Writes the snapshot log to a CSV file.
pub struct CsvWriter {
    log: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) `snapshot_log.csv` in `dir` and write the header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut log = Writer::from_path(dir.join("snapshot_log.csv"))?;
        log.write_record(["tick", "unix_time_secs", "name", "x", "y", "phase", "action"])?;
        Ok(Self { log, finished: false })
    }
}

impl SnapshotWriter for CsvWriter {
    fn write_records(&mut self, records: &[SnapshotRecord]) -> OutputResult<()> {
        for record in records {
            let (x, y) = match record.position {
                Some(pos) => (pos.x.to_string(), pos.y.to_string()),
                None => (String::new(), String::new()),
            };
            self.log.write_record(&[
                record.tick.0.to_string(),
                record.unix_time_secs.to_string(),
                record.name.clone(),
                x,
                y,
                record.phase.map(|p| p.as_str()).unwrap_or("").to_string(),
                record.action.as_str().to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.log.flush()?;
        Ok(())
    }
}
