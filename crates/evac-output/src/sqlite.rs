//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `snapshot_log.db` file in the configured output
//! directory with one `snapshot_log` table.

use std::path::Path;

use rusqlite::Connection;

use evac_agent::SnapshotRecord;

use crate::OutputResult;
use crate::writer::SnapshotWriter;

/// Writes the snapshot log to an SQLite database.
pub struct SqliteWriter {
    conn: Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `snapshot_log.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("snapshot_log.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS snapshot_log (
                 tick           INTEGER NOT NULL,
                 unix_time_secs INTEGER NOT NULL,
                 name           TEXT    NOT NULL,
                 x              INTEGER,
                 y              INTEGER,
                 phase          TEXT,
                 action         TEXT    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl SnapshotWriter for SqliteWriter {
    fn write_records(&mut self, records: &[SnapshotRecord]) -> OutputResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO snapshot_log \
                 (tick, unix_time_secs, name, x, y, phase, action) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for record in records {
                stmt.execute(rusqlite::params![
                    record.tick.0,
                    record.unix_time_secs,
                    record.name,
                    record.position.map(|p| p.x),
                    record.position.map(|p| p.y),
                    record.phase.map(|p| p.as_str()),
                    record.action.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
