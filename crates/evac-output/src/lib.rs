//! `evac-output` — persistence for the rust_evac simulator.
//!
//! The snapshot log (every agent action and terrain event, in order) is the
//! durable artifact external analysis tools consume.  Backends implement
//! [`SnapshotWriter`] and are driven by [`SnapshotObserver`], which plugs
//! into `evac_sim::SimObserver`:
//!
//! | Feature  | Backend | Files created       |
//! |----------|---------|---------------------|
//! | *(none)* | CSV     | `snapshot_log.csv`  |
//! | *(none)* | JSON    | `snapshot_log.json` |
//! | `sqlite` | SQLite  | `snapshot_log.db`   |
//!
//! Beyond the raw log, [`summary`] folds a record stream into per-agent
//! statistics (and a summary CSV), and [`telemetry`] streams live-state
//! frames as JSON lines to any `io::Write` — a file, a pipe, or a
//! `TcpStream` feeding an external renderer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use evac_output::{CsvWriter, SnapshotObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SnapshotObserver::new(writer);
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod observer;
pub mod summary;
pub mod telemetry;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use json::JsonWriter;
pub use observer::SnapshotObserver;
pub use summary::{AgentSummary, summarize, write_summary_csv};
pub use telemetry::{JsonLinesSink, TelemetryObserver, TelemetrySink};
pub use writer::SnapshotWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
