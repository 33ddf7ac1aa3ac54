//! Live-state telemetry for an external renderer.
//!
//! The simulator pushes [`LiveFrame`]s at a configurable cadence; a
//! [`TelemetrySink`] decides where they go.  [`JsonLinesSink`] writes one
//! JSON object per line to any `io::Write` — a file for later playback, or
//! a `TcpStream` feeding a renderer live.  Telemetry is read-only and
//! droppable: losing frames cannot change simulation outcomes.

use std::io::Write;

use evac_sim::{LiveFrame, SimObserver};

use crate::{OutputError, OutputResult};

// ── TelemetrySink ─────────────────────────────────────────────────────────────

/// Destination for live-state frames.
pub trait TelemetrySink {
    fn push(&mut self, frame: &LiveFrame) -> OutputResult<()>;
}

/// Newline-delimited JSON frames over any writer.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TelemetrySink for JsonLinesSink<W> {
    fn push(&mut self, frame: &LiveFrame) -> OutputResult<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

// ── TelemetryObserver ─────────────────────────────────────────────────────────

/// A [`SimObserver`] forwarding frames to a sink.
///
/// Sink errors are held internally (observer callbacks return nothing) and
/// retrieved with [`take_error`][Self::take_error]; a failing sink never
/// interrupts the run.
pub struct TelemetryObserver<S: TelemetrySink> {
    sink: S,
    last_error: Option<OutputError>,
}

impl<S: TelemetrySink> TelemetryObserver<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, last_error: None }
    }

    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: TelemetrySink> SimObserver for TelemetryObserver<S> {
    fn on_frame(&mut self, frame: &LiveFrame) {
        if let Err(e) = self.sink.push(frame) {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}
