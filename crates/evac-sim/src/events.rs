//! Environment events and their per-tick schedule.
//!
//! # Ordering guarantee
//!
//! Each event is consumed exactly once, at its scheduled tick.  Among events
//! scheduled for the same tick, global events take effect before terrain
//! events — an alarm and a block scheduled together are both in force before
//! any agent acts that tick.  The scheduler enforces this by applying the
//! drained batch in two passes.

use std::collections::BTreeMap;

use evac_core::{CellPos, Tick};

// ── EnvEvent ──────────────────────────────────────────────────────────────────

/// One scheduled environment event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EnvEvent {
    /// Fire alarm broadcast to every agent's phase machine.
    Alarm,
    /// Earthquake — delivered to agents exactly like an alarm.
    Quake,
    /// The cell becomes `Blocked`.
    BlockCell(CellPos),
    /// The cell reverts to `Passable`.
    ClearCell(CellPos),
}

impl EnvEvent {
    /// `true` for events broadcast to agents rather than applied to terrain.
    #[inline]
    pub fn is_global(self) -> bool {
        matches!(self, EnvEvent::Alarm | EnvEvent::Quake)
    }

    /// The affected cell, for terrain events.
    pub fn cell(self) -> Option<CellPos> {
        match self {
            EnvEvent::BlockCell(c) | EnvEvent::ClearCell(c) => Some(c),
            _ => None,
        }
    }
}

// ── EventSchedule ─────────────────────────────────────────────────────────────

/// Sparse tick → events map.
///
/// Most ticks carry no events; a `BTreeMap` keyed by tick makes draining a
/// tick O(log W) in the number of distinct scheduled ticks and keeps
/// same-tick insertion order stable.
#[derive(Debug, Default)]
pub struct EventSchedule {
    inner: BTreeMap<Tick, Vec<EnvEvent>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl EventSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` for `tick`.
    pub fn push(&mut self, tick: Tick, event: EnvEvent) {
        self.inner.entry(tick).or_default().push(event);
        self.total += 1;
    }

    /// Remove and return all events scheduled for exactly `tick`.
    ///
    /// Returns `None` if nothing is queued for that tick (the common case —
    /// avoids allocation).
    pub fn drain_tick(&mut self, tick: Tick) -> Option<Vec<EnvEvent>> {
        let events = self.inner.remove(&tick)?;
        self.total -= events.len();
        Some(events)
    }

    /// The earliest tick with at least one pending event, or `None` if empty.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Total pending events across all future ticks.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl FromIterator<(Tick, EnvEvent)> for EventSchedule {
    fn from_iter<I: IntoIterator<Item = (Tick, EnvEvent)>>(iter: I) -> Self {
        let mut schedule = Self::new();
        for (tick, event) in iter {
            schedule.push(tick, event);
        }
        schedule
    }
}
