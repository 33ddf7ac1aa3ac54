//! The `Agent` — one evacuee's identity, position, and mutable state.

use std::sync::Arc;

use evac_core::{AgentId, AgentRng, CellPos, Tick};
use evac_route::Path;

use crate::phase::elapsed_since;
use crate::{MobilityProfile, Phase, PhaseEvent, PhaseInput, SnapshotRecord, next_phase};

/// One recorded phase transition, for auditability.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PhaseTransition {
    pub tick: Tick,
    pub from: Phase,
    pub to: Phase,
}

/// One evacuee.
///
/// Created at simulation start and kept in the active set for the whole run;
/// reaching the exit is a terminal *phase*, not removal, so an arrived
/// agent's occupancy persists.
#[derive(Debug)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    /// Shared, immutable class profile.
    pub profile: Arc<MobilityProfile>,
    pub position: CellPos,
    pub phase: Phase,

    /// Cached path from the last planning call; `None` when invalidated.
    path: Option<Path>,
    /// Index of the next cell to step onto within the cached path.
    cursor: usize,

    /// Consecutive ticks spent blocked by another occupant.
    pub wait_streak: u32,
    /// Tick at which this agent first observed an alarm.
    alarm_seen: Option<Tick>,
    /// Tick of the last committed move, for the profile's inter-move delay.
    last_move: Option<Tick>,

    /// Deterministic RNG for the random-walk fallback.
    pub rng: AgentRng,

    journal: Vec<SnapshotRecord>,
    transitions: Vec<PhaseTransition>,
}

impl Agent {
    pub fn new(
        id: AgentId,
        name: String,
        profile: Arc<MobilityProfile>,
        position: CellPos,
        global_seed: u64,
    ) -> Self {
        Self {
            id,
            name,
            profile,
            position,
            phase: Phase::Idle,
            path: None,
            cursor: 0,
            wait_streak: 0,
            alarm_seen: None,
            last_move: None,
            rng: AgentRng::new(global_seed, id),
            journal: Vec::new(),
            transitions: Vec::new(),
        }
    }

    // ── Phase machine ─────────────────────────────────────────────────────

    /// Feed one tick's event and local congestion to the phase machine.
    ///
    /// Stamps the first alarm observation, applies the (pure) transition,
    /// records it in the transition history, and performs the one mandated
    /// side effect: entering `Avoid` discards the cached path.
    ///
    /// Returns the phase after the step.
    pub fn step_phase(&mut self, now: Tick, event: Option<PhaseEvent>, congestion: f32) -> Phase {
        if event == Some(PhaseEvent::Alarm) && self.alarm_seen.is_none() {
            self.alarm_seen = Some(now);
        }

        let input = PhaseInput {
            ticks_since_alarm: elapsed_since(now, self.alarm_seen),
            reaction_ticks: self.profile.reaction_ticks,
            congestion,
            tolerance: self.profile.tolerance,
        };

        let next = next_phase(self.phase, event, &input);
        if next != self.phase {
            self.transitions.push(PhaseTransition {
                tick: now,
                from: self.phase,
                to: next,
            });
            if next == Phase::Avoid {
                self.clear_path();
            }
            self.phase = next;
        }
        next
    }

    /// Append-only transition history; never truncated during a run.
    pub fn transitions(&self) -> &[PhaseTransition] {
        &self.transitions
    }

    #[inline]
    pub fn arrived(&self) -> bool {
        self.phase.is_terminal()
    }

    // ── Cached path ───────────────────────────────────────────────────────

    /// Install a freshly planned path and reset the cursor.
    pub fn set_path(&mut self, path: Path) {
        self.path = Some(path);
        self.cursor = 0;
    }

    /// Discard the cached path (replan trigger or `Avoid` entry).
    pub fn clear_path(&mut self) {
        self.path = None;
        self.cursor = 0;
    }

    /// `true` when a cached path exists and its cursor has not run past the
    /// end.
    pub fn has_usable_path(&self) -> bool {
        self.path.as_ref().is_some_and(|p| self.cursor < p.len())
    }

    /// The next cell the cached path would step onto.
    pub fn next_cell(&self) -> Option<CellPos> {
        self.path.as_ref().and_then(|p| p.cells.get(self.cursor)).copied()
    }

    /// Advance past the cell just committed.
    pub fn advance_cursor(&mut self) {
        self.cursor += 1;
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The not-yet-traversed suffix of the cached path (empty without one).
    pub fn remaining_path(&self) -> &[CellPos] {
        match &self.path {
            Some(p) if self.cursor < p.len() => &p.cells[self.cursor..],
            _ => &[],
        }
    }

    // ── Move pacing ───────────────────────────────────────────────────────

    /// `true` when the profile's minimum inter-move delay has elapsed.
    pub fn may_move(&self, now: Tick) -> bool {
        match self.last_move {
            None => true,
            Some(last) => now.since(last) >= self.profile.move_delay_ticks,
        }
    }

    /// Record a committed move at `now`.
    pub fn mark_moved(&mut self, now: Tick) {
        self.last_move = Some(now);
    }

    // ── Journal ───────────────────────────────────────────────────────────

    /// Append one snapshot record; the journal is append-only.
    pub fn record(&mut self, record: SnapshotRecord) {
        self.journal.push(record);
    }

    pub fn journal(&self) -> &[SnapshotRecord] {
        &self.journal
    }
}
