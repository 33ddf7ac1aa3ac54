//! The behavioral phase machine.
//!
//! # Purity
//!
//! [`next_phase`] is a pure function `(phase, event, input) -> phase`.  It
//! mutates nothing and decides nothing about movement; the [`Agent`]
//! applies its result and records the transition, and the scheduler owns
//! movement execution.  This keeps the transition table and the movement
//! code independently testable.
//!
//! # Transition table
//!
//! | From     | Event / guard                                 | To       |
//! |----------|-----------------------------------------------|----------|
//! | Idle     | alarm, elapsed ≥ reaction                     | Evacuate |
//! | Idle     | alarm, elapsed < reaction                     | Wait     |
//! | Wait     | elapsed ≥ reaction                            | Evacuate |
//! | Evacuate | congestion > tolerance                        | Wait     |
//! | Evacuate | obstacle (move attempt failed)                | Avoid    |
//! | Evacuate | at exit                                       | Arrived  |
//! | Avoid    | clear (move succeeded or path replanned)      | Evacuate |
//! | Arrived  | —                                             | —        |
//!
//! When no guard matches, the phase is unchanged.  Elapsed reaction time is
//! measured from the tick the agent *first observed* an alarm, not from
//! simulation start.

use evac_core::Tick;

// ── Phase ─────────────────────────────────────────────────────────────────────

/// An agent's behavioral phase.  `Idle` is the unique initial phase,
/// `Arrived` the unique terminal one.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Wait,
    Evacuate,
    Avoid,
    Arrived,
}

impl Phase {
    /// `true` for the terminal phase — no transition ever leaves it.
    #[inline]
    pub fn is_terminal(self) -> bool {
        self == Phase::Arrived
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Wait => "Wait",
            Phase::Evacuate => "Evacuate",
            Phase::Avoid => "Avoid",
            Phase::Arrived => "Arrived",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PhaseEvent ────────────────────────────────────────────────────────────────

/// An event fed to the phase machine for one agent on one tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PhaseEvent {
    /// A global alarm (or quake) was broadcast this tick.
    Alarm,
    /// The agent's move attempt failed against current walkability.
    Obstacle,
    /// The agent's move attempt succeeded (or its path was replanned).
    Clear,
    /// The agent's position equals the exit.
    AtExit,
}

// ── PhaseInput ────────────────────────────────────────────────────────────────

/// Guard inputs for one transition evaluation.
#[derive(Copy, Clone, Debug)]
pub struct PhaseInput {
    /// Ticks since this agent first observed an alarm; `None` if it never
    /// has.  The reaction guards cannot fire before the first alarm.
    pub ticks_since_alarm: Option<u64>,
    /// The profile's reaction threshold, in ticks.
    pub reaction_ticks: u64,
    /// Local congestion at the agent's cell, normalized to `[0, 1]`.
    pub congestion: f32,
    /// The profile's crowd-tolerance threshold.
    pub tolerance: f32,
}

impl PhaseInput {
    #[inline]
    fn reaction_elapsed(&self) -> bool {
        self.ticks_since_alarm
            .is_some_and(|elapsed| elapsed >= self.reaction_ticks)
    }
}

// ── Transition function ───────────────────────────────────────────────────────

/// Evaluate the transition table once.  Returns the next phase, which equals
/// `phase` when no guard matches.
pub fn next_phase(phase: Phase, event: Option<PhaseEvent>, input: &PhaseInput) -> Phase {
    match phase {
        Phase::Idle => match event {
            Some(PhaseEvent::Alarm) if input.reaction_elapsed() => Phase::Evacuate,
            Some(PhaseEvent::Alarm) => Phase::Wait,
            _ => Phase::Idle,
        },

        Phase::Wait => {
            if input.reaction_elapsed() {
                Phase::Evacuate
            } else {
                Phase::Wait
            }
        }

        // Crowding is checked before the move-result events: a congested
        // agent pauses even when its last attempt succeeded.  Arrival is
        // always reported with zero congestion, so it is never masked.
        Phase::Evacuate => {
            if input.congestion > input.tolerance {
                Phase::Wait
            } else {
                match event {
                    Some(PhaseEvent::Obstacle) => Phase::Avoid,
                    Some(PhaseEvent::AtExit) => Phase::Arrived,
                    _ => Phase::Evacuate,
                }
            }
        }

        Phase::Avoid => match event {
            Some(PhaseEvent::Clear) => Phase::Evacuate,
            _ => Phase::Avoid,
        },

        Phase::Arrived => Phase::Arrived,
    }
}

/// Elapsed ticks since `alarm_seen`, for building a [`PhaseInput`].
#[inline]
pub(crate) fn elapsed_since(now: Tick, alarm_seen: Option<Tick>) -> Option<u64> {
    alarm_seen.map(|seen| now.since(seen))
}
