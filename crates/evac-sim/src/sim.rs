//! The `Sim` struct and its tick loop.

use evac_agent::{Action, Agent, Phase, PhaseEvent, SnapshotRecord};
use evac_core::{CellPos, SimClock, SimConfig, Terrain, Tick};
use evac_grid::{CongestionSource, GridMap};
use evac_route::{Planner, ReplanContext, ReplanPolicy};

use crate::observer::{AgentFrame, LiveFrame};
use crate::{EnvEvent, EventSchedule, SimObserver, SimResult};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<P, C, Q>` owns all simulation state and drives the tick loop.  The
/// three algorithmic plugs are type parameters, swapped at compile time with
/// no runtime overhead:
///
/// - `P`: the path planner (e.g. [`evac_route::AStarPlanner`]).
/// - `C`: the congestion source (e.g. [`evac_grid::LocalOccupancy`] or
///   [`evac_grid::SpreadField`]).
/// - `Q`: the replanning policy (e.g. [`evac_route::WaitThresholdPolicy`]).
///
/// Create via [`SimBuilder`][crate::SimBuilder].
#[derive(Debug)]
pub struct Sim<P: Planner, C: CongestionSource, Q: ReplanPolicy> {
    /// Global configuration (tick budget, seed, telemetry cadence, …).
    pub config: SimConfig,

    /// Simulation clock — tracks the current tick and maps to wall time.
    pub clock: SimClock,

    /// The floor grid: terrain plus live occupancy.
    pub grid: GridMap,

    /// The exit every agent is evacuating toward.
    pub exit: CellPos,

    /// All agents, in spawn order.  Processing order within a tick is this
    /// order, which keeps runs deterministic.
    pub agents: Vec<Agent>,

    /// Pending environment events, keyed by tick.
    pub events: EventSchedule,

    /// The path planner.
    pub planner: P,

    /// The congestion source consumed by the planner.
    pub congestion: C,

    /// The replanning policy.
    pub policy: Q,

    /// Set when occupancy changed since the congestion source last rebuilt.
    pub(crate) occupancy_dirty: bool,
}

impl<P: Planner, C: CongestionSource, Q: ReplanPolicy> Sim<P, C, Q> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to the budget, ending early once every
    /// agent has arrived.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }

            observer.on_tick_start(now);
            self.process_tick(now, observer)?;
            self.emit_frame_if_due(now, observer);
            observer.on_tick_end(now);
            self.clock.advance();

            if self.all_arrived() {
                break;
            }
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores the budget
    /// and the all-arrived early exit).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            observer.on_tick_start(now);
            self.process_tick(now, observer)?;
            self.emit_frame_if_due(now, observer);
            observer.on_tick_end(now);
            self.clock.advance();
        }
        Ok(())
    }

    /// `true` once every agent is in the terminal phase.
    pub fn all_arrived(&self) -> bool {
        self.agents.iter().all(Agent::arrived)
    }

    /// Build a live-state frame for telemetry consumers.
    pub fn live_frame(&self, now: Tick) -> LiveFrame {
        LiveFrame {
            tick: now.0,
            agents: self
                .agents
                .iter()
                .map(|a| AgentFrame {
                    id: a.id.0,
                    name: a.name.clone(),
                    position: a.position,
                    goal: self.exit,
                    path: a.remaining_path().to_vec(),
                    arrived: a.arrived(),
                })
                .collect(),
            congestion: (0..self.grid.cell_count())
                .map(|i| self.grid.congestion(self.grid.cell_at(i)))
                .collect(),
            grid_width: self.grid.width(),
            grid_height: self.grid.height(),
        }
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<()> {
        let unix = self.clock.unix_secs_at(now);

        // ── Phase 1: events — globals first, then terrain ─────────────────
        //
        // An alarm and a block scheduled for the same tick are both in force
        // before any agent acts.
        let drained = self.events.drain_tick(now).unwrap_or_default();

        let mut global_event = None;
        for event in &drained {
            if event.is_global() {
                global_event = Some(PhaseEvent::Alarm);
                observer.on_event(now, event, true);
            }
        }

        for event in &drained {
            let (cell, kind, action) = match *event {
                EnvEvent::BlockCell(cell) => (cell, Terrain::Blocked, Action::BlockCell),
                EnvEvent::ClearCell(cell) => (cell, Terrain::Passable, Action::ClearCell),
                _ => continue,
            };
            // Out-of-bounds events are ignored, not applied; the observer
            // call (applied = false) is their log entry.
            let applied = self.grid.set_terrain(cell, kind);
            observer.on_event(now, event, applied);
            if applied {
                let record = SnapshotRecord::system(unix, now, cell, action);
                observer.on_record(&record);
            }
        }

        // ── Phase 2: congestion rebuild ───────────────────────────────────
        //
        // Only when occupancy changed since the last rebuild; the spread
        // field recomputes from scratch, so skipping clean ticks matters.
        if self.occupancy_dirty {
            self.congestion.rebuild(&self.grid);
            self.occupancy_dirty = false;
        }

        // ── Phase 3: agents, in fixed spawn order ─────────────────────────
        //
        // Earlier agents can occupy cells that block later agents within the
        // same tick; the fixed order makes that reproducible.
        let Sim {
            grid,
            agents,
            planner,
            congestion,
            policy,
            exit,
            ..
        } = self;

        let mut moved_any = false;
        for agent in agents.iter_mut() {
            moved_any |= Self::step_agent(
                grid,
                &*planner,
                &*congestion,
                &*policy,
                agent,
                *exit,
                now,
                unix,
                global_event,
                observer,
            );
        }
        if moved_any {
            self.occupancy_dirty = true;
        }

        Ok(())
    }

    /// Advance one agent by at most one cell.  Returns `true` when a move
    /// was committed (occupancy changed).
    #[allow(clippy::too_many_arguments)]
    fn step_agent<O: SimObserver>(
        grid: &mut GridMap,
        planner: &P,
        congestion: &C,
        policy: &Q,
        agent: &mut Agent,
        exit: CellPos,
        now: Tick,
        unix: i64,
        global_event: Option<PhaseEvent>,
        observer: &mut O,
    ) -> bool {
        if agent.arrived() {
            return false;
        }

        // ── Arrival check ─────────────────────────────────────────────────
        //
        // An agent standing on the exit transitions to the terminal phase
        // (reported with zero congestion so arrival is never masked) and
        // stays resident — arrival is a phase, not removal.
        if agent.position == exit {
            agent.step_phase(now, Some(PhaseEvent::AtExit), 0.0);
            let action = if agent.arrived() { Action::Arrived } else { Action::Wait };
            emit(agent, observer, unix, now, action);
            return false;
        }

        // ── Phase step with the tick's global event ───────────────────────
        let local_congestion = grid.congestion(agent.position);
        agent.step_phase(now, global_event, local_congestion);

        // Idle and Wait hold position; so do agents whose inter-move delay
        // has not elapsed.
        if matches!(agent.phase, Phase::Idle | Phase::Wait) || !agent.may_move(now) {
            emit(agent, observer, unix, now, Action::Wait);
            return false;
        }

        // ── Plan when no usable path exists ───────────────────────────────
        if !agent.has_usable_path() {
            match planner.plan(grid, congestion, agent.position, exit, agent.profile.access, true)
            {
                Some(path) if !path.is_empty() => agent.set_path(path),
                _ => agent.clear_path(),
            }
        }

        // ── Replanning policy on the cached path ──────────────────────────
        let next_from_path = if agent.has_usable_path() {
            let invalidated = match agent.path() {
                Some(path) => {
                    let ctx = ReplanContext {
                        grid: &*grid,
                        congestion: congestion as &dyn CongestionSource,
                        access: agent.profile.access,
                        position: agent.position,
                        goal: exit,
                        path,
                        cursor: agent.cursor(),
                    };
                    policy.invalidate(&ctx, planner)
                }
                None => false,
            };
            if invalidated {
                agent.clear_path();
                agent.wait_streak = 0;
                emit(agent, observer, unix, now, Action::Replan);
                return false; // fresh plan on the next eligible tick
            }
            agent.next_cell()
        } else {
            None
        };

        // ── Fallback: one random walkable step ────────────────────────────
        //
        // A pathless agent keeps probing instead of halting indefinitely; it
        // remains eligible for replanning every subsequent tick.
        let (target, from_path) = match next_from_path {
            Some(cell) => (cell, true),
            None => {
                let candidates: Vec<CellPos> = agent
                    .position
                    .neighbors4()
                    .into_iter()
                    .filter(|&c| grid.walkable(c, agent.profile.access))
                    .collect();
                match agent.rng.choose(&candidates).copied() {
                    Some(cell) => (cell, false),
                    None => {
                        emit(agent, observer, unix, now, Action::Wait);
                        return false;
                    }
                }
            }
        };

        // ── Move attempt — the final arbiter of legality ──────────────────

        if !grid.in_bounds(target) {
            emit(agent, observer, unix, now, Action::OutOfBounds);
            return false;
        }

        // Another agent holds the target: tolerate a short wait; past the
        // policy's threshold, force a replan.  The exit is exempt — arrived
        // agents stay resident there and must not wall it off.
        if grid.occupancy(target) > 0 && target != exit {
            agent.step_phase(now, None, 1.0);
            agent.wait_streak += 1;
            emit(agent, observer, unix, now, Action::Wait);
            if let Some(threshold) = policy.wait_threshold() {
                if agent.wait_streak >= threshold {
                    agent.clear_path();
                    agent.wait_streak = 0;
                    emit(agent, observer, unix, now, Action::Replan);
                }
            }
            return false;
        }

        // Re-validate walkability at commit time: an environment event (or a
        // planner bug) may have invalidated the cell within this tick.
        if grid.walkable(target, agent.profile.access) {
            grid.vacate(agent.position);
            agent.position = target;
            grid.occupy(target);
            if from_path {
                agent.advance_cursor();
            }
            agent.mark_moved(now);
            agent.wait_streak = 0;
            agent.step_phase(now, Some(PhaseEvent::Clear), local_congestion);
            emit(agent, observer, unix, now, Action::Moved);
            true
        } else {
            agent.step_phase(now, Some(PhaseEvent::Obstacle), local_congestion);
            agent.clear_path();
            agent.wait_streak = 0;
            emit(agent, observer, unix, now, Action::Blocked);
            false
        }
    }

    fn emit_frame_if_due<O: SimObserver>(&self, now: Tick, observer: &mut O) {
        if self.config.telemetry_interval_ticks > 0
            && now.0.is_multiple_of(self.config.telemetry_interval_ticks)
        {
            let frame = self.live_frame(now);
            observer.on_frame(&frame);
        }
    }
}

// ── Record emission ───────────────────────────────────────────────────────────

/// Append a record to the agent's journal and forward it to the observer.
fn emit<O: SimObserver>(
    agent: &mut Agent,
    observer: &mut O,
    unix: i64,
    now: Tick,
    action: Action,
) {
    let record = SnapshotRecord::agent(unix, now, &agent.name, agent.position, agent.phase, action);
    agent.record(record.clone());
    observer.on_record(&record);
}
