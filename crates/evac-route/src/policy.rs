//! Replanning policies — when does a cached path get thrown away?
//!
//! Two trigger families exist and are **never** combined:
//!
//! - [`WaitThresholdPolicy`]: the next path cell became unwalkable, or the
//!   agent has been blocked by another occupant for too many consecutive
//!   ticks.  The default deployment.
//! - [`CostImprovementPolicy`]: the next path cell became unwalkable, or a
//!   freshly planned candidate beats the cached remainder's re-costed total
//!   by more than a threshold fraction.  Used when dynamic obstacles are
//!   modeled explicitly; the wait-streak rule is inert under it.
//!
//! The structural trigger — no cached path, or the cursor ran past its end —
//! lives in the scheduler: there is nothing for a policy to inspect.
//!
//! A phase transition into `Avoid` also bypasses the policy entirely; the
//! scheduler discards the path unconditionally in that case.

use evac_core::{CellPos, TerrainAccess};
use evac_grid::{CongestionSource, GridMap};

use crate::path::{Path, path_cost};
use crate::planner::Planner;

/// Consecutive occupant-blocked waits tolerated before a forced replan.
pub const DEFAULT_WAIT_THRESHOLD: u32 = 10;

/// Minimum fractional cost improvement that justifies switching paths.
pub const DEFAULT_REPLANNING_THRESHOLD: f32 = 0.5;

// ── ReplanContext ─────────────────────────────────────────────────────────────

/// Everything a policy may inspect when judging a cached path.
pub struct ReplanContext<'a> {
    pub grid: &'a GridMap,
    pub congestion: &'a dyn CongestionSource,
    pub access: TerrainAccess,
    /// The agent's current position.
    pub position: CellPos,
    /// The exit the cached path was planned toward.
    pub goal: CellPos,
    /// The cached path.  Guaranteed non-exhausted: `cursor < path.len()`.
    pub path: &'a Path,
    /// Index of the next cell to step onto.
    pub cursor: usize,
}

impl ReplanContext<'_> {
    /// The next cell the agent would step onto.
    #[inline]
    pub fn next_cell(&self) -> CellPos {
        self.path.cells[self.cursor]
    }

    /// The not-yet-traversed suffix of the cached path.
    #[inline]
    pub fn remaining(&self) -> &[CellPos] {
        &self.path.cells[self.cursor..]
    }
}

// ── ReplanPolicy trait ────────────────────────────────────────────────────────

/// Pluggable replanning trigger set.
///
/// Evaluated once per agent per tick, before the move attempt, whenever the
/// agent's phase permits movement and a cached path is available.
pub trait ReplanPolicy: Send + Sync {
    /// `true` if the cached path must be discarded and replanned.
    fn invalidate(&self, ctx: &ReplanContext<'_>, planner: &dyn Planner) -> bool;

    /// Consecutive occupant-blocked waits tolerated before the scheduler
    /// forces a replan.  `None` disables the wait-streak rule.
    fn wait_threshold(&self) -> Option<u32> {
        None
    }
}

// ── WaitThresholdPolicy ───────────────────────────────────────────────────────

/// Default policy: replan when the next cell became unwalkable, or after
/// `wait_threshold` consecutive ticks blocked by another agent.  Short waits
/// are tolerated; persistent blocking is not.
#[derive(Clone, Copy, Debug)]
pub struct WaitThresholdPolicy {
    pub wait_threshold: u32,
}

impl Default for WaitThresholdPolicy {
    fn default() -> Self {
        Self { wait_threshold: DEFAULT_WAIT_THRESHOLD }
    }
}

impl ReplanPolicy for WaitThresholdPolicy {
    fn invalidate(&self, ctx: &ReplanContext<'_>, _planner: &dyn Planner) -> bool {
        // Terrain changed under the path since it was computed.
        !ctx.grid.walkable(ctx.next_cell(), ctx.access)
    }

    fn wait_threshold(&self) -> Option<u32> {
        Some(self.wait_threshold)
    }
}

// ── CostImprovementPolicy ─────────────────────────────────────────────────────

/// Cost-comparison policy: replan only when a fresh candidate plan undercuts
/// the cached remainder by more than `replanning_threshold` of its re-costed
/// total.  Avoids thrashing between near-equal paths every tick.
#[derive(Clone, Copy, Debug)]
pub struct CostImprovementPolicy {
    pub replanning_threshold: f32,
}

impl Default for CostImprovementPolicy {
    fn default() -> Self {
        Self { replanning_threshold: DEFAULT_REPLANNING_THRESHOLD }
    }
}

impl ReplanPolicy for CostImprovementPolicy {
    fn invalidate(&self, ctx: &ReplanContext<'_>, planner: &dyn Planner) -> bool {
        if !ctx.grid.walkable(ctx.next_cell(), ctx.access) {
            return true;
        }

        let old_cost = path_cost(ctx.grid, ctx.congestion, ctx.remaining());
        if old_cost == 0 {
            return false;
        }

        // Keep the cached path when no candidate exists at all.
        let Some(candidate) = planner.plan(
            ctx.grid,
            ctx.congestion,
            ctx.position,
            ctx.goal,
            ctx.access,
            true,
        ) else {
            return false;
        };

        let improvement = (old_cost as f32 - candidate.total_cost as f32) / old_cost as f32;
        improvement > self.replanning_threshold
    }
}
