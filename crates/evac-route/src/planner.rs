//! Planning trait and the default congestion-weighted A* implementation.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use evac_core::{CellPos, TerrainAccess};
use evac_grid::{CongestionSource, GridMap};

use crate::path::{COST_SCALE, Path, step_cost};

// ── Planner trait ─────────────────────────────────────────────────────────────

/// Pluggable path-planning engine.
///
/// Implement this trait to replace the default A* (e.g. with a flow-field or
/// hierarchical planner) without touching the scheduler.
///
/// # Contract
///
/// - Returns `None` when no route exists — a normal outcome, never an error.
/// - `start == goal` yields `Some` empty path rather than `None`.
/// - The returned path contains only cells walkable for `access` *at the
///   time of the query*; the scheduler still re-validates each step at
///   commit time because the grid may change afterwards.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so planning over a tick-start
/// snapshot can be fanned out across worker threads.
pub trait Planner: Send + Sync {
    /// Compute a path from `start` to `goal` for the given terrain access.
    ///
    /// `use_congestion_cost` switches the edge cost between
    /// `1 + congestion_weight(v)` and plain `1` per step.
    fn plan(
        &self,
        grid: &GridMap,
        congestion: &dyn CongestionSource,
        start: CellPos,
        goal: CellPos,
        access: TerrainAccess,
        use_congestion_cost: bool,
    ) -> Option<Path>;
}

// ── AStarPlanner ──────────────────────────────────────────────────────────────

/// Congestion-weighted A* over four-connected grid neighbors.
///
/// - Heuristic: Manhattan distance × [`COST_SCALE`] — admissible and
///   consistent because every step costs at least one full unit.
/// - Unwalkable neighbors (Blocked, disallowed stairs, avoided kinds) are
///   pruned before cost evaluation and never enter the open set.
/// - Min-heap on `f = g + h`; equal-priority entries break ties on cell
///   index.  Optimality does not depend on the tie order, but a fixed one
///   keeps runs reproducible.
#[derive(Debug)]
pub struct AStarPlanner;

impl Planner for AStarPlanner {
    fn plan(
        &self,
        grid: &GridMap,
        congestion: &dyn CongestionSource,
        start: CellPos,
        goal: CellPos,
        access: TerrainAccess,
        use_congestion_cost: bool,
    ) -> Option<Path> {
        astar(grid, congestion, start, goal, access, use_congestion_cost)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

const NO_PREV: u32 = u32::MAX;

#[inline]
fn heuristic(pos: CellPos, goal: CellPos) -> u32 {
    pos.manhattan(goal) * COST_SCALE
}

fn astar(
    grid: &GridMap,
    congestion: &dyn CongestionSource,
    start: CellPos,
    goal: CellPos,
    access: TerrainAccess,
    use_congestion_cost: bool,
) -> Option<Path> {
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return None;
    }
    if start == goal {
        return Some(Path { cells: vec![], total_cost: 0 });
    }

    let n = grid.cell_count();
    let start_idx = grid.cell_index(start);
    let goal_idx = grid.cell_index(goal);

    // g[v] = best known cost (milli-steps) to reach v.
    let mut g = vec![u32::MAX; n];
    // prev[v] = cell index we reached v from; NO_PREV for unreached cells.
    let mut prev = vec![NO_PREV; n];

    g[start_idx] = 0;

    // Min-heap: (f, cell index).  Reverse makes BinaryHeap (max) behave as
    // min-heap; the index doubles as a deterministic tie-break.
    let mut heap: BinaryHeap<Reverse<(u32, u32)>> = BinaryHeap::new();
    heap.push(Reverse((heuristic(start, goal), start_idx as u32)));

    while let Some(Reverse((f, idx))) = heap.pop() {
        let idx = idx as usize;
        if idx == goal_idx {
            return Some(reconstruct(grid, &prev, start_idx, goal_idx, g[goal_idx]));
        }

        // Skip stale heap entries (a cheaper route to this cell was found
        // after this entry was pushed).
        let pos = grid.cell_at(idx);
        if f > g[idx].saturating_add(heuristic(pos, goal)) {
            continue;
        }

        for neighbor in pos.neighbors4() {
            if !grid.walkable(neighbor, access) {
                continue;
            }
            let n_idx = grid.cell_index(neighbor);
            let new_g =
                g[idx].saturating_add(step_cost(grid, congestion, neighbor, use_congestion_cost));

            if new_g < g[n_idx] {
                g[n_idx] = new_g;
                prev[n_idx] = idx as u32;
                heap.push(Reverse((new_g + heuristic(neighbor, goal), n_idx as u32)));
            }
        }
    }

    // Open set drained without reaching the goal: no route exists.
    None
}

fn reconstruct(
    grid: &GridMap,
    prev: &[u32],
    start_idx: usize,
    goal_idx: usize,
    total_cost: u32,
) -> Path {
    let mut cells = Vec::new();
    let mut cur = goal_idx;
    while cur != start_idx {
        cells.push(grid.cell_at(cur));
        cur = prev[cur] as usize;
    }
    cells.reverse();
    Path { cells, total_cost }
}
