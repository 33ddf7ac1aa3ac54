//! Congestion sources — pluggable crowd-cost models for the path planner.
//!
//! # Pluggability
//!
//! The planner consumes congestion through the [`CongestionSource`] trait, so
//! deployments can swap the raw per-cell occupancy model for the spatially
//! decayed field (or a custom model) without touching the search logic.
//!
//! Two models ship with the crate:
//!
//! - [`LocalOccupancy`] — cost weight is the occupant count of the entered
//!   cell.  Stateless; reads the grid directly.
//! - [`SpreadField`] — every occupant radiates `1/distance` influence over a
//!   fixed radius, producing smoother route avoidance around crowds than raw
//!   occupancy alone.  The field is recomputed from scratch on `rebuild`,
//!   not incrementally maintained.

use evac_core::CellPos;

use crate::GridMap;

/// Pluggable crowd-cost model.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so a planner can be shared across
/// worker threads when planning is parallelized over a tick-start snapshot.
pub trait CongestionSource: Send + Sync {
    /// Additive cost weight for *entering* `pos`.
    ///
    /// The planner turns this into an edge cost of `1 + weight` per step
    /// (in its own fixed-point units), so `0.0` means "uncongested".
    fn cost_weight(&self, grid: &GridMap, pos: CellPos) -> f32;

    /// Recompute any derived state from the grid's current occupancy.
    ///
    /// The scheduler calls this once per tick, and only when occupancy
    /// actually changed since the last rebuild.  Stateless sources ignore it.
    fn rebuild(&mut self, _grid: &GridMap) {}
}

// ── LocalOccupancy ────────────────────────────────────────────────────────────

/// Raw per-cell occupancy as the cost weight: entering a cell holding `n`
/// agents costs `1 + n` steps' worth.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalOccupancy;

impl CongestionSource for LocalOccupancy {
    #[inline]
    fn cost_weight(&self, grid: &GridMap, pos: CellPos) -> f32 {
        grid.occupancy(pos) as f32
    }
}

// ── SpreadField ───────────────────────────────────────────────────────────────

/// Default influence radius of one occupant, in cells.
pub const DEFAULT_SPREAD_RADIUS: i32 = 3;

/// Default multiplier applied to the decayed field when costing a step.
pub const DEFAULT_CROWD_WEIGHT: f32 = 0.5;

/// Spatially decayed congestion field.
///
/// Each occupant of a cell contributes `1/d` (Euclidean `d`, `0 < d ≤
/// radius`) to every surrounding cell; the occupied cell itself accrues
/// nothing from its own occupants.  `cost_weight` scales the field value by
/// `crowd_weight`.
#[derive(Clone, Debug)]
pub struct SpreadField {
    radius: i32,
    crowd_weight: f32,
    /// Row-major field values; empty until the first `rebuild`.
    field: Vec<f32>,
    width: i32,
}

impl SpreadField {
    pub fn new(radius: i32, crowd_weight: f32) -> Self {
        Self {
            radius: radius.max(1),
            crowd_weight,
            field: Vec::new(),
            width: 0,
        }
    }

    /// Field value at `pos` (0 when out of bounds or never rebuilt).
    #[inline]
    pub fn field_at(&self, pos: CellPos) -> f32 {
        let idx = (pos.y * self.width + pos.x) as usize;
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || idx >= self.field.len() {
            return 0.0;
        }
        self.field[idx]
    }

    /// Accumulate the influence of all occupants into `field`.
    ///
    /// O(cells_in_radius × occupied_cells); the from-scratch recompute keeps
    /// the model simple and is cheap at floor-plan scale.
    fn accumulate_row(
        row: &mut [f32],
        y: i32,
        width: i32,
        occupied: &[(CellPos, u16)],
        radius: i32,
    ) {
        for x in 0..width {
            let here = CellPos::new(x, y);
            let mut value = 0.0f32;
            for &(src, count) in occupied {
                if (src.x - x).abs() > radius || (src.y - y).abs() > radius {
                    continue;
                }
                let d = src.euclidean(here);
                if d > 0.0 && d <= radius as f32 {
                    value += count as f32 / d;
                }
            }
            row[x as usize] = value;
        }
    }
}

impl Default for SpreadField {
    fn default() -> Self {
        Self::new(DEFAULT_SPREAD_RADIUS, DEFAULT_CROWD_WEIGHT)
    }
}

impl CongestionSource for SpreadField {
    #[inline]
    fn cost_weight(&self, _grid: &GridMap, pos: CellPos) -> f32 {
        self.crowd_weight * self.field_at(pos)
    }

    fn rebuild(&mut self, grid: &GridMap) {
        self.width = grid.width();
        self.field.clear();
        self.field.resize(grid.cell_count(), 0.0);

        // Snapshot of occupied cells; the per-row accumulation only reads it.
        let occupied: Vec<(CellPos, u16)> = grid
            .occupancy_cells()
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(idx, &count)| (grid.cell_at(idx), count))
            .collect();

        if occupied.is_empty() {
            return;
        }

        let width = self.width;
        let radius = self.radius;

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.field
                .par_chunks_mut(width as usize)
                .enumerate()
                .for_each(|(y, row)| {
                    Self::accumulate_row(row, y as i32, width, &occupied, radius);
                });
        }

        #[cfg(not(feature = "parallel"))]
        {
            for (y, row) in self.field.chunks_mut(width as usize).enumerate() {
                Self::accumulate_row(row, y as i32, width, &occupied, radius);
            }
        }
    }
}
