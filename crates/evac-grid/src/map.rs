//! The `GridMap` — terrain plus live occupancy in row-major dense arrays.
//!
//! # Data layout
//!
//! Both arrays are `width * height` long and indexed by `y * width + x`.
//! Dense indexed storage keeps the planner's inner loop a contiguous memory
//! scan and makes occupancy updates O(1).
//!
//! # Mutation discipline
//!
//! Terrain is mutated only by environment events (`set_terrain`); occupancy
//! is mutated only by agent moves (`occupy`/`vacate`).  Between ticks,
//! `occupancy[c]` equals the number of agents whose position is `c`.

use evac_core::{CellPos, Terrain, TerrainAccess};

/// Default congestion normalizer: a cell at 3 occupants reads as fully
/// congested.
pub const DEFAULT_CELL_CAPACITY: u16 = 3;

/// Terrain classification and live occupancy counts for one floor grid.
#[derive(Clone, Debug)]
pub struct GridMap {
    width: i32,
    height: i32,
    terrain: Vec<Terrain>,
    occupancy: Vec<u16>,
    /// Occupancy count at which `congestion()` saturates to 1.0.
    cell_capacity: u16,
}

impl GridMap {
    /// Build a grid from a rectangular terrain matrix (rows of terrain kinds).
    ///
    /// # Panics
    /// Panics if `rows` is empty or ragged.  Scenario loading validates its
    /// input before calling this, so a panic here is a programming error.
    pub fn from_rows(rows: &[Vec<Terrain>], cell_capacity: u16) -> Self {
        assert!(!rows.is_empty(), "terrain matrix must have at least one row");
        let width = rows[0].len();
        assert!(width > 0, "terrain matrix must have at least one column");
        assert!(
            rows.iter().all(|r| r.len() == width),
            "terrain matrix must be rectangular"
        );

        let terrain: Vec<Terrain> = rows.iter().flatten().copied().collect();
        let occupancy = vec![0; terrain.len()];
        Self {
            width: width as i32,
            height: rows.len() as i32,
            terrain,
            occupancy,
            cell_capacity: cell_capacity.max(1),
        }
    }

    /// An all-passable grid, useful in tests and synthetic scenarios.
    pub fn open(width: i32, height: i32) -> Self {
        let row = vec![Terrain::Passable; width as usize];
        Self::from_rows(&vec![row; height as usize], DEFAULT_CELL_CAPACITY)
    }

    // ── Dimensions and indexing ───────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells (`width * height`).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.terrain.len()
    }

    #[inline]
    pub fn in_bounds(&self, pos: CellPos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Row-major index of an in-bounds position.
    ///
    /// Callers must bounds-check first; the planner uses this for direct
    /// indexing into its own per-cell arrays.
    #[inline]
    pub fn cell_index(&self, pos: CellPos) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    /// Inverse of [`cell_index`][Self::cell_index].
    #[inline]
    pub fn cell_at(&self, index: usize) -> CellPos {
        CellPos::new(index as i32 % self.width, index as i32 / self.width)
    }

    // ── Terrain ───────────────────────────────────────────────────────────

    /// Terrain at `pos`, or `None` when out of bounds.
    #[inline]
    pub fn terrain(&self, pos: CellPos) -> Option<Terrain> {
        self.in_bounds(pos).then(|| self.terrain[self.cell_index(pos)])
    }

    /// Apply a terrain change (environment event).  Takes effect immediately
    /// for all subsequent walkability and cost queries.
    ///
    /// Returns `false` — and changes nothing — for out-of-bounds positions;
    /// bad events are reported by the scheduler, never applied.
    pub fn set_terrain(&mut self, pos: CellPos, kind: Terrain) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let idx = self.cell_index(pos);
        self.terrain[idx] = kind;
        true
    }

    /// Hard walkability for a given profile's terrain access.
    ///
    /// False when out of bounds, `Blocked`, or a kind the access descriptor
    /// rules out (stairs without stair capability, avoided kinds).
    /// Congestion is deliberately not consulted here — it is a soft signal.
    pub fn walkable(&self, pos: CellPos, access: TerrainAccess) -> bool {
        match self.terrain(pos) {
            None | Some(Terrain::Blocked) => false,
            Some(kind) => access.permits(kind),
        }
    }

    // ── Occupancy ─────────────────────────────────────────────────────────

    /// Occupant count at `pos` (0 for out-of-bounds).
    #[inline]
    pub fn occupancy(&self, pos: CellPos) -> u16 {
        if self.in_bounds(pos) {
            self.occupancy[self.cell_index(pos)]
        } else {
            0
        }
    }

    /// Record an agent entering `pos`.  Out-of-bounds is a no-op.
    pub fn occupy(&mut self, pos: CellPos) {
        if self.in_bounds(pos) {
            let idx = self.cell_index(pos);
            self.occupancy[idx] = self.occupancy[idx].saturating_add(1);
        }
    }

    /// Record an agent leaving `pos`.
    ///
    /// Vacating an already-empty cell is a no-op, never an error — the count
    /// must stay non-negative no matter what the caller does.
    pub fn vacate(&mut self, pos: CellPos) {
        if self.in_bounds(pos) {
            let idx = self.cell_index(pos);
            self.occupancy[idx] = self.occupancy[idx].saturating_sub(1);
        }
    }

    /// Normalized congestion at `pos`: occupancy over the configured cell
    /// capacity, clamped to `[0, 1]`.  This is the FSM's crowding input and
    /// the baseline path-cost modifier.
    #[inline]
    pub fn congestion(&self, pos: CellPos) -> f32 {
        (self.occupancy(pos) as f32 / self.cell_capacity as f32).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn cell_capacity(&self) -> u16 {
        self.cell_capacity
    }

    /// Raw occupancy array, row-major.  Telemetry and the spread field read
    /// this as a snapshot.
    #[inline]
    pub fn occupancy_cells(&self) -> &[u16] {
        &self.occupancy
    }

    /// In-bounds orthogonal neighbors of `pos`, in the fixed core order.
    pub fn neighbors4(&self, pos: CellPos) -> impl Iterator<Item = CellPos> + '_ {
        pos.neighbors4().into_iter().filter(|&p| self.in_bounds(p))
    }
}
