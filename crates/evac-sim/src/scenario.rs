//! Scenario input: the initial grid, spawns, exit, budget, and event list.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "name": "atrium",
//!   "grid": [[0,0,0],
//!            [0,1,0],
//!            [0,0,0]],
//!   "agents": [ {"class": "adult", "x": 0, "y": 0, "name": "A1"} ],
//!   "exit": [2, 2],
//!   "ticks": 120,
//!   "events": [ {"tick": 0,  "kind": "alarm"},
//!               {"tick": 30, "kind": "block", "cell": [2, 1]} ],
//!   "cell_capacity": 3,
//!   "wait_threshold": 10,
//!   "replanning_threshold": 0.5
//! }
//! ```
//!
//! Terrain codes: 0 passable, 1 blocked, 2 danger, 3 stairs.  Event kinds:
//! `alarm`, `quake` (global), `block`, `clear` (terrain, require `cell`).
//! The three trailing fields are optional overrides; `agents` without a
//! `name` are named `<class>-<ordinal>`.
//!
//! Loading validates everything it can without the profile set — grid shape,
//! terrain codes, exit and spawn bounds, event kinds.  Class-name resolution
//! happens in [`SimBuilder`][crate::SimBuilder], which has the profiles.
//! Either way, all validation failures precede the first tick.
//!
//! Event cells are deliberately *not* bounds-checked here: an out-of-bounds
//! event is a runtime anomaly the scheduler ignores and reports, not a
//! configuration error.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use evac_core::{CellPos, Terrain, Tick};
use evac_grid::GridMap;
use evac_route::{
    CostImprovementPolicy, DEFAULT_REPLANNING_THRESHOLD, DEFAULT_WAIT_THRESHOLD,
    WaitThresholdPolicy,
};

use crate::{EnvEvent, ScenarioError};

// ── Scenario ──────────────────────────────────────────────────────────────────

/// One agent spawn: a class reference plus a start cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnSpec {
    pub class: String,
    /// Explicit agent name; `None` defaults to `<class>-<ordinal>`.
    pub name: Option<String>,
    pub position: CellPos,
}

/// A validated scenario, ready for [`SimBuilder`][crate::SimBuilder].
#[derive(Clone, Debug)]
pub struct Scenario {
    pub name: String,
    /// Rectangular terrain matrix, row-major.
    pub grid: Vec<Vec<Terrain>>,
    pub spawns: Vec<SpawnSpec>,
    pub exit: CellPos,
    /// Tick budget for the run.
    pub total_ticks: u64,
    pub events: Vec<(Tick, EnvEvent)>,
    /// Optional override of the grid's congestion normalizer.
    pub cell_capacity: Option<u16>,
    /// Optional override for [`WaitThresholdPolicy`].
    pub wait_threshold: Option<u32>,
    /// Optional override for [`CostImprovementPolicy`].
    pub replanning_threshold: Option<f32>,
}

impl Scenario {
    /// Load and validate a scenario from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Like [`load`][Self::load] but accepts any `Read` source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScenarioError> {
        let raw: RawScenario =
            serde_json::from_reader(reader).map_err(|e| ScenarioError::Parse(e.to_string()))?;
        let scenario = raw.convert()?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Re-check structural invariants.  Called by the loader and again by the
    /// builder, so programmatically constructed scenarios get the same
    /// fail-fast treatment as loaded ones.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.grid.is_empty() || self.grid[0].is_empty() {
            return Err(ScenarioError::EmptyGrid);
        }
        let width = self.grid[0].len();
        for (row, cells) in self.grid.iter().enumerate() {
            if cells.len() != width {
                return Err(ScenarioError::RaggedGrid { row });
            }
        }

        let in_bounds = |pos: CellPos| {
            pos.x >= 0
                && (pos.x as usize) < width
                && pos.y >= 0
                && (pos.y as usize) < self.grid.len()
        };

        if !in_bounds(self.exit) {
            return Err(ScenarioError::ExitOutOfBounds(self.exit));
        }
        if self.grid[self.exit.y as usize][self.exit.x as usize] == Terrain::Blocked {
            return Err(ScenarioError::ExitBlocked(self.exit));
        }

        for spawn in &self.spawns {
            if !in_bounds(spawn.position) {
                return Err(ScenarioError::SpawnOutOfBounds {
                    class: spawn.class.clone(),
                    pos: spawn.position,
                });
            }
        }

        Ok(())
    }

    /// Build the grid map this scenario describes.
    pub fn build_grid(&self) -> GridMap {
        GridMap::from_rows(
            &self.grid,
            self.cell_capacity
                .unwrap_or(evac_grid::map::DEFAULT_CELL_CAPACITY),
        )
    }

    /// The wait-threshold replanning policy with this scenario's override
    /// applied (the default deployment).
    pub fn wait_policy(&self) -> WaitThresholdPolicy {
        WaitThresholdPolicy {
            wait_threshold: self.wait_threshold.unwrap_or(DEFAULT_WAIT_THRESHOLD),
        }
    }

    /// The cost-comparison replanning policy with this scenario's override
    /// applied.
    pub fn cost_policy(&self) -> CostImprovementPolicy {
        CostImprovementPolicy {
            replanning_threshold: self
                .replanning_threshold
                .unwrap_or(DEFAULT_REPLANNING_THRESHOLD),
        }
    }
}

// ── Raw JSON records ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawScenario {
    name: Option<String>,
    grid: Vec<Vec<u8>>,
    agents: Vec<RawSpawn>,
    exit: (i32, i32),
    ticks: u64,
    #[serde(default)]
    events: Vec<RawEvent>,
    cell_capacity: Option<u16>,
    wait_threshold: Option<u32>,
    replanning_threshold: Option<f32>,
}

#[derive(Deserialize)]
struct RawSpawn {
    class: String,
    x: i32,
    y: i32,
    name: Option<String>,
}

#[derive(Deserialize)]
struct RawEvent {
    tick: u64,
    kind: String,
    cell: Option<(i32, i32)>,
}

impl RawScenario {
    fn convert(self) -> Result<Scenario, ScenarioError> {
        let mut grid = Vec::with_capacity(self.grid.len());
        for (y, row) in self.grid.into_iter().enumerate() {
            let mut cells = Vec::with_capacity(row.len());
            for (x, code) in row.into_iter().enumerate() {
                let kind = Terrain::from_code(code)
                    .ok_or(ScenarioError::UnknownTerrainCode { code, x, y })?;
                cells.push(kind);
            }
            grid.push(cells);
        }

        let spawns = self
            .agents
            .into_iter()
            .map(|s| SpawnSpec {
                class: s.class,
                name: s.name,
                position: CellPos::new(s.x, s.y),
            })
            .collect();

        let events = self
            .events
            .into_iter()
            .map(|e| {
                let event = match e.kind.as_str() {
                    "alarm" => EnvEvent::Alarm,
                    "quake" => EnvEvent::Quake,
                    "block" | "clear" => {
                        let (x, y) = e.cell.ok_or_else(|| ScenarioError::MissingEventCell {
                            kind: e.kind.clone(),
                            tick: e.tick,
                        })?;
                        if e.kind == "block" {
                            EnvEvent::BlockCell(CellPos::new(x, y))
                        } else {
                            EnvEvent::ClearCell(CellPos::new(x, y))
                        }
                    }
                    _ => {
                        return Err(ScenarioError::UnknownEventKind {
                            kind: e.kind.clone(),
                            tick: e.tick,
                        });
                    }
                };
                Ok((Tick(e.tick), event))
            })
            .collect::<Result<Vec<_>, ScenarioError>>()?;

        Ok(Scenario {
            name: self.name.unwrap_or_else(|| "scenario".to_owned()),
            grid,
            spawns,
            exit: CellPos::new(self.exit.0, self.exit.1),
            total_ticks: self.ticks,
            events,
            cell_capacity: self.cell_capacity,
            wait_threshold: self.wait_threshold,
            replanning_threshold: self.replanning_threshold,
        })
    }
}
