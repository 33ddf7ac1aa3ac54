//! atrium — demo scenario for the rust_evac evacuation simulator.
//!
//! Eleven agents across three mobility classes evacuate a two-hall atrium
//! after an alarm at tick 0.  The west door between the halls is blocked by
//! falling debris at tick 30 and cleared at tick 80, forcing everyone still
//! north of it onto the east door in the meantime.

use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use evac_core::{SimConfig, Tick};
use evac_grid::SpreadField;
use evac_route::AStarPlanner;
use evac_agent::{ProfileSet, SnapshotRecord};
use evac_output::{
    JsonLinesSink, JsonWriter, SnapshotObserver, TelemetryObserver, summarize, write_summary_csv,
};
use evac_sim::{EnvEvent, LiveFrame, Scenario, SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED: u64 = 42;
const TELEMETRY_INTERVAL_TICKS: u64 = 10;

// ── Input data ────────────────────────────────────────────────────────────────

const ROLES_JSON: &str = r#"{
    "adult": {
        "speed": 1.2, "vision": 6, "type": "adult",
        "reaction_time": 2, "tolerance": 0.7, "move_delay": 1
    },
    "child": {
        "speed": 0.9, "vision": 4, "type": "child",
        "reaction_time": 5, "tolerance": 0.4, "move_delay": 2
    },
    "wheelchair": {
        "speed": 0.6, "vision": 5, "type": "wheelchair",
        "reaction_time": 3, "tolerance": 0.5, "move_delay": 3,
        "can_use_stairs": false, "avoid_terrain": ["stairs", "danger"]
    }
}"#;

// Two halls divided by a wall with doors at x=3 (west) and x=7 (east).
// Stairs at (2,4) and a smoke-filled danger cell at (8,4) on the south hall.
const SCENARIO_JSON: &str = r#"{
    "name": "atrium",
    "grid": [
        [0,0,0,0,0,0,0,0,0,0],
        [0,0,0,0,0,0,0,0,0,0],
        [1,1,1,0,1,1,1,0,1,1],
        [0,0,0,0,0,0,0,0,0,0],
        [0,0,3,0,0,0,0,0,2,0],
        [0,0,0,0,0,0,0,0,0,0],
        [0,0,0,0,0,0,0,0,0,0]
    ],
    "agents": [
        {"class": "adult",      "x": 0, "y": 0, "name": "adult-1"},
        {"class": "adult",      "x": 2, "y": 0, "name": "adult-2"},
        {"class": "adult",      "x": 5, "y": 0, "name": "adult-3"},
        {"class": "adult",      "x": 9, "y": 0, "name": "adult-4"},
        {"class": "adult",      "x": 4, "y": 1, "name": "adult-5"},
        {"class": "child",      "x": 1, "y": 1, "name": "child-1"},
        {"class": "child",      "x": 6, "y": 0, "name": "child-2"},
        {"class": "child",      "x": 8, "y": 1, "name": "child-3"},
        {"class": "wheelchair", "x": 0, "y": 1, "name": "wheel-1"},
        {"class": "wheelchair", "x": 7, "y": 1, "name": "wheel-2"},
        {"class": "adult",      "x": 3, "y": 3, "name": "adult-6"}
    ],
    "exit": [9, 6],
    "ticks": 300,
    "events": [
        {"tick": 0,  "kind": "alarm"},
        {"tick": 30, "kind": "block", "cell": [3, 2]},
        {"tick": 80, "kind": "clear", "cell": [3, 2]}
    ]
}"#;

// ── Combined observer: snapshot log + telemetry ───────────────────────────────

struct LogAndTelemetry {
    log: SnapshotObserver<JsonWriter>,
    telemetry: TelemetryObserver<JsonLinesSink<File>>,
    replans: usize,
}

impl SimObserver for LogAndTelemetry {
    fn on_event(&mut self, tick: Tick, event: &EnvEvent, applied: bool) {
        match event {
            EnvEvent::Alarm | EnvEvent::Quake => println!("  [{tick}] alarm broadcast"),
            EnvEvent::BlockCell(cell) => println!("  [{tick}] blocked {cell} (applied: {applied})"),
            EnvEvent::ClearCell(cell) => println!("  [{tick}] cleared {cell} (applied: {applied})"),
        }
    }

    fn on_record(&mut self, record: &SnapshotRecord) {
        if record.action == evac_agent::Action::Replan {
            self.replans += 1;
        }
        self.log.on_record(record);
    }

    fn on_frame(&mut self, frame: &LiveFrame) {
        self.telemetry.on_frame(frame);
    }

    fn on_tick_end(&mut self, tick: Tick) {
        self.log.on_tick_end(tick);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.log.on_sim_end(final_tick);
        self.telemetry.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== atrium — rust_evac demo ===");

    // 1. Load profiles and scenario from the embedded JSON.
    let profiles = ProfileSet::from_reader(Cursor::new(ROLES_JSON))?;
    let scenario = Scenario::from_reader(Cursor::new(SCENARIO_JSON))?;
    println!(
        "Scenario {:?}: {}x{} grid, {} agents, exit {}, {} events, budget {} ticks",
        scenario.name,
        scenario.grid[0].len(),
        scenario.grid.len(),
        scenario.spawns.len(),
        scenario.exit,
        scenario.events.len(),
        scenario.total_ticks,
    );

    // 2. Sim config.
    let config = SimConfig {
        start_unix_secs: 1_700_000_000,
        tick_duration_secs: 1,
        total_ticks: 0, // taken from the scenario
        seed: SEED,
        telemetry_interval_ticks: TELEMETRY_INTERVAL_TICKS,
    };

    // 3. Build: A* over a spread congestion field, wait-threshold replanning.
    let policy = scenario.wait_policy();
    let mut sim = SimBuilder::new(
        config,
        scenario,
        profiles,
        AStarPlanner,
        SpreadField::default(),
        policy,
    )
    .build()?;

    // 4. Output: JSON snapshot log plus JSON-lines telemetry frames.
    let out_dir = Path::new("output/atrium");
    std::fs::create_dir_all(out_dir)?;
    let frames = File::create(out_dir.join("frames.jsonl"))?;
    let mut obs = LogAndTelemetry {
        log: SnapshotObserver::new(JsonWriter::new(out_dir)),
        telemetry: TelemetryObserver::new(JsonLinesSink::new(frames)),
        replans: 0,
    };

    // 5. Run.
    println!();
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();
    println!();

    if let Some(e) = obs.log.take_error() {
        eprintln!("snapshot log error: {e}");
    }
    if let Some(e) = obs.telemetry.take_error() {
        eprintln!("telemetry error: {e}");
    }

    // 6. Summaries.
    println!(
        "Run complete in {:.3} s — {} ticks simulated, {} replans, all arrived: {}",
        elapsed.as_secs_f64(),
        sim.clock.current_tick.0,
        obs.replans,
        sim.all_arrived(),
    );
    println!();

    let writer = obs.log.into_writer();
    let summaries = summarize(writer.records());
    let summary_file = File::create(out_dir.join("summary.csv"))?;
    write_summary_csv(summary_file, "atrium", &summaries)?;

    println!(
        "{:<12} {:>6} {:>6} {:>8} {:>8} {:>8} {:>10}",
        "Agent", "Moves", "Waits", "Blocked", "Replans", "Arrived", "Final"
    );
    println!("{}", "-".repeat(64));
    for s in &summaries {
        let final_pos = s
            .final_position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_owned());
        println!(
            "{:<12} {:>6} {:>6} {:>8} {:>8} {:>8} {:>10}",
            s.name,
            s.move_count,
            s.wait_count,
            s.blocked_count,
            s.replan_count,
            if s.arrived { "yes" } else { "no" },
            final_pos,
        );
    }

    println!();
    println!("Wrote snapshot_log.json, summary.csv, frames.jsonl to {}", out_dir.display());

    Ok(())
}
