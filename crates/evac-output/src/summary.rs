//! Per-agent run statistics folded from a record stream.
//!
//! The counters mirror what evacuation analyses ask first: how often did
//! each agent move, wait, get blocked, replan — and did it make it out.

use std::collections::BTreeMap;
use std::io::Write;

use evac_agent::{Action, Phase, SYSTEM_NAME, SnapshotRecord};
use evac_core::CellPos;

use crate::OutputResult;

/// Aggregated statistics for one agent over a whole run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentSummary {
    pub name: String,
    pub move_count: u32,
    pub wait_count: u32,
    pub blocked_count: u32,
    pub replan_count: u32,
    pub arrived: bool,
    /// Position and phase from the agent's last record.
    pub final_position: Option<CellPos>,
    pub final_phase: Option<Phase>,
}

/// Fold a record stream into per-agent summaries, sorted by agent name.
///
/// System records (terrain events) are skipped.
pub fn summarize(records: &[SnapshotRecord]) -> Vec<AgentSummary> {
    let mut by_name: BTreeMap<&str, AgentSummary> = BTreeMap::new();

    for record in records {
        if record.name == SYSTEM_NAME {
            continue;
        }
        let entry = by_name.entry(&record.name).or_insert_with(|| AgentSummary {
            name: record.name.clone(),
            ..AgentSummary::default()
        });

        entry.final_position = record.position;
        entry.final_phase = record.phase;

        match record.action {
            Action::Moved => entry.move_count += 1,
            Action::Wait => entry.wait_count += 1,
            Action::Blocked | Action::OutOfBounds => entry.blocked_count += 1,
            Action::Replan => entry.replan_count += 1,
            Action::Arrived => entry.arrived = true,
            Action::BlockCell | Action::ClearCell => {}
        }
    }

    by_name.into_values().collect()
}

/// Write summaries as CSV, one row per agent, tagged with a case name so
/// rows from several runs can share one file.
pub fn write_summary_csv<W: Write>(
    out: W,
    case: &str,
    summaries: &[AgentSummary],
) -> OutputResult<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "case", "name", "move_count", "wait_count", "blocked_count", "replan_count", "arrived",
        "final_x", "final_y", "final_phase",
    ])?;

    for s in summaries {
        let (x, y) = match s.final_position {
            Some(pos) => (pos.x.to_string(), pos.y.to_string()),
            None => (String::new(), String::new()),
        };
        writer.write_record(&[
            case.to_string(),
            s.name.clone(),
            s.move_count.to_string(),
            s.wait_count.to_string(),
            s.blocked_count.to_string(),
            s.replan_count.to_string(),
            (s.arrived as u8).to_string(),
            x,
            y,
            s.final_phase.map(|p| p.as_str()).unwrap_or("").to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
