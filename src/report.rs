use serde::{Deserialize, Serialize};

use crate::coords::Cell;
use crate::lawn::Lawn;
use crate::mower::{CrashReason, MowerState};

/// Final result record of a run. Field names and order are the JSON wire
/// format consumed by downstream tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimStatus {
	pub test_name: String,
	pub grid_width: i32,
	pub grid_height: i32,
	pub rock_locations: Vec<Cell>,
	pub valid_rocks: Vec<Cell>,
	pub start_pos: Cell,
	pub total_grass_squares: usize,
	pub all_grass_cut: bool,
	pub uncut_grass_remaining: usize,
	pub did_mower_crash: bool,
	pub crash_reason: CrashReason,
	pub pos_history: Vec<Cell>,
	pub visited_cells: Vec<Cell>,
	pub last_pos: Cell,
	pub messages: Vec<String>,
}

impl SimStatus {
	pub fn from_run(lawn: &Lawn, mower: &MowerState, messages: Vec<String>) -> Self {
		Self {
			test_name: lawn.name().to_string(),
			grid_width: lawn.width(),
			grid_height: lawn.height(),
			rock_locations: lawn.rock_locations().to_vec(),
			valid_rocks: lawn.valid_rocks().to_vec(),
			start_pos: lawn.start(),
			total_grass_squares: mower.total_grass_squares(),
			all_grass_cut: mower.all_grass_cut(),
			uncut_grass_remaining: mower.uncut_remaining(),
			did_mower_crash: mower.did_crash(),
			crash_reason: mower.crash_reason(),
			pos_history: mower.pos_history().to_vec(),
			visited_cells: mower.visited().to_vec(),
			last_pos: mower.last_pos(),
			messages,
		}
	}

	pub fn outcome_label(&self) -> &'static str {
		if self.did_mower_crash { "CRASH!" } else { "NO CRASH" }
	}
}

pub fn format_summary(status: &SimStatus) -> String {
	format!(
		"{}: {} | Cut {}/{} | Uncut {} | {}",
		status.test_name,
		status.outcome_label(),
		status.total_grass_squares.saturating_sub(status.uncut_grass_remaining),
		status.total_grass_squares,
		status.uncut_grass_remaining,
		status.crash_reason.label()
	)
}

/// Console report: history, visited cells, crash and coverage lines.
pub fn format_report(status: &SimStatus) -> Vec<String> {
	let name = &status.test_name;
	let mut out = Vec::new();
	out.push(format!("--- {}: List Simulation Results ---", name));
	out.push(format!("--- {}: Pos History ---", name));
	for (step, cell) in status.pos_history.iter().enumerate() {
		out.push(format!("--- {}: Pos {}: {}", name, step, cell));
	}
	out.push(format!("--- {}: Visited Cells (Discovery Order) ---", name));
	for (step, cell) in status.visited_cells.iter().enumerate() {
		out.push(format!("--- {}: Cell {}: {}", name, step, cell));
	}
	out.push(format!("--- {}: Crash Status: {}", name, status.did_mower_crash));
	if status.did_mower_crash {
		out.push(format!("--- {}: Crash Reason: {}", name, status.crash_reason.label()));
	}
	out.push(format!("--- {}: Grass Remaining Uncut: {}", name, status.uncut_grass_remaining));
	out.push(format!("--- {}: All Grass Cut: {}", name, status.all_grass_cut));
	out.push(format!("--- {}: Result: {}", name, status.outcome_label()));
	out
}
