use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::coords::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrashReason {
	#[default]
	#[serde(rename = "None")]
	None,
	#[serde(rename = "Crashed into Rock")]
	Rock,
	#[serde(rename = "Crashed into Fence")]
	Fence,
}

impl CrashReason {
	pub fn label(self) -> &'static str {
		match self {
			CrashReason::None => "None",
			CrashReason::Rock => "Crashed into Rock",
			CrashReason::Fence => "Crashed into Fence",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MowerStatus {
	Ready,
	Running,
	Crashed(CrashReason),
}

/// Mutable part of a run. Only the engine drives it.
#[derive(Debug, Clone)]
pub struct MowerState {
	position: Cell,
	visited: Vec<Cell>,
	visited_set: HashSet<Cell>,
	pos_history: Vec<Cell>,
	total_grass_squares: usize,
	uncut_remaining: usize,
	crash: CrashReason,
}

impl MowerState {
	/// The start cell is cut immediately.
	pub fn new(start: Cell, total_grass_squares: usize) -> Self {
		let mut visited_set = HashSet::new();
		visited_set.insert(start);
		Self {
			position: start,
			visited: vec![start],
			visited_set,
			pos_history: vec![start],
			total_grass_squares,
			uncut_remaining: total_grass_squares.saturating_sub(1),
			crash: CrashReason::None,
		}
	}

	pub fn position(&self) -> Cell {
		self.position
	}

	/// Cells legally occupied, in first-visit order.
	pub fn visited(&self) -> &[Cell] {
		&self.visited
	}

	/// Every occupied or attempted cell, the crash cell last.
	pub fn pos_history(&self) -> &[Cell] {
		&self.pos_history
	}

	/// The cell the mower ended up in or crashed into.
	pub fn last_pos(&self) -> Cell {
		self.pos_history.last().copied().unwrap_or(self.position)
	}

	pub fn moves_attempted(&self) -> usize {
		self.pos_history.len() - 1
	}

	pub fn total_grass_squares(&self) -> usize {
		self.total_grass_squares
	}

	pub fn uncut_remaining(&self) -> usize {
		self.uncut_remaining
	}

	pub fn all_grass_cut(&self) -> bool {
		self.uncut_remaining == 0
	}

	pub fn crash_reason(&self) -> CrashReason {
		self.crash
	}

	pub fn did_crash(&self) -> bool {
		self.crash != CrashReason::None
	}

	pub fn status(&self) -> MowerStatus {
		if self.did_crash() {
			MowerStatus::Crashed(self.crash)
		} else if self.pos_history.len() == 1 {
			MowerStatus::Ready
		} else {
			MowerStatus::Running
		}
	}

	pub(crate) fn record_attempt(&mut self, target: Cell) {
		self.pos_history.push(target);
	}

	pub(crate) fn crash(&mut self, reason: CrashReason) {
		if !self.did_crash() {
			self.crash = reason;
		}
	}

	/// Moves onto a legal cell. Returns true when the cell was not cut before.
	pub(crate) fn advance_to(&mut self, target: Cell) -> bool {
		self.position = target;
		let fresh = self.visited_set.insert(target);
		if fresh {
			self.visited.push(target);
		}
		self.uncut_remaining = self.total_grass_squares.saturating_sub(self.visited.len());
		fresh
	}
}
