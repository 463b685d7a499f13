use tracing::info;

use crate::coords::Cell;
use crate::direction::{Direction, ParseDirectionError, parse_path};
use crate::lawn::{Lawn, Terrain};
use crate::messages::MessageLog;
use crate::mower::{CrashReason, MowerState, MowerStatus};
use crate::report::SimStatus;

/// One simulation run: an immutable lawn, the mower's run state and the
/// trace log. Build one per request and drop it once the status is taken.
#[derive(Debug)]
pub struct Engine {
	lawn: Lawn,
	mower: MowerState,
	log: MessageLog,
}

impl Engine {
	pub fn new(name: impl Into<String>, height: i32, width: i32, rocks: Vec<Cell>, start: Cell) -> Self {
		let name = name.into();
		let mut log = MessageLog::new(name.clone());
		log.info("Simulator Config start");

		let lawn = Lawn::new(name, height, width, rocks, start, &mut log);
		let mower = MowerState::new(lawn.start(), lawn.total_grass_squares());

		log.info(format!("Initialize Total Grass squares {}", mower.total_grass_squares()));
		log.info(format!("Initialize Remaining Uncut {}", mower.uncut_remaining()));
		log.info(format!("Initialize All Grass Cut status {}", py_bool(mower.all_grass_cut())));
		log.info(format!(
			"Initialise Number of Cells Visited {} (start position counts 1 already)",
			mower.visited().len()
		));
		log.info("Initialise Number of Moves 0");
		log.info(format!(
			"Initialise Crash Status {} for Reason {}",
			py_bool(mower.did_crash()),
			mower.crash_reason().label()
		));

		Self { lawn, mower, log }
	}

	pub fn lawn(&self) -> &Lawn {
		&self.lawn
	}

	pub fn mower(&self) -> &MowerState {
		&self.mower
	}

	pub fn messages(&self) -> &[String] {
		self.log.entries()
	}

	pub fn status(&self) -> MowerStatus {
		self.mower.status()
	}

	/// Executes a single move. Returns false when the mower crashes, and
	/// keeps returning false without touching state once it has crashed.
	pub fn step(&mut self, direction: Direction) -> bool {
		if self.mower.did_crash() {
			return false;
		}

		let from = self.mower.position();
		self.log.info(format!("Current Position {}", from));
		self.log.info(format!("execute move {}", direction));
		let target = direction.apply(from);
		self.log.info(format!("Last Position {}", target));
		self.mower.record_attempt(target);

		self.log.info("check if crashed");
		match self.lawn.terrain_at(target) {
			Terrain::Rock => {
				self.log.info("rock crash!");
				self.mower.crash(CrashReason::Rock);
			}
			Terrain::Fence => {
				self.log.info("fence crash!");
				self.mower.crash(CrashReason::Fence);
			}
			Terrain::Grass => {
				self.log.info("no crash");
				self.mower.advance_to(target);
				self.log.info(format!("number_visited_cells: {}", self.mower.visited().len()));
				self.log.info(format!("remaining uncut: {}", self.mower.uncut_remaining()));
				if self.mower.all_grass_cut() {
					self.log.info("All Grass Cut");
				} else {
					self.log.info("Still Grass to Cut");
				}
			}
		}

		if self.mower.did_crash() {
			self.log.info(format!("Termination: {}", self.mower.crash_reason().label()));
			self.log.info("Move Failed due crash");
			return false;
		}
		self.log.info("Move OK");
		true
	}

	/// Applies `moves` in order, stopping at the first crash, and returns
	/// the final result record.
	pub fn execute_path(mut self, moves: &[Direction]) -> SimStatus {
		for (index, &direction) in moves.iter().enumerate() {
			self.log.section(format!("Move index {}", index));
			if !self.step(direction) {
				break;
			}
		}

		if self.mower.did_crash() {
			self.log.section("Simulator Fail due Crash. Move abort");
		} else {
			self.log.section("Simulator Success. All Moves done");
		}
		self.log.info("Output Sim Status Structure");

		info!(
			test_name = self.lawn.name(),
			moves = self.mower.moves_attempted(),
			crashed = self.mower.did_crash(),
			uncut = self.mower.uncut_remaining(),
			"Simulation finished"
		);
		self.into_status()
	}

	/// Like [`Engine::execute_path`] but takes raw tokens in any letter case.
	/// An unknown token rejects the whole path before any move is made.
	pub fn execute_tokens<S: AsRef<str>>(self, tokens: &[S]) -> Result<SimStatus, ParseDirectionError> {
		let moves = parse_path(tokens)?;
		Ok(self.execute_path(&moves))
	}

	pub fn into_status(self) -> SimStatus {
		SimStatus::from_run(&self.lawn, &self.mower, self.log.into_entries())
	}
}

fn py_bool(b: bool) -> &'static str {
	if b { "True" } else { "False" }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rocks(pairs: &[[i32; 2]]) -> Vec<Cell> {
		pairs.iter().copied().map(Cell::from).collect()
	}

	#[test]
	fn construction_initialises_counters() {
		let engine = Engine::new("Init", 3, 2, rocks(&[[1, 1], [0, 1]]), Cell::ORIGIN);
		assert_eq!(engine.mower().total_grass_squares(), 4);
		assert_eq!(engine.mower().uncut_remaining(), 3);
		assert_eq!(engine.status(), MowerStatus::Ready);
		assert!(engine.messages()[0].contains("Simulator Config start"));
	}

	#[test]
	fn step_after_crash_changes_nothing() {
		let mut engine = Engine::new("Crash", 2, 2, vec![], Cell::ORIGIN);
		assert!(!engine.step(Direction::Left));
		let history = engine.mower().pos_history().to_vec();
		let logged = engine.messages().len();
		assert!(!engine.step(Direction::Down));
		assert_eq!(engine.mower().pos_history(), history.as_slice());
		assert_eq!(engine.messages().len(), logged);
		assert_eq!(engine.status(), MowerStatus::Crashed(CrashReason::Fence));
	}

	#[test]
	fn crash_cell_is_last_in_history_but_not_visited() {
		let mut engine = Engine::new("Rock", 3, 3, rocks(&[[0, 1]]), Cell::ORIGIN);
		assert!(engine.step(Direction::Down));
		assert!(engine.step(Direction::Up));
		assert!(!engine.step(Direction::Right));
		let m = engine.mower();
		assert_eq!(m.last_pos(), Cell::new(0, 1));
		assert_eq!(m.position(), Cell::ORIGIN);
		assert!(!m.visited().contains(&Cell::new(0, 1)));
		assert_eq!(m.pos_history().len(), 4);
	}

	#[test]
	fn full_coverage_does_not_stop_the_path() {
		let engine = Engine::new("Cover", 1, 2, vec![], Cell::ORIGIN);
		let status = engine.execute_path(&[Direction::Right, Direction::Left, Direction::Right]);
		assert!(status.all_grass_cut);
		assert!(!status.did_mower_crash);
		assert_eq!(status.pos_history.len(), 4);
		assert_eq!(status.last_pos, Cell::new(0, 1));
	}

	#[test]
	fn unknown_token_runs_nothing() {
		let engine = Engine::new("Tokens", 3, 3, vec![], Cell::ORIGIN);
		let err = engine.execute_tokens(&["Down", "sideways"]).unwrap_err();
		assert_eq!(err, ParseDirectionError("sideways".to_string()));
	}
}
