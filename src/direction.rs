use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::Cell;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown move: {0:?} (expected up, down, left or right)")]
pub struct ParseDirectionError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
	Up,
	Down,
	Left,
	Right,
}

impl Direction {
	pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

	/// Unit (row, col) offset. Rows grow downwards.
	pub fn offset(self) -> (i32, i32) {
		match self {
			Direction::Up => (-1, 0),
			Direction::Down => (1, 0),
			Direction::Left => (0, -1),
			Direction::Right => (0, 1),
		}
	}

	pub fn apply(self, from: Cell) -> Cell {
		let (d_row, d_col) = self.offset();
		from.offset(d_row, d_col)
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Direction::Up => "up",
			Direction::Down => "down",
			Direction::Left => "left",
			Direction::Right => "right",
		}
	}
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Direction {
	type Err = ParseDirectionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"up" => Ok(Direction::Up),
			"down" => Ok(Direction::Down),
			"left" => Ok(Direction::Left),
			"right" => Ok(Direction::Right),
			_ => Err(ParseDirectionError(s.to_string())),
		}
	}
}

/// Parses every token or none: the first unknown token aborts.
pub fn parse_path<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Direction>, ParseDirectionError> {
	tokens.iter().map(|t| t.as_ref().parse()).collect()
}
