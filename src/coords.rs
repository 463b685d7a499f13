use std::fmt;

use serde::{Deserialize, Serialize};

/// A lawn cell addressed as (row, col). Serializes as a `[row, col]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { row: 0, col: 0 };

    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

impl From<[i32; 2]> for Cell {
    fn from([row, col]: [i32; 2]) -> Self {
        Self { row, col }
    }
}

impl From<Cell> for [i32; 2] {
    fn from(c: Cell) -> Self {
        [c.row, c.col]
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

/// Rectangle of `height` rows by `width` columns anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawnBounds {
    pub height: i32,
    pub width: i32,
}

impl LawnBounds {
    pub fn new(height: i32, width: i32) -> Self {
        Self { height, width }
    }

    pub fn contains(&self, c: Cell) -> bool {
        c.row >= 0 && c.row < self.height && c.col >= 0 && c.col < self.width
    }

    /// Number of cells; zero when either dimension is not positive.
    pub fn area(&self) -> usize {
        if self.height <= 0 || self.width <= 0 {
            return 0;
        }
        (self.height as usize) * (self.width as usize)
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let height = self.height;
        let width = self.width;
        (0..height).flat_map(move |row| (0..width).map(move |col| Cell { row, col }))
    }
}

impl fmt::Display for LawnBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.height, self.width)
    }
}
