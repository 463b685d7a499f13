use std::collections::HashSet;

use crate::coords::{Cell, LawnBounds};
use crate::messages::MessageLog;

/// What the mower would hit when entering a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    Grass,
    Rock,
    Fence,
}

/// Immutable scenario: lawn size, the rocks that lie on it and where the
/// mower starts. Built once per run and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Lawn {
    name: String,
    bounds: LawnBounds,
    rock_locations: Vec<Cell>,
    valid_rocks: Vec<Cell>,
    rock_set: HashSet<Cell>,
    start: Cell,
}

impl Lawn {
    /// Filters rocks to the lawn and validates the start cell. Bad input is
    /// reported to `log` and dropped or replaced, never rejected.
    pub fn new(
        name: impl Into<String>,
        height: i32,
        width: i32,
        rock_locations: Vec<Cell>,
        start: Cell,
        log: &mut MessageLog,
    ) -> Self {
        let name = name.into();
        let bounds = LawnBounds::new(height, width);
        log.info(format!("Initialise Grid {}", bounds));

        let mut valid_rocks = Vec::new();
        let mut rock_set = HashSet::new();
        let mut outside = 0;
        for &rock in &rock_locations {
            if !bounds.contains(rock) {
                log.warn(format!(
                    "warning: Rock at {} is outside the {} lawn. Ignoring.",
                    rock, bounds
                ));
                outside += 1;
                continue;
            }
            if rock_set.insert(rock) {
                valid_rocks.push(rock);
            } else {
                log.warn(format!("warning: Rock at {} is listed more than once. Ignoring.", rock));
            }
        }

        let start = if bounds.contains(start) {
            start
        } else {
            log.warn(format!(
                "WARNING: start pos at {} is outside the {} lawn. Resetting to top left [0,0]",
                start, bounds
            ));
            Cell::ORIGIN
        };

        // The mower already stands on its start cell, so a rock there cannot exist.
        if rock_set.remove(&start) {
            valid_rocks.retain(|&r| r != start);
            log.warn(format!(
                "warning: Rock at {} is under the start position. Ignoring.",
                start
            ));
        }

        log.info(format!(
            "{} valid Rock positions defined inside grid. {} Rocks outside grid disregarded",
            valid_rocks.len(),
            outside
        ));
        log.info(format!("Initialise start position at {}", start));

        Self {
            name,
            bounds,
            rock_locations,
            valid_rocks,
            rock_set,
            start,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> LawnBounds {
        self.bounds
    }

    pub fn height(&self) -> i32 {
        self.bounds.height
    }

    pub fn width(&self) -> i32 {
        self.bounds.width
    }

    /// Rocks as supplied, including the ones that were dropped.
    pub fn rock_locations(&self) -> &[Cell] {
        &self.rock_locations
    }

    /// In-bounds rocks in input order.
    pub fn valid_rocks(&self) -> &[Cell] {
        &self.valid_rocks
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn is_rock(&self, c: Cell) -> bool {
        self.rock_set.contains(&c)
    }

    pub fn contains(&self, c: Cell) -> bool {
        self.bounds.contains(c)
    }

    /// Rocks take precedence over the fence.
    pub fn terrain_at(&self, c: Cell) -> Terrain {
        if self.is_rock(c) {
            Terrain::Rock
        } else if !self.contains(c) {
            Terrain::Fence
        } else {
            Terrain::Grass
        }
    }

    /// Mowable squares: lawn area minus valid rocks.
    pub fn total_grass_squares(&self) -> usize {
        self.bounds.area().saturating_sub(self.valid_rocks.len())
    }
}
