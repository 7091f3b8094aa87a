//! Perimeter holes
//!
//! Holes are numbered 1..=16 clockwise from the top-left:
//! - 1-4 along the top edge, left to right
//! - 5-8 down the right edge, top to bottom
//! - 9-12 along the bottom edge, right to left
//! - 13-16 up the left edge, bottom to top
//!
//! The UI and animation layer use the same numbering.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::grid::{CellPos, Direction};
use crate::consts::{GRID_SIZE, HOLE_COUNT};
use crate::error::EngineError;

/// Side of the house a hole sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// A perimeter hole, always in 1..=16
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Hole(u8);

impl Hole {
    /// Panics when `number` is outside 1..=16; callers own that contract.
    pub fn new(number: u8) -> Self {
        assert!(
            (1..=HOLE_COUNT as u8).contains(&number),
            "hole {number} is outside 1..={HOLE_COUNT}"
        );
        Self(number)
    }

    #[inline]
    pub fn number(self) -> u8 {
        self.0
    }

    /// Holes 1..=16 in order
    pub fn all() -> impl Iterator<Item = Hole> {
        (1..=HOLE_COUNT as u8).map(Hole)
    }

    /// Zero-based position, for indexing per-hole tables
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn edge(self) -> Edge {
        match self.0 {
            1..=4 => Edge::Top,
            5..=8 => Edge::Right,
            9..=12 => Edge::Bottom,
            _ => Edge::Left,
        }
    }

    /// First room a mouse dropped into this hole occupies, and its heading
    pub fn entry(self) -> (CellPos, Direction) {
        let h = self.0 as usize;
        match self.edge() {
            Edge::Top => (CellPos::new(0, h - 1), Direction::Down),
            Edge::Right => (CellPos::new(h - 5, GRID_SIZE - 1), Direction::Left),
            Edge::Bottom => (CellPos::new(GRID_SIZE - 1, 12 - h), Direction::Up),
            Edge::Left => (CellPos::new(16 - h, 0), Direction::Right),
        }
    }

    /// The hole reached by stepping off the grid onto `(row, col)`.
    ///
    /// `(row, col)` must be exactly one step outside the grid on one axis.
    pub fn exit_at(row: i32, col: i32) -> Self {
        let size = GRID_SIZE as i32;
        let number = if row < 0 {
            col + 1
        } else if col >= size {
            5 + row
        } else if row >= size {
            9 + (size - 1 - col)
        } else {
            assert!(col < 0, "({row}, {col}) is inside the grid");
            13 + (size - 1 - row)
        };
        Hole::new(number as u8)
    }
}

impl TryFrom<u8> for Hole {
    type Error = EngineError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        if (1..=HOLE_COUNT as u8).contains(&number) {
            Ok(Hole(number))
        } else {
            Err(EngineError::InvalidHole(number))
        }
    }
}

impl From<Hole> for u8 {
    fn from(hole: Hole) -> Self {
        hole.0
    }
}

impl fmt::Display for Hole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of holes, one bit per hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HoleSet(u16);

impl HoleSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn contains(&self, hole: Hole) -> bool {
        self.0 & (1 << hole.index()) != 0
    }

    /// Returns true if the hole was not already present
    pub fn insert(&mut self, hole: Hole) -> bool {
        let fresh = !self.contains(hole);
        self.0 |= 1 << hole.index();
        fresh
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == HOLE_COUNT
    }

    /// Holes not in the set, ascending
    pub fn remaining(&self) -> impl Iterator<Item = Hole> + '_ {
        Hole::all().filter(move |h| !self.contains(*h))
    }
}
