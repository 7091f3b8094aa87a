//! Path tracer
//!
//! Walks a mouse from an entry hole through the grid until it steps off an
//! edge or repeats a (room, heading) state. A repeated state means the mouse
//! loops forever. There are only 16 × 4 such states, so every trace ends.

use serde::{Deserialize, Serialize};

use super::grid::{CellPos, Grid};
use super::hole::Hole;
use crate::consts::GRID_SIZE;

/// Number of distinct (room, heading) states; no path can be longer
pub const MAX_PATH_LEN: usize = GRID_SIZE * GRID_SIZE * 4;

/// Where one mouse went
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Rooms visited in order, including repeat visits in other headings
    pub path: Vec<CellPos>,
    /// Hole it came out of, `None` when trapped
    pub exit_hole: Option<Hole>,
    /// Always equal to `exit_hole.is_none()`
    pub trapped: bool,
}

impl Outcome {
    fn escaped(path: Vec<CellPos>, exit: Hole) -> Self {
        Self {
            path,
            exit_hole: Some(exit),
            trapped: false,
        }
    }

    fn looped(path: Vec<CellPos>) -> Self {
        Self {
            path,
            exit_hole: None,
            trapped: true,
        }
    }

    /// Same observable behaviour: both trapped, or both out of the same hole
    pub fn same_behavior(&self, other: &Outcome) -> bool {
        self.exit_hole == other.exit_hole
    }
}

/// Follow the mouse dropped into `start` until it exits or loops.
pub fn trace(grid: &Grid, start: Hole) -> Outcome {
    let (entry, mut dir) = start.entry();
    let (mut row, mut col) = (entry.row as i32, entry.col as i32);
    let size = GRID_SIZE as i32;

    // One bit per (room, heading)
    let mut visited: u64 = 0;
    let mut path = Vec::new();

    loop {
        if row < 0 || row >= size || col < 0 || col >= size {
            let exit = Hole::exit_at(row, col);
            log::trace!("hole {} exits at hole {} after {} rooms", start, exit, path.len());
            return Outcome::escaped(path, exit);
        }

        let pos = CellPos::new(row as usize, col as usize);
        let bit = 1u64 << ((pos.row * GRID_SIZE + pos.col) * 4 + dir.index());
        if visited & bit != 0 {
            log::trace!(
                "hole {} loops at ({}, {}) heading {:?}",
                start,
                pos.row,
                pos.col,
                dir
            );
            return Outcome::looped(path);
        }
        visited |= bit;
        path.push(pos);
        debug_assert!(path.len() <= MAX_PATH_LEN);

        dir = grid.get(pos).redirect(dir);
        let (dr, dc) = dir.delta();
        row += dr;
        col += dc;
    }
}
