//! Maze generator
//!
//! Scatters a difficulty-scaled number of obstacles over distinct rooms and
//! rejects layouts that make a poor puzzle, retrying a bounded number of
//! times.

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, CellPos, Direction, Grid, MazeType};
use super::mapping::Mapping;
use crate::consts::{GRID_SIZE, MAX_GENERATION_ATTEMPTS};
use crate::error::EngineError;

/// Player-selected difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Expert => "expert",
        }
    }

    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "easy" => Ok(Difficulty::Beginner),
            "intermediate" | "medium" | "med" => Ok(Difficulty::Intermediate),
            "expert" | "hard" => Ok(Difficulty::Expert),
            _ => Err(EngineError::UnknownDifficulty(s.to_string())),
        }
    }

    /// How many rooms get an obstacle
    pub fn obstacle_range(&self) -> RangeInclusive<usize> {
        match self {
            Difficulty::Beginner => 1..=3,
            Difficulty::Intermediate => 4..=6,
            Difficulty::Expert => 7..=12,
        }
    }

    /// Chance that any one quiz question is a reverse question
    pub fn reverse_probability(&self) -> f64 {
        match self {
            Difficulty::Beginner => 0.0,
            Difficulty::Intermediate => 0.4,
            Difficulty::Expert => 0.6,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A freshly generated maze and its hole table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMaze {
    pub grid: Grid,
    pub mapping: Mapping,
    /// Candidates drawn, including the accepted one
    pub attempts: u32,
}

/// Generate a maze, retrying until it passes [`is_acceptable`].
///
/// After `MAX_GENERATION_ATTEMPTS` rejected candidates the last one is kept
/// as is.
pub fn generate<R: Rng + ?Sized>(
    maze_type: MazeType,
    difficulty: Difficulty,
    rng: &mut R,
) -> GeneratedMaze {
    generate_with(maze_type, difficulty, || random_grid(maze_type, difficulty, rng))
}

/// Rejection loop over an arbitrary candidate source
fn generate_with(
    maze_type: MazeType,
    difficulty: Difficulty,
    mut candidate: impl FnMut() -> Grid,
) -> GeneratedMaze {
    let mut attempts = 0;
    loop {
        attempts += 1;
        let grid = candidate();
        let mapping = Mapping::build(&grid);

        if is_acceptable(maze_type, difficulty, &grid, &mapping) {
            log::debug!(
                "{} {} maze accepted after {} attempt(s): {} obstacles, {} escaping holes",
                difficulty,
                maze_type,
                attempts,
                grid.obstacle_count(),
                mapping.escaping_count()
            );
            return GeneratedMaze {
                grid,
                mapping,
                attempts,
            };
        }

        if attempts >= MAX_GENERATION_ATTEMPTS {
            log::warn!(
                "no acceptable {} {} maze in {} attempts, keeping the last candidate",
                difficulty,
                maze_type,
                attempts
            );
            return GeneratedMaze {
                grid,
                mapping,
                attempts,
            };
        }
    }
}

/// One unfiltered candidate: a random obstacle count from the difficulty's
/// range, placed on distinct rooms, each a uniform symbol of the alphabet.
pub fn random_grid<R: Rng + ?Sized>(
    maze_type: MazeType,
    difficulty: Difficulty,
    rng: &mut R,
) -> Grid {
    let count = rng.random_range(difficulty.obstacle_range());
    let obstacles = maze_type.obstacles();

    let mut grid = Grid::new();
    for room in index::sample(rng, GRID_SIZE * GRID_SIZE, count).iter() {
        let pos = CellPos::new(room / GRID_SIZE, room % GRID_SIZE);
        let symbol = obstacles[rng.random_range(0..obstacles.len())];
        grid.set(pos, symbol);
    }
    grid
}

/// At least one mouse gets out, and beginner arrow mazes have no
/// two-room bounce traps.
pub fn is_acceptable(
    maze_type: MazeType,
    difficulty: Difficulty,
    grid: &Grid,
    mapping: &Mapping,
) -> bool {
    if !mapping.has_escape() {
        return false;
    }
    !(maze_type == MazeType::Arrows
        && difficulty == Difficulty::Beginner
        && has_opposing_arrows(grid))
}

/// True if two neighbouring rooms hold arrows pointing straight at each other
/// (`R` left of `L`, or `D` above `U`).
pub fn has_opposing_arrows(grid: &Grid) -> bool {
    grid.iter().any(|(pos, cell)| {
        let right = pos.col + 1 < GRID_SIZE
            && cell == Cell::Arrow(Direction::Right)
            && grid.get(CellPos::new(pos.row, pos.col + 1)) == Cell::Arrow(Direction::Left);
        let below = pos.row + 1 < GRID_SIZE
            && cell == Cell::Arrow(Direction::Down)
            && grid.get(CellPos::new(pos.row + 1, pos.col)) == Cell::Arrow(Direction::Up);
        right || below
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("Expert").unwrap(), Difficulty::Expert);
        assert_eq!(Difficulty::parse("medium").unwrap(), Difficulty::Intermediate);
        assert!(matches!(
            Difficulty::parse("nightmare"),
            Err(EngineError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_opposing_arrows_detection() {
        assert!(has_opposing_arrows(&Grid::parse(".RL. .... .... ....").unwrap()));
        assert!(has_opposing_arrows(&Grid::parse(".... ...D ...U ....").unwrap()));
        // Pointing away from each other is fine
        assert!(!has_opposing_arrows(&Grid::parse(".LR. .... .... ....").unwrap()));
        assert!(!has_opposing_arrows(&Grid::parse(".... ...U ...D ....").unwrap()));
        // Not adjacent
        assert!(!has_opposing_arrows(&Grid::parse("R.L. .... .... ....").unwrap()));
        // Wraps across rows do not count
        assert!(!has_opposing_arrows(&Grid::parse("...R L... .... ....").unwrap()));
    }

    #[test]
    fn test_random_grid_respects_count_and_alphabet() {
        let mut rng = Pcg32::seed_from_u64(7);
        for maze_type in [MazeType::Walls, MazeType::Arrows] {
            for difficulty in [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Expert] {
                for _ in 0..200 {
                    let grid = random_grid(maze_type, difficulty, &mut rng);
                    assert!(difficulty.obstacle_range().contains(&grid.obstacle_count()));
                    assert!(grid.uses_only(maze_type));
                }
            }
        }
    }

    #[test]
    fn test_beginner_arrow_mazes_have_no_bounce_traps() {
        let mut rng = Pcg32::seed_from_u64(2024);
        for _ in 0..1000 {
            let maze = generate(MazeType::Arrows, Difficulty::Beginner, &mut rng);
            assert!(!has_opposing_arrows(&maze.grid), "bounce trap in\n{}", maze.grid);
        }
    }

    #[test]
    fn test_generated_mazes_always_have_an_exit() {
        let mut rng = Pcg32::seed_from_u64(99);
        for maze_type in [MazeType::Walls, MazeType::Arrows] {
            for difficulty in [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Expert] {
                for _ in 0..1000 {
                    let maze = generate(maze_type, difficulty, &mut rng);
                    assert!(maze.mapping.has_escape(), "no exit in\n{}", maze.grid);
                    assert!(maze.attempts <= MAX_GENERATION_ATTEMPTS);
                }
            }
        }
    }

    #[test]
    fn test_generation_is_reproducible() {
        let a = generate(MazeType::Arrows, Difficulty::Expert, &mut Pcg32::seed_from_u64(5));
        let b = generate(MazeType::Arrows, Difficulty::Expert, &mut Pcg32::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generation_gives_up_after_fifty_attempts() {
        // Every room bounces the mouse straight back, so nothing escapes
        let trapped = Grid::parse("DDDD UUUU DDDD UUUU").unwrap();
        let last = Grid::parse("DDDD UUUU RLRL RLRL").unwrap();
        let mut calls = 0u32;
        let maze = generate_with(MazeType::Arrows, Difficulty::Expert, || {
            calls += 1;
            if calls == MAX_GENERATION_ATTEMPTS { last } else { trapped }
        });

        assert_eq!(calls, MAX_GENERATION_ATTEMPTS);
        assert_eq!(maze.attempts, MAX_GENERATION_ATTEMPTS);
        assert_eq!(maze.grid, last);
        assert!(!maze.mapping.has_escape());
    }

    #[test]
    fn test_generation_stops_at_first_acceptable_candidate() {
        let mut calls = 0u32;
        let maze = generate_with(MazeType::Arrows, Difficulty::Beginner, || {
            calls += 1;
            if calls < 3 {
                Grid::parse(".RL. .... .... ....").unwrap()
            } else {
                Grid::parse("R... .... .... ....").unwrap()
            }
        });
        assert_eq!(calls, 3);
        assert_eq!(maze.attempts, 3);
        assert_eq!(maze.grid.obstacle_count(), 1);
    }

    #[test]
    fn test_mapping_matches_grid() {
        let mut rng = Pcg32::seed_from_u64(11);
        let maze = generate(MazeType::Walls, Difficulty::Intermediate, &mut rng);
        assert_eq!(maze.mapping, Mapping::build(&maze.grid));
    }
}
