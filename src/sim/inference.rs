//! Inference mode
//!
//! The player probes the hidden maze one mouse at a time, builds their own
//! model grid, and tests it. A model is judged on behaviour: it passes when
//! every hole does the same thing as in the hidden maze, whatever the
//! layout.

use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::generate::{Difficulty, generate};
use super::grid::{Cell, CellPos, Grid, MazeType, next_symbol};
use super::hole::Hole;
use super::mapping::Mapping;
use super::trace::Outcome;
use crate::consts::{HOLE_COUNT, MIN_MODEL_CELLS};

/// How a model grid measures up against the hidden one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    /// Holes (0..=16) where the model behaves like the hidden maze
    pub match_count: usize,
    /// Room-for-room identical grids
    pub same_layout: bool,
    /// Non-empty rooms in the model
    pub model_cells: usize,
}

/// Feedback tier for a tested model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// Same behaviour, same layout
    Perfect,
    /// Same behaviour from a different layout
    Alternate,
    Partial { matches: usize },
}

impl Comparison {
    pub fn verdict(&self) -> Verdict {
        match (self.match_count == HOLE_COUNT, self.same_layout) {
            (true, true) => Verdict::Perfect,
            (true, false) => Verdict::Alternate,
            (false, _) => Verdict::Partial {
                matches: self.match_count,
            },
        }
    }

    /// Offer to show the hidden maze: only for a working but different
    /// model with enough rooms filled in.
    pub fn offer_reveal(&self) -> bool {
        self.verdict() == Verdict::Alternate && self.model_cells >= MIN_MODEL_CELLS
    }
}

/// Score `model` against the hidden grid and its mapping.
pub fn compare(real_grid: &Grid, real_mapping: &Mapping, model: &Grid) -> Comparison {
    let model_mapping = Mapping::build(model);
    Comparison {
        match_count: real_mapping.match_count(&model_mapping),
        same_layout: real_grid == model,
        model_cells: model.obstacle_count(),
    }
}

/// Result of one "test my model" press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReport {
    pub comparison: Comparison,
    pub verdict: Verdict,
    pub probes: u32,
    pub offer_reveal: bool,
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verdict {
            Verdict::Perfect => write!(
                f,
                "Your model is right! All 16 mice behave correctly and your layout matches the hidden one."
            )?,
            Verdict::Alternate => write!(
                f,
                "Your model works. All 16 mice behave correctly, though your layout is different from mine. More than one right answer is possible."
            )?,
            Verdict::Partial { matches } => write!(
                f,
                "{matches} of your mice arrive in the right place for that model."
            )?,
        }
        write!(f, " You have sent {} mice into the maze.", self.probes)
    }
}

/// One probe in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRecord {
    pub start: Hole,
    pub exit: Option<Hole>,
}

impl fmt::Display for ProbeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit {
            Some(exit) => write!(f, "From {} -> {}", self.start, exit),
            None => write!(f, "From {} -> (stuck inside)", self.start),
        }
    }
}

/// One inference game: a hidden maze and the player's model of it
#[derive(Debug, Clone)]
pub struct InferenceGame {
    maze_type: MazeType,
    difficulty: Difficulty,
    seed: u64,
    hidden: Grid,
    hidden_mapping: Mapping,
    model: Grid,
    probes: Vec<ProbeRecord>,
}

impl InferenceGame {
    /// Generate a hidden maze from `seed` with an empty model.
    pub fn start(maze_type: MazeType, difficulty: Difficulty, seed: u64) -> Self {
        let maze = generate(maze_type, difficulty, &mut Pcg32::seed_from_u64(seed));
        log::info!(
            "New {} {} inference game (seed {}):\n{}",
            difficulty,
            maze_type,
            seed,
            maze.grid
        );
        Self {
            maze_type,
            difficulty,
            seed,
            hidden: maze.grid,
            hidden_mapping: maze.mapping,
            model: Grid::new(),
            probes: Vec::new(),
        }
    }

    /// Inference game over a given hidden grid
    pub fn with_grid(maze_type: MazeType, difficulty: Difficulty, hidden: Grid) -> Self {
        Self {
            maze_type,
            difficulty,
            seed: 0,
            hidden_mapping: Mapping::build(&hidden),
            hidden,
            model: Grid::new(),
            probes: Vec::new(),
        }
    }

    pub fn maze_type(&self) -> MazeType {
        self.maze_type
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn model(&self) -> &Grid {
        &self.model
    }

    pub fn probe_count(&self) -> u32 {
        self.probes.len() as u32
    }

    pub fn probe_log(&self) -> &[ProbeRecord] {
        &self.probes
    }

    /// Send a mouse into the hidden maze.
    pub fn probe(&mut self, hole: Hole) -> &Outcome {
        let outcome = self.hidden_mapping.outcome(hole);
        let record = ProbeRecord {
            start: hole,
            exit: outcome.exit_hole,
        };
        log::debug!("Probe #{}: {}", self.probes.len() + 1, record);
        self.probes.push(record);
        outcome
    }

    /// Advance one model room to the next symbol of the maze's alphabet.
    pub fn cycle_cell(&mut self, pos: CellPos) -> Cell {
        let next = next_symbol(self.model.get(pos), self.maze_type);
        self.model.set(pos, next);
        log::debug!("Model ({}, {}) = {}", pos.row, pos.col, next);
        next
    }

    pub fn set_cell(&mut self, pos: CellPos, cell: Cell) {
        self.model.set(pos, cell);
    }

    pub fn reset_model(&mut self) {
        self.model = Grid::new();
    }

    /// Path a mouse takes through the player's model
    pub fn trace_model(&self, hole: Hole) -> Outcome {
        super::trace::trace(&self.model, hole)
    }

    /// Compare the model with the hidden maze.
    pub fn test_model(&self) -> ModelReport {
        let comparison = compare(&self.hidden, &self.hidden_mapping, &self.model);
        let report = ModelReport {
            comparison,
            verdict: comparison.verdict(),
            probes: self.probe_count(),
            offer_reveal: comparison.offer_reveal(),
        };
        log::info!(
            "Model test: {}/{} holes match, same layout: {}, {} probes",
            comparison.match_count,
            HOLE_COUNT,
            comparison.same_layout,
            report.probes
        );
        report
    }

    /// The hidden maze, for the reveal
    pub fn hidden_grid(&self) -> &Grid {
        &self.hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every mouse entering row 0 is trapped there; rows 1-3 are open.
    const ROW_TRAP: &str = "RLRL .... .... ....";
    // Same behaviour, different arrows on the right half of row 0
    const ROW_TRAP_ALT: &str = "RLLL .... .... ....";

    #[test]
    fn test_compare_identical_is_perfect() {
        let grid = Grid::parse(ROW_TRAP).unwrap();
        let mapping = Mapping::build(&grid);
        let cmp = compare(&grid, &mapping, &grid);
        assert_eq!(cmp.match_count, HOLE_COUNT);
        assert!(cmp.same_layout);
        assert_eq!(cmp.verdict(), Verdict::Perfect);
        assert!(!cmp.offer_reveal());
    }

    #[test]
    fn test_compare_equivalent_layout_is_alternate() {
        let real = Grid::parse(ROW_TRAP).unwrap();
        let model = Grid::parse(ROW_TRAP_ALT).unwrap();
        let cmp = compare(&real, &Mapping::build(&real), &model);
        assert_eq!(cmp.match_count, HOLE_COUNT);
        assert!(!cmp.same_layout);
        assert_eq!(cmp.verdict(), Verdict::Alternate);
        assert!(cmp.offer_reveal());
    }

    #[test]
    fn test_empty_model_falls_short() {
        let real = Grid::parse(ROW_TRAP).unwrap();
        let mapping = Mapping::build(&real);
        assert!(mapping.iter().any(|(_, o)| o.trapped));
        assert!(mapping.has_escape());

        let cmp = compare(&real, &mapping, &Grid::new());
        assert!(cmp.match_count < HOLE_COUNT);
        assert!(matches!(cmp.verdict(), Verdict::Partial { .. }));
    }

    #[test]
    fn test_reveal_needs_enough_cells() {
        let sparse = Comparison {
            match_count: HOLE_COUNT,
            same_layout: false,
            model_cells: MIN_MODEL_CELLS - 1,
        };
        assert_eq!(sparse.verdict(), Verdict::Alternate);
        assert!(!sparse.offer_reveal());

        let partial = Comparison {
            match_count: 15,
            same_layout: false,
            model_cells: 10,
        };
        assert!(!partial.offer_reveal());
    }

    #[test]
    fn test_probes_are_counted_and_logged() {
        let mut game = InferenceGame::with_grid(
            MazeType::Arrows,
            Difficulty::Beginner,
            Grid::parse(ROW_TRAP).unwrap(),
        );
        assert!(game.probe(Hole::new(1)).trapped);
        assert_eq!(game.probe(Hole::new(6)).exit_hole, Some(Hole::new(15)));
        assert_eq!(game.probe_count(), 2);
        assert_eq!(game.probe_log()[0].to_string(), "From 1 -> (stuck inside)");
        assert_eq!(game.probe_log()[1].to_string(), "From 6 -> 15");
        assert!(game.test_model().to_string().ends_with("You have sent 2 mice into the maze."));
    }

    #[test]
    fn test_tracing_the_model_ignores_the_hidden_maze() {
        let mut game = InferenceGame::with_grid(
            MazeType::Arrows,
            Difficulty::Beginner,
            Grid::parse(ROW_TRAP).unwrap(),
        );
        // Empty model: straight through
        assert_eq!(game.trace_model(Hole::new(1)).exit_hole, Some(Hole::new(12)));

        game.set_cell(CellPos::new(0, 0), Cell::RIGHT);
        game.set_cell(CellPos::new(0, 1), Cell::LEFT);
        assert!(game.trace_model(Hole::new(1)).trapped);
        assert_eq!(game.probe_count(), 0);
    }

    #[test]
    fn test_building_the_model_by_cycling() {
        let mut game = InferenceGame::with_grid(
            MazeType::Arrows,
            Difficulty::Beginner,
            Grid::parse(ROW_TRAP).unwrap(),
        );
        // U, R: one and two presses
        let a = CellPos::new(0, 0);
        assert_eq!(game.cycle_cell(a), Cell::UP);
        assert_eq!(game.cycle_cell(a), Cell::RIGHT);
        // U, R, D, L: four presses
        for col in [1, 3] {
            for _ in 0..4 {
                game.cycle_cell(CellPos::new(0, col));
            }
        }
        game.set_cell(CellPos::new(0, 2), Cell::RIGHT);

        let report = game.test_model();
        assert_eq!(report.verdict, Verdict::Perfect);
        assert_eq!(game.model(), game.hidden_grid());

        game.reset_model();
        assert_eq!(game.model(), &Grid::new());
    }

    #[test]
    fn test_start_is_reproducible() {
        let a = InferenceGame::start(MazeType::Walls, Difficulty::Expert, 314);
        let b = InferenceGame::start(MazeType::Walls, Difficulty::Expert, 314);
        assert_eq!(a.hidden_grid(), b.hidden_grid());
        assert!(a.hidden_grid().uses_only(MazeType::Walls));
        assert_eq!(a.probe_count(), 0);
    }
}
