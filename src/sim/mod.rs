//! Maze engine
//!
//! Everything the game decides lives here. This module is pure computation:
//! - No rendering, timing or platform dependencies
//! - All randomness comes from an injected `rand::Rng`
//! - Sessions own a seeded `Pcg32`, so a seed replays a whole game

pub mod generate;
pub mod grid;
pub mod hole;
pub mod inference;
pub mod mapping;
pub mod quiz;
pub mod trace;

pub use generate::{Difficulty, GeneratedMaze, generate, has_opposing_arrows, random_grid};
pub use grid::{Cell, CellPos, Direction, Grid, MazeType, Wall, next_symbol};
pub use hole::{Edge, Hole, HoleSet};
pub use inference::{Comparison, InferenceGame, ModelReport, ProbeRecord, Verdict, compare};
pub use mapping::{Mapping, build_mapping};
pub use quiz::{
    Answer, AnswerResult, Feedback, Grading, Question, QuestionRecord, QuestionSelector,
    QuizPhase, QuizSession, grade,
};
pub use trace::{MAX_PATH_LEN, Outcome, trace};
