//! Engine error type
//!
//! Only boundary failures live here: text that could not be parsed into an
//! engine value, or a quiz driven out of turn. Contract violations inside the
//! engine (a hole or coordinate out of range) are assertions instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("hole {0} is outside 1..=16")]
    InvalidHole(u8),

    #[error("cell ({row}, {col}) is outside the 4x4 grid")]
    InvalidCell { row: usize, col: usize },

    #[error("unknown cell symbol {0:?}")]
    UnknownSymbol(char),

    #[error("grid text must have 4 rows of 4 symbols, got {0:?}")]
    MalformedGrid(String),

    #[error("unknown maze type {0:?} (expected walls or arrows)")]
    UnknownMazeType(String),

    #[error("unknown difficulty {0:?} (expected beginner, intermediate or expert)")]
    UnknownDifficulty(String),

    #[error("unknown game mode {0:?} (expected intro or inference)")]
    UnknownMode(String),

    #[error("seed must be a whole number, got {0:?}")]
    InvalidSeed(String),

    #[error("no question is waiting for an answer")]
    NotAwaitingAnswer,

    #[error("the current question has not been answered yet")]
    AnswerPending,

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("could not read settings file: {0}")]
    Io(#[from] std::io::Error),
}
