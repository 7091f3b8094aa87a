//! Mouse Maze - a hidden-maze reasoning puzzle
//!
//! A mouse dropped into one of 16 holes around a 4×4 house bounces off
//! diagonal walls (or follows arrows) until it comes out of another hole or
//! runs in circles forever. Players predict exits, work backwards from
//! exits, or rebuild the hidden layout from probes.
//!
//! Core modules:
//! - `sim`: Deterministic engine (path tracing, generation, quiz, inference)
//! - `settings`: Game configuration
//! - `web`: wasm-bindgen surface for the browser UI (wasm32 only)

pub mod error;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::EngineError;
pub use settings::{GameMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Rooms per side of the house
    pub const GRID_SIZE: usize = 4;
    /// Holes around the perimeter
    pub const HOLE_COUNT: usize = 4 * GRID_SIZE;
    /// Questions in one quiz session
    pub const TOTAL_QUESTIONS: u32 = 8;
    /// Candidates the generator draws before settling for the last one
    pub const MAX_GENERATION_ATTEMPTS: u32 = 50;
    /// Filled rooms a working model needs before the hidden maze is offered
    pub const MIN_MODEL_CELLS: usize = 4;
}
