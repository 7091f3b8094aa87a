//! Game settings
//!
//! Which maze to build and how to play it. Read from JSON; every field is
//! optional and falls back to the default.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::sim::{Difficulty, MazeType};

/// How the player interacts with the hidden maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Eight forward/reverse questions
    #[default]
    Intro,
    /// Probe the maze and rebuild it
    Inference,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Intro => "intro",
            GameMode::Inference => "inference",
        }
    }

    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s.trim().to_lowercase().as_str() {
            "intro" | "quiz" => Ok(GameMode::Intro),
            "inference" | "infer" => Ok(GameMode::Inference),
            _ => Err(EngineError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub maze_type: MazeType,
    pub difficulty: Difficulty,
    pub mode: GameMode,
    /// Fixed seed for a reproducible game; random when absent
    pub seed: Option<u64>,
}

impl Settings {
    /// Environment variable naming a settings file for the native build
    pub const ENV_VAR: &'static str = "MOUSE_MAZE_SETTINGS";

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings from the file named by `MOUSE_MAZE_SETTINGS`, else defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(Self::ENV_VAR) {
            match Self::load_from(&path) {
                Ok(settings) => return settings,
                Err(e) => log::warn!("Ignoring settings file {}: {}", path, e),
            }
        }
        log::info!("Using default settings");
        Self::default()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::default()
    }

    /// The configured seed, or a fresh random one
    pub fn resolve_seed(&self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => {
                #[cfg(not(target_arch = "wasm32"))]
                let seed = rand::random::<u64>();
                #[cfg(target_arch = "wasm32")]
                let seed = {
                    let half = || (js_sys::Math::random() * (u32::MAX as f64 + 1.0)) as u64;
                    (half() << 32) | half()
                };
                log::info!("Using random seed {}", seed);
                seed
            }
        }
    }
}
