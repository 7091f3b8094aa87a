//! Browser bindings
//!
//! Thin wasm-bindgen layer over `sim` for the JavaScript UI. Structured
//! values cross the boundary as JSON strings; holes are plain numbers and
//! are range-checked here before reaching the engine.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::prelude::*;

use crate::error::EngineError;
use crate::settings::Settings;
use crate::sim::{
    Answer, Cell, CellPos, Difficulty, Grid, Hole, InferenceGame, MazeType, QuizSession,
};

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_err)
}

fn hole(number: u8) -> Result<Hole, JsValue> {
    Hole::try_from(number).map_err(js_err)
}

fn cell_pos(row: usize, col: usize) -> Result<CellPos, JsValue> {
    CellPos::checked(row, col).map_err(js_err)
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    Settings {
        seed,
        ..Settings::default()
    }
    .resolve_seed()
}

fn parse_config(maze_type: &str, difficulty: &str) -> Result<(MazeType, Difficulty), JsValue> {
    let maze_type = MazeType::parse(maze_type).map_err(js_err)?;
    let difficulty = Difficulty::parse(difficulty).map_err(js_err)?;
    Ok((maze_type, difficulty))
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Mouse maze engine ready");
}

/// `{grid, mapping, attempts}` for a new maze
#[wasm_bindgen(js_name = generateMaze)]
pub fn generate_maze(maze_type: &str, difficulty: &str, seed: Option<u64>) -> Result<String, JsValue> {
    let (maze_type, difficulty) = parse_config(maze_type, difficulty)?;
    let mut rng = Pcg32::seed_from_u64(resolve_seed(seed));
    to_json(&crate::sim::generate(maze_type, difficulty, &mut rng))
}

/// Outcome JSON for one hole of a grid given as JSON
#[wasm_bindgen(js_name = traceHole)]
pub fn trace_hole(grid_json: &str, start: u8) -> Result<String, JsValue> {
    let grid: Grid = serde_json::from_str(grid_json).map_err(js_err)?;
    to_json(&crate::sim::trace(&grid, hole(start)?))
}

/// Mapping JSON for a grid given as JSON
#[wasm_bindgen(js_name = buildMapping)]
pub fn build_mapping(grid_json: &str) -> Result<String, JsValue> {
    let grid: Grid = serde_json::from_str(grid_json).map_err(js_err)?;
    to_json(&crate::sim::build_mapping(&grid))
}

/// Symbol a room shows after one more click
#[wasm_bindgen(js_name = nextSymbol)]
pub fn next_symbol(current: char, maze_type: &str) -> Result<char, JsValue> {
    let maze_type = MazeType::parse(maze_type).map_err(js_err)?;
    let cell = Cell::from_symbol(current).map_err(js_err)?;
    Ok(crate::sim::next_symbol(cell, maze_type).symbol())
}

/// A quiz game
#[wasm_bindgen]
pub struct WasmQuiz {
    inner: QuizSession,
}

#[wasm_bindgen]
impl WasmQuiz {
    #[wasm_bindgen(constructor)]
    pub fn new(maze_type: &str, difficulty: &str, seed: Option<u64>) -> Result<WasmQuiz, JsValue> {
        let (maze_type, difficulty) = parse_config(maze_type, difficulty)?;
        let seed = resolve_seed(seed);
        Ok(Self {
            inner: QuizSession::start(maze_type, difficulty, seed),
        })
    }

    #[wasm_bindgen(js_name = questionJson)]
    pub fn question_json(&self) -> Result<String, JsValue> {
        to_json(&self.inner.current_question())
    }

    #[wasm_bindgen(js_name = questionPrompt)]
    pub fn question_prompt(&self) -> Option<String> {
        self.inner
            .current_question()
            .map(|q| q.prompt(self.inner.maze_type()))
    }

    /// Answer with a hole; returns the AnswerResult JSON
    #[wasm_bindgen(js_name = answerHole)]
    pub fn answer_hole(&mut self, number: u8) -> Result<String, JsValue> {
        let result = self.inner.answer(Answer::Hole(hole(number)?)).map_err(js_err)?;
        to_json(&result)
    }

    /// Answer "the mouse doesn't come out"
    #[wasm_bindgen(js_name = answerNoExit)]
    pub fn answer_no_exit(&mut self) -> Result<String, JsValue> {
        let result = self.inner.answer(Answer::NoExit).map_err(js_err)?;
        to_json(&result)
    }

    /// Next question JSON, or `null` when the quiz is over
    #[wasm_bindgen(js_name = nextQuestion)]
    pub fn next_question(&mut self) -> Result<String, JsValue> {
        let question = self.inner.next_question().map_err(js_err)?;
        to_json(&question)
    }

    #[wasm_bindgen(js_name = questionIndex)]
    pub fn question_index(&self) -> u32 {
        self.inner.question_index()
    }

    pub fn score(&self) -> u32 {
        self.inner.score()
    }

    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    #[wasm_bindgen(js_name = gridJson)]
    pub fn grid_json(&self) -> Result<String, JsValue> {
        to_json(self.inner.grid())
    }

    #[wasm_bindgen(js_name = historyJson)]
    pub fn history_json(&self) -> Result<String, JsValue> {
        to_json(&self.inner.history())
    }
}

/// An inference game
#[wasm_bindgen]
pub struct WasmInference {
    inner: InferenceGame,
}

#[wasm_bindgen]
impl WasmInference {
    #[wasm_bindgen(constructor)]
    pub fn new(
        maze_type: &str,
        difficulty: &str,
        seed: Option<u64>,
    ) -> Result<WasmInference, JsValue> {
        let (maze_type, difficulty) = parse_config(maze_type, difficulty)?;
        let seed = resolve_seed(seed);
        Ok(Self {
            inner: InferenceGame::start(maze_type, difficulty, seed),
        })
    }

    /// Outcome JSON for a mouse sent into the hidden maze
    pub fn probe(&mut self, number: u8) -> Result<String, JsValue> {
        let start = hole(number)?;
        to_json(self.inner.probe(start))
    }

    /// Outcome JSON for a mouse sent through the player's model
    #[wasm_bindgen(js_name = traceModel)]
    pub fn trace_model(&self, number: u8) -> Result<String, JsValue> {
        to_json(&self.inner.trace_model(hole(number)?))
    }

    #[wasm_bindgen(js_name = probeCount)]
    pub fn probe_count(&self) -> u32 {
        self.inner.probe_count()
    }

    /// Click a model room; returns its new symbol
    #[wasm_bindgen(js_name = cycleCell)]
    pub fn cycle_cell(&mut self, row: usize, col: usize) -> Result<char, JsValue> {
        Ok(self.inner.cycle_cell(cell_pos(row, col)?).symbol())
    }

    #[wasm_bindgen(js_name = setCell)]
    pub fn set_cell(&mut self, row: usize, col: usize, symbol: char) -> Result<(), JsValue> {
        let cell = Cell::from_symbol(symbol).map_err(js_err)?;
        if !self.inner.maze_type().allows(cell) {
            return Err(js_err(EngineError::UnknownSymbol(symbol)));
        }
        self.inner.set_cell(cell_pos(row, col)?, cell);
        Ok(())
    }

    #[wasm_bindgen(js_name = resetModel)]
    pub fn reset_model(&mut self) {
        self.inner.reset_model();
    }

    #[wasm_bindgen(js_name = modelJson)]
    pub fn model_json(&self) -> Result<String, JsValue> {
        to_json(self.inner.model())
    }

    /// ModelReport JSON plus its message under `message`
    #[wasm_bindgen(js_name = testModel)]
    pub fn test_model(&self) -> Result<String, JsValue> {
        let report = self.inner.test_model();
        let mut value = serde_json::to_value(report).map_err(js_err)?;
        value["message"] = serde_json::Value::String(report.to_string());
        to_json(&value)
    }

    #[wasm_bindgen(js_name = hiddenGridJson)]
    pub fn hidden_grid_json(&self) -> Result<String, JsValue> {
        to_json(self.inner.hidden_grid())
    }
}
