//! Quiz mode: question selection and session state
//!
//! A session is one maze and eight questions. Each question is forward
//! (given a start, name the exit) or reverse (given an exit, name a start).
//! Reverse questions only appear above beginner difficulty, and take a
//! different form in wall mazes (one right start) and arrow mazes (any start
//! of a group). Holes are not reused within a session: forward starts and
//! reverse ends are each tracked in their own exhaustion set.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::generate::{Difficulty, generate};
use super::grid::{Grid, MazeType};
use super::hole::{Hole, HoleSet};
use super::mapping::Mapping;
use super::trace::Outcome;
use crate::consts::TOTAL_QUESTIONS;
use crate::error::EngineError;

/// One quiz question, with everything needed to mark it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Question {
    /// "A mouse leaves `start`. Where does it come out?"
    Forward {
        start: Hole,
        exit: Option<Hole>,
        trapped: bool,
    },
    /// "A mouse ends up in `end`. Where did it start?" (exactly one answer)
    ReverseWalls { start: Hole, end: Hole },
    /// "A mouse ends up in `end`. Where could it have started?"
    ReverseArrows { end: Hole, starts: Vec<Hole> },
}

impl Question {
    pub fn is_reverse(&self) -> bool {
        !matches!(self, Question::Forward { .. })
    }

    /// Player-facing wording
    pub fn prompt(&self, maze_type: MazeType) -> String {
        match self {
            Question::Forward { start, .. } => {
                let extra = if maze_type == MazeType::Arrows {
                    " (Or answer that the mouse doesn't come out.)"
                } else {
                    ""
                };
                format!("A mouse leaves hole {start}. Where will it come out?{extra}")
            }
            Question::ReverseWalls { end, .. } => {
                format!("A mouse ends up in hole {end}. From which hole did it start?")
            }
            Question::ReverseArrows { end, .. } => format!(
                "A mouse ends up in hole {end}. Name one hole that could have been its starting hole."
            ),
        }
    }
}

/// The player's reply to a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Hole(Hole),
    /// "The mouse doesn't come out"
    NoExit,
}

/// What to tell the player after marking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    Correct,
    /// Correctly said an arrow-maze mouse never comes out
    CorrectNeverExits,
    CorrectOneOf { starts: Vec<Hole> },
    Trapped,
    /// Named a hole for a mouse that never comes out
    TrappedExpectedNoExit,
    WrongExit { exit: Hole },
    WrongStart { start: Hole },
    WrongStartOneOf { starts: Vec<Hole> },
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        matches!(
            self,
            Feedback::Correct | Feedback::CorrectNeverExits | Feedback::CorrectOneOf { .. }
        )
    }
}

fn join_holes(holes: &[Hole]) -> String {
    holes
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Correct => write!(f, "Nice work, that matches the maze."),
            Feedback::CorrectNeverExits => {
                write!(f, "Nice work. In this maze that mouse never comes out.")
            }
            Feedback::CorrectOneOf { starts } => write!(
                f,
                "Nice work, that matches the maze. (Possible starting hole(s): {})",
                join_holes(starts)
            ),
            Feedback::Trapped => write!(f, "That mouse is stuck in the house forever!"),
            Feedback::TrappedExpectedNoExit => write!(
                f,
                "That mouse is stuck in the house forever. The correct choice was that it doesn't come out."
            ),
            Feedback::WrongExit { exit } => write!(f, "Oops, it actually came out at hole {exit}."),
            Feedback::WrongStart { start } => {
                write!(f, "Oops, it actually started at hole {start}.")
            }
            Feedback::WrongStartOneOf { starts } => {
                write!(f, "Oops. Possible starting hole(s): {}.", join_holes(starts))
            }
        }
    }
}

/// Result of marking one answer against the maze
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grading {
    pub correct: bool,
    /// Hole whose path the UI should play back
    pub animate_from: Hole,
    pub feedback: Feedback,
}

/// Mark `answer` against `question`.
pub fn grade(question: &Question, answer: Answer, maze_type: MazeType, mapping: &Mapping) -> Grading {
    let arrow_forward = matches!(question, Question::Forward { .. }) && maze_type == MazeType::Arrows;

    let (correct, animate_from) = match question {
        Question::Forward {
            start,
            exit,
            trapped,
        } => {
            let correct = if *trapped && maze_type == MazeType::Arrows {
                answer == Answer::NoExit
            } else {
                match answer {
                    Answer::Hole(h) => *exit == Some(h),
                    Answer::NoExit => false,
                }
            };
            (correct, *start)
        }
        Question::ReverseWalls { start, .. } => (answer == Answer::Hole(*start), *start),
        Question::ReverseArrows { end, starts } => match answer {
            Answer::Hole(h) => (starts.contains(&h), h),
            Answer::NoExit => (false, starts.first().copied().unwrap_or(*end)),
        },
    };

    let outcome = mapping.outcome(animate_from);
    let feedback = match (correct, outcome.exit_hole) {
        (true, None) if arrow_forward => Feedback::CorrectNeverExits,
        (true, _) => match question {
            Question::ReverseArrows { starts, .. } => Feedback::CorrectOneOf {
                starts: starts.clone(),
            },
            _ => Feedback::Correct,
        },
        (false, None) => {
            if arrow_forward && answer != Answer::NoExit {
                Feedback::TrappedExpectedNoExit
            } else {
                Feedback::Trapped
            }
        }
        (false, Some(actual)) => match question {
            Question::Forward { .. } => Feedback::WrongExit { exit: actual },
            Question::ReverseWalls { start, .. } => Feedback::WrongStart { start: *start },
            Question::ReverseArrows { starts, .. } => Feedback::WrongStartOneOf {
                starts: starts.clone(),
            },
        },
    };

    Grading {
        correct,
        animate_from,
        feedback,
    }
}

/// Picks non-repeating questions for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSelector {
    pub maze_type: MazeType,
    pub difficulty: Difficulty,
    used_forward_starts: HoleSet,
    used_reverse_wall_ends: HoleSet,
    used_reverse_arrow_ends: HoleSet,
}

impl QuestionSelector {
    pub fn new(maze_type: MazeType, difficulty: Difficulty) -> Self {
        Self {
            maze_type,
            difficulty,
            ..Default::default()
        }
    }

    pub fn used_forward_starts(&self) -> HoleSet {
        self.used_forward_starts
    }

    pub fn used_reverse_ends(&self) -> HoleSet {
        match self.maze_type {
            MazeType::Walls => self.used_reverse_wall_ends,
            MazeType::Arrows => self.used_reverse_arrow_ends,
        }
    }

    /// Draw the next question. A reverse draw whose pool is empty becomes a
    /// forward question.
    pub fn next<R: Rng + ?Sized>(&mut self, mapping: &Mapping, rng: &mut R) -> Question {
        let p = self.difficulty.reverse_probability();
        if p > 0.0 && rng.random_bool(p) {
            let reverse = match self.maze_type {
                MazeType::Walls => self.reverse_walls(mapping, rng),
                MazeType::Arrows => self.reverse_arrows(mapping, rng),
            };
            if let Some(question) = reverse {
                return question;
            }
            log::warn!("no unused reverse {} question left, asking forward", self.maze_type);
        }
        self.forward(mapping, rng)
    }

    /// Uniform unused start hole. Falls back to hole 1 once all 16 are used.
    pub fn forward<R: Rng + ?Sized>(&mut self, mapping: &Mapping, rng: &mut R) -> Question {
        let candidates: Vec<Hole> = self.used_forward_starts.remaining().collect();
        let start = if candidates.is_empty() {
            Hole::new(1)
        } else {
            let start = candidates[rng.random_range(0..candidates.len())];
            self.used_forward_starts.insert(start);
            start
        };

        let outcome = mapping.outcome(start);
        Question::Forward {
            start,
            exit: outcome.exit_hole,
            trapped: outcome.trapped,
        }
    }

    /// Uniform (start, end) pair among escaping mice whose end is unused
    pub fn reverse_walls<R: Rng + ?Sized>(
        &mut self,
        mapping: &Mapping,
        rng: &mut R,
    ) -> Option<Question> {
        let pairs: Vec<(Hole, Hole)> = mapping
            .escapes()
            .filter(|(_, end)| !self.used_reverse_wall_ends.contains(*end))
            .collect();
        if pairs.is_empty() {
            return None;
        }

        let (start, end) = pairs[rng.random_range(0..pairs.len())];
        self.used_reverse_wall_ends.insert(end);
        Some(Question::ReverseWalls { start, end })
    }

    /// Uniform unused exit hole, answered by any start that reaches it
    pub fn reverse_arrows<R: Rng + ?Sized>(
        &mut self,
        mapping: &Mapping,
        rng: &mut R,
    ) -> Option<Question> {
        let mut groups: Vec<(Hole, Vec<Hole>)> = mapping
            .starts_by_exit()
            .into_iter()
            .filter(|(end, _)| !self.used_reverse_arrow_ends.contains(*end))
            .collect();
        if groups.is_empty() {
            return None;
        }

        let (end, starts) = groups.swap_remove(rng.random_range(0..groups.len()));
        self.used_reverse_arrow_ends.insert(end);
        Some(Question::ReverseArrows { end, starts })
    }
}

/// Where a session is in its question/answer cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizPhase {
    AwaitingAnswer,
    /// Answer marked, next question not yet drawn
    Answered,
    Finished,
}

/// One line of the question log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// 1-based
    pub index: u32,
    pub question: Question,
    pub answer: Answer,
    pub correct: bool,
}

/// Everything the UI needs after an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub correct: bool,
    pub animate_from: Hole,
    /// Path to play back for `animate_from`
    pub outcome: Outcome,
    pub feedback: Feedback,
    pub score: u32,
    pub finished: bool,
}

/// One quiz game: a hidden maze and eight questions about it
#[derive(Debug, Clone)]
pub struct QuizSession {
    maze_type: MazeType,
    difficulty: Difficulty,
    seed: u64,
    grid: Grid,
    mapping: Mapping,
    selector: QuestionSelector,
    rng: Pcg32,
    /// 1-based index of the current question
    question_index: u32,
    score: u32,
    current: Option<Question>,
    phase: QuizPhase,
    history: Vec<QuestionRecord>,
}

impl QuizSession {
    /// Generate a maze from `seed` and ask the first question.
    pub fn start(maze_type: MazeType, difficulty: Difficulty, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let maze = generate(maze_type, difficulty, &mut rng);
        log::info!(
            "New {} {} quiz (seed {}):\n{}",
            difficulty,
            maze_type,
            seed,
            maze.grid
        );
        Self::begin(maze_type, difficulty, seed, maze.grid, maze.mapping, rng)
    }

    /// Quiz over a given grid instead of a generated one
    pub fn with_grid(maze_type: MazeType, difficulty: Difficulty, grid: Grid, seed: u64) -> Self {
        let mapping = Mapping::build(&grid);
        Self::begin(
            maze_type,
            difficulty,
            seed,
            grid,
            mapping,
            Pcg32::seed_from_u64(seed),
        )
    }

    fn begin(
        maze_type: MazeType,
        difficulty: Difficulty,
        seed: u64,
        grid: Grid,
        mapping: Mapping,
        mut rng: Pcg32,
    ) -> Self {
        let mut selector = QuestionSelector::new(maze_type, difficulty);
        let first = selector.next(&mapping, &mut rng);
        log::debug!("Question 1: {:?}", first);
        Self {
            maze_type,
            difficulty,
            seed,
            grid,
            mapping,
            selector,
            rng,
            question_index: 1,
            score: 0,
            current: Some(first),
            phase: QuizPhase::AwaitingAnswer,
            history: Vec::with_capacity(TOTAL_QUESTIONS as usize),
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

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    pub fn question_index(&self) -> u32 {
        self.question_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Final score once all questions are answered
    pub fn final_score(&self) -> Option<u32> {
        self.is_finished().then_some(self.score)
    }

    /// The question on screen (still shown after it is answered)
    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// Answered questions in order
    pub fn history(&self) -> &[QuestionRecord] {
        &self.history
    }

    /// Mark an answer to the current question.
    pub fn answer(&mut self, answer: Answer) -> Result<AnswerResult, EngineError> {
        if self.phase != QuizPhase::AwaitingAnswer {
            return Err(EngineError::NotAwaitingAnswer);
        }
        let question = self.current.clone().ok_or(EngineError::NotAwaitingAnswer)?;

        let grading = grade(&question, answer, self.maze_type, &self.mapping);
        if grading.correct {
            self.score += 1;
        }
        self.history.push(QuestionRecord {
            index: self.question_index,
            question,
            answer,
            correct: grading.correct,
        });

        let finished = self.question_index >= TOTAL_QUESTIONS;
        self.phase = if finished {
            log::info!("Quiz finished: {} of {} correct", self.score, TOTAL_QUESTIONS);
            QuizPhase::Finished
        } else {
            QuizPhase::Answered
        };

        Ok(AnswerResult {
            correct: grading.correct,
            animate_from: grading.animate_from,
            outcome: self.mapping.outcome(grading.animate_from).clone(),
            feedback: grading.feedback,
            score: self.score,
            finished,
        })
    }

    /// Draw the next question. `Ok(None)` once the session is over.
    pub fn next_question(&mut self) -> Result<Option<Question>, EngineError> {
        match self.phase {
            QuizPhase::AwaitingAnswer => Err(EngineError::AnswerPending),
            QuizPhase::Finished => Ok(None),
            QuizPhase::Answered => {
                self.question_index += 1;
                let question = self.selector.next(&self.mapping, &mut self.rng);
                log::debug!("Question {}: {:?}", self.question_index, question);
                self.current = Some(question.clone());
                self.phase = QuizPhase::AwaitingAnswer;
                Ok(Some(question))
            }
        }
    }
}
