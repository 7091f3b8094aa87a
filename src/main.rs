//! Mouse Maze entry point
//!
//! Native builds play in the terminal; the browser build drives the engine
//! through `mouse_maze::web` instead.
//!
//! Usage: mouse-maze [walls|arrows] [beginner|intermediate|expert]
//!        [intro|inference] [--seed N] [--config PATH]

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{self, BufRead, Write};

    use mouse_maze::consts::{GRID_SIZE, TOTAL_QUESTIONS};
    use mouse_maze::sim::{
        Answer, CellPos, Difficulty, Grid, Hole, InferenceGame, MazeType, Outcome, QuizSession,
    };
    use mouse_maze::{EngineError, GameMode, Settings};

    /// Settings file (if any) with command-line overrides on top
    pub fn settings_from_args(args: &[String]) -> Result<Settings, EngineError> {
        let mut settings = match args.iter().position(|a| a == "--config") {
            Some(i) => match args.get(i + 1) {
                Some(path) => Settings::load_from(path)?,
                None => Settings::load(),
            },
            None => Settings::load(),
        };

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => {
                    iter.next();
                }
                "--seed" => {
                    settings.seed = Some(parse_seed(iter.next().map(String::as_str))?);
                }
                other => {
                    if let Ok(maze_type) = MazeType::parse(other) {
                        settings.maze_type = maze_type;
                    } else if let Ok(difficulty) = Difficulty::parse(other) {
                        settings.difficulty = difficulty;
                    } else {
                        settings.mode = GameMode::parse(other)?;
                    }
                }
            }
        }
        Ok(settings)
    }

    fn parse_seed(value: Option<&str>) -> Result<u64, EngineError> {
        let value = value.unwrap_or_default();
        value
            .parse()
            .map_err(|_| EngineError::InvalidSeed(value.to_string()))
    }

    fn prompt(text: &str) -> io::Result<Option<String>> {
        print!("{text}");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn describe(outcome: &Outcome) -> String {
        let rooms = outcome
            .path
            .iter()
            .map(|p| format!("({},{})", p.row, p.col))
            .collect::<Vec<_>>()
            .join(" ");
        match outcome.exit_hole {
            Some(exit) => format!("{rooms} -> hole {exit}"),
            None => format!("{rooms} -> loops forever"),
        }
    }

    /// House with hole numbers around the rim
    fn draw(grid: &Grid) -> String {
        let mut out = String::from("     1  2  3  4\n");
        for (row, cells) in grid.rows().iter().enumerate() {
            let left = 16 - row;
            let right = 5 + row;
            let rooms: String = cells.iter().map(|c| format!(" {} ", c.symbol())).collect();
            out.push_str(&format!("{left:>3} {rooms} {right}\n"));
        }
        out.push_str("    12 11 10  9");
        out
    }

    pub fn run_quiz(settings: &Settings) -> Result<(), EngineError> {
        let mut session =
            QuizSession::start(settings.maze_type, settings.difficulty, settings.resolve_seed());
        println!(
            "{} maze, {}. Answer with a hole number{}; 'q' quits.",
            settings.maze_type,
            settings.difficulty,
            if settings.maze_type == MazeType::Arrows {
                " or 'x' if the mouse never comes out"
            } else {
                ""
            }
        );

        while let Some(question) = session.current_question().cloned() {
            let text = format!(
                "\nQuestion {} of {}: {}\n> ",
                session.question_index(),
                TOTAL_QUESTIONS,
                question.prompt(settings.maze_type)
            );
            let Some(line) = prompt(&text)? else {
                return Ok(());
            };
            let answer = match line.as_str() {
                "q" | "quit" => return Ok(()),
                "x" | "none" | "no" => Answer::NoExit,
                other => match other.parse::<u8>().map(Hole::try_from) {
                    Ok(Ok(hole)) => Answer::Hole(hole),
                    _ => {
                        println!("Please enter a hole from 1 to 16.");
                        continue;
                    }
                },
            };

            let result = session.answer(answer)?;
            println!("{}", result.feedback);
            println!("  mouse from hole {}: {}", result.animate_from, describe(&result.outcome));

            if session.next_question()?.is_none() {
                break;
            }
        }

        if let Some(score) = session.final_score() {
            println!("\nYou made {score} out of {TOTAL_QUESTIONS} correct predictions.");
            println!("The hidden maze was:\n{}", draw(session.grid()));
        }
        Ok(())
    }

    fn parse_pos(parts: &[&str]) -> Option<CellPos> {
        let row = parts.first()?.parse().ok()?;
        let col = parts.get(1)?.parse().ok()?;
        CellPos::checked(row, col).ok()
    }

    pub fn run_inference(settings: &Settings) -> Result<(), EngineError> {
        let mut game =
            InferenceGame::start(settings.maze_type, settings.difficulty, settings.resolve_seed());
        println!("Inference mode. Commands:");
        println!("  <hole>          send a mouse in");
        println!("  c <row> <col>   cycle a room of your model (rows/cols 0-{})", GRID_SIZE - 1);
        println!("  trace <hole>    send a mouse through your model");
        println!("  show | test | reset | reveal | q");

        loop {
            let Some(line) = prompt("\n> ")? else {
                return Ok(());
            };
            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts.as_slice() {
                [] => {}
                ["q"] | ["quit"] => return Ok(()),
                ["show"] => println!("{}", draw(game.model())),
                ["reset"] => {
                    game.reset_model();
                    println!("{}", draw(game.model()));
                }
                ["trace", number] => match number.parse::<u8>().map(Hole::try_from) {
                    Ok(Ok(hole)) => println!("Your model: {}", describe(&game.trace_model(hole))),
                    _ => println!("Usage: trace <hole>"),
                },
                ["reveal"] => println!("{}", draw(game.hidden_grid())),
                ["test"] => {
                    let report = game.test_model();
                    println!("{report}");
                    if report.offer_reveal {
                        println!("Type 'reveal' to see the hidden model.");
                    }
                }
                ["c", rest @ ..] => match parse_pos(rest) {
                    Some(pos) => {
                        game.cycle_cell(pos);
                        println!("{}", draw(game.model()));
                    }
                    None => println!("Usage: c <row> <col>"),
                },
                [number] => match number.parse::<u8>().map(Hole::try_from) {
                    Ok(Ok(hole)) => {
                        let outcome = game.probe(hole);
                        match outcome.exit_hole {
                            Some(exit) => {
                                println!("The mouse from hole {hole} came out of hole {exit}.")
                            }
                            None => println!("The mouse from hole {hole} is stuck in the house forever."),
                        }
                    }
                    _ => println!("Unknown command {number:?}"),
                },
                _ => println!("Unknown command {line:?}"),
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use mouse_maze::GameMode;

    env_logger::init();
    log::info!("Mouse Maze (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = terminal::settings_from_args(&args).and_then(|settings| {
        log::info!("Settings: {:?}", settings);
        match settings.mode {
            GameMode::Intro => terminal::run_quiz(&settings),
            GameMode::Inference => terminal::run_inference(&settings),
        }
    });

    if let Err(e) = result {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is mouse_maze::web::init, this is just to satisfy the compiler
}
