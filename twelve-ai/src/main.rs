//! Twelve Janggi on the terminal.
//!
//! `play` runs a human against the agent (or another human), `selfplay` pits
//! two agents against each other, `bench` times the agent per difficulty.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use twelve_ai::{search, Agent, Difficulty, GameStats, SavedSession, Session};
use twelve_core::{Action, GameState, Player, Pos, Position};

#[derive(Parser)]
#[command(name = "twelve")]
#[command(about = "Twelve Janggi with a minimax opponent", long_about = None)]
struct Cli {
    /// Agent strength
    #[arg(short, long, global = true, value_enum, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play on the terminal
    Play {
        /// Which side the agent plays
        #[arg(long, value_enum, default_value_t = Side::Two)]
        ai_side: Side,

        /// Pause before each agent move, in milliseconds
        #[arg(long, default_value_t = 500)]
        ai_delay_ms: u64,
    },
    /// Agent against agent
    Selfplay {
        #[arg(short, long, default_value_t = 10)]
        games: u32,

        /// Player 1 difficulty (defaults to --difficulty)
        #[arg(long, value_enum)]
        p1: Option<Difficulty>,

        /// Player 2 difficulty (defaults to --difficulty)
        #[arg(long, value_enum)]
        p2: Option<Difficulty>,

        /// Plies before a game is abandoned
        #[arg(long, default_value_t = 200)]
        max_plies: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Average time per agent decision for each difficulty
    Bench {
        #[arg(short, long, default_value_t = 10)]
        iterations: u32,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum Side {
    One,
    Two,
    /// Human against human
    None,
}

impl Side {
    fn player(self) -> Option<Player> {
        match self {
            Side::One => Some(Player::One),
            Side::Two => Some(Player::Two),
            Side::None => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Play {
            ai_side,
            ai_delay_ms,
        } => play(cli.difficulty, ai_side.player(), Duration::from_millis(ai_delay_ms)),
        Command::Selfplay {
            games,
            p1,
            p2,
            max_plies,
            seed,
        } => selfplay(
            p1.unwrap_or(cli.difficulty),
            p2.unwrap_or(cli.difficulty),
            games,
            max_plies,
            seed,
        ),
        Command::Bench { iterations } => bench(iterations),
    }
}

// ========== Play ==========

const HELP: &str = "\
commands:
  m FROM TO     move the piece on cell FROM to cell TO (cells 0-11, row 0 on top)
  d INDEX CELL  drop reserve piece INDEX onto CELL
  u             undo (back to your turn against the agent)
  r             restart
  level LEVEL   set difficulty: easy, medium or hard
  save | load   keep or restore an in-memory snapshot
  h             help
  q             quit";

enum Input {
    Action(Action),
    Undo,
    Restart,
    Level(Difficulty),
    Save,
    Load,
    Help,
    Quit,
}

fn parse_cell(token: Option<&str>) -> Result<Pos> {
    let token = token.context("missing cell")?;
    let index: u8 = token.parse().with_context(|| format!("bad cell {token:?}"))?;
    Ok(Pos::new(index)?)
}

fn parse_input(line: &str) -> Result<Input> {
    let mut tokens = line.split_whitespace();
    let Some(command) = tokens.next() else {
        bail!("empty command");
    };
    let input = match command {
        "m" => Input::Action(Action::Move {
            from: parse_cell(tokens.next())?,
            to: parse_cell(tokens.next())?,
        }),
        "d" => {
            let token = tokens.next().context("missing reserve index")?;
            let index = token
                .parse()
                .with_context(|| format!("bad reserve index {token:?}"))?;
            Input::Action(Action::Drop {
                index,
                to: parse_cell(tokens.next())?,
            })
        }
        "u" => Input::Undo,
        "r" => Input::Restart,
        "level" => {
            let level = tokens.next().context("missing difficulty")?;
            Input::Level(level.parse()?)
        }
        "save" => Input::Save,
        "load" => Input::Load,
        "h" | "help" => Input::Help,
        "q" | "quit" => Input::Quit,
        other => bail!("unknown command {other:?} (h for help)"),
    };
    Ok(input)
}

fn show(game: &GameState) {
    println!("\n{}", game.position());
    if let Some(outcome) = game.check_win() {
        println!("{outcome}. r to restart, q to quit.");
    }
}

fn play(difficulty: Difficulty, ai_side: Option<Player>, delay: Duration) -> Result<()> {
    let mut session = Session::new(difficulty, ai_side);
    let mut rng = StdRng::from_os_rng();
    let mut saved: Option<SavedSession> = None;

    match ai_side {
        Some(side) => println!("Twelve Janggi: you against the agent ({difficulty}) playing {side}"),
        None => println!("Twelve Janggi: two players"),
    }
    println!("{HELP}");
    show(session.game());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        while session.is_ai_turn() {
            thread::sleep(delay);
            match session.advance(&mut rng) {
                Ok(action) => {
                    println!("\nagent plays {action}");
                    show(session.game());
                }
                Err(e) => {
                    warn!("{e}");
                    break;
                }
            }
        }

        print!("{}> ", session.game().side_to_move());
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(e) => {
                println!("{e:#}");
                continue;
            }
        };

        match input {
            Input::Action(action) => match session.play(action) {
                Ok(_) => show(session.game()),
                Err(e) => println!("{e}"),
            },
            Input::Undo => {
                let mut result = session.undo();
                // skip back over the agent's reply
                while result.is_ok() && session.is_ai_turn() && session.game().history_len() > 0 {
                    result = session.undo();
                }
                match result {
                    Ok(()) => show(session.game()),
                    Err(e) => println!("{e}"),
                }
            }
            Input::Restart => {
                session.restart();
                show(session.game());
            }
            Input::Level(level) => {
                session.set_difficulty(level);
                println!("difficulty: {level}");
            }
            Input::Save => {
                saved = Some(session.save());
                println!("saved");
            }
            Input::Load => match &saved {
                Some(snapshot) => {
                    session.load(snapshot.clone());
                    show(session.game());
                }
                None => println!("nothing saved"),
            },
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
        }
    }

    println!("\n{}", session.stats());
    Ok(())
}

// ========== Selfplay ==========

fn selfplay(p1: Difficulty, p2: Difficulty, games: u32, max_plies: usize, seed: u64) -> Result<()> {
    println!("Twelve Janggi selfplay");
    println!("======================");
    println!("Player 1: {p1}, Player 2: {p2}, games: {games}, ply cap: {max_plies}, seed: {seed}\n");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        println!("\nInterrupt received, stopping after the current game...");
        r.store(false, Ordering::SeqCst);
    })
    .context("setting Ctrl-C handler")?;

    let agents = [Agent::new(p1), Agent::new(p2)];
    let mut rng = StdRng::seed_from_u64(seed);
    let mut stats = GameStats::new();
    let start = Instant::now();

    for game_no in 1..=games {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let mut game = GameState::new();
        while !game.is_over() && game.history_len() < max_plies {
            let side = game.side_to_move();
            let Some(action) = agents[side.index()].select_action(game.position(), side, &mut rng)
            else {
                warn!(%side, "no legal action, abandoning game");
                break;
            };
            game.apply(action)?;
        }

        match game.check_win() {
            Some(outcome) => {
                stats.record(outcome);
                info!(game = game_no, plies = game.history_len(), %outcome, "game finished");
            }
            None => {
                stats.record_unfinished();
                info!(game = game_no, plies = game.history_len(), "game abandoned");
            }
        }
    }

    println!("\nTime: {:.2}s", start.elapsed().as_secs_f64());
    stats.print_summary();
    Ok(())
}

// ========== Bench ==========

fn bench(iterations: u32) -> Result<()> {
    if iterations == 0 {
        bail!("need at least one iteration");
    }

    let position = Position::initial();
    let side = position.side_to_move();
    let mut rng = StdRng::seed_from_u64(0);

    println!("Agent benchmark from the initial position, {iterations} iterations\n");
    for difficulty in Difficulty::all() {
        let agent = Agent::new(difficulty);
        let start = Instant::now();
        for _ in 0..iterations {
            agent.select_action(&position, side, &mut rng);
        }
        let avg = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;

        let mut line = format!("{difficulty:>6}: {avg:.3} ms/move, depth {}", difficulty.depth());
        if difficulty != Difficulty::Easy {
            let stats = search(&position, side, difficulty.depth()).stats;
            line.push_str(&format!(", {stats}"));
        }
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        match parse_input("m 11 8").unwrap() {
            Input::Action(action) => assert_eq!(
                action,
                Action::Move {
                    from: Pos::new(11).unwrap(),
                    to: Pos::new(8).unwrap()
                }
            ),
            _ => panic!("expected a move"),
        }
        match parse_input("d 0 4").unwrap() {
            Input::Action(Action::Drop { index, to }) => {
                assert_eq!(index, 0);
                assert_eq!(to.index(), 4);
            }
            _ => panic!("expected a drop"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_input("m 11").is_err());
        assert!(parse_input("m 11 12").is_err());
        assert!(parse_input("d x 4").is_err());
        assert!(parse_input("level expert").is_err());
        assert!(parse_input("jump").is_err());
    }

    #[test]
    fn test_parse_commands() {
        assert!(matches!(parse_input("level hard").unwrap(), Input::Level(Difficulty::Hard)));
        assert!(matches!(parse_input(" q ").unwrap(), Input::Quit));
        assert!(matches!(parse_input("u").unwrap(), Input::Undo));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["twelve", "--difficulty", "hard", "selfplay", "--games", "3"])
            .unwrap();
        assert_eq!(cli.difficulty, Difficulty::Hard);
        assert!(matches!(cli.command, Command::Selfplay { games: 3, .. }));

        let cli = Cli::try_parse_from(["twelve", "play", "--ai-side", "none"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Play {
                ai_side: Side::None,
                ai_delay_ms: 500
            }
        ));
    }
}
