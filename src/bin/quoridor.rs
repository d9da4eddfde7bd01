//! Terminal front end for the Quoridor engine.
//!
//! `selfplay` lets two computer players play each other and prints the board
//! after every move. `play` reads moves from stdin.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quoridor_rs::config::{load_config, GameConfig, PlayerKind};
use quoridor_rs::{ComputerTurns, Coord, Direction, GameEngine};

#[derive(Parser, Debug)]
#[command(name = "quoridor", about = "Play Quoridor against the minimax engine", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Two computer players play a full game
    Selfplay {
        /// YAML game config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Stop after this many moves without a winner
        #[arg(long, default_value_t = 200)]
        max_turns: usize,

        /// Override the search depth from the config
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Interactive game on stdin
    Play {
        /// YAML game config
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// One line of interactive input.
#[derive(Debug, PartialEq)]
enum Input {
    Pawn(Direction),
    Wall(Coord, Coord),
    Undo,
    Redo,
    Quit,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    match args.command {
        Command::Selfplay {
            config,
            max_turns,
            depth,
        } => run_selfplay(config.as_deref(), max_turns, depth),
        Command::Play { config } => run_play(config.as_deref()),
    }
}

fn load(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(GameConfig::default()),
    }
}

fn run_selfplay(config_path: Option<&Path>, max_turns: usize, depth: Option<u32>) -> Result<()> {
    let mut config = load(config_path)?;
    if let Some(depth) = depth {
        config.search.depth = depth;
    }
    // Humans are replaced by the search; random players stay random
    for kind in [&mut config.players.player1, &mut config.players.player2] {
        if *kind == PlayerKind::Human {
            *kind = PlayerKind::Computer;
        }
    }

    let mut engine = GameEngine::from_config(&config)
        .context("Failed to create game")?
        .with_computer_turns(ComputerTurns::Deferred);
    info!(
        board_size = config.quoridor.board_size,
        walls = config.quoridor.walls_per_player,
        depth = config.search.depth,
        "Starting self-play"
    );
    println!("{}", engine.board());

    for turn in 1..=max_turns {
        let Some(player) = engine.current_player() else {
            break;
        };
        let mv = engine.play_computer_turn()?;
        println!("Turn {}: player {} plays {}", turn, player, mv);
        println!("{}", engine.board());

        if let Some(winner) = engine.winner() {
            println!("Player {} wins after {} turns", winner, turn);
            return Ok(());
        }
    }

    println!("No winner after {} turns", max_turns);
    Ok(())
}

fn run_play(config_path: Option<&Path>) -> Result<()> {
    let config = load(config_path)?;
    let mut engine = GameEngine::from_config(&config).context("Failed to create game")?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        // Computer players open the game, or play on when no human is involved
        while let Some(player) = engine.current_player() {
            if engine.controller(player).is_human() {
                break;
            }
            let mv = engine.play_computer_turn()?;
            println!("Player {} plays {}", player, mv);
        }

        println!("{}", engine.board());
        let Some(player) = engine.current_player() else {
            if let Some(winner) = engine.winner() {
                println!("Player {} wins!", winner);
            }
            return Ok(());
        };

        print!("Player {} > ", player);
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        let outcome = match input {
            Input::Quit => return Ok(()),
            Input::Pawn(direction) => engine.request_pawn_move(direction).map(|_| ()),
            Input::Wall(anchor, end) => engine.request_wall_between(anchor, end).map(|_| ()),
            Input::Undo => engine.undo().map(|done| {
                if !done {
                    println!("Nothing to undo");
                }
            }),
            Input::Redo => engine.redo().map(|done| {
                if !done {
                    println!("Nothing to redo");
                }
            }),
        };
        if let Err(err) = outcome {
            println!("{}", err);
        }
    }
}

/// Parse a direction token, `wall r1 c1 r2 c2`, `undo`, `redo` or `quit`.
fn parse_input(line: &str) -> Result<Input> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["undo"] => Ok(Input::Undo),
        ["redo"] => Ok(Input::Redo),
        ["quit"] | ["q"] => Ok(Input::Quit),
        ["wall", rest @ ..] => {
            ensure!(rest.len() == 4, "usage: wall <row1> <col1> <row2> <col2>");
            let mut values = [0usize; 4];
            for (value, token) in values.iter_mut().zip(rest) {
                *value = token
                    .parse()
                    .with_context(|| format!("invalid grid coordinate: {}", token))?;
            }
            Ok(Input::Wall((values[0], values[1]), (values[2], values[3])))
        }
        [token] => Ok(Input::Pawn(token.parse()?)),
        _ => bail!("unrecognised command: {}", line.trim()),
    }
}
