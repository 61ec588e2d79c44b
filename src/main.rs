//! Shapelinks: a parallel minimax thinker for ColorShapeLinks.
//!
//! ## Usage
//!
//! - `shapelinks` - Play a demo game against a random opponent
//! - `shapelinks protocol` - Start the text protocol on stdin/stdout
//! - `shapelinks demo --depth 3` - Demo with a deeper search
//!
//! Set `RUST_LOG=debug` to see search diagnostics on stderr.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shapelinks::board::{Board, PColor, Winner};
use shapelinks::cancel::CancellationToken;
use shapelinks::constants::DEFAULT_TIME_LIMIT_MS;
use shapelinks::protocol::ProtocolEngine;
use shapelinks::thinker::{MinimaxThinker, RandomThinker, Thinker};

/// Shapelinks: parallel minimax for ColorShapeLinks
#[derive(Parser)]
#[command(name = "shapelinks")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the line-oriented match protocol for referees and GUIs
    Protocol {
        /// Maximum search depth (falls back to 1 when invalid)
        #[arg(long, default_value = "1")]
        depth: String,
        /// Thinking time per move in milliseconds
        #[arg(long, default_value_t = DEFAULT_TIME_LIMIT_MS)]
        time_limit_ms: u64,
    },
    /// Play one game of the minimax thinker against a random opponent
    Demo {
        /// Maximum search depth (falls back to 1 when invalid)
        #[arg(long, default_value = "2")]
        depth: String,
        /// Seed for the random opponent
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Protocol {
            depth,
            time_limit_ms,
        }) => {
            let mut thinker = MinimaxThinker::default();
            thinker.setup(&depth);
            let mut engine = ProtocolEngine::new(Box::new(thinker));
            engine.set_time_limit(Duration::from_millis(time_limit_ms));
            engine.run().context("protocol loop failed")
        }
        Some(Commands::Demo { depth, seed }) => run_demo(&depth, seed),
        None => run_demo("2", None),
    }
}

fn run_demo(depth: &str, seed: Option<u64>) -> Result<()> {
    let mut minimax = MinimaxThinker::default();
    minimax.setup(depth);
    let random = match seed {
        Some(seed) => RandomThinker::with_seed(seed),
        None => RandomThinker::new(),
    };

    println!("{} (white) vs {} (red)\n", minimax.name(), random.name());

    let mut board = Board::new();
    let ct = CancellationToken::new();

    while board.check_winner() == Winner::None {
        let turn = board.turn();
        let mv = match turn {
            PColor::White => minimax.think(&board, &ct),
            PColor::Red => random.think(&board, &ct),
        };
        if mv.is_no_move() {
            println!("{turn} found no move");
            break;
        }
        board
            .do_move(mv.shape, mv.column)
            .with_context(|| format!("{turn} chose an illegal move: {mv}"))?;
        info!(%turn, %mv, "move played");
        println!("{turn} plays {mv}\n{board}");
    }

    match board.check_winner() {
        Winner::Draw => println!("Game drawn after {} moves", board.move_count()),
        Winner::None => println!("Game stopped after {} moves", board.move_count()),
        winner => {
            if let Some(color) = winner.to_color() {
                println!("{color} wins after {} moves", board.move_count());
            }
        }
    }
    Ok(())
}
