//! Line-oriented match protocol.
//!
//! A small text protocol in the style of GTP, so a referee or a GUI can run
//! a thinker turn by turn. Each command is one line, optionally prefixed by
//! a numeric id. Responses start with `=` on success or `?` on failure,
//! followed by the id (if any) and the payload, and end with a blank line.
//!
//! ## Supported Commands
//!
//! - `name` - Return the thinker's name (includes the search depth)
//! - `version` - Return the crate version
//! - `protocol_version` - Return the protocol version (1)
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the loop
//! - `setup <params>` - Reconfigure the thinker (search depth)
//! - `time_limit <ms>` - Set the thinking time per move
//! - `clear_board` - Reset to the starting position
//! - `play <column> <round|square>` - Play a move for the side to move
//! - `undo` - Take back the last move
//! - `genmove` - Think, play and return a move for the side to move
//! - `showboard` - Print the board
//! - `winner` - Report `none`, `white`, `red` or `draw`
//!
//! `genmove` runs the thinker on a separate thread. When the time limit
//! expires the shared cancellation token is signalled and whatever move the
//! thinker settles on is played.

use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::board::{Board, FutureMove, PShape, Winner};
use crate::cancel::CancellationToken;
use crate::constants::DEFAULT_TIME_LIMIT_MS;
use crate::thinker::{MinimaxThinker, Thinker};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "clear_board",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "setup",
    "showboard",
    "time_limit",
    "undo",
    "version",
    "winner",
];

/// Protocol engine state.
pub struct ProtocolEngine {
    /// Current game position
    board: Board,
    /// Position restored by `clear_board`
    initial: Board,
    thinker: Box<dyn Thinker>,
    /// Thinking time per `genmove`
    time_limit: Duration,
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new(Box::new(MinimaxThinker::default()))
    }
}

impl ProtocolEngine {
    /// Create an engine on the standard board with the default time limit.
    pub fn new(thinker: Box<dyn Thinker>) -> Self {
        Self::with_board(thinker, Board::new())
    }

    /// Create an engine starting from `board`.
    pub fn with_board(thinker: Box<dyn Thinker>, board: Board) -> Self {
        Self {
            initial: board.clone(),
            board,
            thinker,
            time_limit: Duration::from_millis(DEFAULT_TIME_LIMIT_MS),
        }
    }

    pub fn set_time_limit(&mut self, limit: Duration) {
        self.time_limit = limit;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the command loop on stdin and stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        info!(thinker = %self.thinker.name(), "protocol loop started");

        for line in input.lines() {
            let line = line.context("failed to read command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n").context("failed to write response")?;
            output.flush().context("failed to flush response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0
            && let Ok(id) = trimmed[..end].parse::<u32>()
        {
            return (Some(id), trimmed[end..].trim());
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, self.thinker.name()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "setup" => {
                self.thinker.setup(&args.join(" "));
                (true, self.thinker.name())
            }

            "time_limit" => match args.first().map(|a| a.parse::<u64>()) {
                Some(Ok(ms)) if ms > 0 => {
                    self.time_limit = Duration::from_millis(ms);
                    (true, String::new())
                }
                Some(_) => (false, "invalid time limit".to_string()),
                None => (false, "missing argument".to_string()),
            },

            "clear_board" => {
                self.board = self.initial.clone();
                (true, String::new())
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                if self.board.check_winner() != Winner::None {
                    return (false, "game is over".to_string());
                }
                let Ok(col) = args[0].parse::<usize>() else {
                    return (false, "invalid column".to_string());
                };
                let shape = match args[1].parse::<PShape>() {
                    Ok(shape) => shape,
                    Err(e) => return (false, e),
                };
                match self.board.do_move(shape, col) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "undo" => match self.board.undo_move() {
                Ok(mv) => (true, mv.to_string()),
                Err(e) => (false, e.to_string()),
            },

            "genmove" => {
                if self.board.check_winner() != Winner::None {
                    return (false, "game is over".to_string());
                }
                let mv = self.timed_think();
                if mv.is_no_move() {
                    return (false, "no move".to_string());
                }
                match self.board.do_move(mv.shape, mv.column) {
                    Ok(()) => (true, mv.to_string()),
                    Err(e) => (false, format!("thinker chose {mv}: {e}")),
                }
            }

            "showboard" => (true, format!("\n{}", self.board.to_string().trim_end())),

            "winner" => {
                let winner = match self.board.check_winner() {
                    Winner::None => "none",
                    Winner::White => "white",
                    Winner::Red => "red",
                    Winner::Draw => "draw",
                };
                (true, winner.to_string())
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }

    /// Ask the thinker for a move, cancelling it once the time limit is up.
    fn timed_think(&self) -> FutureMove {
        let ct = CancellationToken::new();
        let (tx, rx) = mpsc::channel();
        let thinker = self.thinker.as_ref();
        let board = &self.board;
        let token = &ct;

        thread::scope(|s| {
            s.spawn(move || {
                // Receiver outlives the scope, so the send cannot fail
                let _ = tx.send(thinker.think(board, token));
            });
            match rx.recv_timeout(self.time_limit) {
                Ok(mv) => mv,
                Err(_) => {
                    warn!(limit_ms = self.time_limit.as_millis() as u64, "time limit reached, cancelling search");
                    ct.cancel();
                    rx.recv().unwrap_or(FutureMove::NO_MOVE)
                }
            }
        })
    }
}
