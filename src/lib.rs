//! Shapelinks: a parallel minimax thinker for ColorShapeLinks.
//!
//! ColorShapeLinks is Connect Four with a twist: every piece has a color and
//! a shape, and a player wins by lining up either pieces of their own color
//! or pieces of their own shape (shape lines take priority). This crate
//! provides the board rules and a fixed-depth minimax thinker whose root move
//! is searched in parallel across column ranges.
//!
//! ## Modules
//!
//! - [`constants`] - Board defaults and search parameters
//! - [`board`] - Board state, move execution and win detection
//! - [`cancel`] - Cooperative cancellation token
//! - [`heuristic`] - Center-distance evaluation of positions
//! - [`search`] - Minimax search with a parallel root
//! - [`thinker`] - The thinker interface and its implementations
//! - [`protocol`] - Text protocol driver with a per-move time limit
//!
//! ## Example
//!
//! ```
//! use shapelinks::board::{Board, PShape};
//! use shapelinks::cancel::CancellationToken;
//! use shapelinks::thinker::{MinimaxThinker, Thinker};
//!
//! let mut board = Board::new();
//! board.do_move(PShape::Round, 3).unwrap();
//!
//! let mut thinker = MinimaxThinker::default();
//! thinker.setup("2");
//! let mv = thinker.think(&board, &CancellationToken::new());
//! println!("{} plays {mv}", thinker.name());
//! ```

pub mod board;
pub mod cancel;
pub mod constants;
pub mod heuristic;
pub mod protocol;
pub mod search;
pub mod thinker;
