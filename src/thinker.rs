//! Thinkers: the objects a match driver asks for moves.
//!
//! A thinker is configured once with a parameter string and then asked for
//! one move per turn. The driver owns the clock and signals the end of the
//! thinking time through a [`CancellationToken`].

use std::fmt;

use tracing::{debug, warn};

use crate::board::{Board, FutureMove};
use crate::cancel::CancellationToken;
use crate::constants::DEFAULT_MAX_DEPTH;
use crate::search::Searcher;

/// Something that can pick a move for the side to move.
pub trait Thinker: Send + Sync {
    /// Configure the thinker from a free-form parameter string.
    /// Bad input must fall back to defaults rather than fail.
    fn setup(&mut self, params: &str);

    /// Choose a move. Returns [`FutureMove::NO_MOVE`] if cancelled before a
    /// move was found.
    fn think(&self, board: &Board, ct: &CancellationToken) -> FutureMove;

    /// Human-readable identifier for logs and match listings.
    fn name(&self) -> String;
}

/// Minimax thinker with a parallel root search.
///
/// The only parameter is the maximum search depth.
#[derive(Debug, Clone)]
pub struct MinimaxThinker {
    searcher: Searcher,
}

impl Default for MinimaxThinker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH as usize)
    }
}

impl MinimaxThinker {
    pub fn new(max_depth: usize) -> Self {
        Self {
            searcher: Searcher::new(max_depth),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.searcher.max_depth()
    }

    /// Parse a depth parameter, falling back to [`DEFAULT_MAX_DEPTH`] on
    /// anything that is not a positive integer.
    pub fn parse_depth(params: &str) -> usize {
        match params.trim().parse::<i32>() {
            Ok(depth) if depth >= 1 => depth as usize,
            Ok(depth) => {
                warn!(depth, "non-positive search depth, using default");
                DEFAULT_MAX_DEPTH as usize
            }
            Err(_) => {
                warn!(params, "unparseable search depth, using default");
                DEFAULT_MAX_DEPTH as usize
            }
        }
    }
}

impl Thinker for MinimaxThinker {
    fn setup(&mut self, params: &str) {
        let depth = Self::parse_depth(params);
        self.searcher = Searcher::new(depth).with_partitions(self.searcher.partitions());
    }

    fn think(&self, board: &Board, ct: &CancellationToken) -> FutureMove {
        self.searcher.search(board, ct).mv
    }

    fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MinimaxThinker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParallelMinimaxD{}", self.searcher.max_depth())
    }
}

/// Plays a uniformly random legal move. Used as a baseline opponent.
///
/// `setup` accepts an optional numeric seed.
#[derive(Debug, Clone, Default)]
pub struct RandomThinker {
    seed: Option<u64>,
}

impl RandomThinker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl Thinker for RandomThinker {
    fn setup(&mut self, params: &str) {
        self.seed = params.trim().parse::<u64>().ok();
    }

    fn think(&self, board: &Board, ct: &CancellationToken) -> FutureMove {
        if ct.is_cancelled() {
            return FutureMove::NO_MOVE;
        }
        let moves = board.legal_moves();
        if moves.is_empty() {
            return FutureMove::NO_MOVE;
        }
        // Mix the move number into the seed so a seeded game still varies
        let mut rng = match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed ^ board.move_count() as u64),
            None => fastrand::Rng::new(),
        };
        let mv = moves[rng.usize(..moves.len())];
        debug!(mv = %mv, "random move");
        mv
    }

    fn name(&self) -> String {
        "Random".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_parses_depth() {
        let mut thinker = MinimaxThinker::default();
        thinker.setup("3");
        assert_eq!(thinker.max_depth(), 3);
        thinker.setup(" 5 ");
        assert_eq!(thinker.max_depth(), 5);
    }

    #[test]
    fn test_setup_falls_back_to_default() {
        let mut thinker = MinimaxThinker::new(4);
        for bad in ["", "abc", "0", "-2", "2.5", "99999999999"] {
            thinker.setup(bad);
            assert_eq!(thinker.max_depth(), 1, "input {bad:?}");
        }
    }

    #[test]
    fn test_name_includes_depth() {
        let mut thinker = MinimaxThinker::default();
        assert_eq!(thinker.name(), "ParallelMinimaxD1");
        thinker.setup("4");
        assert_eq!(thinker.name(), "ParallelMinimaxD4");
    }

    #[test]
    fn test_random_plays_legal_moves() {
        let thinker = RandomThinker::with_seed(7);
        let mut board = Board::new();
        let ct = CancellationToken::new();
        for _ in 0..10 {
            let mv = thinker.think(&board, &ct);
            assert!(board.legal_moves().contains(&mv));
            board.do_move(mv.shape, mv.column).unwrap();
        }
    }

    #[test]
    fn test_random_respects_cancellation() {
        let thinker = RandomThinker::new();
        let ct = CancellationToken::new();
        ct.cancel();
        assert!(thinker.think(&Board::new(), &ct).is_no_move());
    }
}
