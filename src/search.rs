//! Fixed-depth minimax search with a parallel root.
//!
//! The search explores every legal move down to a fixed depth and scores the
//! leaves with [`heuristic::score`]. Final positions get sentinel scores:
//! `+inf` for a win of the searching side, `-inf` for a loss and `0` for a
//! draw. A cancelled search yields `NaN` and no move.
//!
//! Only the root is parallel. Its columns are split into contiguous ranges,
//! each range is searched on its own copy of the board on the rayon pool, and
//! the range results are reduced with the same rule used inside a node. Below
//! the root every worker recurses sequentially, applying and undoing moves on
//! its private board.
//!
//! ## Score ordering
//!
//! A candidate replaces the current best when it is a real number (infinities
//! included) and is `>=` the best when maximizing or `<=` when minimizing.
//! `NaN` never replaces anything, and any real score replaces a `NaN` best.
//! Ties go to the candidate enumerated later, so the choice among equal
//! moves is reproducible.

use std::ops::Range;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::board::{Board, FutureMove, PColor, PShape, Winner};
use crate::cancel::CancellationToken;
use crate::constants::ROOT_PARTITIONS;
use crate::heuristic;

/// A move together with its minimax value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub mv: FutureMove,
    pub score: f32,
}

impl SearchResult {
    pub fn new(mv: FutureMove, score: f32) -> Self {
        Self { mv, score }
    }

    /// Result of a search that observed cancellation.
    pub fn cancelled() -> Self {
        Self::new(FutureMove::NO_MOVE, f32::NAN)
    }

    /// Result of a node that is not expanded.
    pub fn leaf(score: f32) -> Self {
        Self::new(FutureMove::NO_MOVE, score)
    }

    pub fn is_cancelled(&self) -> bool {
        self.score.is_nan()
    }
}

/// Whether `candidate` should replace `best` under the score ordering
/// described in the module docs.
#[inline]
pub fn improves(candidate: f32, best: f32, maximizing: bool) -> bool {
    if candidate.is_nan() {
        return false;
    }
    if best.is_nan() {
        return true;
    }
    if maximizing {
        candidate >= best
    } else {
        candidate <= best
    }
}

/// Split `[0, cols)` into `parts` contiguous ranges.
///
/// Range `i` is `i * cols / parts .. (i + 1) * cols / parts`, so the ranges
/// never overlap and always cover every column, whatever the remainder.
/// Some ranges are empty when `cols < parts`.
pub fn partition_columns(cols: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    (0..parts)
        .map(|i| i * cols / parts..(i + 1) * cols / parts)
        .collect()
}

/// Initial best-so-far for a node: anything real beats it.
fn worst_result(maximizing: bool) -> SearchResult {
    let score = if maximizing {
        f32::NEG_INFINITY
    } else {
        f32::INFINITY
    };
    SearchResult::leaf(score)
}

/// Fold per-range results in range order.
///
/// Ranges that found no move never displace one that did; among ranges that
/// found a move the node's ordering applies, later ranges winning ties. The
/// outcome is the same as scanning all columns in one pass.
fn reduce(results: Vec<SearchResult>, maximizing: bool) -> SearchResult {
    results
        .into_iter()
        .fold(worst_result(maximizing), |best, r| {
            if r.mv.is_no_move() {
                // Empty ranges only matter for carrying cancellation upward
                if best.mv.is_no_move() && r.is_cancelled() {
                    r
                } else {
                    best
                }
            } else if best.mv.is_no_move() || improves(r.score, best.score, maximizing) {
                r
            } else {
                best
            }
        })
}

/// Fixed-depth minimax searcher.
#[derive(Debug, Clone)]
pub struct Searcher {
    max_depth: usize,
    partitions: usize,
}

impl Searcher {
    /// Create a searcher that looks `max_depth` plies ahead (at least one).
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
            partitions: ROOT_PARTITIONS,
        }
    }

    /// Use `partitions` root column ranges instead of the default.
    pub fn with_partitions(mut self, partitions: usize) -> Self {
        self.partitions = partitions.max(1);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    /// Find the best move for the side to move on `board`.
    ///
    /// The caller's board is never modified.
    pub fn search(&self, board: &Board, ct: &CancellationToken) -> SearchResult {
        let player = board.turn();
        let mut root = board.clone();
        let result = self.minimax(&mut root, ct, player, player, 0);
        debug!(
            depth = self.max_depth,
            partitions = self.partitions,
            mv = %result.mv,
            score = result.score,
            "search finished"
        );
        result
    }

    /// Minimax value of `board` for `player`, with `turn` to move.
    ///
    /// At depth 0 the columns are searched in parallel; deeper calls run on
    /// the calling thread. Every move applied to `board` is undone before
    /// returning.
    pub fn minimax(
        &self,
        board: &mut Board,
        ct: &CancellationToken,
        player: PColor,
        turn: PColor,
        depth: usize,
    ) -> SearchResult {
        if let Some(leaf) = self.classify(board, ct, player, depth) {
            return leaf;
        }
        if depth == 0 {
            self.search_root(board, ct, player, turn)
        } else {
            let cols = 0..board.cols();
            self.search_range(board, cols, ct, player, turn, depth)
        }
    }

    /// Score nodes that are not expanded: cancelled, final, or at the depth
    /// limit, checked in that order.
    fn classify(
        &self,
        board: &Board,
        ct: &CancellationToken,
        player: PColor,
        depth: usize,
    ) -> Option<SearchResult> {
        if ct.is_cancelled() {
            return Some(SearchResult::cancelled());
        }
        match board.check_winner() {
            Winner::None => {}
            Winner::Draw => return Some(SearchResult::leaf(0.0)),
            winner => {
                let score = if winner.to_color() == Some(player) {
                    f32::INFINITY
                } else {
                    f32::NEG_INFINITY
                };
                return Some(SearchResult::leaf(score));
            }
        }
        if depth == self.max_depth {
            return Some(SearchResult::leaf(heuristic::score(board, player)));
        }
        None
    }

    /// Search each column range on its own board copy and reduce the results.
    fn search_root(
        &self,
        board: &Board,
        ct: &CancellationToken,
        player: PColor,
        turn: PColor,
    ) -> SearchResult {
        let ranges = partition_columns(board.cols(), self.partitions);
        let results: Vec<SearchResult> = ranges
            .into_par_iter()
            .map(|cols| {
                let mut local = board.clone();
                let result = self.search_range(&mut local, cols.clone(), ct, player, turn, 0);
                trace!(?cols, mv = %result.mv, score = result.score, "range searched");
                result
            })
            .collect();
        reduce(results, turn == player)
    }

    /// Best move among the columns in `cols`, recursing into
    /// [`minimax`](Self::minimax) for every candidate.
    ///
    /// # Panics
    ///
    /// Panics if `cols` reaches past the last column of `board`.
    fn search_range(
        &self,
        board: &mut Board,
        cols: Range<usize>,
        ct: &CancellationToken,
        player: PColor,
        turn: PColor,
        depth: usize,
    ) -> SearchResult {
        if ct.is_cancelled() {
            return SearchResult::cancelled();
        }
        assert!(
            cols.start <= cols.end && cols.end <= board.cols(),
            "column range {cols:?} outside board with {} columns",
            board.cols()
        );

        let maximizing = turn == player;
        let mut best = worst_result(maximizing);
        let mut saw_cancel = false;

        for col in cols {
            if board.is_column_full(col) {
                continue;
            }
            for shape in PShape::ALL {
                if board.piece_count(turn, shape) == 0 {
                    continue;
                }
                if board.do_move(shape, col).is_err() {
                    continue;
                }
                let eval = self.minimax(board, ct, player, turn.other(), depth + 1).score;
                let undone = board.undo_move();
                debug_assert!(undone.is_ok());

                if eval.is_nan() {
                    saw_cancel = true;
                } else if improves(eval, best.score, maximizing) {
                    best = SearchResult::new(FutureMove::new(col, shape), eval);
                }
            }
        }

        if saw_cancel && best.mv.is_no_move() {
            return SearchResult::cancelled();
        }
        best
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(1)
    }
}
