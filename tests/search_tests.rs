//! Integration tests for the minimax thinker.
//!
//! Positions are built by playing moves from the empty board, alternating
//! White and Red, so every position is reachable in a real game.

use shapelinks::board::{Board, FutureMove, PColor, PShape, Winner};
use shapelinks::cancel::CancellationToken;
use shapelinks::search::{SearchResult, Searcher};
use shapelinks::thinker::{MinimaxThinker, Thinker};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Play `(column, shape)` moves on `board`, alternating sides.
fn play(board: &mut Board, moves: &[(usize, PShape)]) {
    for &(col, shape) in moves {
        if let Err(e) = board.do_move(shape, col) {
            panic!("Illegal move {col} {shape} in setup: {e}");
        }
    }
}

fn setup(moves: &[(usize, PShape)]) -> Board {
    let mut board = Board::new();
    play(&mut board, moves);
    board
}

/// Red to move, squares on row 0 in columns 3..=5 and a round piece in
/// column 2. The only winning move is a square in column 6.
fn red_one_move_from_win() -> Board {
    let board = setup(&[
        (3, PShape::Square),
        (4, PShape::Square),
        (5, PShape::Square),
        (2, PShape::Round),
        (0, PShape::Round),
    ]);
    assert_eq!(board.turn(), PColor::Red);
    assert_eq!(board.check_winner(), Winner::None);
    board
}

/// Play `n` random legal moves, stopping early if the game ends.
fn random_position(seed: u64, n: usize) -> Board {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut board = Board::new();
    for _ in 0..n {
        if board.check_winner() != Winner::None {
            break;
        }
        let moves = board.legal_moves();
        let mv = moves[rng.usize(..moves.len())];
        board.do_move(mv.shape, mv.column).unwrap();
    }
    board
}

fn thinker(depth: &str) -> MinimaxThinker {
    let mut thinker = MinimaxThinker::default();
    thinker.setup(depth);
    thinker
}

// =============================================================================
// Move choice
// =============================================================================

#[test]
fn test_empty_board_prefers_center() {
    let board = Board::new();
    let result = Searcher::new(1).search(&board, &CancellationToken::new());
    assert_eq!(result.mv, FutureMove::new(3, PShape::Round));

    // Center column strictly beats both edges
    let eval = |col: usize| {
        let mut b = board.clone();
        b.do_move(PShape::Round, col).unwrap();
        shapelinks::heuristic::score(&b, PColor::White)
    };
    assert!(eval(3) > eval(0));
    assert!(eval(3) > eval(6));
}

#[test]
fn test_finds_winning_move_at_every_depth() {
    let board = red_one_move_from_win();
    for depth in 1..=3 {
        let result = Searcher::new(depth).search(&board, &CancellationToken::new());
        assert_eq!(result.mv, FutureMove::new(6, PShape::Square), "depth {depth}");
        assert_eq!(result.score, f32::INFINITY, "depth {depth}");
    }
}

#[test]
fn test_winning_move_in_remainder_columns() {
    // 9 columns do not split evenly into 7 ranges; the win is in the last one
    let mut board = Board::with_config(4, 9, 4, 11, 10);
    play(&mut board, &[(5, PShape::Square), (6, PShape::Square), (7, PShape::Square)]);
    assert_eq!(board.turn(), PColor::Red);

    let result = Searcher::new(1).search(&board, &CancellationToken::new());
    assert_eq!(result.mv, FutureMove::new(8, PShape::Square));
    assert_eq!(result.score, f32::INFINITY);
}

#[test]
fn test_blocks_opponent_win() {
    // Row 0: . . w R W R .
    // White to move; Red threatens a square in column 6. White must fill
    // column 6 with a round piece (a white square would complete Red's line).
    let board = setup(&[
        (2, PShape::Round),
        (3, PShape::Square),
        (4, PShape::Square),
        (5, PShape::Square),
    ]);
    assert_eq!(board.turn(), PColor::White);
    assert_eq!(board.check_winner(), Winner::None);

    let result = Searcher::new(2).search(&board, &CancellationToken::new());
    assert_eq!(result.mv, FutureMove::new(6, PShape::Round));
    assert!(result.score.is_finite());
}

// =============================================================================
// Final positions
// =============================================================================

#[test]
fn test_won_position_scores_infinity_for_winner() {
    // White completes a column of squares, which is a square line for Red.
    let mut board = setup(&[
        (0, PShape::Square),
        (5, PShape::Round),
        (0, PShape::Square),
        (6, PShape::Round),
        (0, PShape::Square),
        (5, PShape::Round),
        (0, PShape::Square),
    ]);
    assert_eq!(board.check_winner(), Winner::Red);

    let searcher = Searcher::new(3);
    let ct = CancellationToken::new();
    let red = searcher.search(&board, &ct);
    assert!(red.mv.is_no_move());
    assert_eq!(red.score, f32::INFINITY);

    let white = searcher.minimax(&mut board, &ct, PColor::White, PColor::Red, 1);
    assert_eq!(white.score, f32::NEG_INFINITY);
}

#[test]
fn test_draw_leaf_scores_zero_and_terminates() {
    // Tiny board that fills up before anyone can line up three
    let mut board = Board::with_config(1, 2, 3, 1, 1);
    board.do_move(PShape::Round, 0).unwrap();

    let result = Searcher::new(5).search(&board, &CancellationToken::new());
    assert_eq!(result, SearchResult::new(FutureMove::new(1, PShape::Square), 0.0));

    board.do_move(PShape::Square, 1).unwrap();
    let result = Searcher::new(5).search(&board, &CancellationToken::new());
    assert_eq!(result, SearchResult::leaf(0.0));
}

// =============================================================================
// Cancellation and board integrity
// =============================================================================

#[test]
fn test_pre_cancelled_search_returns_no_move() {
    let board = random_position(3, 6);
    let before = board.clone();
    let ct = CancellationToken::new();
    ct.cancel();

    let result = Searcher::new(4).search(&board, &ct);
    assert!(result.mv.is_no_move());
    assert!(result.score.is_nan());
    assert!(thinker("4").think(&board, &ct).is_no_move());
    assert_eq!(board, before);
}

#[test]
fn test_minimax_leaves_board_unchanged() {
    let searcher = Searcher::new(3);
    let ct = CancellationToken::new();
    for seed in 0..5 {
        let mut board = random_position(seed, 8);
        let before = board.clone();
        let player = board.turn();
        searcher.minimax(&mut board, &ct, player, player, 0);
        assert_eq!(board, before);
        // Sequential levels push and undo on the same board
        searcher.minimax(&mut board, &ct, player, player, 1);
        assert_eq!(board, before);
    }
}

#[test]
fn test_cancel_during_search() {
    let board = Board::new();
    let ct = CancellationToken::new();
    let searcher = Searcher::new(8);

    let result = std::thread::scope(|s| {
        let handle = s.spawn(|| searcher.search(&board, &ct));
        std::thread::sleep(std::time::Duration::from_millis(50));
        ct.cancel();
        handle.join().unwrap()
    });
    // Whatever came back must be either a legal move or the cancelled marker
    if result.mv.is_no_move() {
        assert!(result.is_cancelled());
    } else {
        assert!(board.legal_moves().contains(&result.mv));
    }
    assert_eq!(board, Board::new());
}

// =============================================================================
// Determinism and parallel equivalence
// =============================================================================

#[test]
fn test_think_is_deterministic() {
    let thinker = thinker("3");
    let ct = CancellationToken::new();
    for seed in 10..14 {
        let board = random_position(seed, 10);
        if board.check_winner() != Winner::None {
            continue;
        }
        let first = thinker.think(&board, &ct);
        let second = thinker.think(&board, &ct);
        assert_eq!(first, second, "seed {seed}");
    }
}

#[test]
fn test_partitioned_root_matches_single_scan() {
    let ct = CancellationToken::new();
    for seed in 20..30 {
        let board = random_position(seed, (seed % 12) as usize);
        for depth in 1..=2 {
            let parallel = Searcher::new(depth).search(&board, &ct);
            let single = Searcher::new(depth).with_partitions(1).search(&board, &ct);
            let many = Searcher::new(depth).with_partitions(16).search(&board, &ct);
            assert_eq!(parallel.mv, single.mv, "seed {seed} depth {depth}");
            assert_eq!(parallel.score.to_bits(), single.score.to_bits());
            assert_eq!(many.mv, single.mv, "seed {seed} depth {depth}");
        }
    }
}
