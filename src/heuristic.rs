//! Static evaluation of non-final positions.
//!
//! Pieces near the center of the board are worth more than pieces near the
//! edges. Each piece is scored twice: once for its color and once for its
//! shape, each counting for or against the evaluating side.

use crate::board::{Board, PColor};

#[inline]
fn dist(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}

/// Score `board` from the perspective of `color`.
///
/// The center is `(rows / 2, cols / 2)` with integer division. A piece at
/// distance `d` from the center is worth `max_points - d`, where
/// `max_points` is the distance from the center to cell `(0, 0)`. That value
/// is added if the piece is `color`'s and subtracted otherwise, then added
/// again if the piece has `color`'s shape and subtracted otherwise.
pub fn score(board: &Board, color: PColor) -> f32 {
    let center_row = (board.rows() / 2) as f32;
    let center_col = (board.cols() / 2) as f32;
    let max_points = dist(center_row, center_col, 0.0, 0.0);
    let own_shape = color.shape();

    let mut h = 0.0;
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            let Some(piece) = board.get(row, col) else {
                continue;
            };
            let value = max_points - dist(center_row, center_col, row as f32, col as f32);

            if piece.color == color {
                h += value;
            } else {
                h -= value;
            }
            if piece.shape == own_shape {
                h += value;
            } else {
                h -= value;
            }
        }
    }
    h
}
