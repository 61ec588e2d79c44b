//! ColorShapeLinks board representation and rules.
//!
//! Pieces are dropped into columns and fall to the lowest free row, as in
//! Connect Four. Every piece also carries a shape, and each color owns one
//! shape: White plays for round sequences and Red for square sequences.
//! A line of pieces of the same shape wins for the shape's owner, a line of
//! pieces of the same color wins for that color, and shape lines beat color
//! lines when one move produces both.
//!
//! Row 0 is the bottom of the board.

use std::fmt;

use crate::constants::{
    DEFAULT_COLS, DEFAULT_ROUND_PIECES, DEFAULT_ROWS, DEFAULT_SQUARE_PIECES, DEFAULT_WIN_SEQUENCE,
};

/// Side (color) of a player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PColor {
    White,
    Red,
}

impl PColor {
    /// The opponent's color.
    #[inline]
    pub fn other(self) -> PColor {
        match self {
            PColor::White => PColor::Red,
            PColor::Red => PColor::White,
        }
    }

    /// The shape this color tries to line up.
    #[inline]
    pub fn shape(self) -> PShape {
        match self {
            PColor::White => PShape::Round,
            PColor::Red => PShape::Square,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PColor::White => write!(f, "white"),
            PColor::Red => write!(f, "red"),
        }
    }
}

/// Shape of a piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PShape {
    Round,
    Square,
}

impl PShape {
    /// All shapes, in move enumeration order.
    pub const ALL: [PShape; 2] = [PShape::Round, PShape::Square];

    /// The other shape.
    #[inline]
    pub fn other(self) -> PShape {
        match self {
            PShape::Round => PShape::Square,
            PShape::Square => PShape::Round,
        }
    }

    /// The color that wins with sequences of this shape.
    #[inline]
    pub fn color(self) -> PColor {
        match self {
            PShape::Round => PColor::White,
            PShape::Square => PColor::Red,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PShape::Round => write!(f, "round"),
            PShape::Square => write!(f, "square"),
        }
    }
}

impl std::str::FromStr for PShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "round" | "r" => Ok(PShape::Round),
            "square" | "s" => Ok(PShape::Square),
            other => Err(format!("unknown shape: {other}")),
        }
    }
}

/// A piece on the board: who owns it and what shape it has.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: PColor,
    pub shape: PShape,
}

impl Piece {
    pub fn new(color: PColor, shape: PShape) -> Self {
        Self { color, shape }
    }
}

/// Outcome of a position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Winner {
    /// Game still in progress
    None,
    White,
    Red,
    Draw,
}

impl Winner {
    /// The winning color, if a side has won.
    pub fn to_color(self) -> Option<PColor> {
        match self {
            Winner::White => Some(PColor::White),
            Winner::Red => Some(PColor::Red),
            Winner::None | Winner::Draw => None,
        }
    }

    fn from_color(color: PColor) -> Winner {
        match color {
            PColor::White => Winner::White,
            PColor::Red => Winner::Red,
        }
    }
}

/// A move to be played: a column and the shape of the dropped piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FutureMove {
    pub column: usize,
    pub shape: PShape,
}

impl FutureMove {
    /// Marker for "no move decided".
    pub const NO_MOVE: FutureMove = FutureMove {
        column: usize::MAX,
        shape: PShape::Round,
    };

    pub fn new(column: usize, shape: PShape) -> Self {
        Self { column, shape }
    }

    #[inline]
    pub fn is_no_move(&self) -> bool {
        *self == Self::NO_MOVE
    }
}

impl fmt::Display for FutureMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_no_move() {
            write!(f, "none")
        } else {
            write!(f, "{} {}", self.column, self.shape)
        }
    }
}

/// Reasons a board mutation can be refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Column index is outside the board
    ColumnOutOfRange,
    /// Column has no free row
    ColumnFull,
    /// Side to move has no pieces of the requested shape
    NoPiecesLeft,
    /// Undo requested on a board with no moves
    NothingToUndo,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::ColumnOutOfRange => write!(f, "illegal move: column out of range"),
            MoveError::ColumnFull => write!(f, "illegal move: column is full"),
            MoveError::NoPiecesLeft => write!(f, "illegal move: no pieces of that shape left"),
            MoveError::NothingToUndo => write!(f, "no move to undo"),
        }
    }
}

impl std::error::Error for MoveError {}

/// Line directions checked for sequences: horizontal, vertical, two diagonals.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// A ColorShapeLinks board.
///
/// Cloning produces an independent copy that can be mutated on another
/// thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    win_sequence: usize,
    cells: Vec<Option<Piece>>,
    /// Next free row in each column
    heights: Vec<usize>,
    /// Remaining pieces indexed by [color][shape]
    inventory: [[u32; 2]; 2],
    /// Moves played so far, for undo
    history: Vec<FutureMove>,
    turn: PColor,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create the standard 6x7 board.
    pub fn new() -> Self {
        Self::with_config(
            DEFAULT_ROWS,
            DEFAULT_COLS,
            DEFAULT_WIN_SEQUENCE,
            DEFAULT_ROUND_PIECES,
            DEFAULT_SQUARE_PIECES,
        )
    }

    /// Create an empty board with custom dimensions and per-player inventories.
    ///
    /// # Panics
    ///
    /// Panics if `rows`, `cols` or `win_sequence` is zero.
    pub fn with_config(
        rows: usize,
        cols: usize,
        win_sequence: usize,
        round_pieces: u32,
        square_pieces: u32,
    ) -> Self {
        assert!(rows > 0 && cols > 0, "board must have at least one cell");
        assert!(win_sequence > 0, "winning sequence must be positive");
        let per_player = [round_pieces, square_pieces];
        Self {
            rows,
            cols,
            win_sequence,
            cells: vec![None; rows * cols],
            heights: vec![0; cols],
            inventory: [per_player, per_player],
            history: Vec::new(),
            turn: PColor::White,
        }
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn win_sequence(&self) -> usize {
        self.win_sequence
    }

    /// Side to move.
    pub fn turn(&self) -> PColor {
        self.turn
    }

    /// Number of moves played.
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// Piece at `(row, col)`, or `None` for empty or out-of-range cells.
    pub fn get(&self, row: usize, col: usize) -> Option<Piece> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[self.idx(row, col)]
    }

    /// Whether no more pieces fit in `col`. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        self.heights.get(col).is_none_or(|&h| h >= self.rows)
    }

    /// Remaining pieces of `shape` for `color`.
    pub fn piece_count(&self, color: PColor, shape: PShape) -> u32 {
        self.inventory[color.index()][shape.index()]
    }

    /// All moves available to the side to move, columns ascending and shapes
    /// in [`PShape::ALL`] order.
    pub fn legal_moves(&self) -> Vec<FutureMove> {
        let mut moves = Vec::new();
        for col in 0..self.cols {
            if self.is_column_full(col) {
                continue;
            }
            for shape in PShape::ALL {
                if self.piece_count(self.turn, shape) > 0 {
                    moves.push(FutureMove::new(col, shape));
                }
            }
        }
        moves
    }

    fn has_legal_move(&self) -> bool {
        let has_pieces = PShape::ALL
            .iter()
            .any(|&s| self.piece_count(self.turn, s) > 0);
        has_pieces && (0..self.cols).any(|c| !self.is_column_full(c))
    }

    /// Drop a piece of `shape` for the side to move into `col`.
    pub fn do_move(&mut self, shape: PShape, col: usize) -> Result<(), MoveError> {
        if col >= self.cols {
            return Err(MoveError::ColumnOutOfRange);
        }
        if self.is_column_full(col) {
            return Err(MoveError::ColumnFull);
        }
        if self.piece_count(self.turn, shape) == 0 {
            return Err(MoveError::NoPiecesLeft);
        }

        let row = self.heights[col];
        let i = self.idx(row, col);
        self.cells[i] = Some(Piece::new(self.turn, shape));
        self.heights[col] += 1;
        self.inventory[self.turn.index()][shape.index()] -= 1;
        self.history.push(FutureMove::new(col, shape));
        self.turn = self.turn.other();
        Ok(())
    }

    /// Take back the last move, restoring the board exactly.
    pub fn undo_move(&mut self) -> Result<FutureMove, MoveError> {
        let mv = self.history.pop().ok_or(MoveError::NothingToUndo)?;
        self.turn = self.turn.other();
        self.heights[mv.column] -= 1;
        let i = self.idx(self.heights[mv.column], mv.column);
        self.cells[i] = None;
        self.inventory[self.turn.index()][mv.shape.index()] += 1;
        Ok(mv)
    }

    /// Determine the state of the game.
    ///
    /// Shape sequences take priority over color sequences. If both players
    /// hold sequences of the deciding kind, the game is drawn. With no
    /// sequence, the game is drawn when the side to move cannot play.
    pub fn check_winner(&self) -> Winner {
        // [color index] -> has a winning line
        let mut shape_lines = [false; 2];
        let mut color_lines = [false; 2];

        for row in 0..self.rows {
            for col in 0..self.cols {
                let Some(first) = self.get(row, col) else {
                    continue;
                };
                for (dr, dc) in DIRECTIONS {
                    let Some(line) = self.line_from(row, col, dr, dc) else {
                        continue;
                    };
                    if line.iter().all(|p| p.shape == first.shape) {
                        shape_lines[first.shape.color().index()] = true;
                    }
                    if line.iter().all(|p| p.color == first.color) {
                        color_lines[first.color.index()] = true;
                    }
                }
            }
        }

        if let Some(w) = resolve_lines(shape_lines).or_else(|| resolve_lines(color_lines)) {
            return w;
        }
        if self.has_legal_move() {
            Winner::None
        } else {
            Winner::Draw
        }
    }

    /// Collect `win_sequence` occupied cells starting at `(row, col)` in the
    /// given direction. Returns `None` if the line leaves the board or hits
    /// an empty cell.
    fn line_from(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<Vec<Piece>> {
        let mut line = Vec::with_capacity(self.win_sequence);
        for k in 0..self.win_sequence as isize {
            let r = row.checked_add_signed(dr * k)?;
            let c = col.checked_add_signed(dc * k)?;
            line.push(self.get(r, c)?);
        }
        Some(line)
    }
}

fn resolve_lines(lines: [bool; 2]) -> Option<Winner> {
    match lines {
        [true, true] => Some(Winner::Draw),
        [true, false] => Some(Winner::from_color(PColor::White)),
        [false, true] => Some(Winner::from_color(PColor::Red)),
        [false, false] => None,
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rows).rev() {
            for col in 0..self.cols {
                let ch = match self.get(row, col) {
                    Some(Piece { color: PColor::White, shape: PShape::Round }) => 'w',
                    Some(Piece { color: PColor::White, shape: PShape::Square }) => 'W',
                    Some(Piece { color: PColor::Red, shape: PShape::Round }) => 'r',
                    Some(Piece { color: PColor::Red, shape: PShape::Square }) => 'R',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        for col in 0..self.cols {
            write!(f, "{} ", col % 10)?;
        }
        writeln!(f)
    }
}
