//! Constants for board geometry, piece inventories and search parameters.
//!
//! The defaults describe the standard ColorShapeLinks match: a 6x7 board,
//! sequences of four to win, and 21 pieces per player split between the two
//! shapes. Boards with other dimensions can be built with
//! [`Board::with_config`](crate::board::Board::with_config).

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of rows on the standard board.
pub const DEFAULT_ROWS: usize = 6;

/// Number of columns on the standard board.
pub const DEFAULT_COLS: usize = 7;

/// Length of a winning sequence (same shape or same color).
pub const DEFAULT_WIN_SEQUENCE: usize = 4;

// =============================================================================
// Piece Inventories
// =============================================================================

/// Round pieces each player starts with.
pub const DEFAULT_ROUND_PIECES: u32 = 11;

/// Square pieces each player starts with.
pub const DEFAULT_SQUARE_PIECES: u32 = 10;

// =============================================================================
// Search Parameters
// =============================================================================

/// Search depth used when the configured depth is missing or invalid.
pub const DEFAULT_MAX_DEPTH: i32 = 1;

/// Number of column ranges the root move is split into.
pub const ROOT_PARTITIONS: usize = 7;

/// Per-turn thinking budget used by the protocol driver, in milliseconds.
pub const DEFAULT_TIME_LIMIT_MS: u64 = 2000;
