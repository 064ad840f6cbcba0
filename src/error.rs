//! Error types for the position engine
//!
//! Parsing, history and engine-facing failures each get their own enum so
//! callers can tell a malformed position string apart from a misuse of the
//! make/unmake stack.

use thiserror::Error;

/// Errors produced while reading a position description string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// The record did not have exactly six space-separated fields
    #[error("expected 6 fields in position string, found {found}")]
    FieldCount { found: usize },

    /// Piece placement did not describe exactly eight ranks
    #[error("expected 8 ranks in piece placement, found {found}")]
    RankCount { found: usize },

    /// A rank described more or fewer than eight files
    #[error("rank {rank} describes {files} files instead of 8")]
    RankWidth { rank: usize, files: usize },

    /// Unrecognised character in the piece placement field
    #[error("invalid piece symbol '{symbol}'")]
    InvalidPiece { symbol: char },

    /// Side to move was neither `w` nor `b`
    #[error("invalid side to move '{found}'")]
    InvalidSide { found: String },

    /// Castling field contained something other than a subset of `KQkq` or `-`
    #[error("invalid castling rights '{found}'")]
    InvalidCastling { found: String },

    /// En-passant target square was malformed or on the wrong rank
    #[error("invalid en-passant square '{found}'")]
    InvalidEnPassant { found: String },

    /// Half-move clock was not a number or does not fit the packed state
    #[error("invalid half-move clock '{found}'")]
    InvalidHalfMoveClock { found: String },

    /// Full-move number was not a positive number
    #[error("invalid full-move number '{found}'")]
    InvalidFullMoveNumber { found: String },

    /// More pieces of one kind than a piece list can hold
    #[error("too many '{symbol}' pieces")]
    TooManyPieces { symbol: char },

    /// A side did not have exactly one king
    #[error("expected exactly one {colour} king, found {count}")]
    KingCount { colour: &'static str, count: usize },

    /// A pawn stood on the first or last rank
    #[error("pawn on back rank square {square}")]
    PawnOnBackRank { square: String },

    /// The side that just moved left its own king in check
    #[error("{colour} king is in check with the opponent to move")]
    OpponentInCheck { colour: &'static str },
}

/// Errors raised by the make/unmake history.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    /// No state was ever recorded: the position was never loaded
    #[error("game state history is empty; the position was never loaded")]
    EmptyHistory,

    /// Only the loaded state remains, so there is no move to take back
    #[error("no move has been made since the position was loaded")]
    NothingToUndo,
}

/// Errors surfaced by the engine entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error(transparent)]
    Position(#[from] PositionError),

    /// A square name that is not of the form file-letter + rank-digit
    #[error("invalid square name '{name}'")]
    InvalidSquare { name: String },
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
