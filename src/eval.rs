//! Static evaluation: material only
//!
//! Scores are in centipawns from the point of view of the side to move.
//! Playing strength comes from search depth and move ordering, not from
//! the evaluation.

use crate::board::Position;
use crate::piece::{self, Color, PieceType};

// ============================================================================
// MATERIAL VALUES (centipawns)
// ============================================================================
pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 300;
pub const BISHOP_VALUE: i32 = 300;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;

/// Material value of a piece type; kings and empty squares are worth 0
#[inline]
pub const fn piece_value(kind: PieceType) -> i32 {
    match kind {
        piece::PAWN => PAWN_VALUE,
        piece::KNIGHT => KNIGHT_VALUE,
        piece::BISHOP => BISHOP_VALUE,
        piece::ROOK => ROOK_VALUE,
        piece::QUEEN => QUEEN_VALUE,
        _ => 0,
    }
}

/// Total material of one side
pub fn count_material(pos: &Position, colour: Color) -> i32 {
    pos.pawns(colour).len() as i32 * PAWN_VALUE
        + pos.knights(colour).len() as i32 * KNIGHT_VALUE
        + pos.bishops(colour).len() as i32 * BISHOP_VALUE
        + pos.rooks(colour).len() as i32 * ROOK_VALUE
        + pos.queens(colour).len() as i32 * QUEEN_VALUE
}

/// White material minus black material, negated when black is to move
pub fn evaluate(pos: &Position) -> i32 {
    let score = count_material(pos, Color::White) - count_material(pos, Color::Black);
    match pos.side_to_move() {
        Color::White => score,
        Color::Black => -score,
    }
}
