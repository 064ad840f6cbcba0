//! Move ordering heuristic
//!
//! Good candidates first so alpha-beta cuts off early. Ordering never
//! changes a search result, only the number of nodes visited.

use crate::board::Position;
use crate::eval::piece_value;
use crate::moves::{Move, MoveFlag};
use crate::piece;
use crate::utils::contains_square;
use std::cmp::Reverse;

pub const CAPTURED_PIECE_VALUE_MULTIPLIER: i32 = 10;
pub const SQUARE_ATTACKED_BY_PAWN_PENALTY: i32 = 350;

/// Heuristic score of `mv` in `pos` (before the move is made)
pub fn score_move(pos: &Position, mv: Move, opponent_pawn_attacks: u64) -> i32 {
    let mover = pos.piece_at(mv.from()).kind();
    let captured = if mv.flag() == MoveFlag::EnPassantCapture {
        piece::PAWN
    } else {
        pos.piece_at(mv.to()).kind()
    };

    let mut score = 0;
    // most valuable victim first, cheapest attacker breaking ties; the
    // multiplier keeps even queen-takes-pawn above quiet moves
    if captured != piece::NONE {
        score = CAPTURED_PIECE_VALUE_MULTIPLIER * piece_value(captured) - piece_value(mover);
    }

    if mover == piece::PAWN {
        if mv.is_promotion() {
            score += piece_value(mv.promotion_kind());
        }
    } else if contains_square(opponent_pawn_attacks, mv.to()) {
        score -= SQUARE_ATTACKED_BY_PAWN_PENALTY;
    }
    score
}

/// Sort `moves` by descending score. The sort is stable, so equal scores
/// keep generator order.
pub fn order_moves(pos: &Position, moves: &mut [Move], opponent_pawn_attacks: u64) {
    moves.sort_by_cached_key(|&mv| Reverse(score_move(pos, mv, opponent_pawn_attacks)));
}
