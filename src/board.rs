use crate::error::PositionError;
use crate::game_state::{
    castling_mask, GameState, BLACK_KINGSIDE, BLACK_QUEENSIDE, MAX_HALFMOVE_CLOCK, WHITE_KINGSIDE,
    WHITE_QUEENSIDE,
};
use crate::moves::{Move, MoveFlag};
use crate::piece::{self, Color, Piece, PieceType};
use crate::piece_list::PieceList;
use crate::utils::{file_index, square_at, Square, A1, A8, G1, G8, H1, H8};
use crate::zobrist;

/// Mutable position record. One owner at a time: the search recurses on a
/// single instance and relies on `unmake_move` undoing `make_move` exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    squares: [Piece; 64],
    king_square: [Square; 2],
    pawns: [PieceList; 2],
    knights: [PieceList; 2],
    bishops: [PieceList; 2],
    rooks: [PieceList; 2],
    queens: [PieceList; 2],
    side_to_move: Color,
    // one entry per ply plus the loaded state; top is the current state
    history: Vec<GameState>,
    zobrist_key: u64,
    ply_count: u32,
    // plies played before the loaded position, from its full-move number
    initial_ply: u32,
    repetition_history: Vec<u64>,
    // segments cleared by irreversible moves made outside search
    repetition_stash: Vec<Vec<u64>>,
}

impl Position {
    /// Board with no pieces and no history; populate it via `from_fen`
    pub fn empty() -> Self {
        Self {
            squares: [Piece::NONE; 64],
            king_square: [0; 2],
            pawns: Default::default(),
            knights: Default::default(),
            bishops: Default::default(),
            rooks: Default::default(),
            queens: Default::default(),
            side_to_move: Color::White,
            history: Vec::with_capacity(256),
            zobrist_key: 0,
            ply_count: 0,
            initial_ply: 0,
            repetition_history: Vec::new(),
            repetition_stash: Vec::new(),
        }
    }

    /// Install the loaded state once every piece is placed
    pub(crate) fn finish_load(&mut self, side: Color, state: GameState, fullmove: u32) {
        self.side_to_move = side;
        self.history.clear();
        self.history.push(state);
        self.ply_count = 0;
        self.initial_ply = (fullmove - 1) * 2 + side.index() as u32;
        self.zobrist_key = zobrist::compute_key(self);
        self.repetition_history.clear();
        self.repetition_history.push(self.zobrist_key);
        self.repetition_stash.clear();
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.squares[sq]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn opponent(&self) -> Color {
        self.side_to_move.opposite()
    }

    #[inline]
    pub fn king_square(&self, colour: Color) -> Square {
        self.king_square[colour.index()]
    }

    #[inline]
    pub fn pawns(&self, colour: Color) -> &PieceList {
        &self.pawns[colour.index()]
    }

    #[inline]
    pub fn knights(&self, colour: Color) -> &PieceList {
        &self.knights[colour.index()]
    }

    #[inline]
    pub fn bishops(&self, colour: Color) -> &PieceList {
        &self.bishops[colour.index()]
    }

    #[inline]
    pub fn rooks(&self, colour: Color) -> &PieceList {
        &self.rooks[colour.index()]
    }

    #[inline]
    pub fn queens(&self, colour: Color) -> &PieceList {
        &self.queens[colour.index()]
    }

    /// Piece list for a non-king type
    pub fn piece_list(&self, kind: PieceType, colour: Color) -> Option<&PieceList> {
        let c = colour.index();
        match kind {
            piece::PAWN => Some(&self.pawns[c]),
            piece::KNIGHT => Some(&self.knights[c]),
            piece::BISHOP => Some(&self.bishops[c]),
            piece::ROOK => Some(&self.rooks[c]),
            piece::QUEEN => Some(&self.queens[c]),
            _ => None,
        }
    }

    fn piece_list_mut(&mut self, kind: PieceType, colour: Color) -> Option<&mut PieceList> {
        let c = colour.index();
        match kind {
            piece::PAWN => Some(&mut self.pawns[c]),
            piece::KNIGHT => Some(&mut self.knights[c]),
            piece::BISHOP => Some(&mut self.bishops[c]),
            piece::ROOK => Some(&mut self.rooks[c]),
            piece::QUEEN => Some(&mut self.queens[c]),
            _ => None,
        }
    }

    /// Current packed state (castling, en-passant file, last capture, clock)
    #[inline]
    pub fn game_state(&self) -> GameState {
        self.history.last().copied().unwrap_or_default()
    }

    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    /// Plies made since the position was loaded
    #[inline]
    pub fn ply_count(&self) -> u32 {
        self.ply_count
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.game_state().halfmove_clock()
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        (self.initial_ply + self.ply_count) / 2 + 1
    }

    #[inline]
    pub fn castling_rights(&self) -> u8 {
        self.game_state().castling_rights()
    }

    /// Square a pawn may capture onto en passant, if any
    pub fn ep_square(&self) -> Option<Square> {
        let file = self.game_state().ep_file();
        if file == 0 {
            return None;
        }
        let rank = match self.side_to_move {
            Color::White => 5,
            Color::Black => 2,
        };
        Some(square_at(file as usize - 1, rank))
    }

    pub fn repetition_history(&self) -> &[u64] {
        &self.repetition_history
    }

    /// Threefold repetition of the current position since the last pawn
    /// move or capture made outside search
    pub fn is_repetition(&self) -> bool {
        self.repetition_history
            .iter()
            .filter(|&&k| k == self.zobrist_key)
            .count()
            >= 3
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock() >= 100
    }

    // Square/list bookkeeping. Kings live in `king_square`, everything else
    // in its piece list.

    pub(crate) fn put(&mut self, sq: Square, p: Piece) {
        self.squares[sq] = p;
        let Some(colour) = p.colour() else { return };
        if p.kind() == piece::KING {
            self.king_square[colour.index()] = sq;
        } else if let Some(list) = self.piece_list_mut(p.kind(), colour) {
            list.add(sq);
        }
    }

    /// Overwrite a square without touching piece lists, king squares or the
    /// key. Callers must restore the previous value before anything else
    /// reads the position.
    pub(crate) fn set_square_raw(&mut self, sq: Square, p: Piece) -> Piece {
        std::mem::replace(&mut self.squares[sq], p)
    }

    fn take(&mut self, sq: Square) -> Piece {
        let p = self.squares[sq];
        self.squares[sq] = Piece::NONE;
        if let Some(colour) = p.colour() {
            if let Some(list) = self.piece_list_mut(p.kind(), colour) {
                list.remove(sq);
            }
        }
        p
    }

    fn shift(&mut self, from: Square, to: Square) {
        let p = self.squares[from];
        self.squares[from] = Piece::NONE;
        self.squares[to] = p;
        let Some(colour) = p.colour() else { return };
        if p.kind() == piece::KING {
            self.king_square[colour.index()] = to;
        } else if let Some(list) = self.piece_list_mut(p.kind(), colour) {
            list.relocate(from, to);
        }
    }

    /// Play `mv`, which must be legal in this position. With `in_search`
    /// set the position is not recorded for repetition detection.
    pub fn make_move(&mut self, mv: Move, in_search: bool) {
        let keys = zobrist::keys();
        let us = self.side_to_move;
        let from = mv.from();
        let to = mv.to();
        let flag = mv.flag();
        let prev = self.game_state();

        let moving = self.squares[from];
        let mut key = self.zobrist_key;

        let captured_kind = if flag == MoveFlag::EnPassantCapture {
            let cap_sq = en_passant_victim(to, us);
            let victim = self.take(cap_sq);
            key ^= keys.piece(victim, cap_sq);
            piece::PAWN
        } else if !self.squares[to].is_none() {
            let victim = self.take(to);
            key ^= keys.piece(victim, to);
            victim.kind()
        } else {
            piece::NONE
        };

        self.shift(from, to);
        key ^= keys.piece(moving, from);

        let placed = if mv.is_promotion() {
            let promoted = Piece::new(mv.promotion_kind(), us);
            self.take(to);
            self.put(to, promoted);
            promoted
        } else {
            moving
        };
        key ^= keys.piece(placed, to);

        if flag == MoveFlag::Castling {
            let (rook_from, rook_to) = castling_rook_squares(to);
            let rook = self.squares[rook_from];
            self.shift(rook_from, rook_to);
            key ^= keys.piece(rook, rook_from) ^ keys.piece(rook, rook_to);
        }

        let mut castling = prev.castling_rights();
        if moving.kind() == piece::KING {
            castling &= !castling_mask(us);
        }
        castling &= !(corner_right(from) | corner_right(to));

        let ep_file = if flag == MoveFlag::PawnTwoForward {
            file_index(from) as u8 + 1
        } else {
            0
        };

        let irreversible = moving.kind() == piece::PAWN || captured_kind != piece::NONE;
        let halfmove = if irreversible {
            0
        } else {
            (prev.halfmove_clock() + 1).min(MAX_HALFMOVE_CLOCK)
        };

        key ^= keys.side_to_move();
        if ep_file != prev.ep_file() {
            key ^= keys.ep_file(prev.ep_file()) ^ keys.ep_file(ep_file);
        }
        if castling != prev.castling_rights() {
            key ^= keys.castling(prev.castling_rights()) ^ keys.castling(castling);
        }

        self.history
            .push(GameState::new(castling, ep_file, captured_kind, halfmove));
        self.side_to_move = us.opposite();
        self.ply_count += 1;
        self.zobrist_key = key;

        if !in_search {
            if irreversible {
                let cleared = std::mem::take(&mut self.repetition_history);
                self.repetition_stash.push(cleared);
            }
            self.repetition_history.push(key);
        }
    }

    /// Undo `mv`, the last move made with the same `in_search` setting
    pub fn unmake_move(&mut self, mv: Move, in_search: bool) -> Result<(), PositionError> {
        let undone = match self.history.len() {
            0 => return Err(PositionError::EmptyHistory),
            1 => return Err(PositionError::NothingToUndo),
            _ => self.history.pop().ok_or(PositionError::EmptyHistory)?,
        };
        let prev = self.game_state();
        let keys = zobrist::keys();

        let us = self.side_to_move.opposite();
        self.side_to_move = us;
        let from = mv.from();
        let to = mv.to();
        let flag = mv.flag();
        let captured_kind = undone.captured_kind();

        let mut key = self.zobrist_key ^ keys.side_to_move();
        if undone.ep_file() != prev.ep_file() {
            key ^= keys.ep_file(undone.ep_file()) ^ keys.ep_file(prev.ep_file());
        }
        if undone.castling_rights() != prev.castling_rights() {
            key ^= keys.castling(undone.castling_rights()) ^ keys.castling(prev.castling_rights());
        }

        let placed = self.squares[to];
        if mv.is_promotion() {
            self.take(to);
            self.put(to, Piece::new(piece::PAWN, us));
        }
        let moving = self.squares[to];
        key ^= keys.piece(placed, to) ^ keys.piece(moving, from);
        self.shift(to, from);

        if flag == MoveFlag::Castling {
            let (rook_from, rook_to) = castling_rook_squares(to);
            let rook = self.squares[rook_to];
            self.shift(rook_to, rook_from);
            key ^= keys.piece(rook, rook_to) ^ keys.piece(rook, rook_from);
        }

        if captured_kind != piece::NONE {
            let cap_sq = if flag == MoveFlag::EnPassantCapture {
                en_passant_victim(to, us)
            } else {
                to
            };
            let victim = Piece::new(captured_kind, us.opposite());
            self.put(cap_sq, victim);
            key ^= keys.piece(victim, cap_sq);
        }

        self.zobrist_key = key;
        self.ply_count -= 1;

        if !in_search {
            self.repetition_history.pop();
            if moving.kind() == piece::PAWN || captured_kind != piece::NONE {
                if let Some(restored) = self.repetition_stash.pop() {
                    self.repetition_history = restored;
                }
            }
        }
        Ok(())
    }

    /// Cross-check squares, piece lists, king squares, history length and
    /// the incremental key against each other
    pub fn is_consistent(&self) -> bool {
        for colour in [Color::White, Color::Black] {
            let king = self.king_square(colour);
            if self.squares[king] != Piece::new(piece::KING, colour) {
                return false;
            }
            for kind in [
                piece::PAWN,
                piece::KNIGHT,
                piece::BISHOP,
                piece::ROOK,
                piece::QUEEN,
            ] {
                let Some(list) = self.piece_list(kind, colour) else {
                    return false;
                };
                let expected = Piece::new(kind, colour);
                let on_board = self.squares.iter().filter(|&&p| p == expected).count();
                if on_board != list.len() || list.iter().any(|sq| self.squares[sq] != expected) {
                    return false;
                }
            }
            let kings = self
                .squares
                .iter()
                .filter(|&&p| p == Piece::new(piece::KING, colour))
                .count();
            if kings != 1 {
                return false;
            }
        }
        self.history.len() == self.ply_count as usize + 1
            && self.zobrist_key == zobrist::compute_key(self)
    }
}

/// Rook origin and destination for a castling move landing on `king_to`
#[inline]
pub(crate) fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    if king_to == G1 || king_to == G8 {
        (king_to + 1, king_to - 1)
    } else {
        (king_to - 2, king_to + 1)
    }
}

#[inline]
fn en_passant_victim(to: Square, mover: Color) -> Square {
    match mover {
        Color::White => to - 8,
        Color::Black => to + 8,
    }
}

#[inline]
fn corner_right(sq: Square) -> u8 {
    match sq {
        H1 => WHITE_KINGSIDE,
        A1 => WHITE_QUEENSIDE,
        H8 => BLACK_KINGSIDE,
        A8 => BLACK_QUEENSIDE,
        _ => 0,
    }
}

// Simple display (board grid)
impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                match self.squares[square_at(file, rank)].symbol() {
                    Some(ch) => write!(f, "{} ", ch)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{parse_square, C1, E1, E8};

    fn sq(name: &str) -> Square {
        parse_square(name).unwrap()
    }

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn start_position_lists() {
        let p = Position::start();
        assert_eq!(p.pawns(Color::White).len(), 8);
        assert_eq!(p.knights(Color::Black).len(), 2);
        assert_eq!(p.queens(Color::White).len(), 1);
        assert_eq!(p.king_square(Color::White), E1);
        assert_eq!(p.king_square(Color::Black), E8);
        assert!(p.is_consistent());
    }

    #[test]
    fn double_push_sets_ep_file_and_resets_clock() {
        let mut p = pos("4k3/8/8/8/8/8/4P3/4K3 w - - 7 20");
        let mv = Move::with_flag(sq("e2"), sq("e4"), MoveFlag::PawnTwoForward);
        p.make_move(mv, false);
        assert_eq!(p.game_state().ep_file(), 5);
        assert_eq!(p.ep_square(), Some(sq("e3")));
        assert_eq!(p.halfmove_clock(), 0);
        assert_eq!(p.side_to_move(), Color::Black);
        assert!(p.is_consistent());

        p.unmake_move(mv, false).unwrap();
        assert_eq!(p.halfmove_clock(), 7);
        assert_eq!(p, pos("4k3/8/8/8/8/8/4P3/4K3 w - - 7 20"));
    }

    #[test]
    fn en_passant_removes_victim_and_unmake_restores_it() {
        let fen = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2";
        let mut p = pos(fen);
        let mv = Move::with_flag(sq("e5"), sq("d6"), MoveFlag::EnPassantCapture);
        p.make_move(mv, true);
        assert!(p.piece_at(sq("d5")).is_none());
        assert_eq!(p.pawns(Color::Black).len(), 0);
        assert_eq!(p.game_state().captured_kind(), piece::PAWN);
        assert!(p.is_consistent());
        p.unmake_move(mv, true).unwrap();
        assert_eq!(p, pos(fen));
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let mut p = pos(fen);
        let mv = Move::with_flag(E1, C1, MoveFlag::Castling);
        p.make_move(mv, false);
        assert_eq!(p.piece_at(sq("d1")), Piece::new(piece::ROOK, Color::White));
        assert!(p.piece_at(A1).is_none());
        assert_eq!(p.castling_rights(), BLACK_KINGSIDE | BLACK_QUEENSIDE);
        assert!(p.is_consistent());
        p.unmake_move(mv, false).unwrap();
        assert_eq!(p, pos(fen));
    }

    #[test]
    fn capturing_a_corner_rook_clears_its_right() {
        let mut p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        p.make_move(Move::new(A1, A8), false);
        assert_eq!(p.castling_rights(), WHITE_KINGSIDE | BLACK_KINGSIDE);
        assert_eq!(p.game_state().captured_kind(), piece::ROOK);
        assert!(p.is_consistent());
    }

    #[test]
    fn promotion_swaps_lists() {
        let fen = "1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1";
        let mut p = pos(fen);
        let mv = Move::with_flag(sq("a7"), sq("b8"), MoveFlag::PromoteToKnight);
        p.make_move(mv, true);
        assert_eq!(p.pawns(Color::White).len(), 0);
        assert_eq!(p.knights(Color::White).len(), 1);
        assert_eq!(p.knights(Color::Black).len(), 0);
        assert!(p.is_consistent());
        p.unmake_move(mv, true).unwrap();
        assert_eq!(p, pos(fen));
    }

    #[test]
    fn unmake_errors_are_distinct() {
        let mut empty = Position::empty();
        assert_eq!(
            empty.unmake_move(Move::new(12, 28), false),
            Err(PositionError::EmptyHistory)
        );
        let mut start = Position::start();
        assert_eq!(
            start.unmake_move(Move::new(12, 28), false),
            Err(PositionError::NothingToUndo)
        );
    }

    #[test]
    fn fullmove_number_advances_after_black() {
        let mut p = Position::start();
        p.make_move(Move::with_flag(sq("e2"), sq("e4"), MoveFlag::PawnTwoForward), false);
        assert_eq!(p.fullmove_number(), 1);
        p.make_move(Move::with_flag(sq("e7"), sq("e5"), MoveFlag::PawnTwoForward), false);
        assert_eq!(p.fullmove_number(), 2);
    }

    #[test]
    fn display_draws_grid() {
        let s = Position::start().to_string();
        let first = s.lines().next().unwrap();
        assert_eq!(first.trim_end(), "r n b q k b n r");
        assert_eq!(s.lines().count(), 8);
    }
}
