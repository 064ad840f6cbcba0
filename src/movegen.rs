//! Legal move generation.
//!
//! Moves are produced directly legal rather than generated pseudo-legally
//! and filtered: before any piece moves are emitted the generator works out
//! which enemy squares are attacked, which friendly pieces are pinned (and
//! along which ray), and whether the king is in single or double check. Each
//! candidate move is then accepted or rejected against those masks. En
//! passant is the one case the masks cannot decide, since two pieces leave
//! the capturing rank at once, so it is verified by playing the capture on
//! the raw squares and scanning for attacks on the king.

use crate::attacks::{self, AttackTables, DIRECTION_OFFSETS, PAWN_ATTACK_DIRECTIONS};
use crate::board::Position;
use crate::game_state::{BLACK_KINGSIDE, BLACK_QUEENSIDE, WHITE_KINGSIDE, WHITE_QUEENSIDE};
use crate::moves::{Move, MoveFlag};
use crate::piece::{self, Color, Piece};
use crate::utils::{contains_square, rank_index, square_bb, Square, E1, E8};

/// Which under-promotions the generator emits. Queen promotions are always
/// generated; perft needs `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromotionMode {
    #[default]
    All,
    QueenOnly,
    QueenAndKnight,
}

/// Outcome of the position for the side to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    FiftyMoveRule,
    Repetition,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

pub struct MoveGenerator<'t> {
    tables: &'t AttackTables,
    promotion_mode: PromotionMode,

    // per-call state, reset by `init`
    us: Color,
    them: Color,
    friendly_king: Square,
    include_quiets: bool,
    in_check: bool,
    in_double_check: bool,
    pins_exist: bool,
    check_ray_mask: u64,
    pin_ray_mask: u64,
    opponent_sliding_attack_map: u64,
    opponent_knight_attacks: u64,
    opponent_pawn_attack_map: u64,
    opponent_attack_map: u64,
}

impl Default for MoveGenerator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveGenerator<'static> {
    /// Generator backed by the process-wide tables
    pub fn new() -> Self {
        Self::with_tables(attacks::tables())
    }
}

impl<'t> MoveGenerator<'t> {
    pub fn with_tables(tables: &'t AttackTables) -> Self {
        Self {
            tables,
            promotion_mode: PromotionMode::All,
            us: Color::White,
            them: Color::Black,
            friendly_king: 0,
            include_quiets: true,
            in_check: false,
            in_double_check: false,
            pins_exist: false,
            check_ray_mask: 0,
            pin_ray_mask: 0,
            opponent_sliding_attack_map: 0,
            opponent_knight_attacks: 0,
            opponent_pawn_attack_map: 0,
            opponent_attack_map: 0,
        }
    }

    pub fn promotion_mode(mut self, mode: PromotionMode) -> Self {
        self.promotion_mode = mode;
        self
    }

    pub fn set_promotion_mode(&mut self, mode: PromotionMode) {
        self.promotion_mode = mode;
    }

    /// Whether the side to move was in check in the last generated position
    #[inline]
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    /// Squares attacked by enemy pawns in the last generated position
    #[inline]
    pub fn opponent_pawn_attack_map(&self) -> u64 {
        self.opponent_pawn_attack_map
    }

    /// Every square the opponent attacks, with sliders seeing through our king
    #[inline]
    pub fn opponent_attack_map(&self) -> u64 {
        self.opponent_attack_map
    }

    /// All legal moves for the side to move; with `include_quiets` false only
    /// captures (en passant included) and capturing promotions are returned.
    ///
    /// The position is borrowed mutably for the en-passant check and is
    /// unchanged on return.
    pub fn generate_moves(&mut self, pos: &mut Position, include_quiets: bool) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.init(pos, include_quiets);
        self.calculate_attack_data(pos);
        self.generate_king_moves(pos, &mut moves);

        // only the king can answer a double check
        if self.in_double_check {
            return moves;
        }

        self.generate_sliding_moves(pos, &mut moves);
        self.generate_knight_moves(pos, &mut moves);
        self.generate_pawn_moves(pos, &mut moves);
        moves
    }

    fn init(&mut self, pos: &Position, include_quiets: bool) {
        self.us = pos.side_to_move();
        self.them = self.us.opposite();
        self.friendly_king = pos.king_square(self.us);
        self.include_quiets = include_quiets;
        self.in_check = false;
        self.in_double_check = false;
        self.pins_exist = false;
        self.check_ray_mask = 0;
        self.pin_ray_mask = 0;

        debug_assert!(
            pos.piece_at(self.friendly_king) == Piece::new(piece::KING, self.us)
                && pos.piece_at(pos.king_square(self.them)) == Piece::new(piece::KING, self.them),
            "move generation needs exactly one king per side"
        );
    }

    fn calculate_attack_data(&mut self, pos: &Position) {
        self.generate_sliding_attack_map(pos);

        // Search outward from the king for pins and sliding checks, skipping
        // ray families the opponent has no piece for
        let them = self.them;
        let mut start_dir = 0;
        let mut end_dir = 8;
        if pos.queens(them).is_empty() {
            if pos.rooks(them).is_empty() {
                start_dir = 4;
            }
            if pos.bishops(them).is_empty() {
                end_dir = 4;
            }
        }

        for dir in start_dir..end_dir {
            let is_diagonal = dir > 3;
            let offset = DIRECTION_OFFSETS[dir];
            let mut ray_mask = 0u64;
            let mut friendly_along_ray = false;
            let mut sq = self.friendly_king as i32;

            for _ in 0..self.tables.num_squares_to_edge(self.friendly_king, dir) {
                sq += offset;
                let target = sq as Square;
                ray_mask |= square_bb(target);
                let p = pos.piece_at(target);
                if p.is_none() {
                    continue;
                }
                if p.is_colour(self.us) {
                    if friendly_along_ray {
                        // second friendly piece: nothing on this ray can pin or check
                        break;
                    }
                    friendly_along_ray = true;
                } else {
                    let aligned = if is_diagonal {
                        p.is_bishop_or_queen()
                    } else {
                        p.is_rook_or_queen()
                    };
                    if aligned {
                        if friendly_along_ray {
                            self.pins_exist = true;
                            self.pin_ray_mask |= ray_mask;
                        } else {
                            self.check_ray_mask |= ray_mask;
                            self.in_double_check = self.in_check;
                            self.in_check = true;
                        }
                    }
                    break;
                }
            }

            if self.in_double_check {
                break;
            }
        }

        self.opponent_knight_attacks = 0;
        let mut knight_check = false;
        for sq in pos.knights(them).iter() {
            self.opponent_knight_attacks |= self.tables.knight_attacks(sq);
            if contains_square(self.tables.knight_attacks(sq), self.friendly_king) {
                knight_check = true;
                self.check_ray_mask |= square_bb(sq);
            }
        }
        if knight_check {
            self.in_double_check = self.in_check;
            self.in_check = true;
        }

        self.opponent_pawn_attack_map = 0;
        let mut pawn_check = false;
        for sq in pos.pawns(them).iter() {
            let attacks = self.tables.pawn_attacks(them, sq);
            self.opponent_pawn_attack_map |= attacks;
            if contains_square(attacks, self.friendly_king) {
                pawn_check = true;
                self.check_ray_mask |= square_bb(sq);
            }
        }
        if pawn_check {
            self.in_double_check = self.in_check;
            self.in_check = true;
        }

        let enemy_king_attacks = self.tables.king_attacks(pos.king_square(them));
        self.opponent_attack_map = self.opponent_sliding_attack_map
            | self.opponent_knight_attacks
            | enemy_king_attacks
            | self.opponent_pawn_attack_map;
    }

    fn generate_sliding_attack_map(&mut self, pos: &Position) {
        self.opponent_sliding_attack_map = 0;
        let them = self.them;
        for sq in pos.rooks(them).iter() {
            self.update_sliding_attack_piece(pos, sq, 0, 4);
        }
        for sq in pos.bishops(them).iter() {
            self.update_sliding_attack_piece(pos, sq, 4, 8);
        }
        for sq in pos.queens(them).iter() {
            self.update_sliding_attack_piece(pos, sq, 0, 8);
        }
    }

    fn update_sliding_attack_piece(
        &mut self,
        pos: &Position,
        start: Square,
        start_dir: usize,
        end_dir: usize,
    ) {
        for dir in start_dir..end_dir {
            let offset = DIRECTION_OFFSETS[dir];
            let mut sq = start as i32;
            for _ in 0..self.tables.num_squares_to_edge(start, dir) {
                sq += offset;
                let target = sq as Square;
                self.opponent_sliding_attack_map |= square_bb(target);
                // the friendly king does not block, so stepping back along
                // the checking ray stays illegal
                if target != self.friendly_king && !pos.piece_at(target).is_none() {
                    break;
                }
            }
        }
    }

    fn generate_king_moves(&self, pos: &Position, moves: &mut Vec<Move>) {
        let king = self.friendly_king;
        for target in self.tables.king_moves(king).iter() {
            let p = pos.piece_at(target);
            if p.is_colour(self.us) {
                continue;
            }
            let is_capture = p.is_colour(self.them);
            if !is_capture && (!self.include_quiets || self.square_in_check_ray(target)) {
                continue;
            }
            if !contains_square(self.opponent_attack_map, target) {
                moves.push(Move::new(king, target));
            }
        }

        if !self.include_quiets || self.in_check {
            return;
        }

        let (home, kingside, queenside) = match self.us {
            Color::White => (E1, WHITE_KINGSIDE, WHITE_QUEENSIDE),
            Color::Black => (E8, BLACK_KINGSIDE, BLACK_QUEENSIDE),
        };
        if king != home {
            return;
        }
        let rights = pos.castling_rights();
        let rook = Piece::new(piece::ROOK, self.us);

        if rights & kingside != 0
            && pos.piece_at(home + 3) == rook
            && self.castling_path_clear(pos, &[home + 1, home + 2], &[home + 1, home + 2])
        {
            moves.push(Move::with_flag(home, home + 2, MoveFlag::Castling));
        }
        if rights & queenside != 0
            && pos.piece_at(home - 4) == rook
            && self.castling_path_clear(
                pos,
                &[home - 1, home - 2, home - 3],
                &[home - 1, home - 2],
            )
        {
            moves.push(Move::with_flag(home, home - 2, MoveFlag::Castling));
        }
    }

    fn castling_path_clear(&self, pos: &Position, empty: &[Square], safe: &[Square]) -> bool {
        empty.iter().all(|&sq| pos.piece_at(sq).is_none())
            && safe
                .iter()
                .all(|&sq| !contains_square(self.opponent_attack_map, sq))
    }

    fn generate_sliding_moves(&self, pos: &Position, moves: &mut Vec<Move>) {
        let us = self.us;
        for sq in pos.rooks(us).iter() {
            self.generate_sliding_piece_moves(pos, sq, 0, 4, moves);
        }
        for sq in pos.bishops(us).iter() {
            self.generate_sliding_piece_moves(pos, sq, 4, 8, moves);
        }
        for sq in pos.queens(us).iter() {
            self.generate_sliding_piece_moves(pos, sq, 0, 8, moves);
        }
    }

    fn generate_sliding_piece_moves(
        &self,
        pos: &Position,
        start: Square,
        start_dir: usize,
        end_dir: usize,
        moves: &mut Vec<Move>,
    ) {
        let is_pinned = self.is_pinned(start);

        // a pinned piece can neither block nor capture a checker
        if self.in_check && is_pinned {
            return;
        }

        for dir in start_dir..end_dir {
            let offset = DIRECTION_OFFSETS[dir];
            if is_pinned && !self.is_moving_along_ray(offset, self.friendly_king, start) {
                continue;
            }

            let mut sq = start as i32;
            for _ in 0..self.tables.num_squares_to_edge(start, dir) {
                sq += offset;
                let target = sq as Square;
                let p = pos.piece_at(target);
                if p.is_colour(self.us) {
                    break;
                }
                let is_capture = !p.is_none();
                let prevents_check = self.square_in_check_ray(target);
                if (prevents_check || !self.in_check) && (self.include_quiets || is_capture) {
                    moves.push(Move::new(start, target));
                }
                if is_capture || prevents_check {
                    break;
                }
            }
        }
    }

    fn generate_knight_moves(&self, pos: &Position, moves: &mut Vec<Move>) {
        for start in pos.knights(self.us).iter() {
            // a pinned knight can never stay on its ray
            if self.is_pinned(start) {
                continue;
            }
            for target in self.tables.knight_moves(start).iter() {
                let p = pos.piece_at(target);
                if p.is_colour(self.us) {
                    continue;
                }
                let is_capture = !p.is_none();
                if !self.include_quiets && !is_capture {
                    continue;
                }
                if self.in_check && !self.square_in_check_ray(target) {
                    continue;
                }
                moves.push(Move::new(start, target));
            }
        }
    }

    fn generate_pawn_moves(&self, pos: &mut Position, moves: &mut Vec<Move>) {
        let us = self.us;
        let push: i32 = match us {
            Color::White => 8,
            Color::Black => -8,
        };
        let (start_rank, rank_before_promotion) = match us {
            Color::White => (1, 6),
            Color::Black => (6, 1),
        };
        let ep_square = pos.ep_square();

        let (pawns, count) = pos.pawns(us).snapshot();
        for &start in &pawns[..count] {
            let start = start as Square;
            let rank = rank_index(start);
            let about_to_promote = rank == rank_before_promotion;
            let is_pinned = self.is_pinned(start);

            if self.include_quiets {
                let one_forward = (start as i32 + push) as Square;
                if pos.piece_at(one_forward).is_none()
                    && (!is_pinned || self.is_moving_along_ray(push, start, self.friendly_king))
                {
                    if !self.in_check || self.square_in_check_ray(one_forward) {
                        if about_to_promote {
                            self.push_promotions(start, one_forward, moves);
                        } else {
                            moves.push(Move::new(start, one_forward));
                        }
                    }

                    if rank == start_rank {
                        let two_forward = (one_forward as i32 + push) as Square;
                        if pos.piece_at(two_forward).is_none()
                            && (!self.in_check || self.square_in_check_ray(two_forward))
                        {
                            moves.push(Move::with_flag(
                                start,
                                two_forward,
                                MoveFlag::PawnTwoForward,
                            ));
                        }
                    }
                }
            }

            for dir in PAWN_ATTACK_DIRECTIONS[us.index()] {
                if self.tables.num_squares_to_edge(start, dir) == 0 {
                    continue;
                }
                let offset = DIRECTION_OFFSETS[dir];
                let target = (start as i32 + offset) as Square;

                if is_pinned && !self.is_moving_along_ray(offset, self.friendly_king, start) {
                    continue;
                }

                if pos.piece_at(target).is_colour(self.them) {
                    if self.in_check && !self.square_in_check_ray(target) {
                        continue;
                    }
                    if about_to_promote {
                        self.push_promotions(start, target, moves);
                    } else {
                        moves.push(Move::new(start, target));
                    }
                }

                if Some(target) == ep_square {
                    let victim = (target as i32 - push) as Square;
                    if !self.in_check_after_en_passant(pos, start, target, victim) {
                        moves.push(Move::with_flag(start, target, MoveFlag::EnPassantCapture));
                    }
                }
            }
        }
    }

    fn push_promotions(&self, from: Square, to: Square, moves: &mut Vec<Move>) {
        moves.push(Move::with_flag(from, to, MoveFlag::PromoteToQueen));
        match self.promotion_mode {
            PromotionMode::All => {
                moves.push(Move::with_flag(from, to, MoveFlag::PromoteToKnight));
                moves.push(Move::with_flag(from, to, MoveFlag::PromoteToRook));
                moves.push(Move::with_flag(from, to, MoveFlag::PromoteToBishop));
            }
            PromotionMode::QueenAndKnight => {
                moves.push(Move::with_flag(from, to, MoveFlag::PromoteToKnight));
            }
            PromotionMode::QueenOnly => {}
        }
    }

    // Play the capture on the raw squares, look for attacks on the king,
    // then put everything back
    fn in_check_after_en_passant(
        &self,
        pos: &mut Position,
        start: Square,
        target: Square,
        victim: Square,
    ) -> bool {
        let pawn = pos.set_square_raw(start, Piece::NONE);
        let captured = pos.set_square_raw(victim, Piece::NONE);
        pos.set_square_raw(target, pawn);

        let attacked = square_attacked_with(self.tables, pos, self.friendly_king, self.them);

        pos.set_square_raw(target, Piece::NONE);
        pos.set_square_raw(victim, captured);
        pos.set_square_raw(start, pawn);
        attacked
    }

    #[inline]
    fn is_pinned(&self, sq: Square) -> bool {
        self.pins_exist && contains_square(self.pin_ray_mask, sq)
    }

    #[inline]
    fn square_in_check_ray(&self, sq: Square) -> bool {
        self.in_check && contains_square(self.check_ray_mask, sq)
    }

    #[inline]
    fn is_moving_along_ray(&self, ray_dir: i32, start: Square, target: Square) -> bool {
        let move_dir = self.tables.direction_between(start, target);
        move_dir == ray_dir || move_dir == -ray_dir
    }
}

/// Whether any piece of colour `by` attacks `sq`. Reads only the squares
/// array, so it stays correct while the board is being probed.
pub fn is_square_attacked(pos: &Position, sq: Square, by: Color) -> bool {
    square_attacked_with(attacks::tables(), pos, sq, by)
}

fn square_attacked_with(tables: &AttackTables, pos: &Position, sq: Square, by: Color) -> bool {
    for dir in 0..8 {
        let offset = DIRECTION_OFFSETS[dir];
        let mut s = sq as i32;
        for _ in 0..tables.num_squares_to_edge(sq, dir) {
            s += offset;
            let p = pos.piece_at(s as Square);
            if p.is_none() {
                continue;
            }
            if p.is_colour(by) {
                let aligned = if dir > 3 {
                    p.is_bishop_or_queen()
                } else {
                    p.is_rook_or_queen()
                };
                if aligned {
                    return true;
                }
            }
            break;
        }
    }

    let knight = Piece::new(piece::KNIGHT, by);
    if tables.knight_moves(sq).iter().any(|s| pos.piece_at(s) == knight) {
        return true;
    }

    // pawns of `by` that attack `sq` stand where an opposite-coloured pawn
    // on `sq` would capture
    let pawn = Piece::new(piece::PAWN, by);
    if tables
        .pawn_captures(by.opposite(), sq)
        .iter()
        .any(|s| pos.piece_at(s) == pawn)
    {
        return true;
    }

    let king = Piece::new(piece::KING, by);
    tables.king_moves(sq).iter().any(|s| pos.piece_at(s) == king)
}

/// Destination squares of the legal moves starting on `from`, ascending
pub fn legal_destinations(pos: &mut Position, from: Square) -> Vec<Square> {
    let mut targets: Vec<Square> = MoveGenerator::new()
        .generate_moves(pos, true)
        .into_iter()
        .filter(|mv| mv.from() == from)
        .map(|mv| mv.to())
        .collect();
    targets.sort_unstable();
    targets.dedup();
    targets
}

pub fn game_status(pos: &mut Position) -> GameStatus {
    let mut generator = MoveGenerator::new();
    let moves = generator.generate_moves(pos, true);
    if moves.is_empty() {
        if generator.in_check() {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    } else if pos.is_fifty_move_draw() {
        GameStatus::FiftyMoveRule
    } else if pos.is_repetition() {
        GameStatus::Repetition
    } else {
        GameStatus::Ongoing
    }
}
