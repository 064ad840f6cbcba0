// Packed per-ply state, one u32 per entry of the history stack
// Bits 0-3: castling rights (white kingside, white queenside, black kingside, black queenside)
// Bits 4-7: en-passant file (0 = none, otherwise file + 1)
// Bits 8-13: type of the piece captured by the move that produced this state
// Bits 14-31: half-move clock

use crate::piece::{Color, PieceType};

pub const WHITE_KINGSIDE: u8 = 0b0001;
pub const WHITE_QUEENSIDE: u8 = 0b0010;
pub const BLACK_KINGSIDE: u8 = 0b0100;
pub const BLACK_QUEENSIDE: u8 = 0b1000;
pub const ALL_CASTLING: u8 = 0b1111;

const EP_SHIFT: u32 = 4;
const CAPTURE_SHIFT: u32 = 8;
const CLOCK_SHIFT: u32 = 14;

/// Largest half-move clock the packed layout can hold
pub const MAX_HALFMOVE_CLOCK: u32 = u32::MAX >> CLOCK_SHIFT;

/// Both castling bits belonging to `colour`
#[inline]
pub const fn castling_mask(colour: Color) -> u8 {
    match colour {
        Color::White => WHITE_KINGSIDE | WHITE_QUEENSIDE,
        Color::Black => BLACK_KINGSIDE | BLACK_QUEENSIDE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GameState(u32);

impl GameState {
    pub fn new(castling: u8, ep_file: u8, captured: PieceType, halfmove_clock: u32) -> Self {
        debug_assert!(ep_file <= 8);
        debug_assert!(halfmove_clock <= MAX_HALFMOVE_CLOCK);
        GameState(
            (castling & ALL_CASTLING) as u32
                | ((ep_file as u32 & 0xF) << EP_SHIFT)
                | ((captured as u32 & 0x3F) << CAPTURE_SHIFT)
                | (halfmove_clock << CLOCK_SHIFT),
        )
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn castling_rights(self) -> u8 {
        (self.0 & ALL_CASTLING as u32) as u8
    }

    /// En-passant file plus one, or 0 when no en-passant capture is possible
    #[inline]
    pub const fn ep_file(self) -> u8 {
        ((self.0 >> EP_SHIFT) & 0xF) as u8
    }

    #[inline]
    pub const fn captured_kind(self) -> PieceType {
        ((self.0 >> CAPTURE_SHIFT) & 0x3F) as PieceType
    }

    #[inline]
    pub const fn halfmove_clock(self) -> u32 {
        self.0 >> CLOCK_SHIFT
    }

    #[inline]
    pub const fn has_right(self, right: u8) -> bool {
        self.castling_rights() & right != 0
    }
}
