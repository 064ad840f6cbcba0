// Move encoding: 16-bit layout
// Bits 0-5: from (0-63)
// Bits 6-11: to (0-63)
// Bits 12-15: flag

use crate::piece::{self, PieceType};
use crate::utils::{square_name, Square};
use std::fmt;

const FROM_MASK: u16 = 0b0000_0000_0011_1111;
const TO_MASK: u16 = 0b0000_1111_1100_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    None = 0,
    EnPassantCapture = 1,
    Castling = 2,
    PromoteToQueen = 3,
    PromoteToKnight = 4,
    PromoteToRook = 5,
    PromoteToBishop = 6,
    PawnTwoForward = 7,
}

impl MoveFlag {
    const fn from_bits(bits: u16) -> Self {
        match bits {
            1 => MoveFlag::EnPassantCapture,
            2 => MoveFlag::Castling,
            3 => MoveFlag::PromoteToQueen,
            4 => MoveFlag::PromoteToKnight,
            5 => MoveFlag::PromoteToRook,
            6 => MoveFlag::PromoteToBishop,
            7 => MoveFlag::PawnTwoForward,
            _ => MoveFlag::None,
        }
    }

    /// Promotion flag for a piece type, if that type is a legal promotion
    pub const fn promotion(kind: PieceType) -> Option<Self> {
        match kind {
            piece::QUEEN => Some(MoveFlag::PromoteToQueen),
            piece::KNIGHT => Some(MoveFlag::PromoteToKnight),
            piece::ROOK => Some(MoveFlag::PromoteToRook),
            piece::BISHOP => Some(MoveFlag::PromoteToBishop),
            _ => None,
        }
    }
}

/// Compact move value. Equality covers from, to and flag, so promotions to
/// different pieces are different moves.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    /// The all-zero value, used as "no move"
    pub const NULL: Move = Move(0);

    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Self::with_flag(from, to, MoveFlag::None)
    }

    #[inline]
    pub const fn with_flag(from: Square, to: Square, flag: MoveFlag) -> Self {
        Move((from as u16 & 0x3F) | ((to as u16 & 0x3F) << 6) | ((flag as u16) << 12))
    }

    #[inline]
    pub const fn from(self) -> Square {
        (self.0 & FROM_MASK) as Square
    }

    #[inline]
    pub const fn to(self) -> Square {
        ((self.0 & TO_MASK) >> 6) as Square
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        MoveFlag::from_bits(self.0 >> 12)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(
            self.flag(),
            MoveFlag::PromoteToQueen
                | MoveFlag::PromoteToKnight
                | MoveFlag::PromoteToRook
                | MoveFlag::PromoteToBishop
        )
    }

    /// Piece type a promotion produces, `piece::NONE` for other moves
    pub const fn promotion_kind(self) -> PieceType {
        match self.flag() {
            MoveFlag::PromoteToQueen => piece::QUEEN,
            MoveFlag::PromoteToKnight => piece::KNIGHT,
            MoveFlag::PromoteToRook => piece::ROOK,
            MoveFlag::PromoteToBishop => piece::BISHOP,
            _ => piece::NONE,
        }
    }

    /// Coordinate notation, e.g. "e2e4" or "e7e8q"; "0000" for the null move
    pub fn to_uci(self) -> String {
        if self.is_null() {
            return "0000".to_string();
        }
        let mut s = format!("{}{}", square_name(self.from()), square_name(self.to()));
        if let Some(c) = promotion_char(self.promotion_kind()) {
            s.push(c);
        }
        s
    }
}

pub(crate) fn promotion_char(kind: PieceType) -> Option<char> {
    match kind {
        piece::QUEEN => Some('q'),
        piece::ROOK => Some('r'),
        piece::BISHOP => Some('b'),
        piece::KNIGHT => Some('n'),
        _ => None,
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?})", self.to_uci(), self.flag())
    }
}
