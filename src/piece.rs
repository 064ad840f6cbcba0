// Piece codes: a piece type in the low three bits combined with a colour bit.
// The type ids are not contiguous so that sliders can be classified with a
// single mask test.

pub type PieceType = u8;

pub const NONE: PieceType = 0;
pub const KING: PieceType = 1;
pub const PAWN: PieceType = 2;
pub const KNIGHT: PieceType = 3;
pub const BISHOP: PieceType = 5;
pub const ROOK: PieceType = 6;
pub const QUEEN: PieceType = 7;

const TYPE_MASK: u8 = 0b00111;
const WHITE_BIT: u8 = 0b01000;
const BLACK_BIT: u8 = 0b10000;
const COLOUR_MASK: u8 = WHITE_BIT | BLACK_BIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Colour bit carried by piece codes of this colour
    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            Color::White => WHITE_BIT,
            Color::Black => BLACK_BIT,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

/// Piece code stored in each board square; `Piece::NONE` marks an empty square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

impl Piece {
    pub const NONE: Piece = Piece(0);

    #[inline]
    pub const fn new(kind: PieceType, colour: Color) -> Self {
        Piece((kind & TYPE_MASK) | colour.bit())
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn kind(self) -> PieceType {
        self.0 & TYPE_MASK
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_colour(self, colour: Color) -> bool {
        self.0 & COLOUR_MASK == colour.bit()
    }

    #[inline]
    pub const fn colour(self) -> Option<Color> {
        match self.0 & COLOUR_MASK {
            WHITE_BIT => Some(Color::White),
            BLACK_BIT => Some(Color::Black),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_sliding(self) -> bool {
        self.0 & 0b100 != 0
    }

    #[inline]
    pub const fn is_rook_or_queen(self) -> bool {
        self.0 & 0b110 == 0b110
    }

    #[inline]
    pub const fn is_bishop_or_queen(self) -> bool {
        self.0 & 0b101 == 0b101
    }

    /// Position-string letter: uppercase for white, lowercase for black
    pub fn symbol(self) -> Option<char> {
        let c = match self.kind() {
            KING => 'k',
            PAWN => 'p',
            KNIGHT => 'n',
            BISHOP => 'b',
            ROOK => 'r',
            QUEEN => 'q',
            _ => return None,
        };
        match self.colour()? {
            Color::White => Some(c.to_ascii_uppercase()),
            Color::Black => Some(c),
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        let kind = match symbol.to_ascii_lowercase() {
            'k' => KING,
            'p' => PAWN,
            'n' => KNIGHT,
            'b' => BISHOP,
            'r' => ROOK,
            'q' => QUEEN,
            _ => return None,
        };
        let colour = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, colour))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_predicates_follow_type_bits() {
        let queen = Piece::new(QUEEN, Color::Black);
        let rook = Piece::new(ROOK, Color::White);
        let bishop = Piece::new(BISHOP, Color::White);
        let knight = Piece::new(KNIGHT, Color::Black);

        assert!(queen.is_sliding() && queen.is_rook_or_queen() && queen.is_bishop_or_queen());
        assert!(rook.is_rook_or_queen() && !rook.is_bishop_or_queen());
        assert!(bishop.is_bishop_or_queen() && !bishop.is_rook_or_queen());
        assert!(!knight.is_sliding());
        assert!(!Piece::new(KING, Color::White).is_sliding());
        assert!(!Piece::new(PAWN, Color::White).is_sliding());
    }

    #[test]
    fn symbols_round_trip() {
        for ch in "KQRBNPkqrbnp".chars() {
            let piece = Piece::from_symbol(ch).expect("known symbol");
            assert_eq!(piece.symbol(), Some(ch));
        }
        assert_eq!(Piece::from_symbol('x'), None);
        assert_eq!(Piece::NONE.symbol(), None);
        assert_eq!(Piece::NONE.colour(), None);
    }
}
