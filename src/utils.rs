// Square naming, bitboard iteration and small helpers shared by the board,
// the generator and the search.

pub type Square = usize;

// Square indices used by castling and rook-corner bookkeeping (a1 = 0)
pub const A1: Square = 0;
pub const C1: Square = 2;
pub const D1: Square = 3;
pub const E1: Square = 4;
pub const F1: Square = 5;
pub const G1: Square = 6;
pub const H1: Square = 7;
pub const A8: Square = 56;
pub const C8: Square = 58;
pub const D8: Square = 59;
pub const E8: Square = 60;
pub const F8: Square = 61;
pub const G8: Square = 62;
pub const H8: Square = 63;

const FILE_NAMES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

#[inline]
pub const fn file_index(sq: Square) -> usize {
    sq & 7
}

#[inline]
pub const fn rank_index(sq: Square) -> usize {
    sq >> 3
}

#[inline]
pub const fn square_at(file: usize, rank: usize) -> Square {
    rank * 8 + file
}

#[inline]
pub const fn square_bb(sq: Square) -> u64 {
    1u64 << sq
}

#[inline]
pub const fn contains_square(bb: u64, sq: Square) -> bool {
    (bb >> sq) & 1 != 0
}

/// Convert a square index (0-63) to its name (0 -> "a1", 63 -> "h8")
pub fn square_name(sq: Square) -> String {
    format!("{}{}", FILE_NAMES[file_index(sq)], rank_index(sq) + 1)
}

/// Parse a square name ("e4") into its index
pub fn parse_square(name: &str) -> Option<Square> {
    let bytes = name.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some(square_at((file - b'a') as usize, (rank - b'1') as usize))
}

pub fn file_name(file: usize) -> char {
    FILE_NAMES[file]
}

// Bit operations
#[inline]
pub fn pop_lsb(bb: &mut u64) -> Option<Square> {
    if *bb == 0 {
        return None;
    }
    let lsb = bb.trailing_zeros() as Square;
    *bb &= *bb - 1;
    Some(lsb)
}

pub struct BitIter {
    bb: u64,
}

impl Iterator for BitIter {
    type Item = Square;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        pop_lsb(&mut self.bb)
    }
}

#[inline]
pub fn iter_bits(bb: u64) -> BitIter {
    BitIter { bb }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_names_round_trip() {
        for sq in 0..64 {
            assert_eq!(parse_square(&square_name(sq)), Some(sq));
        }
        assert_eq!(square_name(E1), "e1");
        assert_eq!(square_name(H8), "h8");
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("a9"), None);
        assert_eq!(parse_square("e"), None);
    }

    #[test]
    fn bit_iteration_is_ascending() {
        let bb = square_bb(A1) | square_bb(E1) | square_bb(H8);
        let squares: Vec<Square> = iter_bits(bb).collect();
        assert_eq!(squares, vec![A1, E1, H8]);
        assert!(contains_square(bb, E1));
        assert!(!contains_square(bb, D1));
    }
}
