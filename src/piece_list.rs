//! Per-colour, per-type list of occupied squares.
//!
//! Iterating a list costs O(#pieces) instead of a 64-square scan. A reverse
//! map from square to slot keeps add, remove and relocate O(1); removal swaps
//! the last entry into the freed slot, so list order is not stable across
//! make/unmake and two lists compare equal when they hold the same squares.

use crate::utils::Square;

pub const MAX_PIECES: usize = 16;

#[derive(Debug, Clone)]
pub struct PieceList {
    squares: [u8; MAX_PIECES],
    // slot index of each square; entries for unoccupied squares are stale
    map: [u8; 64],
    len: usize,
}

impl Default for PieceList {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceList {
    pub const fn new() -> Self {
        Self {
            squares: [0; MAX_PIECES],
            map: [0; 64],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Square {
        self.squares[index] as Square
    }

    pub fn contains(&self, sq: Square) -> bool {
        let slot = self.map[sq] as usize;
        slot < self.len && self.squares[slot] as Square == sq
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Square> + '_ {
        self.squares[..self.len].iter().map(|&s| s as Square)
    }

    /// Copy of the occupied squares; lets callers mutate the board while walking
    #[inline]
    pub fn snapshot(&self) -> ([u8; MAX_PIECES], usize) {
        (self.squares, self.len)
    }

    #[inline]
    pub fn add(&mut self, sq: Square) {
        debug_assert!(self.len < MAX_PIECES, "piece list overflow");
        self.squares[self.len] = sq as u8;
        self.map[sq] = self.len as u8;
        self.len += 1;
    }

    #[inline]
    pub fn remove(&mut self, sq: Square) {
        debug_assert!(self.contains(sq), "removing square {sq} not in list");
        let slot = self.map[sq] as usize;
        let last = self.squares[self.len - 1];
        self.squares[slot] = last;
        self.map[last as usize] = slot as u8;
        self.len -= 1;
    }

    #[inline]
    pub fn relocate(&mut self, from: Square, to: Square) {
        debug_assert!(self.contains(from), "relocating square {from} not in list");
        let slot = self.map[from] as usize;
        self.squares[slot] = to as u8;
        self.map[to] = slot as u8;
    }
}

impl PartialEq for PieceList {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|sq| other.contains(sq))
    }
}

impl Eq for PieceList {}
