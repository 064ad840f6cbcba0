// Zobrist hashing with precomputed tables
use crate::board::Position;
use crate::piece::{Color, Piece};
use std::sync::OnceLock;

const SEED: u64 = 0x2961_7a1f_0c05_b3e7;

#[derive(Debug, Clone)]
pub struct ZobristKeys {
    // [piece type][colour][square]; type ids are sparse so the table has 8 rows
    pieces: [[[u64; 64]; 2]; 8],
    // indexed by the 4-bit castling rights value
    castling: [u64; 16],
    // 0 = no en-passant file, otherwise file + 1
    ep_file: [u64; 9],
    side_to_move: u64,
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

/// Process-wide keys generated from a fixed seed
pub fn keys() -> &'static ZobristKeys {
    KEYS.get_or_init(|| ZobristKeys::with_seed(SEED))
}

fn split_mix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

impl ZobristKeys {
    pub fn with_seed(seed: u64) -> Self {
        let mut state = seed;
        let mut next = || {
            state = split_mix64(state);
            state
        };

        let mut pieces = [[[0u64; 64]; 2]; 8];
        for by_colour in pieces.iter_mut() {
            for by_square in by_colour.iter_mut() {
                for key in by_square.iter_mut() {
                    *key = next();
                }
            }
        }
        let mut castling = [0u64; 16];
        for key in castling.iter_mut() {
            *key = next();
        }
        let mut ep_file = [0u64; 9];
        for key in ep_file.iter_mut() {
            *key = next();
        }
        let side_to_move = next();

        ZobristKeys {
            pieces,
            castling,
            ep_file,
            side_to_move,
        }
    }

    #[inline]
    pub fn piece(&self, piece: Piece, sq: usize) -> u64 {
        match piece.colour() {
            Some(colour) => self.pieces[piece.kind() as usize][colour.index()][sq],
            None => 0,
        }
    }

    #[inline]
    pub fn castling(&self, rights: u8) -> u64 {
        self.castling[(rights & 0xF) as usize]
    }

    #[inline]
    pub fn ep_file(&self, ep_file: u8) -> u64 {
        self.ep_file[ep_file as usize]
    }

    #[inline]
    pub fn side_to_move(&self) -> u64 {
        self.side_to_move
    }
}

/// Recompute the key of `pos` from its squares, side, castling rights and
/// en-passant file. The incrementally maintained key must always match.
pub fn compute_key(pos: &Position) -> u64 {
    let keys = keys();
    let mut h = 0u64;
    for sq in 0..64 {
        let piece = pos.piece_at(sq);
        if !piece.is_none() {
            h ^= keys.piece(piece, sq);
        }
    }
    if pos.side_to_move() == Color::Black {
        h ^= keys.side_to_move();
    }
    let state = pos.game_state();
    h ^= keys.castling(state.castling_rights());
    h ^= keys.ep_file(state.ep_file());
    h
}
