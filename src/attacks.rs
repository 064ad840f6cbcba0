// Precomputed, read-only attack tables.
//
// Built once with `AttackTables::new()` and shared through `tables()`; the move
// generator can also be handed its own instance. Nothing in here changes after
// construction.

use crate::piece::Color;
use crate::utils::{file_index, rank_index, square_at, square_bb, Square};
use std::sync::OnceLock;

/// Ray offsets in the order N, S, W, E, NW, SE, NE, SW. Orthogonal
/// directions occupy indices 0..4, diagonals 4..8.
pub const DIRECTION_OFFSETS: [i32; 8] = [8, -8, -1, 1, 7, -7, 9, -9];

/// Direction indices of the two pawn capture rays per colour
pub const PAWN_ATTACK_DIRECTIONS: [[usize; 2]; 2] = [[4, 6], [7, 5]];

const KNIGHT_JUMPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Up to eight destination squares reachable by a single jump
#[derive(Debug, Clone, Copy, Default)]
pub struct JumpSet {
    squares: [u8; 8],
    len: u8,
}

impl JumpSet {
    fn push(&mut self, sq: Square) {
        self.squares[self.len as usize] = sq as u8;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Square> + '_ {
        self.squares[..self.len as usize].iter().map(|&s| s as Square)
    }
}

#[derive(Debug, Clone)]
pub struct AttackTables {
    num_squares_to_edge: [[u8; 8]; 64],
    knight_moves: [JumpSet; 64],
    king_moves: [JumpSet; 64],
    pawn_captures: [[JumpSet; 64]; 2],
    knight_attacks: [u64; 64],
    king_attacks: [u64; 64],
    pawn_attacks: [[u64; 64]; 2],
    rook_rays: [u64; 64],
    bishop_rays: [u64; 64],
    queen_rays: [u64; 64],
    // indexed by target - start + 63
    direction_lookup: [i8; 127],
    orthogonal_distance: [[u8; 64]; 64],
    king_distance: [[u8; 64]; 64],
    centre_manhattan_distance: [u8; 64],
}

static TABLES: OnceLock<AttackTables> = OnceLock::new();

/// Process-wide tables, built on first use
pub fn tables() -> &'static AttackTables {
    TABLES.get_or_init(AttackTables::new)
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackTables {
    pub fn new() -> Self {
        let mut t = AttackTables {
            num_squares_to_edge: [[0; 8]; 64],
            knight_moves: [JumpSet::default(); 64],
            king_moves: [JumpSet::default(); 64],
            pawn_captures: [[JumpSet::default(); 64]; 2],
            knight_attacks: [0; 64],
            king_attacks: [0; 64],
            pawn_attacks: [[0; 64]; 2],
            rook_rays: [0; 64],
            bishop_rays: [0; 64],
            queen_rays: [0; 64],
            direction_lookup: [0; 127],
            orthogonal_distance: [[0; 64]; 64],
            king_distance: [[0; 64]; 64],
            centre_manhattan_distance: [0; 64],
        };

        for sq in 0..64 {
            let file = file_index(sq) as i32;
            let rank = rank_index(sq) as i32;

            let north = 7 - rank;
            let south = rank;
            let west = file;
            let east = 7 - file;
            t.num_squares_to_edge[sq] = [
                north as u8,
                south as u8,
                west as u8,
                east as u8,
                north.min(west) as u8,
                south.min(east) as u8,
                north.min(east) as u8,
                south.min(west) as u8,
            ];

            for (df, dr) in KNIGHT_JUMPS {
                if let Some(target) = offset_square(file, rank, df, dr) {
                    t.knight_moves[sq].push(target);
                    t.knight_attacks[sq] |= square_bb(target);
                }
            }

            for dir in 0..8 {
                let offset = DIRECTION_OFFSETS[dir];
                if t.num_squares_to_edge[sq][dir] > 0 {
                    let target = (sq as i32 + offset) as Square;
                    t.king_moves[sq].push(target);
                    t.king_attacks[sq] |= square_bb(target);
                }
                let mut ray = 0u64;
                for step in 1..=t.num_squares_to_edge[sq][dir] as i32 {
                    ray |= square_bb((sq as i32 + offset * step) as Square);
                }
                if dir < 4 {
                    t.rook_rays[sq] |= ray;
                } else {
                    t.bishop_rays[sq] |= ray;
                }
            }
            t.queen_rays[sq] = t.rook_rays[sq] | t.bishop_rays[sq];

            for colour in [Color::White, Color::Black] {
                for dir in PAWN_ATTACK_DIRECTIONS[colour.index()] {
                    if t.num_squares_to_edge[sq][dir] > 0 {
                        let target = (sq as i32 + DIRECTION_OFFSETS[dir]) as Square;
                        t.pawn_captures[colour.index()][sq].push(target);
                        t.pawn_attacks[colour.index()][sq] |= square_bb(target);
                    }
                }
            }

            let centre_file = (3 - file).max(file - 4);
            let centre_rank = (3 - rank).max(rank - 4);
            t.centre_manhattan_distance[sq] = (centre_file + centre_rank) as u8;

            for other in 0..64 {
                let df = (file - file_index(other) as i32).abs();
                let dr = (rank - rank_index(other) as i32).abs();
                t.orthogonal_distance[sq][other] = (df + dr) as u8;
                t.king_distance[sq][other] = df.max(dr) as u8;
            }
        }

        for (i, entry) in t.direction_lookup.iter_mut().enumerate() {
            let delta = i as i32 - 63;
            let abs = delta.abs();
            let step = if abs == 0 {
                0
            } else if abs % 8 == 0 {
                8
            } else if abs % 9 == 0 {
                9
            } else if abs % 7 == 0 {
                7
            } else if abs < 8 {
                1
            } else {
                0
            };
            *entry = (step * delta.signum()) as i8;
        }

        t
    }

    #[inline]
    pub fn num_squares_to_edge(&self, sq: Square, dir: usize) -> usize {
        self.num_squares_to_edge[sq][dir] as usize
    }

    #[inline]
    pub fn knight_moves(&self, sq: Square) -> &JumpSet {
        &self.knight_moves[sq]
    }

    #[inline]
    pub fn king_moves(&self, sq: Square) -> &JumpSet {
        &self.king_moves[sq]
    }

    #[inline]
    pub fn pawn_captures(&self, colour: Color, sq: Square) -> &JumpSet {
        &self.pawn_captures[colour.index()][sq]
    }

    #[inline]
    pub fn knight_attacks(&self, sq: Square) -> u64 {
        self.knight_attacks[sq]
    }

    #[inline]
    pub fn king_attacks(&self, sq: Square) -> u64 {
        self.king_attacks[sq]
    }

    /// Squares a pawn of `colour` standing on `sq` attacks
    #[inline]
    pub fn pawn_attacks(&self, colour: Color, sq: Square) -> u64 {
        self.pawn_attacks[colour.index()][sq]
    }

    /// Every square on the rook lines through `sq` on an empty board
    #[inline]
    pub fn rook_rays(&self, sq: Square) -> u64 {
        self.rook_rays[sq]
    }

    #[inline]
    pub fn bishop_rays(&self, sq: Square) -> u64 {
        self.bishop_rays[sq]
    }

    #[inline]
    pub fn queen_rays(&self, sq: Square) -> u64 {
        self.queen_rays[sq]
    }

    /// Ray offset (±1, ±7, ±8, ±9) leading from `from` towards `to`, or 0
    /// when the delta fits no ray. Only meaningful when the two squares are
    /// already known to share a line.
    #[inline]
    pub fn direction_between(&self, from: Square, to: Square) -> i32 {
        self.direction_lookup[(to as i32 - from as i32 + 63) as usize] as i32
    }

    /// Rook-move (Manhattan) distance
    #[inline]
    pub fn orthogonal_distance(&self, a: Square, b: Square) -> u8 {
        self.orthogonal_distance[a][b]
    }

    /// King-move (Chebyshev) distance
    #[inline]
    pub fn king_distance(&self, a: Square, b: Square) -> u8 {
        self.king_distance[a][b]
    }

    #[inline]
    pub fn centre_manhattan_distance(&self, sq: Square) -> u8 {
        self.centre_manhattan_distance[sq]
    }
}

fn offset_square(file: i32, rank: i32, df: i32, dr: i32) -> Option<Square> {
    let (f, r) = (file + df, rank + dr);
    if (0..8).contains(&f) && (0..8).contains(&r) {
        Some(square_at(f as usize, r as usize))
    } else {
        None
    }
}
