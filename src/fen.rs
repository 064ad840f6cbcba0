// Position description strings: six space-separated fields
// placement, side to move, castling, en-passant target, half-move clock, full-move number
use crate::board::Position;
use crate::error::FenError;
use crate::game_state::{
    GameState, ALL_CASTLING, BLACK_KINGSIDE, BLACK_QUEENSIDE, MAX_HALFMOVE_CLOCK, WHITE_KINGSIDE,
    WHITE_QUEENSIDE,
};
use crate::movegen::is_square_attacked;
use crate::piece::{self, Color, Piece, PieceType};
use crate::piece_list::MAX_PIECES;
use crate::utils::{file_index, parse_square, rank_index, square_at, square_name};
use std::str::FromStr;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [PieceType; 8] = [
    piece::ROOK,
    piece::KNIGHT,
    piece::BISHOP,
    piece::QUEEN,
    piece::KING,
    piece::BISHOP,
    piece::KNIGHT,
    piece::ROOK,
];

const CASTLING_SYMBOLS: [(char, u8); 4] = [
    ('K', WHITE_KINGSIDE),
    ('Q', WHITE_QUEENSIDE),
    ('k', BLACK_KINGSIDE),
    ('q', BLACK_QUEENSIDE),
];

impl Position {
    /// Standard initial position
    pub fn start() -> Self {
        let mut pos = Position::empty();
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            pos.put(square_at(file, 0), Piece::new(kind, Color::White));
            pos.put(square_at(file, 1), Piece::new(piece::PAWN, Color::White));
            pos.put(square_at(file, 6), Piece::new(piece::PAWN, Color::Black));
            pos.put(square_at(file, 7), Piece::new(kind, Color::Black));
        }
        pos.finish_load(
            Color::White,
            GameState::new(ALL_CASTLING, 0, piece::NONE, 0),
            1,
        );
        pos
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount {
                found: fields.len(),
            });
        }

        let placement = parse_placement(fields[0])?;

        for colour in [Color::White, Color::Black] {
            let king = Piece::new(piece::KING, colour);
            let count = placement.iter().filter(|&&p| p == king).count();
            if count != 1 {
                return Err(FenError::KingCount {
                    colour: colour.name(),
                    count,
                });
            }
        }

        let side = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSide {
                    found: other.to_string(),
                })
            }
        };

        let castling = parse_castling(fields[2])?;
        let ep_file = parse_en_passant(fields[3], side, &placement)?;

        let halfmove = fields[4]
            .parse::<u32>()
            .ok()
            .filter(|&n| n <= MAX_HALFMOVE_CLOCK)
            .ok_or_else(|| FenError::InvalidHalfMoveClock {
                found: fields[4].to_string(),
            })?;
        let fullmove = fields[5]
            .parse::<u32>()
            .ok()
            .filter(|&n| n >= 1 && n <= u32::MAX / 4)
            .ok_or_else(|| FenError::InvalidFullMoveNumber {
                found: fields[5].to_string(),
            })?;

        let mut pos = Position::empty();
        for (sq, &p) in placement.iter().enumerate() {
            if !p.is_none() {
                pos.put(sq, p);
            }
        }
        pos.finish_load(
            side,
            GameState::new(castling, ep_file, piece::NONE, halfmove),
            fullmove,
        );

        let them = side.opposite();
        if is_square_attacked(&pos, pos.king_square(them), side) {
            return Err(FenError::OpponentInCheck {
                colour: them.name(),
            });
        }
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0u8;
            for file in 0..8 {
                match self.piece_at(square_at(file, rank)).symbol() {
                    Some(ch) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(ch);
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move() {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        let rights = self.castling_rights();
        if rights == 0 {
            out.push('-');
        } else {
            for (ch, bit) in CASTLING_SYMBOLS {
                if rights & bit != 0 {
                    out.push(ch);
                }
            }
        }

        out.push(' ');
        match self.ep_square() {
            Some(sq) => out.push_str(&square_name(sq)),
            None => out.push('-'),
        }

        out.push_str(&format!(
            " {} {}",
            self.halfmove_clock(),
            self.fullmove_number()
        ));
        out
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

fn parse_placement(field: &str) -> Result<[Piece; 64], FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount { found: ranks.len() });
    }

    let mut squares = [Piece::NONE; 64];
    let mut counts = [[0usize; 8]; 2];
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i;
        let mut file = 0usize;
        for ch in rank_str.chars() {
            if let Some(skip) = ch.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += skip as usize;
                continue;
            }
            let p = Piece::from_symbol(ch).ok_or(FenError::InvalidPiece { symbol: ch })?;
            if file < 8 {
                if p.kind() == piece::PAWN && (rank == 0 || rank == 7) {
                    return Err(FenError::PawnOnBackRank {
                        square: square_name(square_at(file, rank)),
                    });
                }
                squares[square_at(file, rank)] = p;
            }
            if let Some(colour) = p.colour() {
                let count = &mut counts[colour.index()][p.kind() as usize];
                *count += 1;
                if *count > MAX_PIECES {
                    return Err(FenError::TooManyPieces { symbol: ch });
                }
            }
            file += 1;
        }
        if file != 8 {
            return Err(FenError::RankWidth {
                rank: rank + 1,
                files: file,
            });
        }
    }
    Ok(squares)
}

fn parse_castling(field: &str) -> Result<u8, FenError> {
    if field == "-" {
        return Ok(0);
    }
    let invalid = || FenError::InvalidCastling {
        found: field.to_string(),
    };
    let mut rights = 0u8;
    for ch in field.chars() {
        let (_, bit) = CASTLING_SYMBOLS
            .iter()
            .find(|(symbol, _)| *symbol == ch)
            .ok_or_else(invalid)?;
        if rights & bit != 0 {
            return Err(invalid());
        }
        rights |= bit;
    }
    Ok(rights)
}

/// En-passant file + 1, or 0 for `-`. The target must sit behind a pawn that
/// just made a double push, so its rank depends on the side to move.
/// The pushed pawn must stand in front of the target, with the target and the
/// pawn's start square both empty.
fn parse_en_passant(field: &str, side: Color, squares: &[Piece; 64]) -> Result<u8, FenError> {
    if field == "-" {
        return Ok(0);
    }
    let expected_rank = match side {
        Color::White => 5,
        Color::Black => 2,
    };
    let pushed = Piece::new(piece::PAWN, side.opposite());
    parse_square(field)
        .filter(|&sq| rank_index(sq) == expected_rank)
        .filter(|&sq| {
            let (victim, origin) = match side {
                Color::White => (sq - 8, sq + 8),
                Color::Black => (sq + 8, sq - 8),
            };
            squares[victim] == pushed && squares[sq].is_none() && squares[origin].is_none()
        })
        .map(|sq| file_index(sq) as u8 + 1)
        .ok_or_else(|| FenError::InvalidEnPassant {
            found: field.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_matches_starting_fen() {
        let parsed = Position::from_fen(STARTING_FEN).unwrap();
        assert_eq!(parsed, Position::start());
        assert_eq!(Position::start().to_fen(), STARTING_FEN);
    }

    #[test]
    fn round_trip_keeps_state_fields() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
            "rnbqkbnr/pppp1ppp/8/8/3Pp3/8/PPP1PPPP/RNBQKBNR b Kq d3 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 13 47",
        ] {
            assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn extra_whitespace_is_tolerated() {
        let p: Position = "  4k3/8/8/8/8/8/8/4K3   b  -  -  3  9 ".parse().unwrap();
        assert_eq!(p.to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 3 9");
    }

    #[test]
    fn malformed_strings_are_rejected() {
        use FenError::*;
        let cases: [(&str, fn(&FenError) -> bool); 16] = [
            ("4k3/8/8/8/8/8/8/4K3 w - -", |e| matches!(e, FieldCount { found: 4 })),
            ("4k3/8/8/8/8/8/4K3 w - - 0 1", |e| matches!(e, RankCount { found: 7 })),
            ("4k3/9/8/8/8/8/8/4K3 w - - 0 1", |e| matches!(e, InvalidPiece { symbol: '9' })),
            ("4k3/8/8/8/8/8/8/4K4 w - - 0 1", |e| matches!(e, RankWidth { rank: 1, files: 9 })),
            ("4k3/8/8/8/8/8/8/4X3 w - - 0 1", |e| matches!(e, InvalidPiece { symbol: 'X' })),
            ("4k3/8/8/8/8/8/8/4K3 x - - 0 1", |e| matches!(e, InvalidSide { .. })),
            ("4k3/8/8/8/8/8/8/4K3 w KX - 0 1", |e| matches!(e, InvalidCastling { .. })),
            ("4k3/8/8/8/8/8/8/4K3 w - e3 0 1", |e| matches!(e, InvalidEnPassant { .. })),
            ("4k3/8/8/8/8/8/8/4K3 w - - x 1", |e| matches!(e, InvalidHalfMoveClock { .. })),
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 0", |e| matches!(e, InvalidFullMoveNumber { .. })),
            ("4k2P/8/8/8/8/8/8/4K3 w - - 0 1", |e| {
                matches!(e, PawnOnBackRank { square } if square == "h8")
            }),
            ("4k3/8/8/8/8/8/8/p3K3 b - - 0 1", |e| {
                matches!(e, PawnOnBackRank { square } if square == "a1")
            }),
            ("4k3/8/8/3P4/8/8/8/4K3 w - e6 0 1", |e| matches!(e, InvalidEnPassant { .. })),
            ("4k3/4p3/8/3Pp3/8/8/8/4K3 w - e6 0 1", |e| matches!(e, InvalidEnPassant { .. })),
            ("4k3/8/4n3/3Pp3/8/8/8/4K3 w - e6 0 1", |e| matches!(e, InvalidEnPassant { .. })),
            ("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1", |e| {
                matches!(e, OpponentInCheck { colour: "black" })
            }),
        ];
        for (fen, check) in cases {
            let err = Position::from_fen(fen).unwrap_err();
            assert!(check(&err), "{fen}: unexpected {err:?}");
        }
    }

    #[test]
    fn king_count_is_checked() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap_err(),
            FenError::KingCount {
                colour: "black",
                count: 0
            }
        );
        assert!(matches!(
            Position::from_fen("kk6/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::KingCount { count: 2, .. })
        ));
    }
}
