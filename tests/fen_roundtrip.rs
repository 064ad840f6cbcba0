use alfil::zobrist::compute_key;
use alfil::{FenError, MoveGenerator, Position};

const FENS: [&str; 8] = [
    alfil::fen::STARTING_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
    "8/8/8/3pP3/8/8/8/k6K w - d6 0 57",
];

#[test]
fn fen_round_trips() {
    alfil::init();
    for fen in FENS {
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
        assert!(pos.is_consistent(), "{fen}");
        assert_eq!(pos.zobrist_key(), compute_key(&pos));

        let reparsed: Position = pos.to_fen().parse().unwrap();
        assert_eq!(reparsed, pos);
    }
}

#[test]
fn round_trip_survives_a_move_and_its_undo() {
    alfil::init();
    for fen in FENS {
        let mut pos = Position::from_fen(fen).unwrap();
        for mv in MoveGenerator::new().generate_moves(&mut pos, true) {
            pos.make_move(mv, false);
            let after = pos.to_fen();
            let reloaded = Position::from_fen(&after).unwrap();
            assert_eq!(reloaded.to_fen(), after);
            assert_eq!(reloaded.zobrist_key(), pos.zobrist_key(), "{fen} {mv}");
            pos.unmake_move(mv, false).unwrap();
            assert_eq!(pos.to_fen(), fen);
        }
    }
}

#[test]
fn double_pawn_push_sets_en_passant_square() {
    alfil::init();
    let mut pos = Position::start();
    let push = MoveGenerator::new()
        .generate_moves(&mut pos, true)
        .into_iter()
        .find(|m| m.to_uci() == "e2e4")
        .unwrap();
    pos.make_move(push, false);
    assert_eq!(
        pos.to_fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );
}

#[test]
fn counters_are_read_back() {
    alfil::init();
    let pos = Position::from_fen("8/8/8/3pP3/8/8/8/k6K w - d6 0 57").unwrap();
    assert_eq!(pos.halfmove_clock(), 0);
    assert_eq!(pos.fullmove_number(), 57);
    assert_eq!(pos.ep_square(), alfil::utils::parse_square("d6"));

    let black = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 31 12").unwrap();
    assert_eq!(black.halfmove_clock(), 31);
    assert_eq!(black.fullmove_number(), 12);
    assert_eq!(black.castling_rights(), 0);
}

#[test]
fn malformed_records_are_rejected() {
    alfil::init();
    let cases: [(&str, FenError); 9] = [
        (
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
            FenError::FieldCount { found: 4 },
        ),
        (
            "rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            FenError::RankCount { found: 7 },
        ),
        (
            "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            FenError::RankWidth { rank: 7, files: 7 },
        ),
        (
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1",
            FenError::InvalidPiece { symbol: 'X' },
        ),
        (
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            FenError::InvalidSide {
                found: "x".to_string(),
            },
        ),
        (
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkz - 0 1",
            FenError::InvalidCastling {
                found: "KQkz".to_string(),
            },
        ),
        (
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3 0 1",
            FenError::InvalidEnPassant {
                found: "e3".to_string(),
            },
        ),
        (
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1",
            FenError::InvalidHalfMoveClock {
                found: "x".to_string(),
            },
        ),
        (
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0",
            FenError::InvalidFullMoveNumber {
                found: "0".to_string(),
            },
        ),
    ];

    for (fen, expected) in cases {
        assert_eq!(Position::from_fen(fen).unwrap_err(), expected, "{fen}");
    }
}

#[test]
fn missing_or_extra_kings_are_rejected() {
    alfil::init();
    assert!(matches!(
        Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
        Err(FenError::KingCount { count: 0, .. })
    ));
    assert!(matches!(
        Position::from_fen("k7/8/8/8/8/8/8/3KK3 w - - 0 1"),
        Err(FenError::KingCount { count: 2, .. })
    ));
}

#[test]
fn impossible_positions_are_rejected() {
    alfil::init();
    assert_eq!(
        Position::from_fen("4k2P/8/8/8/8/8/8/4K3 w - - 0 1").unwrap_err(),
        FenError::PawnOnBackRank {
            square: "h8".to_string()
        }
    );
    assert_eq!(
        Position::from_fen("4k3/8/8/8/8/8/8/p3K3 w - - 0 1").unwrap_err(),
        FenError::PawnOnBackRank {
            square: "a1".to_string()
        }
    );
    // black is in check with white to move
    assert_eq!(
        Position::from_fen("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1").unwrap_err(),
        FenError::OpponentInCheck { colour: "black" }
    );
}

#[test]
fn en_passant_target_needs_a_pushed_pawn() {
    alfil::init();
    for fen in [
        // no black pawn on e5
        "4k3/8/8/3P4/8/8/8/4K3 w - e6 0 1",
        // the pawn's start square is occupied
        "4k3/4p3/8/3Pp3/8/8/8/4K3 w - e6 0 1",
        // the target square is occupied
        "4k3/8/4n3/3Pp3/8/8/8/4K3 w - e6 0 1",
        // white pawn on e4 with black to move
        "4k3/8/8/8/8/8/8/4K3 b - e3 0 1",
    ] {
        assert!(
            matches!(
                Position::from_fen(fen),
                Err(FenError::InvalidEnPassant { .. })
            ),
            "{fen}"
        );
    }

    // with the pawn in place the capture is generated and undoes cleanly
    let mut pos = Position::from_fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 1").unwrap();
    let before = pos.clone();
    let capture = MoveGenerator::new()
        .generate_moves(&mut pos, true)
        .into_iter()
        .find(|m| m.to_uci() == "d5e6")
        .unwrap();
    pos.make_move(capture, false);
    assert_eq!(pos.to_fen(), "4k3/8/4P3/8/8/8/8/4K3 b - - 0 1");
    pos.unmake_move(capture, false).unwrap();
    assert_eq!(pos, before);
}
