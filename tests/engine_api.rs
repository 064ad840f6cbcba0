use alfil::fen::STARTING_FEN;
use alfil::piece;
use alfil::search::SearchParams;
use alfil::{Color, Engine, EngineError, FenError, GameStatus};

const SCHOLAR_MATE_IN_ONE: &str =
    "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
const SCHOLAR_MATED: &str =
    "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4";

#[test]
fn engine_finds_mate() {
    alfil::init();
    let engine = Engine::new(Color::White);
    let mv = engine.choose_move(SCHOLAR_MATE_IN_ONE, 2).unwrap().unwrap();
    assert_eq!(mv.to_string(), "h5f7");
}

#[test]
fn engine_clamps_depth_to_one_ply() {
    alfil::init();
    // white pawn takes the undefended queen
    let engine = Engine::new(Color::White);
    let fen = "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1";
    let mv = engine.choose_move(fen, 0).unwrap();
    assert_eq!(mv.map(|m| m.to_string()), Some("e4d5".to_string()));
}

#[test]
fn engine_plays_black() {
    alfil::init();
    let engine = Engine::with_params(Color::Black, SearchParams::new().max_depth(2));
    let fen = "4k3/8/8/8/3Q4/4p3/8/4K3 b - - 0 1";
    let mv = engine.best_move(fen).unwrap();
    assert!(mv.is_some());
    assert_eq!(engine.colour(), Color::Black);
    assert_eq!(engine.params().max_depth, 2);
}

#[test]
fn engine_promotes() {
    alfil::init();
    let engine = Engine::new(Color::White);
    let mv = engine
        .choose_move("7k/P7/8/8/8/8/8/K7 w - - 0 1", 2)
        .unwrap()
        .unwrap();
    assert_eq!(mv.to_string(), "a7a8q");
    assert_eq!(mv.promotion, Some(piece::QUEEN));
}

#[test]
fn no_move_when_game_is_over() {
    alfil::init();
    let engine = Engine::new(Color::Black);
    assert_eq!(engine.choose_move(SCHOLAR_MATED, 3).unwrap(), None);
    assert_eq!(engine.status(SCHOLAR_MATED).unwrap(), GameStatus::Checkmate);
    assert!(engine.in_check(SCHOLAR_MATED).unwrap());
}

#[test]
fn status_of_running_game() {
    alfil::init();
    let engine = Engine::new(Color::White);
    assert_eq!(engine.status(STARTING_FEN).unwrap(), GameStatus::Ongoing);
    assert!(!engine.in_check(STARTING_FEN).unwrap());
}

#[test]
fn destinations_of_pieces() {
    alfil::init();
    let engine = Engine::new(Color::White);
    assert_eq!(
        engine.destinations(STARTING_FEN, "g1").unwrap(),
        vec!["f3", "h3"]
    );
    assert_eq!(
        engine.destinations(STARTING_FEN, "e2").unwrap(),
        vec!["e3", "e4"]
    );
    assert!(engine.destinations(STARTING_FEN, "e4").unwrap().is_empty());
    // opponent pieces have no moves on our turn
    assert!(engine.destinations(STARTING_FEN, "e7").unwrap().is_empty());
}

#[test]
fn promotion_destinations_are_listed_once() {
    alfil::init();
    let engine = Engine::new(Color::White);
    assert_eq!(
        engine
            .destinations("7k/P7/8/8/8/8/8/K7 w - - 0 1", "a7")
            .unwrap(),
        vec!["a8"]
    );
}

#[test]
fn bad_input_is_reported() {
    alfil::init();
    let engine = Engine::new(Color::White);
    assert_eq!(
        engine.choose_move("not a position", 2).unwrap_err(),
        EngineError::Fen(FenError::FieldCount { found: 3 })
    );
    assert!(matches!(
        engine.destinations(STARTING_FEN, "i1"),
        Err(EngineError::InvalidSquare { .. })
    ));
}

#[test]
fn impossible_positions_are_errors_not_panics() {
    alfil::init();
    let engine = Engine::new(Color::White);
    for fen in [
        "4k2P/8/8/8/8/8/8/4K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/p3K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/4R1K1 w - - 0 1",
        "4k3/8/8/3P4/8/8/8/4K3 w - e6 0 1",
    ] {
        assert!(
            matches!(engine.choose_move(fen, 2), Err(EngineError::Fen(_))),
            "{fen}"
        );
        assert!(engine.status(fen).is_err(), "{fen}");
        assert!(engine.in_check(fen).is_err(), "{fen}");
        assert!(engine.destinations(fen, "e1").is_err(), "{fen}");
    }
}
