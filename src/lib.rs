pub mod attacks;
pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod fen;
pub mod game_state;
pub mod movegen;
pub mod moves;
pub mod perft;
pub mod piece;
pub mod piece_list;
pub mod search;
pub mod utils;
pub mod zobrist;

pub use board::Position;
pub use engine::{Engine, EngineMove};
pub use error::{EngineError, EngineResult, FenError, PositionError};
pub use movegen::{GameStatus, MoveGenerator, PromotionMode};
pub use moves::{Move, MoveFlag};
pub use piece::{Color, Piece};

/// Build the attack tables and Zobrist keys up front instead of on first use
pub fn init() {
    attacks::tables();
    zobrist::keys();
}
