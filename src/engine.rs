//! Engine entry point for a UI layer
//!
//! Everything goes in and out as text: position strings in, coordinate
//! moves and square names out. Each call parses its own `Position`, so an
//! `Engine` holds no state besides its colour and search parameters.

use crate::board::Position;
use crate::error::{EngineError, EngineResult};
use crate::movegen::{self, GameStatus, MoveGenerator};
use crate::moves::{promotion_char, Move};
use crate::piece::{self, Color, PieceType};
use crate::search::{Search, SearchParams};
use crate::utils::{parse_square, square_name, Square};
use std::fmt;

/// Move selected by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl From<Move> for EngineMove {
    fn from(mv: Move) -> Self {
        let kind = mv.promotion_kind();
        EngineMove {
            from: mv.from(),
            to: mv.to(),
            promotion: (kind != piece::NONE).then_some(kind),
        }
    }
}

impl fmt::Display for EngineMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", square_name(self.from), square_name(self.to))?;
        if let Some(c) = self.promotion.and_then(promotion_char) {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    colour: Color,
    params: SearchParams,
}

impl Engine {
    pub fn new(colour: Color) -> Self {
        Self::with_params(colour, SearchParams::default())
    }

    pub fn with_params(colour: Color, params: SearchParams) -> Self {
        Self { colour, params }
    }

    pub fn colour(&self) -> Color {
        self.colour
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Pick a move for the position described by `fen`, searching `depth`
    /// plies (at least one). Returns `None` when the game is over or when
    /// it is not this engine's turn.
    pub fn choose_move(&self, fen: &str, depth: i32) -> EngineResult<Option<EngineMove>> {
        let mut pos = Position::from_fen(fen)?;
        if pos.side_to_move() != self.colour {
            log::warn!(
                "asked to move for {} but engine plays {}",
                pos.side_to_move().name(),
                self.colour.name()
            );
            return Ok(None);
        }

        let depth = depth.max(1);
        let mut search = Search::new(self.params.clone());
        let outcome = search.run(&mut pos, depth)?;

        match outcome.best_move {
            Some(mv) => {
                log::info!(
                    "{} plays {} (score {}, depth {}, {} nodes)",
                    self.colour.name(),
                    mv,
                    outcome.score,
                    depth,
                    search.stats().total_nodes()
                );
                Ok(Some(mv.into()))
            }
            None => {
                log::info!("no legal move for {}", self.colour.name());
                Ok(None)
            }
        }
    }

    /// `choose_move` at the configured default depth
    pub fn best_move(&self, fen: &str) -> EngineResult<Option<EngineMove>> {
        self.choose_move(fen, self.params.max_depth)
    }

    /// Whether the side to move is in check
    pub fn in_check(&self, fen: &str) -> EngineResult<bool> {
        let mut pos = Position::from_fen(fen)?;
        let mut generator = MoveGenerator::new();
        generator.generate_moves(&mut pos, false);
        Ok(generator.in_check())
    }

    /// Names of the squares the piece on `square` can legally move to
    pub fn destinations(&self, fen: &str, square: &str) -> EngineResult<Vec<String>> {
        let from = parse_square(square).ok_or_else(|| EngineError::InvalidSquare {
            name: square.to_string(),
        })?;
        let mut pos = Position::from_fen(fen)?;
        Ok(movegen::legal_destinations(&mut pos, from)
            .into_iter()
            .map(square_name)
            .collect())
    }

    pub fn status(&self, fen: &str) -> EngineResult<GameStatus> {
        let mut pos = Position::from_fen(fen)?;
        Ok(movegen::game_status(&mut pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_move_display() {
        let mv = EngineMove {
            from: 52,
            to: 60,
            promotion: Some(piece::QUEEN),
        };
        assert_eq!(mv.to_string(), "e7e8q");
        let quiet: EngineMove = Move::new(12, 28).into();
        assert_eq!(quiet.promotion, None);
        assert_eq!(quiet.to_string(), "e2e4");
    }

    #[test]
    fn wrong_side_gets_no_move() {
        let engine = Engine::new(Color::Black);
        let fen = crate::fen::STARTING_FEN;
        assert_eq!(engine.choose_move(fen, 2).unwrap(), None);
    }

    #[test]
    fn bad_square_name_is_an_error() {
        let engine = Engine::new(Color::White);
        let err = engine
            .destinations(crate::fen::STARTING_FEN, "z9")
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidSquare {
                name: "z9".to_string()
            }
        );
    }
}
