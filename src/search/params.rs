//! Search parameters and configuration
//!
//! Controls the fixed search depth, which promotions the generator
//! emits, and whether moves are ordered before each node's loop.

use crate::movegen::PromotionMode;

/// Search parameters for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search depth in plies used when the caller does not give one
    pub max_depth: i32,

    /// Under-promotions considered by the search
    pub promotion_mode: PromotionMode,

    /// Sort moves by the ordering heuristic before searching them
    pub order_moves: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_depth: 4,
            promotion_mode: PromotionMode::All,
            order_moves: true,
        }
    }
}

impl SearchParams {
    /// Create new search params with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set search depth in plies
    pub fn max_depth(mut self, depth: i32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set which promotions are generated
    pub fn promotion_mode(mut self, mode: PromotionMode) -> Self {
        self.promotion_mode = mode;
        self
    }

    /// Enable or disable move ordering
    pub fn order_moves(mut self, enable: bool) -> Self {
        self.order_moves = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let params = SearchParams::new()
            .max_depth(6)
            .promotion_mode(PromotionMode::QueenOnly)
            .order_moves(false);
        assert_eq!(params.max_depth, 6);
        assert_eq!(params.promotion_mode, PromotionMode::QueenOnly);
        assert!(!params.order_moves);
        assert!(SearchParams::default().order_moves);
    }
}
