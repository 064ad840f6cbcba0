//! Main search implementation
//!
//! Fixed-depth negamax with fail-hard alpha-beta pruning. Leaves hand over
//! to a capture-only quiescence search so the static evaluation is never
//! taken in the middle of an exchange.

use super::ordering::order_moves;
use super::params::SearchParams;
use super::stats::SearchStats;
use crate::attacks::AttackTables;
use crate::board::Position;
use crate::error::PositionError;
use crate::eval::evaluate;
use crate::movegen::MoveGenerator;
use crate::moves::Move;

/// Window bound; also the score of being checkmated (negated)
pub const POSITIVE_INFINITY: i32 = 999_999_999;
pub const NEGATIVE_INFINITY: i32 = -POSITIVE_INFINITY;

/// Result of one `Search::run`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Selected root move; `None` when the depth was 0 or there are no legal moves
    pub best_move: Option<Move>,
    /// Score of the position from the side to move's point of view
    pub score: i32,
    pub depth: i32,
}

/// Main search engine
pub struct Search<'t> {
    generator: MoveGenerator<'t>,

    /// Search parameters
    params: SearchParams,

    /// Search statistics
    stats: SearchStats,

    best_move: Move,
}

impl Search<'static> {
    /// Search backed by the process-wide attack tables
    pub fn new(params: SearchParams) -> Self {
        Self::with_generator(MoveGenerator::new(), params)
    }
}

impl<'t> Search<'t> {
    pub fn with_tables(tables: &'t AttackTables, params: SearchParams) -> Self {
        Self::with_generator(MoveGenerator::with_tables(tables), params)
    }

    fn with_generator(generator: MoveGenerator<'t>, params: SearchParams) -> Self {
        let generator = generator.promotion_mode(params.promotion_mode);
        Self {
            generator,
            params,
            stats: SearchStats::new(),
            best_move: Move::NULL,
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Statistics of the last run
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Search `pos` to the configured depth
    pub fn run_default(&mut self, pos: &mut Position) -> Result<SearchOutcome, PositionError> {
        let depth = self.params.max_depth;
        self.run(pos, depth)
    }

    /// Search `pos` to `depth` plies. A depth of 0 or less evaluates the
    /// position with quiescence only and selects no move. The position is
    /// restored before returning.
    pub fn run(&mut self, pos: &mut Position, depth: i32) -> Result<SearchOutcome, PositionError> {
        self.stats.reset();
        self.stats.start_timing();
        self.best_move = Move::NULL;

        let score = if depth <= 0 {
            self.quiescence(pos, NEGATIVE_INFINITY, POSITIVE_INFINITY)?
        } else {
            self.search(pos, depth, NEGATIVE_INFINITY, POSITIVE_INFINITY, 0)?
        };

        self.stats.update_timing();
        log::debug!(
            "depth {} score {} best {} nodes {} qnodes {} cutoffs {} time {}ms",
            depth,
            score,
            self.best_move,
            self.stats.nodes,
            self.stats.qsearch_nodes,
            self.stats.cutoffs,
            self.stats.search_time.as_millis()
        );

        Ok(SearchOutcome {
            best_move: (!self.best_move.is_null()).then_some(self.best_move),
            score,
            depth,
        })
    }

    fn search(
        &mut self,
        pos: &mut Position,
        depth: i32,
        mut alpha: i32,
        beta: i32,
        ply_from_root: u32,
    ) -> Result<i32, PositionError> {
        if depth <= 0 {
            return self.quiescence(pos, alpha, beta);
        }
        self.stats.inc_node();

        let mut moves = self.generator.generate_moves(pos, true);
        if moves.is_empty() {
            return Ok(if self.generator.in_check() {
                NEGATIVE_INFINITY
            } else {
                0
            });
        }
        self.order(pos, &mut moves);

        for mv in moves {
            pos.make_move(mv, true);
            let eval = -self.search(pos, depth - 1, -beta, -alpha, ply_from_root + 1)?;
            pos.unmake_move(mv, true)?;

            // record before the cut-off test so a mating move at the root is kept;
            // the first move stands in until something beats it
            if ply_from_root == 0 && (eval > alpha || self.best_move.is_null()) {
                log::debug!("root move {} scored {}", mv, eval);
                self.best_move = mv;
            }

            if eval >= beta {
                self.stats.inc_cutoff();
                return Ok(beta);
            }
            if eval > alpha {
                alpha = eval;
            }
        }
        Ok(alpha)
    }

    fn quiescence(
        &mut self,
        pos: &mut Position,
        mut alpha: i32,
        beta: i32,
    ) -> Result<i32, PositionError> {
        self.stats.inc_qsearch_node();

        // standing pat: the side to move may decline every capture
        let stand_pat = evaluate(pos);
        if stand_pat >= beta {
            self.stats.inc_cutoff();
            return Ok(beta);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut captures = self.generator.generate_moves(pos, false);
        self.order(pos, &mut captures);

        for mv in captures {
            pos.make_move(mv, true);
            let eval = -self.quiescence(pos, -beta, -alpha)?;
            pos.unmake_move(mv, true)?;

            if eval >= beta {
                self.stats.inc_cutoff();
                return Ok(beta);
            }
            if eval > alpha {
                alpha = eval;
            }
        }
        Ok(alpha)
    }

    // must run right after generation: the pawn map belongs to the last generated position
    fn order(&self, pos: &Position, moves: &mut [Move]) {
        if self.params.order_moves {
            order_moves(pos, moves, self.generator.opponent_pawn_attack_map());
        }
    }
}
