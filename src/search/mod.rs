//! Search engine for the alfil position engine
//!
//! Negamax alpha-beta with quiescence, move ordering, configuration and
//! counters.

pub mod ordering;
pub mod params;
pub mod search;
pub mod stats;

pub use self::ordering::order_moves;
pub use self::params::SearchParams;
pub use self::search::{Search, SearchOutcome, NEGATIVE_INFINITY, POSITIVE_INFINITY};
pub use self::stats::SearchStats;
pub use crate::moves::Move;
