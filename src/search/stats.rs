//! Search statistics
//!
//! Tracks nodes visited, beta cut-offs and timing for one `Search::run`.

use std::time::{Duration, Instant};

/// Search statistics
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Nodes visited by the main search
    pub nodes: u64,

    /// Quiescence nodes visited
    pub qsearch_nodes: u64,

    /// Beta cut-offs in either search
    pub cutoffs: u64,

    /// Search start time
    pub start_time: Option<Instant>,

    /// Time spent searching
    pub search_time: Duration,
}

impl SearchStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing
    pub fn start_timing(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Record elapsed time since `start_timing`
    pub fn update_timing(&mut self) {
        if let Some(start) = self.start_time {
            self.search_time = start.elapsed();
        }
    }

    #[inline]
    pub fn inc_node(&mut self) {
        self.nodes += 1;
    }

    #[inline]
    pub fn inc_qsearch_node(&mut self) {
        self.qsearch_nodes += 1;
    }

    #[inline]
    pub fn inc_cutoff(&mut self) {
        self.cutoffs += 1;
    }

    /// Nodes of both kinds
    pub fn total_nodes(&self) -> u64 {
        self.nodes + self.qsearch_nodes
    }

    /// Nodes per second over the recorded search time
    pub fn nps(&self) -> u64 {
        let ms = self.search_time.as_millis() as u64;
        if ms == 0 {
            0
        } else {
            self.total_nodes() * 1000 / ms
        }
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
