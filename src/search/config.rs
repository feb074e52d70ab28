//! Configuration options for the minimax searcher.
//!
//! This module provides the knobs that control how the tree is walked and
//! the statistics gathered while walking it.

use serde::{Deserialize, Serialize};

/// Configuration for the searcher.
///
/// # Example
/// ```
/// use turin_draft::search::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert!(config.use_pruning); // alpha-beta is enabled by default
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Use alpha-beta cutoffs.
    ///
    /// Disabling this walks the full tree. The value and the recommended
    /// line are identical either way; only the node count changes.
    pub use_pruning: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { use_pruning: true }
    }
}

impl SearchConfig {
    /// Create a new SearchConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration that visits every node (no cutoffs).
    pub fn exhaustive() -> Self {
        Self { use_pruning: false }
    }

    /// Builder method: set whether to use alpha-beta cutoffs.
    pub fn with_pruning(mut self, enable: bool) -> Self {
        self.use_pruning = enable;
        self
    }
}

/// Statistics tracked during one search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Interior nodes whose children were generated.
    pub nodes_expanded: u64,

    /// Terminal states scored by the evaluator.
    pub leaves_evaluated: u64,

    /// Times a node stopped considering further children.
    pub cutoffs: u64,

    /// Nodes whose children are decided by the same side again.
    pub double_turns: u64,

    /// Total time spent searching (in seconds).
    pub elapsed_seconds: f64,
}

impl SearchStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total nodes touched, interior and terminal.
    pub fn nodes_visited(&self) -> u64 {
        self.nodes_expanded + self.leaves_evaluated
    }

    /// Nodes touched per second.
    pub fn nodes_per_second(&self) -> f64 {
        if self.elapsed_seconds > 0.0 {
            self.nodes_visited() as f64 / self.elapsed_seconds
        } else {
            0.0
        }
    }

    /// Fold the counters of another search into this one.
    pub fn absorb(&mut self, other: &SearchStats) {
        self.nodes_expanded += other.nodes_expanded;
        self.leaves_evaluated += other.leaves_evaluated;
        self.cutoffs += other.cutoffs;
        self.double_turns += other.double_turns;
        self.elapsed_seconds += other.elapsed_seconds;
    }
}
