//! Minimax search with alpha-beta pruning.
//!
//! The searcher is generic over any game that implements the `Game` trait.
//! Values are always the probability that P1 wins, so P1 maximizes and P2
//! minimizes. Who moves next is decided by [`next_mover`] rather than by a
//! blind flip, and cutoffs are suspended on the edges where the same side
//! keeps the move.

use std::time::Instant;

use log::{debug, trace};

use crate::search::config::{SearchConfig, SearchStats};
use crate::search::game::{is_double_turn, next_mover, Game, Player};

/// Initial alpha: worse for P1 than any real probability.
pub const P1_FLOOR: f64 = -1.0;

/// Initial beta: worse for P2 than any real probability.
pub const P2_CEILING: f64 = 2.0;

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct SearchResult<S> {
    /// Probability that P1 wins under optimal play by both sides.
    pub value: f64,
    /// Terminal state reached by the recommended line.
    pub line: S,
    /// Counters gathered during the search.
    pub stats: SearchStats,
}

/// One legal decision at the root, scored by optimal play after it.
#[derive(Debug, Clone)]
pub struct RankedChoice<S> {
    /// The state right after the decision.
    pub choice: S,
    /// Probability that P1 wins after this decision.
    pub value: f64,
    /// Terminal state reached by optimal play from `choice`.
    pub line: S,
}

/// The minimax searcher.
///
/// # Example
/// ```ignore
/// use turin_draft::search::{AlphaBeta, SearchConfig};
///
/// let mut searcher = AlphaBeta::new(my_game, SearchConfig::default());
/// let result = searcher.search(&state)?;
/// println!("P1 wins with probability {:.3}", result.value);
/// ```
#[derive(Debug, Clone)]
pub struct AlphaBeta<G: Game> {
    /// The game being searched.
    game: G,

    /// Configuration for the searcher.
    config: SearchConfig,

    /// Statistics of the most recent search.
    stats: SearchStats,
}

impl<G: Game> AlphaBeta<G> {
    /// Create a new searcher for the given game.
    pub fn new(game: G, config: SearchConfig) -> Self {
        Self {
            game,
            config,
            stats: SearchStats::new(),
        }
    }

    /// Find the value of `state` and one line that achieves it.
    ///
    /// The side to move at the root is taken from the game itself.
    pub fn search(&mut self, state: &G::State) -> Result<SearchResult<G::State>, G::Error> {
        let maximizing = if self.game.is_terminal(state) {
            true
        } else {
            self.game.to_move(state)?.is_maximizing()
        };
        self.search_window(state, maximizing, P1_FLOOR, P2_CEILING)
    }

    /// Search with an explicit root mover and window.
    ///
    /// Callers starting a fresh search pass `P1_FLOOR` and `P2_CEILING`.
    pub fn search_window(
        &mut self,
        state: &G::State,
        maximizing: bool,
        alpha: f64,
        beta: f64,
    ) -> Result<SearchResult<G::State>, G::Error> {
        self.stats = SearchStats::new();
        let start_time = Instant::now();
        debug!(
            "search start: mover={} pruning={}",
            Player::from_maximizing(maximizing),
            self.config.use_pruning
        );

        let (value, line) = self.minimax(state, maximizing, alpha, beta)?;

        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        debug!(
            "search done: value={:.6} expanded={} leaves={} cutoffs={} double_turns={} in {:.3}s",
            value,
            self.stats.nodes_expanded,
            self.stats.leaves_evaluated,
            self.stats.cutoffs,
            self.stats.double_turns,
            self.stats.elapsed_seconds
        );

        Ok(SearchResult {
            value,
            line,
            stats: self.stats.clone(),
        })
    }

    /// Score every legal decision at `state` and return the best `top_n`.
    ///
    /// Each decision is searched with a full window so its value is exact.
    /// Results are ordered best-for-the-mover first; ties keep generation
    /// order.
    pub fn analyze(
        &mut self,
        state: &G::State,
        top_n: usize,
    ) -> Result<Vec<RankedChoice<G::State>>, G::Error> {
        self.stats = SearchStats::new();
        let start_time = Instant::now();

        if self.game.is_terminal(state) {
            return Ok(Vec::new());
        }

        let current = self.game.to_move(state)?;
        let expansion = self.game.expand(state)?;
        self.stats.nodes_expanded += 1;

        let next = next_mover(current, expansion.transition, expansion.last_winner);
        if next == current {
            self.stats.double_turns += 1;
        }

        let mut ranked = Vec::with_capacity(expansion.children.len());
        for child in expansion.children {
            let (value, line) = self.minimax(&child, next.is_maximizing(), P1_FLOOR, P2_CEILING)?;
            ranked.push(RankedChoice {
                choice: child,
                value,
                line,
            });
        }

        if current.is_maximizing() {
            ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
        } else {
            ranked.sort_by(|a, b| a.value.total_cmp(&b.value));
        }
        ranked.truncate(top_n);

        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        debug!(
            "analysis done: mover={} kept={} expanded={} leaves={} in {:.3}s",
            current,
            ranked.len(),
            self.stats.nodes_expanded,
            self.stats.leaves_evaluated,
            self.stats.elapsed_seconds
        );

        Ok(ranked)
    }

    /// Core recursive walk.
    ///
    /// Returns the (possibly bounded) value of `state` and the terminal state
    /// of the best line found below it.
    fn minimax(
        &mut self,
        state: &G::State,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
    ) -> Result<(f64, G::State), G::Error> {
        if self.game.is_terminal(state) {
            return self.leaf(state);
        }

        let expansion = self.game.expand(state)?;
        if expansion.children.is_empty() {
            // Let the game's evaluator reject the non-terminal state.
            return self.leaf(state);
        }
        self.stats.nodes_expanded += 1;

        let current = Player::from_maximizing(maximizing);
        let next = next_mover(current, expansion.transition, expansion.last_winner);
        let double_turn = is_double_turn(current, expansion.transition, expansion.last_winner);
        if double_turn {
            self.stats.double_turns += 1;
            trace!("{} keeps the move into the decisive round", current);
        }
        let may_prune = self.config.use_pruning && !double_turn;

        let remaining = expansion.children.len();
        let mut best: Option<(f64, G::State)> = None;

        for (i, child) in expansion.children.into_iter().enumerate() {
            let (value, line) = self.minimax(&child, next.is_maximizing(), alpha, beta)?;

            let improves = match &best {
                None => true,
                Some((best_value, _)) if maximizing => value > *best_value,
                Some((best_value, _)) => value < *best_value,
            };
            if improves {
                best = Some((value, line));
            }

            if let Some((best_value, _)) = &best {
                if maximizing {
                    alpha = alpha.max(*best_value);
                } else {
                    beta = beta.min(*best_value);
                }
            }

            if may_prune && beta <= alpha {
                if i + 1 < remaining {
                    self.stats.cutoffs += 1;
                    trace!("cutoff after {}/{} children (alpha={:.4} beta={:.4})", i + 1, remaining, alpha, beta);
                }
                break;
            }
        }

        match best {
            Some(found) => Ok(found),
            None => self.leaf(state),
        }
    }

    fn leaf(&mut self, state: &G::State) -> Result<(f64, G::State), G::Error> {
        self.stats.leaves_evaluated += 1;
        let value = self.game.evaluate(state)?;
        Ok((value, state.clone()))
    }

    /// Get statistics of the most recent search or analysis.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get reference to the game.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}
