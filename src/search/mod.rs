//! Minimax Search Module.
//!
//! This module provides a generic minimax searcher with alpha-beta pruning
//! for two-player, perfect-information games whose outcomes are scored as
//! the probability that the first player wins.
//!
//! # Overview
//!
//! The searcher walks the tree produced by [`Game::expand`]:
//! 1. Terminal states are scored by [`Game::evaluate`]
//! 2. P1 nodes keep the highest child value, P2 nodes the lowest
//! 3. Children that cannot change the parent's choice are skipped
//!
//! # Turn order
//!
//! Turn order is not plain alternation. Each expansion reports the boundary
//! its children cross ([`Transition`]), and [`next_mover`] decides who moves
//! at the children. When the same side keeps the move ([`is_double_turn`]),
//! cutoffs are suspended for that node so that both plies are treated as one
//! player's decision.
//!
//! # Example
//!
//! ```ignore
//! use turin_draft::search::{AlphaBeta, SearchConfig};
//!
//! let mut searcher = AlphaBeta::new(game, SearchConfig::default());
//! let result = searcher.search(&state)?;
//! println!("value {:.4} after {} nodes", result.value, result.stats.nodes_visited());
//! ```

pub mod config;
pub mod game;
pub mod minimax;

// Re-export main types for convenient access
pub use config::{SearchConfig, SearchStats};
pub use game::{is_double_turn, next_mover, Expansion, Game, Player, Transition};
pub use minimax::{AlphaBeta, RankedChoice, SearchResult, P1_FLOOR, P2_CEILING};
