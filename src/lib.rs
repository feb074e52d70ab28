//! # Turin Draft
//!
//! An exact solver for the two-player "Turin" faction draft: given a table of
//! matchup odds, it finds the pick/ban line that maximizes the first player's
//! chance of winning the tournament, and that chance itself.
//!
//! ## Features
//!
//! - **Generic Search Engine**: Alpha-beta minimax over any game implementing the `Game` trait
//! - **Non-alternating Turns**: Turn order comes from the game, so one side may move twice
//! - **Exact Evaluation**: Tournament win probability by full enumeration of round outcomes
//! - **Root Analysis**: Ranks every decision at a state, not just the best one
//!
//! ## Quick Start
//!
//! ```ignore
//! use turin_draft::draft::{search, GameState, MatchupOdds, TournamentInfo};
//!
//! let info = TournamentInfo::new(3, MatchupOdds::v1_2())?;
//! let result = search(&info, &GameState::new())?;
//! println!("P1 wins with probability {:.4}", result.value);
//! println!("{}", result.line);
//! ```
//!
//! ## Modules
//!
//! - [`search`]: Game trait and the generic alpha-beta searcher
//! - [`draft`]: Turin rules, odds tables, evaluator and configuration
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Alpha-Beta Search (Generic)                   │
//! │  - Minimax with cutoffs     - next_mover turn selection         │
//! │  - Root analysis            - Search statistics                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ implements Game trait
//!                               ▼
//!                      ┌─────────────────┐
//!                      │   Turin Draft   │
//!                      │ rules, evaluate │
//!                      └─────────────────┘
//! ```

/// Generic minimax search module.
///
/// Knows nothing about factions or rounds; games plug in through the `Game` trait.
pub mod search;

/// Turin draft module.
///
/// Rules, state model, odds tables and the tournament evaluator.
pub mod draft;

// Re-export commonly used types at crate root for convenience
pub use draft::{DraftError, GameState, MatchupOdds, TournamentConfig, TournamentInfo};
pub use search::{AlphaBeta, Game, Player, SearchConfig, SearchResult, SearchStats};
