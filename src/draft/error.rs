//! Error types for the draft rules and evaluator.

use thiserror::Error;

use crate::draft::faction::Matchup;
use crate::search::Player;

/// Failures raised by odds lookups, move generation and evaluation.
///
/// None of these are recoverable inside a search: they abort the current
/// call and carry enough context to diagnose the input.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DraftError {
    #[error("no odds for {matchup} in either orientation")]
    MissingOdds { matchup: Matchup },

    #[error("odds for {matchup} must be within [0, 1], got {value}")]
    InvalidProbability { matchup: Matchup, value: f64 },

    #[error("odds for {matchup} ({value}) contradict the reversed pairing ({reverse})")]
    AsymmetricOdds {
        matchup: Matchup,
        value: f64,
        reverse: f64,
    },

    #[error("round count must be at least 2, got {round_count}")]
    InvalidRoundCount { round_count: usize },

    #[error("round {round} does not have both picks assigned")]
    IncompleteRound { round: usize },

    #[error("expected {expected} rounds but the state holds {actual}")]
    RoundCountMismatch { expected: usize, actual: usize },

    #[error("{player} needs {needed} factions but only {available} remain")]
    PoolExhausted {
        player: Player,
        needed: usize,
        available: usize,
    },

    #[error("invalid draft state: {reason}")]
    InvalidState { reason: String },
}

impl DraftError {
    pub(crate) fn invalid_state(reason: impl Into<String>) -> Self {
        DraftError::InvalidState {
            reason: reason.into(),
        }
    }
}
