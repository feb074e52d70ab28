//! Game trait definition for the minimax searcher.
//!
//! Any two-player, perfect-information, zero-sum game whose terminal states
//! can be scored as a probability for the first player can be searched by
//! implementing the `Game` trait.

use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

/// One of the two sides of a game.
///
/// `P1` is the maximizing side: every value the searcher reports is the
/// probability that `P1` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// The first player (maximizer).
    P1,
    /// The second player (minimizer).
    P2,
}

impl Player {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    /// Whether this side maximizes the searched value.
    pub fn is_maximizing(self) -> bool {
        self == Player::P1
    }

    /// The side that maximizes (`true`) or minimizes (`false`).
    pub fn from_maximizing(maximizing: bool) -> Self {
        if maximizing {
            Player::P1
        } else {
            Player::P2
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::P1 => write!(f, "P1"),
            Player::P2 => write!(f, "P2"),
        }
    }
}

/// What kind of boundary one ply crosses.
///
/// All children of a node cross the same boundary, so this is reported once
/// per expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// The move stays inside the current round.
    WithinRound,
    /// The move closes an early round and opens the next early round.
    NextRound,
    /// The move closes the last early round and opens the decisive round.
    IntoDecisive,
}

/// One level of the game tree below a node.
#[derive(Debug, Clone)]
pub struct Expansion<S> {
    /// Boundary crossed by every child.
    pub transition: Transition,
    /// Recorded winner of the round being closed, if the caller supplied one.
    ///
    /// Only meaningful for [`Transition::IntoDecisive`].
    pub last_winner: Option<Player>,
    /// Legal next states, in a stable order.
    pub children: Vec<S>,
}

/// Who decides at the child of a node decided by `current`.
///
/// Inside a round and between early rounds the move always passes to the
/// opponent. The decisive round is opened by the winner of the preceding
/// round (P1 when no winner is recorded), so that side may move twice in a
/// row across the boundary.
pub fn next_mover(current: Player, transition: Transition, last_winner: Option<Player>) -> Player {
    match transition {
        Transition::WithinRound | Transition::NextRound => current.opponent(),
        Transition::IntoDecisive => last_winner.unwrap_or(Player::P1),
    }
}

/// Whether the child of a node decided by `current` is decided by the same side.
///
/// Pruning is suspended on exactly these edges.
pub fn is_double_turn(current: Player, transition: Transition, last_winner: Option<Player>) -> bool {
    next_mover(current, transition, last_winner) == current
}

/// The main Game trait that defines the interface for any searchable game.
///
/// Implement this trait to use the [`AlphaBeta`](crate::search::AlphaBeta)
/// searcher with your game.
///
/// # Example
/// ```ignore
/// struct MyGame;
///
/// impl Game for MyGame {
///     type State = MyGameState;
///     type Error = MyError;
///
///     // ... implement required methods
/// }
/// ```
pub trait Game: Clone {
    /// The type representing a complete game state.
    type State: Clone + Debug;

    /// Error raised by move generation or evaluation.
    type Error: std::error::Error;

    /// Check if the given state is terminal (fully decided).
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// The side that decides at a non-terminal state.
    ///
    /// Must agree with [`next_mover`] along every edge returned by `expand`.
    fn to_move(&self, state: &Self::State) -> Result<Player, Self::Error>;

    /// Enumerate every legal next state.
    ///
    /// Never called on terminal states. Implementations report an error
    /// instead of returning an empty expansion.
    fn expand(&self, state: &Self::State) -> Result<Expansion<Self::State>, Self::Error>;

    /// Score a terminal state as the probability that P1 wins.
    fn evaluate(&self, state: &Self::State) -> Result<f64, Self::Error>;
}
