//! Turin draft rules.
//!
//! The Turin format is played over `round_count` rounds. Each side drafts
//! one faction per round and may never reuse a faction it has already
//! committed to. The tournament goes to whichever side wins a strict
//! majority of rounds.
//!
//! ## Round Structure
//!
//! ```text
//! Early round (first mover by parity: P1, P2, P1, ...)
//! ├── first mover offers two prospects
//! ├── second mover counter-picks from its own pool
//! └── first mover commits to one prospect
//!
//! Decisive round (opened by the winner of the last early round, else P1)
//! ├── opener offers three prospects and bans one faction from the other pool
//! ├── other side counter-bans one prospect and counter-picks
//! └── opener commits to one of the two remaining prospects
//! ```
//!
//! ## Entry Points
//!
//! - [`search`]: optimal value for P1 plus the terminal state of one optimal line
//! - [`evaluate`]: exact value of an already complete draft
//! - [`analyze`]: every decision at a state, ranked for the side to move

pub mod config;
pub mod error;
pub mod evaluate;
pub mod faction;
pub mod game;
pub mod odds;
pub mod round;
pub mod rules;
pub mod state;
pub mod tournament;

pub use config::{ConfigError, OddsPreset, TournamentConfig};
pub use error::DraftError;
pub use evaluate::win_rate;
pub use faction::{Faction, Matchup, Pairing, ParseError};
pub use game::{analyze, evaluate, search, search_with, TurinDraft};
pub use odds::{MatchupOdds, OddsError};
pub use round::{DecisivePhase, DecisiveRound, EarlyPhase, EarlyRound};
pub use rules::{random_playout, successors};
pub use state::{GameState, Phase};
pub use tournament::TournamentInfo;
