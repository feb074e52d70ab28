//! Round records and phase inference.
//!
//! No phase is ever stored. What must happen next in a round is always
//! derived from which of its fields are populated, so the transitions in
//! [`rules`](crate::draft::rules) fill fields in exactly the order the
//! inference below expects.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::draft::faction::{Faction, Pairing};
use crate::search::Player;

/// Where an early round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EarlyPhase {
    /// The first mover has not offered prospects yet.
    NotStarted,
    /// Prospects offered; the second mover's counter-pick is pending.
    Offered,
    /// Counter-pick made; the first mover's final pick is pending.
    Countered,
    /// Both final picks made.
    Complete,
}

/// Where the decisive round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisivePhase {
    /// Prospects and ban pending.
    NotStarted,
    /// Prospects and ban set; counter-ban and counter-pick pending.
    Banned,
    /// Counter-ban and counter-pick set; the opener's final pick is pending.
    CounterBanned,
    /// Both final picks made.
    Complete,
}

/// One round before the decisive round.
///
/// The first mover offers two prospects, the second mover counter-picks
/// from their own pool, and the first mover then commits to one of the
/// prospects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EarlyRound {
    /// Factions offered by the first mover.
    #[serde(default)]
    pub prospects: Option<[Faction; 2]>,
    /// Final picks.
    #[serde(default)]
    pub pairing: Pairing,
    /// Who won the round, once played.
    #[serde(default)]
    pub winner: Option<Player>,
}

impl EarlyRound {
    /// A fresh round with the first mover's offer on the table.
    pub fn offered(prospects: [Faction; 2]) -> Self {
        Self {
            prospects: Some(prospects),
            ..Self::default()
        }
    }

    /// A resolved round given only its final picks.
    pub fn resolved(p1: Faction, p2: Faction) -> Self {
        Self {
            prospects: None,
            pairing: Pairing::new(Some(p1), Some(p2)),
            winner: None,
        }
    }

    /// Builder method: record who won the round.
    pub fn with_winner(mut self, winner: Player) -> Self {
        self.winner = Some(winner);
        self
    }

    /// Builder method: record the offer the round was played from.
    pub fn with_prospects(mut self, prospects: [Faction; 2]) -> Self {
        self.prospects = Some(prospects);
        self
    }

    pub fn is_complete(&self) -> bool {
        self.pairing.is_complete()
    }

    /// Classify the round given which side moves first in it.
    pub fn phase(&self, first: Player) -> EarlyPhase {
        if self.pairing.is_complete() {
            EarlyPhase::Complete
        } else if self.prospects.is_none() {
            EarlyPhase::NotStarted
        } else if self.pairing.pick(first.opponent()).is_none() {
            EarlyPhase::Offered
        } else {
            EarlyPhase::Countered
        }
    }
}

impl fmt::Display for EarlyRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prospects {
            Some([a, b]) => write!(f, "offer {}/{} -> {}", a, b, self.pairing)?,
            None => write!(f, "{}", self.pairing)?,
        }
        if let Some(winner) = self.winner {
            write!(f, " (won by {})", winner)?;
        }
        Ok(())
    }
}

/// The final round.
///
/// The opener offers three prospects and bans one faction from the other
/// side's pool. The other side counter-bans one prospect and counter-picks,
/// and the opener commits to one of the two surviving prospects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisiveRound {
    /// Factions offered by the opener.
    #[serde(default)]
    pub prospects: Option<[Faction; 3]>,
    /// Faction removed from the second mover's pool.
    #[serde(default)]
    pub ban: Option<Faction>,
    /// Prospect the opener may no longer pick.
    #[serde(default)]
    pub counter_ban: Option<Faction>,
    /// Final picks.
    #[serde(default)]
    pub pairing: Pairing,
}

impl DecisiveRound {
    /// A resolved decisive round given only its final picks.
    pub fn resolved(p1: Faction, p2: Faction) -> Self {
        Self {
            pairing: Pairing::new(Some(p1), Some(p2)),
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pairing.is_complete()
    }

    /// Whether nothing has been decided yet.
    pub fn is_untouched(&self) -> bool {
        *self == Self::default()
    }

    /// Classify the round.
    ///
    /// Unlike early rounds, the counter stage is marked by its own field,
    /// so the opener's identity is not needed.
    pub fn phase(&self) -> DecisivePhase {
        if self.pairing.is_complete() {
            DecisivePhase::Complete
        } else if self.prospects.is_none() {
            DecisivePhase::NotStarted
        } else if self.counter_ban.is_none() {
            DecisivePhase::Banned
        } else {
            DecisivePhase::CounterBanned
        }
    }

    /// Prospects the opener may still commit to.
    pub fn eligible_prospects(&self) -> Vec<Faction> {
        self.prospects
            .iter()
            .flatten()
            .copied()
            .filter(|&f| Some(f) != self.counter_ban)
            .collect()
    }
}

impl fmt::Display for DecisiveRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some([a, b, c]) = self.prospects {
            write!(f, "offer {}/{}/{} ", a, b, c)?;
        }
        if let Some(ban) = self.ban {
            write!(f, "ban {} ", ban)?;
        }
        if let Some(counter_ban) = self.counter_ban {
            write!(f, "counter-ban {} ", counter_ban)?;
        }
        write!(f, "-> {}", self.pairing)
    }
}
