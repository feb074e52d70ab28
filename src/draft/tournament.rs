//! Tournament-wide settings shared by every node of a search.

use serde::{Deserialize, Serialize};

use crate::draft::error::DraftError;
use crate::draft::faction::{Faction, Matchup};
use crate::draft::odds::MatchupOdds;

/// Immutable tournament configuration.
///
/// `round_count` counts every round including the decisive one, so a
/// tournament always has `round_count - 1` early rounds.
///
/// Deserialization goes through [`TournamentInfo::with_roster`], so parsed
/// values obey the same rules as constructed ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTournamentInfo")]
pub struct TournamentInfo {
    round_count: usize,
    odds: MatchupOdds,
    roster: Vec<Faction>,
}

/// Unchecked wire form of [`TournamentInfo`].
#[derive(Deserialize)]
struct RawTournamentInfo {
    round_count: usize,
    odds: MatchupOdds,
    #[serde(default)]
    roster: Option<Vec<Faction>>,
}

impl TryFrom<RawTournamentInfo> for TournamentInfo {
    type Error = DraftError;

    fn try_from(raw: RawTournamentInfo) -> Result<Self, Self::Error> {
        let roster = raw.roster.unwrap_or_else(|| Faction::ALL.to_vec());
        Self::with_roster(raw.round_count, raw.odds, roster)
    }
}

impl TournamentInfo {
    /// A tournament over the full seven-faction roster.
    pub fn new(round_count: usize, odds: MatchupOdds) -> Result<Self, DraftError> {
        Self::with_roster(round_count, odds, Faction::ALL.to_vec())
    }

    /// A tournament restricted to `roster`.
    ///
    /// The roster is deduplicated and sorted into generation order. Whether
    /// it is large enough for `round_count` is only discovered when a pool
    /// runs dry during move generation.
    pub fn with_roster(
        round_count: usize,
        odds: MatchupOdds,
        mut roster: Vec<Faction>,
    ) -> Result<Self, DraftError> {
        if round_count < 2 {
            return Err(DraftError::InvalidRoundCount { round_count });
        }
        roster.sort();
        roster.dedup();
        Ok(Self {
            round_count,
            odds,
            roster,
        })
    }

    /// Total rounds, decisive round included.
    pub fn round_count(&self) -> usize {
        self.round_count
    }

    /// Rounds played before the decisive round.
    pub fn early_round_count(&self) -> usize {
        self.round_count.saturating_sub(1)
    }

    pub fn odds(&self) -> &MatchupOdds {
        &self.odds
    }

    /// Factions available to both sides, in generation order.
    pub fn roster(&self) -> &[Faction] {
        &self.roster
    }

    /// Probability that P1 wins a round played as `matchup`.
    pub fn matchup_value(&self, matchup: Matchup) -> Result<f64, DraftError> {
        self.odds.lookup(matchup)
    }
}
