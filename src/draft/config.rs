//! Tournament configuration loaded from JSON.
//!
//! A config names the round count, the faction roster and the odds table. The
//! table is either one of the built-in presets, an explicit set of
//! `"GC-KH": 0.4` entries, or a preset with explicit entries layered on top.
//!
//! ```json
//! {
//!   "name": "club night",
//!   "round_count": 3,
//!   "preset": "v1_2",
//!   "odds": { "KH-SL": 0.7 }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draft::error::DraftError;
use crate::draft::faction::{Faction, Matchup};
use crate::draft::odds::{MatchupOdds, OddsError};
use crate::draft::tournament::TournamentInfo;

/// Prospects offered in the decisive round; every pool must still hold this many.
const DECISIVE_PROSPECTS: usize = 3;

/// Built-in odds tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddsPreset {
    /// The V1.2 seven-faction reference table.
    V1_2,
    /// Every pairing at even odds.
    Uniform,
}

/// Errors from loading or validating a tournament config.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("round count must be at least 2, got {0}")]
    InvalidRoundCount(usize),

    #[error("{round_count} rounds need at least {needed} factions, roster has {roster_size}")]
    RosterTooSmall {
        round_count: usize,
        roster_size: usize,
        needed: usize,
    },

    #[error("faction {0} appears more than once in the roster")]
    DuplicateFaction(Faction),

    #[error("bad odds table: {0}")]
    Odds(#[from] OddsError),

    #[error(transparent)]
    Draft(#[from] DraftError),
}

/// Root configuration structure matching the JSON schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Label shown in reports.
    #[serde(default)]
    pub name: String,

    /// Total rounds, decisive round included.
    pub round_count: usize,

    /// Factions in play. Defaults to all seven.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster: Option<Vec<Faction>>,

    /// Explicit odds entries keyed `"GC-KH"`, layered over the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odds: Option<BTreeMap<String, f64>>,

    /// Base table. Defaults to V1.2 when no explicit odds are given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<OddsPreset>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            round_count: 3,
            roster: None,
            odds: None,
            preset: Some(OddsPreset::V1_2),
        }
    }
}

impl TournamentConfig {
    /// Create a config for the reference table.
    pub fn new(round_count: usize) -> Self {
        Self {
            round_count,
            ..Default::default()
        }
    }

    /// Builder method: set the label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder method: restrict the roster.
    pub fn with_roster(mut self, roster: Vec<Faction>) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Builder method: choose the base table.
    pub fn with_preset(mut self, preset: OddsPreset) -> Self {
        self.preset = Some(preset);
        self
    }

    /// Builder method: set one explicit odds entry.
    pub fn with_odds(mut self, matchup: Matchup, p: f64) -> Self {
        self.odds
            .get_or_insert_with(BTreeMap::new)
            .insert(matchup.to_string(), p);
        self
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The roster in play, in the order given.
    pub fn roster(&self) -> Vec<Faction> {
        self.roster.clone().unwrap_or_else(|| Faction::ALL.to_vec())
    }

    /// Validate the configuration.
    ///
    /// The odds table is checked entry by entry but not for coverage; a
    /// pairing missing from it only fails when a search reaches it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_count < 2 {
            return Err(ConfigError::InvalidRoundCount(self.round_count));
        }

        let roster = self.roster();
        let mut seen = Vec::with_capacity(roster.len());
        for faction in roster {
            if seen.contains(&faction) {
                return Err(ConfigError::DuplicateFaction(faction));
            }
            seen.push(faction);
        }

        // Each side spends one faction per early round and still needs a
        // full decisive offer.
        let needed = self.round_count - 1 + DECISIVE_PROSPECTS;
        if seen.len() < needed {
            return Err(ConfigError::RosterTooSmall {
                round_count: self.round_count,
                roster_size: seen.len(),
                needed,
            });
        }

        self.odds_table()?;
        Ok(())
    }

    /// Build the odds table: the preset first, explicit entries on top.
    pub fn odds_table(&self) -> Result<MatchupOdds, ConfigError> {
        let base = match (self.preset, &self.odds) {
            (Some(OddsPreset::V1_2), _) | (None, None) => MatchupOdds::v1_2(),
            (Some(OddsPreset::Uniform), _) => MatchupOdds::uniform(&self.roster()),
            (None, Some(_)) => MatchupOdds::new(),
        };

        let mut table = base;
        if let Some(entries) = &self.odds {
            let explicit = MatchupOdds::try_from(entries.clone())?;
            for (matchup, p) in explicit.entries() {
                table.overwrite(matchup, p)?;
            }
        }
        Ok(table)
    }

    /// Validate and convert into the immutable settings a search runs on.
    pub fn to_tournament_info(&self) -> Result<TournamentInfo, ConfigError> {
        self.validate()?;
        let info = TournamentInfo::with_roster(self.round_count, self.odds_table()?, self.roster())?;
        Ok(info)
    }
}
