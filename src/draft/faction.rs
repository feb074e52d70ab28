//! Factions and matchups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::Player;

/// A playable faction.
///
/// The set is closed; ordering follows the short codes alphabetically and
/// fixes the order in which moves are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Faction {
    GC,
    KH,
    KI,
    NG,
    OK,
    SL,
    TZ,
}

impl Faction {
    /// Every faction, in generation order.
    pub const ALL: [Faction; 7] = [
        Faction::GC,
        Faction::KH,
        Faction::KI,
        Faction::NG,
        Faction::OK,
        Faction::SL,
        Faction::TZ,
    ];

    /// Two-letter code used in odds tables and state files.
    pub fn code(&self) -> &'static str {
        match self {
            Faction::GC => "GC",
            Faction::KH => "KH",
            Faction::KI => "KI",
            Faction::NG => "NG",
            Faction::OK => "OK",
            Faction::SL => "SL",
            Faction::TZ => "TZ",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Faction::GC => "Grand Cathay",
            Faction::KH => "Khorne",
            Faction::KI => "Kislev",
            Faction::NG => "Nurgle",
            Faction::OK => "Ogre Kingdoms",
            Faction::SL => "Slaanesh",
            Faction::TZ => "Tzeentch",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors from parsing faction codes and matchup keys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown faction code '{0}'")]
    UnknownFaction(String),

    #[error("matchup key '{0}' is not of the form 'GC-KH'")]
    MalformedMatchup(String),
}

impl FromStr for Faction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Faction::ALL
            .iter()
            .copied()
            .find(|f| f.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ParseError::UnknownFaction(s.to_string()))
    }
}

/// A realized pairing: P1's faction against P2's faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Matchup {
    pub p1: Faction,
    pub p2: Faction,
}

impl Matchup {
    pub fn new(p1: Faction, p2: Faction) -> Self {
        Self { p1, p2 }
    }

    /// The same pairing seen from the other side.
    pub fn reversed(&self) -> Self {
        Self {
            p1: self.p2,
            p2: self.p1,
        }
    }

    pub fn is_mirror(&self) -> bool {
        self.p1 == self.p2
    }
}

impl fmt::Display for Matchup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.p1, self.p2)
    }
}

impl FromStr for Matchup {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (p1, p2) = s
            .split_once('-')
            .ok_or_else(|| ParseError::MalformedMatchup(s.to_string()))?;
        Ok(Matchup::new(p1.parse()?, p2.parse()?))
    }
}

/// A matchup whose sides are filled in one at a time.
///
/// `None` marks a side that has not made its final pick yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    #[serde(default)]
    pub p1: Option<Faction>,
    #[serde(default)]
    pub p2: Option<Faction>,
}

impl Pairing {
    pub fn new(p1: Option<Faction>, p2: Option<Faction>) -> Self {
        Self { p1, p2 }
    }

    /// The final pick of `player`, if made.
    pub fn pick(&self, player: Player) -> Option<Faction> {
        match player {
            Player::P1 => self.p1,
            Player::P2 => self.p2,
        }
    }

    /// A copy with `player`'s final pick set.
    pub fn with_pick(mut self, player: Player, faction: Faction) -> Self {
        match player {
            Player::P1 => self.p1 = Some(faction),
            Player::P2 => self.p2 = Some(faction),
        }
        self
    }

    pub fn is_complete(&self) -> bool {
        self.p1.is_some() && self.p2.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.p1.is_none() && self.p2.is_none()
    }

    /// The realized matchup once both sides have picked.
    pub fn matchup(&self) -> Option<Matchup> {
        match (self.p1, self.p2) {
            (Some(p1), Some(p2)) => Some(Matchup::new(p1, p2)),
            _ => None,
        }
    }
}

impl From<Matchup> for Pairing {
    fn from(matchup: Matchup) -> Self {
        Pairing::new(Some(matchup.p1), Some(matchup.p2))
    }
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |pick: Option<Faction>| pick.map_or("??", |p| p.code());
        write!(f, "{}-{}", side(self.p1), side(self.p2))
    }
}
