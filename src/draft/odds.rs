//! Matchup odds tables.
//!
//! A table maps a matchup to the probability that its P1 side wins the round.
//! Only one orientation of each pairing needs to be stored; the other is
//! derived as `1 - p`. Tables that would break `p(a, b) + p(b, a) == 1` are
//! rejected on insert.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draft::error::DraftError;
use crate::draft::faction::{Faction, Matchup, ParseError};

/// Slack allowed when checking `p(a, b) + p(b, a) == 1`.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Probability table for single-round matchups.
///
/// Serialized as a JSON object keyed by `"GC-KH"` style matchup strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct MatchupOdds {
    table: FxHashMap<Matchup, f64>,
}

/// Errors from reading an odds table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OddsError {
    #[error(transparent)]
    Key(#[from] ParseError),

    #[error(transparent)]
    Value(#[from] DraftError),
}

impl MatchupOdds {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(matchup, probability)` entries.
    pub fn from_entries<I>(entries: I) -> Result<Self, DraftError>
    where
        I: IntoIterator<Item = (Matchup, f64)>,
    {
        let mut odds = Self::new();
        for (matchup, p) in entries {
            odds.insert(matchup, p)?;
        }
        Ok(odds)
    }

    /// Store the probability that `matchup.p1` wins.
    ///
    /// Replaces any entry for the same orientation. A mirror matchup must be
    /// even, and if the reversed pairing is already stored the two must sum
    /// to 1.
    pub fn insert(&mut self, matchup: Matchup, p: f64) -> Result<(), DraftError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(DraftError::InvalidProbability { matchup, value: p });
        }
        let reverse = if matchup.is_mirror() {
            Some(p)
        } else {
            self.table.get(&matchup.reversed()).copied()
        };
        if let Some(q) = reverse {
            if (p + q - 1.0).abs() > SYMMETRY_TOLERANCE {
                return Err(DraftError::AsymmetricOdds {
                    matchup,
                    value: p,
                    reverse: q,
                });
            }
        }
        self.table.insert(matchup, p);
        Ok(())
    }

    /// Like [`insert`](Self::insert), but drops the reversed entry first so
    /// the new value replaces the pairing in either orientation.
    pub fn overwrite(&mut self, matchup: Matchup, p: f64) -> Result<(), DraftError> {
        if !matchup.is_mirror() {
            if let Some(q) = self.table.remove(&matchup.reversed()) {
                if let Err(e) = self.insert(matchup, p) {
                    self.table.insert(matchup.reversed(), q);
                    return Err(e);
                }
                return Ok(());
            }
        }
        self.insert(matchup, p)
    }

    /// Probability that `matchup.p1` beats `matchup.p2` in one round.
    ///
    /// Falls back to the reversed pairing. A pairing stored in neither
    /// orientation is an error, never a default.
    pub fn lookup(&self, matchup: Matchup) -> Result<f64, DraftError> {
        if let Some(&p) = self.table.get(&matchup) {
            return Ok(p);
        }
        match self.table.get(&matchup.reversed()) {
            Some(&p) => Ok(1.0 - p),
            None => Err(DraftError::MissingOdds { matchup }),
        }
    }

    /// Whether either orientation of `matchup` is stored.
    pub fn covers(&self, matchup: Matchup) -> bool {
        self.table.contains_key(&matchup) || self.table.contains_key(&matchup.reversed())
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Stored entries, in matchup order.
    pub fn entries(&self) -> Vec<(Matchup, f64)> {
        let mut entries: Vec<(Matchup, f64)> = self.table.iter().map(|(&m, &p)| (m, p)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Every pairing within `roster` at even odds.
    pub fn uniform(roster: &[Faction]) -> Self {
        let mut table = FxHashMap::default();
        for (i, &a) in roster.iter().enumerate() {
            for &b in &roster[i..] {
                table.insert(Matchup::new(a, b), 0.5);
            }
        }
        Self { table }
    }

    /// The V1.2 reference table for the seven-faction roster.
    pub fn v1_2() -> Self {
        use Faction::*;

        let entries = [
            (GC, GC, 0.5),
            (GC, KH, 0.4),
            (GC, KI, 0.55),
            (GC, NG, 0.4),
            (GC, OK, 0.4),
            (GC, SL, 0.6),
            (GC, TZ, 0.4),
            (KH, KH, 0.5),
            (KH, KI, 0.55),
            (KH, NG, 0.3),
            (KH, OK, 0.6),
            (KH, SL, 0.65),
            (KH, TZ, 0.35),
            (KI, KI, 0.5),
            (KI, NG, 0.4),
            (KI, OK, 0.6),
            (KI, SL, 0.65),
            (KI, TZ, 0.6),
            (NG, NG, 0.5),
            (NG, OK, 0.65),
            (NG, SL, 0.7),
            (NG, TZ, 0.3),
            (OK, OK, 0.5),
            (OK, SL, 0.6),
            (OK, TZ, 0.4),
            (SL, SL, 0.5),
            (SL, TZ, 0.3),
            (TZ, TZ, 0.5),
        ];

        let table = entries
            .iter()
            .map(|&(p1, p2, p)| (Matchup::new(p1, p2), p))
            .collect();
        Self { table }
    }
}

impl TryFrom<BTreeMap<String, f64>> for MatchupOdds {
    type Error = OddsError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut odds = MatchupOdds::new();
        for (key, p) in raw {
            let matchup: Matchup = key.parse()?;
            odds.insert(matchup, p)?;
        }
        Ok(odds)
    }
}

impl From<MatchupOdds> for BTreeMap<String, f64> {
    fn from(odds: MatchupOdds) -> Self {
        odds.table
            .into_iter()
            .map(|(m, p)| (m.to_string(), p))
            .collect()
    }
}
