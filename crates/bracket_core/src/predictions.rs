//! Pairwise matchup predictions.
//!
//! Predictions are stored under the canonical pair (lower id first) with the
//! probability that the lower id wins; the reverse orientation is `1 - p`.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BracketError, Result};
use crate::types::{CompetitorId, Season};

/// Separator used by the textual matchup key, e.g. `2021_1101_1242`
pub const KEY_DELIMITER: char = '_';

/// Season plus an ordered pair of competitors with `first < second`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchupKey {
    pub season: Season,
    pub first: CompetitorId,
    pub second: CompetitorId,
}

impl MatchupKey {
    /// Canonical key for a pair given in either order.
    ///
    /// Returns the key and whether the pair was flipped to get there.
    pub fn canonical(season: Season, a: CompetitorId, b: CompetitorId) -> (Self, bool) {
        if a <= b {
            (
                Self {
                    season,
                    first: a,
                    second: b,
                },
                false,
            )
        } else {
            (
                Self {
                    season,
                    first: b,
                    second: a,
                },
                true,
            )
        }
    }
}

impl fmt::Display for MatchupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{d}{}{d}{}",
            self.season,
            self.first,
            self.second,
            d = KEY_DELIMITER
        )
    }
}

/// A parsed key as written in a prediction file, before canonicalisation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawMatchupKey {
    pub season: Season,
    pub team1: CompetitorId,
    pub team2: CompetitorId,
}

impl FromStr for RawMatchupKey {
    type Err = BracketError;

    fn from_str(raw: &str) -> Result<Self> {
        let invalid = |reason: &str| BracketError::InvalidMatchupKey {
            raw: raw.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = raw.trim().split(KEY_DELIMITER).collect();
        if parts.len() != 3 {
            return Err(invalid("expected season_id_id"));
        }
        let season = parts[0].parse().map_err(|_| invalid("season is not a number"))?;
        let team1 = parts[1].parse().map_err(|_| invalid("first id is not a number"))?;
        let team2 = parts[2].parse().map_err(|_| invalid("second id is not a number"))?;
        if team1 == team2 {
            return Err(invalid("a competitor cannot play itself"));
        }
        Ok(Self {
            season,
            team1,
            team2,
        })
    }
}

/// One prediction in canonical orientation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchupPrediction {
    pub key: MatchupKey,
    /// Probability that `key.first` wins
    pub probability: f64,
}

impl MatchupPrediction {
    /// `probability` is the chance that `team1` beats `team2`.
    pub fn new(season: Season, team1: CompetitorId, team2: CompetitorId, probability: f64) -> Result<Self> {
        let (key, flipped) = MatchupKey::canonical(season, team1, team2);
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(BracketError::InvalidProbability {
                key: key.to_string(),
                value: probability,
            });
        }
        if team1 == team2 {
            return Err(BracketError::InvalidMatchupKey {
                raw: key.to_string(),
                reason: "a competitor cannot play itself".to_string(),
            });
        }
        let probability = if flipped { 1.0 - probability } else { probability };
        Ok(Self { key, probability })
    }

    /// Parse a `season_id_id` key and attach its probability
    pub fn parse(raw_key: &str, probability: f64) -> Result<Self> {
        let raw: RawMatchupKey = raw_key.parse()?;
        Self::new(raw.season, raw.team1, raw.team2, probability)
    }
}

/// All predictions available for computation, keyed canonically
#[derive(Debug, Clone, Default)]
pub struct PredictionSet {
    probs: HashMap<MatchupKey, f64>,
}

impl PredictionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect predictions, failing on the first pair given twice
    pub fn from_predictions<I>(predictions: I) -> Result<Self>
    where
        I: IntoIterator<Item = MatchupPrediction>,
    {
        let mut set = Self::new();
        for p in predictions {
            set.insert(p)?;
        }
        Ok(set)
    }

    /// Add a prediction. A pair may be given only once, in either orientation.
    pub fn insert(&mut self, prediction: MatchupPrediction) -> Result<()> {
        match self.probs.entry(prediction.key) {
            Entry::Occupied(_) => Err(BracketError::DuplicatePrediction(prediction.key)),
            Entry::Vacant(slot) => {
                slot.insert(prediction.probability);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Probability that `team` beats `opponent` in `season`
    pub fn win_probability(&self, season: Season, team: CompetitorId, opponent: CompetitorId) -> Result<f64> {
        let (key, flipped) = MatchupKey::canonical(season, team, opponent);
        let p = self
            .probs
            .get(&key)
            .copied()
            .ok_or(BracketError::MissingPrediction {
                season,
                first: key.first,
                second: key.second,
            })?;
        Ok(if flipped { 1.0 - p } else { p })
    }

    /// Predictions for one season, in key order
    pub fn season(&self, season: Season) -> Vec<MatchupPrediction> {
        let mut out: Vec<_> = self
            .probs
            .iter()
            .filter(|(k, _)| k.season == season)
            .map(|(&key, &probability)| MatchupPrediction { key, probability })
            .collect();
        out.sort_by_key(|p| p.key);
        out
    }
}

#[cfg(test)]
#[path = "predictions_tests.rs"]
mod predictions_tests;
