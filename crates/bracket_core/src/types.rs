//! Core bracket types: seasons, competitors, seed labels and slots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tournament season (year the tournament is played)
pub type Season = u16;

/// Stable numeric identifier of a tournament entrant
pub type CompetitorId = u32;

/// Round number. Round 0 holds play-in games, round 1 is the first full round.
pub type Round = u8;

/// A bracket-entry label (`W01`, `X16a`) or the label of an earlier slot (`R1W1`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedLabel(String);

impl SeedLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeedLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SeedLabel {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One bracket game: the winners of `strong` and `weak` meet in `label`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub label: SeedLabel,
    pub round: Round,
    pub strong: SeedLabel,
    pub weak: SeedLabel,
}

impl Slot {
    pub fn new(
        label: impl Into<SeedLabel>,
        round: Round,
        strong: impl Into<SeedLabel>,
        weak: impl Into<SeedLabel>,
    ) -> Self {
        Self {
            label: label.into(),
            round,
            strong: strong.into(),
            weak: weak.into(),
        }
    }

    /// Build a slot whose round is read from its label.
    pub fn from_label(
        label: impl Into<SeedLabel>,
        strong: impl Into<SeedLabel>,
        weak: impl Into<SeedLabel>,
    ) -> Self {
        let label = label.into();
        let round = round_from_label(label.as_str());
        Self {
            label,
            round,
            strong: strong.into(),
            weak: weak.into(),
        }
    }

    pub fn inputs(&self) -> [&SeedLabel; 2] {
        [&self.strong, &self.weak]
    }
}

/// Round encoded in a slot label: `R<d>...` is round `d`, anything else
/// (play-in slots such as `W16`) is round 0.
pub fn round_from_label(label: &str) -> Round {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some('R'), Some(d)) => d.to_digit(10).map(|d| d as Round).unwrap_or(0),
        _ => 0,
    }
}

/// Season-scoped competitor key, built once at ingestion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompetitorKey {
    pub season: Season,
    pub id: CompetitorId,
}

impl fmt::Display for CompetitorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.season, self.id)
    }
}

/// A tournament entrant for one season
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub key: CompetitorKey,
    pub seed: SeedLabel,
    /// Display name, when a names table was supplied
    pub name: Option<String>,
}

impl Competitor {
    pub fn new(season: Season, id: CompetitorId, seed: impl Into<SeedLabel>) -> Self {
        Self {
            key: CompetitorKey { season, id },
            seed: seed.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> CompetitorId {
        self.key.id
    }

    pub fn season(&self) -> Season {
        self.key.season
    }

    /// Name if known, otherwise the numeric id
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.key.id.to_string())
    }
}
