//! Error taxonomy for bracket resolution and probability propagation

use thiserror::Error;

use crate::predictions::MatchupKey;
use crate::types::{CompetitorId, Round, Season, SeedLabel};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BracketError {
    // Malformed topology
    #[error("slot {slot} references unknown label {label}")]
    UnknownLabel { slot: SeedLabel, label: SeedLabel },

    #[error("slot {slot} (round {round}) references slot {label} which is not from an earlier round")]
    ForwardReference {
        slot: SeedLabel,
        round: Round,
        label: SeedLabel,
    },

    #[error("slot {0} is defined more than once")]
    DuplicateSlot(SeedLabel),

    #[error("label {0} is used both as a slot and as a seed")]
    SlotSeedCollision(SeedLabel),

    #[error("bracket has no slots")]
    EmptyBracket,

    #[error("slot {slot} has round {round}, the last playable round is {max}")]
    RoundTooLarge { slot: SeedLabel, round: Round, max: Round },

    // Incomplete predictions
    #[error("no prediction for season {season} matchup {first} vs {second}")]
    MissingPrediction {
        season: Season,
        first: CompetitorId,
        second: CompetitorId,
    },

    #[error("more than one prediction for matchup {0}")]
    DuplicatePrediction(MatchupKey),

    // Invalid queries and inputs
    #[error("seeds {a} and {b} can never meet")]
    NoMeetingRound { a: SeedLabel, b: SeedLabel },

    #[error("competitor {competitor} has seed {seed} which is not in the bracket")]
    UnknownSeed {
        competitor: CompetitorId,
        seed: SeedLabel,
    },

    #[error("competitor {0} appears more than once")]
    DuplicateCompetitor(CompetitorId),

    #[error("seed {0} is assigned to more than one competitor")]
    DuplicateSeed(SeedLabel),

    #[error("competitor {competitor} belongs to season {found}, expected {expected}")]
    MixedSeasons {
        competitor: CompetitorId,
        expected: Season,
        found: Season,
    },

    #[error("unknown competitor {0}")]
    UnknownCompetitor(CompetitorId),

    #[error("round {requested} is beyond the champion round {max}")]
    RoundOutOfRange { requested: Round, max: Round },

    #[error("prediction {key} has probability {value} outside [0, 1]")]
    InvalidProbability { key: String, value: f64 },

    #[error("invalid matchup key '{raw}': {reason}")]
    InvalidMatchupKey { raw: String, reason: String },
}

impl BracketError {
    /// True for structural errors in the slot definitions
    pub fn is_malformed_topology(&self) -> bool {
        matches!(
            self,
            BracketError::UnknownLabel { .. }
                | BracketError::ForwardReference { .. }
                | BracketError::DuplicateSlot(_)
                | BracketError::SlotSeedCollision(_)
                | BracketError::EmptyBracket
                | BracketError::RoundTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BracketError>;
