//! One season's bracket, assembled from slots, seeds and predictions

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::engine::compute_round_probabilities;
use crate::error::{BracketError, Result};
use crate::history::{label_results, rounds_reached, GameResult, LabeledResult};
use crate::meeting::{earliest_meeting_round, MatchupAnnotation, MatchupSchedule};
use crate::predictions::PredictionSet;
use crate::table::{ProbabilityRow, RoundNames, RoundReachTable};
use crate::topology::{resolve_possible_occupants, SlotTopology};
use crate::types::{Competitor, CompetitorId, Round, Season, SeedLabel, Slot};

/// Resolved topology plus the season's competitors
#[derive(Debug, Clone)]
pub struct SeasonBracket {
    season: Season,
    topology: SlotTopology,
    competitors: Vec<Competitor>,
}

impl SeasonBracket {
    /// Resolve `slots` against the seeds held by `competitors`
    pub fn new(season: Season, slots: &[Slot], mut competitors: Vec<Competitor>) -> Result<Self> {
        if let Some(c) = competitors.iter().find(|c| c.season() != season) {
            return Err(BracketError::MixedSeasons {
                competitor: c.id(),
                expected: season,
                found: c.season(),
            });
        }
        let seeds: BTreeSet<SeedLabel> = competitors.iter().map(|c| c.seed.clone()).collect();
        let topology = resolve_possible_occupants(slots, &seeds)?;
        competitors.sort_by_key(|c| c.id());
        info!(
            season,
            slots = slots.len(),
            competitors = competitors.len(),
            final_round = topology.final_round(),
            "resolved bracket"
        );
        Ok(Self {
            season,
            topology,
            competitors,
        })
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn topology(&self) -> &SlotTopology {
        &self.topology
    }

    /// Competitors sorted by id
    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn round_names(&self) -> RoundNames {
        RoundNames::standard(self.topology.champion_round())
    }

    pub fn meeting_round(&self, a: &SeedLabel, b: &SeedLabel) -> Result<Round> {
        earliest_meeting_round(&self.topology, a, b)
    }

    pub fn schedule(&self, predictions: &PredictionSet) -> Result<MatchupSchedule> {
        MatchupSchedule::build(&self.topology, &self.competitors, predictions)
    }

    /// Predicted matchups labelled with their meeting round
    pub fn annotate(&self, predictions: &PredictionSet) -> Result<Vec<MatchupAnnotation>> {
        Ok(self.schedule(predictions)?.annotations())
    }

    /// Round-reach table through the champion round
    pub fn round_probabilities(&self, predictions: &PredictionSet) -> Result<RoundReachTable> {
        self.round_probabilities_to(predictions, self.topology.champion_round())
    }

    pub fn round_probabilities_to(&self, predictions: &PredictionSet, max_round: Round) -> Result<RoundReachTable> {
        let schedule = self.schedule(predictions)?;
        compute_round_probabilities(&schedule, max_round)
    }

    /// Rows for every competitor, sorted by id
    pub fn probability_rows(&self, table: &RoundReachTable) -> Result<Vec<ProbabilityRow>> {
        table.rows(&self.competitors)
    }

    pub fn label_results(&self, results: &[GameResult]) -> Result<Vec<LabeledResult>> {
        label_results(&self.topology, &self.competitors, results)
    }

    pub fn rounds_reached(&self, labeled: &[LabeledResult]) -> BTreeMap<(Season, CompetitorId), Round> {
        rounds_reached(labeled, self.topology.final_round())
    }
}
