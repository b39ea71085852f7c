//! Meeting rounds: when two seeds could first face each other, and the
//! per-competitor schedule of possible opponents built from them.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::error::{BracketError, Result};
use crate::predictions::{MatchupKey, PredictionSet};
use crate::topology::SlotTopology;
use crate::types::{Competitor, CompetitorId, Round, Season, SeedLabel};

/// Earliest round whose slot could hold both seeds.
///
/// Symmetric in `a` and `b`. A seed never meets itself.
pub fn earliest_meeting_round(topology: &SlotTopology, a: &SeedLabel, b: &SeedLabel) -> Result<Round> {
    let no_meeting = || BracketError::NoMeetingRound {
        a: a.clone(),
        b: b.clone(),
    };
    if a == b {
        return Err(no_meeting());
    }
    // slots are sorted by round, so the first hit is the earliest
    topology
        .slots()
        .iter()
        .find(|s| s.contains(a) && s.contains(b))
        .map(|s| s.round())
        .ok_or_else(no_meeting)
}

/// A possible opponent, seen from one competitor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduledMatchup {
    pub opponent: CompetitorId,
    pub meeting_round: Round,
    /// Probability that the owning competitor beats `opponent`
    pub win_probability: f64,
}

/// A predicted matchup labelled with the round it would be played in
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchupAnnotation {
    pub key: MatchupKey,
    /// Probability that `key.first` wins
    pub probability: f64,
    pub round: Round,
}

/// Every competitor of a season with their possible opponents grouped by
/// meeting round
#[derive(Debug, Clone)]
pub struct MatchupSchedule {
    season: Season,
    /// Sorted by competitor id
    competitors: Vec<Competitor>,
    by_competitor: HashMap<CompetitorId, BTreeMap<Round, Vec<ScheduledMatchup>>>,
    champion_round: Round,
}

impl MatchupSchedule {
    /// Pair every competitor with every other and attach meeting round and
    /// head-to-head probability. Fails on the first pair without a prediction.
    pub fn build(
        topology: &SlotTopology,
        competitors: &[Competitor],
        predictions: &PredictionSet,
    ) -> Result<Self> {
        let season = competitors.first().map(|c| c.season()).unwrap_or_default();

        let mut seen_ids = HashSet::with_capacity(competitors.len());
        let mut seen_seeds = HashSet::with_capacity(competitors.len());
        for c in competitors {
            if c.season() != season {
                return Err(BracketError::MixedSeasons {
                    competitor: c.id(),
                    expected: season,
                    found: c.season(),
                });
            }
            if !seen_ids.insert(c.id()) {
                return Err(BracketError::DuplicateCompetitor(c.id()));
            }
            if !seen_seeds.insert(&c.seed) {
                return Err(BracketError::DuplicateSeed(c.seed.clone()));
            }
            if !topology.contains_seed(&c.seed) {
                return Err(BracketError::UnknownSeed {
                    competitor: c.id(),
                    seed: c.seed.clone(),
                });
            }
        }

        let mut sorted = competitors.to_vec();
        sorted.sort_by_key(|c| c.id());

        let mut by_competitor: HashMap<CompetitorId, BTreeMap<Round, Vec<ScheduledMatchup>>> =
            sorted.iter().map(|c| (c.id(), BTreeMap::new())).collect();

        for (i, a) in sorted.iter().enumerate() {
            for b in &sorted[i + 1..] {
                let round = earliest_meeting_round(topology, &a.seed, &b.seed)?;
                let p = predictions.win_probability(season, a.id(), b.id())?;

                if let Some(rounds) = by_competitor.get_mut(&a.id()) {
                    rounds.entry(round).or_default().push(ScheduledMatchup {
                        opponent: b.id(),
                        meeting_round: round,
                        win_probability: p,
                    });
                }
                if let Some(rounds) = by_competitor.get_mut(&b.id()) {
                    rounds.entry(round).or_default().push(ScheduledMatchup {
                        opponent: a.id(),
                        meeting_round: round,
                        win_probability: 1.0 - p,
                    });
                }
            }
        }

        Ok(Self {
            season,
            competitors: sorted,
            by_competitor,
            champion_round: topology.champion_round(),
        })
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn champion_round(&self) -> Round {
        self.champion_round
    }

    /// Possible opponents of `id` whose meeting round is `round`, ordered by opponent id
    pub fn opponents(&self, id: CompetitorId, round: Round) -> Result<&[ScheduledMatchup]> {
        let rounds = self
            .by_competitor
            .get(&id)
            .ok_or(BracketError::UnknownCompetitor(id))?;
        Ok(rounds.get(&round).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Every pair once, canonical orientation, in key order
    pub fn annotations(&self) -> Vec<MatchupAnnotation> {
        let mut out = Vec::new();
        for c in &self.competitors {
            let Some(rounds) = self.by_competitor.get(&c.id()) else {
                continue;
            };
            for m in rounds.values().flatten().filter(|m| m.opponent > c.id()) {
                out.push(MatchupAnnotation {
                    key: MatchupKey {
                        season: self.season,
                        first: c.id(),
                        second: m.opponent,
                    },
                    probability: m.win_probability,
                    round: m.meeting_round,
                });
            }
        }
        out.sort_by_key(|a| a.key);
        out
    }
}

#[cfg(test)]
#[path = "meeting_tests.rs"]
mod meeting_tests;
