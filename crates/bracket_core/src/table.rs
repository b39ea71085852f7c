//! Round-reach probability table and the row view handed to renderers

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{BracketError, Result};
use crate::types::{Competitor, CompetitorId, Round, SeedLabel};

/// Probability that each competitor reaches each round.
///
/// Stored round-major. Round 0 is always 1; later rounds are only ever
/// appended whole, never revised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundReachTable {
    competitors: Vec<CompetitorId>,
    #[serde(skip)]
    index: HashMap<CompetitorId, usize>,
    rounds: Vec<Vec<f64>>,
}

impl RoundReachTable {
    /// Table with only round 0 filled in
    pub fn new(competitors: Vec<CompetitorId>) -> Self {
        let index = competitors.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let round0 = vec![1.0; competitors.len()];
        Self {
            competitors,
            index,
            rounds: vec![round0],
        }
    }

    /// Append the next round; `values` are in competitor order
    pub(crate) fn push_round(&mut self, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.competitors.len());
        self.rounds.push(values);
    }

    pub fn competitors(&self) -> &[CompetitorId] {
        &self.competitors
    }

    /// Highest round filled in
    pub fn max_round(&self) -> Round {
        (self.rounds.len() - 1) as Round
    }

    pub fn probability(&self, id: CompetitorId, round: Round) -> Option<f64> {
        let i = *self.index.get(&id)?;
        self.rounds.get(round as usize).map(|r| r[i])
    }

    /// All of one round, in competitor order
    pub fn round(&self, round: Round) -> Option<&[f64]> {
        self.rounds.get(round as usize).map(Vec::as_slice)
    }

    /// Rounds 0..=max for one competitor
    pub fn row(&self, id: CompetitorId) -> Option<Vec<f64>> {
        let i = *self.index.get(&id)?;
        Some(self.rounds.iter().map(|r| r[i]).collect())
    }

    /// Rounds 1..=max for each requested team, the shape the bracket drawing expects
    pub fn win_probabilities(&self, ids: &[CompetitorId]) -> Result<Vec<Vec<f64>>> {
        ids.iter()
            .map(|&id| {
                self.row(id)
                    .map(|row| row[1..].to_vec())
                    .ok_or(BracketError::UnknownCompetitor(id))
            })
            .collect()
    }

    /// One row per competitor, rounds 1..=max, in the order given
    pub fn rows(&self, competitors: &[Competitor]) -> Result<Vec<ProbabilityRow>> {
        let ids: Vec<CompetitorId> = competitors.iter().map(|c| c.id()).collect();
        let probabilities = self.win_probabilities(&ids)?;
        Ok(competitors
            .iter()
            .zip(probabilities)
            .map(|(c, probabilities)| ProbabilityRow {
                id: c.id(),
                name: c.display_name(),
                seed: c.seed.clone(),
                probabilities,
            })
            .collect())
    }
}

/// A rendered row: one competitor, rounds 1..=max
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityRow {
    pub id: CompetitorId,
    pub name: String,
    pub seed: SeedLabel,
    pub probabilities: Vec<f64>,
}

/// Column names for rounds 1..=max
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundNames(Vec<String>);

impl RoundNames {
    /// NCAA naming counted back from the champion round
    pub fn standard(champion_round: Round) -> Self {
        let names = (1..=champion_round)
            .map(|r| match champion_round - r {
                0 => "Champ".to_string(),
                1 => "Final".to_string(),
                2 => "Final4".to_string(),
                3 => "Elite8".to_string(),
                4 => "Sweet16".to_string(),
                _ => format!("Round{r}"),
            })
            .collect();
        Self(names)
    }

    /// Use explicit names, falling back to the standard names past the end of the list
    pub fn custom(names: Vec<String>, champion_round: Round) -> Self {
        let standard = Self::standard(champion_round);
        let merged = standard
            .0
            .into_iter()
            .enumerate()
            .map(|(i, std_name)| names.get(i).cloned().unwrap_or(std_name))
            .collect();
        Self(merged)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Names for rounds 1..=max_round
    pub fn truncated(&self, max_round: Round) -> &[String] {
        &self.0[..(max_round as usize).min(self.0.len())]
    }
}
