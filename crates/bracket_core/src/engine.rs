//! Round-advancement probability engine.
//!
//! For competitor C and round r:
//!
//! ```text
//! P(C reaches r) = P(C reaches r-1) * sum over O [ P(O reaches r-1) * P(C beats O) ]
//! ```
//!
//! where O ranges over the competitors C could meet in round r-1. With no
//! possible opponent the game is a bye (win probability 1); with exactly one
//! the head-to-head probability is used directly.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{BracketError, Result};
use crate::meeting::MatchupSchedule;
use crate::table::RoundReachTable;
use crate::types::{CompetitorId, Round};

/// One possible opponent in a marginalization
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpponentWeight {
    pub opponent: CompetitorId,
    /// P(opponent reached the prior round)
    pub reach_probability: f64,
    /// P(competitor beats opponent)
    pub win_probability: f64,
}

impl OpponentWeight {
    pub fn score(&self) -> f64 {
        self.reach_probability * self.win_probability
    }
}

/// Probability of winning a game whose opponent is uncertain.
///
/// An empty opponent list is a bye and yields 1.
pub fn marginal_win_probability(weights: &[OpponentWeight]) -> f64 {
    if weights.is_empty() {
        return 1.0;
    }
    weights.iter().map(OpponentWeight::score).sum()
}

/// Compute round-reach probabilities for every competitor in `schedule`
/// for rounds 0..=`max_round`.
///
/// `max_round` may be at most the champion round (final game round + 1).
pub fn compute_round_probabilities(schedule: &MatchupSchedule, max_round: Round) -> Result<RoundReachTable> {
    let champion_round = schedule.champion_round();
    if max_round > champion_round {
        return Err(BracketError::RoundOutOfRange {
            requested: max_round,
            max: champion_round,
        });
    }

    let ids: Vec<CompetitorId> = schedule.competitors().iter().map(|c| c.id()).collect();
    let mut table = RoundReachTable::new(ids.clone());

    for round in 1..=max_round {
        let next = ids
            .par_iter()
            .map(|&id| reach_probability(schedule, &table, id, round))
            .collect::<Result<Vec<f64>>>()?;

        debug!(round, total = next.iter().sum::<f64>(), "round complete");
        table.push_round(next);
    }

    info!(
        season = schedule.season(),
        competitors = ids.len(),
        rounds = max_round,
        "computed round probabilities"
    );
    Ok(table)
}

/// Opponents `id` could face for a place in `round`, weighted by their
/// chance of having reached the game
pub fn opponent_weights(
    schedule: &MatchupSchedule,
    table: &RoundReachTable,
    id: CompetitorId,
    round: Round,
) -> Result<Vec<OpponentWeight>> {
    let prior = round.checked_sub(1).ok_or(BracketError::RoundOutOfRange {
        requested: round,
        max: table.max_round(),
    })?;
    schedule
        .opponents(id, prior)?
        .iter()
        .map(|m| {
            let reach = table
                .probability(m.opponent, prior)
                .ok_or(BracketError::UnknownCompetitor(m.opponent))?;
            Ok(OpponentWeight {
                opponent: m.opponent,
                reach_probability: reach,
                win_probability: m.win_probability,
            })
        })
        .collect()
}

fn reach_probability(
    schedule: &MatchupSchedule,
    table: &RoundReachTable,
    id: CompetitorId,
    round: Round,
) -> Result<f64> {
    let prior = table
        .probability(id, round - 1)
        .ok_or(BracketError::UnknownCompetitor(id))?;
    let weights = opponent_weights(schedule, table, id, round)?;

    let win = match weights.as_slice() {
        [] => 1.0,
        [only] => only.win_probability,
        many => marginal_win_probability(many),
    };
    Ok(prior * win)
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
