//! Labelling played tournament games with the round they were decided in

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{BracketError, Result};
use crate::meeting::earliest_meeting_round;
use crate::topology::SlotTopology;
use crate::types::{Competitor, CompetitorId, Round, Season};

/// A played game: winner and loser of one tournament matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub season: Season,
    pub winner: CompetitorId,
    pub loser: CompetitorId,
}

/// A played game with its round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledResult {
    pub result: GameResult,
    pub round: Round,
}

/// Label each result with the meeting round of the two teams' seeds.
///
/// `competitors` must hold the seeds of the season the topology describes;
/// results from other seasons are skipped.
pub fn label_results(
    topology: &SlotTopology,
    competitors: &[Competitor],
    results: &[GameResult],
) -> Result<Vec<LabeledResult>> {
    let Some(season) = competitors.first().map(|c| c.season()) else {
        return Ok(Vec::new());
    };
    let seeds: HashMap<CompetitorId, &Competitor> = competitors.iter().map(|c| (c.id(), c)).collect();
    let seed_of = |id: CompetitorId| {
        seeds
            .get(&id)
            .map(|c| &c.seed)
            .ok_or(BracketError::UnknownCompetitor(id))
    };

    results
        .iter()
        .filter(|r| r.season == season)
        .map(|r| {
            let round = earliest_meeting_round(topology, seed_of(r.winner)?, seed_of(r.loser)?)?;
            Ok(LabeledResult { result: *r, round })
        })
        .collect()
}

/// Deepest round each team played per season.
///
/// The winner of the `final_round` game is credited with `final_round + 1`.
pub fn rounds_reached(labeled: &[LabeledResult], final_round: Round) -> BTreeMap<(Season, CompetitorId), Round> {
    let mut reached = BTreeMap::new();
    for l in labeled {
        let r = l.result;
        let winner_round = if l.round == final_round { l.round + 1 } else { l.round };
        for (team, round) in [(r.winner, winner_round), (r.loser, l.round)] {
            let best = reached.entry((r.season, team)).or_insert(round);
            *best = (*best).max(round);
        }
    }
    reached
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod history_tests;
