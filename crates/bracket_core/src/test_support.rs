//! Small brackets shared by the unit tests

use std::collections::BTreeSet;

use crate::predictions::{MatchupPrediction, PredictionSet};
use crate::topology::{resolve_possible_occupants, SlotTopology};
use crate::types::{Competitor, CompetitorId, SeedLabel, Slot};

pub const SEASON: u16 = 2021;

/// A(1) v B(2) and C(3) v D(4) in round 1, winners meet in round 2
pub fn four_team_slots() -> Vec<Slot> {
    vec![
        Slot::from_label("R1a", "A", "B"),
        Slot::from_label("R1b", "C", "D"),
        Slot::from_label("R2CH", "R1a", "R1b"),
    ]
}

pub fn four_team_competitors() -> Vec<Competitor> {
    vec![
        Competitor::new(SEASON, 1, "A"),
        Competitor::new(SEASON, 2, "B"),
        Competitor::new(SEASON, 3, "C"),
        Competitor::new(SEASON, 4, "D"),
    ]
}

pub fn four_team_predictions() -> PredictionSet {
    predictions(&[
        (1, 2, 0.6),
        (3, 4, 0.7),
        (1, 3, 0.55),
        (1, 4, 0.5),
        (2, 3, 0.45),
        (2, 4, 0.4),
    ])
}

pub fn four_team_topology() -> SlotTopology {
    topology(&four_team_slots(), &four_team_competitors())
}

pub fn topology(slots: &[Slot], competitors: &[Competitor]) -> SlotTopology {
    let seeds: BTreeSet<SeedLabel> = competitors.iter().map(|c| c.seed.clone()).collect();
    resolve_possible_occupants(slots, &seeds).unwrap()
}

pub fn predictions(pairs: &[(CompetitorId, CompetitorId, f64)]) -> PredictionSet {
    PredictionSet::from_predictions(
        pairs
            .iter()
            .map(|&(a, b, p)| MatchupPrediction::new(SEASON, a, b, p).unwrap()),
    )
    .unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
