use super::*;
use crate::test_support::*;
use crate::types::{Competitor, Slot};

fn four_team_schedule() -> MatchupSchedule {
    MatchupSchedule::build(
        &four_team_topology(),
        &four_team_competitors(),
        &four_team_predictions(),
    )
    .unwrap()
}

#[test]
fn test_marginal_win_probability() {
    let weights = [
        OpponentWeight {
            opponent: 3,
            reach_probability: 0.6,
            win_probability: 0.55,
        },
        OpponentWeight {
            opponent: 4,
            reach_probability: 0.4,
            win_probability: 0.5,
        },
    ];
    assert_close(marginal_win_probability(&weights), 0.53);
    assert_close(marginal_win_probability(&[]), 1.0);
}

#[test]
fn test_four_team_bracket() {
    let table = compute_round_probabilities(&four_team_schedule(), 3).unwrap();
    assert_eq!(table.max_round(), 3);

    for id in 1..=4 {
        assert_eq!(table.probability(id, 0), Some(1.0));
        // no play-in games, everyone starts in round 1
        assert_eq!(table.probability(id, 1), Some(1.0));
    }

    let expect = |round, values: [f64; 4]| {
        for (i, v) in values.iter().enumerate() {
            assert_close(table.probability(i as u32 + 1, round).unwrap(), *v);
        }
    };
    expect(2, [0.6, 0.4, 0.7, 0.3]);
    // 0.6 * (0.7 * 0.55 + 0.3 * 0.5) for A, and so on
    expect(3, [0.321, 0.174, 0.343, 0.162]);

    assert_close(table.round(3).unwrap().iter().sum(), 1.0);
}

#[test]
fn test_single_opponent_is_direct_product() {
    let schedule = four_team_schedule();
    let table = compute_round_probabilities(&schedule, 1).unwrap();

    let weights = opponent_weights(&schedule, &table, 2, 2).unwrap();
    assert_eq!(weights.len(), 1);
    assert_eq!(weights[0].opponent, 1);

    let full = compute_round_probabilities(&schedule, 2).unwrap();
    let direct = weights[0].win_probability * table.probability(2, 1).unwrap();
    assert_close(full.probability(2, 2).unwrap(), direct);
}

#[test]
fn test_bye_into_final() {
    // A waits in the final for the winner of B v C
    let slots = vec![
        Slot::from_label("R1a", "B", "C"),
        Slot::from_label("R2CH", "A", "R1a"),
    ];
    let competitors = vec![
        Competitor::new(SEASON, 1, "A"),
        Competitor::new(SEASON, 2, "B"),
        Competitor::new(SEASON, 3, "C"),
    ];
    let preds = predictions(&[(2, 3, 0.6), (1, 2, 0.55), (1, 3, 0.5)]);
    let schedule = MatchupSchedule::build(&topology(&slots, &competitors), &competitors, &preds).unwrap();

    let table = compute_round_probabilities(&schedule, 3).unwrap();
    assert_close(table.probability(1, 1).unwrap(), 1.0);
    assert_close(table.probability(1, 2).unwrap(), 1.0);
    assert_close(table.probability(1, 3).unwrap(), 0.6 * 0.55 + 0.4 * 0.5);
    assert_close(table.probability(1, 3).unwrap(), 0.53);
}

#[test]
fn test_play_in_feeds_round_one() {
    // D's seat is decided by a play-in between Da(4) and Db(5)
    let slots = vec![
        Slot::from_label("D", "Da", "Db"),
        Slot::from_label("R1a", "A", "B"),
        Slot::from_label("R1b", "C", "D"),
        Slot::from_label("R2CH", "R1a", "R1b"),
    ];
    let competitors = vec![
        Competitor::new(SEASON, 1, "A"),
        Competitor::new(SEASON, 2, "B"),
        Competitor::new(SEASON, 3, "C"),
        Competitor::new(SEASON, 4, "Da"),
        Competitor::new(SEASON, 5, "Db"),
    ];
    let preds = predictions(&[
        (1, 2, 0.6),
        (1, 3, 0.55),
        (1, 4, 0.7),
        (1, 5, 0.8),
        (2, 3, 0.45),
        (2, 4, 0.6),
        (2, 5, 0.65),
        (3, 4, 0.75),
        (3, 5, 0.9),
        (4, 5, 0.3),
    ]);
    let schedule = MatchupSchedule::build(&topology(&slots, &competitors), &competitors, &preds).unwrap();
    let table = compute_round_probabilities(&schedule, schedule.champion_round()).unwrap();

    assert_close(table.probability(4, 1).unwrap(), 0.3);
    assert_close(table.probability(5, 1).unwrap(), 0.7);
    assert_close(table.probability(3, 1).unwrap(), 1.0);
    assert_close(table.probability(3, 2).unwrap(), 0.3 * 0.75 + 0.7 * 0.9);
    assert_close(table.probability(4, 2).unwrap(), 0.3 * 0.25);

    let champions: f64 = table.round(3).unwrap().iter().sum();
    assert_close(champions, 1.0);
}

#[test]
fn test_rejects_rounds_past_champion() {
    let err = compute_round_probabilities(&four_team_schedule(), 4).unwrap_err();
    assert_eq!(err, BracketError::RoundOutOfRange { requested: 4, max: 3 });
}
