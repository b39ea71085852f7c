use super::*;
use crate::config::DataPaths;
use bracket_core::BracketError;
use std::fs;
use std::path::PathBuf;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Four-team bracket in the source file layout, with a second season mixed in
fn four_team_files(dir: &Path) {
    write(
        dir,
        "MNCAATourneySlots.csv",
        "Season,Slot,StrongSeed,WeakSeed\n\
         2021,R1a,A,B\n\
         2021,R1b,C,D\n\
         2021,R2CH,R1a,R1b\n\
         2019,R1a,A,B\n",
    );
    write(
        dir,
        "MNCAATourneySeeds.csv",
        "Season,Seed,TeamID\n\
         2021,A,1101\n\
         2021,B,1102\n\
         2021,C,1103\n\
         2021,D,1104\n\
         2019,A,1200\n",
    );
    write(
        dir,
        "MTeams.csv",
        "TeamID,TeamName,FirstD1Season\n\
         1101,Alpha,1985\n\
         1102,Bravo,1985\n\
         1103,Charlie,1985\n",
    );
    write(
        dir,
        "submission.csv",
        "ID,Pred\n\
         2021_1101_1102,0.6\n\
         2021_1103_1104,0.7\n\
         2021_1101_1103,0.55\n\
         2021_1101_1104,0.5\n\
         2021_1102_1103,0.45\n\
         2021_1102_1104,0.4\n",
    );
    write(
        dir,
        "MNCAATourneyCompactResults.csv",
        "Season,DayNum,WTeamID,WScore,LTeamID,LScore\n\
         2021,136,1101,70,1102,60\n\
         2021,136,1103,81,1104,79\n\
         2021,154,1103,66,1101,64\n",
    );
}

fn config_for(dir: &Path) -> TournamentConfig {
    TournamentConfig {
        season: 2021,
        data: DataPaths {
            dir: dir.to_path_buf(),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_read_slots_filters_season_and_derives_round() {
    let dir = tempfile::tempdir().unwrap();
    four_team_files(dir.path());

    let slots = read_slots(&dir.path().join("MNCAATourneySlots.csv"), 2021).unwrap();
    assert_eq!(slots.len(), 3);
    assert_eq!(slots[2].round, 2);
    assert_eq!(slots[2].strong.as_str(), "R1a");
}

#[test]
fn test_slots_without_season_apply_to_all() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "WNCAATourneySlots.csv",
        "Slot,StrongSeed,WeakSeed,Round\nX1,A,B,1\nR1a,X1,C,\n",
    );

    let slots = read_slots(&path, 1999).unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].round, 1);
    assert_eq!(slots[1].round, 1);
}

#[test]
fn test_read_predictions() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "sub.csv", "ID,Pred\n2021_1104_1101,0.25\n");

    let set = read_predictions(&path).unwrap();
    assert!((set.win_probability(2021, 1101, 1104).unwrap() - 0.75).abs() < 1e-12);
}

#[test]
fn test_duplicate_prediction_reports_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "sub.csv",
        "ID,Pred\n2021_1101_1102,0.9\n2021_1101_1103,0.5\n2021_1102_1101,0.9\n",
    );

    let err = read_predictions(&path).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("line 4"), "{message}");
    assert!(
        matches!(
            err.downcast_ref::<BracketError>(),
            Some(BracketError::DuplicatePrediction(_))
        ),
        "{message}"
    );
}

#[test]
fn test_slot_round_past_limit_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "MNCAATourneySlots.csv",
        "Season,Slot,StrongSeed,WeakSeed,Round\n2021,R1a,A,B,255\n",
    );
    write(dir.path(), "MNCAATourneySeeds.csv", "Season,Seed,TeamID\n2021,A,1101\n2021,B,1102\n");
    write(dir.path(), "submission.csv", "ID,Pred\n2021_1101_1102,0.5\n");

    let err = load_season(&config_for(dir.path())).unwrap_err();
    assert!(
        matches!(
            err.downcast_ref::<BracketError>(),
            Some(BracketError::RoundTooLarge { round: 255, .. })
        ),
        "{err:#}"
    );
}

#[test]
fn test_bad_prediction_key_reports_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "sub.csv", "ID,Pred\n2021_1101_1102,0.5\n2021-1101-1103,0.5\n");

    let err = read_predictions(&path).unwrap_err();
    assert!(format!("{err:#}").contains("line 3"), "{err:#}");
}

#[test]
fn test_load_season() {
    let dir = tempfile::tempdir().unwrap();
    four_team_files(dir.path());

    let inputs = load_season(&config_for(dir.path())).unwrap();
    let competitors = inputs.bracket.competitors();
    assert_eq!(competitors.len(), 4);
    assert_eq!(competitors[0].display_name(), "Alpha");
    assert_eq!(competitors[3].display_name(), "1104");
    assert_eq!(inputs.results.as_ref().map(Vec::len), Some(3));

    let table = inputs.bracket.round_probabilities(&inputs.predictions).unwrap();
    assert!((table.probability(1101, 3).unwrap() - 0.321).abs() < 1e-9);
}

#[test]
fn test_load_season_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_season(&config_for(dir.path())).unwrap_err();
    assert!(format!("{err:#}").contains("MNCAATourneySlots.csv"));
}

#[test]
fn test_write_outputs() {
    let dir = tempfile::tempdir().unwrap();
    four_team_files(dir.path());
    let inputs = load_season(&config_for(dir.path())).unwrap();
    let table = inputs.bracket.round_probabilities(&inputs.predictions).unwrap();
    let rows = inputs.bracket.probability_rows(&table).unwrap();
    let names = inputs.bracket.round_names();

    let out = dir.path().join("out.csv");
    write_rows_csv(&out, &rows, names.names()).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("TeamID,TeamName,Seed,Final4,Final,Champ"));
    assert!(lines.next().unwrap().starts_with("1101,Alpha,A,1,0.6,0.32"));

    let annotations = inputs.bracket.annotate(&inputs.predictions).unwrap();
    let out = dir.path().join("annotated.csv");
    write_annotations_csv(&out, &annotations).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().nth(1), Some("2021_1101_1102,0.6,1"));

    let labeled = inputs.bracket.label_results(inputs.results.as_deref().unwrap()).unwrap();
    let out = dir.path().join("labeled.csv");
    write_labeled_results_csv(&out, &labeled).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().last(), Some("2021,1103,1101,2"));

    let reached = inputs.bracket.rounds_reached(&labeled);
    let out = dir.path().join("reached.csv");
    write_rounds_reached_csv(&out, &reached).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Season,TeamID,MaxRound",
            "2021,1101,2",
            "2021,1102,1",
            "2021,1103,3",
            "2021,1104,1",
        ]
    );
}
