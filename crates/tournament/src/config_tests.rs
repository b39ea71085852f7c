use super::*;

#[test]
fn test_defaults() {
    let config = TournamentConfig::from_toml("").unwrap();
    assert_eq!(config.season, 2021);
    assert_eq!(config.league, League::Men);
    assert_eq!(config.output.format, OutputFormat::Csv);
    assert!(config.output.print);
    assert_eq!(config.simulation.iterations, 10_000);
    assert_eq!(config.data.slots(config.league), PathBuf::from("MNCAATourneySlots.csv"));
    assert_eq!(config.data.predictions(), PathBuf::from("submission.csv"));
}

#[test]
fn test_full_config() {
    let config = TournamentConfig::from_toml(
        r#"
season = 2019
league = "women"
round_names = ["R64", "R32"]

[data]
dir = "data"
predictions = "preds/sub.csv"

[output]
path = "out.json"
format = "json"
print = false

[simulation]
iterations = 500
seed = 7
"#,
    )
    .unwrap();

    assert_eq!(config.season, 2019);
    assert_eq!(config.league.prefix(), "W");
    assert_eq!(config.data.seeds(config.league), PathBuf::from("data/WNCAATourneySeeds.csv"));
    assert_eq!(config.data.predictions(), PathBuf::from("preds/sub.csv"));
    assert_eq!(config.output.format, OutputFormat::Json);
    assert_eq!(config.round_names, vec!["R64", "R32"]);
    assert_eq!(config.simulation.seed, Some(7));
    assert!((config.simulation.tolerance - 0.02).abs() < 1e-12);
}

#[test]
fn test_optional_files_must_exist_when_derived() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths {
        dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    assert_eq!(paths.teams(League::Men), None);

    std::fs::write(dir.path().join("MTeams.csv"), "TeamID,TeamName\n").unwrap();
    assert_eq!(paths.teams(League::Men), Some(dir.path().join("MTeams.csv")));
}

#[test]
fn test_rejects_unknown_league() {
    assert!(TournamentConfig::from_toml("league = \"mixed\"").is_err());
}
