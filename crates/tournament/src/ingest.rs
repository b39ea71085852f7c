//! Reading bracket tables from CSV and writing results back out

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use bracket_core::{
    round_from_label, Competitor, CompetitorId, GameResult, LabeledResult, MatchupAnnotation, MatchupPrediction,
    PredictionSet, ProbabilityRow, Round, Season, SeasonBracket, Slot,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::TournamentConfig;

#[derive(Debug, Deserialize)]
struct SlotRecord {
    /// Absent in files that share one bracket across seasons
    #[serde(rename = "Season", default)]
    season: Option<Season>,
    #[serde(rename = "Slot")]
    slot: String,
    #[serde(rename = "StrongSeed")]
    strong: String,
    #[serde(rename = "WeakSeed")]
    weak: String,
    #[serde(rename = "Round", default)]
    round: Option<Round>,
}

#[derive(Debug, Deserialize)]
struct SeedRecord {
    #[serde(rename = "Season")]
    season: Season,
    #[serde(rename = "Seed")]
    seed: String,
    #[serde(rename = "TeamID")]
    team_id: CompetitorId,
}

#[derive(Debug, Deserialize)]
struct PredictionRecord {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Pred")]
    pred: f64,
}

#[derive(Debug, Deserialize)]
struct TeamRecord {
    #[serde(rename = "TeamID")]
    team_id: CompetitorId,
    #[serde(rename = "TeamName")]
    team_name: String,
}

#[derive(Debug, Deserialize)]
struct ResultRecord {
    #[serde(rename = "Season")]
    season: Season,
    #[serde(rename = "WTeamID")]
    winner: CompetitorId,
    #[serde(rename = "LTeamID")]
    loser: CompetitorId,
}

/// Deserialize every row of a CSV file with headers
fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    reader
        .deserialize()
        .enumerate()
        .map(|(i, record)| record.with_context(|| format!("{}: invalid record on line {}", path.display(), i + 2)))
        .collect()
}

/// Slots for `season`. Rows without a season apply to every season.
pub fn read_slots(path: &Path, season: Season) -> Result<Vec<Slot>> {
    let slots: Vec<Slot> = read_records::<SlotRecord>(path)?
        .into_iter()
        .filter(|r| r.season.map_or(true, |s| s == season))
        .map(|r| {
            let round = r.round.unwrap_or_else(|| round_from_label(&r.slot));
            Slot::new(r.slot, round, r.strong, r.weak)
        })
        .collect();
    info!(path = %path.display(), season, slots = slots.len(), "read slots");
    Ok(slots)
}

pub fn read_seeds(path: &Path, season: Season) -> Result<Vec<Competitor>> {
    let competitors: Vec<Competitor> = read_records::<SeedRecord>(path)?
        .into_iter()
        .filter(|r| r.season == season)
        .map(|r| Competitor::new(r.season, r.team_id, r.seed))
        .collect();
    info!(path = %path.display(), season, competitors = competitors.len(), "read seeds");
    Ok(competitors)
}

pub fn read_team_names(path: &Path) -> Result<HashMap<CompetitorId, String>> {
    Ok(read_records::<TeamRecord>(path)?
        .into_iter()
        .map(|r| (r.team_id, r.team_name))
        .collect())
}

/// Predictions keyed `season_id_id`; all seasons in the file are kept
pub fn read_predictions(path: &Path) -> Result<PredictionSet> {
    let mut set = PredictionSet::new();
    for (i, record) in read_records::<PredictionRecord>(path)?.into_iter().enumerate() {
        let line = || format!("{}: line {}", path.display(), i + 2);
        let prediction = MatchupPrediction::parse(&record.id, record.pred).with_context(line)?;
        set.insert(prediction).with_context(line)?;
    }
    info!(path = %path.display(), predictions = set.len(), "read predictions");
    Ok(set)
}

pub fn read_results(path: &Path) -> Result<Vec<GameResult>> {
    Ok(read_records::<ResultRecord>(path)?
        .into_iter()
        .map(|r| GameResult {
            season: r.season,
            winner: r.winner,
            loser: r.loser,
        })
        .collect())
}

/// Everything needed to process one season
#[derive(Debug)]
pub struct SeasonInputs {
    pub bracket: SeasonBracket,
    pub predictions: PredictionSet,
    pub results: Option<Vec<GameResult>>,
}

/// Read every configured file and resolve the season's bracket
pub fn load_season(config: &TournamentConfig) -> Result<SeasonInputs> {
    let data = &config.data;
    let season = config.season;

    let slots = read_slots(&data.slots(config.league), season)?;
    let mut competitors = read_seeds(&data.seeds(config.league), season)?;

    if let Some(path) = data.teams(config.league) {
        let names = read_team_names(&path)?;
        for c in &mut competitors {
            match names.get(&c.id()) {
                Some(name) => c.name = Some(name.clone()),
                None => warn!(team = c.id(), "no name for team"),
            }
        }
    }

    let bracket = SeasonBracket::new(season, &slots, competitors)
        .with_context(|| format!("Failed to build the {season} bracket"))?;
    let predictions = read_predictions(&data.predictions())?;
    let results = data
        .results(config.league)
        .map(|path| read_results(&path))
        .transpose()?;

    Ok(SeasonInputs {
        bracket,
        predictions,
        results,
    })
}

pub fn write_rows_csv(path: &Path, rows: &[ProbabilityRow], round_names: &[String]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header = vec!["TeamID".to_string(), "TeamName".to_string(), "Seed".to_string()];
    header.extend(round_names.iter().cloned());
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.id.to_string(), row.name.clone(), row.seed.to_string()];
        record.extend(row.probabilities.iter().map(|p| p.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_annotations_csv(path: &Path, annotations: &[MatchupAnnotation]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(["ID", "Pred", "Round"])?;
    for a in annotations {
        writer.write_record([a.key.to_string(), a.probability.to_string(), a.round.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_labeled_results_csv(path: &Path, labeled: &[LabeledResult]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(["Season", "WTeamID", "LTeamID", "Round"])?;
    for l in labeled {
        writer.write_record([
            l.result.season.to_string(),
            l.result.winner.to_string(),
            l.result.loser.to_string(),
            l.round.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Deepest round per team, as returned by `SeasonBracket::rounds_reached`
pub fn write_rounds_reached_csv(path: &Path, reached: &BTreeMap<(Season, CompetitorId), Round>) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(["Season", "TeamID", "MaxRound"])?;
    for (&(season, team), round) in reached {
        writer.write_record([season.to_string(), team.to_string(), round.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod ingest_tests;
