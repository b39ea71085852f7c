//! Run configuration, loaded from TOML

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bracket_core::Season;
use serde::{Deserialize, Serialize};

/// Which tournament's files to read. Selects the `M`/`W` file prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum League {
    #[default]
    Men,
    Women,
}

impl League {
    pub fn prefix(self) -> &'static str {
        match self {
            League::Men => "M",
            League::Women => "W",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Input files. Unset paths are derived from `dir` and the league prefix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub dir: PathBuf,
    pub slots: Option<PathBuf>,
    pub seeds: Option<PathBuf>,
    pub predictions: Option<PathBuf>,
    pub teams: Option<PathBuf>,
    pub results: Option<PathBuf>,
}

impl DataPaths {
    pub fn slots(&self, league: League) -> PathBuf {
        self.resolve(&self.slots, league, "NCAATourneySlots.csv")
    }

    pub fn seeds(&self, league: League) -> PathBuf {
        self.resolve(&self.seeds, league, "NCAATourneySeeds.csv")
    }

    pub fn predictions(&self) -> PathBuf {
        self.predictions
            .clone()
            .unwrap_or_else(|| self.dir.join("submission.csv"))
    }

    /// Team names; a derived path is only used if the file exists
    pub fn teams(&self, league: League) -> Option<PathBuf> {
        self.optional(&self.teams, league, "Teams.csv")
    }

    /// Played tournament games; a derived path is only used if the file exists
    pub fn results(&self, league: League) -> Option<PathBuf> {
        self.optional(&self.results, league, "NCAATourneyCompactResults.csv")
    }

    fn resolve(&self, explicit: &Option<PathBuf>, league: League, stem: &str) -> PathBuf {
        explicit
            .clone()
            .unwrap_or_else(|| self.dir.join(format!("{}{}", league.prefix(), stem)))
    }

    fn optional(&self, explicit: &Option<PathBuf>, league: League, stem: &str) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.clone()),
            None => {
                let derived = self.resolve(explicit, league, stem);
                derived.exists().then_some(derived)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    /// Print the text report to stdout
    pub print: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("round_probabilities.csv"),
            format: OutputFormat::Csv,
            print: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub iterations: u32,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
    /// Largest acceptable gap between simulated and computed probabilities
    pub tolerance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            seed: None,
            tolerance: 0.02,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub season: Season,
    pub league: League,
    pub data: DataPaths,
    pub output: OutputConfig,
    /// Column names for rounds 1..; missing entries use the standard names
    pub round_names: Vec<String>,
    pub simulation: SimulationConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            season: 2021,
            league: League::Men,
            data: DataPaths::default(),
            output: OutputConfig::default(),
            round_names: Vec::new(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl TournamentConfig {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
