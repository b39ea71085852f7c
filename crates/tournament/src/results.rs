//! Probability report storage and text rendering

use std::path::Path;

use anyhow::{Context, Result};
use bracket_core::{BracketRenderer, ProbabilityRow, Season};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Complete output of one season's computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbabilityReport {
    /// Name/description of the run
    pub name: String,
    pub season: Season,
    /// Column names for rounds 1..
    pub rounds: Vec<String>,
    pub rows: Vec<ProbabilityRow>,
}

impl ProbabilityReport {
    pub fn new(name: &str, season: Season, rounds: Vec<String>, rows: Vec<ProbabilityRow>) -> Self {
        Self {
            name: name.to_string(),
            season,
            rounds,
            rows,
        }
    }

    /// Rows ordered by probability of reaching the last round, best first
    pub fn ranked(&self) -> Vec<&ProbabilityRow> {
        let mut rows: Vec<_> = self.rows.iter().collect();
        rows.sort_by(|a, b| {
            let pa = a.probabilities.last().copied().unwrap_or(0.0);
            let pb = b.probabilities.last().copied().unwrap_or(0.0);
            pb.partial_cmp(&pa).unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }

    /// Save report to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Load report from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Generate a text report with `renderer`, favourites first
    pub fn generate_report(&self, renderer: &dyn BracketRenderer) -> String {
        debug!(renderer = renderer.name(), rows = self.rows.len(), "rendering report");
        let ranked: Vec<ProbabilityRow> = self.ranked().into_iter().cloned().collect();
        let mut report = String::new();
        report.push_str(&format!("=== {} ({}) ===\n\n", self.name, self.season));
        report.push_str(&renderer.render(&ranked, &self.rounds));
        report
    }

    /// Print report to stdout
    pub fn print_report(&self, renderer: &dyn BracketRenderer) {
        println!("{}", self.generate_report(renderer));
    }
}

/// Fixed-width table, one line per team, probabilities as percentages
#[derive(Debug, Clone)]
pub struct TextRenderer {
    pub name_width: usize,
    pub column_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            name_width: 24,
            column_width: 8,
        }
    }
}

impl BracketRenderer for TextRenderer {
    fn render(&self, rows: &[ProbabilityRow], round_names: &[String]) -> String {
        let (nw, cw) = (self.name_width, self.column_width);
        let mut out = String::new();

        out.push_str(&format!("{:<nw$} {:<6}", "Team", "Seed"));
        for name in round_names {
            out.push_str(&format!(" {:>cw$}", name));
        }
        out.push('\n');
        out.push_str(&"-".repeat(nw + 7 + round_names.len() * (cw + 1)));
        out.push('\n');

        for row in rows {
            out.push_str(&format!("{:<nw$} {:<6}", row.name, row.seed.as_str()));
            for p in row.probabilities.iter().take(round_names.len()) {
                out.push_str(&format!(" {:>w$.1}%", p * 100.0, w = cw - 1));
            }
            out.push('\n');
        }
        out
    }

    fn name(&self) -> &str {
        "text"
    }
}
