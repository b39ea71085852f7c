//! Tournament bracket probabilities for ML-style prediction files
//!
//! This crate provides:
//! - Reading slots, seeds, predictions and results from CSV
//! - Computing and reporting round-advancement probabilities
//! - Labelling predicted and played matchups with their round
//! - Monte Carlo cross-checks of the computed table
//!
//! # Usage
//!
//! ```bash
//! # Compute probabilities for the configured season
//! cargo run -p tournament -- --config bracket.toml compute
//!
//! # Label every predicted matchup with the round it would be played in
//! cargo run -p tournament -- --config bracket.toml annotate --output annotated.csv
//!
//! # Check the table against 50k simulated brackets
//! cargo run -p tournament -- --config bracket.toml simulate --iterations 50000
//! ```

mod config;
mod ingest;
mod logging;
mod results;
mod simulate;

pub use config::*;
pub use ingest::*;
pub use logging::*;
pub use results::*;
pub use simulate::*;
