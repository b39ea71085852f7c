//! Bracket probabilities for single-elimination tournaments
//!
//! This crate provides:
//! - Slot topology resolution (which seeds can reach which game)
//! - Meeting rounds for any two seeds
//! - Round-by-round advancement probabilities from pairwise predictions

pub mod bracket;
pub mod engine;
pub mod error;
pub mod history;
pub mod meeting;
pub mod predictions;
pub mod table;
pub mod topology;
pub mod types;

#[cfg(test)]
mod test_support;

pub use bracket::SeasonBracket;
pub use engine::*;
pub use error::{BracketError, Result};
pub use history::*;
pub use meeting::*;
pub use predictions::*;
pub use table::*;
pub use topology::*;
pub use types::*;

// =============================================================================
// Renderer trait: implemented by anything that draws or prints a bracket
// =============================================================================

/// Consumer of computed probabilities.
///
/// Renderers only lay out what they are given; all decisions are made
/// before the rows reach them.
pub trait BracketRenderer {
    /// Render `rows` with one column per entry of `round_names`
    fn render(&self, rows: &[ProbabilityRow], round_names: &[String]) -> String;

    /// Short name used in logs
    fn name(&self) -> &str;
}
