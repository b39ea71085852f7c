//! Tournament CLI
//!
//! Compute round-advancement probabilities from a prediction file and
//! label matchups with the round they fall in.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bracket_core::{RoundNames, Season};
use clap::{Parser, Subcommand};
use tournament::{
    init_tracing, load_season, write_annotations_csv, write_labeled_results_csv, write_rounds_reached_csv,
    write_rows_csv, BracketSimulator, OutputFormat, ProbabilityReport, TextRenderer, TournamentConfig,
};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "tournament", about = "Round-advancement probabilities for tournament brackets")]
struct Cli {
    /// TOML config file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Season to process, overrides the config
    #[arg(short, long, global = true)]
    season: Option<Season>,

    /// Directory holding the input files, overrides the config
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the probability of every team reaching every round
    Compute {
        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Skip the text report on stdout
        #[arg(short, long)]
        quiet: bool,
    },
    /// Label predicted matchups, and played games if available, with their round
    Annotate {
        /// Output file for predicted matchups
        #[arg(short, long)]
        output: PathBuf,
        /// Output file for played games
        #[arg(short, long)]
        results_output: Option<PathBuf>,
        /// Output file for the deepest round each team reached
        #[arg(long)]
        reached_output: Option<PathBuf>,
    },
    /// Play the bracket many times and compare with the computed table
    Simulate {
        #[arg(short = 'n', long)]
        iterations: Option<u32>,
        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn load_config(cli: &Cli) -> Result<TournamentConfig> {
    let mut config = match &cli.config {
        Some(path) => TournamentConfig::load(path)?,
        None => TournamentConfig::default(),
    };
    if let Some(season) = cli.season {
        config.season = season;
    }
    if let Some(dir) = &cli.data_dir {
        config.data.dir = dir.clone();
    }
    Ok(config)
}

fn run_compute(mut config: TournamentConfig, output: Option<PathBuf>, format: Option<OutputFormat>, quiet: bool) -> Result<()> {
    if let Some(path) = output {
        config.output.path = path;
    }
    if let Some(format) = format {
        config.output.format = format;
    }

    let inputs = load_season(&config)?;
    let bracket = &inputs.bracket;
    let table = bracket
        .round_probabilities(&inputs.predictions)
        .with_context(|| format!("Failed to compute probabilities for {}", config.season))?;

    let names = RoundNames::custom(config.round_names.clone(), bracket.topology().champion_round());
    let rows = bracket.probability_rows(&table)?;
    let report = ProbabilityReport::new(
        &format!("{} bracket", config.league.prefix()),
        config.season,
        names.truncated(table.max_round()).to_vec(),
        rows,
    );

    let path = &config.output.path;
    match config.output.format {
        OutputFormat::Csv => write_rows_csv(path, &report.rows, &report.rounds)?,
        OutputFormat::Json => report.save(path)?,
    }
    info!(path = %path.display(), "wrote round probabilities");

    if config.output.print && !quiet {
        report.print_report(&TextRenderer::default());
    }
    Ok(())
}

fn run_annotate(
    config: TournamentConfig,
    output: &Path,
    results_output: Option<&Path>,
    reached_output: Option<&Path>,
) -> Result<()> {
    let inputs = load_season(&config)?;
    let bracket = &inputs.bracket;

    let annotations = bracket.annotate(&inputs.predictions)?;
    write_annotations_csv(output, &annotations)?;
    info!(matchups = annotations.len(), path = %output.display(), "wrote annotated matchups");

    if results_output.is_none() && reached_output.is_none() {
        return Ok(());
    }
    let Some(results) = &inputs.results else {
        warn!("no results file found, skipping played games");
        return Ok(());
    };

    let labeled = bracket.label_results(results)?;
    if let Some(path) = results_output {
        write_labeled_results_csv(path, &labeled)?;
        info!(games = labeled.len(), path = %path.display(), "wrote labelled results");
    }
    if let Some(path) = reached_output {
        let reached = bracket.rounds_reached(&labeled);
        write_rounds_reached_csv(path, &reached)?;
        info!(teams = reached.len(), path = %path.display(), "wrote rounds reached");
    }
    Ok(())
}

fn run_simulate(config: TournamentConfig, iterations: Option<u32>, seed: Option<u64>) -> Result<()> {
    let iterations = iterations.unwrap_or(config.simulation.iterations);
    let seed = seed.or(config.simulation.seed);

    let inputs = load_season(&config)?;
    let table = inputs.bracket.round_probabilities(&inputs.predictions)?;

    let mut simulator = BracketSimulator::new(&inputs.bracket, &inputs.predictions, seed)?;
    let summary = simulator.run(iterations)?;
    let gap = summary.max_deviation(&table);

    println!("=== Simulation: {} brackets ===", iterations);
    println!("Largest gap to computed table: {:.4}", gap);
    if gap > config.simulation.tolerance {
        bail!("simulation differs from computed table by {:.4} (tolerance {:.4})", gap, config.simulation.tolerance);
    }
    info!(gap, "simulation agrees with computed table");
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Command::Compute { output, format, quiet } => run_compute(config, output, format, quiet),
        Command::Annotate {
            output,
            results_output,
            reached_output,
        } => run_annotate(config, &output, results_output.as_deref(), reached_output.as_deref()),
        Command::Simulate { iterations, seed } => run_simulate(config, iterations, seed),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
