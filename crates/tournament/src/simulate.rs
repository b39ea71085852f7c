//! Monte Carlo play-through of a bracket.
//!
//! Used to cross-check the computed round-reach table: every game is drawn
//! from its head-to-head prediction and the deepest round each team reaches
//! is tallied.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use bracket_core::{CompetitorId, PredictionSet, Round, RoundReachTable, SeasonBracket, SeedLabel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Pre-computed win probabilities for all team pairs
#[derive(Debug, Clone)]
struct ProbabilityMatrix {
    n: usize,
    /// probs[a * n + b] = probability that team a beats team b
    probs: Vec<f64>,
}

impl ProbabilityMatrix {
    fn new(bracket: &SeasonBracket, predictions: &PredictionSet) -> Result<Self> {
        let competitors = bracket.competitors();
        let n = competitors.len();
        let mut probs = vec![0.5; n * n];
        for (i, a) in competitors.iter().enumerate() {
            for (j, b) in competitors.iter().enumerate().skip(i + 1) {
                let p = predictions.win_probability(bracket.season(), a.id(), b.id())?;
                probs[i * n + j] = p;
                probs[j * n + i] = 1.0 - p;
            }
        }
        Ok(Self { n, probs })
    }

    #[inline]
    fn get(&self, a: usize, b: usize) -> f64 {
        self.probs[a * self.n + b]
    }
}

/// A game in index form: the occupants of two seats play for a third
#[derive(Debug, Clone, Copy)]
struct Game {
    strong: usize,
    weak: usize,
    winner_seat: usize,
    round: Round,
}

/// Simulated frequency of reaching each round
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub iterations: u32,
    competitors: Vec<CompetitorId>,
    /// counts[i][r] = iterations in which competitor i reached round r
    counts: Vec<Vec<u32>>,
}

impl SimulationSummary {
    pub fn frequency(&self, id: CompetitorId, round: Round) -> Option<f64> {
        if self.iterations == 0 {
            return None;
        }
        let i = self.competitors.iter().position(|&c| c == id)?;
        let count = *self.counts[i].get(round as usize)?;
        Some(count as f64 / self.iterations as f64)
    }

    /// Largest absolute gap to `table` over every competitor and round the table holds
    pub fn max_deviation(&self, table: &RoundReachTable) -> f64 {
        let mut worst: f64 = 0.0;
        for &id in &self.competitors {
            for round in 0..=table.max_round() {
                if let (Some(sim), Some(exact)) = (self.frequency(id, round), table.probability(id, round)) {
                    worst = worst.max((sim - exact).abs());
                }
            }
        }
        worst
    }
}

/// Plays a season's bracket many times over
pub struct BracketSimulator {
    competitors: Vec<CompetitorId>,
    matrix: ProbabilityMatrix,
    games: Vec<Game>,
    /// Initial occupant of each seat (genuine seeds only)
    seats: Vec<Option<usize>>,
    /// Round each competitor enters the bracket
    entry: Vec<Round>,
    champion_round: Round,
    rng: StdRng,
}

impl BracketSimulator {
    /// `seed` fixes the random stream; without it the stream is seeded from entropy
    pub fn new(bracket: &SeasonBracket, predictions: &PredictionSet, seed: Option<u64>) -> Result<Self> {
        let matrix = ProbabilityMatrix::new(bracket, predictions).context("Incomplete predictions for simulation")?;
        let topology = bracket.topology();

        let mut seat_index = HashMap::new();
        let mut seats = Vec::new();
        let mut entry = Vec::with_capacity(bracket.competitors().len());
        for (i, c) in bracket.competitors().iter().enumerate() {
            seat_index.insert(c.seed.clone(), seats.len());
            seats.push(Some(i));
            entry.push(topology.entry_round(&c.seed).unwrap_or(0));
        }
        for slot in topology.slots() {
            seat_index.insert(slot.label().clone(), seats.len());
            seats.push(None);
        }

        let seat_of = |label: &SeedLabel| {
            seat_index
                .get(label)
                .copied()
                .with_context(|| format!("No seat for label {label}"))
        };
        let games = topology
            .slots()
            .iter()
            .map(|s| {
                Ok(Game {
                    strong: seat_of(&s.slot.strong)?,
                    weak: seat_of(&s.slot.weak)?,
                    winner_seat: seat_of(s.label())?,
                    round: s.round(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            competitors: bracket.competitors().iter().map(|c| c.id()).collect(),
            matrix,
            games,
            seats,
            entry,
            champion_round: topology.champion_round(),
            rng,
        })
    }

    /// Play the bracket once; returns the deepest round each competitor reached
    pub fn play_once(&mut self) -> Result<Vec<Round>> {
        let mut seats = self.seats.clone();
        let mut reached = self.entry.clone();

        for game in &self.games {
            let (a, b) = match (seats[game.strong], seats[game.weak]) {
                (Some(a), Some(b)) => (a, b),
                _ => bail!("seat empty before round {} game", game.round),
            };
            let roll: f64 = self.rng.gen();
            let winner = if roll < self.matrix.get(a, b) { a } else { b };
            reached[winner] = game.round + 1;
            seats[game.winner_seat] = Some(winner);
        }
        Ok(reached)
    }

    /// Play `iterations` brackets; zero is an error since nothing would be compared
    pub fn run(&mut self, iterations: u32) -> Result<SimulationSummary> {
        if iterations == 0 {
            bail!("simulation needs at least one iteration");
        }
        let rounds = self.champion_round as usize + 1;
        let mut counts = vec![vec![0u32; rounds]; self.competitors.len()];

        for iteration in 0..iterations {
            let reached = self.play_once()?;
            for (i, &deepest) in reached.iter().enumerate() {
                for count in counts[i].iter_mut().take(deepest as usize + 1) {
                    *count += 1;
                }
            }
            if iteration > 0 && iteration % 10_000 == 0 {
                debug!(iteration, "simulating");
            }
        }

        info!(iterations, competitors = self.competitors.len(), "simulation complete");
        Ok(SimulationSummary {
            iterations,
            competitors: self.competitors.clone(),
            counts,
        })
    }
}

#[cfg(test)]
#[path = "simulate_tests.rs"]
mod simulate_tests;
