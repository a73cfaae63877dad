//! Genetic algorithm evolving heuristic weights through self-play.
//!
//! # Algorithm Overview
//!
//! Every generation goes through the same cycle:
//!
//! 1. **Reset** - every genome's score goes back to zero
//! 2. **Schedule** - for each round, the population order is shuffled and adjacent genomes are
//!    paired into [`Matchup`]s (a gauntlet, not a full round robin)
//! 3. **Play** - all matchups run concurrently, one scoped thread each
//! 4. **Aggregate** - each genome's score is the sum of its points over this generation's
//!    matchups
//! 5. **Select** - genomes are sorted by score, highest first; the top half survives
//! 6. **Reproduce** - each survivor contributes one offspring with a single mutated trait
//!
//! The next population is the survivors followed by their offspring, so its size never
//! changes.
//!
//! # Key Components
//!
//! - [`Genome`] - identifier, weight vector and the score of the current generation
//! - [`Population`] - the genomes of one generation, with [`Population::play_generation`] and
//!   [`Population::evolve`]
//! - [`TrainingConfig`] - every tunable of a run, checked by [`TrainingConfig::validate`]
//! - [`run_tournament`] - the whole run, returning the final ranking
//!
//! # Identifiers
//!
//! A [`GenomeId`] is the generation a genome was born in plus its slot in that generation's
//! population. Offspring of generation `g` are born into `g + 1` at slots past the survivors,
//! so no identifier is ever minted twice.
//!
//! # Parallelization
//!
//! Matchups share nothing mutable: each worker gets copies of two weight vectors and returns
//! a score pair through its join handle. Scores are merged into the population only after
//! every worker has been joined.

use std::thread;

use fourplay_evaluator::{
    match_runner::{MatchConfig, MatchPlayer, MatchRunner, MatchScore},
    weights::{WeightKind, Weights},
};
use rand::{Rng, seq::SliceRandom as _};
use serde::Serialize;

use crate::{
    statistics::PopulationStats,
    weights::{self, MutationParams, TraitRanges},
};

/// Unique identity of a genome over a whole run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display, Serialize,
)]
#[display("g{generation}#{index}")]
pub struct GenomeId {
    /// Generation the genome was created in.
    pub generation: usize,
    /// Slot in that generation's population.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Genome {
    id: GenomeId,
    weights: Weights,
    score: f32,
}

impl Genome {
    #[must_use]
    pub fn new(id: GenomeId, weights: Weights) -> Self {
        Self {
            id,
            weights,
            score: 0.0,
        }
    }

    #[must_use]
    pub fn id(&self) -> GenomeId {
        self.id
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Points earned in the current generation.
    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn add_score(&mut self, points: f32) {
        self.score += points;
    }
}

/// Two population slots scheduled to play a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matchup {
    pub a: usize,
    pub b: usize,
}

/// Pairs `len` slots `rounds` times, reshuffling before each round.
///
/// With an odd `len` the slot left over after pairing sits the round out.
pub fn schedule_matchups<R>(len: usize, rounds: usize, rng: &mut R) -> Vec<Matchup>
where
    R: Rng + ?Sized,
{
    let mut order = (0..len).collect::<Vec<_>>();
    let mut matchups = Vec::with_capacity(rounds * (len / 2));
    for _ in 0..rounds {
        order.shuffle(rng);
        matchups.extend(
            order
                .chunks_exact(2)
                .map(|pair| Matchup {
                    a: pair[0],
                    b: pair[1],
                }),
        );
    }
    matchups
}

/// The genomes of one generation.
#[derive(Debug, Clone)]
pub struct Population {
    generation: usize,
    genomes: Vec<Genome>,
}

impl Population {
    /// Creates generation 0 with weights drawn from `ranges`.
    #[must_use]
    pub fn random<R>(size: usize, ranges: &TraitRanges, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let genomes = (0..size)
            .map(|index| {
                Genome::new(
                    GenomeId {
                        generation: 0,
                        index,
                    },
                    weights::random_weights(ranges, rng),
                )
            })
            .collect();
        Self {
            generation: 0,
            genomes,
        }
    }

    /// Creates a generation from existing weights, numbered from slot 0.
    #[must_use]
    pub fn from_weights<I>(generation: usize, weights: I) -> Self
    where
        I: IntoIterator<Item = Weights>,
    {
        let genomes = weights
            .into_iter()
            .enumerate()
            .map(|(index, weights)| Genome::new(GenomeId { generation, index }, weights))
            .collect();
        Self {
            generation,
            genomes,
        }
    }

    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    #[must_use]
    pub fn into_genomes(self) -> Vec<Genome> {
        self.genomes
    }

    #[must_use]
    pub fn stats(&self) -> Option<PopulationStats> {
        PopulationStats::new(&self.genomes)
    }

    /// Scores this generation: resets scores, plays `rounds` gauntlet rounds in parallel and
    /// sorts the genomes by score, highest first.
    ///
    /// Returns the matchups that were played.
    pub fn play_generation<P, R>(&mut self, rounds: usize, player: &P, rng: &mut R) -> Vec<Matchup>
    where
        P: MatchPlayer + ?Sized,
        R: Rng + ?Sized,
    {
        for genome in &mut self.genomes {
            genome.score = 0.0;
        }
        let matchups = schedule_matchups(self.genomes.len(), rounds, rng);

        let results = thread::scope(|s| {
            let handles = matchups
                .iter()
                .map(|matchup| {
                    let a = self.genomes[matchup.a].weights;
                    let b = self.genomes[matchup.b].weights;
                    s.spawn(move || player.play_match(&a, &b))
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("match worker panicked"))
                .collect::<Vec<MatchScore>>()
        });

        for (matchup, score) in matchups.iter().zip(results) {
            self.genomes[matchup.a].score += score.a;
            self.genomes[matchup.b].score += score.b;
        }

        // sort by score descending; ties keep slot order
        self.genomes.sort_by(|a, b| b.score.total_cmp(&a.score));
        matchups
    }

    /// Builds the next generation from the top half of this one.
    ///
    /// Survivors keep their identifiers and weights with their scores reset; each one is
    /// followed (after all survivors) by one mutated offspring.
    ///
    /// # Panics
    ///
    /// Panics if the genomes are not sorted by score, highest first.
    #[must_use]
    pub fn evolve<R>(&self, mutation: &MutationParams, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(self.genomes.is_sorted_by(|a, b| a.score >= b.score));
        let generation = self.generation + 1;
        let half = self.genomes.len() / 2;

        let survivors = self.genomes[..half]
            .iter()
            .map(|genome| Genome::new(genome.id, genome.weights));
        let offspring = self.genomes[..half]
            .iter()
            .enumerate()
            .map(|(i, parent)| {
                Genome::new(
                    GenomeId {
                        generation,
                        index: half + i,
                    },
                    weights::mutate(&parent.weights, mutation, rng),
                )
            })
            .collect::<Vec<_>>();

        Self {
            generation,
            genomes: survivors.chain(offspring).collect(),
        }
    }
}

/// Every tunable of a training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Gauntlet rounds per generation; every genome plays this many matches.
    pub rounds_per_generation: usize,
    pub ranges: TraitRanges,
    pub mutation: MutationParams,
    pub matches: MatchConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            population_size: 32,
            generations: 20,
            rounds_per_generation: 5,
            ranges: TraitRanges::default(),
            mutation: MutationParams::default(),
            matches: MatchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be at least 2, got {size}")]
    PopulationTooSmall { size: usize },
    #[display("population size must be even, got {size}")]
    OddPopulation { size: usize },
    #[display("at least one round per generation is required")]
    NoRounds,
    #[display("at least one game per match is required")]
    NoGames,
    #[display("mutation needs at least one delta")]
    NoDeltas,
    #[display("initial range of {kind} is empty or negative")]
    InvalidRange { kind: WeightKind },
    #[display("win weight {win} does not exceed the other terms' maximum of {max_other}")]
    WinNotDominant { win: i32, max_other: i64 },
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.population_size;
        if size < 2 {
            return Err(ConfigError::PopulationTooSmall { size });
        }
        if size % 2 != 0 {
            return Err(ConfigError::OddPopulation { size });
        }
        if self.rounds_per_generation == 0 {
            return Err(ConfigError::NoRounds);
        }
        if self.matches.games == 0 {
            return Err(ConfigError::NoGames);
        }
        if self.mutation.deltas.is_empty() {
            return Err(ConfigError::NoDeltas);
        }
        for kind in WeightKind::ALL {
            let range = self.ranges.get(kind);
            if range.is_empty() || *range.start() < 0 {
                return Err(ConfigError::InvalidRange { kind });
            }
        }
        let upper = self.ranges.upper();
        if !upper.dominates_other_terms(self.matches.shape) {
            return Err(ConfigError::WinNotDominant {
                win: upper.win,
                max_other: upper.max_other_terms(self.matches.shape),
            });
        }
        Ok(())
    }
}

/// Runs a full training run and returns the final population ranked by its last scores,
/// highest first.
///
/// Every match is played by a [`MatchRunner`] built from `config.matches`.
///
/// # Example
///
/// ```
/// use fourplay_engine::BoardShape;
/// use fourplay_evaluator::{match_runner::MatchConfig, search::SearchLimits};
/// use fourplay_training::genetic::{TrainingConfig, run_tournament};
///
/// let config = TrainingConfig {
///     population_size: 4,
///     generations: 2,
///     rounds_per_generation: 1,
///     matches: MatchConfig {
///         games: 2,
///         limits: SearchLimits::depth_only(1),
///         shape: BoardShape::new(4, 5, 3)?,
///     },
///     ..TrainingConfig::default()
/// };
/// let ranked = run_tournament(&config, &mut rand::rng())?;
/// assert_eq!(ranked.len(), 4);
/// assert!(ranked.is_sorted_by(|a, b| a.score() >= b.score()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run_tournament<R>(config: &TrainingConfig, rng: &mut R) -> Result<Vec<Genome>, ConfigError>
where
    R: Rng + ?Sized,
{
    run_tournament_with_progress(config, rng, |_| {})
}

/// [`run_tournament`], calling `on_generation` once every generation has been scored.
pub fn run_tournament_with_progress<R, F>(
    config: &TrainingConfig,
    rng: &mut R,
    on_generation: F,
) -> Result<Vec<Genome>, ConfigError>
where
    R: Rng + ?Sized,
    F: FnMut(&Population),
{
    config.validate()?;
    let runner = MatchRunner::new(config.matches);
    Ok(evolve_generations(config, &runner, rng, on_generation))
}

/// Generation loop of a validated run, with matches played by `player`.
fn evolve_generations<P, R, F>(
    config: &TrainingConfig,
    player: &P,
    rng: &mut R,
    mut on_generation: F,
) -> Vec<Genome>
where
    P: MatchPlayer + ?Sized,
    R: Rng + ?Sized,
    F: FnMut(&Population),
{
    let mut population = Population::random(config.population_size, &config.ranges, rng);
    for generation in 0..config.generations {
        let matchups = population.play_generation(config.rounds_per_generation, player, rng);
        if let Some(best) = population.genomes().first() {
            log::info!(
                "generation {}/{}: {} matchups, best {} with {} points",
                generation + 1,
                config.generations,
                matchups.len(),
                best.id(),
                best.score()
            );
        }
        on_generation(&population);
        if generation + 1 < config.generations {
            population = population.evolve(&config.mutation, rng);
        }
    }
    population.into_genomes()
}
