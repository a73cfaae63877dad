//! Training system evolving heuristic weights through self-play tournaments.
//!
//! The evaluator crate turns a weight vector into a player. This crate searches for good weight
//! vectors: it lets many of them play each other and breeds from the winners.
//!
//! # How Training Works
//!
//! 1. **Population** - Draw a population of weight vectors from per-trait ranges
//! 2. **Gauntlet** - Pair genomes at random for a few rounds and play a short match per pair
//! 3. **Fitness** - A genome's fitness is the points it earned this generation
//! 4. **Selection** - The top half survives unchanged
//! 5. **Reproduction** - Every survivor adds one offspring with a single trait mutated
//! 6. **Repeat** - For a fixed number of generations
//!
//! # Architecture
//!
//! ```text
//! Genetic Algorithm (genetic)
//!     ↓ schedules
//! Matchups (pairs of genomes)
//!     ↓ played by
//! MatchPlayer (fourplay-evaluator, one thread per matchup)
//!     ↓ returns
//! Score pairs
//!     ↓ guide
//! Selection & Reproduction (weights)
//! ```
//!
//! # Modules
//!
//! - [`genetic`] - genomes, populations, configuration and [`run_tournament`](genetic::run_tournament)
//! - [`weights`] - trait ranges, random initialization and mutation
//! - [`round_robin`] - full round robins between named configurations
//! - [`statistics`] - per-generation summaries for progress reports
//!
//! # Design Principles
//!
//! ## Separation from Evaluation
//!
//! Training only sees match play through the
//! [`MatchPlayer`](fourplay_evaluator::match_runner::MatchPlayer) trait taken by
//! [`Population::play_generation`](genetic::Population::play_generation), so tests can plug in a
//! cheap deterministic player. A full run always plays through a
//! [`MatchRunner`](fourplay_evaluator::match_runner::MatchRunner) built from the run's own
//! match settings.
//!
//! ## Relative Fitness
//!
//! Fitness is only meaningful within one generation: it depends on who a genome happened to be
//! paired with. Scores are therefore reset at the start of every generation and never compared
//! across generations.
//!
//! # Current Limitations
//!
//! - **Noisy fitness**: a few matches per generation against random opponents
//! - **Mutation only**: offspring never combine traits of two parents
//! - **No persistence**: the final ranking is reported, not saved

pub mod genetic;
pub mod round_robin;
pub mod statistics;
pub mod weights;
