use fourplay_evaluator::{match_runner::MatchConfig, weights::Weights};
use fourplay_training::genetic::{self, GenomeId, Population, TrainingConfig};
use serde::Serialize;

use crate::{
    command::args::{SearchArg, ShapeArg},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Genomes per generation (even)
    #[arg(long, default_value_t = 32)]
    population: usize,
    #[arg(long, default_value_t = 20)]
    generations: usize,
    /// Gauntlet rounds per generation
    #[arg(long, default_value_t = 5)]
    rounds: usize,
    /// Games per match
    #[arg(long, default_value_t = 2)]
    games: usize,
    /// Number of top genomes to print at the end
    #[arg(long, default_value_t = 5)]
    top: usize,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    #[clap(flatten)]
    search: SearchArg,
    #[clap(flatten)]
    shape: ShapeArg,
}

#[derive(Debug, Serialize)]
struct RankedGenome {
    rank: usize,
    id: GenomeId,
    score: f32,
    weights: Weights,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let matches = MatchConfig {
        games: arg.games,
        limits: arg.search.limits(),
        shape: arg.shape.shape()?,
    };
    let config = TrainingConfig {
        population_size: arg.population,
        generations: arg.generations,
        rounds_per_generation: arg.rounds,
        matches,
        ..TrainingConfig::default()
    };
    config.validate()?;
    log::debug!("training config: {config:?}");

    let mut rng = util::make_rng(arg.seed);

    eprintln!(
        "Training {} genomes for {} generations ({} rounds, {} games per match, depth {}, {} ms per move)",
        config.population_size,
        config.generations,
        config.rounds_per_generation,
        matches.games,
        matches.limits.max_depth,
        arg.search.time_ms,
    );
    let ranked = genetic::run_tournament_with_progress(&config, &mut rng, |population| {
        report_generation(population, config.generations);
    })?;

    eprintln!("Best Genomes:");
    for (i, genome) in ranked.iter().take(arg.top).enumerate() {
        eprintln!("  {i:2}: {} {:?} => {}", genome.id(), genome.weights(), genome.score());
    }
    eprintln!("Training completed.");

    let top = ranked
        .iter()
        .take(arg.top)
        .enumerate()
        .map(|(rank, genome)| RankedGenome {
            rank: rank + 1,
            id: genome.id(),
            score: genome.score(),
            weights: *genome.weights(),
        })
        .collect::<Vec<_>>();
    util::print_json(&top)
}

fn report_generation(population: &Population, generations: usize) {
    eprintln!(
        "Generation #{}/{generations}:",
        population.generation() + 1
    );
    eprintln!("  Genomes:");
    for (i, genome) in population.genomes().iter().enumerate() {
        eprintln!(
            "  {i:2}: {:>8} {:?} => {}",
            genome.id().to_string(),
            genome.weights(),
            genome.score()
        );
    }
    let Some(stats) = population.stats() else {
        return;
    };
    eprintln!("  Weights Stats:");
    for (kind, summary) in &stats.traits {
        eprintln!(
            "    {:<10}  Min: {:7.2}  Max: {:7.2}  Mean: {:7.2}",
            kind.to_string(),
            summary.min,
            summary.max,
            summary.mean
        );
    }
    eprintln!("  Score Stats:");
    eprintln!("    Min:  {:.3}", stats.score.min);
    eprintln!("    Max:  {:.3}", stats.score.max);
    eprintln!("    Mean: {:.3}", stats.score.mean);
}
