use fourplay_evaluator::{
    match_runner::{Contestant, MatchConfig, MatchRecord, MatchRunner},
    search::SearchLimits,
};
use serde::Serialize;

use crate::{
    command::args::{SearchArg, ShapeArg, WeightsArg},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DuelArg {
    /// Games to play; the first move alternates
    #[arg(long, default_value_t = 10)]
    games: usize,
    /// Depth of the shallow side
    #[arg(long, default_value_t = 1)]
    shallow_depth: u32,
    /// Deep side's limits
    #[clap(flatten)]
    search: SearchArg,
    #[clap(flatten)]
    weights: WeightsArg,
    #[clap(flatten)]
    shape: ShapeArg,
}

#[derive(Debug, Serialize)]
struct DuelReport {
    deep: Contestant,
    shallow: Contestant,
    record: MatchRecord,
}

pub(crate) fn run(arg: &DuelArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.games > 0, "at least one game is required");
    let weights = arg.weights.weights()?;
    let deep = Contestant::new(weights, arg.search.limits());
    let shallow = Contestant::new(
        weights,
        SearchLimits {
            max_depth: arg.shallow_depth,
            ..deep.limits
        },
    );
    let runner = MatchRunner::new(MatchConfig {
        games: arg.games,
        limits: deep.limits,
        shape: arg.shape.shape()?,
    });

    eprintln!(
        "Duel: depth {} vs depth {}, {} games",
        deep.limits.max_depth, shallow.limits.max_depth, arg.games
    );
    let record = runner.play_contestants(&deep, &shallow);
    let score = record.score();
    eprintln!("  Deep wins:    {}", record.a_wins);
    eprintln!("  Shallow wins: {}", record.b_wins);
    eprintln!("  Draws:        {}", record.draws);
    eprintln!("  Score:        {} - {}", score.a, score.b);

    util::print_json(&DuelReport {
        deep,
        shallow,
        record,
    })
}
