use fourplay_evaluator::match_runner::{MatchConfig, MatchRunner};
use fourplay_training::round_robin;

use crate::{
    command::args::{SearchArg, ShapeArg},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RoundRobinArg {
    /// Games per pair of bots
    #[arg(long, default_value_t = 10)]
    games: usize,
    #[clap(flatten)]
    search: SearchArg,
    #[clap(flatten)]
    shape: ShapeArg,
}

pub(crate) fn run(arg: &RoundRobinArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.games > 0, "at least one game per pair is required");
    let limits = arg.search.limits();
    let runner = MatchRunner::new(MatchConfig {
        games: arg.games,
        limits,
        shape: arg.shape.shape()?,
    });
    let bots = round_robin::presets(limits);

    eprintln!(
        "Round robin: {} bots, {} games per pair, depth {}",
        bots.len(),
        arg.games,
        limits.max_depth
    );
    let standings = round_robin::round_robin(&bots, &runner);

    eprintln!("Standings:");
    eprintln!(
        "  {:>2}  {:<12} {:>7} {:>4} {:>4} {:>4}",
        "#", "Bot", "Points", "W", "L", "D"
    );
    for (i, standing) in standings.iter().enumerate() {
        eprintln!(
            "  {:>2}  {:<12} {:>7.1} {:>4} {:>4} {:>4}",
            i + 1,
            standing.name,
            standing.points,
            standing.wins,
            standing.losses,
            standing.draws
        );
    }
    util::print_json(&standings)
}
