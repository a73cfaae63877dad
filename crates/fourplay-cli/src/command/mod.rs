use clap::{Parser, Subcommand};

use self::{
    best_move::BestMoveArg, duel::DuelArg, round_robin::RoundRobinArg, train::TrainArg,
};

mod args;
mod best_move;
mod duel;
mod round_robin;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve heuristic weights with a genetic algorithm over self-play
    Train(#[clap(flatten)] TrainArg),
    /// Play every pair of the built-in bots and print the standings
    RoundRobin(#[clap(flatten)] RoundRobinArg),
    /// Pit a deep search against a shallow one with the same weights
    Duel(#[clap(flatten)] DuelArg),
    /// Search the best column for a board read from a file or stdin
    BestMove(#[clap(flatten)] BestMoveArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::RoundRobin(arg) => round_robin::run(&arg)?,
        Mode::Duel(arg) => duel::run(&arg)?,
        Mode::BestMove(arg) => best_move::run(&arg)?,
    }
    Ok(())
}
