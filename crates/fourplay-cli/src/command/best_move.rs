use std::path::PathBuf;

use anyhow::Context as _;
use fourplay_engine::{BoardShape, Side};
use fourplay_evaluator::{heuristic::WindowEvaluator, search::Searcher};

use crate::{
    command::args::{SearchArg, WeightsArg},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BestMoveArg {
    /// Board file, one row per line, top row first (`.` empty, `X` first side, `O` second
    /// side); `-` or no value reads stdin
    board: Option<PathBuf>,
    /// Side to search for (`X` or `O`); defaults to the side to move
    #[arg(long, value_parser = parse_side)]
    side: Option<Side>,
    /// Pieces in a row needed to win
    #[arg(long, default_value_t = BoardShape::DEFAULT_WIN_LENGTH)]
    win_length: usize,
    #[clap(flatten)]
    search: SearchArg,
    #[clap(flatten)]
    weights: WeightsArg,
}

fn parse_side(s: &str) -> Result<Side, String> {
    let mut chars = s.chars();
    match (chars.next().and_then(Side::from_symbol), chars.next()) {
        (Some(side), None) => Ok(side),
        _ => Err(format!("expected X or O, got {s:?}")),
    }
}

pub(crate) fn run(arg: &BestMoveArg) -> anyhow::Result<()> {
    let board = util::read_board(arg.board.as_deref(), arg.win_length)?;
    let side = arg.side.unwrap_or_else(|| board.side_to_move());
    let evaluator = WindowEvaluator::new(arg.weights.weights()?, board.shape());
    let mut searcher = Searcher::new(side, evaluator, arg.search.limits());

    eprintln!("{board}");
    let report = searcher
        .best_move(&board)
        .with_context(|| format!("Cannot search a move for {side}"))?;
    eprintln!(
        "{side} plays column {} (value {}, depth {}, {} nodes)",
        report.column, report.value, report.depth, report.nodes
    );
    util::print_json(&report)
}
