//! Flags shared by several subcommands.

use std::time::Duration;

use anyhow::Context as _;
use fourplay_engine::BoardShape;
use fourplay_evaluator::{search::SearchLimits, weights::Weights};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SearchArg {
    /// Deepest iterative-deepening pass, in plies
    #[arg(long, default_value_t = 6)]
    pub(crate) depth: u32,
    /// Time budget per move, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub(crate) time_ms: u64,
}

impl SearchArg {
    pub(crate) fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_depth: self.depth,
            time_budget: Duration::from_millis(self.time_ms),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ShapeArg {
    #[arg(long, default_value_t = 6)]
    pub(crate) rows: usize,
    #[arg(long, default_value_t = 7)]
    pub(crate) columns: usize,
    /// Pieces in a row needed to win
    #[arg(long, default_value_t = BoardShape::DEFAULT_WIN_LENGTH)]
    pub(crate) win_length: usize,
}

impl ShapeArg {
    pub(crate) fn shape(&self) -> anyhow::Result<BoardShape> {
        BoardShape::new(self.rows, self.columns, self.win_length).with_context(|| {
            format!(
                "invalid board shape {}x{} with win length {}",
                self.rows, self.columns, self.win_length
            )
        })
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct WeightsArg {
    /// Bonus per own piece in the center column
    #[arg(long, default_value_t = Weights::BALANCED.center)]
    pub(crate) center: i32,
    /// Value of a completed run
    #[arg(long, default_value_t = Weights::BALANCED.win)]
    pub(crate) win: i32,
    /// Value of a window one piece short of a run
    #[arg(long, default_value_t = Weights::BALANCED.open_three)]
    pub(crate) open_three: i32,
    /// Value of a window two pieces short of a run
    #[arg(long, default_value_t = Weights::BALANCED.open_two)]
    pub(crate) open_two: i32,
    /// Penalty for an opponent window one piece short of a run
    #[arg(long, default_value_t = Weights::BALANCED.block)]
    pub(crate) block: i32,
}

impl WeightsArg {
    pub(crate) fn weights(&self) -> anyhow::Result<Weights> {
        let weights = Weights {
            center: self.center,
            win: self.win,
            open_three: self.open_three,
            open_two: self.open_two,
            block: self.block,
        };
        anyhow::ensure!(
            weights.is_non_negative(),
            "weights must not be negative: {weights:?}"
        );
        Ok(weights)
    }
}
