//! Position evaluation: scoring a board for one side.
//!
//! This module implements the first level of the evaluator architecture. The score guides the
//! search at its leaves, where the game is not decided yet.
//!
//! # How It Works
//!
//! The score is a weighted sum of two kinds of terms:
//!
//! 1. **Center occupancy** - the side's pieces in the center column, times `center`
//! 2. **Windows** - every run of `win_length` contiguous cells, in all four orientations, is
//!    classified by how many cells each side holds in it
//!
//! With a run length of `n`, a window contributes:
//!
//! | Own | Opponent | Empty | Contribution   |
//! |-----|----------|-------|----------------|
//! | n   | 0        | 0     | `+win`         |
//! | n-1 | 0        | 1     | `+open_three`  |
//! | n-2 | 0        | 2     | `+open_two`    |
//! | 0   | n-1      | 1     | `-block`       |
//!
//! Every other window contributes nothing. The first three rows are mutually exclusive, and
//! the last one can only match a window without own pieces, so a window triggers at most one
//! offensive and at most one defensive term.
//!
//! # Determinism
//!
//! [`score`] is a pure function of (board, side, weights). The genetic optimizer compares
//! fitness across games, so the same position must always evaluate the same way.

use std::fmt;

use fourplay_engine::{Board, BoardShape, Side};

use crate::weights::Weights;

/// Scores positions for one side (higher is better for that side).
pub trait PositionEvaluator: fmt::Debug + Send + Sync {
    fn evaluate(&self, board: &Board, side: Side) -> i64;
}

/// Window-based evaluator with the window masks of one board shape precomputed.
///
/// # Example
///
/// ```
/// use fourplay_engine::{Board, Side};
/// use fourplay_evaluator::{
///     heuristic::{PositionEvaluator as _, WindowEvaluator},
///     weights::Weights,
/// };
///
/// let board: Board = "
///     .......
///     .......
///     .......
///     .......
///     .......
///     ...X...
/// ".parse()?;
/// let evaluator = WindowEvaluator::new(Weights::default(), board.shape());
/// assert!(evaluator.evaluate(&board, Side::First) > evaluator.evaluate(&board, Side::Second));
/// # Ok::<(), fourplay_engine::ParseBoardError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WindowEvaluator {
    weights: Weights,
    shape: BoardShape,
    center: u64,
    windows: Vec<u64>,
}

impl WindowEvaluator {
    #[must_use]
    pub fn new(weights: Weights, shape: BoardShape) -> Self {
        Self {
            weights,
            shape,
            center: shape.column_mask(shape.center_column()),
            windows: shape.windows().collect(),
        }
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    #[must_use]
    pub fn shape(&self) -> BoardShape {
        self.shape
    }
}

impl PositionEvaluator for WindowEvaluator {
    fn evaluate(&self, board: &Board, side: Side) -> i64 {
        debug_assert_eq!(board.shape(), self.shape);
        score_masks(
            board,
            side,
            &self.weights,
            self.center,
            self.windows.iter().copied(),
        )
    }
}

/// Scores `board` for `side` without precomputed masks.
#[must_use]
pub fn score(board: &Board, side: Side, weights: &Weights) -> i64 {
    let shape = board.shape();
    score_masks(
        board,
        side,
        weights,
        shape.column_mask(shape.center_column()),
        shape.windows(),
    )
}

fn score_masks(
    board: &Board,
    side: Side,
    weights: &Weights,
    center: u64,
    windows: impl Iterator<Item = u64>,
) -> i64 {
    let n = board.shape().win_length();
    let own = board.side_mask(side);
    let opponent = board.side_mask(side.opponent());

    let mut total = i64::from(weights.center) * i64::from((own & center).count_ones());
    for window in windows {
        let mine = (own & window).count_ones() as usize;
        let theirs = (opponent & window).count_ones() as usize;
        let empty = n - mine - theirs;

        if theirs == 0 {
            if mine == n {
                total += i64::from(weights.win);
            } else if mine + 1 == n {
                total += i64::from(weights.open_three);
            } else if mine > 0 && mine + 2 == n {
                total += i64::from(weights.open_two);
            }
        }
        if theirs + 1 == n && empty == 1 {
            total -= i64::from(weights.block);
        }
    }
    total
}
