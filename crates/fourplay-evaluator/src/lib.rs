//! Position evaluation, game-tree search and self-play matches.
//!
//! This crate turns a [`Weights`](weights::Weights) vector into a playing strength. It is
//! organized in three levels, each built on the one below:
//!
//! 1. **Position evaluation** ([`heuristic`]) - scores a board for one side as a weighted
//!    sum of window features (center occupancy, open twos and threes, opponent threats).
//!
//! 2. **Move selection** ([`search`]) - minimax with alpha-beta pruning, a
//!    [`TranspositionTable`](transposition::TranspositionTable), center-first move ordering
//!    and iterative deepening under a wall-clock budget.
//!
//! 3. **Match play** ([`match_runner`]) - complete games between two weight configurations,
//!    alternating who moves first, scored 1 / 0.5 / 0.
//!
//! # Architecture
//!
//! ```text
//! Match Runner (score a pair of weight vectors)
//!     ↓ drives
//! Searcher (best column for one side, one private table per game)
//!     ↓ calls at the leaves
//! Window Evaluator (score one position)
//! ```
//!
//! The genetic optimizer in `fourplay-training` only sees the top level through the
//! [`MatchPlayer`](match_runner::MatchPlayer) trait.
//!
//! # Example
//!
//! ```
//! use fourplay_engine::{Board, Side};
//! use fourplay_evaluator::{search::{SearchLimits, request_move}, weights::Weights};
//!
//! let board: Board = "
//!     .......
//!     .......
//!     .......
//!     .......
//!     ..OO...
//!     .XXX..O
//! ".parse()?;
//! let column = request_move(&board, Side::First, &Weights::default(), SearchLimits::default())?;
//! assert!(column == 0 || column == 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Determinism
//!
//! Evaluation and search are pure functions of (board, side, weights, table contents): no
//! randomness is involved once a search depth completes. The only time-dependent part is how
//! many depths iterative deepening manages to finish within its budget.

pub mod heuristic;
pub mod match_runner;
pub mod search;
pub mod transposition;
pub mod weights;
