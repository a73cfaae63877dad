//! Board state and game bookkeeping for Connect-Four-style games.
//!
//! - [`core`] - grid geometry ([`BoardShape`]), sides and cells, and the bitboard [`Board`]
//! - [`engine`] - a single game in progress ([`Game`]) and its [`GameOutcome`]
//!
//! Everything here is plain data: no search, no heuristics. Search lives in
//! `fourplay-evaluator`, which only needs [`Board::drop`], [`Board::open_columns`],
//! [`Board::is_win`], [`Board::is_terminal`] and [`Board::fingerprint`] from this crate.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("column {column} is full")]
pub struct ColumnFullError {
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("board must have at least one row and one column, got {rows}x{columns}")]
    Empty { rows: usize, columns: usize },
    #[display("board has {cells} cells, at most {max} are supported")]
    TooManyCells { cells: usize, max: usize },
    #[display("board has {columns} columns, at most {max} are supported")]
    TooManyColumns { columns: usize, max: usize },
    #[display("win length {win_length} does not fit a {rows}x{columns} board")]
    WinLength {
        win_length: usize,
        rows: usize,
        columns: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board text has no rows")]
    Empty,
    #[display("row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("unexpected cell character {ch:?} in row {row}")]
    InvalidCell { row: usize, ch: char },
    #[display("piece at row {row}, column {column} is floating above an empty cell")]
    FloatingPiece { row: usize, column: usize },
    #[display("piece counts {first} (X) and {second} (O) cannot come from alternating moves")]
    Imbalanced { first: usize, second: usize },
    #[display("invalid board shape")]
    Shape(ShapeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlayError {
    #[display("the game is already over")]
    GameOver,
    #[display("illegal move")]
    ColumnFull(ColumnFullError),
}
