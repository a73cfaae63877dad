use serde::Serialize;

use crate::{
    PlayError,
    core::{board::Board, shape::BoardShape, side::Side},
};

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant, Serialize)]
pub enum GameOutcome {
    Win(Side),
    /// No column remains open and neither side has a winning run.
    Draw,
}

impl GameOutcome {
    /// Outcome of a terminal board, or `None` if the board is still in play.
    #[must_use]
    pub fn of(board: &Board) -> Option<Self> {
        if let Some(side) = board.winner() {
            Some(Self::Win(side))
        } else if board.is_full() {
            Some(Self::Draw)
        } else {
            None
        }
    }

    /// Match points earned by `side`: 1 for a win, 0.5 for a draw, 0 for a loss.
    #[must_use]
    pub fn points(self, side: Side) -> f32 {
        match self {
            Self::Win(winner) if winner == side => 1.0,
            Self::Win(_) => 0.0,
            Self::Draw => 0.5,
        }
    }
}

/// A game in progress: the authoritative board, the moves played and the outcome once
/// the board becomes terminal.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    moves: Vec<usize>,
    outcome: Option<GameOutcome>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(BoardShape::STANDARD)
    }
}

impl Game {
    #[must_use]
    pub fn new(shape: BoardShape) -> Self {
        Self::from_board(Board::new(shape))
    }

    /// Starts from an arbitrary position; the game may already be over.
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            moves: vec![],
            outcome: GameOutcome::of(&board),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Columns played since the game started, in order.
    #[must_use]
    pub fn moves(&self) -> &[usize] {
        &self.moves
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn side_to_move(&self) -> Side {
        self.board.side_to_move()
    }

    /// Drops a piece for the side to move and returns the outcome if the move ended the game.
    pub fn play(&mut self, column: usize) -> Result<Option<GameOutcome>, PlayError> {
        if self.is_over() {
            return Err(PlayError::GameOver);
        }
        let side = self.side_to_move();
        self.board
            .drop(column, side)
            .map_err(PlayError::ColumnFull)?;
        self.moves.push(column);
        self.outcome = GameOutcome::of(&self.board);
        Ok(self.outcome)
    }
}
