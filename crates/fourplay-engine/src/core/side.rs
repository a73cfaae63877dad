use serde::{Deserialize, Serialize};

/// One of the two competing sides.
///
/// [`Side::First`] always makes the opening move of a game started from an empty board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize,
)]
pub enum Side {
    #[display("X")]
    First,
    #[display("O")]
    Second,
}

impl Side {
    pub const ALL: [Self; 2] = [Self::First, Self::Second];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Index into per-side arrays (`0` for first, `1` for second).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    /// Character used by the board text format.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::First => 'X',
            Self::Second => 'O',
        }
    }

    #[must_use]
    pub const fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            'X' | 'x' => Some(Self::First),
            'O' | 'o' => Some(Self::Second),
            _ => None,
        }
    }
}

/// Contents of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Cell {
    Empty,
    Occupied(Side),
}

impl Cell {
    pub const EMPTY_SYMBOL: char = '.';

    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Empty => None,
            Self::Occupied(side) => Some(side),
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => Self::EMPTY_SYMBOL,
            Self::Occupied(side) => side.symbol(),
        }
    }
}
