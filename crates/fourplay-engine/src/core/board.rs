use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;

use crate::{ColumnFullError, ParseBoardError};

use super::{
    shape::{BoardShape, Direction, MAX_COLUMNS, low_bits},
    side::{Cell, Side},
};

/// Column indices, stack-allocated.
pub type ColumnList = ArrayVec<usize, MAX_COLUMNS>;

/// Exact encoding of a board's cell contents, usable as a memoization key.
///
/// Two boards of the same shape have equal fingerprints iff every cell matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u64; 2]);

/// Connect-Four grid stored as one bitboard per side.
///
/// The board is `Copy`: every copy owns its cells, so speculative moves on a copy never
/// touch the original.
///
/// # Example
///
/// ```
/// use fourplay_engine::{Board, Side};
///
/// let mut board = Board::default();
/// for column in 0..3 {
///     board.drop(column, Side::First)?;
///     board.drop(column, Side::Second)?;
/// }
/// assert!(!board.is_win(Side::First));
/// board.drop(3, Side::First)?;
/// assert!(board.is_win(Side::First));
/// assert!(board.is_terminal());
/// # Ok::<(), fourplay_engine::ColumnFullError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    shape: BoardShape,
    sides: [u64; 2],
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardShape::STANDARD)
    }
}

impl Board {
    #[must_use]
    pub const fn new(shape: BoardShape) -> Self {
        Self {
            shape,
            sides: [0; 2],
        }
    }

    #[must_use]
    pub const fn shape(&self) -> BoardShape {
        self.shape
    }

    /// Bitboard of the cells held by `side`.
    #[inline]
    #[must_use]
    pub const fn side_mask(&self, side: Side) -> u64 {
        self.sides[side.index()]
    }

    #[inline]
    #[must_use]
    pub const fn occupied_mask(&self) -> u64 {
        self.sides[0] | self.sides[1]
    }

    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Cell {
        let bit = self.shape.bit(row, column);
        Side::ALL
            .into_iter()
            .find(|side| self.side_mask(*side) & bit != 0)
            .map_or(Cell::Empty, Cell::Occupied)
    }

    #[must_use]
    pub fn piece_count(&self, side: Side) -> usize {
        self.side_mask(side).count_ones() as usize
    }

    /// Number of pieces stacked in `column`.
    #[must_use]
    pub fn column_height(&self, column: usize) -> usize {
        (self.occupied_mask() & self.shape.column_mask(column)).count_ones() as usize
    }

    #[inline]
    #[must_use]
    pub fn is_column_open(&self, column: usize) -> bool {
        column < self.shape.columns() && self.occupied_mask() & self.shape.top_mask(column) == 0
    }

    /// Open columns in ascending order.
    #[must_use]
    pub fn open_columns(&self) -> ColumnList {
        (0..self.shape.columns())
            .filter(|column| self.is_column_open(*column))
            .collect()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.occupied_mask() == self.shape.full_mask()
    }

    /// Drops a piece for `side` into `column` and returns the row it landed on.
    ///
    /// # Panics
    ///
    /// Panics if `column` is outside the board.
    pub fn drop(&mut self, column: usize, side: Side) -> Result<usize, ColumnFullError> {
        assert!(
            column < self.shape.columns(),
            "column {column} is outside a board with {} columns",
            self.shape.columns()
        );
        let row = self.column_height(column);
        if row >= self.shape.rows() {
            return Err(ColumnFullError { column });
        }
        self.sides[side.index()] |= self.shape.bit(row, column);
        Ok(row)
    }

    /// Returns a copy of this board with `column` played by `side`.
    pub fn with_drop(&self, column: usize, side: Side) -> Result<Self, ColumnFullError> {
        let mut next = *self;
        next.drop(column, side)?;
        Ok(next)
    }

    /// Whether `side` holds `win_length` consecutive cells in any orientation.
    #[must_use]
    pub fn is_win(&self, side: Side) -> bool {
        let mask = self.side_mask(side);
        // fewer pieces than a run can never win
        if (mask.count_ones() as usize) < self.shape.win_length() {
            return false;
        }
        // a run survives the shifts only at origins whose whole run is owned
        Direction::ALL.into_iter().any(|direction| {
            let step = self.shape.run_step(direction);
            let mut runs = mask & self.shape.run_origins(direction);
            for i in 1..self.shape.win_length() {
                let shift = u32::try_from(i * step).unwrap_or(u32::MAX);
                runs &= mask.checked_shr(shift).unwrap_or(0);
            }
            runs != 0
        })
    }

    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        Side::ALL.into_iter().find(|side| self.is_win(*side))
    }

    /// True iff either side has won or no column is open.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.is_full() || self.winner().is_some()
    }

    /// Side whose turn it is, assuming the first side opened and moves alternated.
    #[must_use]
    pub fn side_to_move(&self) -> Side {
        if self.piece_count(Side::First) > self.piece_count(Side::Second) {
            Side::Second
        } else {
            Side::First
        }
    }

    #[inline]
    #[must_use]
    pub const fn fingerprint(&self) -> Fingerprint {
        Fingerprint(self.sides)
    }

    /// Parses the text format produced by [`Display`](fmt::Display): one line per row,
    /// top row first, `.` for empty cells, `X` for [`Side::First`] and `O` for [`Side::Second`].
    ///
    /// Blank lines and surrounding whitespace are ignored.
    pub fn parse(text: &str, win_length: usize) -> Result<Self, ParseBoardError> {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let Some(first) = lines.first() else {
            return Err(ParseBoardError::Empty);
        };
        let columns = first.chars().count();
        let shape =
            BoardShape::new(lines.len(), columns, win_length).map_err(ParseBoardError::Shape)?;

        let mut board = Self::new(shape);
        for (i, line) in lines.iter().enumerate() {
            let row = shape.rows() - 1 - i;
            let len = line.chars().count();
            if len != columns {
                return Err(ParseBoardError::RaggedRow {
                    row,
                    len,
                    expected: columns,
                });
            }
            for (column, ch) in line.chars().enumerate() {
                if ch == Cell::EMPTY_SYMBOL {
                    continue;
                }
                let side = Side::from_symbol(ch).ok_or(ParseBoardError::InvalidCell { row, ch })?;
                board.sides[side.index()] |= shape.bit(row, column);
            }
        }

        for column in 0..columns {
            let height = board.column_height(column);
            let stacked = low_bits(height) << (column * shape.rows());
            let cells = board.occupied_mask() & shape.column_mask(column);
            if cells != stacked {
                let row = (0..shape.rows())
                    .rev()
                    .find(|row| cells & shape.bit(*row, column) != 0)
                    .unwrap_or_default();
                return Err(ParseBoardError::FloatingPiece { row, column });
            }
        }

        let first = board.piece_count(Side::First);
        let second = board.piece_count(Side::Second);
        if first != second && first != second + 1 {
            return Err(ParseBoardError::Imbalanced { first, second });
        }
        Ok(board)
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, BoardShape::DEFAULT_WIN_LENGTH)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.shape.rows()).rev() {
            for column in 0..self.shape.columns() {
                write!(f, "{}", self.cell(row, column).symbol())?;
            }
            if row > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    /// Checks every origin and orientation cell by cell, without bitboard windows.
    fn brute_force_is_win(board: &Board, side: Side) -> bool {
        let shape = board.shape();
        let n = shape.win_length();
        let rows = shape.rows();
        let columns = shape.columns();
        let owned = |r: usize, c: usize| board.cell(r, c) == Cell::Occupied(side);

        for r in 0..rows {
            for c in 0..columns {
                if c + n <= columns && (0..n).all(|i| owned(r, c + i)) {
                    return true;
                }
                if r + n <= rows && (0..n).all(|i| owned(r + i, c)) {
                    return true;
                }
                if r + n <= rows && c + n <= columns && (0..n).all(|i| owned(r + i, c + i)) {
                    return true;
                }
                if r + 1 >= n && c + n <= columns && (0..n).all(|i| owned(r - i, c + i)) {
                    return true;
                }
            }
        }
        false
    }

    fn random_board(rng: &mut Pcg64Mcg, shape: BoardShape) -> Board {
        let mut board = Board::new(shape);
        let moves = rng.random_range(0..=shape.cell_count());
        let mut side = Side::First;
        for _ in 0..moves {
            let open = board.open_columns();
            let Some(&column) = open.choose(rng) else {
                break;
            };
            board.drop(column, side).unwrap();
            side = side.opponent();
        }
        board
    }

    #[test]
    fn test_empty_board() {
        let board = Board::default();
        assert_eq!(board.open_columns().as_slice(), &[0, 1, 2, 3, 4, 5, 6]);
        assert!(!board.is_terminal());
        assert_eq!(board.side_to_move(), Side::First);
        for row in 0..6 {
            for column in 0..7 {
                assert_eq!(board.cell(row, column), Cell::Empty);
            }
        }
    }

    #[test]
    fn test_drop_obeys_gravity() {
        let mut board = Board::default();
        assert_eq!(board.drop(2, Side::First), Ok(0));
        assert_eq!(board.drop(2, Side::Second), Ok(1));
        assert_eq!(board.drop(5, Side::First), Ok(0));
        assert_eq!(board.cell(0, 2), Cell::Occupied(Side::First));
        assert_eq!(board.cell(1, 2), Cell::Occupied(Side::Second));
        assert_eq!(board.cell(2, 2), Cell::Empty);
        assert_eq!(board.column_height(2), 2);
    }

    #[test]
    fn test_drop_into_full_column() {
        let mut board = Board::default();
        let mut side = Side::First;
        for row in 0..6 {
            assert_eq!(board.drop(4, side), Ok(row));
            side = side.opponent();
        }
        assert!(!board.is_column_open(4));
        assert_eq!(board.drop(4, side), Err(ColumnFullError { column: 4 }));
        assert_eq!(board.open_columns().as_slice(), &[0, 1, 2, 3, 5, 6]);
    }

    #[test]
    fn test_copies_are_independent() {
        let original = Board::default();
        let mut copy = original;
        copy.drop(3, Side::First).unwrap();
        assert_eq!(original.column_height(3), 0);
        assert_ne!(original.fingerprint(), copy.fingerprint());

        let next = original.with_drop(3, Side::First).unwrap();
        assert_eq!(next, copy);
        assert_eq!(original.occupied_mask(), 0);
    }

    #[test]
    fn test_win_in_each_orientation() {
        let horizontal: Board = "
            .......
            .......
            .......
            .......
            OOO....
            XXXX...
        "
        .parse()
        .unwrap();
        assert!(horizontal.is_win(Side::First));
        assert!(!horizontal.is_win(Side::Second));

        let vertical: Board = "
            .......
            .......
            X......
            XO.....
            XO.....
            XO.....
        "
        .parse()
        .unwrap();
        assert!(vertical.is_win(Side::First));

        let rising: Board = "
            .......
            .......
            ...X...
            ..XO...
            .XOO...
            XOOXX..
        "
        .parse()
        .unwrap();
        assert!(rising.is_win(Side::First));
        assert!(!rising.is_win(Side::Second));

        let falling: Board = "
            .......
            .......
            O......
            XO.....
            XXO....
            XXXOO..
        "
        .parse()
        .unwrap();
        assert!(falling.is_win(Side::Second));
        assert!(!falling.is_win(Side::First));
    }

    #[test]
    fn test_is_win_matches_brute_force() {
        let mut rng = Pcg64Mcg::seed_from_u64(0x0c4f);
        let shapes = [
            BoardShape::STANDARD,
            BoardShape::new(5, 5, 3).unwrap(),
            BoardShape::new(8, 8, 5).unwrap(),
            BoardShape::new(1, 8, 3).unwrap(),
            BoardShape::new(8, 2, 2).unwrap(),
            BoardShape::new(4, 16, 4).unwrap(),
            BoardShape::new(2, 16, 6).unwrap(),
        ];
        for _ in 0..4000 {
            let shape = *shapes.choose(&mut rng).unwrap();
            let board = random_board(&mut rng, shape);
            for side in Side::ALL {
                assert_eq!(
                    board.is_win(side),
                    brute_force_is_win(&board, side),
                    "mismatch for {side:?} on\n{board}"
                );
            }
        }
    }

    #[test]
    fn test_full_board_without_winner_is_terminal() {
        let board: Board = "
            XXOOXXO
            OOXXOOX
            XXOOXXO
            OOXXOOX
            XXOOXXO
            OOXXOOX
        "
        .parse()
        .unwrap();
        assert!(board.is_full());
        assert_eq!(board.winner(), None);
        assert!(board.is_terminal());
        assert!(board.open_columns().is_empty());
    }

    #[test]
    fn test_display_round_trip() {
        let text = ".......\n.......\n.......\n...O...\n..XXO..\n.OXXXO.";
        let board: Board = text.parse().unwrap();
        assert_eq!(board.to_string(), text);
        assert_eq!(board.side_to_move(), Side::Second);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Board>(), Err(ParseBoardError::Empty));
        assert!(matches!(
            "....\n...".parse::<Board>(),
            Err(ParseBoardError::RaggedRow { len: 3, .. })
        ));
        assert!(matches!(
            "....\n..#.".parse::<Board>(),
            Err(ParseBoardError::InvalidCell { ch: '#', .. })
        ));
        assert_eq!(
            "....\n.X..\n....\n.O..".parse::<Board>(),
            Err(ParseBoardError::FloatingPiece { row: 2, column: 1 })
        );
        assert_eq!(
            "....\n....\n....\nXX..".parse::<Board>(),
            Err(ParseBoardError::Imbalanced {
                first: 2,
                second: 0
            })
        );
    }
}
