use serde::Serialize;

use crate::ShapeError;

/// Maximum number of columns a board may have.
///
/// Column lists are stack-allocated with this capacity.
pub const MAX_COLUMNS: usize = 16;

/// Maximum number of cells a board may have (one `u64` bitboard per side).
pub const MAX_CELLS: usize = u64::BITS as usize;

/// Line orientations a winning run may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
    /// Bottom-left to top-right.
    Rising,
    /// Top-left to bottom-right.
    Falling,
}

impl Direction {
    pub const ALL: [Self; 4] = [
        Self::Horizontal,
        Self::Vertical,
        Self::Rising,
        Self::Falling,
    ];

    /// Returns the next `(row, column)` along this direction, or `None` when it would leave
    /// the non-negative quadrant. Upper bounds are checked by the caller.
    #[inline]
    #[must_use]
    pub fn step(self, row: usize, column: usize) -> Option<(usize, usize)> {
        match self {
            Self::Horizontal => Some((row, column + 1)),
            Self::Vertical => Some((row + 1, column)),
            Self::Rising => Some((row + 1, column + 1)),
            Self::Falling => Some((row.checked_sub(1)?, column + 1)),
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
            Self::Rising => 2,
            Self::Falling => 3,
        }
    }
}

/// Grid dimensions and the run length that wins.
///
/// Cells are addressed by `(row, column)` with row 0 at the bottom. Bit `column * rows + row`
/// of a bitboard holds the cell, so every column occupies a contiguous run of bits.
///
/// # Example
///
/// ```
/// use fourplay_engine::BoardShape;
///
/// let shape = BoardShape::STANDARD;
/// assert_eq!((shape.rows(), shape.columns(), shape.win_length()), (6, 7, 4));
/// assert_eq!(shape.center_column(), 3);
/// assert_eq!(shape.windows().count(), 69);
///
/// assert!(BoardShape::new(9, 9, 4).is_err()); // 81 cells do not fit in a u64
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BoardShape {
    rows: usize,
    columns: usize,
    win_length: usize,
    /// Per [`Direction::index`], the cells a full run can start from.
    #[serde(skip)]
    run_origins: [u64; 4],
}

impl Default for BoardShape {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl BoardShape {
    pub const STANDARD: Self = Self::build(6, 7, 4);

    pub const DEFAULT_WIN_LENGTH: usize = 4;

    pub fn new(rows: usize, columns: usize, win_length: usize) -> Result<Self, ShapeError> {
        if rows == 0 || columns == 0 {
            return Err(ShapeError::Empty { rows, columns });
        }
        if columns > MAX_COLUMNS {
            return Err(ShapeError::TooManyColumns {
                columns,
                max: MAX_COLUMNS,
            });
        }
        let cells = rows * columns;
        if cells > MAX_CELLS {
            return Err(ShapeError::TooManyCells {
                cells,
                max: MAX_CELLS,
            });
        }
        if win_length < 2 || win_length > usize::max(rows, columns) {
            return Err(ShapeError::WinLength {
                win_length,
                rows,
                columns,
            });
        }
        Ok(Self::build(rows, columns, win_length))
    }

    const fn build(rows: usize, columns: usize, win_length: usize) -> Self {
        let mut shape = Self {
            rows,
            columns,
            win_length,
            run_origins: [0; 4],
        };
        let mut i = 0;
        while i < Direction::ALL.len() {
            shape.run_origins[i] = shape.compute_run_origins(Direction::ALL[i]);
            i += 1;
        }
        shape
    }

    const fn compute_run_origins(self, direction: Direction) -> u64 {
        let span = self.win_length - 1;
        let (row_start, row_end, column_end) = match direction {
            Direction::Horizontal => (0, self.rows, self.columns.saturating_sub(span)),
            Direction::Vertical => (0, self.rows.saturating_sub(span), self.columns),
            Direction::Rising => (
                0,
                self.rows.saturating_sub(span),
                self.columns.saturating_sub(span),
            ),
            Direction::Falling => (span, self.rows, self.columns.saturating_sub(span)),
        };
        if row_start >= row_end {
            return 0;
        }
        let column_bits = low_bits(row_end - row_start) << row_start;
        let mut mask = 0;
        let mut column = 0;
        while column < column_end {
            mask |= column_bits << (column * self.rows);
            column += 1;
        }
        mask
    }

    #[must_use]
    pub const fn rows(self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn columns(self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn win_length(self) -> usize {
        self.win_length
    }

    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.rows * self.columns
    }

    /// Middle column (the left one of the two middles on an even width).
    #[must_use]
    pub const fn center_column(self) -> usize {
        self.columns / 2
    }

    #[inline]
    #[must_use]
    pub const fn bit(self, row: usize, column: usize) -> u64 {
        debug_assert!(row < self.rows && column < self.columns);
        1 << (column * self.rows + row)
    }

    /// All cells of `column`.
    #[inline]
    #[must_use]
    pub const fn column_mask(self, column: usize) -> u64 {
        debug_assert!(column < self.columns);
        low_bits(self.rows) << (column * self.rows)
    }

    /// Top cell of `column`; the column is open iff this cell is empty.
    #[inline]
    #[must_use]
    pub const fn top_mask(self, column: usize) -> u64 {
        self.bit(self.rows - 1, column)
    }

    /// Every cell of the grid.
    #[must_use]
    pub const fn full_mask(self) -> u64 {
        low_bits(self.cell_count())
    }

    /// Cells from which `win_length` cells along `direction` all lie on the grid.
    #[inline]
    #[must_use]
    pub const fn run_origins(self, direction: Direction) -> u64 {
        self.run_origins[direction.index()]
    }

    /// Bit distance between neighboring cells along `direction`.
    #[inline]
    #[must_use]
    pub const fn run_step(self, direction: Direction) -> usize {
        match direction {
            Direction::Horizontal => self.rows,
            Direction::Vertical => 1,
            Direction::Rising => self.rows + 1,
            Direction::Falling => self.rows - 1,
        }
    }

    /// Bitmask of the `win_length` cells starting at `(row, column)` and walking along
    /// `direction`, or `None` if the run leaves the grid.
    #[must_use]
    pub fn window_mask(self, row: usize, column: usize, direction: Direction) -> Option<u64> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        let (mut r, mut c) = (row, column);
        let mut mask = self.bit(r, c);
        for _ in 1..self.win_length {
            (r, c) = direction.step(r, c)?;
            if r >= self.rows || c >= self.columns {
                return None;
            }
            mask |= self.bit(r, c);
        }
        Some(mask)
    }

    /// Iterates over every contiguous run of `win_length` cells, in all four orientations,
    /// from every valid origin.
    pub fn windows(self) -> impl Iterator<Item = u64> {
        Direction::ALL.into_iter().flat_map(move |direction| {
            (0..self.rows).flat_map(move |row| {
                (0..self.columns)
                    .filter_map(move |column| self.window_mask(row, column, direction))
            })
        })
    }
}

/// Mask with the lowest `count` bits set.
#[inline]
pub(crate) const fn low_bits(count: usize) -> u64 {
    if count == 0 {
        0
    } else {
        u64::MAX >> (MAX_CELLS - count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_window_count() {
        let shape = BoardShape::STANDARD;
        let count = |direction| {
            (0..shape.rows())
                .flat_map(|r| (0..shape.columns()).map(move |c| (r, c)))
                .filter(|&(r, c)| shape.window_mask(r, c, direction).is_some())
                .count()
        };
        assert_eq!(count(Direction::Horizontal), 24);
        assert_eq!(count(Direction::Vertical), 21);
        assert_eq!(count(Direction::Rising), 12);
        assert_eq!(count(Direction::Falling), 12);
        assert_eq!(shape.windows().count(), 69);
    }

    #[test]
    fn test_run_origins_match_window_origins() {
        for shape in [
            BoardShape::STANDARD,
            BoardShape::new(1, 8, 3).unwrap(),
            BoardShape::new(8, 2, 2).unwrap(),
            BoardShape::new(4, 16, 4).unwrap(),
            BoardShape::new(8, 8, 8).unwrap(),
        ] {
            for direction in Direction::ALL {
                let expected = (0..shape.rows())
                    .flat_map(|r| (0..shape.columns()).map(move |c| (r, c)))
                    .filter(|&(r, c)| shape.window_mask(r, c, direction).is_some())
                    .fold(0, |acc, (r, c)| acc | shape.bit(r, c));
                assert_eq!(
                    shape.run_origins(direction),
                    expected,
                    "{direction:?} on {shape:?}"
                );
            }
        }
    }

    #[test]
    fn test_windows_have_win_length_cells() {
        for shape in [
            BoardShape::STANDARD,
            BoardShape::new(4, 4, 3).unwrap(),
            BoardShape::new(8, 8, 5).unwrap(),
        ] {
            for mask in shape.windows() {
                assert_eq!(mask.count_ones() as usize, shape.win_length());
                assert_eq!(mask & !shape.full_mask(), 0, "window leaves the grid");
            }
        }
    }

    #[test]
    fn test_column_masks_partition_grid() {
        let shape = BoardShape::STANDARD;
        let union = (0..shape.columns()).fold(0, |acc, c| {
            let mask = shape.column_mask(c);
            assert_eq!(acc & mask, 0, "column {c} overlaps another column");
            acc | mask
        });
        assert_eq!(union, shape.full_mask());
    }

    #[test]
    fn test_full_mask_with_64_cells() {
        let shape = BoardShape::new(8, 8, 4).unwrap();
        assert_eq!(shape.full_mask(), u64::MAX);
        assert_eq!(shape.top_mask(7), 1 << 63);
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(matches!(
            BoardShape::new(0, 7, 4),
            Err(ShapeError::Empty { .. })
        ));
        assert!(matches!(
            BoardShape::new(9, 8, 4),
            Err(ShapeError::TooManyCells { cells: 72, .. })
        ));
        assert!(matches!(
            BoardShape::new(2, 17, 2),
            Err(ShapeError::TooManyColumns { .. })
        ));
        assert!(matches!(
            BoardShape::new(3, 3, 4),
            Err(ShapeError::WinLength { .. })
        ));
        assert!(matches!(
            BoardShape::new(6, 7, 1),
            Err(ShapeError::WinLength { .. })
        ));
    }
}
