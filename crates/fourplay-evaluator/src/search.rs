//! Move selection: alpha-beta search with memoization and iterative deepening.
//!
//! This module implements the second level of the evaluator architecture: choosing the column
//! to play by looking several moves ahead.
//!
//! # How It Works
//!
//! [`AlphaBeta::search`] is a fail-soft minimax search with alpha-beta pruning. Every call
//!
//! 1. **Probes the table** - an entry searched at least as deep as the current call narrows
//!    the window (`Exact` returns at once, `Lower` raises alpha, `Upper` lowers beta), and an
//!    empty window returns the stored value
//! 2. **Checks for leaves** - a won position scores [`WIN_VALUE`] plus the remaining depth
//!    (a lost one the negation), a full board scores zero, and depth zero asks the
//!    [`PositionEvaluator`]
//! 3. **Orders moves** - open columns by distance from the center column, left before right on
//!    ties; below the root the table's best column goes first
//! 4. **Recurses** - children are searched on board copies, keeping the first move that
//!    strictly improves the value
//! 5. **Stores** - the value is classified against the window the call started with and
//!    written to the table
//!
//! Values are always from the point of view of the searching side: it maximizes, the opponent
//! minimizes.
//!
//! # Iterative Deepening
//!
//! [`Searcher::best_move`] searches depth 1, 2, 3, ... with the same table, so every pass starts
//! from the best columns of the previous one. The root itself is always searched in
//! center-first order, so equal-valued columns resolve exactly as in a single fixed-depth
//! search. The clock is only checked between passes: a pass that starts always finishes.
//! Deepening stops at [`SearchLimits::max_depth`], when the budget is used up, or as soon as a
//! pass finds a forced win. If no pass ran at all, the most central open column is played.

use std::time::{Duration, Instant};

use fourplay_engine::{Board, ColumnList, Side};
use serde::{Deserialize, Serialize};

use crate::{
    heuristic::{PositionEvaluator, WindowEvaluator},
    transposition::{Bound, TableEntry, TranspositionTable},
    weights::Weights,
};

/// Value of a won position with no depth remaining.
///
/// Larger than any score a [`PositionEvaluator`] over `i32` weights can reach on a 64-cell
/// board, so a forced win always outranks heuristic noise.
pub const WIN_VALUE: i64 = 1 << 60;

/// Initial window bound, beyond any reachable value.
pub const INFINITY: i64 = i64::MAX / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no legal move: the game is already over")]
pub struct NoLegalMoveError;

/// Result of one [`AlphaBeta::search`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SearchOutcome {
    /// Terminal position or depth exhausted: no move was searched.
    Leaf { value: i64 },
    /// Best move found and its value.
    Move { column: usize, value: i64 },
}

impl SearchOutcome {
    #[must_use]
    pub fn value(self) -> i64 {
        match self {
            Self::Leaf { value } | Self::Move { value, .. } => value,
        }
    }

    #[must_use]
    pub fn column(self) -> Option<usize> {
        match self {
            Self::Leaf { .. } => None,
            Self::Move { column, .. } => Some(column),
        }
    }

    fn from_entry(entry: &TableEntry) -> Self {
        match entry.best_column {
            Some(column) => Self::Move {
                column,
                value: entry.value,
            },
            None => Self::Leaf { value: entry.value },
        }
    }
}

/// Open columns ordered by distance from the center column, left first on ties.
#[must_use]
pub fn ordered_columns(board: &Board) -> ColumnList {
    let center = board.shape().center_column();
    let mut columns = board.open_columns();
    columns.sort_by_key(|column| column.abs_diff(center));
    columns
}

/// One fixed-depth alpha-beta search for `side`.
#[derive(Debug)]
pub struct AlphaBeta<'a, E: ?Sized> {
    side: Side,
    evaluator: &'a E,
    table: Option<&'a mut TranspositionTable>,
    nodes: u64,
}

impl<'a, E> AlphaBeta<'a, E>
where
    E: PositionEvaluator + ?Sized,
{
    /// Search without memoization.
    #[must_use]
    pub fn new(side: Side, evaluator: &'a E) -> Self {
        Self {
            side,
            evaluator,
            table: None,
            nodes: 0,
        }
    }

    #[must_use]
    pub fn with_table(side: Side, evaluator: &'a E, table: &'a mut TranspositionTable) -> Self {
        Self {
            side,
            evaluator,
            table: Some(table),
            nodes: 0,
        }
    }

    /// Positions visited so far, table hits included.
    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches `board` to `depth` plies within the `(alpha, beta)` window.
    ///
    /// `maximizing` is true when the searching side is to move. The columns of `board` itself
    /// are always tried in center-first order, whatever the table suggests.
    pub fn search(
        &mut self,
        board: &Board,
        depth: u32,
        alpha: i64,
        beta: i64,
        maximizing: bool,
    ) -> SearchOutcome {
        self.search_node(board, depth, alpha, beta, maximizing, true)
    }

    fn search_node(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: i64,
        mut beta: i64,
        maximizing: bool,
        is_root: bool,
    ) -> SearchOutcome {
        self.nodes += 1;
        let (alpha_on_entry, beta_on_entry) = (alpha, beta);
        let key = board.fingerprint();

        let mut hint = None;
        if let Some(entry) = self.table.as_deref().and_then(|table| table.probe(key)) {
            hint = entry.best_column;
            if entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => return SearchOutcome::from_entry(entry),
                    Bound::Lower => alpha = alpha.max(entry.value),
                    Bound::Upper => beta = beta.min(entry.value),
                }
                if alpha >= beta {
                    return SearchOutcome::from_entry(entry);
                }
            }
        }

        if let Some(winner) = board.winner() {
            let value = WIN_VALUE + i64::from(depth);
            let value = if winner == self.side { value } else { -value };
            return SearchOutcome::Leaf { value };
        }
        if board.is_full() {
            return SearchOutcome::Leaf { value: 0 };
        }
        if depth == 0 {
            let value = self.evaluator.evaluate(board, self.side);
            return SearchOutcome::Leaf { value };
        }

        let mut columns = ordered_columns(board);
        let hinted = hint
            .filter(|_| !is_root)
            .and_then(|hint| columns.iter().position(|c| *c == hint));
        if let Some(position) = hinted {
            columns[..=position].rotate_right(1);
        }

        let mover = if maximizing {
            self.side
        } else {
            self.side.opponent()
        };
        let mut best: Option<(usize, i64)> = None;
        for column in columns {
            let child = board
                .with_drop(column, mover)
                .expect("open column must accept a piece");
            let value = self
                .search_node(&child, depth - 1, alpha, beta, !maximizing, false)
                .value();
            let improves = best.is_none_or(|(_, best_value)| {
                if maximizing {
                    value > best_value
                } else {
                    value < best_value
                }
            });
            if improves {
                best = Some((column, value));
            }
            if maximizing {
                alpha = alpha.max(value);
            } else {
                beta = beta.min(value);
            }
            if alpha >= beta {
                break;
            }
        }
        let (column, value) = best.expect("non-terminal position has an open column");

        if let Some(table) = self.table.as_deref_mut() {
            table.store(
                key,
                TableEntry {
                    value,
                    bound: Bound::classify(value, alpha_on_entry, beta_on_entry),
                    depth,
                    best_column: Some(column),
                },
            );
        }
        SearchOutcome::Move { column, value }
    }
}

/// Depth ceiling and wall-clock budget for one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    pub max_depth: u32,
    pub time_budget: Duration,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: 6,
            time_budget: Duration::from_millis(500),
        }
    }
}

impl SearchLimits {
    /// Limits that always search to `max_depth`.
    #[must_use]
    pub const fn depth_only(max_depth: u32) -> Self {
        Self {
            max_depth,
            time_budget: Duration::MAX,
        }
    }
}

/// Chosen column and how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    pub column: usize,
    /// Value of the deepest completed pass, or 0 for the fallback move.
    pub value: i64,
    /// Deepest completed pass, 0 when the fallback move was played.
    pub depth: u32,
    /// Positions visited over all passes.
    pub nodes: u64,
}

impl SearchReport {
    #[must_use]
    pub fn is_forced_win(&self) -> bool {
        self.value >= WIN_VALUE
    }
}

/// Iterative-deepening move selection for one side, over one game.
///
/// The searcher owns its transposition table. Create one per side per game and drop it when
/// the game ends.
#[derive(Debug)]
pub struct Searcher<E> {
    side: Side,
    evaluator: E,
    limits: SearchLimits,
    table: TranspositionTable,
}

impl<E> Searcher<E>
where
    E: PositionEvaluator,
{
    #[must_use]
    pub fn new(side: Side, evaluator: E, limits: SearchLimits) -> Self {
        Self {
            side,
            evaluator,
            limits,
            table: TranspositionTable::new(),
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    #[must_use]
    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    /// Picks a column for this searcher's side on `board`.
    ///
    /// Returns an error only if the game is already over; running out of time is never an
    /// error.
    pub fn best_move(&mut self, board: &Board) -> Result<SearchReport, NoLegalMoveError> {
        if board.is_terminal() {
            return Err(NoLegalMoveError);
        }
        let fallback = *ordered_columns(board).first().ok_or(NoLegalMoveError)?;

        let start = Instant::now();
        let mut report = SearchReport {
            column: fallback,
            value: 0,
            depth: 0,
            nodes: 0,
        };
        for depth in 1..=self.limits.max_depth {
            if start.elapsed() >= self.limits.time_budget {
                log::debug!(
                    "{} stops before depth {depth} after {:?}",
                    self.side,
                    start.elapsed()
                );
                break;
            }
            let mut search = AlphaBeta::with_table(self.side, &self.evaluator, &mut self.table);
            let outcome = search.search(board, depth, -INFINITY, INFINITY, true);
            let nodes = report.nodes + search.nodes();
            let Some(column) = outcome.column() else {
                break;
            };
            report = SearchReport {
                column,
                value: outcome.value(),
                depth,
                nodes,
            };
            log::debug!(
                "{} depth {depth}: column {column}, value {}, {nodes} nodes",
                self.side,
                report.value
            );
            if report.is_forced_win() {
                break;
            }
        }
        Ok(report)
    }
}

/// Best column for `side` on `board` with a fresh table.
///
/// This is the single-turn entry point for interactive front ends.
///
/// # Example
///
/// ```
/// use fourplay_engine::{Board, Side};
/// use fourplay_evaluator::{search::{SearchLimits, request_move}, weights::Weights};
///
/// let board: Board = "
///     .......
///     .......
///     .......
///     O......
///     O......
///     XXX...O
/// ".parse()?;
/// let limits = SearchLimits::depth_only(1);
/// assert_eq!(request_move(&board, Side::First, &Weights::default(), limits)?, 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn request_move(
    board: &Board,
    side: Side,
    weights: &Weights,
    limits: SearchLimits,
) -> Result<usize, NoLegalMoveError> {
    let evaluator = WindowEvaluator::new(*weights, board.shape());
    let mut searcher = Searcher::new(side, evaluator, limits);
    searcher.best_move(board).map(|report| report.column)
}

#[cfg(test)]
mod tests {
    use fourplay_engine::BoardShape;
    use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    /// Unpruned minimax with the same leaf values as [`AlphaBeta`].
    fn minimax(
        board: &Board,
        depth: u32,
        maximizing: bool,
        side: Side,
        evaluator: &WindowEvaluator,
    ) -> i64 {
        if let Some(winner) = board.winner() {
            let value = WIN_VALUE + i64::from(depth);
            return if winner == side { value } else { -value };
        }
        if board.is_full() {
            return 0;
        }
        if depth == 0 {
            return evaluator.evaluate(board, side);
        }
        let mover = if maximizing { side } else { side.opponent() };
        let values = board.open_columns().into_iter().map(|column| {
            let child = board.with_drop(column, mover).unwrap();
            minimax(&child, depth - 1, !maximizing, side, evaluator)
        });
        if maximizing {
            values.max().unwrap()
        } else {
            values.min().unwrap()
        }
    }

    fn random_position(rng: &mut Pcg64Mcg, shape: BoardShape, max_moves: usize) -> Board {
        loop {
            let mut board = Board::new(shape);
            let mut side = Side::First;
            for _ in 0..rng.random_range(0..=max_moves) {
                if board.is_terminal() {
                    break;
                }
                let open = board.open_columns();
                let column = *open.choose(rng).unwrap();
                board.drop(column, side).unwrap();
                side = side.opponent();
            }
            if !board.is_terminal() {
                return board;
            }
        }
    }

    fn weights() -> Weights {
        Weights {
            center: 3,
            win: 100_000,
            open_three: 5,
            open_two: 2,
            block: 4,
        }
    }

    fn board(text: &str) -> Board {
        text.parse().unwrap()
    }

    #[test]
    fn test_alpha_beta_matches_minimax() {
        let mut rng = Pcg64Mcg::seed_from_u64(0xab);
        for shape in [BoardShape::new(4, 5, 3).unwrap(), BoardShape::STANDARD] {
            let evaluator = WindowEvaluator::new(weights(), shape);
            for _ in 0..40 {
                let board = random_position(&mut rng, shape, shape.cell_count() / 2);
                let side = board.side_to_move();
                for depth in 1..=3 {
                    let expected = minimax(&board, depth, true, side, &evaluator);
                    let actual = AlphaBeta::new(side, &evaluator)
                        .search(&board, depth, -INFINITY, INFINITY, true)
                        .value();
                    assert_eq!(actual, expected, "depth {depth} on\n{board}");
                }
            }
        }
    }

    #[test]
    fn test_table_does_not_change_values() {
        let mut rng = Pcg64Mcg::seed_from_u64(0x77);
        let shape = BoardShape::STANDARD;
        let evaluator = WindowEvaluator::new(weights(), shape);
        for _ in 0..30 {
            let board = random_position(&mut rng, shape, 12);
            let side = board.side_to_move();
            for depth in [2, 4] {
                let mut table = TranspositionTable::new();
                let mut with_table = AlphaBeta::with_table(side, &evaluator, &mut table);
                let memoized = with_table.search(&board, depth, -INFINITY, INFINITY, true);
                let plain =
                    AlphaBeta::new(side, &evaluator).search(&board, depth, -INFINITY, INFINITY, true);
                assert_eq!(memoized.value(), plain.value(), "depth {depth} on\n{board}");
                assert!(!table.is_empty());
            }
        }
    }

    #[test]
    fn test_leaf_outcomes() {
        let evaluator = WindowEvaluator::new(weights(), BoardShape::STANDARD);
        let won = board(
            "
            .......
            .......
            .......
            .......
            OOO....
            XXXX...
            ",
        );
        let mut search = AlphaBeta::new(Side::First, &evaluator);
        assert_eq!(
            search.search(&won, 3, -INFINITY, INFINITY, false),
            SearchOutcome::Leaf {
                value: WIN_VALUE + 3
            }
        );
        let mut search = AlphaBeta::new(Side::Second, &evaluator);
        assert_eq!(
            search.search(&won, 3, -INFINITY, INFINITY, true).value(),
            -(WIN_VALUE + 3)
        );

        let empty = Board::default();
        let mut search = AlphaBeta::new(Side::First, &evaluator);
        assert_eq!(
            search.search(&empty, 0, -INFINITY, INFINITY, true),
            SearchOutcome::Leaf { value: 0 }
        );
        assert_eq!(search.nodes(), 1);
    }

    #[test]
    fn test_ties_keep_first_ordered_candidate() {
        let flat = Weights {
            center: 0,
            win: 0,
            open_three: 0,
            open_two: 0,
            block: 0,
        };
        let evaluator = WindowEvaluator::new(flat, BoardShape::STANDARD);
        for depth in 1..=3 {
            let outcome = AlphaBeta::new(Side::First, &evaluator).search(
                &Board::default(),
                depth,
                -INFINITY,
                INFINITY,
                true,
            );
            assert_eq!(outcome, SearchOutcome::Move { column: 3, value: 0 });
        }
    }

    #[test]
    fn test_ordered_columns() {
        assert_eq!(
            ordered_columns(&Board::default()).as_slice(),
            &[3, 2, 4, 1, 5, 0, 6]
        );
        let even = Board::new(BoardShape::new(4, 6, 4).unwrap());
        assert_eq!(ordered_columns(&even).as_slice(), &[3, 2, 4, 1, 5, 0]);

        let mut board = Board::default();
        for _ in 0..3 {
            board.drop(3, Side::First).unwrap();
            board.drop(3, Side::Second).unwrap();
        }
        assert_eq!(ordered_columns(&board).as_slice(), &[2, 4, 1, 5, 0, 6]);
    }

    #[test]
    fn test_takes_immediate_win() {
        // X has three on the bottom row; only column 6 completes four, since O already
        // blocks column 2 and columns 3 and 4 are stacked.
        let board = board(
            "
            .......
            .......
            .......
            .......
            ...OO..
            ..OXXX.
            ",
        );
        assert_eq!(board.side_to_move(), Side::First);
        for depth in 1..=5 {
            let column = request_move(
                &board,
                Side::First,
                &Weights::default(),
                SearchLimits::depth_only(depth),
            )
            .unwrap();
            assert_eq!(column, 6, "depth {depth}");
        }
    }

    #[test]
    fn test_blocks_immediate_threat() {
        // O threatens column 6 on the bottom row, X cannot win this turn
        let board = board(
            "
            .......
            .......
            .......
            .......
            ...XX..
            ..XOOO.
            ",
        );
        assert_eq!(board.side_to_move(), Side::First);
        for depth in 2..=5 {
            let column = request_move(
                &board,
                Side::First,
                &Weights::default(),
                SearchLimits::depth_only(depth),
            )
            .unwrap();
            assert_eq!(column, 6, "depth {depth}");
        }
    }

    #[test]
    fn test_deepening_matches_fixed_depth_move() {
        let mut rng = Pcg64Mcg::seed_from_u64(0x1d);
        let shape = BoardShape::STANDARD;
        let evaluator = WindowEvaluator::new(weights(), shape);
        for _ in 0..40 {
            let board = random_position(&mut rng, shape, 14);
            let side = board.side_to_move();
            for depth in 3..=5 {
                let fixed = AlphaBeta::new(side, &evaluator).search(
                    &board,
                    depth,
                    -INFINITY,
                    INFINITY,
                    true,
                );
                let mut searcher =
                    Searcher::new(side, evaluator.clone(), SearchLimits::depth_only(depth));
                let report = searcher.best_move(&board).unwrap();

                // equal-valued columns resolve the same way, even when deepening stops early
                assert_eq!(
                    Some(report.column),
                    fixed.column(),
                    "depth {depth} on\n{board}"
                );
                if report.is_forced_win() {
                    // deepening stops at the shallowest forced win
                    assert!(fixed.value() >= WIN_VALUE, "{board}");
                    continue;
                }
                assert_eq!(report.depth, depth);
                assert_eq!(report.value, fixed.value(), "depth {depth} on\n{board}");
            }
        }
    }

    #[test]
    fn test_deepening_stops_at_forced_win() {
        let board = board(
            "
            .......
            .......
            .......
            .......
            ...OO..
            ..OXXX.
            ",
        );
        let evaluator = WindowEvaluator::new(Weights::default(), board.shape());
        let mut searcher = Searcher::new(Side::First, evaluator, SearchLimits::depth_only(8));
        let report = searcher.best_move(&board).unwrap();
        assert_eq!(report.column, 6);
        assert_eq!(report.depth, 1);
        assert!(report.is_forced_win());
    }

    #[test]
    fn test_zero_budget_falls_back_to_center() {
        let limits = SearchLimits {
            max_depth: 6,
            time_budget: Duration::ZERO,
        };
        let evaluator = WindowEvaluator::new(Weights::default(), BoardShape::STANDARD);
        let mut searcher = Searcher::new(Side::First, evaluator, limits);
        let report = searcher.best_move(&Board::default()).unwrap();
        assert_eq!(report.column, 3);
        assert_eq!(report.depth, 0);
        assert_eq!(report.nodes, 0);

        let mut board = Board::default();
        for _ in 0..3 {
            board.drop(3, Side::First).unwrap();
            board.drop(3, Side::Second).unwrap();
        }
        assert_eq!(searcher.best_move(&board).unwrap().column, 2);
    }

    #[test]
    fn test_every_started_pass_is_searched_in_full() {
        let board = board(
            "
            .......
            .......
            .......
            ...O...
            ..XXO..
            .OXXXO.
            ",
        );
        let side = board.side_to_move();
        let evaluator = WindowEvaluator::new(weights(), board.shape());
        let limits = SearchLimits {
            max_depth: 5,
            time_budget: Duration::from_secs(3600),
        };
        let report = Searcher::new(side, evaluator.clone(), limits)
            .best_move(&board)
            .unwrap();

        // replay the same passes on one shared table, each to completion
        let mut table = TranspositionTable::new();
        let mut nodes = 0;
        let mut last = None;
        for depth in 1..=report.depth {
            let mut search = AlphaBeta::with_table(side, &evaluator, &mut table);
            last = Some(search.search(&board, depth, -INFINITY, INFINITY, true));
            nodes += search.nodes();
        }
        assert_eq!(report.nodes, nodes);
        assert_eq!(last.and_then(SearchOutcome::column), Some(report.column));
        if !report.is_forced_win() {
            assert_eq!(report.depth, 5);
        }
    }

    #[test]
    fn test_no_move_on_finished_game() {
        let full = board(
            "
            XXOOXXO
            OOXXOOX
            XXOOXXO
            OOXXOOX
            XXOOXXO
            OOXXOOX
            ",
        );
        assert_eq!(
            request_move(&full, Side::First, &Weights::default(), SearchLimits::default()),
            Err(NoLegalMoveError)
        );

        let won = board(
            "
            .......
            .......
            .......
            .......
            OOO....
            XXXX...
            ",
        );
        assert_eq!(
            request_move(&won, Side::Second, &Weights::default(), SearchLimits::default()),
            Err(NoLegalMoveError)
        );
    }
}
