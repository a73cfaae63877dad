//! Match play: complete games between two weight configurations.
//!
//! This module implements the third level of the evaluator architecture. A match is a fixed
//! number of games between contestants `a` and `b`, alternating who moves first so neither
//! benefits from move order: `a` opens the even-numbered games, `b` the odd-numbered ones.
//!
//! # Isolation
//!
//! Every game builds two fresh [`Searcher`]s, one per side, each with its own empty
//! transposition table. Nothing survives from one game to the next, and nothing is shared
//! between the sides, so matches can run on any number of threads at once.
//!
//! # Scoring
//!
//! A win is worth 1 point, a draw 0.5 to each side and a loss 0, so the two scores of a match
//! always add up to the number of games played.

use fourplay_engine::{Board, BoardShape, Game, GameOutcome, Side};
use serde::{Deserialize, Serialize};

use crate::{
    heuristic::WindowEvaluator,
    search::{SearchLimits, Searcher},
    weights::Weights,
};

/// A weight configuration together with the limits it searches under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contestant {
    pub weights: Weights,
    pub limits: SearchLimits,
}

impl Contestant {
    #[must_use]
    pub const fn new(weights: Weights, limits: SearchLimits) -> Self {
        Self { weights, limits }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchConfig {
    /// Games per match; the first mover alternates between games.
    pub games: usize,
    /// Limits applied to both sides by [`MatchPlayer::play_match`].
    pub limits: SearchLimits,
    pub shape: BoardShape,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            games: 2,
            limits: SearchLimits::default(),
            shape: BoardShape::STANDARD,
        }
    }
}

/// Points earned by each contestant over one match.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MatchScore {
    pub a: f32,
    pub b: f32,
}

/// Game-by-game tally of one match, from `a`'s point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MatchRecord {
    pub a_wins: usize,
    pub b_wins: usize,
    pub draws: usize,
}

impl MatchRecord {
    #[must_use]
    pub fn games(&self) -> usize {
        self.a_wins + self.b_wins + self.draws
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn score(&self) -> MatchScore {
        let draws = self.draws as f32 * 0.5;
        MatchScore {
            a: self.a_wins as f32 + draws,
            b: self.b_wins as f32 + draws,
        }
    }

    fn record(&mut self, outcome: GameOutcome, a_side: Side) {
        match outcome {
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::Win(side) if side == a_side => self.a_wins += 1,
            GameOutcome::Win(_) => self.b_wins += 1,
        }
    }
}

/// Scores a pair of weight vectors against each other.
///
/// This is the only thing the genetic optimizer needs from match play; tests can substitute a
/// cheap deterministic implementation.
pub trait MatchPlayer: Sync {
    fn play_match(&self, a: &Weights, b: &Weights) -> MatchScore;
}

/// Plays matches from a fixed opening position.
#[derive(Debug, Clone)]
pub struct MatchRunner {
    config: MatchConfig,
    opening: Board,
}

impl MatchRunner {
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            opening: Board::new(config.shape),
        }
    }

    /// Starts every game from `opening` instead of an empty board.
    #[must_use]
    pub fn with_opening(mut self, opening: Board) -> Self {
        self.config.shape = opening.shape();
        self.opening = opening;
        self
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Plays a match between contestants that may search under different limits.
    #[must_use]
    pub fn play_contestants(&self, a: &Contestant, b: &Contestant) -> MatchRecord {
        let mut record = MatchRecord::default();
        for game_index in 0..self.config.games {
            let a_side = if game_index % 2 == 0 {
                Side::First
            } else {
                Side::Second
            };
            let (first, second) = match a_side {
                Side::First => (a, b),
                Side::Second => (b, a),
            };
            let game = play_game(self.opening, first, second);
            let outcome = game
                .outcome()
                .expect("a played-out game always has an outcome");
            log::trace!(
                "game {game_index}: a plays {a_side}, {outcome:?} after {} moves",
                game.moves().len()
            );
            record.record(outcome, a_side);
        }
        record
    }
}

impl MatchPlayer for MatchRunner {
    fn play_match(&self, a: &Weights, b: &Weights) -> MatchScore {
        let limits = self.config.limits;
        self.play_contestants(&Contestant::new(*a, limits), &Contestant::new(*b, limits))
            .score()
    }
}

/// Plays one game to the end from `opening`, `first` moving for [`Side::First`].
///
/// Both searchers are created here and dropped with the game.
#[must_use]
pub fn play_game(opening: Board, first: &Contestant, second: &Contestant) -> Game {
    let shape = opening.shape();
    let mut searchers = [(Side::First, first), (Side::Second, second)].map(|(side, c)| {
        Searcher::new(side, WindowEvaluator::new(c.weights, shape), c.limits)
    });

    let mut game = Game::from_board(opening);
    while !game.is_over() {
        let searcher = &mut searchers[game.side_to_move().index()];
        let report = searcher
            .best_move(game.board())
            .expect("a game in progress has a legal move");
        game.play(report.column)
            .expect("searched column must be playable");
    }
    game
}
