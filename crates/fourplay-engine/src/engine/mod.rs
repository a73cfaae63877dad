//! Single-game bookkeeping on top of the [`Board`](crate::Board).
//!
//! - [`Game`] - board, move history and outcome of one game in progress
//! - [`GameOutcome`] - how a finished game ended, and the points each side earns
//!
//! # Example
//!
//! ```
//! use fourplay_engine::{Game, GameOutcome, Side};
//!
//! let mut game = Game::default();
//! for column in [0, 1, 0, 1, 0, 1] {
//!     assert_eq!(game.play(column)?, None);
//! }
//! assert_eq!(game.play(0)?, Some(GameOutcome::Win(Side::First)));
//! assert_eq!(game.moves(), &[0, 1, 0, 1, 0, 1, 0]);
//! assert!(game.play(2).is_err());
//! # Ok::<(), fourplay_engine::PlayError>(())
//! ```

pub use self::game::*;

mod game;
