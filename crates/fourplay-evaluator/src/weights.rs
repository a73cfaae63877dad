//! Weight vector driving the window heuristic.
//!
//! A [`Weights`] value has one coefficient per heuristic term. The set of terms is fixed:
//! deserializing a configuration with an unknown key fails instead of silently ignoring it.
//!
//! # The win weight
//!
//! The four-in-a-row term must dominate everything else the heuristic can produce, so that a
//! position containing a completed run is never scored below a merely promising one.
//! [`Weights::dominates_other_terms`] checks this against a concrete board shape. The
//! genetic optimizer never mutates [`WeightKind::Win`].

use fourplay_engine::BoardShape;
use serde::{Deserialize, Serialize};

/// Identifies one coefficient of a [`Weights`] vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightKind {
    #[display("center")]
    Center,
    #[display("win")]
    Win,
    #[display("open_three")]
    OpenThree,
    #[display("open_two")]
    OpenTwo,
    #[display("block")]
    Block,
}

impl WeightKind {
    pub const ALL: [Self; 5] = [
        Self::Center,
        Self::Win,
        Self::OpenThree,
        Self::OpenTwo,
        Self::Block,
    ];

    /// Coefficients the genetic optimizer may change.
    pub const MUTABLE: [Self; 4] = [Self::Center, Self::OpenThree, Self::OpenTwo, Self::Block];
}

/// Heuristic coefficients.
///
/// All coefficients are expected to be non-negative; the block term is subtracted by the
/// evaluator, not stored as a negative number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    /// Per own piece in the center column.
    pub center: i32,
    /// Per window fully owned by the side.
    pub win: i32,
    /// Per window with all but one cell owned and the last one empty.
    pub open_three: i32,
    /// Per window with all but two cells owned and the rest empty.
    pub open_two: i32,
    /// Per window the opponent owns all but one cell of, the last one empty.
    pub block: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Self::BALANCED
    }
}

impl Weights {
    pub const DEFAULT_WIN: i32 = 1_000_000;

    pub const BALANCED: Self = Self {
        center: 3,
        win: Self::DEFAULT_WIN,
        open_three: 5,
        open_two: 2,
        block: 4,
    };

    #[must_use]
    pub const fn get(&self, kind: WeightKind) -> i32 {
        match kind {
            WeightKind::Center => self.center,
            WeightKind::Win => self.win,
            WeightKind::OpenThree => self.open_three,
            WeightKind::OpenTwo => self.open_two,
            WeightKind::Block => self.block,
        }
    }

    pub const fn set(&mut self, kind: WeightKind, value: i32) {
        let slot = match kind {
            WeightKind::Center => &mut self.center,
            WeightKind::Win => &mut self.win,
            WeightKind::OpenThree => &mut self.open_three,
            WeightKind::OpenTwo => &mut self.open_two,
            WeightKind::Block => &mut self.block,
        };
        *slot = value;
    }

    #[must_use]
    pub fn is_non_negative(&self) -> bool {
        WeightKind::ALL.iter().all(|kind| self.get(*kind) >= 0)
    }

    /// Largest total the non-win terms can add on a board of `shape`: every cell of the
    /// center column owned, and every window scoring the larger of the open-three and
    /// open-two coefficients.
    #[must_use]
    pub fn max_other_terms(&self, shape: BoardShape) -> i64 {
        let windows = shape.windows().count();
        let per_window = i64::from(self.open_three.max(self.open_two).max(0));
        let center = i64::from(self.center.max(0));
        center * i64::try_from(shape.rows()).unwrap_or(i64::MAX)
            + per_window * i64::try_from(windows).unwrap_or(i64::MAX)
    }

    /// Whether the win coefficient exceeds [`max_other_terms`](Self::max_other_terms).
    #[must_use]
    pub fn dominates_other_terms(&self, shape: BoardShape) -> bool {
        i64::from(self.win) > self.max_other_terms(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_round_trip() {
        let mut weights = Weights::BALANCED;
        for (i, kind) in WeightKind::ALL.into_iter().enumerate() {
            let value = i32::try_from(i).unwrap() * 10 + 7;
            weights.set(kind, value);
            assert_eq!(weights.get(kind), value, "{kind}");
        }
        assert_eq!(
            weights,
            Weights {
                center: 7,
                win: 17,
                open_three: 27,
                open_two: 37,
                block: 47,
            }
        );
    }

    #[test]
    fn test_mutable_kinds_exclude_win() {
        assert!(!WeightKind::MUTABLE.contains(&WeightKind::Win));
        assert_eq!(WeightKind::MUTABLE.len() + 1, WeightKind::ALL.len());
    }

    #[test]
    fn test_dominance_on_standard_board() {
        let shape = BoardShape::STANDARD;
        // 6 center cells * 3 + 69 windows * 5
        assert_eq!(Weights::BALANCED.max_other_terms(shape), 18 + 345);
        assert!(Weights::BALANCED.dominates_other_terms(shape));

        let weak_win = Weights {
            win: 100,
            ..Weights::BALANCED
        };
        assert!(!weak_win.dominates_other_terms(shape));
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let json = r#"{"center":3,"win":1000000,"open_three":5,"open_two":2,"block":4}"#;
        let weights: Weights = serde_json::from_str(json).unwrap();
        assert_eq!(weights, Weights::BALANCED);

        let json = r#"{"center":3,"win":1000000,"open_three":5,"open_two":2,"block":4,"W_FOUR":1}"#;
        assert!(serde_json::from_str::<Weights>(json).is_err());

        let missing = r#"{"center":3,"win":1000000,"open_three":5,"open_two":2}"#;
        assert!(serde_json::from_str::<Weights>(missing).is_err());
    }

    #[test]
    fn test_kind_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&WeightKind::OpenThree).unwrap(),
            r#""open_three""#
        );
        assert_eq!(WeightKind::OpenThree.to_string(), "open_three");
    }
}
