//! Weight vector operations for the genetic optimizer.
//!
//! - **Initialization**: [`random_weights`] draws every mutable trait from its
//!   [`TraitRanges`] entry and sets the win weight to its fixed value
//! - **Mutation**: [`mutate`] nudges one mutable trait by a delta from [`MutationParams`]
//!
//! # Design Decisions
//!
//! ## One Trait per Mutation
//!
//! Each offspring differs from its parent in exactly one coefficient, by a small integer step.
//! Selection can then attribute a change in match results to a single trait.
//!
//! ## Non-Negativity
//!
//! Mutation clamps at zero. Nothing downstream re-checks the sign of a weight, so this is the
//! only place the invariant is enforced.
//!
//! ## Fixed Win Weight
//!
//! [`WeightKind::Win`] is never drawn or mutated: it stays at [`TraitRanges::win`] so that a
//! completed run keeps dominating every other term.

use std::ops::RangeInclusive;

use fourplay_evaluator::weights::{WeightKind, Weights};
use rand::{Rng, seq::IndexedRandom as _};
use serde::{Deserialize, Serialize};

/// Initial sampling range of every mutable trait, plus the fixed win weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitRanges {
    pub center: RangeInclusive<i32>,
    pub open_three: RangeInclusive<i32>,
    pub open_two: RangeInclusive<i32>,
    pub block: RangeInclusive<i32>,
    pub win: i32,
}

impl Default for TraitRanges {
    fn default() -> Self {
        Self {
            center: 0..=10,
            open_three: 1..=20,
            open_two: 1..=10,
            block: 1..=100,
            win: Weights::DEFAULT_WIN,
        }
    }
}

impl TraitRanges {
    /// Range of a mutable trait; the win weight yields the single-value range `win..=win`.
    #[must_use]
    pub fn get(&self, kind: WeightKind) -> RangeInclusive<i32> {
        match kind {
            WeightKind::Center => self.center.clone(),
            WeightKind::OpenThree => self.open_three.clone(),
            WeightKind::OpenTwo => self.open_two.clone(),
            WeightKind::Block => self.block.clone(),
            WeightKind::Win => self.win..=self.win,
        }
    }

    /// Largest weights the ranges can produce.
    #[must_use]
    pub fn upper(&self) -> Weights {
        let mut weights = Weights::BALANCED;
        for kind in WeightKind::ALL {
            weights.set(kind, *self.get(kind).end());
        }
        weights
    }
}

/// Draws a weight vector from `ranges`.
///
/// # Panics
///
/// Panics if a range is empty.
pub fn random_weights<R>(ranges: &TraitRanges, rng: &mut R) -> Weights
where
    R: Rng + ?Sized,
{
    let mut weights = Weights::BALANCED;
    for kind in WeightKind::ALL {
        weights.set(kind, rng.random_range(ranges.get(kind)));
    }
    weights
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationParams {
    /// Signed steps a mutation picks from, uniformly.
    pub deltas: Vec<i32>,
}

impl Default for MutationParams {
    fn default() -> Self {
        Self {
            deltas: vec![-5, -2, -1, 1, 2, 5],
        }
    }
}

/// Returns a copy of `parent` with one mutable trait moved by a random delta, clamped to be
/// non-negative.
///
/// An empty delta set leaves the copy unchanged.
///
/// # Example
///
/// ```
/// use fourplay_evaluator::weights::{WeightKind, Weights};
/// use fourplay_training::weights::{MutationParams, mutate};
///
/// let parent = Weights::default();
/// let child = mutate(&parent, &MutationParams::default(), &mut rand::rng());
/// let changed = WeightKind::ALL
///     .into_iter()
///     .filter(|kind| child.get(*kind) != parent.get(*kind))
///     .count();
/// assert!(changed <= 1);
/// assert_eq!(child.win, parent.win);
/// ```
pub fn mutate<R>(parent: &Weights, params: &MutationParams, rng: &mut R) -> Weights
where
    R: Rng + ?Sized,
{
    let mut child = *parent;
    let (Some(&kind), Some(&delta)) = (
        WeightKind::MUTABLE.choose(rng),
        params.deltas.choose(rng),
    ) else {
        return child;
    };
    let value = child.get(kind).saturating_add(delta).max(0);
    child.set(kind, value);
    child
}
