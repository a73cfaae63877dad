//! Memoization of search results keyed by exact board fingerprints.
//!
//! A table belongs to one side for one game. Values are stored from that side's point of view,
//! so sharing a table with the opponent (or carrying it over to an unrelated game) would feed
//! the search scores for the wrong perspective.

use std::collections::HashMap;

use fourplay_engine::Fingerprint;

/// How a stored value relates to the true minimax value of its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Bound {
    /// The value is exact.
    Exact,
    /// The search failed high: the true value is at least this.
    Lower,
    /// The search failed low: the true value is at most this.
    Upper,
}

impl Bound {
    /// Classifies a fail-soft search `value` against the window the search was started with.
    #[must_use]
    pub fn classify(value: i64, alpha: i64, beta: i64) -> Self {
        if value <= alpha {
            Self::Upper
        } else if value >= beta {
            Self::Lower
        } else {
            Self::Exact
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub value: i64,
    pub bound: Bound,
    /// Remaining depth the value was searched to.
    pub depth: u32,
    /// Best column found, or `None` for leaf positions.
    pub best_column: Option<usize>,
}

#[derive(Debug, Default, Clone)]
pub struct TranspositionTable {
    entries: HashMap<Fingerprint, TableEntry>,
}

impl TranspositionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the entry for `fingerprint` regardless of its depth.
    ///
    /// Callers must check [`TableEntry::depth`] before trusting the value; the best column is
    /// useful for move ordering at any depth.
    #[must_use]
    pub fn probe(&self, fingerprint: Fingerprint) -> Option<&TableEntry> {
        self.entries.get(&fingerprint)
    }

    /// Stores `entry`, replacing any previous entry for the same position.
    pub fn store(&mut self, fingerprint: Fingerprint, entry: TableEntry) {
        self.entries.insert(fingerprint, entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
