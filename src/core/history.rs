use std::collections::HashSet;

use crate::models::{PairKey, Round};

/// Unordered pairs already seated together during the current run
///
/// Append-only. A snapshot is an independent copy, so later updates never
/// change what an earlier snapshot reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairHistory {
    pairs: HashSet<PairKey>,
}

impl PairHistory {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.pairs.contains(&PairKey::new(a, b))
    }

    /// Add a single pair, returning false if it was already present
    pub fn insert(&mut self, key: PairKey) -> bool {
        self.pairs.insert(key)
    }

    /// Fold every pair of an accepted round into the history
    pub fn record(&mut self, round: &Round) {
        self.pairs.extend(round.keys());
    }

    /// History as of this point, unaffected by later `record` calls
    pub fn snapshot(&self) -> PairHistory {
        self.clone()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<PairKey> for PairHistory {
    fn from_iter<I: IntoIterator<Item = PairKey>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}
