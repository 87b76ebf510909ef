//! Per-strategy population counts.

use crate::error::{check_strategy, StructureError};
use crate::id::StrategyId;
use smallvec::SmallVec;

/// Number of nodes currently playing each strategy.
///
/// Indexed by [`StrategyId`]. Structures keep one of these up to date on
/// every strategy change (one decrement and one increment) instead of
/// rescanning the population, so reading it is always O(1).
///
/// The `SmallVec<[u64; 4]>` keeps typical games (up to four strategies)
/// inline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StrategyCounts {
    counts: SmallVec<[u64; 4]>,
}

impl StrategyCounts {
    /// All-zero counts for a game with `num_strategies` strategies.
    pub fn zeros(num_strategies: usize) -> Self {
        Self {
            counts: SmallVec::from_elem(0, num_strategies),
        }
    }

    /// Tally an assignment of strategies.
    ///
    /// Returns `Err(StructureError::InvalidStrategy)` if any entry is
    /// outside `0..num_strategies`.
    pub fn tally(
        num_strategies: usize,
        strategies: &[StrategyId],
    ) -> Result<Self, StructureError> {
        let mut counts = Self::zeros(num_strategies);
        for &s in strategies {
            check_strategy(s, num_strategies)?;
            counts.counts[s.index()] += 1;
        }
        Ok(counts)
    }

    /// Number of strategies tracked.
    pub fn num_strategies(&self) -> usize {
        self.counts.len()
    }

    /// Number of nodes playing `strategy` (0 for unknown strategies).
    pub fn get(&self, strategy: StrategyId) -> u64 {
        self.counts.get(strategy.index()).copied().unwrap_or(0)
    }

    /// Sum over all strategies; equals the population size of the owner.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Counts as a slice indexed by strategy.
    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }

    /// Iterate `(strategy, count)` pairs in strategy order.
    pub fn iter(&self) -> impl Iterator<Item = (StrategyId, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (StrategyId(i as u32), c))
    }

    /// Strategy frequencies `count / total`.
    ///
    /// All zeros when the total is zero.
    pub fn frequencies(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.counts.len()];
        }
        self.counts
            .iter()
            .map(|&c| c as f64 / total as f64)
            .collect()
    }

    /// Move one node from `from` to `to`.
    ///
    /// Both ids must already be validated by the caller. A no-op when
    /// `from == to`.
    #[inline]
    pub fn transfer(&mut self, from: StrategyId, to: StrategyId) {
        if from == to {
            return;
        }
        debug_assert!(self.counts[from.index()] > 0, "count underflow for {from}");
        self.counts[from.index()] -= 1;
        self.counts[to.index()] += 1;
    }
}

impl From<Vec<u64>> for StrategyCounts {
    /// Counts given directly, one entry per strategy.
    fn from(counts: Vec<u64>) -> Self {
        Self {
            counts: SmallVec::from_vec(counts),
        }
    }
}
