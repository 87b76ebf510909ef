//! Per-node strategy assignment with incremental count bookkeeping.

use crate::initial::{self, InitialStrategies};
use deme_core::error::{check_node, check_strategy};
use deme_core::{NodeId, StrategyCounts, StrategyId, StructureError};
use rand::RngCore;

/// The strategy of every node plus the aggregate per-strategy counts.
///
/// Shared by all structure backends. The two halves are only ever changed
/// together: [`set`](Self::set) validates first, then moves one node
/// between strategies with a single decrement and increment, so
/// `counts().total() == population_size()` holds after every call and a
/// long run never pays for a rescan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyState {
    strategies: Vec<StrategyId>,
    counts: StrategyCounts,
}

impl StrategyState {
    /// Resolve `initial` for `population_size` nodes and tally the result.
    pub fn new(
        population_size: usize,
        num_strategies: usize,
        initial: &InitialStrategies,
        rng: &mut dyn RngCore,
    ) -> Result<Self, StructureError> {
        let strategies = initial.resolve(population_size, num_strategies, rng)?;
        let counts = StrategyCounts::tally(num_strategies, &strategies)?;
        Ok(Self { strategies, counts })
    }

    /// Number of nodes.
    pub fn population_size(&self) -> usize {
        self.strategies.len()
    }

    /// Number of strategies.
    pub fn num_strategies(&self) -> usize {
        self.counts.num_strategies()
    }

    /// Strategy of every node.
    pub fn strategies(&self) -> &[StrategyId] {
        &self.strategies
    }

    /// Aggregate counts.
    pub fn counts(&self) -> &StrategyCounts {
        &self.counts
    }

    /// Strategy of one node.
    pub fn get(&self, node: NodeId) -> Result<StrategyId, StructureError> {
        check_node(node, self.strategies.len())?;
        Ok(self.strategies[node.index()])
    }

    /// Strategy of a node already known to be in range.
    #[inline]
    pub(crate) fn get_unchecked(&self, node: NodeId) -> StrategyId {
        self.strategies[node.index()]
    }

    /// Move `node` to `strategy`, updating the counts in O(1).
    pub fn set(&mut self, node: NodeId, strategy: StrategyId) -> Result<(), StructureError> {
        check_node(node, self.strategies.len())?;
        check_strategy(strategy, self.counts.num_strategies())?;
        let slot = &mut self.strategies[node.index()];
        self.counts.transfer(*slot, strategy);
        *slot = strategy;
        Ok(())
    }

    /// Redraw every node uniformly from `0..num_strategies()`.
    pub fn randomize(&mut self, rng: &mut dyn RngCore) {
        let k = self.counts.num_strategies();
        let (strategies, counts) =
            initial::uniform_assignment(self.strategies.len(), k, rng);
        self.strategies = strategies;
        self.counts = counts;
    }

    /// Replace the assignment with exact counts at shuffled positions.
    ///
    /// Leaves the state untouched on error.
    pub fn assign_counts(
        &mut self,
        counts: &[u64],
        rng: &mut dyn RngCore,
    ) -> Result<(), StructureError> {
        let k = self.counts.num_strategies();
        let strategies = initial::shuffled_assignment(self.strategies.len(), k, counts, rng)?;
        self.strategies = strategies;
        self.counts = StrategyCounts::from(counts.to_vec());
        Ok(())
    }
}
