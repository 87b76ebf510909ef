//! The core `PopulationStructure` trait and `dyn PopulationStructure`
//! downcast support.

use crate::sampling::SamplingMode;
use deme_core::error::check_node;
use deme_core::{NodeId, StrategyCounts, StrategyId, StructureError, StructureInstanceId};
use rand::RngCore;
use std::any::Any;
use std::borrow::Cow;

/// Central population-structure abstraction.
///
/// A structure owns a fixed set of nodes, each holding exactly one strategy,
/// and defines which nodes neighbour which. Drivers construct a structure,
/// then repeatedly sample neighbours, read strategies, and apply updates via
/// [`set_strategy`](Self::set_strategy). Concrete backends ([`WellMixed`],
/// [`Network`]) implement it to define their topology.
///
/// # Invariants
///
/// - `population_size()` never changes after construction.
/// - Every node holds a strategy in `0..num_strategies()`.
/// - `strategy_counts().total() == population_size()` at all times.
/// - Failed operations leave the structure untouched.
///
/// # Object Safety
///
/// This trait is designed for use as `dyn PopulationStructure`. Randomness
/// is passed as `&mut dyn RngCore` for that reason. Use
/// [`downcast_ref`](dyn PopulationStructure::downcast_ref) for opt-in
/// specialization on concrete types.
///
/// # Thread Safety
///
/// Structures are not internally synchronized; mutation needs `&mut self`.
/// `Send + Sync` lets independent instances (see
/// [`clone_box`](Self::clone_box)) move to worker threads for parallel runs.
///
/// [`WellMixed`]: crate::WellMixed
/// [`Network`]: crate::Network
pub trait PopulationStructure: Any + Send + Sync + 'static {
    /// Number of nodes `N`. Fixed for the lifetime of the structure.
    fn population_size(&self) -> usize;

    /// Number of strategies `K` in the game.
    fn num_strategies(&self) -> usize;

    /// Current strategy of every node, indexed by node id.
    fn strategies(&self) -> &[StrategyId];

    /// Current strategy of `node`.
    ///
    /// Returns `Err(StructureError::OutOfRange)` if `node` is not in
    /// `0..population_size()`.
    fn strategy_of(&self, node: NodeId) -> Result<StrategyId, StructureError> {
        check_node(node, self.population_size())?;
        Ok(self.strategies()[node.index()])
    }

    /// Number of nodes on each strategy. Always sums to `population_size()`.
    ///
    /// Maintained incrementally, so this is O(1).
    fn strategy_counts(&self) -> &StrategyCounts;

    /// Strategy frequencies (`count / N`), indexed by strategy.
    fn mean_population_state(&self) -> Vec<f64> {
        self.strategy_counts().frequencies()
    }

    /// Change the strategy of exactly one node.
    ///
    /// Returns `Err(StructureError::OutOfRange)` for an invalid node and
    /// `Err(StructureError::InvalidStrategy)` for a strategy outside
    /// `0..num_strategies()`. Never alters the topology.
    fn set_strategy(&mut self, node: NodeId, strategy: StrategyId) -> Result<(), StructureError>;

    /// Reassign every node a strategy drawn uniformly from
    /// `0..num_strategies()`.
    fn randomize_strategies(&mut self, rng: &mut dyn RngCore);

    /// Place exactly `counts[s]` nodes on each strategy `s`, at shuffled
    /// positions.
    ///
    /// Returns `Err(StructureError::InvalidState)` if `counts` does not have
    /// one entry per strategy or does not sum to `population_size()`.
    fn assign_counts(&mut self, counts: &[u64], rng: &mut dyn RngCore)
        -> Result<(), StructureError>;

    /// Enumerate the neighbours of `node`.
    ///
    /// Returns node ids in ascending order. The sequence is stable between
    /// calls; strategy updates never change it.
    fn neighbours(&self, node: NodeId) -> Result<Cow<'_, [NodeId]>, StructureError>;

    /// Number of neighbours of `node`.
    ///
    /// Default implementation counts [`neighbours`](Self::neighbours).
    /// Backends should override when the neighbourhood is implicit.
    fn degree(&self, node: NodeId) -> Result<usize, StructureError> {
        Ok(self.neighbours(node)?.len())
    }

    /// The sampling mode used by [`sample_neighbour`](Self::sample_neighbour).
    fn sampling_mode(&self) -> SamplingMode;

    /// Select the sampling mode used by
    /// [`sample_neighbour`](Self::sample_neighbour).
    fn set_sampling_mode(&mut self, mode: SamplingMode);

    /// Draw one neighbour of `node` using the configured
    /// [`sampling_mode`](Self::sampling_mode).
    ///
    /// Returns `Err(StructureError::EmptyNeighbourhood)` if there is no
    /// eligible neighbour.
    fn sample_neighbour(
        &self,
        node: NodeId,
        rng: &mut dyn RngCore,
    ) -> Result<NodeId, StructureError> {
        self.sample_neighbour_with(node, self.sampling_mode(), rng)
    }

    /// Draw one neighbour of `node` using an explicit sampling mode.
    fn sample_neighbour_with(
        &self,
        node: NodeId,
        mode: SamplingMode,
        rng: &mut dyn RngCore,
    ) -> Result<NodeId, StructureError>;

    /// Deep copy with identical topology and strategy assignment.
    ///
    /// The copy is independent: mutating one never affects the other.
    fn clone_box(&self) -> Box<dyn PopulationStructure>;

    /// Unique instance identifier for this structure's topology.
    ///
    /// Allocated at construction and preserved by clones.
    fn instance_id(&self) -> StructureInstanceId;

    /// Returns `true` if `self` and `other` are the same concrete type with
    /// identical neighbourhoods. Strategy state is ignored.
    fn topology_eq(&self, other: &dyn PopulationStructure) -> bool;
}

impl dyn PopulationStructure {
    /// Attempt to downcast a trait object to a concrete structure type.
    ///
    /// Drivers working through `&dyn PopulationStructure` can check for a
    /// known backend and use its inherent fast paths.
    pub fn downcast_ref<T: PopulationStructure>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Mutable counterpart of [`downcast_ref`](Self::downcast_ref).
    pub fn downcast_mut<T: PopulationStructure>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}

impl Clone for Box<dyn PopulationStructure> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
