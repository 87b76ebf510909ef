//! Well-mixed (complete interaction) population.

use crate::initial::InitialStrategies;
use crate::sampling::SamplingMode;
use crate::state::StrategyState;
use crate::structure::PopulationStructure;
use deme_core::error::{check_node, invalid_topology};
use deme_core::{NodeId, StrategyCounts, StrategyId, StructureError, StructureInstanceId};
use rand::{Rng, RngCore};
use std::borrow::Cow;
use tracing::debug;

/// A population in which every individual may interact with every other.
///
/// No adjacency is stored: the neighbourhood of `i` is every node except
/// `i`, so uniform sampling is O(1) and `degree` is always `N - 1`.
/// [`neighbours`](PopulationStructure::neighbours) materializes the list on
/// demand.
///
/// # Examples
///
/// ```
/// use deme_core::NodeId;
/// use deme_structure::{InitialStrategies, PopulationStructure, WellMixed};
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(3);
/// let pop = WellMixed::new(5, 2, &InitialStrategies::Uniform, &mut rng).unwrap();
/// assert_eq!(pop.degree(NodeId(0)).unwrap(), 4);
///
/// let j = pop.sample_neighbour(NodeId(2), &mut rng).unwrap();
/// assert_ne!(j, NodeId(2));
/// ```
#[derive(Clone, Debug)]
pub struct WellMixed {
    state: StrategyState,
    sampling: SamplingMode,
    instance_id: StructureInstanceId,
}

impl WellMixed {
    /// Create a well-mixed population of `population_size` nodes.
    ///
    /// Returns `Err(StructureError::InvalidTopology)` if
    /// `population_size == 0` or exceeds the `u32` id space, and the
    /// [`InitialStrategies::resolve`] errors otherwise.
    pub fn new(
        population_size: usize,
        num_strategies: usize,
        initial: &InitialStrategies,
        rng: &mut dyn RngCore,
    ) -> Result<Self, StructureError> {
        if population_size == 0 {
            return Err(invalid_topology("population size must be at least 1"));
        }
        if population_size > u32::MAX as usize {
            return Err(invalid_topology(format!(
                "population size {population_size} exceeds the maximum of {}",
                u32::MAX
            )));
        }
        let state = StrategyState::new(population_size, num_strategies, initial, rng)?;
        debug!(population_size, num_strategies, "well-mixed population constructed");
        Ok(Self {
            state,
            sampling: SamplingMode::Uniform,
            instance_id: StructureInstanceId::next(),
        })
    }

    /// Uniform draw from `0..N` excluding `node`.
    fn uniform_other(&self, node: NodeId, rng: &mut dyn RngCore) -> Result<NodeId, StructureError> {
        let n = self.state.population_size() as u32;
        if n < 2 {
            return Err(StructureError::EmptyNeighbourhood { node });
        }
        let j = rng.gen_range(0..n - 1);
        Ok(NodeId(if j >= node.0 { j + 1 } else { j }))
    }
}

impl PopulationStructure for WellMixed {
    fn population_size(&self) -> usize {
        self.state.population_size()
    }

    fn num_strategies(&self) -> usize {
        self.state.num_strategies()
    }

    fn strategies(&self) -> &[StrategyId] {
        self.state.strategies()
    }

    fn strategy_of(&self, node: NodeId) -> Result<StrategyId, StructureError> {
        self.state.get(node)
    }

    fn strategy_counts(&self) -> &StrategyCounts {
        self.state.counts()
    }

    fn set_strategy(&mut self, node: NodeId, strategy: StrategyId) -> Result<(), StructureError> {
        self.state.set(node, strategy)
    }

    fn randomize_strategies(&mut self, rng: &mut dyn RngCore) {
        self.state.randomize(rng);
    }

    fn assign_counts(
        &mut self,
        counts: &[u64],
        rng: &mut dyn RngCore,
    ) -> Result<(), StructureError> {
        self.state.assign_counts(counts, rng)
    }

    fn neighbours(&self, node: NodeId) -> Result<Cow<'_, [NodeId]>, StructureError> {
        let n = self.state.population_size();
        check_node(node, n)?;
        Ok(Cow::Owned(
            (0..n as u32).map(NodeId).filter(|&j| j != node).collect(),
        ))
    }

    fn degree(&self, node: NodeId) -> Result<usize, StructureError> {
        let n = self.state.population_size();
        check_node(node, n)?;
        Ok(n - 1)
    }

    fn sampling_mode(&self) -> SamplingMode {
        self.sampling
    }

    fn set_sampling_mode(&mut self, mode: SamplingMode) {
        self.sampling = mode;
    }

    fn sample_neighbour_with(
        &self,
        node: NodeId,
        mode: SamplingMode,
        rng: &mut dyn RngCore,
    ) -> Result<NodeId, StructureError> {
        check_node(node, self.state.population_size())?;
        match mode {
            // Every node has degree N - 1, so degree weighting is uniform.
            SamplingMode::Uniform | SamplingMode::DegreeWeighted => self.uniform_other(node, rng),
            SamplingMode::DifferentStrategy => {
                let focal = self.state.get_unchecked(node);
                let eligible = self.state.population_size() as u64 - self.state.counts().get(focal);
                if eligible == 0 {
                    return Err(StructureError::EmptyNeighbourhood { node });
                }
                // The focal node shares its own strategy, so it is never eligible.
                let pick = rng.gen_range(0..eligible) as usize;
                self.state
                    .strategies()
                    .iter()
                    .enumerate()
                    .filter(|&(_, &s)| s != focal)
                    .nth(pick)
                    .map(|(j, _)| NodeId(j as u32))
                    .ok_or(StructureError::EmptyNeighbourhood { node })
            }
        }
    }

    fn clone_box(&self) -> Box<dyn PopulationStructure> {
        Box::new(self.clone())
    }

    fn instance_id(&self) -> StructureInstanceId {
        self.instance_id
    }

    fn topology_eq(&self, other: &dyn PopulationStructure) -> bool {
        other
            .downcast_ref::<Self>()
            .is_some_and(|o| self.population_size() == o.population_size())
    }
}
