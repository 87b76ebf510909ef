//! Declarative network configuration and the [`NetworkBuilder`].
//!
//! [`NetworkConfig`] is the serializable description of a network: where
//! its edges come from, how many strategies there are, and how nodes start.
//! [`NetworkBuilder`] assembles the same description in code.

use crate::initial::InitialStrategies;
use crate::network::Network;
use crate::sampling::SamplingMode;
use crate::structure::PopulationStructure;
use crate::topology::{Directedness, TopologySpec};
use deme_core::error::invalid_topology;
use deme_core::{NodeId, StructureError};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Where a network's edges come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologySource {
    /// An explicit edge list.
    Edges(Vec<(NodeId, NodeId)>),
    /// A generated graph family.
    Generated(TopologySpec),
    /// Per-node neighbour lists, one per node.
    AdjacencyList(Vec<Vec<NodeId>>),
    /// A square 0/1 adjacency matrix.
    AdjacencyMatrix(Vec<Vec<u8>>),
}

impl TopologySource {
    /// Node count implied by the source itself, if any.
    fn implied_population(&self) -> Option<usize> {
        match self {
            Self::AdjacencyList(lists) => Some(lists.len()),
            Self::AdjacencyMatrix(rows) => Some(rows.len()),
            Self::Edges(_) | Self::Generated(_) => None,
        }
    }
}

/// Serializable description of a [`Network`].
///
/// # Examples
///
/// ```
/// use deme_structure::NetworkConfig;
/// use rand::SeedableRng;
///
/// let config: NetworkConfig = serde_json::from_str(r#"{
///     "population_size": 20,
///     "num_strategies": 2,
///     "topology": { "generated": { "ring": { "degree": 4 } } },
///     "initial": "uniform"
/// }"#).unwrap();
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let net = config.build(&mut rng).unwrap();
/// assert_eq!(net.edge_count(), 40);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of nodes `N`.
    pub population_size: usize,
    /// Number of strategies `K`.
    pub num_strategies: usize,
    /// Edge interpretation. Defaults to undirected.
    #[serde(default)]
    pub directedness: Directedness,
    /// Edge source.
    pub topology: TopologySource,
    /// Initial strategy rule. Defaults to everyone on strategy 0.
    #[serde(default)]
    pub initial: InitialStrategies,
    /// Sampling mode for [`PopulationStructure::sample_neighbour`].
    #[serde(default)]
    pub sampling: SamplingMode,
}

impl NetworkConfig {
    /// Build the network described by this configuration.
    ///
    /// Generated families are undirected graphs; with
    /// [`Directedness::Directed`] every generated edge becomes a pair of
    /// opposite arcs.
    ///
    /// # Errors
    ///
    /// Returns `Err(StructureError::InvalidTopology)` if an adjacency list or
    /// matrix does not have `population_size` entries, plus every error of
    /// the underlying [`Network`] constructor.
    pub fn build(&self, rng: &mut dyn RngCore) -> Result<Network, StructureError> {
        let n = self.population_size;
        if let Some(implied) = self.topology.implied_population() {
            if implied != n {
                return Err(invalid_topology(format!(
                    "topology describes {implied} nodes, population size is {n}"
                )));
            }
        }
        let k = self.num_strategies;
        let mut net = match &self.topology {
            TopologySource::Edges(edges) => Network::assemble(
                n,
                k,
                self.directedness,
                edges.iter().copied(),
                &self.initial,
                rng,
            )?,
            TopologySource::Generated(spec) => {
                let edges = spec.generate(n, rng)?;
                let arcs: Vec<(NodeId, NodeId)> = match self.directedness {
                    Directedness::Undirected => edges,
                    Directedness::Directed => {
                        edges.into_iter().flat_map(|(u, v)| [(u, v), (v, u)]).collect()
                    }
                };
                Network::assemble(n, k, self.directedness, arcs, &self.initial, rng)?
            }
            TopologySource::AdjacencyList(lists) => {
                Network::from_adjacency_list(lists, k, self.directedness, &self.initial, rng)?
            }
            TopologySource::AdjacencyMatrix(rows) => {
                Network::from_adjacency_matrix(rows, k, self.directedness, &self.initial, rng)?
            }
        };
        net.set_sampling_mode(self.sampling);
        Ok(net)
    }
}

/// Builder for [`Network`].
///
/// Required: a topology source. The population size is taken from an
/// adjacency list or matrix and must be set explicitly for edge lists and
/// generated families. Defaults: two strategies, undirected, everyone on
/// strategy 0, uniform sampling.
///
/// ```
/// use deme_structure::{InitialStrategies, Network, PopulationStructure, TopologySpec};
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(5);
/// let net = Network::builder()
///     .population_size(16)
///     .num_strategies(3)
///     .generated(TopologySpec::Lattice { width: 4, periodic: true })
///     .initial(InitialStrategies::Uniform)
///     .build(&mut rng)
///     .unwrap();
/// assert_eq!(net.num_strategies(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct NetworkBuilder {
    population_size: Option<usize>,
    num_strategies: usize,
    directedness: Directedness,
    topology: Option<TopologySource>,
    initial: InitialStrategies,
    sampling: SamplingMode,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkBuilder {
    /// A builder with every default set and no topology.
    pub fn new() -> Self {
        Self {
            population_size: None,
            num_strategies: 2,
            directedness: Directedness::Undirected,
            topology: None,
            initial: InitialStrategies::default(),
            sampling: SamplingMode::Uniform,
        }
    }

    /// Set the number of nodes.
    pub fn population_size(mut self, population_size: usize) -> Self {
        self.population_size = Some(population_size);
        self
    }

    /// Set the number of strategies (default: 2).
    pub fn num_strategies(mut self, num_strategies: usize) -> Self {
        self.num_strategies = num_strategies;
        self
    }

    /// Set the edge interpretation (default: undirected).
    pub fn directedness(mut self, directedness: Directedness) -> Self {
        self.directedness = directedness;
        self
    }

    /// Use an explicit edge list.
    pub fn edges(mut self, edges: impl IntoIterator<Item = (NodeId, NodeId)>) -> Self {
        self.topology = Some(TopologySource::Edges(edges.into_iter().collect()));
        self
    }

    /// Use a generated graph family.
    pub fn generated(mut self, spec: TopologySpec) -> Self {
        self.topology = Some(TopologySource::Generated(spec));
        self
    }

    /// Use per-node neighbour lists.
    pub fn adjacency_list(mut self, lists: Vec<Vec<NodeId>>) -> Self {
        self.topology = Some(TopologySource::AdjacencyList(lists));
        self
    }

    /// Use a square adjacency matrix.
    pub fn adjacency_matrix(mut self, rows: Vec<Vec<u8>>) -> Self {
        self.topology = Some(TopologySource::AdjacencyMatrix(rows));
        self
    }

    /// Set the initial strategy rule (default: everyone on strategy 0).
    pub fn initial(mut self, initial: InitialStrategies) -> Self {
        self.initial = initial;
        self
    }

    /// Set the sampling mode (default: uniform).
    pub fn sampling(mut self, sampling: SamplingMode) -> Self {
        self.sampling = sampling;
        self
    }

    /// Freeze the builder into a [`NetworkConfig`].
    ///
    /// Returns `Err(StructureError::InvalidTopology)` if no topology was
    /// given or the population size is neither set nor implied.
    pub fn into_config(self) -> Result<NetworkConfig, StructureError> {
        let topology = self
            .topology
            .ok_or_else(|| invalid_topology("a topology source is required"))?;
        let population_size = self
            .population_size
            .or_else(|| topology.implied_population())
            .ok_or_else(|| {
                invalid_topology("population size is required for edge lists and generated topologies")
            })?;
        Ok(NetworkConfig {
            population_size,
            num_strategies: self.num_strategies,
            directedness: self.directedness,
            topology,
            initial: self.initial,
            sampling: self.sampling,
        })
    }

    /// Build the network.
    ///
    /// # Errors
    ///
    /// Everything [`into_config`](Self::into_config) and
    /// [`NetworkConfig::build`] can return.
    pub fn build(self, rng: &mut dyn RngCore) -> Result<Network, StructureError> {
        self.into_config()?.build(rng)
    }
}
