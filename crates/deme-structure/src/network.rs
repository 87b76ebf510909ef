//! Graph-structured population backed by adjacency lists.

use crate::config::NetworkBuilder;
use crate::initial::InitialStrategies;
use crate::sampling::{self, SamplingMode};
use crate::state::StrategyState;
use crate::structure::PopulationStructure;
use crate::topology::{Directedness, TopologySpec};
use deme_core::error::{check_node, invalid_topology};
use deme_core::{NodeId, StrategyCounts, StrategyId, StructureError, StructureInstanceId};
use indexmap::IndexSet;
use rand::RngCore;
use smallvec::SmallVec;
use std::borrow::Cow;
use tracing::debug;

/// Neighbour list of one node. Inline up to 8 entries, which covers rings,
/// lattices and most sparse random graphs without a heap allocation.
type Adjacency = SmallVec<[NodeId; 8]>;

/// A population whose interactions are restricted to graph adjacency.
///
/// Each node keeps a sorted neighbour list, so enumeration is O(degree),
/// uniform sampling is O(1) and edge lookup is O(log degree). Strategy
/// updates go through a [`StrategyState`] and never touch the adjacency;
/// only [`rewire`](Self::rewire) changes the edge set.
///
/// Simple-graph rules: self-loops are rejected, repeated edges are
/// collapsed. In an undirected network `(u, v)` and `(v, u)` are the same
/// edge.
///
/// # Examples
///
/// ```
/// use deme_core::{NodeId, StrategyId};
/// use deme_structure::{InitialStrategies, Network, PopulationStructure};
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let initial = InitialStrategies::Explicit(vec![
///     StrategyId(0), StrategyId(0), StrategyId(1), StrategyId(1),
/// ]);
/// let ring = [(0, 1), (1, 2), (2, 3), (3, 0)].map(|(u, v)| (NodeId(u), NodeId(v)));
/// let mut net = Network::from_edges(4, 2, &ring, &initial, &mut rng).unwrap();
///
/// assert_eq!(net.strategy_counts().as_slice(), &[2, 2]);
/// assert_eq!(net.neighbours(NodeId(0)).unwrap().as_ref(), &[NodeId(1), NodeId(3)]);
///
/// net.set_strategy(NodeId(0), StrategyId(1)).unwrap();
/// assert_eq!(net.strategy_counts().as_slice(), &[1, 3]);
/// ```
#[derive(Clone, Debug)]
pub struct Network {
    adjacency: Vec<Adjacency>,
    edge_count: usize,
    directedness: Directedness,
    state: StrategyState,
    sampling: SamplingMode,
    instance_id: StructureInstanceId,
}

impl Network {
    /// Maximum population: node ids are `u32`.
    pub const MAX_NODES: usize = u32::MAX as usize;

    /// Start configuring a network with [`NetworkBuilder`].
    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::new()
    }

    /// Build an undirected network from an explicit edge list.
    ///
    /// # Errors
    ///
    /// - `InvalidTopology` if `population_size == 0`, an edge references a
    ///   node outside `0..population_size`, or an edge is a self-loop
    /// - `InvalidState` / `InvalidStrategy` if `initial` does not fit
    pub fn from_edges(
        population_size: usize,
        num_strategies: usize,
        edges: &[(NodeId, NodeId)],
        initial: &InitialStrategies,
        rng: &mut dyn RngCore,
    ) -> Result<Self, StructureError> {
        Self::assemble(
            population_size,
            num_strategies,
            Directedness::Undirected,
            edges.iter().copied(),
            initial,
            rng,
        )
    }

    /// Build an undirected network from a generated topology.
    ///
    /// The topology is drawn from `rng` first, then the initial assignment.
    pub fn generate(
        population_size: usize,
        num_strategies: usize,
        topology: &TopologySpec,
        initial: &InitialStrategies,
        rng: &mut dyn RngCore,
    ) -> Result<Self, StructureError> {
        let edges = topology.generate(population_size, rng)?;
        Self::assemble(
            population_size,
            num_strategies,
            Directedness::Undirected,
            edges,
            initial,
            rng,
        )
    }

    /// Build a network from per-node neighbour lists.
    ///
    /// `lists[u]` names the nodes `u` links to. For an undirected network
    /// each entry is an edge, so a list may name each edge from one or both
    /// ends.
    pub fn from_adjacency_list(
        lists: &[Vec<NodeId>],
        num_strategies: usize,
        directedness: Directedness,
        initial: &InitialStrategies,
        rng: &mut dyn RngCore,
    ) -> Result<Self, StructureError> {
        let edges = lists.iter().enumerate().flat_map(|(u, list)| {
            list.iter().map(move |&v| (NodeId(u as u32), v))
        });
        Self::assemble(
            lists.len(),
            num_strategies,
            directedness,
            edges,
            initial,
            rng,
        )
    }

    /// Build a network from a square adjacency matrix; non-zero entries are
    /// edges.
    ///
    /// An undirected network requires a symmetric matrix. Any non-zero
    /// diagonal entry is a self-loop and is rejected.
    pub fn from_adjacency_matrix<R: AsRef<[u8]>>(
        rows: &[R],
        num_strategies: usize,
        directedness: Directedness,
        initial: &InitialStrategies,
        rng: &mut dyn RngCore,
    ) -> Result<Self, StructureError> {
        let n = rows.len();
        for (u, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n {
                return Err(invalid_topology(format!(
                    "adjacency matrix row {u} has {} entries, expected {n}",
                    row.len()
                )));
            }
        }
        if directedness == Directedness::Undirected {
            for u in 0..n {
                for v in (u + 1)..n {
                    let uv = rows[u].as_ref()[v] != 0;
                    let vu = rows[v].as_ref()[u] != 0;
                    if uv != vu {
                        return Err(invalid_topology(format!(
                            "undirected adjacency matrix is not symmetric at ({u}, {v})"
                        )));
                    }
                }
            }
        }
        let edges = rows.iter().enumerate().flat_map(|(u, row)| {
            row.as_ref()
                .iter()
                .enumerate()
                .filter(|&(_, &cell)| cell != 0)
                .map(move |(v, _)| (NodeId(u as u32), NodeId(v as u32)))
        });
        Self::assemble(n, num_strategies, directedness, edges, initial, rng)
    }

    /// Validate an edge stream, build sorted adjacency lists, and resolve
    /// the initial strategies.
    pub(crate) fn assemble(
        population_size: usize,
        num_strategies: usize,
        directedness: Directedness,
        edges: impl IntoIterator<Item = (NodeId, NodeId)>,
        initial: &InitialStrategies,
        rng: &mut dyn RngCore,
    ) -> Result<Self, StructureError> {
        if population_size == 0 {
            return Err(invalid_topology("population size must be at least 1"));
        }
        if population_size > Self::MAX_NODES {
            return Err(invalid_topology(format!(
                "population size {population_size} exceeds the maximum of {}",
                Self::MAX_NODES
            )));
        }

        let mut unique: IndexSet<(NodeId, NodeId)> = IndexSet::new();
        for (u, v) in edges {
            for endpoint in [u, v] {
                if endpoint.index() >= population_size {
                    return Err(invalid_topology(format!(
                        "edge ({u}, {v}) references node {endpoint} outside 0..{population_size}"
                    )));
                }
            }
            if u == v {
                return Err(invalid_topology(format!("self-loop on node {u}")));
            }
            let key = match directedness {
                Directedness::Undirected if v < u => (v, u),
                _ => (u, v),
            };
            unique.insert(key);
        }

        let mut adjacency = vec![Adjacency::new(); population_size];
        for &(u, v) in &unique {
            adjacency[u.index()].push(v);
            if directedness == Directedness::Undirected {
                adjacency[v.index()].push(u);
            }
        }
        for list in &mut adjacency {
            list.sort_unstable();
        }

        let state = StrategyState::new(population_size, num_strategies, initial, rng)?;
        debug!(
            population_size,
            num_strategies,
            edges = unique.len(),
            directed = (directedness == Directedness::Directed),
            "network constructed"
        );
        Ok(Self {
            adjacency,
            edge_count: unique.len(),
            directedness,
            state,
            sampling: SamplingMode::Uniform,
            instance_id: StructureInstanceId::next(),
        })
    }

    /// Number of edges (arcs, for a directed network).
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether edges are one-way arcs.
    pub fn directedness(&self) -> Directedness {
        self.directedness
    }

    /// `true` for a directed network.
    pub fn is_directed(&self) -> bool {
        self.directedness == Directedness::Directed
    }

    /// Mean number of neighbours per node.
    pub fn average_degree(&self) -> f64 {
        let total: usize = self.adjacency.iter().map(|l| l.len()).sum();
        total as f64 / self.adjacency.len() as f64
    }

    /// Borrow the sorted neighbour list of `node`.
    ///
    /// The allocation-free fast path behind
    /// [`PopulationStructure::neighbours`].
    pub fn neighbour_slice(&self, node: NodeId) -> Result<&[NodeId], StructureError> {
        check_node(node, self.adjacency.len())?;
        Ok(&self.adjacency[node.index()])
    }

    /// `true` if `v` is a neighbour of `u`. Invalid ids are never adjacent.
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.adjacency
            .get(u.index())
            .is_some_and(|list| list.binary_search(&v).is_ok())
    }

    /// Every edge once, in canonical order.
    ///
    /// Undirected edges are reported as `(u, v)` with `u < v`; directed
    /// arcs as `(source, target)`. Ordered by source, then target.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        let directed = self.is_directed();
        self.adjacency.iter().enumerate().flat_map(move |(u, list)| {
            let u = NodeId(u as u32);
            list.iter()
                .copied()
                .filter(move |&v| directed || u < v)
                .map(move |v| (u, v))
        })
    }

    /// Replace the edge `node–from` with `node–to`.
    ///
    /// Node count, edge count and every strategy are unchanged. For a
    /// directed network this moves the arc `node→from` to `node→to`.
    /// Rewiring gives the network a fresh [`StructureInstanceId`].
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if any id is outside `0..population_size`
    /// - `InvalidTopology` if `node–from` does not exist, `to == node`, or
    ///   `node–to` already exists
    pub fn rewire(&mut self, node: NodeId, from: NodeId, to: NodeId) -> Result<(), StructureError> {
        let n = self.adjacency.len();
        check_node(node, n)?;
        check_node(from, n)?;
        check_node(to, n)?;
        if to == node {
            return Err(invalid_topology(format!("self-loop on node {node}")));
        }
        let Ok(old) = self.adjacency[node.index()].binary_search(&from) else {
            return Err(invalid_topology(format!("no edge ({node}, {from}) to rewire")));
        };
        let Err(new) = self.adjacency[node.index()].binary_search(&to) else {
            return Err(invalid_topology(format!("edge ({node}, {to}) already exists")));
        };

        let list = &mut self.adjacency[node.index()];
        list.remove(old);
        let new = if new > old { new - 1 } else { new };
        list.insert(new, to);

        if !self.is_directed() {
            remove_sorted(&mut self.adjacency[from.index()], node);
            insert_sorted(&mut self.adjacency[to.index()], node);
        }
        self.instance_id = StructureInstanceId::next();
        debug!(node = node.0, from = from.0, to = to.0, "edge rewired");
        Ok(())
    }

    fn degree_of(&self, node: NodeId) -> u64 {
        self.adjacency[node.index()].len() as u64
    }
}

fn remove_sorted(list: &mut Adjacency, node: NodeId) {
    if let Ok(pos) = list.binary_search(&node) {
        list.remove(pos);
    }
}

fn insert_sorted(list: &mut Adjacency, node: NodeId) {
    if let Err(pos) = list.binary_search(&node) {
        list.insert(pos, node);
    }
}

impl PopulationStructure for Network {
    fn population_size(&self) -> usize {
        self.adjacency.len()
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
        self.neighbour_slice(node).map(Cow::Borrowed)
    }

    fn degree(&self, node: NodeId) -> Result<usize, StructureError> {
        Ok(self.neighbour_slice(node)?.len())
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
        let neighbours = self.neighbour_slice(node)?;
        match mode {
            SamplingMode::Uniform => sampling::uniform(node, neighbours, rng),
            SamplingMode::DegreeWeighted => {
                sampling::weighted(node, neighbours, |j| self.degree_of(j), rng)
            }
            SamplingMode::DifferentStrategy => sampling::different_strategy(
                node,
                neighbours,
                self.state.get_unchecked(node),
                self.state.strategies(),
                rng,
            ),
        }
    }

    fn clone_box(&self) -> Box<dyn PopulationStructure> {
        Box::new(self.clone())
    }

    fn instance_id(&self) -> StructureInstanceId {
        self.instance_id
    }

    fn topology_eq(&self, other: &dyn PopulationStructure) -> bool {
        other.downcast_ref::<Self>().is_some_and(|o| {
            self.directedness == o.directedness && self.adjacency == o.adjacency
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn n(i: u32) -> NodeId {
        NodeId(i)
    }

    fn s(i: u32) -> StrategyId {
        StrategyId(i)
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(17)
    }

    fn edges(pairs: &[(u32, u32)]) -> Vec<(NodeId, NodeId)> {
        pairs.iter().map(|&(u, v)| (n(u), n(v))).collect()
    }

    fn explicit(assignment: &[u32]) -> InitialStrategies {
        InitialStrategies::Explicit(assignment.iter().map(|&x| s(x)).collect())
    }

    /// N=4 ring, K=2, assignment [0, 0, 1, 1].
    fn ring4() -> Network {
        Network::from_edges(
            4,
            2,
            &edges(&[(0, 1), (1, 2), (2, 3), (3, 0)]),
            &explicit(&[0, 0, 1, 1]),
            &mut rng(),
        )
        .unwrap()
    }

    // ── Ring scenario ───────────────────────────────────────────

    #[test]
    fn ring_counts_and_neighbours() {
        let net = ring4();
        assert_eq!(net.population_size(), 4);
        assert_eq!(net.num_strategies(), 2);
        assert_eq!(net.strategy_counts().as_slice(), &[2, 2]);
        assert_eq!(net.neighbours(n(0)).unwrap().as_ref(), &[n(1), n(3)]);
    }

    #[test]
    fn ring_update_keeps_neighbours() {
        let mut net = ring4();
        net.set_strategy(n(0), s(1)).unwrap();
        assert_eq!(net.strategy_counts().as_slice(), &[1, 3]);
        assert_eq!(net.neighbours(n(0)).unwrap().as_ref(), &[n(1), n(3)]);
        assert_eq!(net.strategy_of(n(0)).unwrap(), s(1));
        assert_eq!(net.strategy_of(n(1)).unwrap(), s(0));
    }

    // ── Construction errors ─────────────────────────────────────

    #[test]
    fn edge_outside_population_is_invalid_topology() {
        let err = Network::from_edges(
            3,
            2,
            &edges(&[(0, 1), (1, 5)]),
            &InitialStrategies::default(),
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, StructureError::InvalidTopology { .. }));
    }

    #[test]
    fn empty_population_is_invalid_topology() {
        let err = Network::from_edges(0, 2, &[], &InitialStrategies::default(), &mut rng())
            .unwrap_err();
        assert!(matches!(err, StructureError::InvalidTopology { .. }));
    }

    #[test]
    fn self_loop_is_invalid_topology() {
        let err = Network::from_edges(
            3,
            2,
            &edges(&[(1, 1)]),
            &InitialStrategies::default(),
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, StructureError::InvalidTopology { .. }));
    }

    #[test]
    fn duplicate_edges_collapse() {
        let net = Network::from_edges(
            3,
            1,
            &edges(&[(0, 1), (1, 0), (0, 1), (1, 2)]),
            &InitialStrategies::default(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.neighbours(n(1)).unwrap().as_ref(), &[n(0), n(2)]);
    }

    #[test]
    fn bad_initial_state_is_rejected() {
        let err = Network::from_edges(
            3,
            2,
            &edges(&[(0, 1)]),
            &explicit(&[0, 1]),
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, StructureError::InvalidState { .. }));
    }

    #[test]
    fn overflowing_initial_counts_are_rejected() {
        let err = Network::from_edges(
            1,
            2,
            &[],
            &InitialStrategies::Counts(vec![u64::MAX, 2]),
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, StructureError::InvalidState { .. }));

        let mut net = ring4();
        assert!(matches!(
            net.assign_counts(&[u64::MAX, 5], &mut rng()),
            Err(StructureError::InvalidState { .. })
        ));
        assert_eq!(net.strategies(), &[s(0), s(0), s(1), s(1)]);
        assert_eq!(net.strategy_counts().as_slice(), &[2, 2]);
    }

    // ── Queries ─────────────────────────────────────────────────

    #[test]
    fn out_of_range_queries() {
        let mut net = ring4();
        assert!(matches!(
            net.strategy_of(n(4)),
            Err(StructureError::OutOfRange { .. })
        ));
        assert!(matches!(
            net.neighbours(n(9)),
            Err(StructureError::OutOfRange { .. })
        ));
        assert!(matches!(
            net.set_strategy(n(4), s(0)),
            Err(StructureError::OutOfRange { .. })
        ));
        assert!(matches!(
            net.set_strategy(n(0), s(2)),
            Err(StructureError::InvalidStrategy { .. })
        ));
        assert_eq!(net.strategy_counts().as_slice(), &[2, 2]);
    }

    #[test]
    fn edges_are_canonical() {
        let net = ring4();
        let listed: Vec<_> = net.edges().collect();
        assert_eq!(listed, edges(&[(0, 1), (0, 3), (1, 2), (2, 3)]));
        assert!(net.has_edge(n(3), n(0)));
        assert!(!net.has_edge(n(0), n(2)));
        assert!(!net.has_edge(n(7), n(0)));
        assert_eq!(net.average_degree(), 2.0);
    }

    // ── Sampling ────────────────────────────────────────────────

    #[test]
    fn isolated_node_cannot_sample() {
        let net = Network::from_edges(
            3,
            1,
            &edges(&[(0, 1)]),
            &InitialStrategies::default(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(
            net.sample_neighbour(n(2), &mut rng()),
            Err(StructureError::EmptyNeighbourhood { node: n(2) })
        );
    }

    #[test]
    fn sampled_neighbour_is_adjacent() {
        let net = ring4();
        let mut r = rng();
        for _ in 0..100 {
            let j = net.sample_neighbour(n(2), &mut r).unwrap();
            assert!(j == n(1) || j == n(3));
        }
    }

    #[test]
    fn different_strategy_mode() {
        let mut net = ring4();
        net.set_sampling_mode(SamplingMode::DifferentStrategy);
        let mut r = rng();
        // Node 0 plays 0; neighbours 1 (plays 0) and 3 (plays 1).
        for _ in 0..50 {
            assert_eq!(net.sample_neighbour(n(0), &mut r).unwrap(), n(3));
        }
        net.set_strategy(n(3), s(0)).unwrap();
        assert!(matches!(
            net.sample_neighbour(n(0), &mut r),
            Err(StructureError::EmptyNeighbourhood { .. })
        ));
        // The uniform baseline is still available per call.
        assert!(net
            .sample_neighbour_with(n(0), SamplingMode::Uniform, &mut r)
            .is_ok());
    }

    #[test]
    fn degree_weighted_prefers_hubs() {
        // Star centred on 1 plus a pendant chain 0–2–3: node 0 sees the
        // hub (degree 4) and node 2 (degree 2).
        let net = Network::from_edges(
            6,
            1,
            &edges(&[(0, 1), (1, 4), (1, 5), (1, 3), (0, 2), (2, 3)]),
            &InitialStrategies::default(),
            &mut rng(),
        )
        .unwrap();
        let mut r = rng();
        let hub = (0..3000)
            .filter(|_| {
                net.sample_neighbour_with(n(0), SamplingMode::DegreeWeighted, &mut r)
                    .unwrap()
                    == n(1)
            })
            .count();
        // Expected 2000 (weight 4 of 6).
        assert!((1800..2200).contains(&hub), "hub picked {hub} times");
    }

    // ── Directed ────────────────────────────────────────────────

    #[test]
    fn directed_adjacency_list() {
        let net = Network::from_adjacency_list(
            &[vec![n(1)], vec![n(2)], vec![]],
            2,
            Directedness::Directed,
            &InitialStrategies::Uniform,
            &mut rng(),
        )
        .unwrap();
        assert!(net.is_directed());
        assert_eq!(net.neighbours(n(0)).unwrap().as_ref(), &[n(1)]);
        assert!(net.neighbours(n(2)).unwrap().is_empty());
        assert_eq!(net.edge_count(), 2);
        // Node 1's only out-neighbour (2) has out-degree zero.
        assert!(matches!(
            net.sample_neighbour_with(n(1), SamplingMode::DegreeWeighted, &mut rng()),
            Err(StructureError::EmptyNeighbourhood { .. })
        ));
    }

    #[test]
    fn undirected_adjacency_list_accepts_one_sided_entries() {
        let net = Network::from_adjacency_list(
            &[vec![n(1), n(2)], vec![n(0)], vec![]],
            1,
            Directedness::Undirected,
            &InitialStrategies::default(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.neighbours(n(2)).unwrap().as_ref(), &[n(0)]);
    }

    // ── Adjacency matrix ────────────────────────────────────────

    #[test]
    fn matrix_import_matches_edge_list() {
        let matrix: Vec<Vec<u8>> = vec![
            vec![0, 1, 0, 1],
            vec![1, 0, 1, 0],
            vec![0, 1, 0, 1],
            vec![1, 0, 1, 0],
        ];
        let from_matrix = Network::from_adjacency_matrix(
            &matrix,
            2,
            Directedness::Undirected,
            &explicit(&[0, 0, 1, 1]),
            &mut rng(),
        )
        .unwrap();
        assert!(from_matrix.topology_eq(&ring4()));
    }

    #[test]
    fn matrix_must_be_square_and_symmetric() {
        let ragged: Vec<Vec<u8>> = vec![vec![0, 1], vec![1]];
        assert!(matches!(
            Network::from_adjacency_matrix(
                &ragged,
                1,
                Directedness::Undirected,
                &InitialStrategies::default(),
                &mut rng()
            ),
            Err(StructureError::InvalidTopology { .. })
        ));

        let asymmetric: Vec<Vec<u8>> = vec![vec![0, 1], vec![0, 0]];
        assert!(matches!(
            Network::from_adjacency_matrix(
                &asymmetric,
                1,
                Directedness::Undirected,
                &InitialStrategies::default(),
                &mut rng()
            ),
            Err(StructureError::InvalidTopology { .. })
        ));
        let directed = Network::from_adjacency_matrix(
            &asymmetric,
            1,
            Directedness::Directed,
            &InitialStrategies::default(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(directed.edge_count(), 1);

        let diagonal: Vec<Vec<u8>> = vec![vec![1]];
        assert!(matches!(
            Network::from_adjacency_matrix(
                &diagonal,
                1,
                Directedness::Directed,
                &InitialStrategies::default(),
                &mut rng()
            ),
            Err(StructureError::InvalidTopology { .. })
        ));
    }

    // ── Generation ──────────────────────────────────────────────

    #[test]
    fn generated_network_is_reproducible() {
        let spec = TopologySpec::SmallWorld {
            degree: 4,
            rewire_probability: 0.2,
        };
        let a = Network::generate(50, 3, &spec, &InitialStrategies::Uniform, &mut rng()).unwrap();
        let b = Network::generate(50, 3, &spec, &InitialStrategies::Uniform, &mut rng()).unwrap();
        assert!(a.topology_eq(&b));
        assert_eq!(a.strategies(), b.strategies());
        assert_ne!(a.instance_id(), b.instance_id());
    }

    #[test]
    fn generation_errors_surface() {
        let err = Network::generate(
            5,
            2,
            &TopologySpec::Ring { degree: 6 },
            &InitialStrategies::default(),
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, StructureError::InvalidTopology { .. }));
    }

    // ── Rewiring ────────────────────────────────────────────────

    #[test]
    fn rewire_moves_one_edge() {
        let mut net = ring4();
        let before = net.instance_id();
        net.rewire(n(0), n(1), n(2)).unwrap();
        assert_eq!(net.edge_count(), 4);
        assert_eq!(net.population_size(), 4);
        assert_eq!(net.neighbours(n(0)).unwrap().as_ref(), &[n(2), n(3)]);
        assert_eq!(net.neighbours(n(1)).unwrap().as_ref(), &[n(2)]);
        assert_eq!(net.neighbours(n(2)).unwrap().as_ref(), &[n(0), n(1), n(3)]);
        assert_eq!(net.strategy_counts().as_slice(), &[2, 2]);
        assert_ne!(net.instance_id(), before);
    }

    #[test]
    fn rewire_rejects_invalid_requests() {
        let mut net = ring4();
        let pristine = net.clone();
        assert!(matches!(
            net.rewire(n(0), n(2), n(1)),
            Err(StructureError::InvalidTopology { .. })
        ));
        assert!(matches!(
            net.rewire(n(0), n(1), n(0)),
            Err(StructureError::InvalidTopology { .. })
        ));
        assert!(matches!(
            net.rewire(n(0), n(1), n(3)),
            Err(StructureError::InvalidTopology { .. })
        ));
        assert!(matches!(
            net.rewire(n(0), n(1), n(8)),
            Err(StructureError::OutOfRange { .. })
        ));
        assert!(net.topology_eq(&pristine));
    }

    #[test]
    fn rewire_directed_moves_arc_only() {
        let mut net = Network::from_adjacency_list(
            &[vec![n(1)], vec![n(0)], vec![]],
            1,
            Directedness::Directed,
            &InitialStrategies::default(),
            &mut rng(),
        )
        .unwrap();
        net.rewire(n(0), n(1), n(2)).unwrap();
        assert_eq!(net.neighbours(n(0)).unwrap().as_ref(), &[n(2)]);
        assert_eq!(net.neighbours(n(1)).unwrap().as_ref(), &[n(0)]);
        assert!(net.neighbours(n(2)).unwrap().is_empty());
    }

    // ── Clone / dyn ─────────────────────────────────────────────

    #[test]
    fn clone_is_independent() {
        let original = ring4();
        let mut copy = original.clone_box();
        copy.set_strategy(n(0), s(1)).unwrap();
        assert_eq!(original.strategy_counts().as_slice(), &[2, 2]);
        assert_eq!(copy.strategy_counts().as_slice(), &[1, 3]);
        assert!(copy.topology_eq(&original));
        assert_eq!(copy.instance_id(), original.instance_id());
    }

    #[test]
    fn downcast_ref_network() {
        let s: Box<dyn PopulationStructure> = Box::new(ring4());
        assert!(s.downcast_ref::<Network>().is_some());
        assert!(s.downcast_ref::<crate::WellMixed>().is_none());
    }

    // ── Compliance ──────────────────────────────────────────────

    #[test]
    fn compliance_generated_families() {
        let families = [
            TopologySpec::Ring { degree: 4 },
            TopologySpec::Complete,
            TopologySpec::Lattice {
                width: 5,
                periodic: true,
            },
            TopologySpec::Random {
                average_degree: 3.0,
            },
            TopologySpec::SmallWorld {
                degree: 4,
                rewire_probability: 0.1,
            },
            TopologySpec::ScaleFree { edges_per_node: 2 },
        ];
        for spec in &families {
            let mut net =
                Network::generate(25, 3, spec, &InitialStrategies::Uniform, &mut rng()).unwrap();
            compliance::run_full_compliance(&mut net, &mut rng());
        }
    }
}
