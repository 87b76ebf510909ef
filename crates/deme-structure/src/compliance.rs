//! PopulationStructure trait compliance test helpers.
//!
//! These functions verify that a structure satisfies the invariants the
//! trait contract promises. Reused across all backend test modules
//! (WellMixed, Network with every generated family).

use crate::network::Network;
use crate::sampling::SamplingMode;
use crate::structure::PopulationStructure;
use deme_core::{NodeId, StrategyCounts, StrategyId, StructureError};
use rand::{Rng, RngCore};

fn nodes(s: &dyn PopulationStructure) -> impl Iterator<Item = NodeId> {
    (0..s.population_size() as u32).map(NodeId)
}

/// Assert that the cached counts match a fresh tally and sum to `N`.
pub fn assert_counts_consistent(s: &dyn PopulationStructure) {
    let fresh = StrategyCounts::tally(s.num_strategies(), s.strategies())
        .expect("every strategy should be in range");
    assert_eq!(
        s.strategy_counts(),
        &fresh,
        "cached counts diverged from a fresh tally"
    );
    assert_eq!(
        s.strategy_counts().total(),
        s.population_size() as u64,
        "counts do not sum to population size"
    );
}

/// Assert that every node holds a strategy in `0..K`.
pub fn assert_strategies_in_range(s: &dyn PopulationStructure) {
    assert_eq!(s.strategies().len(), s.population_size());
    for node in nodes(s) {
        let strategy = s.strategy_of(node).expect("node should be in range");
        assert!(
            strategy.index() < s.num_strategies(),
            "node {node} holds strategy {strategy}, K = {}",
            s.num_strategies()
        );
    }
}

/// Assert that neighbour lists are sorted, free of self-loops, in range,
/// and agree with `degree`.
pub fn assert_neighbourhoods_well_formed(s: &dyn PopulationStructure) {
    let n = s.population_size();
    for node in nodes(s) {
        let nbrs = s.neighbours(node).expect("node should be in range");
        assert!(
            nbrs.windows(2).all(|w| w[0] < w[1]),
            "neighbours of {node} are not strictly ascending: {nbrs:?}"
        );
        assert!(!nbrs.contains(&node), "node {node} neighbours itself");
        assert!(nbrs.iter().all(|j| j.index() < n), "neighbour out of range");
        assert_eq!(s.degree(node).expect("in range"), nbrs.len());
    }
}

/// Assert that out-of-range ids are rejected everywhere.
pub fn assert_out_of_range_rejected(s: &mut dyn PopulationStructure, rng: &mut dyn RngCore) {
    let bad = NodeId(s.population_size() as u32);
    let expected = StructureError::OutOfRange {
        node: bad,
        population_size: s.population_size(),
    };
    assert_eq!(s.strategy_of(bad), Err(expected.clone()));
    assert_eq!(s.degree(bad), Err(expected.clone()));
    assert!(s.neighbours(bad).is_err());
    assert_eq!(s.sample_neighbour(bad, rng), Err(expected.clone()));
    assert_eq!(s.set_strategy(bad, StrategyId(0)), Err(expected));
}

/// Assert that `set_strategy` changes exactly one node and keeps counts
/// consistent; an invalid strategy changes nothing.
pub fn assert_set_strategy_is_local(s: &mut dyn PopulationStructure, rng: &mut dyn RngCore) {
    let k = s.num_strategies() as u32;
    for _ in 0..20 {
        let before = s.strategies().to_vec();
        let node = NodeId(rng.gen_range(0..s.population_size() as u32));
        let strategy = StrategyId(rng.gen_range(0..k));
        s.set_strategy(node, strategy).expect("valid update");
        for (i, (&old, &new)) in before.iter().zip(s.strategies()).enumerate() {
            if i == node.index() {
                assert_eq!(new, strategy);
            } else {
                assert_eq!(old, new, "set_strategy({node}) changed node {i}");
            }
        }
        assert_counts_consistent(s);
    }

    let before = s.strategies().to_vec();
    assert!(matches!(
        s.set_strategy(NodeId(0), StrategyId(k)),
        Err(StructureError::InvalidStrategy { .. })
    ));
    assert_eq!(s.strategies(), before.as_slice());
}

/// Assert that strategy updates never alter the topology.
pub fn assert_topology_invariant_under_updates(
    s: &mut dyn PopulationStructure,
    rng: &mut dyn RngCore,
) {
    let snapshot = s.clone_box();
    s.randomize_strategies(rng);
    let k = s.num_strategies() as u32;
    for node in nodes(&*snapshot) {
        s.set_strategy(node, StrategyId(rng.gen_range(0..k)))
            .expect("valid update");
    }
    assert!(
        s.topology_eq(&*snapshot),
        "strategy updates changed the topology"
    );
    for node in nodes(&*snapshot) {
        assert_eq!(s.neighbours(node).ok(), snapshot.neighbours(node).ok());
    }
    assert_eq!(s.instance_id(), snapshot.instance_id());
}

/// Assert that sampled neighbours belong to the neighbourhood and that an
/// empty neighbourhood is reported, for every sampling mode.
pub fn assert_samples_in_neighbourhood(s: &dyn PopulationStructure, rng: &mut dyn RngCore) {
    let modes = [
        SamplingMode::Uniform,
        SamplingMode::DegreeWeighted,
        SamplingMode::DifferentStrategy,
    ];
    for node in nodes(s) {
        let nbrs = s.neighbours(node).expect("in range");
        for mode in modes {
            for _ in 0..4 {
                match s.sample_neighbour_with(node, mode, rng) {
                    Ok(j) => {
                        assert!(nbrs.contains(&j), "sampled {j} not a neighbour of {node}");
                        if mode == SamplingMode::DifferentStrategy {
                            assert_ne!(s.strategies()[j.index()], s.strategies()[node.index()]);
                        }
                    }
                    Err(StructureError::EmptyNeighbourhood { node: reported }) => {
                        assert_eq!(reported, node);
                        if mode == SamplingMode::Uniform {
                            assert!(nbrs.is_empty(), "uniform sampling failed for {node}");
                        }
                    }
                    Err(e) => panic!("unexpected sampling error for {node}: {e}"),
                }
            }
        }
    }
}

/// Assert that a clone is an independent deep copy.
pub fn assert_clone_independent(s: &mut dyn PopulationStructure) {
    let copy = s.clone_box();
    assert!(copy.topology_eq(s), "clone has a different topology");
    assert_eq!(copy.strategies(), s.strategies());
    assert_eq!(copy.strategy_counts(), s.strategy_counts());

    let k = s.num_strategies() as u32;
    let node = NodeId(0);
    let flipped = StrategyId((s.strategies()[0].0 + 1) % k);
    s.set_strategy(node, flipped).expect("valid update");
    if k > 1 {
        assert_ne!(
            copy.strategy_of(node),
            s.strategy_of(node),
            "mutating the original leaked into the clone"
        );
    }
    assert_counts_consistent(&*copy);
}

/// Assert that `assign_counts` places exact counts and rejects mismatches
/// without mutation.
pub fn assert_assign_counts(s: &mut dyn PopulationStructure, rng: &mut dyn RngCore) {
    let n = s.population_size() as u64;
    let k = s.num_strategies();
    let mut counts = vec![0u64; k];
    counts[0] = n / 2;
    counts[k - 1] += n - n / 2;
    s.assign_counts(&counts, rng).expect("counts sum to N");
    assert_eq!(s.strategy_counts().as_slice(), counts.as_slice());
    assert_counts_consistent(s);

    let before = s.strategies().to_vec();
    let mut wrong = counts.clone();
    wrong[0] += 1;
    assert!(matches!(
        s.assign_counts(&wrong, rng),
        Err(StructureError::InvalidState { .. })
    ));
    assert_eq!(s.strategies(), before.as_slice());
}

/// Assert that `j in neighbours(i)` implies `i in neighbours(j)`.
///
/// Skipped for directed networks, whose arcs are one-way.
pub fn assert_neighbours_symmetric(s: &dyn PopulationStructure) {
    if s.downcast_ref::<Network>().is_some_and(Network::is_directed) {
        return;
    }
    for node in nodes(s) {
        for &j in s.neighbours(node).expect("in range").iter() {
            let back = s.neighbours(j).expect("in range");
            assert!(
                back.contains(&node),
                "neighbour symmetry violated: {j} in N({node}) but {node} not in N({j})"
            );
        }
    }
}

/// Run every compliance check on a structure.
pub fn run_full_compliance(s: &mut dyn PopulationStructure, rng: &mut dyn RngCore) {
    assert_counts_consistent(s);
    assert_strategies_in_range(s);
    assert_neighbourhoods_well_formed(s);
    assert_neighbours_symmetric(s);
    assert_samples_in_neighbourhood(s, rng);
    assert_out_of_range_rejected(s, rng);
    assert_set_strategy_is_local(s, rng);
    assert_topology_invariant_under_updates(s, rng);
    assert_clone_independent(s);
    assert_assign_counts(s, rng);
}
