//! Benchmark profiles for Deme population structures.
//!
//! - [`reference_lattice`]: 100x100 periodic lattice (10K nodes), K=2
//! - [`stress_small_world`]: ~100K-node small-world network, K=3
//! - [`reference_well_mixed`]: 10K-node well-mixed population, K=2
//! - [`update_schedule`]: deterministic `(node, strategy)` update stream

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use deme_core::{NodeId, StrategyId, StructureError};
use deme_structure::{InitialStrategies, Network, TopologySpec, WellMixed};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Build the reference profile: 100x100 periodic square lattice.
pub fn reference_lattice(seed: u64) -> Result<Network, StructureError> {
    Network::generate(
        100 * 100,
        2,
        &TopologySpec::Lattice {
            width: 100,
            periodic: true,
        },
        &InitialStrategies::Uniform,
        &mut ChaCha8Rng::seed_from_u64(seed),
    )
}

/// Build the stress profile: 316x316 (~100K) nodes on a small-world graph
/// of degree 4 with 5% rewiring.
pub fn stress_small_world(seed: u64) -> Result<Network, StructureError> {
    Network::generate(
        316 * 316,
        3,
        &TopologySpec::SmallWorld {
            degree: 4,
            rewire_probability: 0.05,
        },
        &InitialStrategies::Uniform,
        &mut ChaCha8Rng::seed_from_u64(seed),
    )
}

/// Build a 10K-node well-mixed population split evenly over two strategies.
pub fn reference_well_mixed(seed: u64) -> Result<WellMixed, StructureError> {
    WellMixed::new(
        100 * 100,
        2,
        &InitialStrategies::Counts(vec![5_000, 5_000]),
        &mut ChaCha8Rng::seed_from_u64(seed),
    )
}

/// Generate `len` deterministic strategy updates for a population of
/// `population_size` nodes and `num_strategies` strategies.
pub fn update_schedule(
    population_size: u32,
    num_strategies: u32,
    len: usize,
    seed: u64,
) -> Vec<(NodeId, StrategyId)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            (
                NodeId(rng.gen_range(0..population_size)),
                StrategyId(rng.gen_range(0..num_strategies)),
            )
        })
        .collect()
}
