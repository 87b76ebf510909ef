//! Reusable structure fixtures.
//!
//! - [`seeded_rng`]: the deterministic RNG every test uses
//! - [`ring4`]: the four-node ring with assignment `[0, 0, 1, 1]`
//! - [`ring_network`], [`lattice_network`], [`well_mixed`]: sized fixtures

use deme_core::{NodeId, StrategyId};
use deme_structure::{InitialStrategies, Network, TopologySpec, WellMixed};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Deterministic `ChaCha8Rng` seeded from `seed`.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// N=4 ring `0–1–2–3–0`, K=2, nodes 0 and 1 on strategy 0.
pub fn ring4() -> Network {
    let edges = [(0, 1), (1, 2), (2, 3), (3, 0)].map(|(u, v)| (NodeId(u), NodeId(v)));
    let initial = InitialStrategies::Explicit(
        [0, 0, 1, 1].into_iter().map(StrategyId).collect(),
    );
    Network::from_edges(4, 2, &edges, &initial, &mut seeded_rng(0)).expect("ring4 is valid")
}

/// Ring lattice of `n` nodes, each linked to `degree` nearest nodes, with
/// a uniform random assignment over `k` strategies.
pub fn ring_network(n: usize, degree: u32, k: usize, seed: u64) -> Network {
    Network::generate(
        n,
        k,
        &TopologySpec::Ring { degree },
        &InitialStrategies::Uniform,
        &mut seeded_rng(seed),
    )
    .expect("ring parameters should be valid")
}

/// Periodic `width × height` square lattice with a uniform random
/// assignment over `k` strategies.
pub fn lattice_network(width: u32, height: u32, k: usize, seed: u64) -> Network {
    Network::generate(
        (width * height) as usize,
        k,
        &TopologySpec::Lattice {
            width,
            periodic: true,
        },
        &InitialStrategies::Uniform,
        &mut seeded_rng(seed),
    )
    .expect("lattice parameters should be valid")
}

/// Well-mixed population of `n` nodes with exact `counts`.
pub fn well_mixed(n: usize, counts: Vec<u64>, seed: u64) -> WellMixed {
    let k = counts.len();
    WellMixed::new(n, k, &InitialStrategies::Counts(counts), &mut seeded_rng(seed))
        .expect("counts should match the population")
}
