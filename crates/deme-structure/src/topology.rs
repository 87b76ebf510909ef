//! Generative topology descriptors.
//!
//! A [`TopologySpec`] names a graph family and its parameters. Generation
//! turns it into a simple undirected edge list over `0..population_size`
//! using the caller's RNG, so the same seed always yields the same graph.

use deme_core::error::invalid_topology;
use deme_core::{NodeId, StructureError};
use indexmap::IndexSet;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Whether edges are symmetric interaction relations or one-way arcs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directedness {
    /// `u–v` makes `u` a neighbour of `v` and `v` a neighbour of `u`.
    #[default]
    Undirected,
    /// `u→v` makes `v` a neighbour of `u` only.
    Directed,
}

/// A graph family plus its parameters.
///
/// # Examples
///
/// ```
/// use deme_structure::TopologySpec;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let edges = TopologySpec::Ring { degree: 2 }.generate(5, &mut rng).unwrap();
/// assert_eq!(edges.len(), 5);
///
/// // A simple graph on 5 nodes cannot have degree 5.
/// assert!(TopologySpec::Ring { degree: 5 }.generate(5, &mut rng).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologySpec {
    /// Each node linked to its `degree / 2` nearest nodes on either side.
    Ring {
        /// Even, `0 < degree < population_size`.
        degree: u32,
    },
    /// Every pair of nodes linked.
    Complete,
    /// Four-neighbour square lattice, rows of `width` nodes.
    ///
    /// With `periodic`, rows and columns wrap into a torus. A dimension
    /// shorter than 3 never wraps (the wrap edge would duplicate an
    /// existing edge or form a self-loop).
    Lattice {
        /// Nodes per row; must divide the population size.
        width: u32,
        /// Wrap edges around both dimensions.
        periodic: bool,
    },
    /// Erdős–Rényi G(N, M) with `M = round(N * average_degree / 2)`.
    Random {
        /// Target mean degree, `0 <= average_degree <= N - 1`.
        average_degree: f64,
    },
    /// Watts–Strogatz: a ring whose edges are rewired with a probability.
    SmallWorld {
        /// Degree of the underlying ring.
        degree: u32,
        /// Per-edge rewiring probability in `[0, 1]`.
        rewire_probability: f64,
    },
    /// Barabási–Albert preferential attachment.
    ///
    /// Grows from a complete core of `edges_per_node + 1` nodes; each
    /// further node attaches to `edges_per_node` distinct existing nodes
    /// chosen with probability proportional to their degree.
    ScaleFree {
        /// `1 <= edges_per_node < population_size`.
        edges_per_node: u32,
    },
}

impl TopologySpec {
    /// Short family name, used in logs.
    pub fn family(&self) -> &'static str {
        match self {
            Self::Ring { .. } => "ring",
            Self::Complete => "complete",
            Self::Lattice { .. } => "lattice",
            Self::Random { .. } => "random",
            Self::SmallWorld { .. } => "small_world",
            Self::ScaleFree { .. } => "scale_free",
        }
    }

    /// Generate an undirected simple edge list over `0..population_size`.
    ///
    /// Each edge appears once, as `(u, v)` with `u < v`.
    ///
    /// Returns `Err(StructureError::InvalidTopology)` if the population is
    /// empty or the parameters cannot produce a simple graph of that size.
    pub fn generate(
        &self,
        population_size: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<(NodeId, NodeId)>, StructureError> {
        if population_size == 0 {
            return Err(invalid_topology("population size must be at least 1"));
        }
        if population_size > u32::MAX as usize {
            return Err(invalid_topology(format!(
                "population size {population_size} exceeds the maximum of {}",
                u32::MAX
            )));
        }
        let n = population_size as u32;
        let edges = match *self {
            Self::Ring { degree } => {
                check_ring_degree(n, degree)?;
                ring(n, degree).into_iter().collect()
            }
            Self::Complete => complete(n),
            Self::Lattice { width, periodic } => lattice(n, width, periodic)?,
            Self::Random { average_degree } => random(n, average_degree, rng)?,
            Self::SmallWorld {
                degree,
                rewire_probability,
            } => small_world(n, degree, rewire_probability, rng)?,
            Self::ScaleFree { edges_per_node } => scale_free(n, edges_per_node, rng)?,
        };
        debug!(
            family = self.family(),
            population_size,
            edges = edges.len(),
            "generated topology"
        );
        Ok(edges
            .into_iter()
            .map(|(u, v)| (NodeId(u), NodeId(v)))
            .collect())
    }
}

/// Normalize an undirected edge so that `u < v`.
#[inline]
fn undirected(u: u32, v: u32) -> (u32, u32) {
    if u < v {
        (u, v)
    } else {
        (v, u)
    }
}

fn max_edges(n: u32) -> u64 {
    n as u64 * (n as u64 - 1) / 2
}

fn check_ring_degree(n: u32, degree: u32) -> Result<(), StructureError> {
    if degree == 0 || degree % 2 != 0 {
        return Err(invalid_topology(format!(
            "ring degree must be even and positive, got {degree}"
        )));
    }
    if degree >= n {
        return Err(invalid_topology(format!(
            "ring degree {degree} must be less than the population size {n}"
        )));
    }
    Ok(())
}

fn ring(n: u32, degree: u32) -> IndexSet<(u32, u32)> {
    let mut edges = IndexSet::with_capacity(n as usize * degree as usize / 2);
    for i in 0..n {
        for offset in 1..=degree / 2 {
            edges.insert(undirected(i, (i + offset) % n));
        }
    }
    edges
}

fn complete(n: u32) -> Vec<(u32, u32)> {
    let mut edges = Vec::with_capacity(max_edges(n) as usize);
    for u in 0..n {
        for v in (u + 1)..n {
            edges.push((u, v));
        }
    }
    edges
}

fn lattice(n: u32, width: u32, periodic: bool) -> Result<Vec<(u32, u32)>, StructureError> {
    if width == 0 || n % width != 0 {
        return Err(invalid_topology(format!(
            "lattice width {width} must divide the population size {n}"
        )));
    }
    let height = n / width;
    let wrap_rows = periodic && width >= 3;
    let wrap_cols = periodic && height >= 3;
    let at = |r: u32, c: u32| r * width + c;

    let mut edges = IndexSet::new();
    for r in 0..height {
        for c in 0..width {
            if c + 1 < width {
                edges.insert(undirected(at(r, c), at(r, c + 1)));
            } else if wrap_rows {
                edges.insert(undirected(at(r, c), at(r, 0)));
            }
            if r + 1 < height {
                edges.insert(undirected(at(r, c), at(r + 1, c)));
            } else if wrap_cols {
                edges.insert(undirected(at(r, c), at(0, c)));
            }
        }
    }
    Ok(edges.into_iter().collect())
}

fn random(
    n: u32,
    average_degree: f64,
    rng: &mut dyn RngCore,
) -> Result<Vec<(u32, u32)>, StructureError> {
    if !average_degree.is_finite() || average_degree < 0.0 {
        return Err(invalid_topology(format!(
            "average degree must be finite and >= 0, got {average_degree}"
        )));
    }
    if average_degree > (n - 1) as f64 {
        return Err(invalid_topology(format!(
            "average degree {average_degree} must be less than the population size {n}"
        )));
    }
    let all = max_edges(n);
    let m = ((n as f64 * average_degree / 2.0).round() as u64).min(all);

    // Dense requests sample the complement instead, so rejection sampling
    // never has to hit the last few free pairs of a nearly complete graph.
    if m * 2 > all {
        let mut missing = sample_pairs(n, all - m, rng);
        let edges = complete(n)
            .into_iter()
            .filter(|e| !missing.swap_remove(e))
            .collect();
        return Ok(edges);
    }
    Ok(sample_pairs(n, m, rng).into_iter().collect())
}

/// Rejection-sample `m` distinct unordered pairs, `m <= max_edges(n) / 2`.
fn sample_pairs(n: u32, m: u64, rng: &mut dyn RngCore) -> IndexSet<(u32, u32)> {
    let mut edges = IndexSet::with_capacity(m as usize);
    while (edges.len() as u64) < m {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        if u != v {
            edges.insert(undirected(u, v));
        }
    }
    edges
}

fn small_world(
    n: u32,
    degree: u32,
    rewire_probability: f64,
    rng: &mut dyn RngCore,
) -> Result<Vec<(u32, u32)>, StructureError> {
    check_ring_degree(n, degree)?;
    if !(0.0..=1.0).contains(&rewire_probability) {
        return Err(invalid_topology(format!(
            "rewire probability must be in [0, 1], got {rewire_probability}"
        )));
    }
    let mut edges = ring(n, degree);
    let mut node_degree = vec![degree; n as usize];
    let lattice_edges: Vec<(u32, u32)> = (0..n)
        .flat_map(|i| (1..=degree / 2).map(move |offset| (i, (i + offset) % n)))
        .collect();

    for (source, target) in lattice_edges {
        if !rng.gen_bool(rewire_probability) {
            continue;
        }
        if node_degree[source as usize] >= n - 1 {
            trace!(node = source, "small-world rewire skipped: node saturated");
            continue;
        }
        let replacement = loop {
            let w = rng.gen_range(0..n);
            if w != source && !edges.contains(&undirected(source, w)) {
                break w;
            }
        };
        edges.swap_remove(&undirected(source, target));
        edges.insert(undirected(source, replacement));
        node_degree[target as usize] -= 1;
        node_degree[replacement as usize] += 1;
    }
    Ok(edges.into_iter().collect())
}

fn scale_free(
    n: u32,
    edges_per_node: u32,
    rng: &mut dyn RngCore,
) -> Result<Vec<(u32, u32)>, StructureError> {
    if edges_per_node == 0 || edges_per_node >= n {
        return Err(invalid_topology(format!(
            "edges per node must be in 1..{n}, got {edges_per_node}"
        )));
    }
    let core = edges_per_node + 1;
    let mut edges = complete(core);
    // Every edge endpoint, so a uniform draw is a degree-proportional draw.
    let mut endpoints: Vec<u32> = edges.iter().flat_map(|&(u, v)| [u, v]).collect();

    for v in core..n {
        let mut targets = IndexSet::with_capacity(edges_per_node as usize);
        while targets.len() < edges_per_node as usize {
            targets.insert(endpoints[rng.gen_range(0..endpoints.len())]);
        }
        for u in targets {
            edges.push(undirected(u, v));
            endpoints.push(u);
            endpoints.push(v);
        }
    }
    Ok(edges)
}
