//! Population structures for evolutionary game dynamics.
//!
//! This crate defines the [`PopulationStructure`] trait, the contract through
//! which a simulation driver queries neighbourhoods and strategies and
//! applies strategy updates, along with its concrete implementations.
//!
//! # Structures
//!
//! - [`WellMixed`]: every individual may interact with every other one
//! - [`Network`]: interaction restricted to the edges of a graph, built from
//!   an edge list, an adjacency import, or a generated [`TopologySpec`]
//!
//! # Randomness
//!
//! Nothing in this crate owns an RNG. Every operation that needs randomness
//! (topology generation, random initial assignment, neighbour sampling)
//! takes `&mut dyn RngCore` from the caller, so runs are reproducible from
//! the caller's seed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod initial;
pub mod network;
pub mod sampling;
pub mod state;
pub mod structure;
pub mod topology;
pub mod well_mixed;

#[cfg(test)]
pub(crate) mod compliance;

pub use config::{NetworkBuilder, NetworkConfig, TopologySource};
pub use initial::InitialStrategies;
pub use network::Network;
pub use sampling::SamplingMode;
pub use state::StrategyState;
pub use structure::PopulationStructure;
pub use topology::{Directedness, TopologySpec};
pub use well_mixed::WellMixed;
