//! Deme: population structures for evolutionary game dynamics.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Deme sub-crates. A simulation driver normally only needs `deme`.
//!
//! # Quick start
//!
//! ```rust
//! use deme::prelude::*;
//! use rand::{Rng, SeedableRng};
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//!
//! // A 10×10 torus, half cooperators and half defectors.
//! let mut net = Network::builder()
//!     .population_size(100)
//!     .generated(TopologySpec::Lattice { width: 10, periodic: true })
//!     .initial(InitialStrategies::Counts(vec![50, 50]))
//!     .build(&mut rng)
//!     .unwrap();
//!
//! // One imitation step: a random node copies a random neighbour.
//! let focal = NodeId(rng.gen_range(0..100));
//! let model = net.sample_neighbour(focal, &mut rng).unwrap();
//! let strategy = net.strategy_of(model).unwrap();
//! net.set_strategy(focal, strategy).unwrap();
//!
//! assert_eq!(net.strategy_counts().total(), 100);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `deme-core` | IDs, strategy counts, `StructureError` |
//! | [`structure`] | `deme-structure` | `PopulationStructure`, `Network`, `WellMixed`, topology generation, configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and IDs (`deme-core`).
///
/// Contains [`types::NodeId`], [`types::StrategyId`],
/// [`types::StrategyCounts`] and the [`types::StructureError`] enum.
pub use deme_core as types;

/// Population structures (`deme-structure`).
///
/// Provides the [`structure::PopulationStructure`] trait and its backends
/// [`structure::Network`] and [`structure::WellMixed`].
pub use deme_structure as structure;

/// Common imports for typical Deme usage.
///
/// ```rust
/// use deme::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use deme_core::{NodeId, StrategyCounts, StrategyId, StructureError};

    // Structures
    pub use deme_structure::{Network, PopulationStructure, WellMixed};

    // Construction
    pub use deme_structure::{
        Directedness, InitialStrategies, NetworkBuilder, NetworkConfig, SamplingMode,
        TopologySource, TopologySpec,
    };
}
