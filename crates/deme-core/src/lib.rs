//! Core types for Deme population structures.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! node/strategy model shared by every population structure: identifiers,
//! per-strategy count bookkeeping, and the error type returned by all
//! structure operations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod counts;
pub mod error;
pub mod id;

pub use counts::StrategyCounts;
pub use error::StructureError;
pub use id::{NodeId, StrategyId, StructureInstanceId};
