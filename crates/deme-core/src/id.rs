//! Strongly-typed identifiers for nodes, strategies and structure instances.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a member of the population.
///
/// Nodes are created when a structure is constructed and numbered
/// `0..population_size`. `NodeId(n)` is the n-th individual.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The node id as a slice index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a strategy of the evolutionary game, in `0..num_strategies`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyId(pub u32);

impl StrategyId {
    /// The strategy id as a slice index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StrategyId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Counter for unique [`StructureInstanceId`] allocation.
static STRUCTURE_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a population structure.
///
/// Allocated from a monotonic atomic counter via
/// [`StructureInstanceId::next`]. Two independently constructed structures
/// always have different IDs, even with identical topology.
///
/// Cloning a structure preserves its instance ID: the clone starts from the
/// same topology. Rewiring a network allocates a fresh ID, since the
/// topology it identified no longer exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructureInstanceId(u64);

impl StructureInstanceId {
    /// Allocate a fresh, unique instance ID. Thread-safe.
    pub fn next() -> Self {
        Self(STRUCTURE_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StructureInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
