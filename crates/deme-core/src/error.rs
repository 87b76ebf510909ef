//! Error types for population structure construction and updates.

use crate::id::{NodeId, StrategyId};
use std::error::Error;
use std::fmt;

/// Errors arising from structure construction, queries, and updates.
///
/// Every operation either succeeds or fails without mutating the structure,
/// so callers may retry with corrected input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructureError {
    /// A node id is outside `0..population_size`.
    OutOfRange {
        /// The offending node.
        node: NodeId,
        /// Number of nodes in the structure.
        population_size: usize,
    },
    /// A strategy id is outside `0..num_strategies`.
    InvalidStrategy {
        /// The offending strategy.
        strategy: StrategyId,
        /// Number of strategies in the game.
        num_strategies: usize,
    },
    /// Graph construction input is malformed or cannot yield a valid graph.
    InvalidTopology {
        /// What went wrong.
        reason: String,
    },
    /// Attempted to sample from a node without any eligible neighbour.
    EmptyNeighbourhood {
        /// The focal node.
        node: NodeId,
    },
    /// An initial strategy assignment is inconsistent with the structure.
    InvalidState {
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                node,
                population_size,
            } => {
                write!(
                    f,
                    "node {node} out of range for population of {population_size}"
                )
            }
            Self::InvalidStrategy {
                strategy,
                num_strategies,
            } => {
                write!(
                    f,
                    "strategy {strategy} out of range for {num_strategies} strategies"
                )
            }
            Self::InvalidTopology { reason } => write!(f, "invalid topology: {reason}"),
            Self::EmptyNeighbourhood { node } => {
                write!(f, "node {node} has no eligible neighbours")
            }
            Self::InvalidState { reason } => write!(f, "invalid strategy state: {reason}"),
        }
    }
}

impl Error for StructureError {}

/// Check that `node` is a valid id for a population of `population_size`.
pub fn check_node(node: NodeId, population_size: usize) -> Result<(), StructureError> {
    if node.index() < population_size {
        Ok(())
    } else {
        Err(StructureError::OutOfRange {
            node,
            population_size,
        })
    }
}

/// Check that `strategy` is a valid id for a game with `num_strategies`.
pub fn check_strategy(strategy: StrategyId, num_strategies: usize) -> Result<(), StructureError> {
    if strategy.index() < num_strategies {
        Ok(())
    } else {
        Err(StructureError::InvalidStrategy {
            strategy,
            num_strategies,
        })
    }
}

/// Build an [`StructureError::InvalidTopology`] from any message.
pub fn invalid_topology(reason: impl Into<String>) -> StructureError {
    StructureError::InvalidTopology {
        reason: reason.into(),
    }
}

/// Build an [`StructureError::InvalidState`] from any message.
pub fn invalid_state(reason: impl Into<String>) -> StructureError {
    StructureError::InvalidState {
        reason: reason.into(),
    }
}
