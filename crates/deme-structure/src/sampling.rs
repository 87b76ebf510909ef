//! Neighbour sampling modes.

use deme_core::{NodeId, StrategyId, StructureError};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// How a neighbour is drawn from a node's neighbourhood.
///
/// [`Uniform`](Self::Uniform) is the default and the mode every update rule
/// can rely on. The other modes are opt-in for drivers that want them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Every neighbour is equally likely.
    #[default]
    Uniform,
    /// Neighbour `j` is drawn with probability proportional to its degree.
    DegreeWeighted,
    /// Uniform over neighbours whose strategy differs from the focal node's.
    DifferentStrategy,
}

/// Draw uniformly from an explicit neighbour list.
#[inline]
pub(crate) fn uniform(
    node: NodeId,
    neighbours: &[NodeId],
    rng: &mut dyn RngCore,
) -> Result<NodeId, StructureError> {
    if neighbours.is_empty() {
        return Err(StructureError::EmptyNeighbourhood { node });
    }
    Ok(neighbours[rng.gen_range(0..neighbours.len())])
}

/// Draw from `neighbours` with probability proportional to `weight(j)`.
///
/// One pass to total the weights, one cumulative pass to locate the draw.
pub(crate) fn weighted(
    node: NodeId,
    neighbours: &[NodeId],
    weight: impl Fn(NodeId) -> u64,
    rng: &mut dyn RngCore,
) -> Result<NodeId, StructureError> {
    let total: u64 = neighbours.iter().map(|&j| weight(j)).sum();
    if total == 0 {
        return Err(StructureError::EmptyNeighbourhood { node });
    }
    let mut target = rng.gen_range(0..total);
    for &j in neighbours {
        let w = weight(j);
        if target < w {
            return Ok(j);
        }
        target -= w;
    }
    // The cumulative weights cover 0..total, so the loop always returns.
    Err(StructureError::EmptyNeighbourhood { node })
}

/// Draw uniformly from the neighbours whose strategy is not `focal`.
pub(crate) fn different_strategy(
    node: NodeId,
    neighbours: &[NodeId],
    focal: StrategyId,
    strategies: &[StrategyId],
    rng: &mut dyn RngCore,
) -> Result<NodeId, StructureError> {
    let differs = |j: &&NodeId| strategies[j.index()] != focal;
    let eligible = neighbours.iter().filter(differs).count();
    if eligible == 0 {
        return Err(StructureError::EmptyNeighbourhood { node });
    }
    let pick = rng.gen_range(0..eligible);
    neighbours
        .iter()
        .filter(differs)
        .nth(pick)
        .copied()
        .ok_or(StructureError::EmptyNeighbourhood { node })
}
