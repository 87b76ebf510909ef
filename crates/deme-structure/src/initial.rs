//! Initial strategy assignment rules.

use deme_core::error::{check_strategy, invalid_state};
use deme_core::{StrategyCounts, StrategyId, StructureError};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// How strategies are assigned to nodes when a structure is constructed.
///
/// # Examples
///
/// ```
/// use deme_core::StrategyId;
/// use deme_structure::InitialStrategies;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let assignment = InitialStrategies::Counts(vec![3, 1])
///     .resolve(4, 2, &mut rng)
///     .unwrap();
/// assert_eq!(assignment.iter().filter(|&&s| s == StrategyId(1)).count(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialStrategies {
    /// One strategy per node, indexed by node id.
    Explicit(Vec<StrategyId>),
    /// Each node draws its strategy independently and uniformly.
    Uniform,
    /// Exactly `counts[s]` nodes on strategy `s`, at shuffled positions.
    Counts(Vec<u64>),
    /// Every node plays the same strategy.
    Monomorphic(StrategyId),
}

impl Default for InitialStrategies {
    fn default() -> Self {
        Self::Monomorphic(StrategyId(0))
    }
}

impl InitialStrategies {
    /// Produce the per-node assignment for a population of
    /// `population_size` nodes and `num_strategies` strategies.
    ///
    /// Only [`Uniform`](Self::Uniform) and [`Counts`](Self::Counts) draw
    /// from `rng`.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if `num_strategies == 0`, an explicit assignment has
    ///   the wrong length, or counts do not match the population
    /// - `InvalidStrategy` if a named strategy is outside `0..num_strategies`
    pub fn resolve(
        &self,
        population_size: usize,
        num_strategies: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<StrategyId>, StructureError> {
        if num_strategies == 0 {
            return Err(invalid_state("at least one strategy is required"));
        }
        if num_strategies > u32::MAX as usize {
            return Err(invalid_state(format!(
                "{num_strategies} strategies exceed the supported maximum of {}",
                u32::MAX
            )));
        }
        match self {
            Self::Explicit(assignment) => {
                if assignment.len() != population_size {
                    return Err(invalid_state(format!(
                        "explicit assignment has {} entries for a population of {population_size}",
                        assignment.len()
                    )));
                }
                for &s in assignment {
                    check_strategy(s, num_strategies)?;
                }
                Ok(assignment.clone())
            }
            Self::Uniform => Ok(uniform_assignment(population_size, num_strategies, rng).0),
            Self::Counts(counts) => {
                shuffled_assignment(population_size, num_strategies, counts, rng)
            }
            Self::Monomorphic(s) => {
                check_strategy(*s, num_strategies)?;
                Ok(vec![*s; population_size])
            }
        }
    }
}

/// Draw `population_size` strategies uniformly from `0..num_strategies`,
/// tallying as it goes.
pub(crate) fn uniform_assignment(
    population_size: usize,
    num_strategies: usize,
    rng: &mut dyn RngCore,
) -> (Vec<StrategyId>, StrategyCounts) {
    let mut tally = vec![0u64; num_strategies];
    let assignment = (0..population_size)
        .map(|_| {
            let s = rng.gen_range(0..num_strategies as u32);
            tally[s as usize] += 1;
            StrategyId(s)
        })
        .collect();
    (assignment, StrategyCounts::from(tally))
}

/// Lay out `counts[s]` copies of each strategy and shuffle them.
pub(crate) fn shuffled_assignment(
    population_size: usize,
    num_strategies: usize,
    counts: &[u64],
    rng: &mut dyn RngCore,
) -> Result<Vec<StrategyId>, StructureError> {
    if counts.len() != num_strategies {
        return Err(invalid_state(format!(
            "got {} counts for {num_strategies} strategies",
            counts.len()
        )));
    }
    let total = counts
        .iter()
        .try_fold(0u64, |acc, &c| acc.checked_add(c))
        .ok_or_else(|| invalid_state("counts overflow"))?;
    if total != population_size as u64 {
        return Err(invalid_state(format!(
            "counts sum to {total}, population size is {population_size}"
        )));
    }
    let mut assignment = Vec::with_capacity(population_size);
    for (s, &c) in counts.iter().enumerate() {
        assignment.extend(std::iter::repeat(StrategyId(s as u32)).take(c as usize));
    }
    assignment.shuffle(rng);
    Ok(assignment)
}
