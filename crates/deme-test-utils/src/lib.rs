//! Test utilities and mock types for Deme development.
//!
//! Provides standard structure [`fixtures`] and a [`MockDriver`] that
//! exercises the query/mutation contract of [`PopulationStructure`] the way
//! a simulation driver would: pick a node, sample a neighbour, copy its
//! strategy. No payoffs are involved.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use deme_core::{NodeId, StrategyId, StructureError};
use deme_structure::PopulationStructure;
use rand::{Rng, RngCore};

/// One imitation event applied by [`MockDriver::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Imitation {
    pub focal: NodeId,
    pub model: NodeId,
    pub from: StrategyId,
    pub to: StrategyId,
}

/// Voter-model driver over any `dyn PopulationStructure`.
///
/// Each step draws a focal node uniformly, samples one of its neighbours
/// with the structure's configured sampling mode, and copies the
/// neighbour's strategy onto the focal node. A focal node with no eligible
/// neighbour is counted and skipped.
#[derive(Debug, Default)]
pub struct MockDriver {
    steps: u64,
    imitations: u64,
    skipped: u64,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Steps that changed a node's strategy.
    pub fn imitations(&self) -> u64 {
        self.imitations
    }

    /// Steps skipped because the focal node had no eligible neighbour.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Perform one update. Returns the imitation applied, if the focal
    /// node's strategy changed.
    pub fn step(
        &mut self,
        structure: &mut dyn PopulationStructure,
        rng: &mut dyn RngCore,
    ) -> Result<Option<Imitation>, StructureError> {
        self.steps += 1;
        let focal = NodeId(rng.gen_range(0..structure.population_size() as u32));
        let model = match structure.sample_neighbour(focal, rng) {
            Ok(j) => j,
            Err(StructureError::EmptyNeighbourhood { .. }) => {
                self.skipped += 1;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let from = structure.strategy_of(focal)?;
        let to = structure.strategy_of(model)?;
        if from == to {
            return Ok(None);
        }
        structure.set_strategy(focal, to)?;
        self.imitations += 1;
        Ok(Some(Imitation {
            focal,
            model,
            from,
            to,
        }))
    }

    /// Run `steps` updates, stopping early once the population is
    /// monomorphic. Returns the number of steps taken.
    pub fn run(
        &mut self,
        structure: &mut dyn PopulationStructure,
        steps: u64,
        rng: &mut dyn RngCore,
    ) -> Result<u64, StructureError> {
        for taken in 0..steps {
            if is_fixated(structure) {
                return Ok(taken);
            }
            self.step(structure, rng)?;
        }
        Ok(steps)
    }
}

/// `true` if every node plays the same strategy.
pub fn is_fixated(structure: &dyn PopulationStructure) -> bool {
    let n = structure.population_size() as u64;
    structure.strategy_counts().iter().any(|(_, c)| c == n)
}
