//! Evolutionary multi-objective optimization.
//!
//! A generic, problem-agnostic epoch loop built on trait-based
//! abstractions. Users describe their problem by implementing
//! [`Chromosome`] (encoding and operators) and [`FitnessFunction`]
//! (evaluation), then pick a [`Selection`] strategy.
//!
//! # Core Traits
//!
//! - [`Chromosome`]: A candidate solution with its decision vector
//! - [`FitnessFunction`]: Computes the decision vector of a chromosome
//! - [`Selection`]: Chooses the survivors of an epoch
//!
//! # Key Types
//!
//! - [`EmoConfig`]: Run-time tunables (population size, rates, parallelism)
//! - [`Optimizer`]: Owns the population and runs epochs
//! - [`EpochStats`]: Per-epoch summary
//!
//! # Submodules
//!
//! - [`dominance`]: Pareto dominance between decision vectors
//! - [`population`]: Membership, range and partition helpers
//!
//! # References
//!
//! - Deb (2001), *Multi-Objective Optimization using Evolutionary Algorithms*
//! - Zitzler & Thiele (1999), "Multiobjective Evolutionary Algorithms: A
//!   Comparative Case Study and the Strength Pareto Approach"

mod config;
pub mod dominance;
mod optimizer;
pub mod population;
mod selection;
mod types;

#[cfg(test)]
mod testing;

pub use config::EmoConfig;
pub use optimizer::{EpochStats, Optimizer, OptimizerBuilder};
pub use selection::{
    EliteSelection, MultiCriterionSelection, Selection, SingleCriterionSelection, SurvivorPool,
};
pub use types::{Chromosome, FitnessFunction};
