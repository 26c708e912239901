//! Evolutionary multi-objective optimization engine.
//!
//! Given an ancestor chromosome, a fitness function and a selection
//! policy, the [`emo::Optimizer`] grows a population by mutation and
//! crossover, then curates it with a pluggable
//! [`Selection`](emo::Selection) strategy, epoch after epoch.
//!
//! - **Dominance**: Pareto dominance between decision vectors, where
//!   higher objective values are better.
//! - **Selection**: single-criterion ranking, multi-criterion
//!   non-dominated filtering, and a size-capped elite archive.
//! - **Optimizer**: the epoch loop with optional multi-core fan-out on a
//!   rayon worker pool.
//!
//! # Architecture
//!
//! The crate contains no problem-specific concepts. Encodings, operators
//! and evaluation are supplied by consumers through the
//! [`Chromosome`](emo::Chromosome) and
//! [`FitnessFunction`](emo::FitnessFunction) traits.

pub mod emo;
pub mod error;

pub use error::{EmoError, Result};
