//! Selection strategies for the optimizer.
//!
//! Selection curates the enlarged population at the end of every epoch.
//! A strategy is handed one index range of the old population per call,
//! possibly from several worker lanes at once over disjoint ranges, and
//! contributes its survivors to a shared [`SurvivorPool`].
//!
//! # Strategies
//!
//! - [`SingleCriterionSelection`]: rank by the first objective, cut at the
//!   first zero score
//! - [`MultiCriterionSelection`]: keep positive, non-dominated candidates
//! - [`EliteSelection`]: accumulate a size-capped archive of non-dominated
//!   candidates across epochs

mod elite;
mod multi;
mod single;

pub use elite::EliteSelection;
pub use multi::MultiCriterionSelection;
pub use single::SingleCriterionSelection;

use super::population::{contains, push_unique};
use super::types::Chromosome;
use crate::error::{EmoError, Result};
use std::sync::{Arc, Mutex, MutexGuard};

/// A pluggable survivor policy.
///
/// # Contract
///
/// - `old_population` is read-only; implementations must not assume they
///   see the whole population in one call.
/// - Only `start..start + length` (clamped to the population bound) is
///   considered for survival. An empty range contributes nothing.
/// - Survivors are appended to `survivors`, which is shared between all
///   concurrent calls of one selection phase.
/// - Returning signals completion. Any state carried between epochs must
///   be guarded by the strategy itself.
pub trait Selection<C: Chromosome>: Send + Sync {
    /// Selects survivors from `old_population[start..start + length]`.
    fn select(
        &self,
        old_population: &[Arc<C>],
        start: usize,
        length: usize,
        survivors: &SurvivorPool<C>,
    ) -> Result<()>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

impl<C: Chromosome, S: Selection<C> + ?Sized> Selection<C> for Arc<S> {
    fn select(
        &self,
        old_population: &[Arc<C>],
        start: usize,
        length: usize,
        survivors: &SurvivorPool<C>,
    ) -> Result<()> {
        (**self).select(old_population, start, length, survivors)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// The next population under construction during a selection phase.
///
/// Appends are serialized; filtering happens outside the lock.
#[derive(Debug)]
pub struct SurvivorPool<C> {
    members: Mutex<Vec<Arc<C>>>,
}

impl<C: PartialEq> SurvivorPool<C> {
    /// Creates an empty pool with room for `capacity` survivors.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Appends all candidates as they are.
    pub fn extend<I>(&self, candidates: I)
    where
        I: IntoIterator<Item = Arc<C>>,
    {
        self.lock().extend(candidates);
    }

    /// Appends candidates not already in the pool.
    pub fn extend_unique<I>(&self, candidates: I)
    where
        I: IntoIterator<Item = Arc<C>>,
    {
        let mut members = self.lock();
        for candidate in candidates {
            push_unique(&mut members, candidate);
        }
    }

    /// Runs `f` with exclusive access to the pool.
    pub fn with_locked<T>(&self, f: impl FnOnce(&mut Vec<Arc<C>>) -> T) -> T {
        f(&mut self.lock())
    }

    /// Returns `true` if the pool holds `candidate`.
    pub fn contains(&self, candidate: &Arc<C>) -> bool {
        contains(&self.lock(), candidate)
    }

    /// Current number of survivors.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no survivor has been added yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Consumes the pool, returning the survivors in append order.
    pub fn into_inner(self) -> Vec<Arc<C>> {
        self.members
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<C>>> {
        self.members
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Reads objective `index` of a chromosome's decision vector.
pub(crate) fn objective<C: Chromosome>(chromosome: &C, index: usize) -> Result<f64> {
    let scores = chromosome.decision_vector();
    scores
        .get(index)
        .copied()
        .ok_or(EmoError::MissingObjective {
            index,
            len: scores.len(),
        })
}

/// Returns `true` if every objective is strictly positive.
pub(crate) fn all_positive<C: Chromosome>(chromosome: &C) -> bool {
    chromosome.decision_vector().iter().all(|&s| s > 0.0)
}
