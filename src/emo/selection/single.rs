//! Single-criterion ranking selection.

use super::{objective, Selection, SurvivorPool};
use crate::emo::population::{clamp_range, contains};
use crate::emo::types::Chromosome;
use crate::error::Result;
use std::sync::Arc;

/// Ranks candidates by their first objective, best first.
///
/// Within the assigned range, candidates are stable-sorted by the first
/// objective descending and appended in that order, skipping any already in
/// the pool. The first candidate scoring exactly zero ends the range: a zero
/// score marks an unevaluated or invalid candidate, and everything ranked
/// after it is dropped too. Candidates scoring NaN are never selected.
///
/// When selection runs on a single lane the resulting population is sorted,
/// so [`Optimizer::best_chromosome`](crate::emo::Optimizer::best_chromosome)
/// is the best candidate by this criterion.
///
/// # Example
///
/// ```
/// use u_evomo::emo::{Selection, SingleCriterionSelection, SurvivorPool};
/// # use u_evomo::emo::Chromosome;
/// # use rand::Rng;
/// # use std::sync::Arc;
/// # #[derive(Clone, PartialEq)]
/// # struct Score(Vec<f64>);
/// # impl Chromosome for Score {
/// #     fn generate<R: Rng>(&mut self, _: &mut R) {}
/// #     fn mutate<R: Rng>(&mut self, _: &mut R) {}
/// #     fn decision_vector(&self) -> &[f64] { &self.0 }
/// #     fn set_decision_vector(&mut self, s: Vec<f64>) { self.0 = s; }
/// # }
///
/// let old: Vec<Arc<Score>> = [5.0, 3.0, 0.0, 8.0]
///     .iter()
///     .map(|&s| Arc::new(Score(vec![s])))
///     .collect();
///
/// let pool: SurvivorPool<Score> = SurvivorPool::with_capacity(4);
/// SingleCriterionSelection
///     .select(old.as_slice(), 0, old.len(), &pool)
///     .unwrap();
///
/// let firsts: Vec<f64> = pool.into_inner().iter().map(|c| c.0[0]).collect();
/// assert_eq!(firsts, vec![8.0, 5.0, 3.0]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleCriterionSelection;

impl<C: Chromosome> Selection<C> for SingleCriterionSelection {
    fn select(
        &self,
        old_population: &[Arc<C>],
        start: usize,
        length: usize,
        survivors: &SurvivorPool<C>,
    ) -> Result<()> {
        let range = clamp_range(start, length, old_population.len());

        let mut ranked = old_population[range]
            .iter()
            .map(|c| -> Result<(f64, &Arc<C>)> { Ok((objective(c.as_ref(), 0)?, c)) })
            .collect::<Result<Vec<_>>>()?;

        // NaN has no rank; stable sort keeps original order among equal scores
        ranked.retain(|(score, _)| !score.is_nan());
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        survivors.with_locked(|pool| {
            for (score, candidate) in ranked {
                if score == 0.0 {
                    break;
                }
                if !contains(pool, candidate) {
                    pool.push(Arc::clone(candidate));
                }
            }
        });

        Ok(())
    }

    fn name(&self) -> &'static str {
        "single-criterion"
    }
}
