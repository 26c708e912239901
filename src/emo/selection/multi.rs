//! Multi-criterion non-dominated filtering.

use super::{all_positive, Selection, SurvivorPool};
use crate::emo::dominance::is_dominated_in_population;
use crate::emo::population::{clamp_range, push_unique};
use crate::emo::types::Chromosome;
use crate::error::Result;
use std::sync::Arc;

/// Keeps the Pareto front of the whole population.
///
/// A candidate in the assigned range survives iff every objective is
/// strictly positive and no other member of the *full* old population
/// dominates it. Duplicates within the range are kept once. The batch is
/// appended to the pool in range order.
///
/// The number of survivors is the size of the current front and is not
/// bounded by the target population size.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiCriterionSelection;

impl<C: Chromosome> Selection<C> for MultiCriterionSelection {
    fn select(
        &self,
        old_population: &[Arc<C>],
        start: usize,
        length: usize,
        survivors: &SurvivorPool<C>,
    ) -> Result<()> {
        let range = clamp_range(start, length, old_population.len());

        let mut batch = Vec::with_capacity(range.len());
        for candidate in &old_population[range] {
            if !all_positive(candidate.as_ref()) {
                continue;
            }
            if is_dominated_in_population(candidate.as_ref(), old_population)? {
                continue;
            }
            push_unique(&mut batch, Arc::clone(candidate));
        }

        survivors.extend(batch);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "multi-criterion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emo::testing::{population, scores_of, Point};

    fn run(pop: &[Arc<Point>], start: usize, length: usize) -> Vec<Vec<f64>> {
        let pool = SurvivorPool::with_capacity(pop.len());
        MultiCriterionSelection
            .select(pop, start, length, &pool)
            .unwrap();
        scores_of(&pool.into_inner())
    }

    #[test]
    fn test_keeps_front_only() {
        let pop = population(&[
            vec![1.0, 5.0], // front
            vec![3.0, 3.0], // front
            vec![5.0, 1.0], // front
            vec![2.0, 2.0], // dominated by (3,3)
        ]);
        assert_eq!(
            run(&pop, 0, 4),
            vec![vec![1.0, 5.0], vec![3.0, 3.0], vec![5.0, 1.0]]
        );
    }

    #[test]
    fn test_non_positive_components_are_rejected() {
        let pop = population(&[vec![6.0, 0.0], vec![1.0, 1.0], vec![-1.0, 9.0]]);
        // (6,0) and (-1,9) are not dominated, but are not strictly positive
        assert_eq!(run(&pop, 0, 3), vec![vec![1.0, 1.0]]);
    }

    #[test]
    fn test_dominance_checked_against_full_population() {
        let pop = population(&[vec![9.0, 9.0], vec![2.0, 2.0], vec![3.0, 1.0]]);
        // Range covers only the last two, but (9,9) outside the range dominates them
        assert!(run(&pop, 1, 2).is_empty());
    }

    #[test]
    fn test_duplicates_within_range_kept_once() {
        let pop = population(&[vec![2.0, 2.0], vec![2.0, 2.0], vec![1.0, 3.0]]);
        assert_eq!(run(&pop, 0, 3), vec![vec![2.0, 2.0], vec![1.0, 3.0]]);
    }

    #[test]
    fn test_disjoint_ranges_union_to_front() {
        let pop = population(&[
            vec![1.0, 5.0],
            vec![0.5, 0.5],
            vec![3.0, 3.0],
            vec![5.0, 1.0],
        ]);
        let pool = SurvivorPool::with_capacity(4);
        MultiCriterionSelection.select(&pop, 0, 2, &pool).unwrap();
        MultiCriterionSelection.select(&pop, 2, 2, &pool).unwrap();
        assert_eq!(
            scores_of(&pool.into_inner()),
            vec![vec![1.0, 5.0], vec![3.0, 3.0], vec![5.0, 1.0]]
        );
    }

    #[test]
    fn test_mismatched_vectors_fail() {
        let pop = vec![
            Arc::new(Point::scored(vec![1.0, 1.0])),
            Arc::new(Point::scored(vec![2.0])),
        ];
        let pool = SurvivorPool::with_capacity(2);
        assert!(MultiCriterionSelection.select(&pop, 0, 2, &pool).is_err());
    }

    #[test]
    fn test_empty_range() {
        let pop = population(&[vec![1.0, 1.0]]);
        assert!(run(&pop, 1, 0).is_empty());
    }
}
