//! Population helpers shared by the optimizer and selection strategies.
//!
//! A population is an ordered `Vec<Arc<C>>`. Handles make survivors,
//! archive entries and resampled duplicates cheap to share; membership is
//! tested by handle identity first and structural equality second.

use std::ops::Range;
use std::sync::Arc;

/// Returns `true` if `population` already holds `candidate`, either the
/// same handle or a structurally equal chromosome.
pub fn contains<C: PartialEq>(population: &[Arc<C>], candidate: &Arc<C>) -> bool {
    population
        .iter()
        .any(|member| Arc::ptr_eq(member, candidate) || **member == **candidate)
}

/// Appends `candidate` unless it is already present. Returns whether it
/// was inserted.
pub fn push_unique<C: PartialEq>(population: &mut Vec<Arc<C>>, candidate: Arc<C>) -> bool {
    if contains(population, &candidate) {
        return false;
    }
    population.push(candidate);
    true
}

/// Resolves `start..start + length` against a population of `len`
/// members, clamping both ends to the population bound.
pub fn clamp_range(start: usize, length: usize, len: usize) -> Range<usize> {
    let start = start.min(len);
    let end = start.saturating_add(length).min(len);
    start..end
}

/// Splits `0..total` into `lanes` contiguous, near-equal chunks.
///
/// The first `total % lanes` chunks are one longer than the rest. With
/// `lanes > total` the trailing chunks are empty.
pub fn partition(total: usize, lanes: usize) -> Vec<Range<usize>> {
    let lanes = lanes.max(1);
    let base = total / lanes;
    let extra = total % lanes;

    let mut chunks = Vec::with_capacity(lanes);
    let mut start = 0;
    for lane in 0..lanes {
        let len = base + usize::from(lane < extra);
        chunks.push(start..start + len);
        start += len;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emo::testing::Point;

    #[test]
    fn test_contains_by_identity_and_equality() {
        let a = Arc::new(Point::scored(vec![1.0]));
        let b = Arc::new(Point::scored(vec![2.0]));
        let pop = vec![Arc::clone(&a)];

        assert!(contains(&pop, &a));
        assert!(contains(&pop, &Arc::new(Point::scored(vec![1.0]))));
        assert!(!contains(&pop, &b));
    }

    #[test]
    fn test_push_unique_skips_duplicates() {
        let mut pop = Vec::new();
        assert!(push_unique(&mut pop, Arc::new(Point::scored(vec![1.0]))));
        assert!(!push_unique(&mut pop, Arc::new(Point::scored(vec![1.0]))));
        assert!(push_unique(&mut pop, Arc::new(Point::scored(vec![2.0]))));
        assert_eq!(pop.len(), 2);
    }

    #[test]
    fn test_clamp_range() {
        assert_eq!(clamp_range(0, 4, 10), 0..4);
        assert_eq!(clamp_range(8, 5, 10), 8..10);
        assert_eq!(clamp_range(12, 5, 10), 10..10);
        assert_eq!(clamp_range(3, usize::MAX, 10), 3..10);
        assert!(clamp_range(0, 0, 10).is_empty());
    }

    #[test]
    fn test_partition_even() {
        assert_eq!(partition(8, 4), vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn test_partition_uneven_covers_everything() {
        let chunks = partition(10, 3);
        assert_eq!(chunks, vec![0..4, 4..7, 7..10]);
        let covered: usize = chunks.iter().map(|r| r.len()).sum();
        assert_eq!(covered, 10);
    }

    #[test]
    fn test_partition_more_lanes_than_work() {
        let chunks = partition(2, 4);
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks.iter().map(|r| r.len()).sum::<usize>(), 2);
    }

    #[test]
    fn test_partition_zero_lanes() {
        assert_eq!(partition(5, 0), vec![0..5]);
    }
}
