//! Pareto dominance between decision vectors.
//!
//! All objectives are **maximized**: higher values are better. Vectors of
//! different length cannot be compared and yield
//! [`EmoError::DimensionMismatch`].
//!
//! # Example
//!
//! ```
//! use u_evomo::emo::dominance::{compare, is_dominated, Dominance};
//!
//! let a = [3.0, 3.0];
//! let b = [4.0, 3.0];
//!
//! assert!(is_dominated(&a, &b).unwrap());
//! assert!(!is_dominated(&b, &a).unwrap());
//! assert_eq!(compare(&a, &b).unwrap(), Dominance::Right);
//! ```
//!
//! # References
//!
//! - Deb (2001), *Multi-Objective Optimization using Evolutionary Algorithms*

use super::types::Chromosome;
use crate::error::{EmoError, Result};
use std::sync::Arc;

/// Dominance relation between two decision vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other (equal or mutually non-dominated).
    Neither,
}

/// Compares two decision vectors for Pareto dominance (maximization).
pub fn compare(left: &[f64], right: &[f64]) -> Result<Dominance> {
    if left.len() != right.len() {
        return Err(EmoError::DimensionMismatch {
            expected: left.len(),
            found: right.len(),
        });
    }

    let mut left_better_in_some = false;
    let mut right_better_in_some = false;

    for (&l, &r) in left.iter().zip(right.iter()) {
        if l > r {
            left_better_in_some = true;
        } else if r > l {
            right_better_in_some = true;
        }
    }

    Ok(match (left_better_in_some, right_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    })
}

/// Returns `true` iff `subject` is Pareto-dominated by `other`.
///
/// `other` must be at least as good in every objective and strictly
/// better in at least one. Equal vectors dominate nothing.
pub fn is_dominated(subject: &[f64], other: &[f64]) -> Result<bool> {
    Ok(compare(subject, other)? == Dominance::Right)
}

/// Returns `true` iff any member of `population` other than `subject`
/// itself dominates it.
///
/// Members are skipped by identity, not equality: a structurally equal
/// copy is still compared (and, having an equal vector, never dominates).
pub fn is_dominated_in_population<C: Chromosome>(
    subject: &C,
    population: &[Arc<C>],
) -> Result<bool> {
    let scores = subject.decision_vector();
    for other in population {
        if std::ptr::eq(subject, other.as_ref()) {
            continue;
        }
        if is_dominated(scores, other.decision_vector())? {
            return Ok(true);
        }
    }
    Ok(false)
}
