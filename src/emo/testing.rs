//! Shared fixtures for unit tests.

use super::types::Chromosome;
use rand::Rng;
use std::sync::Arc;

/// Real-valued point in `[0, 1]^n`.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub genes: Vec<f64>,
    pub scores: Vec<f64>,
}

impl Point {
    pub fn new(genes: Vec<f64>) -> Self {
        Self {
            genes,
            scores: Vec::new(),
        }
    }

    /// A point whose decision vector is fixed up front; genes mirror the
    /// scores so equal scores mean equal points.
    pub fn scored(scores: Vec<f64>) -> Self {
        Self {
            genes: scores.clone(),
            scores,
        }
    }
}

impl Chromosome for Point {
    fn generate<R: Rng>(&mut self, rng: &mut R) {
        for g in &mut self.genes {
            *g = rng.random_range(0.0..1.0);
        }
    }

    fn mutate<R: Rng>(&mut self, rng: &mut R) {
        let idx = rng.random_range(0..self.genes.len());
        let step: f64 = rng.random_range(-0.1..0.1);
        self.genes[idx] = (self.genes[idx] + step).clamp(0.0, 1.0);
    }

    fn crossover<R: Rng>(&mut self, partner: &Self, rng: &mut R) {
        let point = rng.random_range(0..self.genes.len());
        self.genes[point..].copy_from_slice(&partner.genes[point..]);
    }

    fn decision_vector(&self) -> &[f64] {
        &self.scores
    }

    fn set_decision_vector(&mut self, scores: Vec<f64>) {
        self.scores = scores;
    }
}

/// Two conflicting objectives, both strictly positive on `[0, 1]^n`.
pub fn two_objectives(p: &Point) -> Vec<f64> {
    let x = p.genes[0];
    let rest: f64 = p.genes[1..].iter().sum::<f64>() / p.genes.len().max(1) as f64;
    vec![1.0 + x - 0.5 * rest, 2.0 - x * x - 0.5 * rest]
}

/// Single objective: larger gene sum is better, offset to stay positive.
pub fn gene_sum(p: &Point) -> Vec<f64> {
    vec![1.0 + p.genes.iter().sum::<f64>()]
}

pub fn population(scores: &[Vec<f64>]) -> Vec<Arc<Point>> {
    scores
        .iter()
        .map(|s| Arc::new(Point::scored(s.clone())))
        .collect()
}

pub fn scores_of(population: &[Arc<Point>]) -> Vec<Vec<f64>> {
    population.iter().map(|p| p.scores.clone()).collect()
}
