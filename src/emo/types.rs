//! Core trait definitions for the optimization engine.
//!
//! [`Chromosome`] encodes a candidate and its operators, and
//! [`FitnessFunction`] scores it. Problems plug into the optimizer only
//! through these two traits.

use rand::Rng;

/// A candidate solution in the population.
///
/// A chromosome carries its own problem-specific state together with the
/// decision vector produced by its most recent evaluation. It holds no
/// rating logic of its own: scores come only from a [`FitnessFunction`].
///
/// # Decision vectors
///
/// The decision vector is an ordered sequence of objective scores with a
/// fixed length per run. **Higher values are better.** A decision vector is
/// only meaningful after [`evaluate`](Chromosome::evaluate) has been called
/// following the last [`mutate`](Chromosome::mutate) or
/// [`crossover`](Chromosome::crossover); the optimizer always evaluates
/// offspring before they can be compared.
///
/// # Equality
///
/// `PartialEq` is used for best-effort de-duplication when offspring are
/// inserted. Comparing the genes alone is sufficient.
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone, PartialEq)]
/// struct Route {
///     stops: Vec<usize>,
///     scores: Vec<f64>,
/// }
///
/// impl Chromosome for Route {
///     fn generate<R: Rng>(&mut self, rng: &mut R) { /* shuffle stops */ }
///     fn mutate<R: Rng>(&mut self, rng: &mut R) { /* swap two stops */ }
///     fn decision_vector(&self) -> &[f64] { &self.scores }
///     fn set_decision_vector(&mut self, scores: Vec<f64>) { self.scores = scores; }
/// }
/// ```
pub trait Chromosome: Clone + PartialEq + Send + Sync {
    /// Fills this chromosome with fresh, possibly randomized, values.
    fn generate<R: Rng>(&mut self, rng: &mut R);

    /// Produces an unrelated, freshly generated instance.
    ///
    /// The default implementation clones `self` and regenerates the clone.
    fn create_new<R: Rng>(&self, rng: &mut R) -> Self {
        let mut fresh = self.clone();
        fresh.generate(rng);
        fresh
    }

    /// Applies a small in-place perturbation.
    fn mutate<R: Rng>(&mut self, rng: &mut R);

    /// Recombines this chromosome in place with `partner`.
    ///
    /// The partner is never modified. The default implementation is a no-op.
    fn crossover<R: Rng>(&mut self, _partner: &Self, _rng: &mut R) {}

    /// Returns the decision vector of the last evaluation.
    fn decision_vector(&self) -> &[f64];

    /// Stores a freshly computed decision vector.
    ///
    /// Called by [`evaluate`](Chromosome::evaluate).
    fn set_decision_vector(&mut self, scores: Vec<f64>);

    /// Recomputes and stores the decision vector.
    fn evaluate<F>(&mut self, fitness: &F)
    where
        F: FitnessFunction<Self> + ?Sized,
    {
        let scores = fitness.evaluate(self);
        self.set_decision_vector(scores);
    }
}

/// Rates a chromosome on one or more objectives.
///
/// Returns one score per objective, higher being better. Implementations
/// should be deterministic for identical chromosome state; any noise is the
/// implementation's own concern.
///
/// # Thread Safety
///
/// `FitnessFunction` must be `Send + Sync` because the optimizer may
/// evaluate offspring on several worker lanes at once.
///
/// Closures of type `Fn(&C) -> Vec<f64>` implement this trait directly.
pub trait FitnessFunction<C>: Send + Sync {
    /// Evaluates `chromosome` and returns its decision vector.
    fn evaluate(&self, chromosome: &C) -> Vec<f64>;
}

impl<C, F> FitnessFunction<C> for F
where
    F: Fn(&C) -> Vec<f64> + Send + Sync,
{
    fn evaluate(&self, chromosome: &C) -> Vec<f64> {
        self(chromosome)
    }
}
