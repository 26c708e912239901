//! Optimizer configuration.
//!
//! [`EmoConfig`] holds the run-time tunables of the epoch loop.

/// Configuration for the [`Optimizer`](super::Optimizer).
///
/// # Defaults
///
/// ```
/// use u_evomo::emo::EmoConfig;
///
/// let config = EmoConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert!((config.mutation_rate - 0.08).abs() < 1e-12);
/// assert_eq!(config.crossover_rate, 0.0);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evomo::emo::EmoConfig;
///
/// let config = EmoConfig::default()
///     .with_population_size(60)
///     .with_crossover_rate(0.2)
///     .with_parallel(true)
///     .with_seed(7);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmoConfig {
    /// Target number of chromosomes in the population.
    ///
    /// Fixed once the optimizer is built. The population may grow past it
    /// during an epoch before selection shrinks it again.
    pub population_size: usize,

    /// Fraction of the population cloned and mutated per growth round
    /// (0.0–1.0). At least one mutation is always performed.
    pub mutation_rate: f64,

    /// Fraction of the population recombined per growth round (0.0–1.0).
    ///
    /// Zero disables crossover entirely.
    pub crossover_rate: f64,

    /// Whether to fan growth rounds and selection out over worker lanes.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Number of worker lanes in a dedicated pool.
    ///
    /// `None` uses the global rayon pool, sized to hardware parallelism.
    pub worker_lanes: Option<usize>,
}

impl Default for EmoConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            mutation_rate: 0.08,
            crossover_rate: 0.0,
            parallel: false,
            seed: None,
            worker_lanes: None,
        }
    }
}

impl EmoConfig {
    /// Sets the target population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Runs parallel phases on a dedicated pool of `n` lanes (at least one).
    pub fn with_worker_lanes(mut self, n: usize) -> Self {
        self.worker_lanes = Some(n.max(1));
        self
    }

    /// Number of mutations for a population of `current` chromosomes.
    pub(crate) fn mutation_count(&self, current: usize) -> usize {
        ((current as f64 * self.mutation_rate).floor() as usize).max(1)
    }

    /// Number of crossovers for a population of `current` chromosomes.
    pub(crate) fn crossover_count(&self, current: usize) -> usize {
        (current as f64 * self.crossover_rate).floor() as usize
    }
}
