//! The evolutionary epoch loop.
//!
//! [`Optimizer`] owns the live population and drives each epoch:
//! growth (mutation → crossover, repeated until the population reaches its
//! target size or stops growing) → selection → optional top-up.
//!
//! # Parallel fan-out
//!
//! With [`EmoConfig::parallel`] set, every phase whose unit-of-work count is
//! at least the number of worker lanes is split into one contiguous chunk per
//! lane and run on the rayon pool. The calling thread blocks until all chunks
//! have finished; phases never overlap. Each chunk owns a generator seeded
//! from the optimizer's master generator, so a run is reproducible for a
//! given seed, lane count and parallel flag.
//!
//! Growth rounds read an immutable snapshot of the population; offspring
//! are merged back in chunk order with de-duplication once every chunk has
//! joined. Selection appends into a shared [`SurvivorPool`].
//!
//! There is no timeout: a fitness evaluation that never returns stalls the
//! epoch.

use super::config::EmoConfig;
use super::population::{partition, push_unique};
use super::selection::{Selection, SurvivorPool};
use super::types::{Chromosome, FitnessFunction};
use crate::error::{EmoError, Result};
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Summary of one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochStats {
    /// Zero-based index of the epoch.
    pub epoch: usize,

    /// Number of mutation/crossover iterations of the growth loop.
    pub growth_iterations: usize,

    /// Offspring actually inserted (duplicates excluded).
    pub offspring: usize,

    /// Population size handed to selection.
    pub pre_selection_size: usize,

    /// Survivors produced by the selection strategy.
    pub survivors: usize,

    /// Chromosomes resampled from the pre-selection population to reach
    /// the target size.
    pub resampled: usize,

    /// Population size at the end of the epoch.
    pub population_size: usize,
}

/// Evolutionary optimizer over a population of `C`.
///
/// # Usage
///
/// ```ignore
/// let mut optimizer = Optimizer::builder()
///     .ancestor(MyChromosome::default())
///     .fitness_function(MyFitness)
///     .selection(MultiCriterionSelection)
///     .config(EmoConfig::default().with_population_size(50).with_seed(42))
///     .build()?;
///
/// for _ in 0..100 {
///     optimizer.run_epoch(true)?;
/// }
/// let front = optimizer.population();
/// ```
pub struct Optimizer<C: Chromosome> {
    population: Vec<Arc<C>>,
    config: EmoConfig,
    fitness: Box<dyn FitnessFunction<C>>,
    selection: Box<dyn Selection<C>>,
    rng: StdRng,
    pool: Option<ThreadPool>,
    epoch: usize,
}

impl<C: Chromosome + 'static> Optimizer<C> {
    /// Creates an optimizer with default settings and the given target
    /// population size.
    pub fn new<F, S>(ancestor: C, population_size: usize, fitness: F, selection: S) -> Result<Self>
    where
        F: FitnessFunction<C> + 'static,
        S: Selection<C> + 'static,
    {
        Self::builder()
            .ancestor(ancestor)
            .fitness_function(fitness)
            .selection(selection)
            .config(EmoConfig::default().with_population_size(population_size))
            .build()
    }

    /// Starts a builder.
    pub fn builder() -> OptimizerBuilder<C> {
        OptimizerBuilder::default()
    }

    fn seeded(
        mut ancestor: C,
        config: EmoConfig,
        fitness: Box<dyn FitnessFunction<C>>,
        selection: Box<dyn Selection<C>>,
    ) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let pool = match config.worker_lanes {
            Some(lanes) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(lanes)
                    .thread_name(|i| format!("evomo-lane-{i}"))
                    .build()
                    .map_err(|e| EmoError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };

        ancestor.evaluate(fitness.as_ref());
        let mut population = Vec::with_capacity(config.population_size.max(1));
        population.push(Arc::new(ancestor));
        while population.len() < config.population_size {
            let mut fresh = population[0].create_new(&mut rng);
            fresh.evaluate(fitness.as_ref());
            population.push(Arc::new(fresh));
        }

        debug!(
            "seeded population of {} with {} selection",
            population.len(),
            selection.name()
        );

        Ok(Self {
            population,
            config,
            fitness,
            selection,
            rng,
            pool,
            epoch: 0,
        })
    }

    /// Runs one epoch: grow, select, and optionally top up to the target
    /// size.
    ///
    /// With `enforce_size`, a short selection result is filled by sampling
    /// the pre-selection population uniformly with replacement. A selection
    /// result larger than the target is kept as is.
    ///
    /// # Errors
    ///
    /// Fails with the first error raised by any worker in a phase, after
    /// all workers of that phase have finished. The population is then left
    /// as it was at the failing phase.
    pub fn run_epoch(&mut self, enforce_size: bool) -> Result<EpochStats> {
        let target = self.config.population_size;
        let mut growth_iterations = 0;
        let mut offspring = 0;

        loop {
            let before = self.population.len();
            offspring += self.mutation_round()?;
            offspring += self.crossover_round()?;
            growth_iterations += 1;

            let delta = self.population.len() as isize - before as isize - 1;
            if self.population.len() >= target || delta <= 0 {
                break;
            }
        }

        let pre_selection_size = self.population.len();
        let (survivors, resampled) = self.selection_round(enforce_size)?;

        let stats = EpochStats {
            epoch: self.epoch,
            growth_iterations,
            offspring,
            pre_selection_size,
            survivors,
            resampled,
            population_size: self.population.len(),
        };
        self.epoch += 1;

        debug!(
            "epoch {}: {} offspring over {} iterations, {} -> {} survivors (+{} resampled)",
            stats.epoch,
            stats.offspring,
            stats.growth_iterations,
            stats.pre_selection_size,
            stats.survivors,
            stats.resampled
        );
        Ok(stats)
    }

    /// Runs one epoch enforcing the target population size.
    pub fn run_epoch_default(&mut self) -> Result<EpochStats> {
        self.run_epoch(true)
    }

    /// Runs `epochs` consecutive epochs, stopping at the first error.
    pub fn run_epochs(&mut self, epochs: usize, enforce_size: bool) -> Result<Vec<EpochStats>> {
        (0..epochs).map(|_| self.run_epoch(enforce_size)).collect()
    }

    /// Clones random members, mutates and evaluates the clones, and merges
    /// them into the population. Returns the number inserted.
    fn mutation_round(&mut self) -> Result<usize> {
        if self.population.is_empty() {
            warn!("mutation skipped: population is empty");
            return Ok(0);
        }

        let count = self.config.mutation_count(self.population.len());
        let bound = self.config.population_size.min(self.population.len()).max(1);

        let snapshot = &self.population;
        let fitness = self.fitness.as_ref();
        let batches = fan_out(
            self.config.parallel,
            self.pool.as_ref(),
            &mut self.rng,
            count,
            |range, rng| {
                let mut offspring = Vec::with_capacity(range.len());
                for _ in range {
                    let mut child = C::clone(&snapshot[rng.random_range(0..bound)]);
                    child.mutate(rng);
                    child.evaluate(fitness);
                    offspring.push(Arc::new(child));
                }
                Ok(offspring)
            },
        )?;

        Ok(self.merge(batches))
    }

    /// Recombines clones of random members with a second, distinct member,
    /// evaluates them, and merges them into the population. Returns the
    /// number inserted.
    fn crossover_round(&mut self) -> Result<usize> {
        if self.config.crossover_rate == 0.0 || self.config.population_size <= 2 {
            return Ok(0);
        }

        let len = self.population.len();
        if len < 2 {
            warn!("crossover skipped: {len} chromosome(s) in population");
            return Ok(0);
        }

        let count = self.config.crossover_count(len);
        if count == 0 {
            return Ok(0);
        }

        let snapshot = &self.population;
        let fitness = self.fitness.as_ref();
        let batches = fan_out(
            self.config.parallel,
            self.pool.as_ref(),
            &mut self.rng,
            count,
            |range, rng| {
                let mut offspring = Vec::with_capacity(range.len());
                for _ in range {
                    let first = rng.random_range(0..len);
                    let mut second = rng.random_range(0..len);
                    while second == first {
                        second = rng.random_range(0..len);
                    }

                    let mut child = C::clone(&snapshot[first]);
                    child.crossover(&snapshot[second], rng);
                    child.evaluate(fitness);
                    offspring.push(Arc::new(child));
                }
                Ok(offspring)
            },
        )?;

        Ok(self.merge(batches))
    }

    /// Runs the selection strategy and replaces the population with its
    /// output. Returns `(survivors, resampled)`.
    fn selection_round(&mut self, enforce_size: bool) -> Result<(usize, usize)> {
        let target = self.config.population_size;
        let survivors = SurvivorPool::with_capacity(target);

        let old = &self.population;
        let selection = self.selection.as_ref();
        fan_out(
            self.config.parallel,
            self.pool.as_ref(),
            &mut self.rng,
            old.len(),
            |range, _| selection.select(old, range.start, range.len(), &survivors),
        )?;

        let mut next = survivors.into_inner();
        let selected = next.len();

        if enforce_size && next.len() < target {
            if old.is_empty() {
                warn!("cannot top up to {target}: pre-selection population is empty");
            } else {
                while next.len() < target {
                    let idx = self.rng.random_range(0..old.len());
                    next.push(Arc::clone(&old[idx]));
                }
            }
        }

        let resampled = next.len() - selected;
        self.population = next;
        Ok((selected, resampled))
    }

    /// Appends offspring batches in order, skipping duplicates.
    fn merge(&mut self, batches: Vec<Vec<Arc<C>>>) -> usize {
        let mut inserted = 0;
        for child in batches.into_iter().flatten() {
            if push_unique(&mut self.population, child) {
                inserted += 1;
            }
        }
        inserted
    }
}

impl<C: Chromosome> Optimizer<C> {
    /// The live population. Element order is whatever selection produced.
    pub fn population(&self) -> &[Arc<C>] {
        &self.population
    }

    /// The first chromosome of the population.
    ///
    /// This is the best candidate only when the active selection strategy
    /// keeps the population ordered (e.g. single-criterion selection on one
    /// lane).
    pub fn best_chromosome(&self) -> Option<&Arc<C>> {
        self.population.first()
    }

    /// Target population size, fixed at construction.
    pub fn population_size(&self) -> usize {
        self.config.population_size
    }

    /// Number of epochs run so far.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// The active configuration.
    pub fn config(&self) -> &EmoConfig {
        &self.config
    }

    /// The fitness function used for every evaluation.
    pub fn fitness_function(&self) -> &dyn FitnessFunction<C> {
        self.fitness.as_ref()
    }

    /// The active selection strategy.
    pub fn selection(&self) -> &dyn Selection<C> {
        self.selection.as_ref()
    }

    /// Replaces the selection strategy. Takes effect from the next epoch.
    pub fn set_selection<S: Selection<C> + 'static>(&mut self, selection: S) {
        debug!("selection switched to {}", selection.name());
        self.selection = Box::new(selection);
    }

    /// Current mutation rate.
    pub fn mutation_rate(&self) -> f64 {
        self.config.mutation_rate
    }

    /// Sets the mutation rate, clamped to `[0, 1]`.
    pub fn set_mutation_rate(&mut self, rate: f64) {
        self.config.mutation_rate = rate.clamp(0.0, 1.0);
    }

    /// Current crossover rate.
    pub fn crossover_rate(&self) -> f64 {
        self.config.crossover_rate
    }

    /// Sets the crossover rate, clamped to `[0, 1]`.
    pub fn set_crossover_rate(&mut self, rate: f64) {
        self.config.crossover_rate = rate.clamp(0.0, 1.0);
    }

    /// Whether phases fan out over worker lanes.
    pub fn parallel(&self) -> bool {
        self.config.parallel
    }

    /// Enables or disables parallel execution.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.config.parallel = parallel;
    }

    /// Number of worker lanes available to parallel phases.
    pub fn worker_lanes(&self) -> usize {
        lanes(self.pool.as_ref())
    }

    /// Restarts the random source from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Restarts the random source from fresh entropy.
    pub fn reseed_from_entropy(&mut self) {
        self.rng = StdRng::seed_from_u64(rand::random());
    }
}

impl<C: Chromosome> std::fmt::Debug for Optimizer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Optimizer")
            .field("population", &self.population.len())
            .field("config", &self.config)
            .field("selection", &self.selection.name())
            .field("epoch", &self.epoch)
            .finish()
    }
}

/// Builder for [`Optimizer`].
///
/// Ancestor, fitness function and selection strategy are required;
/// [`build`](OptimizerBuilder::build) fails with
/// [`EmoError::MissingArgument`] naming the first one missing.
pub struct OptimizerBuilder<C: Chromosome> {
    ancestor: Option<C>,
    fitness: Option<Box<dyn FitnessFunction<C>>>,
    selection: Option<Box<dyn Selection<C>>>,
    config: EmoConfig,
}

impl<C: Chromosome> Default for OptimizerBuilder<C> {
    fn default() -> Self {
        Self {
            ancestor: None,
            fitness: None,
            selection: None,
            config: EmoConfig::default(),
        }
    }
}

impl<C: Chromosome + 'static> OptimizerBuilder<C> {
    /// Sets the chromosome the population is seeded from.
    pub fn ancestor(mut self, ancestor: C) -> Self {
        self.ancestor = Some(ancestor);
        self
    }

    /// Sets the fitness function.
    pub fn fitness_function<F: FitnessFunction<C> + 'static>(mut self, fitness: F) -> Self {
        self.fitness = Some(Box::new(fitness));
        self
    }

    /// Sets the selection strategy.
    pub fn selection<S: Selection<C> + 'static>(mut self, selection: S) -> Self {
        self.selection = Some(Box::new(selection));
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: EmoConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the target population size.
    pub fn population_size(mut self, n: usize) -> Self {
        self.config.population_size = n;
        self
    }

    /// Evaluates the ancestor, seeds the population and builds the
    /// optimizer.
    pub fn build(self) -> Result<Optimizer<C>> {
        let ancestor = self.ancestor.ok_or(EmoError::MissingArgument("ancestor"))?;
        let fitness = self
            .fitness
            .ok_or(EmoError::MissingArgument("fitness function"))?;
        let selection = self
            .selection
            .ok_or(EmoError::MissingArgument("selection"))?;
        Optimizer::seeded(ancestor, self.config, fitness, selection)
    }
}

fn lanes(pool: Option<&ThreadPool>) -> usize {
    pool.map_or_else(rayon::current_num_threads, ThreadPool::current_num_threads)
}

/// Runs `work` over `0..total` units, either as one sequential call on the
/// calling thread or as one chunk per worker lane.
///
/// Results come back in chunk order. In the parallel path every chunk is
/// joined before the first failure is returned. A panicking chunk fails
/// with [`EmoError::WorkerPanicked`] on either path.
fn fan_out<T, F>(
    parallel: bool,
    pool: Option<&ThreadPool>,
    rng: &mut StdRng,
    total: usize,
    work: F,
) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(Range<usize>, &mut StdRng) -> Result<T> + Sync,
{
    let lanes = lanes(pool);
    if !parallel || lanes > total {
        trace!("running {total} unit(s) sequentially");
        return Ok(vec![run_chunk(&work, 0..total, rng)?]);
    }

    trace!("fanning {total} unit(s) out over {lanes} lane(s)");
    let chunks: Vec<(Range<usize>, u64)> = partition(total, lanes)
        .into_iter()
        .map(|range| (range, rng.random()))
        .collect();

    let run = || {
        chunks
            .into_par_iter()
            .map(|(range, seed)| {
                let mut lane_rng = StdRng::seed_from_u64(seed);
                run_chunk(&work, range, &mut lane_rng)
            })
            .collect::<Vec<Result<T>>>()
    };

    let results = match pool {
        Some(pool) => pool.install(run),
        None => run(),
    };
    results.into_iter().collect()
}

fn run_chunk<T, F>(work: &F, range: Range<usize>, rng: &mut StdRng) -> Result<T>
where
    F: Fn(Range<usize>, &mut StdRng) -> Result<T>,
{
    panic::catch_unwind(AssertUnwindSafe(|| work(range, rng)))
        .unwrap_or_else(|payload| Err(EmoError::WorkerPanicked(panic_message(payload))))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
