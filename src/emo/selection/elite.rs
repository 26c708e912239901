//! Elite archive selection.
//!
//! Keeps a persistent, size-capped archive of non-dominated candidates
//! across epochs and hands the whole archive on as survivors.

use super::{all_positive, objective, Selection, SurvivorPool};
use crate::emo::dominance::is_dominated_in_population;
use crate::emo::population::clamp_range;
use crate::emo::types::Chromosome;
use crate::error::Result;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Objective component used as the archive key.
const KEY_OBJECTIVE: usize = 1;

/// Archive key with a total order over `f64`.
#[derive(Debug, Clone, Copy)]
struct ArchiveKey(f64);

impl PartialEq for ArchiveKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ArchiveKey {}

impl PartialOrd for ArchiveKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ArchiveKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Archival selection over a cross-epoch elite.
///
/// Every call:
///
/// 1. Filters the assigned range to candidates with all objectives
///    strictly positive.
/// 2. Inserts each into the archive keyed by its **second** objective.
///    On a key collision the existing entry wins and the newcomer is
///    dropped.
/// 3. Purges archive entries dominated by any other entry.
/// 4. Evicts lowest-key entries while the archive exceeds its capacity.
/// 5. Appends every archive member not yet in the pool.
///
/// Steps 2–4 run under one lock on the archive and either all take effect
/// or, on error, leave the archive untouched. The archive is the only
/// state kept between calls, so sharing one instance across optimizers
/// shares the elite.
///
/// Decision vectors must have at least two components.
#[derive(Debug)]
pub struct EliteSelection<C> {
    capacity: usize,
    archive: Mutex<BTreeMap<ArchiveKey, Arc<C>>>,
}

impl<C: Chromosome> EliteSelection<C> {
    /// Creates an empty archive holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            archive: Mutex::new(BTreeMap::new()),
        }
    }

    /// Maximum number of archive entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of archive entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the archive is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Archive members ordered by first objective, best first.
    pub fn elite(&self) -> Vec<Arc<C>> {
        let mut members: Vec<Arc<C>> = self.lock().values().cloned().collect();
        members.sort_by(|a, b| {
            let fa = a.decision_vector().first().copied().unwrap_or(f64::NEG_INFINITY);
            let fb = b.decision_vector().first().copied().unwrap_or(f64::NEG_INFINITY);
            fb.total_cmp(&fa)
        });
        members
    }

    /// Drops every archive entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<ArchiveKey, Arc<C>>> {
        self.archive
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Removes every entry dominated by another entry.
fn purge_dominated<C: Chromosome>(archive: &mut BTreeMap<ArchiveKey, Arc<C>>) -> Result<()> {
    let members: Vec<Arc<C>> = archive.values().cloned().collect();

    let mut dominated = Vec::new();
    for (key, member) in archive.iter() {
        if is_dominated_in_population(member.as_ref(), &members)? {
            dominated.push(*key);
        }
    }

    for key in dominated {
        archive.remove(&key);
    }
    Ok(())
}

impl<C: Chromosome> Selection<C> for EliteSelection<C> {
    fn select(
        &self,
        old_population: &[Arc<C>],
        start: usize,
        length: usize,
        survivors: &SurvivorPool<C>,
    ) -> Result<()> {
        let range = clamp_range(start, length, old_population.len());

        let mut keyed = Vec::with_capacity(range.len());
        for candidate in &old_population[range] {
            if all_positive(candidate.as_ref()) {
                keyed.push((ArchiveKey(objective(candidate.as_ref(), KEY_OBJECTIVE)?), candidate));
            }
        }

        let mut archive = self.lock();

        // Built aside and committed only if the purge succeeds
        let mut next = archive.clone();
        for (key, candidate) in keyed {
            next.entry(key).or_insert_with(|| Arc::clone(candidate));
        }

        purge_dominated(&mut next)?;

        while next.len() > self.capacity {
            next.pop_first();
        }

        *archive = next;
        survivors.extend_unique(archive.values().cloned());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "elite"
    }
}
