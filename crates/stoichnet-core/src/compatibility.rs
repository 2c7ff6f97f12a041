/// Compatibility sets between reference and target rows.
///
/// For every reference row, a [`CompatibilityCollection`] records which
/// target rows cannot yet be ruled out as its image under a valid
/// relabeling. Sets are built from single-criteria count matrices with
/// either equality (exact search) or dominance (subnetwork search) tests,
/// pruned at random under a permutation budget, and expanded into explicit
/// assignment rows when small enough.
use std::fmt;

use rand::Rng;

use crate::criteria::{CountComparison, SingleCriteriaMatrix};

/// Iteration cap for the random pruning loop. Exhausting it indicates a
/// degenerate constraint structure, not an expected path.
const MAX_PRUNE_ITERATIONS: usize = 1_000_000;

// ---------------------------------------------------------------------------
// PruneError
// ---------------------------------------------------------------------------

/// Fatal failure of the random pruning loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PruneError {
    /// The iteration cap was reached before the collection fit the budget.
    CouldNotPrune {
        /// The log10 permutation budget that could not be met.
        log10_budget: f64,
        /// The log10 permutation count at the time of failure.
        log10_remaining: f64,
    },
}

impl fmt::Display for PruneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CouldNotPrune {
                log10_budget,
                log10_remaining,
            } => write!(
                f,
                "could not prune compatibility collection to 10^{log10_budget} \
                 permutations (still at 10^{log10_remaining})"
            ),
        }
    }
}

impl std::error::Error for PruneError {}

// ---------------------------------------------------------------------------
// CompatibilityCollection
// ---------------------------------------------------------------------------

/// One target-index set per reference row, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityCollection {
    num_reference_rows: usize,
    num_target_rows: usize,
    sets: Vec<Vec<usize>>,
}

impl CompatibilityCollection {
    /// Creates a collection with empty sets.
    pub fn new(num_reference_rows: usize, num_target_rows: usize) -> Self {
        Self {
            num_reference_rows,
            num_target_rows,
            sets: vec![Vec::new(); num_reference_rows],
        }
    }

    /// Builds the collection by testing every reference row against every
    /// target row on the single-criteria counts.
    pub fn build(
        reference: &SingleCriteriaMatrix,
        target: &SingleCriteriaMatrix,
        comparison: CountComparison,
    ) -> Self {
        let mut collection = Self::new(reference.nrows(), target.nrows());
        for i in 0..reference.nrows() {
            for j in 0..target.nrows() {
                if reference.row_compatible(i, target, j, comparison) {
                    collection.sets[i].push(j);
                }
            }
        }
        collection
    }

    /// Per-row set intersection of two collections over the same row
    /// ranges. Used for strong identity, where a target row must be
    /// compatible in both the reactant and the product view.
    pub fn intersect(&self, other: &Self) -> Self {
        let sets = self
            .sets
            .iter()
            .zip(&other.sets)
            .map(|(a, b)| a.iter().copied().filter(|v| b.contains(v)).collect())
            .collect();
        Self {
            num_reference_rows: self.num_reference_rows,
            num_target_rows: self.num_target_rows,
            sets,
        }
    }

    /// Appends target rows to one reference row's set.
    pub fn add(&mut self, reference_row: usize, target_rows: &[usize]) {
        self.sets[reference_row].extend_from_slice(target_rows);
    }

    /// Number of reference rows.
    pub fn num_reference_rows(&self) -> usize {
        self.num_reference_rows
    }

    /// Number of target rows.
    pub fn num_target_rows(&self) -> usize {
        self.num_target_rows
    }

    /// The compatibility sets, one per reference row.
    pub fn sets(&self) -> &[Vec<usize>] {
        &self.sets
    }

    /// The set for one reference row.
    pub fn set(&self, reference_row: usize) -> &[usize] {
        &self.sets[reference_row]
    }

    /// `true` when some reference row has no compatible target row.
    pub fn has_empty_set(&self) -> bool {
        self.sets.iter().any(Vec::is_empty)
    }

    /// `log10` of the number of raw permutations implied by the sets:
    /// `sum(log10 |set_i|)`, or `-inf` when any set is empty.
    pub fn log10_num_permutation(&self) -> f64 {
        if self.has_empty_set() {
            return f64::NEG_INFINITY;
        }
        self.sets.iter().map(|s| (s.len() as f64).log10()).sum()
    }

    /// Randomly prunes the collection until it fits the permutation
    /// budget.
    ///
    /// Repeatedly picks a random reference row with more than one
    /// candidate and removes a random element, skipping a removal that
    /// would leave a singleton duplicating another row's already-unique
    /// claim. Returns the pruned collection and whether anything was
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`PruneError::CouldNotPrune`] when the iteration cap is
    /// reached first.
    pub fn prune<R: Rng>(
        &self,
        log10_max_permutation: f64,
        rng: &mut R,
    ) -> Result<(Self, bool), PruneError> {
        let mut collection = self.clone();
        let mut is_changed = false;
        for _ in 0..MAX_PRUNE_ITERATIONS {
            if collection.log10_num_permutation() <= log10_max_permutation {
                return Ok((collection, is_changed));
            }
            let candidate_rows: Vec<usize> = (0..collection.num_reference_rows)
                .filter(|&i| collection.sets[i].len() > 1)
                .collect();
            if candidate_rows.is_empty() {
                // Every set is a singleton yet the budget is still
                // exceeded; no removal can help.
                break;
            }
            let row = candidate_rows[rng.gen_range(0..candidate_rows.len())];
            let pos = rng.gen_range(0..collection.sets[row].len());
            if collection.sets[row].len() == 2 {
                let survivor = collection.sets[row][1 - pos];
                let is_claimed = collection
                    .sets
                    .iter()
                    .enumerate()
                    .any(|(i, s)| i != row && s.len() == 1 && s[0] == survivor);
                if is_claimed {
                    continue;
                }
            }
            collection.sets[row].remove(pos);
            is_changed = true;
        }
        Err(PruneError::CouldNotPrune {
            log10_budget: log10_max_permutation,
            log10_remaining: collection.log10_num_permutation(),
        })
    }

    /// Materializes the full Cartesian product of the sets as explicit
    /// assignment rows. Only safe for small products; callers must check
    /// [`Self::log10_num_permutation`] first.
    pub fn expand(&self) -> Vec<Vec<usize>> {
        let mut rows: Vec<Vec<usize>> = vec![Vec::new()];
        for set in &self.sets {
            let mut next = Vec::with_capacity(rows.len() * set.len());
            for row in &rows {
                for &v in set {
                    let mut extended = row.clone();
                    extended.push(v);
                    next.push(extended);
                }
            }
            rows = next;
        }
        rows
    }
}
