/// Assignment pairs and the incremental assignment enumerator.
///
/// An assignment maps every reference row to a distinct target row. The
/// enumerator builds the table of candidate assignments one reference
/// position at a time as a constrained cross product of compatibility
/// sets, pruning at random under the assignment budget and validating
/// each extension against the joint pair-criteria profile of the previous
/// position.
use rand::Rng;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};

use crate::compatibility::CompatibilityCollection;
use crate::criteria::{CountComparison, PairCriteriaMatrix};

// ---------------------------------------------------------------------------
// AssignmentPair
// ---------------------------------------------------------------------------

/// A species assignment and a reaction assignment, together describing one
/// candidate relabeling of a target network onto a reference network.
///
/// `species_assignment[i]` is the target species index assigned to
/// reference species `i`; likewise for reactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentPair {
    /// Target species index per reference species.
    pub species_assignment: Vec<usize>,
    /// Target reaction index per reference reaction.
    pub reaction_assignment: Vec<usize>,
}

impl AssignmentPair {
    /// Constructs an assignment pair from the two index vectors.
    pub fn new(species_assignment: Vec<usize>, reaction_assignment: Vec<usize>) -> Self {
        Self {
            species_assignment,
            reaction_assignment,
        }
    }

    /// The identity assignment for the given dimensions.
    pub fn identity(num_species: usize, num_reactions: usize) -> Self {
        Self {
            species_assignment: (0..num_species).collect(),
            reaction_assignment: (0..num_reactions).collect(),
        }
    }

    /// Inverts both assignments. Only meaningful when each assignment is a
    /// permutation (exact identity, not subnetwork search).
    pub fn invert(&self) -> Self {
        Self {
            species_assignment: invert_permutation(&self.species_assignment),
            reaction_assignment: invert_permutation(&self.reaction_assignment),
        }
    }
}

/// Inverts a permutation given as an index vector.
fn invert_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        inverse[p] = i;
    }
    inverse
}

// ---------------------------------------------------------------------------
// AssignmentResult
// ---------------------------------------------------------------------------

/// Outcome of enumerating one axis (species or reactions).
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentResult {
    /// Surviving candidate assignments; one target index per reference
    /// row.
    pub assignments: Vec<Vec<usize>>,
    /// `true` when random pruning discarded candidates before they could
    /// be examined.
    pub is_truncated: bool,
    /// Ratio of candidates held before vs. after pruning at each
    /// extension step, for diagnostics.
    pub compression_factors: Vec<f64>,
}

impl AssignmentResult {
    /// An empty result (no valid assignment).
    pub fn empty(is_truncated: bool, compression_factors: Vec<f64>) -> Self {
        Self {
            assignments: Vec::new(),
            is_truncated,
            compression_factors,
        }
    }
}

// ---------------------------------------------------------------------------
// enumerate_assignments
// ---------------------------------------------------------------------------

/// A reference/target pair-criteria view used for adjacent-position
/// validation. Strong identity supplies two views (reactant and product);
/// weak identity supplies the single stoichiometry view.
#[derive(Debug, Clone, Copy)]
pub struct PairView<'a> {
    /// Pair classification of the reference matrix.
    pub reference: &'a PairCriteriaMatrix,
    /// Pair classification of the target matrix.
    pub target: &'a PairCriteriaMatrix,
}

/// Builds the assignment table for one axis.
///
/// Starting from the compatibility set of position 0, each step `i`:
///
/// 1. randomly subsamples the current table to
///    `max_assignments / |set_i|` rows (flagging truncation),
/// 2. extends every surviving row with every element of `set_i`,
/// 3. discards rows that would assign the same target index twice,
/// 4. discards rows whose positions `i-1` and `i` are jointly
///    inconsistent in any supplied [`PairView`].
///
/// An empty compatibility set at any position short-circuits to an empty
/// result; that is a negative answer, not an error. The random subsample
/// is uniform and without replacement; which candidates survive is not
/// deterministic across seeds.
pub fn enumerate_assignments<R: Rng>(
    compatibility: &CompatibilityCollection,
    pair_views: &[PairView<'_>],
    comparison: CountComparison,
    max_assignments: usize,
    rng: &mut R,
) -> AssignmentResult {
    let num_positions = compatibility.num_reference_rows();
    if num_positions == 0 {
        // Zero reference rows: the empty assignment is vacuously valid.
        return AssignmentResult {
            assignments: vec![Vec::new()],
            is_truncated: false,
            compression_factors: Vec::new(),
        };
    }

    let mut is_truncated = false;
    let mut compression_factors = Vec::with_capacity(num_positions - 1);

    let mut table: Vec<Vec<usize>> = compatibility.set(0).iter().map(|&t| vec![t]).collect();
    if table.is_empty() {
        return AssignmentResult::empty(is_truncated, compression_factors);
    }

    for position in 1..num_positions {
        let set = compatibility.set(position);
        if set.is_empty() {
            return AssignmentResult::empty(is_truncated, compression_factors);
        }

        // Subsample so the extended table stays within the budget.
        let keep = (max_assignments / set.len()).max(1);
        let before = table.len();
        if table.len() > keep {
            let chosen = sample(rng, table.len(), keep);
            let mut kept = Vec::with_capacity(keep);
            for idx in chosen.iter() {
                kept.push(table[idx].clone());
            }
            table = kept;
            is_truncated = true;
        }
        compression_factors.push(before as f64 / table.len() as f64);

        // Cross product with injectivity and pairwise-consistency checks.
        let mut extended = Vec::with_capacity(table.len() * set.len());
        for row in &table {
            let previous = row[position - 1];
            for &candidate in set {
                if row.contains(&candidate) {
                    continue;
                }
                let consistent = pair_views.iter().all(|view| {
                    view.reference.pair_compatible(
                        position - 1,
                        position,
                        view.target,
                        previous,
                        candidate,
                        comparison,
                    )
                });
                if !consistent {
                    continue;
                }
                let mut next = row.clone();
                next.push(candidate);
                extended.push(next);
            }
        }
        table = extended;
        if table.is_empty() {
            return AssignmentResult::empty(is_truncated, compression_factors);
        }
    }

    AssignmentResult {
        assignments: table,
        is_truncated,
        compression_factors,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::criteria::CriteriaVector;
    use ndarray::arr2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pair(values: ndarray::Array2<i64>) -> PairCriteriaMatrix {
        PairCriteriaMatrix::classify(&values, &CriteriaVector::default())
    }

    fn collection(sets: &[&[usize]], num_target: usize) -> CompatibilityCollection {
        let mut c = CompatibilityCollection::new(sets.len(), num_target);
        for (i, s) in sets.iter().enumerate() {
            c.add(i, s);
        }
        c
    }

    #[test]
    fn invert_round_trips() {
        let pair = AssignmentPair::new(vec![2, 0, 1], vec![1, 0]);
        assert_eq!(pair.invert().invert(), pair);
        assert_eq!(pair.invert().species_assignment, vec![1, 2, 0]);
    }

    #[test]
    fn identity_assignment_is_consecutive() {
        let pair = AssignmentPair::identity(3, 2);
        assert_eq!(pair.species_assignment, vec![0, 1, 2]);
        assert_eq!(pair.reaction_assignment, vec![0, 1]);
    }

    #[test]
    fn enumerate_rejects_duplicate_targets() {
        let c = collection(&[&[0, 1], &[0, 1]], 2);
        let mut rng = StdRng::seed_from_u64(0);
        let result = enumerate_assignments(&c, &[], CountComparison::Equal, 1000, &mut rng);
        assert!(!result.is_truncated);
        let mut rows = result.assignments;
        rows.sort();
        assert_eq!(rows, vec![vec![0, 1], vec![1, 0]]);
    }

    #[test]
    fn enumerate_short_circuits_on_empty_set() {
        let c = collection(&[&[0, 1], &[]], 2);
        let mut rng = StdRng::seed_from_u64(0);
        let result = enumerate_assignments(&c, &[], CountComparison::Equal, 1000, &mut rng);
        assert!(result.assignments.is_empty());
        assert!(!result.is_truncated);
    }

    #[test]
    fn enumerate_flags_truncation_under_tight_budget() {
        let universe: Vec<usize> = (0..6).collect();
        let c = collection(&[&universe, &universe, &universe], 6);
        let mut rng = StdRng::seed_from_u64(7);
        let result = enumerate_assignments(&c, &[], CountComparison::Equal, 8, &mut rng);
        assert!(result.is_truncated);
        assert!(result.assignments.len() <= 8 * 6);
        for row in &result.assignments {
            let mut sorted = row.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), row.len(), "assignments must be injective");
        }
    }

    #[test]
    fn pair_view_filters_inconsistent_extensions() {
        // Reference rows 0 and 1 co-occur as (1, 1) in the only column;
        // target rows 0 and 1 never do, but target rows 0 and 2 match.
        let reference = pair(arr2(&[[1], [1]]));
        let target = pair(arr2(&[[1], [0], [1]]));
        let view = PairView {
            reference: &reference,
            target: &target,
        };
        let c = collection(&[&[0], &[1, 2]], 3);
        let mut rng = StdRng::seed_from_u64(0);
        let result =
            enumerate_assignments(&c, &[view], CountComparison::Equal, 1000, &mut rng);
        assert_eq!(result.assignments, vec![vec![0, 2]]);
    }

    #[test]
    fn zero_positions_yield_one_empty_assignment() {
        let c = CompatibilityCollection::new(0, 0);
        let mut rng = StdRng::seed_from_u64(0);
        let result = enumerate_assignments(&c, &[], CountComparison::Equal, 10, &mut rng);
        assert_eq!(result.assignments, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn compression_factors_record_each_step() {
        let universe: Vec<usize> = (0..4).collect();
        let c = collection(&[&universe, &universe, &universe], 4);
        let mut rng = StdRng::seed_from_u64(1);
        let result = enumerate_assignments(&c, &[], CountComparison::Equal, 1000, &mut rng);
        assert_eq!(result.compression_factors.len(), 2);
        assert!(result.compression_factors.iter().all(|&f| f >= 1.0));
    }
}
