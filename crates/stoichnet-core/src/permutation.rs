/// Exhaustive permutation search constrained by sign partitions.
///
/// A deterministic alternative to the randomized identity pipeline for
/// small networks: rows and columns are partitioned by their
/// negative/zero/positive entry counts, and only permutations that map
/// each partition block onto its counterpart are enumerated. The search
/// is exact and exhaustive but refuses to start when the constrained
/// permutation count exceeds a caller-supplied limit.
use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array2;

use crate::assignment::AssignmentPair;
use crate::network::ReactionNetwork;

/// Default ceiling on the number of enumerated permutations.
pub const DEFAULT_MAX_NUM_PERMUTATION: u64 = 10_000;

// ---------------------------------------------------------------------------
// PermutationError
// ---------------------------------------------------------------------------

/// Failure to run the exhaustive search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    /// The sign partitions admit more permutations than the limit.
    TooManyPermutations {
        /// Number of partition-respecting permutations.
        num_permutations: u64,
        /// The limit that was exceeded.
        limit: u64,
    },
}

impl fmt::Display for PermutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyPermutations {
                num_permutations,
                limit,
            } => write!(
                f,
                "sign partitions admit {num_permutations} permutations (limit {limit})"
            ),
        }
    }
}

impl std::error::Error for PermutationError {}

// ---------------------------------------------------------------------------
// Sign encoding and partitions
// ---------------------------------------------------------------------------

/// Counts of negative, zero, and positive entries in one row.
type SignKey = (usize, usize, usize);

fn sign_key(row: &[i64]) -> SignKey {
    let neg = row.iter().filter(|&&v| v < 0).count();
    let zero = row.iter().filter(|&&v| v == 0).count();
    (neg, zero, row.len() - neg - zero)
}

fn row_partitions(values: &Array2<i64>) -> BTreeMap<SignKey, Vec<usize>> {
    let mut partitions: BTreeMap<SignKey, Vec<usize>> = BTreeMap::new();
    for (i, row) in values.rows().into_iter().enumerate() {
        partitions.entry(sign_key(&row.to_vec())).or_default().push(i);
    }
    partitions
}

fn factorial(n: usize) -> u64 {
    // Saturates past 20!; the limit check rejects such inputs anyway.
    (1..=n as u64).fold(1, u64::saturating_mul)
}

/// Aligns reference and target partitions by key. `None` when the
/// partitions do not correspond block for block.
fn align_partitions(
    reference: &Array2<i64>,
    target: &Array2<i64>,
) -> Option<Vec<(Vec<usize>, Vec<usize>)>> {
    let ref_parts = row_partitions(reference);
    let tgt_parts = row_partitions(target);
    if ref_parts.len() != tgt_parts.len() {
        return None;
    }
    let mut blocks = Vec::with_capacity(ref_parts.len());
    for (key, ref_block) in ref_parts {
        let tgt_block = tgt_parts.get(&key)?;
        if tgt_block.len() != ref_block.len() {
            return None;
        }
        blocks.push((ref_block, tgt_block.clone()));
    }
    Some(blocks)
}

fn num_block_permutations(blocks: &[(Vec<usize>, Vec<usize>)]) -> u64 {
    blocks
        .iter()
        .map(|(r, _)| factorial(r.len()))
        .fold(1u64, u64::saturating_mul)
}

/// Materializes every assignment vector (reference index to target
/// index) that respects the partition blocks.
fn block_assignments(blocks: &[(Vec<usize>, Vec<usize>)], n: usize) -> Vec<Vec<usize>> {
    let mut assignments = vec![vec![usize::MAX; n]];
    for (ref_block, tgt_block) in blocks {
        let perms = permutations(tgt_block);
        let mut next = Vec::with_capacity(assignments.len() * perms.len());
        for assignment in &assignments {
            for perm in &perms {
                let mut extended = assignment.clone();
                for (&r, &t) in ref_block.iter().zip(perm) {
                    extended[r] = t;
                }
                next.push(extended);
            }
        }
        assignments = next;
    }
    assignments
}

/// All permutations of a slice, in no particular order.
fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
    if items.is_empty() {
        return vec![Vec::new()];
    }
    let mut result = Vec::new();
    for (i, &item) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, item);
            result.push(tail);
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Outcome of the exhaustive search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationSearchResult {
    /// `true` when at least one permutation maps the target onto the
    /// reference.
    pub is_identical: bool,
    /// Matching assignment pairs; the first one, or all of them under
    /// `find_all`.
    pub assignment_pairs: Vec<AssignmentPair>,
    /// Number of permutation pairs actually compared.
    pub num_checked: u64,
}

impl PermutationSearchResult {
    fn mismatch() -> Self {
        Self {
            is_identical: false,
            assignment_pairs: Vec::new(),
            num_checked: 0,
        }
    }
}

/// Exhaustively searches for relabelings under which the target's net
/// stoichiometry equals the reference's, enumerating only permutations
/// that respect the sign partitions of both axes.
///
/// # Errors
///
/// Returns [`PermutationError::TooManyPermutations`] when the partition
/// structure admits more than `max_num_permutation` permutation pairs.
pub fn find_stoichiometry_permutations(
    reference: &ReactionNetwork,
    target: &ReactionNetwork,
    max_num_permutation: u64,
    find_all: bool,
) -> Result<PermutationSearchResult, PermutationError> {
    if reference.num_species() != target.num_species()
        || reference.num_reactions() != target.num_reactions()
    {
        return Ok(PermutationSearchResult::mismatch());
    }
    let ref_values = reference.stoichiometry().values();
    let tgt_values = target.stoichiometry().values();

    let Some(row_blocks) = align_partitions(ref_values, tgt_values) else {
        return Ok(PermutationSearchResult::mismatch());
    };
    let ref_t = ref_values.t().to_owned();
    let tgt_t = tgt_values.t().to_owned();
    let Some(column_blocks) = align_partitions(&ref_t, &tgt_t) else {
        return Ok(PermutationSearchResult::mismatch());
    };

    let num_permutations = num_block_permutations(&row_blocks)
        .saturating_mul(num_block_permutations(&column_blocks));
    if num_permutations > max_num_permutation {
        return Err(PermutationError::TooManyPermutations {
            num_permutations,
            limit: max_num_permutation,
        });
    }

    let row_assignments = block_assignments(&row_blocks, reference.num_species());
    let column_assignments = block_assignments(&column_blocks, reference.num_reactions());

    let mut matches = Vec::new();
    let mut num_checked = 0u64;
    'outer: for rows in &row_assignments {
        for columns in &column_assignments {
            num_checked += 1;
            let selected = tgt_values
                .select(ndarray::Axis(0), rows)
                .select(ndarray::Axis(1), columns);
            if &selected == ref_values {
                matches.push(AssignmentPair::new(rows.clone(), columns.clone()));
                if !find_all {
                    break 'outer;
                }
            }
        }
    }

    Ok(PermutationSearchResult {
        is_identical: !matches.is_empty(),
        assignment_pairs: matches,
        num_checked,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use ndarray::{Array2, arr2};

    fn chain() -> ReactionNetwork {
        ReactionNetwork::from_arrays(
            "chain",
            arr2(&[[1, 0], [0, 1], [0, 0]]),
            arr2(&[[0, 0], [1, 0], [0, 1]]),
        )
        .expect("valid network")
    }

    #[test]
    fn finds_self_identity() {
        let net = chain();
        let result =
            find_stoichiometry_permutations(&net, &net, 1000, false).expect("within limit");
        assert!(result.is_identical);
        assert_eq!(result.assignment_pairs.len(), 1);
    }

    #[test]
    fn finds_permuted_copy() {
        let net = chain();
        let pair = AssignmentPair::new(vec![1, 2, 0], vec![1, 0]);
        let permuted = net.permute(&pair).expect("valid permutation");
        let result =
            find_stoichiometry_permutations(&net, &permuted, 1000, false).expect("within limit");
        assert!(result.is_identical);
        let found = &result.assignment_pairs[0];
        let aligned = permuted.subnetwork(found).expect("valid");
        assert!(net.stoichiometry_eq(&aligned));
    }

    #[test]
    fn rejects_mismatched_partitions() {
        let net = chain();
        // Same shape, but one species participates in both reactions.
        let other = ReactionNetwork::from_arrays(
            "other",
            arr2(&[[1, 1], [0, 0], [0, 0]]),
            arr2(&[[0, 0], [1, 0], [0, 1]]),
        )
        .expect("valid network");
        let result =
            find_stoichiometry_permutations(&net, &other, 1000, false).expect("within limit");
        assert!(!result.is_identical);
        assert_eq!(result.num_checked, 0);
    }

    #[test]
    fn errors_above_permutation_limit() {
        // Four all-zero species rows permute freely: 4! row permutations.
        let zeros = Array2::zeros((4, 2));
        let net = ReactionNetwork::from_arrays("zeros", zeros.clone(), zeros)
            .expect("valid network");
        let err = find_stoichiometry_permutations(&net, &net, 10, false)
            .expect_err("4! * 2! exceeds 10");
        assert!(matches!(err, PermutationError::TooManyPermutations { .. }));
    }

    #[test]
    fn errors_on_degenerate_partition_past_factorial_range() {
        // 21 all-zero species rows form a single block of 21!, which is
        // beyond u64; the count must saturate and hit the limit instead
        // of overflowing.
        let zeros = Array2::zeros((21, 1));
        let net = ReactionNetwork::from_arrays("wide-zeros", zeros.clone(), zeros)
            .expect("valid network");
        let err = find_stoichiometry_permutations(&net, &net, DEFAULT_MAX_NUM_PERMUTATION, false)
            .expect_err("21! exceeds any limit");
        assert!(matches!(err, PermutationError::TooManyPermutations { .. }));
    }

    #[test]
    fn find_all_enumerates_automorphisms() {
        // Two identical independent reactions: swapping them (species and
        // reactions together) is an automorphism.
        let net = ReactionNetwork::from_arrays(
            "two-edges",
            arr2(&[[1, 0], [0, 0], [0, 1], [0, 0]]),
            arr2(&[[0, 0], [1, 0], [0, 0], [0, 1]]),
        )
        .expect("valid network");
        let result =
            find_stoichiometry_permutations(&net, &net, 10_000, true).expect("within limit");
        assert!(result.is_identical);
        assert!(result.assignment_pairs.len() >= 2);
        assert!(result.num_checked >= result.assignment_pairs.len() as u64);
    }
}
