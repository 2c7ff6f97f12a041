/// Structural identity decisions between two reaction networks.
///
/// The pipeline runs shape checks, a hash pre-filter (exact mode only),
/// compatibility-set construction, random pruning under the assignment
/// budget, incremental assignment enumeration on both axes, and finally
/// exact matrix verification of every surviving species/reaction
/// assignment pair.
///
/// A `false` result with `is_truncated == true` means the search space
/// was randomly narrowed before being exhausted; a matching relabeling
/// may exist outside the sampled region. A `true` result is always
/// definitive.
use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::assignment::{AssignmentPair, AssignmentResult, PairView, enumerate_assignments};
use crate::compatibility::{CompatibilityCollection, PruneError};
use crate::criteria::CountComparison;
use crate::network::{MatrixKind, Orientation, ReactionNetwork};

/// Hard ceiling on the number of assignment pairs submitted to exact
/// verification. Exceeding it is a fatal error rather than a silent
/// truncation.
pub const MAX_VERIFICATION_PAIRS: usize = 100_000;

/// Default assignment budget per axis.
pub const DEFAULT_MAX_NUM_ASSIGNMENT: usize = 1_000;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which notion of identity to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// Net stoichiometry matrices match up to relabeling.
    Weak,
    /// Reactant and product matrices each match under the same relabeling.
    Strong,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weak => f.write_str("weak"),
            Self::Strong => f.write_str("strong"),
        }
    }
}

/// Whether the reference must match the whole target or an induced
/// subnetwork of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The networks must have the same dimensions and match exactly.
    Exact,
    /// The reference must match an induced subnetwork of the target.
    Subset,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("exact"),
            Self::Subset => f.write_str("subset"),
        }
    }
}

/// Tuning knobs for one identity decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Weak or strong identity.
    pub identity: Identity,
    /// Exact or subnetwork matching.
    pub match_mode: MatchMode,
    /// Budget on the assignment table per axis; exceeding it triggers
    /// random truncation.
    pub max_num_assignment: usize,
    /// Collect every verified assignment pair instead of stopping at the
    /// first.
    pub find_all: bool,
    /// Seed for the pruning and truncation RNG; `None` draws from
    /// entropy.
    pub seed: Option<u64>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            identity: Identity::Weak,
            match_mode: MatchMode::Exact,
            max_num_assignment: DEFAULT_MAX_NUM_ASSIGNMENT,
            find_all: false,
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// IdentityError / StructuralIdentityResult
// ---------------------------------------------------------------------------

/// Fatal failures of the identity pipeline. Mismatch is never an error;
/// these indicate the search itself could not be carried out.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityError {
    /// The compatibility collection could not be pruned to the budget.
    Prune(PruneError),
    /// The verification stage would examine too many assignment pairs.
    TooManyVerificationPairs {
        /// Number of species/reaction pair combinations.
        num_pairs: usize,
        /// The fixed ceiling that was exceeded.
        limit: usize,
    },
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prune(e) => write!(f, "{e}"),
            Self::TooManyVerificationPairs { num_pairs, limit } => write!(
                f,
                "verification would examine {num_pairs} assignment pairs \
                 (limit {limit}); lower max_num_assignment"
            ),
        }
    }
}

impl std::error::Error for IdentityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Prune(e) => Some(e),
            Self::TooManyVerificationPairs { .. } => None,
        }
    }
}

impl From<PruneError> for IdentityError {
    fn from(e: PruneError) -> Self {
        Self::Prune(e)
    }
}

/// Outcome of one identity decision.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralIdentityResult {
    /// `true` when at least one assignment pair was verified.
    pub is_identical: bool,
    /// Verified assignment pairs; the first one found, or all of them
    /// under `find_all`.
    pub assignment_pairs: Vec<AssignmentPair>,
    /// `true` when pruning or enumeration discarded candidates at
    /// random; a negative answer is then inconclusive.
    pub is_truncated: bool,
    /// Number of species assignments that survived enumeration.
    pub num_species_candidates: usize,
    /// Number of reaction assignments that survived enumeration.
    pub num_reaction_candidates: usize,
    /// Before/after candidate ratio per species extension step.
    pub species_compression_factors: Vec<f64>,
    /// Before/after candidate ratio per reaction extension step.
    pub reaction_compression_factors: Vec<f64>,
}

impl StructuralIdentityResult {
    fn mismatch() -> Self {
        Self {
            is_identical: false,
            assignment_pairs: Vec::new(),
            is_truncated: false,
            num_species_candidates: 0,
            num_reaction_candidates: 0,
            species_compression_factors: Vec::new(),
            reaction_compression_factors: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

fn shapes_admit_match(
    reference: &ReactionNetwork,
    target: &ReactionNetwork,
    mode: MatchMode,
) -> bool {
    match mode {
        MatchMode::Exact => {
            reference.num_species() == target.num_species()
                && reference.num_reactions() == target.num_reactions()
        }
        MatchMode::Subset => {
            reference.num_species() <= target.num_species()
                && reference.num_reactions() <= target.num_reactions()
        }
    }
}

/// The matrix kinds whose classification views constrain the search.
fn constraint_kinds(identity: Identity) -> &'static [MatrixKind] {
    match identity {
        Identity::Weak => &[MatrixKind::Stoichiometry],
        Identity::Strong => &[MatrixKind::Reactant, MatrixKind::Product],
    }
}

/// Builds the compatibility collection for one axis, intersecting one
/// collection per constraining matrix kind.
fn build_compatibility(
    reference: &ReactionNetwork,
    target: &ReactionNetwork,
    orientation: Orientation,
    identity: Identity,
    comparison: CountComparison,
) -> CompatibilityCollection {
    let kinds = constraint_kinds(identity);
    let mut collection: Option<CompatibilityCollection> = None;
    for &kind in kinds {
        let built = CompatibilityCollection::build(
            &reference.classification().view(kind, orientation).single,
            &target.classification().view(kind, orientation).single,
            comparison,
        );
        collection = Some(match collection {
            Some(existing) => existing.intersect(&built),
            None => built,
        });
    }
    // constraint_kinds is never empty.
    collection.unwrap_or_else(|| CompatibilityCollection::new(0, 0))
}

fn enumerate_axis(
    reference: &ReactionNetwork,
    target: &ReactionNetwork,
    orientation: Orientation,
    config: &IdentityConfig,
    comparison: CountComparison,
    rng: &mut StdRng,
) -> Result<AssignmentResult, IdentityError> {
    let collection =
        build_compatibility(reference, target, orientation, config.identity, comparison);
    if collection.has_empty_set() && collection.num_reference_rows() > 0 {
        return Ok(AssignmentResult::empty(false, Vec::new()));
    }
    let log10_budget = (config.max_num_assignment as f64).log10();
    let (pruned, pruned_changed) = collection.prune(log10_budget, rng)?;

    let views: Vec<PairView<'_>> = constraint_kinds(config.identity)
        .iter()
        .map(|&kind| PairView {
            reference: &reference.classification().view(kind, orientation).pair,
            target: &target.classification().view(kind, orientation).pair,
        })
        .collect();
    let mut result = enumerate_assignments(
        &pruned,
        &views,
        comparison,
        config.max_num_assignment,
        rng,
    );
    result.is_truncated = result.is_truncated || pruned_changed;
    Ok(result)
}

/// Decides whether `reference` is structurally identical to `target`
/// (exact mode) or to an induced subnetwork of it (subset mode).
///
/// # Errors
///
/// Returns [`IdentityError::Prune`] when the compatibility sets cannot be
/// pruned to the assignment budget and
/// [`IdentityError::TooManyVerificationPairs`] when the surviving
/// candidates exceed [`MAX_VERIFICATION_PAIRS`].
pub fn is_structurally_identical(
    reference: &ReactionNetwork,
    target: &ReactionNetwork,
    config: &IdentityConfig,
) -> Result<StructuralIdentityResult, IdentityError> {
    if !shapes_admit_match(reference, target, config.match_mode) {
        return Ok(StructuralIdentityResult::mismatch());
    }

    // Hash agreement is necessary for exact identity; subset matches
    // survive differing hashes.
    if config.match_mode == MatchMode::Exact {
        let hashes_agree = match config.identity {
            Identity::Weak => reference.weak_hash() == target.weak_hash(),
            Identity::Strong => reference.strong_hash() == target.strong_hash(),
        };
        if !hashes_agree {
            return Ok(StructuralIdentityResult::mismatch());
        }
    }

    let comparison = match config.match_mode {
        MatchMode::Exact => CountComparison::Equal,
        MatchMode::Subset => CountComparison::Dominated,
    };
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let species = enumerate_axis(
        reference,
        target,
        Orientation::Species,
        config,
        comparison,
        &mut rng,
    )?;
    let reactions = enumerate_axis(
        reference,
        target,
        Orientation::Reaction,
        config,
        comparison,
        &mut rng,
    )?;
    let is_truncated = species.is_truncated || reactions.is_truncated;

    let num_pairs = species.assignments.len() * reactions.assignments.len();
    if num_pairs > MAX_VERIFICATION_PAIRS {
        return Err(IdentityError::TooManyVerificationPairs {
            num_pairs,
            limit: MAX_VERIFICATION_PAIRS,
        });
    }

    let mut verified = Vec::new();
    'outer: for species_row in &species.assignments {
        for reaction_row in &reactions.assignments {
            let pair = AssignmentPair::new(species_row.clone(), reaction_row.clone());
            let Ok(induced) = target.subnetwork(&pair) else {
                continue;
            };
            let matches = match config.identity {
                Identity::Weak => reference.stoichiometry_eq(&induced),
                Identity::Strong => reference.matrices_eq(&induced),
            };
            if matches {
                verified.push(pair);
                if !config.find_all {
                    break 'outer;
                }
            }
        }
    }

    Ok(StructuralIdentityResult {
        is_identical: !verified.is_empty(),
        assignment_pairs: verified,
        is_truncated,
        num_species_candidates: species.assignments.len(),
        num_reaction_candidates: reactions.assignments.len(),
        species_compression_factors: species.compression_factors,
        reaction_compression_factors: reactions.compression_factors,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use ndarray::{Array2, arr2};

    fn linear_chain() -> ReactionNetwork {
        // S0 -> S1 -> S2
        ReactionNetwork::from_arrays(
            "chain",
            arr2(&[[1, 0], [0, 1], [0, 0]]),
            arr2(&[[0, 0], [1, 0], [0, 1]]),
        )
        .expect("valid network")
    }

    fn config(identity: Identity, match_mode: MatchMode) -> IdentityConfig {
        IdentityConfig {
            identity,
            match_mode,
            seed: Some(17),
            ..IdentityConfig::default()
        }
    }

    #[test]
    fn network_is_identical_to_itself() {
        let net = linear_chain();
        for identity in [Identity::Weak, Identity::Strong] {
            let result =
                is_structurally_identical(&net, &net, &config(identity, MatchMode::Exact))
                    .expect("pipeline runs");
            assert!(result.is_identical, "{identity} self-identity");
            assert_eq!(result.assignment_pairs.len(), 1);
        }
    }

    #[test]
    fn permuted_network_is_identical() {
        let net = linear_chain();
        let pair = AssignmentPair::new(vec![2, 0, 1], vec![1, 0]);
        let permuted = net.permute(&pair).expect("valid permutation");
        let result = is_structurally_identical(
            &net,
            &permuted,
            &config(Identity::Strong, MatchMode::Exact),
        )
        .expect("pipeline runs");
        assert!(result.is_identical);
        // The reported assignment reproduces the reference exactly.
        let found = &result.assignment_pairs[0];
        let induced = permuted.subnetwork(found).expect("valid");
        assert!(net.matrices_eq(&induced));
    }

    #[test]
    fn different_shape_is_not_identical() {
        let net = linear_chain();
        let small = ReactionNetwork::from_arrays("small", arr2(&[[1]]), arr2(&[[0]]))
            .expect("valid");
        let result =
            is_structurally_identical(&net, &small, &config(Identity::Weak, MatchMode::Exact))
                .expect("pipeline runs");
        assert!(!result.is_identical);
        assert!(!result.is_truncated);
    }

    #[test]
    fn different_structure_is_not_identical() {
        let chain = linear_chain();
        // S0 -> S1, S0 -> S2: a branch, not a chain.
        let branch = ReactionNetwork::from_arrays(
            "branch",
            arr2(&[[1, 1], [0, 0], [0, 0]]),
            arr2(&[[0, 0], [1, 0], [0, 1]]),
        )
        .expect("valid");
        for identity in [Identity::Weak, Identity::Strong] {
            let result =
                is_structurally_identical(&chain, &branch, &config(identity, MatchMode::Exact))
                    .expect("pipeline runs");
            assert!(!result.is_identical, "{identity}");
        }
    }

    #[test]
    fn weak_accepts_what_strong_rejects() {
        // S0 -> S0 + S1 has the same net stoichiometry as -> S1 but
        // different reactant/product structure.
        let catalytic =
            ReactionNetwork::from_arrays("catalytic", arr2(&[[1], [0]]), arr2(&[[1], [1]]))
                .expect("valid");
        let plain = ReactionNetwork::from_arrays("plain", arr2(&[[0], [0]]), arr2(&[[0], [1]]))
            .expect("valid");
        let weak = is_structurally_identical(
            &catalytic,
            &plain,
            &config(Identity::Weak, MatchMode::Exact),
        )
        .expect("pipeline runs");
        assert!(weak.is_identical);
        let strong = is_structurally_identical(
            &catalytic,
            &plain,
            &config(Identity::Strong, MatchMode::Exact),
        )
        .expect("pipeline runs");
        assert!(!strong.is_identical);
    }

    #[test]
    fn subset_finds_embedded_network() {
        // Reference: S0 -> S1. Target: the linear chain, which contains
        // it as the induced subnetwork on {S0, S1} x {J0}.
        let reference =
            ReactionNetwork::from_arrays("edge", arr2(&[[1], [0]]), arr2(&[[0], [1]]))
                .expect("valid");
        let target = linear_chain();
        let result = is_structurally_identical(
            &reference,
            &target,
            &config(Identity::Strong, MatchMode::Subset),
        )
        .expect("pipeline runs");
        assert!(result.is_identical);
        let found = &result.assignment_pairs[0];
        let induced = target.subnetwork(found).expect("valid");
        assert!(reference.matrices_eq(&induced));
    }

    #[test]
    fn subset_rejects_non_embedded_network() {
        // 2 S0 -> S1 uses a coefficient the chain never has.
        let reference =
            ReactionNetwork::from_arrays("double", arr2(&[[2], [0]]), arr2(&[[0], [1]]))
                .expect("valid");
        let target = linear_chain();
        let result = is_structurally_identical(
            &reference,
            &target,
            &config(Identity::Strong, MatchMode::Subset),
        )
        .expect("pipeline runs");
        assert!(!result.is_identical);
    }

    #[test]
    fn exact_rejects_larger_target() {
        let reference =
            ReactionNetwork::from_arrays("edge", arr2(&[[1], [0]]), arr2(&[[0], [1]]))
                .expect("valid");
        let target = linear_chain();
        let result = is_structurally_identical(
            &reference,
            &target,
            &config(Identity::Weak, MatchMode::Exact),
        )
        .expect("pipeline runs");
        assert!(!result.is_identical);
    }

    #[test]
    fn find_all_reports_every_automorphism() {
        // Two independent copies of S0 -> S1; swapping the copies is an
        // automorphism.
        let net = ReactionNetwork::from_arrays(
            "two-edges",
            arr2(&[[1, 0], [0, 0], [0, 1], [0, 0]]),
            arr2(&[[0, 0], [1, 0], [0, 0], [0, 1]]),
        )
        .expect("valid");
        let mut cfg = config(Identity::Strong, MatchMode::Exact);
        cfg.find_all = true;
        let result = is_structurally_identical(&net, &net, &cfg).expect("pipeline runs");
        assert!(result.is_identical);
        assert!(
            result.assignment_pairs.len() >= 2,
            "identity and copy swap are both automorphisms, got {}",
            result.assignment_pairs.len()
        );
    }

    #[test]
    fn compression_factors_cover_each_extension_step() {
        // 3 species and 2 reactions give 2 and 1 extension steps; an
        // unpruned search compresses nothing.
        let net = linear_chain();
        let result =
            is_structurally_identical(&net, &net, &config(Identity::Weak, MatchMode::Exact))
                .expect("pipeline runs");
        assert_eq!(result.species_compression_factors.len(), 2);
        assert_eq!(result.reaction_compression_factors.len(), 1);
        assert!(
            result
                .species_compression_factors
                .iter()
                .chain(&result.reaction_compression_factors)
                .all(|&f| (f - 1.0).abs() < f64::EPSILON)
        );
    }

    #[test]
    fn truncated_search_records_compression_factors() {
        // All-zero matrices make every row compatible, so a tiny budget
        // forces pruning and the factors must survive into the result.
        let zeros = Array2::<i64>::zeros((6, 6));
        let net = ReactionNetwork::from_arrays("zeros", zeros.clone(), zeros).expect("valid");
        let cfg = IdentityConfig {
            identity: Identity::Weak,
            match_mode: MatchMode::Exact,
            max_num_assignment: 10,
            find_all: false,
            seed: Some(5),
        };
        let result = is_structurally_identical(&net, &net, &cfg).expect("pipeline runs");
        assert!(result.is_truncated);
        assert!(!result.species_compression_factors.is_empty());
        assert!(result.species_compression_factors.iter().all(|&f| f >= 1.0));
    }

    #[test]
    fn empty_networks_are_identical() {
        let a = ReactionNetwork::from_arrays(
            "empty-a",
            Array2::zeros((0, 0)),
            Array2::zeros((0, 0)),
        )
        .expect("valid");
        let b = ReactionNetwork::from_arrays(
            "empty-b",
            Array2::zeros((0, 0)),
            Array2::zeros((0, 0)),
        )
        .expect("valid");
        let result =
            is_structurally_identical(&a, &b, &config(Identity::Strong, MatchMode::Exact))
                .expect("pipeline runs");
        assert!(result.is_identical);
    }
}
