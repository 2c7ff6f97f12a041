#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod assignment;
pub mod compatibility;
pub mod criteria;
pub mod generator;
pub mod ident_hash;
pub mod identity;
pub mod named_matrix;
pub mod network;
pub mod permutation;
pub mod record;
pub mod test_helpers;

pub use assignment::{
    AssignmentPair, AssignmentResult, PairView, enumerate_assignments,
};
pub use compatibility::{CompatibilityCollection, PruneError};
pub use criteria::{
    CountComparison, CriteriaError, CriteriaVector, DEFAULT_BOUNDARIES, PairCriteriaMatrix,
    SingleCriteriaMatrix,
};
pub use generator::{GeneratorConfig, GeneratorError, ReactionTypeMix, random_network};
pub use ident_hash::{combine_order_independent, row_order_independent_hash};
pub use identity::{
    DEFAULT_MAX_NUM_ASSIGNMENT, Identity, IdentityConfig, IdentityError, MAX_VERIFICATION_PAIRS,
    MatchMode, StructuralIdentityResult, is_structurally_identical,
};
pub use named_matrix::{MatrixAxis, NamedMatrix, NamedMatrixError};
pub use network::{
    MatrixClassification, MatrixKind, NetworkClassification, NetworkError, Orientation,
    ReactionNetwork,
};
pub use permutation::{
    DEFAULT_MAX_NUM_PERMUTATION, PermutationError, PermutationSearchResult,
    find_stoichiometry_permutations,
};
pub use record::{NetworkRecord, RecordError, networks_from_json, networks_to_json};

/// Version of this crate, from the build manifest.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
