/// Shared fixture networks for unit and integration tests.
///
/// Construction goes through the public API and reports failures as
/// results so callers decide how to handle them.
use ndarray::arr2;

use crate::network::{NetworkError, ReactionNetwork};

/// `S0 -> S1 -> S2`, the three-species linear chain.
///
/// # Errors
///
/// Construction cannot fail for this fixed shape; the result is
/// propagated for uniformity.
pub fn linear_chain() -> Result<ReactionNetwork, NetworkError> {
    ReactionNetwork::from_arrays(
        "linear-chain",
        arr2(&[[1, 0], [0, 1], [0, 0]]),
        arr2(&[[0, 0], [1, 0], [0, 1]]),
    )
}

/// `S0 -> S1`, `S0 -> S2`, a branch from a single source.
///
/// # Errors
///
/// Construction cannot fail for this fixed shape; the result is
/// propagated for uniformity.
pub fn branch() -> Result<ReactionNetwork, NetworkError> {
    ReactionNetwork::from_arrays(
        "branch",
        arr2(&[[1, 1], [0, 0], [0, 0]]),
        arr2(&[[0, 0], [1, 0], [0, 1]]),
    )
}

/// `S0 + S1 -> S2`, `S2 -> S0`, a small cycle with a bimolecular step.
///
/// # Errors
///
/// Construction cannot fail for this fixed shape; the result is
/// propagated for uniformity.
pub fn bimolecular_cycle() -> Result<ReactionNetwork, NetworkError> {
    ReactionNetwork::from_arrays(
        "bimolecular-cycle",
        arr2(&[[1, 0], [1, 0], [0, 1]]),
        arr2(&[[0, 1], [0, 0], [1, 0]]),
    )
}
