/// Order-independent structural hashing.
///
/// Two networks can only be identical up to relabeling when their
/// classification matrices agree as row multisets; hashing each row,
/// sorting the row hashes, and hashing the sorted sequence yields a value
/// that is invariant to row order. The same sort-then-combine step is used
/// to merge per-orientation hashes so that the result does not depend on
/// which operand is "self".
///
/// Collisions are possible (the hash is not injective); equality of hashes
/// is necessary, never sufficient, for structural identity.
use ndarray::Array2;
use sha2::{Digest, Sha256};

/// Truncates a SHA-256 digest to its first eight bytes, little-endian.
fn digest_to_u64(digest: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(buf)
}

/// Hashes a single count row. The column count is folded in so that rows
/// of different widths never collide trivially.
fn hash_count_row(row: &[u32]) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update((row.len() as u64).to_le_bytes());
    for &v in row {
        hasher.update(v.to_le_bytes());
    }
    digest_to_u64(&hasher.finalize())
}

/// Hashes a count matrix independently of its row order.
///
/// Each row is hashed, the row hashes are sorted, and the sorted sequence
/// is hashed again. Permuting the matrix rows leaves the result unchanged;
/// permuting the entries that the counts were accumulated over never
/// changed the counts in the first place.
pub fn row_order_independent_hash(counts: &Array2<u32>) -> u64 {
    let mut row_hashes: Vec<u64> = counts
        .rows()
        .into_iter()
        .map(|row| {
            row.as_slice()
                .map_or_else(|| hash_count_row(&row.to_vec()), hash_count_row)
        })
        .collect();
    row_hashes.sort_unstable();
    combine_hashes(&row_hashes)
}

/// Combines already-sorted (or to-be-sorted) hash values symmetrically:
/// the input is sorted before hashing, so argument order is irrelevant.
pub fn combine_order_independent(hashes: &[u64]) -> u64 {
    let mut sorted = hashes.to_vec();
    sorted.sort_unstable();
    combine_hashes(&sorted)
}

/// Hashes a sequence of u64 values in the given order.
fn combine_hashes(hashes: &[u64]) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update((hashes.len() as u64).to_le_bytes());
    for &h in hashes {
        hasher.update(h.to_le_bytes());
    }
    digest_to_u64(&hasher.finalize())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use ndarray::arr2;

    #[test]
    fn hash_is_row_order_independent() {
        let a = arr2(&[[1u32, 0, 2], [3, 1, 0]]);
        let b = arr2(&[[3u32, 1, 0], [1, 0, 2]]);
        assert_eq!(row_order_independent_hash(&a), row_order_independent_hash(&b));
    }

    #[test]
    fn hash_distinguishes_different_counts() {
        let a = arr2(&[[1u32, 0], [0, 1]]);
        let b = arr2(&[[1u32, 1], [0, 0]]);
        assert_ne!(row_order_independent_hash(&a), row_order_independent_hash(&b));
    }

    #[test]
    fn hash_distinguishes_row_widths() {
        let a = arr2(&[[0u32, 0]]);
        let b = arr2(&[[0u32, 0, 0]]);
        assert_ne!(row_order_independent_hash(&a), row_order_independent_hash(&b));
    }

    #[test]
    fn combine_is_symmetric() {
        let x = combine_order_independent(&[7, 3]);
        let y = combine_order_independent(&[3, 7]);
        assert_eq!(x, y);
    }

    #[test]
    fn combine_depends_on_multiplicity() {
        let x = combine_order_independent(&[3, 3, 7]);
        let y = combine_order_independent(&[3, 7, 7]);
        assert_ne!(x, y);
    }
}
