/// Criteria classification: partitioning the real line into named bins and
/// counting, per matrix row, how many entries fall into each bin.
///
/// A [`CriteriaVector`] with boundaries `b_0 < b_1 < ... < b_{k-1}` defines
/// `2k+1` predicates in fixed order:
///
/// - `0..k` — equality with each boundary,
/// - `k..2k-1` — open intervals between consecutive boundaries,
/// - `2k-1` — below the first boundary,
/// - `2k` — above the last boundary.
///
/// The predicates partition the line, so every value maps to exactly one
/// predicate index. Classification is a pure function of the matrix and the
/// criteria vector.
use std::fmt;

use ndarray::Array2;

/// Default boundary constants, matching unit stoichiometries.
pub const DEFAULT_BOUNDARIES: [f64; 3] = [-1.0, 0.0, 1.0];

// ---------------------------------------------------------------------------
// CriteriaError / CriteriaVector
// ---------------------------------------------------------------------------

/// Errors produced when constructing a [`CriteriaVector`].
#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaError {
    /// The boundary list is empty.
    NoBoundaries,
    /// The boundaries are not strictly increasing.
    UnsortedBoundaries {
        /// Position of the first out-of-order boundary.
        position: usize,
    },
}

impl fmt::Display for CriteriaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBoundaries => f.write_str("criteria vector needs at least one boundary"),
            Self::UnsortedBoundaries { position } => {
                write!(f, "boundaries must be strictly increasing (position {position})")
            }
        }
    }
}

impl std::error::Error for CriteriaError {}

/// An ordered list of boundary constants defining `2k+1` classification
/// predicates. Immutable; shared read-only across classifications.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaVector {
    boundaries: Vec<f64>,
}

impl CriteriaVector {
    /// Constructs a criteria vector from strictly increasing boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::NoBoundaries`] for an empty list and
    /// [`CriteriaError::UnsortedBoundaries`] when the list is not strictly
    /// increasing.
    pub fn new(boundaries: Vec<f64>) -> Result<Self, CriteriaError> {
        if boundaries.is_empty() {
            return Err(CriteriaError::NoBoundaries);
        }
        for (i, pair) in boundaries.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                return Err(CriteriaError::UnsortedBoundaries { position: i + 1 });
            }
        }
        Ok(Self { boundaries })
    }

    /// The boundary constants.
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Total number of predicates: `2k+1` for `k` boundaries.
    pub fn num_criteria(&self) -> usize {
        2 * self.boundaries.len() + 1
    }

    /// Maps a value to the index of the unique predicate it satisfies.
    pub fn classify(&self, value: i64) -> usize {
        let x = value as f64;
        let k = self.boundaries.len();
        for (i, &b) in self.boundaries.iter().enumerate() {
            if x == b {
                return i;
            }
        }
        if x < self.boundaries[0] {
            return 2 * k - 1;
        }
        if x > self.boundaries[k - 1] {
            return 2 * k;
        }
        // Strictly inside some interval; find it.
        let mut interval = 0;
        for (i, pair) in self.boundaries.windows(2).enumerate() {
            if pair[0] < x && x < pair[1] {
                interval = i;
                break;
            }
        }
        k + interval
    }

    /// A human-readable label for a predicate index, e.g. `"=0"` or
    /// `"-1<,<0"`.
    pub fn label(&self, index: usize) -> String {
        let k = self.boundaries.len();
        if index < k {
            format!("={}", self.boundaries[index])
        } else if index < 2 * k - 1 {
            let i = index - k;
            format!("{}<,<{}", self.boundaries[i], self.boundaries[i + 1])
        } else if index == 2 * k - 1 {
            format!("<{}", self.boundaries[0])
        } else {
            format!(">{}", self.boundaries[k - 1])
        }
    }
}

impl Default for CriteriaVector {
    fn default() -> Self {
        Self {
            boundaries: DEFAULT_BOUNDARIES.to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// CountComparison
// ---------------------------------------------------------------------------

/// How a reference count vector is tested against a target count vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountComparison {
    /// Every count must match exactly (exact-identity search).
    Equal,
    /// Every reference count must be `<=` its target (subnetwork search).
    Dominated,
}

impl CountComparison {
    /// Applies the comparison element-wise to two equal-length slices.
    pub fn holds(self, reference: &[u32], target: &[u32]) -> bool {
        match self {
            Self::Equal => reference == target,
            Self::Dominated => reference.iter().zip(target).all(|(r, t)| r <= t),
        }
    }
}

// ---------------------------------------------------------------------------
// SingleCriteriaMatrix
// ---------------------------------------------------------------------------

/// Per-row predicate histograms: one row per original row, one column per
/// predicate, entries are occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleCriteriaMatrix {
    counts: Array2<u32>,
}

impl SingleCriteriaMatrix {
    /// Classifies every entry of `values` and accumulates per-row counts.
    pub fn classify(values: &Array2<i64>, criteria: &CriteriaVector) -> Self {
        let mut counts = Array2::<u32>::zeros((values.nrows(), criteria.num_criteria()));
        for (i, row) in values.rows().into_iter().enumerate() {
            for &v in row {
                counts[[i, criteria.classify(v)]] += 1;
            }
        }
        Self { counts }
    }

    /// Number of classified rows.
    pub fn nrows(&self) -> usize {
        self.counts.nrows()
    }

    /// Number of predicates (columns).
    pub fn num_criteria(&self) -> usize {
        self.counts.ncols()
    }

    /// The raw count array.
    pub fn counts(&self) -> &Array2<u32> {
        &self.counts
    }

    /// The count vector for one row.
    pub fn row(&self, index: usize) -> Vec<u32> {
        self.counts.row(index).to_vec()
    }

    /// Tests one reference row against one target row under `comparison`.
    pub fn row_compatible(
        &self,
        reference_row: usize,
        target: &Self,
        target_row: usize,
        comparison: CountComparison,
    ) -> bool {
        let r = self.counts.row(reference_row);
        let t = target.counts.row(target_row);
        match comparison {
            CountComparison::Equal => r == t,
            CountComparison::Dominated => r.iter().zip(t).all(|(a, b)| a <= b),
        }
    }
}

// ---------------------------------------------------------------------------
// PairCriteriaMatrix
// ---------------------------------------------------------------------------

/// Joint pair-criteria classification.
///
/// Stores the predicate index of every entry; the joint count vector for an
/// ordered row pair `(a, b)` has one slot per ordered predicate pair
/// `(p, q)` holding the number of columns `j` where row `a` satisfies `p`
/// and row `b` satisfies `q`. Queried lazily during assignment building,
/// O(columns) per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairCriteriaMatrix {
    indices: Array2<u8>,
    num_criteria: usize,
}

impl PairCriteriaMatrix {
    /// Classifies every entry of `values` to its predicate index.
    pub fn classify(values: &Array2<i64>, criteria: &CriteriaVector) -> Self {
        let num_criteria = criteria.num_criteria();
        let mut indices = Array2::<u8>::zeros(values.dim());
        for ((i, j), &v) in values.indexed_iter() {
            indices[[i, j]] = criteria.classify(v) as u8;
        }
        Self {
            indices,
            num_criteria,
        }
    }

    /// Number of classified rows.
    pub fn nrows(&self) -> usize {
        self.indices.nrows()
    }

    /// Joint predicate-pair counts for the ordered row pair `(a, b)`,
    /// flattened as `p * num_criteria + q`.
    pub fn pair_counts(&self, a: usize, b: usize) -> Vec<u32> {
        let mut counts = vec![0u32; self.num_criteria * self.num_criteria];
        let row_a = self.indices.row(a);
        let row_b = self.indices.row(b);
        for (&p, &q) in row_a.iter().zip(row_b.iter()) {
            counts[p as usize * self.num_criteria + q as usize] += 1;
        }
        counts
    }

    /// Tests whether the reference pair `(ref_a, ref_b)` remains consistent
    /// with the target pair `(tgt_a, tgt_b)` under `comparison`.
    pub fn pair_compatible(
        &self,
        ref_a: usize,
        ref_b: usize,
        target: &Self,
        tgt_a: usize,
        tgt_b: usize,
        comparison: CountComparison,
    ) -> bool {
        let r = self.pair_counts(ref_a, ref_b);
        let t = target.pair_counts(tgt_a, tgt_b);
        comparison.holds(&r, &t)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use ndarray::arr2;

    #[test]
    fn default_criteria_has_seven_predicates() {
        let cv = CriteriaVector::default();
        assert_eq!(cv.num_criteria(), 7);
    }

    #[test]
    fn new_rejects_unsorted() {
        let err = CriteriaVector::new(vec![0.0, -1.0]).expect_err("unsorted");
        assert!(matches!(err, CriteriaError::UnsortedBoundaries { position: 1 }));
    }

    #[test]
    fn new_rejects_empty() {
        assert!(matches!(
            CriteriaVector::new(vec![]),
            Err(CriteriaError::NoBoundaries)
        ));
    }

    #[test]
    fn classify_covers_all_cases() {
        let cv = CriteriaVector::default();
        // Equalities.
        assert_eq!(cv.classify(-1), 0);
        assert_eq!(cv.classify(0), 1);
        assert_eq!(cv.classify(1), 2);
        // Below / above the extremes (intervals are unreachable with
        // integer values and unit boundaries).
        assert_eq!(cv.classify(-5), 5);
        assert_eq!(cv.classify(3), 6);
    }

    #[test]
    fn classify_open_intervals_with_wide_boundaries() {
        let cv = CriteriaVector::new(vec![-10.0, 0.0, 10.0]).expect("valid");
        assert_eq!(cv.classify(-5), 3); // -10 < x < 0
        assert_eq!(cv.classify(5), 4); // 0 < x < 10
    }

    #[test]
    fn labels_match_predicate_order() {
        let cv = CriteriaVector::default();
        assert_eq!(cv.label(0), "=-1");
        assert_eq!(cv.label(3), "-1<,<0");
        assert_eq!(cv.label(5), "<-1");
        assert_eq!(cv.label(6), ">1");
    }

    #[test]
    fn single_counts_sum_to_column_count() {
        let cv = CriteriaVector::default();
        let m = arr2(&[[1, 0, -1, 2], [0, 0, 0, 0]]);
        let sc = SingleCriteriaMatrix::classify(&m, &cv);
        for i in 0..sc.nrows() {
            let total: u32 = sc.row(i).iter().sum();
            assert_eq!(total, 4);
        }
        assert_eq!(sc.counts()[[1, 1]], 4); // all zeros in row 1
    }

    #[test]
    fn single_counts_are_column_order_independent() {
        let cv = CriteriaVector::default();
        let a = SingleCriteriaMatrix::classify(&arr2(&[[1, 0, -1]]), &cv);
        let b = SingleCriteriaMatrix::classify(&arr2(&[[-1, 1, 0]]), &cv);
        assert_eq!(a, b);
    }

    #[test]
    fn row_compatible_equal_and_dominated() {
        let cv = CriteriaVector::default();
        let reference = SingleCriteriaMatrix::classify(&arr2(&[[1, 0]]), &cv);
        let same = SingleCriteriaMatrix::classify(&arr2(&[[0, 1]]), &cv);
        let bigger = SingleCriteriaMatrix::classify(&arr2(&[[1, 0, 1, -1]]), &cv);
        assert!(reference.row_compatible(0, &same, 0, CountComparison::Equal));
        assert!(!reference.row_compatible(0, &bigger, 0, CountComparison::Equal));
        assert!(reference.row_compatible(0, &bigger, 0, CountComparison::Dominated));
        assert!(!bigger.row_compatible(0, &reference, 0, CountComparison::Dominated));
    }

    #[test]
    fn pair_counts_track_joint_occurrence() {
        let cv = CriteriaVector::default();
        let m = arr2(&[[1, 0], [0, 1]]);
        let pc = PairCriteriaMatrix::classify(&m, &cv);
        let counts = pc.pair_counts(0, 1);
        let k = cv.num_criteria();
        // Column 0: (row0 = 1 -> idx 2, row1 = 0 -> idx 1).
        assert_eq!(counts[2 * k + 1], 1);
        // Column 1: (row0 = 0 -> idx 1, row1 = 1 -> idx 2).
        assert_eq!(counts[k + 2], 1);
        let total: u32 = counts.iter().sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn pair_compatible_detects_mismatch() {
        let cv = CriteriaVector::default();
        let reference = PairCriteriaMatrix::classify(&arr2(&[[1, 0], [0, 1]]), &cv);
        let swapped = PairCriteriaMatrix::classify(&arr2(&[[0, 1], [1, 0]]), &cv);
        // Same joint profile read in the matching order.
        assert!(reference.pair_compatible(0, 1, &swapped, 1, 0, CountComparison::Equal));
        // A row pair with a different co-occurrence pattern fails equality.
        let aligned = PairCriteriaMatrix::classify(&arr2(&[[1, 0], [1, 0]]), &cv);
        assert!(!aligned.pair_compatible(0, 1, &reference, 0, 1, CountComparison::Equal));
    }
}
