/// Labeled 2-D integer matrix with stable row and column identifiers.
///
/// [`NamedMatrix`] is the basic data carrier of the engine: a dense
/// `ndarray::Array2<i64>` plus unique id strings for both axes and
/// display-only labels. Every transformation (`sub_matrix`, `hstack`,
/// `vstack`, `transpose`, `template`) returns a new instance; nothing
/// mutates in place.
///
/// Equality considers shape, ids, and values. Labels are presentation
/// only and are excluded from equality.
use std::fmt;

use ndarray::{Array2, Axis, concatenate};

// ---------------------------------------------------------------------------
// MatrixAxis / NamedMatrixError
// ---------------------------------------------------------------------------

/// The axis an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixAxis {
    /// Row axis (species in the species orientation).
    Row,
    /// Column axis (reactions in the species orientation).
    Column,
}

impl fmt::Display for MatrixAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => f.write_str("row"),
            Self::Column => f.write_str("column"),
        }
    }
}

/// Errors produced by [`NamedMatrix`] construction and transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedMatrixError {
    /// The number of ids does not match the matrix extent on that axis.
    IdCountMismatch {
        /// Axis on which the mismatch occurred.
        axis: MatrixAxis,
        /// Matrix extent on that axis.
        expected: usize,
        /// Number of ids supplied.
        actual: usize,
    },
    /// The same id appears twice on one axis.
    DuplicateId {
        /// Axis on which the duplicate occurred.
        axis: MatrixAxis,
        /// The offending id.
        id: String,
    },
    /// A requested id is not present on the axis.
    UnknownId {
        /// Axis that was searched.
        axis: MatrixAxis,
        /// The id that was not found.
        id: String,
    },
    /// Two matrices have incompatible shapes for the requested operation.
    ShapeMismatch {
        /// Shape of the left operand.
        left: (usize, usize),
        /// Shape of the right operand.
        right: (usize, usize),
    },
    /// Concatenation would produce a duplicate id on the joined axis.
    IdCollision {
        /// Axis on which the collision occurred.
        axis: MatrixAxis,
        /// The colliding id.
        id: String,
    },
}

impl fmt::Display for NamedMatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdCountMismatch {
                axis,
                expected,
                actual,
            } => write!(
                f,
                "expected {expected} {axis} ids, got {actual}"
            ),
            Self::DuplicateId { axis, id } => {
                write!(f, "duplicate {axis} id: {id}")
            }
            Self::UnknownId { axis, id } => {
                write!(f, "unknown {axis} id: {id}")
            }
            Self::ShapeMismatch { left, right } => write!(
                f,
                "incompatible shapes: {}x{} vs {}x{}",
                left.0, left.1, right.0, right.1
            ),
            Self::IdCollision { axis, id } => {
                write!(f, "{axis} id collision: {id}")
            }
        }
    }
}

impl std::error::Error for NamedMatrixError {}

// ---------------------------------------------------------------------------
// NamedMatrix
// ---------------------------------------------------------------------------

/// A 2-D integer matrix with unique row/column ids and display labels.
#[derive(Debug, Clone)]
pub struct NamedMatrix {
    values: Array2<i64>,
    row_ids: Vec<String>,
    column_ids: Vec<String>,
    row_labels: Vec<String>,
    column_labels: Vec<String>,
}

/// Returns the first duplicated entry in `ids`, if any.
fn find_duplicate(ids: &[String]) -> Option<&String> {
    let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
    ids.iter().find(|id| !seen.insert(id.as_str()))
}

impl NamedMatrix {
    /// Constructs a `NamedMatrix` from values and id sequences.
    ///
    /// Labels default to the ids.
    ///
    /// # Errors
    ///
    /// Returns [`NamedMatrixError::IdCountMismatch`] when an id sequence
    /// does not match the corresponding matrix extent, and
    /// [`NamedMatrixError::DuplicateId`] when an axis carries the same id
    /// twice.
    pub fn new(
        values: Array2<i64>,
        row_ids: Vec<String>,
        column_ids: Vec<String>,
    ) -> Result<Self, NamedMatrixError> {
        if row_ids.len() != values.nrows() {
            return Err(NamedMatrixError::IdCountMismatch {
                axis: MatrixAxis::Row,
                expected: values.nrows(),
                actual: row_ids.len(),
            });
        }
        if column_ids.len() != values.ncols() {
            return Err(NamedMatrixError::IdCountMismatch {
                axis: MatrixAxis::Column,
                expected: values.ncols(),
                actual: column_ids.len(),
            });
        }
        if let Some(id) = find_duplicate(&row_ids) {
            return Err(NamedMatrixError::DuplicateId {
                axis: MatrixAxis::Row,
                id: id.clone(),
            });
        }
        if let Some(id) = find_duplicate(&column_ids) {
            return Err(NamedMatrixError::DuplicateId {
                axis: MatrixAxis::Column,
                id: id.clone(),
            });
        }
        let row_labels = row_ids.clone();
        let column_labels = column_ids.clone();
        Ok(Self {
            values,
            row_ids,
            column_ids,
            row_labels,
            column_labels,
        })
    }

    /// Constructs a `NamedMatrix` with generated ids `r0..` / `c0..`.
    pub fn from_values(values: Array2<i64>) -> Self {
        let row_ids: Vec<String> = (0..values.nrows()).map(|i| format!("r{i}")).collect();
        let column_ids: Vec<String> = (0..values.ncols()).map(|i| format!("c{i}")).collect();
        Self {
            row_labels: row_ids.clone(),
            column_labels: column_ids.clone(),
            values,
            row_ids,
            column_ids,
        }
    }

    /// Replaces the display labels, leaving ids untouched.
    ///
    /// # Errors
    ///
    /// Returns [`NamedMatrixError::IdCountMismatch`] when a label sequence
    /// does not match the corresponding extent.
    pub fn with_labels(
        mut self,
        row_labels: Vec<String>,
        column_labels: Vec<String>,
    ) -> Result<Self, NamedMatrixError> {
        if row_labels.len() != self.nrows() {
            return Err(NamedMatrixError::IdCountMismatch {
                axis: MatrixAxis::Row,
                expected: self.nrows(),
                actual: row_labels.len(),
            });
        }
        if column_labels.len() != self.ncols() {
            return Err(NamedMatrixError::IdCountMismatch {
                axis: MatrixAxis::Column,
                expected: self.ncols(),
                actual: column_labels.len(),
            });
        }
        self.row_labels = row_labels;
        self.column_labels = column_labels;
        Ok(self)
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// The underlying value array.
    pub fn values(&self) -> &Array2<i64> {
        &self.values
    }

    /// Row ids, in row order.
    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    /// Column ids, in column order.
    pub fn column_ids(&self) -> &[String] {
        &self.column_ids
    }

    /// Display labels for rows.
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Display labels for columns.
    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    /// Returns a new matrix with the same ids and labels but new values.
    ///
    /// # Errors
    ///
    /// Returns [`NamedMatrixError::ShapeMismatch`] when the replacement
    /// values differ in shape.
    pub fn template(&self, values: Array2<i64>) -> Result<Self, NamedMatrixError> {
        if values.dim() != self.values.dim() {
            return Err(NamedMatrixError::ShapeMismatch {
                left: self.values.dim(),
                right: values.dim(),
            });
        }
        Ok(Self {
            values,
            row_ids: self.row_ids.clone(),
            column_ids: self.column_ids.clone(),
            row_labels: self.row_labels.clone(),
            column_labels: self.column_labels.clone(),
        })
    }

    /// Returns the transposed matrix: row ids become column ids and vice
    /// versa.
    pub fn transpose(&self) -> Self {
        Self {
            values: self.values.t().to_owned(),
            row_ids: self.column_ids.clone(),
            column_ids: self.row_ids.clone(),
            row_labels: self.column_labels.clone(),
            column_labels: self.row_labels.clone(),
        }
    }

    /// Resolves ids to positional indices on the given axis.
    fn resolve_ids(
        &self,
        axis: MatrixAxis,
        ids: &[&str],
    ) -> Result<Vec<usize>, NamedMatrixError> {
        let own = match axis {
            MatrixAxis::Row => &self.row_ids,
            MatrixAxis::Column => &self.column_ids,
        };
        ids.iter()
            .map(|id| {
                own.iter().position(|o| o == id).ok_or_else(|| {
                    NamedMatrixError::UnknownId {
                        axis,
                        id: (*id).to_owned(),
                    }
                })
            })
            .collect()
    }

    /// Extracts the sub-matrix restricted to the given ids.
    ///
    /// `None` keeps the full axis. The result's rows/columns appear in the
    /// order the ids were requested.
    ///
    /// # Errors
    ///
    /// Returns [`NamedMatrixError::UnknownId`] when a requested id is not
    /// present.
    pub fn sub_matrix(
        &self,
        row_ids: Option<&[&str]>,
        column_ids: Option<&[&str]>,
    ) -> Result<Self, NamedMatrixError> {
        let row_idxs = match row_ids {
            Some(ids) => self.resolve_ids(MatrixAxis::Row, ids)?,
            None => (0..self.nrows()).collect(),
        };
        let column_idxs = match column_ids {
            Some(ids) => self.resolve_ids(MatrixAxis::Column, ids)?,
            None => (0..self.ncols()).collect(),
        };
        Ok(self.select(&row_idxs, &column_idxs))
    }

    /// Extracts the sub-matrix at the given positional indices.
    ///
    /// Indices may repeat and appear in any order; the result follows the
    /// index order. Callers must keep indices in bounds.
    pub fn select(&self, row_idxs: &[usize], column_idxs: &[usize]) -> Self {
        let values = self
            .values
            .select(Axis(0), row_idxs)
            .select(Axis(1), column_idxs);
        let pick = |src: &[String], idxs: &[usize]| -> Vec<String> {
            idxs.iter().map(|&i| src[i].clone()).collect()
        };
        Self {
            values,
            row_ids: pick(&self.row_ids, row_idxs),
            column_ids: pick(&self.column_ids, column_idxs),
            row_labels: pick(&self.row_labels, row_idxs),
            column_labels: pick(&self.column_labels, column_idxs),
        }
    }

    /// Horizontally concatenates `self` and `other` (columns side by side).
    ///
    /// Row ids must match exactly; column ids must be disjoint.
    ///
    /// # Errors
    ///
    /// Returns [`NamedMatrixError::ShapeMismatch`] on differing row counts
    /// or row ids, and [`NamedMatrixError::IdCollision`] on a shared column
    /// id.
    pub fn hstack(&self, other: &Self) -> Result<Self, NamedMatrixError> {
        if self.nrows() != other.nrows() || self.row_ids != other.row_ids {
            return Err(NamedMatrixError::ShapeMismatch {
                left: self.values.dim(),
                right: other.values.dim(),
            });
        }
        if let Some(id) = other
            .column_ids
            .iter()
            .find(|id| self.column_ids.contains(id))
        {
            return Err(NamedMatrixError::IdCollision {
                axis: MatrixAxis::Column,
                id: id.clone(),
            });
        }
        let values = concatenate(Axis(1), &[self.values.view(), other.values.view()])
            .map_err(|_| NamedMatrixError::ShapeMismatch {
                left: self.values.dim(),
                right: other.values.dim(),
            })?;
        let mut column_ids = self.column_ids.clone();
        column_ids.extend(other.column_ids.iter().cloned());
        let mut column_labels = self.column_labels.clone();
        column_labels.extend(other.column_labels.iter().cloned());
        Ok(Self {
            values,
            row_ids: self.row_ids.clone(),
            column_ids,
            row_labels: self.row_labels.clone(),
            column_labels,
        })
    }

    /// Vertically concatenates `self` and `other` (rows stacked).
    ///
    /// Column ids must match exactly; row ids must be disjoint.
    ///
    /// # Errors
    ///
    /// Returns [`NamedMatrixError::ShapeMismatch`] on differing column
    /// counts or column ids, and [`NamedMatrixError::IdCollision`] on a
    /// shared row id.
    pub fn vstack(&self, other: &Self) -> Result<Self, NamedMatrixError> {
        if self.ncols() != other.ncols() || self.column_ids != other.column_ids {
            return Err(NamedMatrixError::ShapeMismatch {
                left: self.values.dim(),
                right: other.values.dim(),
            });
        }
        if let Some(id) = other.row_ids.iter().find(|id| self.row_ids.contains(id)) {
            return Err(NamedMatrixError::IdCollision {
                axis: MatrixAxis::Row,
                id: id.clone(),
            });
        }
        let values = concatenate(Axis(0), &[self.values.view(), other.values.view()])
            .map_err(|_| NamedMatrixError::ShapeMismatch {
                left: self.values.dim(),
                right: other.values.dim(),
            })?;
        let mut row_ids = self.row_ids.clone();
        row_ids.extend(other.row_ids.iter().cloned());
        let mut row_labels = self.row_labels.clone();
        row_labels.extend(other.row_labels.iter().cloned());
        Ok(Self {
            values,
            row_ids,
            column_ids: self.column_ids.clone(),
            row_labels,
            column_labels: self.column_labels.clone(),
        })
    }

    /// Returns `true` when the two matrices have identical values,
    /// ignoring ids and labels.
    pub fn values_eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl PartialEq for NamedMatrix {
    /// Shape, ids, and values; labels are display-only.
    fn eq(&self, other: &Self) -> bool {
        self.row_ids == other.row_ids
            && self.column_ids == other.column_ids
            && self.values == other.values
    }
}

impl Eq for NamedMatrix {}

impl fmt::Display for NamedMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.values.rows().into_iter().enumerate() {
            write!(f, "{:>8} |", self.row_labels[i])?;
            for v in row {
                write!(f, " {v:>4}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use ndarray::arr2;

    fn ids(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    fn sample() -> NamedMatrix {
        NamedMatrix::new(
            arr2(&[[1, 0, -1], [0, 2, 1]]),
            ids("S", 2),
            ids("J", 3),
        )
        .expect("valid matrix")
    }

    #[test]
    fn new_rejects_wrong_row_id_count() {
        let err = NamedMatrix::new(arr2(&[[1, 2], [3, 4]]), ids("S", 3), ids("J", 2))
            .expect_err("must fail");
        assert!(matches!(
            err,
            NamedMatrixError::IdCountMismatch {
                axis: MatrixAxis::Row,
                ..
            }
        ));
    }

    #[test]
    fn new_rejects_duplicate_column_id() {
        let err = NamedMatrix::new(
            arr2(&[[1, 2]]),
            ids("S", 1),
            vec!["J0".to_owned(), "J0".to_owned()],
        )
        .expect_err("must fail");
        assert!(matches!(
            err,
            NamedMatrixError::DuplicateId {
                axis: MatrixAxis::Column,
                ..
            }
        ));
    }

    #[test]
    fn equality_ignores_labels() {
        let a = sample();
        let b = sample()
            .with_labels(
                vec!["glucose".to_owned(), "atp".to_owned()],
                vec!["v1".to_owned(), "v2".to_owned(), "v3".to_owned()],
            )
            .expect("valid labels");
        assert_eq!(a, b);
    }

    #[test]
    fn equality_requires_same_ids() {
        let a = sample();
        let b = NamedMatrix::new(
            arr2(&[[1, 0, -1], [0, 2, 1]]),
            ids("X", 2),
            ids("J", 3),
        )
        .expect("valid matrix");
        assert_ne!(a, b);
    }

    #[test]
    fn sub_matrix_reorders_by_request() {
        let m = sample();
        let sub = m
            .sub_matrix(Some(&["S1", "S0"]), Some(&["J2", "J0"]))
            .expect("ids exist");
        assert_eq!(sub.values(), &arr2(&[[1, 0], [-1, 1]]));
        assert_eq!(sub.row_ids(), &["S1".to_owned(), "S0".to_owned()]);
    }

    #[test]
    fn sub_matrix_unknown_id_errors() {
        let m = sample();
        let err = m
            .sub_matrix(Some(&["S9"]), None)
            .expect_err("S9 does not exist");
        assert!(matches!(
            err,
            NamedMatrixError::UnknownId {
                axis: MatrixAxis::Row,
                ..
            }
        ));
    }

    #[test]
    fn transpose_swaps_axes() {
        let m = sample();
        let t = m.transpose();
        assert_eq!(t.nrows(), 3);
        assert_eq!(t.ncols(), 2);
        assert_eq!(t.row_ids(), m.column_ids());
        assert_eq!(t.values()[[0, 1]], m.values()[[1, 0]]);
    }

    #[test]
    fn transpose_round_trips() {
        let m = sample();
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn hstack_concatenates_columns() {
        let a = sample();
        let b = NamedMatrix::new(arr2(&[[5], [6]]), ids("S", 2), vec!["K0".to_owned()])
            .expect("valid matrix");
        let joined = a.hstack(&b).expect("compatible");
        assert_eq!(joined.ncols(), 4);
        assert_eq!(joined.values()[[1, 3]], 6);
        assert_eq!(joined.column_ids().last().map(String::as_str), Some("K0"));
    }

    #[test]
    fn hstack_rejects_column_id_collision() {
        let a = sample();
        let b = NamedMatrix::new(arr2(&[[5], [6]]), ids("S", 2), vec!["J0".to_owned()])
            .expect("valid matrix");
        let err = a.hstack(&b).expect_err("J0 collides");
        assert!(matches!(err, NamedMatrixError::IdCollision { .. }));
    }

    #[test]
    fn vstack_rejects_differing_column_ids() {
        let a = sample();
        let b = NamedMatrix::new(arr2(&[[1, 2, 3]]), vec!["S9".to_owned()], ids("K", 3))
            .expect("valid matrix");
        let err = a.vstack(&b).expect_err("column ids differ");
        assert!(matches!(err, NamedMatrixError::ShapeMismatch { .. }));
    }

    #[test]
    fn vstack_concatenates_rows() {
        let a = sample();
        let b = NamedMatrix::new(arr2(&[[7, 8, 9]]), vec!["S9".to_owned()], ids("J", 3))
            .expect("valid matrix");
        let joined = a.vstack(&b).expect("compatible");
        assert_eq!(joined.nrows(), 3);
        assert_eq!(joined.values()[[2, 0]], 7);
    }

    #[test]
    fn template_requires_same_shape() {
        let m = sample();
        let err = m.template(arr2(&[[1, 2], [3, 4]])).expect_err("shape differs");
        assert!(matches!(err, NamedMatrixError::ShapeMismatch { .. }));
    }

    #[test]
    fn template_keeps_ids() {
        let m = sample();
        let t = m
            .template(arr2(&[[0, 0, 0], [0, 0, 0]]))
            .expect("same shape");
        assert_eq!(t.row_ids(), m.row_ids());
        assert_eq!(t.values()[[0, 0]], 0);
    }

    #[test]
    fn select_repeats_indices() {
        let m = sample();
        let s = m.select(&[0, 0], &[1]);
        assert_eq!(s.values(), &arr2(&[[0], [0]]));
    }
}
