/// Flat serialization records for networks.
///
/// [`NetworkRecord`] is the wire form of a [`ReactionNetwork`]: ids and
/// dimensions verbatim, matrices flattened row-major into compact
/// whitespace-separated strings, criteria boundaries as a plain list.
/// Records round-trip through JSON via serde.
use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::criteria::{CriteriaError, CriteriaVector};
use crate::named_matrix::{NamedMatrix, NamedMatrixError};
use crate::network::{NetworkError, ReactionNetwork};

// ---------------------------------------------------------------------------
// RecordError
// ---------------------------------------------------------------------------

/// Errors produced when decoding a record back into a network.
#[derive(Debug)]
pub enum RecordError {
    /// A matrix string token is not an integer.
    ValueParse {
        /// Name of the record field being parsed.
        field: &'static str,
        /// The offending token.
        token: String,
    },
    /// A matrix string does not hold `num_species * num_reactions`
    /// values.
    LengthMismatch {
        /// Name of the record field being parsed.
        field: &'static str,
        /// Expected number of values.
        expected: usize,
        /// Number of values found.
        actual: usize,
    },
    /// The boundaries list is invalid.
    Criteria(CriteriaError),
    /// The ids are inconsistent with the dimensions.
    Matrix(NamedMatrixError),
    /// The decoded matrices do not form a valid network.
    Network(NetworkError),
    /// JSON (de)serialization failed.
    Json(serde_json::Error),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueParse { field, token } => {
                write!(f, "invalid integer {token:?} in field {field}")
            }
            Self::LengthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field {field} holds {actual} values, expected {expected}"
            ),
            Self::Criteria(e) => write!(f, "invalid criteria boundaries: {e}"),
            Self::Matrix(e) => write!(f, "invalid matrix data: {e}"),
            Self::Network(e) => write!(f, "invalid network data: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Criteria(e) => Some(e),
            Self::Matrix(e) => Some(e),
            Self::Network(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::ValueParse { .. } | Self::LengthMismatch { .. } => None,
        }
    }
}

impl From<CriteriaError> for RecordError {
    fn from(e: CriteriaError) -> Self {
        Self::Criteria(e)
    }
}

impl From<NamedMatrixError> for RecordError {
    fn from(e: NamedMatrixError) -> Self {
        Self::Matrix(e)
    }
}

impl From<NetworkError> for RecordError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ---------------------------------------------------------------------------
// NetworkRecord
// ---------------------------------------------------------------------------

/// Serializable flat form of a [`ReactionNetwork`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    /// Network name.
    pub name: String,
    /// Number of species (matrix rows).
    pub num_species: usize,
    /// Number of reactions (matrix columns).
    pub num_reactions: usize,
    /// Species ids, in row order.
    pub species_ids: Vec<String>,
    /// Reaction ids, in column order.
    pub reaction_ids: Vec<String>,
    /// Reactant matrix, row-major, whitespace separated.
    pub reactant: String,
    /// Product matrix, row-major, whitespace separated.
    pub product: String,
    /// Criteria boundaries used for classification.
    pub boundaries: Vec<f64>,
}

fn flatten_matrix(values: &Array2<i64>) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_matrix(
    field: &'static str,
    text: &str,
    nrows: usize,
    ncols: usize,
) -> Result<Array2<i64>, RecordError> {
    let values: Vec<i64> = text
        .split_whitespace()
        .map(|token| {
            token.parse::<i64>().map_err(|_| RecordError::ValueParse {
                field,
                token: token.to_owned(),
            })
        })
        .collect::<Result<_, _>>()?;
    if values.len() != nrows * ncols {
        return Err(RecordError::LengthMismatch {
            field,
            expected: nrows * ncols,
            actual: values.len(),
        });
    }
    Array2::from_shape_vec((nrows, ncols), values).map_err(|_| RecordError::LengthMismatch {
        field,
        expected: nrows * ncols,
        actual: 0,
    })
}

impl NetworkRecord {
    /// Flattens a network into its record form.
    pub fn from_network(network: &ReactionNetwork) -> Self {
        Self {
            name: network.name().to_owned(),
            num_species: network.num_species(),
            num_reactions: network.num_reactions(),
            species_ids: network.reactant().row_ids().to_vec(),
            reaction_ids: network.reactant().column_ids().to_vec(),
            reactant: flatten_matrix(network.reactant().values()),
            product: flatten_matrix(network.product().values()),
            boundaries: network.criteria().boundaries().to_vec(),
        }
    }

    /// Rebuilds the network this record describes.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] when the matrix strings, ids,
    /// boundaries, or dimensions are inconsistent.
    pub fn to_network(&self) -> Result<ReactionNetwork, RecordError> {
        let reactant_values =
            parse_matrix("reactant", &self.reactant, self.num_species, self.num_reactions)?;
        let product_values =
            parse_matrix("product", &self.product, self.num_species, self.num_reactions)?;
        let reactant = NamedMatrix::new(
            reactant_values,
            self.species_ids.clone(),
            self.reaction_ids.clone(),
        )?;
        let product = NamedMatrix::new(
            product_values,
            self.species_ids.clone(),
            self.reaction_ids.clone(),
        )?;
        let criteria = CriteriaVector::new(self.boundaries.clone())?;
        Ok(ReactionNetwork::new(
            self.name.clone(),
            reactant,
            product,
            criteria,
        )?)
    }

    /// Serializes the record to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Json`] on serialization failure.
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes a record from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Json`] on malformed input.
    pub fn from_json(text: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Serializes a batch of networks as a JSON array of records.
///
/// # Errors
///
/// Returns [`RecordError::Json`] on serialization failure.
pub fn networks_to_json(networks: &[ReactionNetwork]) -> Result<String, RecordError> {
    let records: Vec<NetworkRecord> = networks.iter().map(NetworkRecord::from_network).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Deserializes a JSON array of records back into networks.
///
/// # Errors
///
/// Returns a [`RecordError`] on malformed JSON or inconsistent records.
pub fn networks_from_json(text: &str) -> Result<Vec<ReactionNetwork>, RecordError> {
    let records: Vec<NetworkRecord> = serde_json::from_str(text)?;
    records.iter().map(NetworkRecord::to_network).collect()
}
