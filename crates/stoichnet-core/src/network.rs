/// Reaction networks: paired reactant and product stoichiometry matrices
/// with derived classification views and structural hashes.
///
/// A [`ReactionNetwork`] owns three [`NamedMatrix`] values (reactant,
/// product, and their difference, the net stoichiometry) plus an eagerly
/// computed [`NetworkClassification`] holding the single- and
/// pair-criteria classifications of every matrix in both orientations.
/// Weak and strong structural hashes are derived once at construction.
use std::fmt;

use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::assignment::AssignmentPair;
use crate::criteria::{CriteriaVector, PairCriteriaMatrix, SingleCriteriaMatrix};
use crate::ident_hash::{combine_order_independent, row_order_independent_hash};
use crate::named_matrix::{MatrixAxis, NamedMatrix, NamedMatrixError};

// ---------------------------------------------------------------------------
// NetworkError
// ---------------------------------------------------------------------------

/// Errors produced when constructing or transforming a network.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Reactant and product matrices differ in shape.
    ShapeMismatch {
        /// Shape of the reactant matrix.
        reactant: (usize, usize),
        /// Shape of the product matrix.
        product: (usize, usize),
    },
    /// Reactant and product matrices carry different ids on an axis.
    IdMismatch {
        /// Axis on which the ids differ.
        axis: MatrixAxis,
    },
    /// An assignment vector does not fit the network's dimensions.
    AssignmentLength {
        /// Axis being reindexed.
        axis: MatrixAxis,
        /// Axis extent.
        expected: usize,
        /// Assignment vector length.
        actual: usize,
    },
    /// An assignment index is out of bounds or repeated.
    InvalidAssignment {
        /// Axis being reindexed.
        axis: MatrixAxis,
        /// The offending index.
        index: usize,
    },
    /// An underlying matrix operation failed.
    Matrix(NamedMatrixError),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { reactant, product } => write!(
                f,
                "reactant matrix is {}x{} but product matrix is {}x{}",
                reactant.0, reactant.1, product.0, product.1
            ),
            Self::IdMismatch { axis } => {
                write!(f, "reactant and product {axis} ids differ")
            }
            Self::AssignmentLength {
                axis,
                expected,
                actual,
            } => write!(
                f,
                "{axis} assignment has {actual} entries, expected {expected}"
            ),
            Self::InvalidAssignment { axis, index } => {
                write!(f, "invalid {axis} assignment index {index}")
            }
            Self::Matrix(e) => write!(f, "matrix operation failed: {e}"),
        }
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Matrix(e) => Some(e),
            Self::ShapeMismatch { .. }
            | Self::IdMismatch { .. }
            | Self::AssignmentLength { .. }
            | Self::InvalidAssignment { .. } => None,
        }
    }
}

impl From<NamedMatrixError> for NetworkError {
    fn from(e: NamedMatrixError) -> Self {
        Self::Matrix(e)
    }
}

// ---------------------------------------------------------------------------
// Classification views
// ---------------------------------------------------------------------------

/// Which of the network's matrices a classification view describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    /// The reactant coefficient matrix.
    Reactant,
    /// The product coefficient matrix.
    Product,
    /// The net stoichiometry matrix (product minus reactant).
    Stoichiometry,
}

/// Which axis forms the rows of a classification view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Rows are species, columns are reactions.
    Species,
    /// Rows are reactions, columns are species (the transposed view).
    Reaction,
}

/// Single- and pair-criteria classification of one matrix orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixClassification {
    /// Per-row predicate histograms.
    pub single: SingleCriteriaMatrix,
    /// Per-entry predicate indices for joint pair queries.
    pub pair: PairCriteriaMatrix,
}

impl MatrixClassification {
    fn classify(values: &Array2<i64>, criteria: &CriteriaVector) -> Self {
        Self {
            single: SingleCriteriaMatrix::classify(values, criteria),
            pair: PairCriteriaMatrix::classify(values, criteria),
        }
    }
}

/// All six classification views of a network, computed once at
/// construction: three matrices, each in both orientations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkClassification {
    reactant_species: MatrixClassification,
    reactant_reaction: MatrixClassification,
    product_species: MatrixClassification,
    product_reaction: MatrixClassification,
    stoichiometry_species: MatrixClassification,
    stoichiometry_reaction: MatrixClassification,
}

impl NetworkClassification {
    fn build(
        reactant: &Array2<i64>,
        product: &Array2<i64>,
        stoichiometry: &Array2<i64>,
        criteria: &CriteriaVector,
    ) -> Self {
        let transposed = |m: &Array2<i64>| m.t().to_owned();
        Self {
            reactant_species: MatrixClassification::classify(reactant, criteria),
            reactant_reaction: MatrixClassification::classify(&transposed(reactant), criteria),
            product_species: MatrixClassification::classify(product, criteria),
            product_reaction: MatrixClassification::classify(&transposed(product), criteria),
            stoichiometry_species: MatrixClassification::classify(stoichiometry, criteria),
            stoichiometry_reaction: MatrixClassification::classify(
                &transposed(stoichiometry),
                criteria,
            ),
        }
    }

    /// The view for one matrix in one orientation.
    pub fn view(&self, kind: MatrixKind, orientation: Orientation) -> &MatrixClassification {
        match (kind, orientation) {
            (MatrixKind::Reactant, Orientation::Species) => &self.reactant_species,
            (MatrixKind::Reactant, Orientation::Reaction) => &self.reactant_reaction,
            (MatrixKind::Product, Orientation::Species) => &self.product_species,
            (MatrixKind::Product, Orientation::Reaction) => &self.product_reaction,
            (MatrixKind::Stoichiometry, Orientation::Species) => &self.stoichiometry_species,
            (MatrixKind::Stoichiometry, Orientation::Reaction) => &self.stoichiometry_reaction,
        }
    }
}

// ---------------------------------------------------------------------------
// ReactionNetwork
// ---------------------------------------------------------------------------

/// A reaction network: reactant and product coefficient matrices over the
/// same species (rows) and reactions (columns), with derived
/// classification and structural hashes.
#[derive(Debug, Clone)]
pub struct ReactionNetwork {
    name: String,
    reactant: NamedMatrix,
    product: NamedMatrix,
    stoichiometry: NamedMatrix,
    criteria: CriteriaVector,
    classification: NetworkClassification,
    weak_hash: u64,
    strong_hash: u64,
}

impl ReactionNetwork {
    /// Constructs a network from reactant and product matrices.
    ///
    /// The matrices must share their shape and their row and column ids.
    /// The net stoichiometry, the classification views, and both hashes
    /// are computed here.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::ShapeMismatch`] or
    /// [`NetworkError::IdMismatch`] when the two matrices disagree.
    pub fn new(
        name: impl Into<String>,
        reactant: NamedMatrix,
        product: NamedMatrix,
        criteria: CriteriaVector,
    ) -> Result<Self, NetworkError> {
        if reactant.values().dim() != product.values().dim() {
            return Err(NetworkError::ShapeMismatch {
                reactant: reactant.values().dim(),
                product: product.values().dim(),
            });
        }
        if reactant.row_ids() != product.row_ids() {
            return Err(NetworkError::IdMismatch {
                axis: MatrixAxis::Row,
            });
        }
        if reactant.column_ids() != product.column_ids() {
            return Err(NetworkError::IdMismatch {
                axis: MatrixAxis::Column,
            });
        }
        let net = product.values() - reactant.values();
        let stoichiometry = reactant.template(net)?;
        let classification = NetworkClassification::build(
            reactant.values(),
            product.values(),
            stoichiometry.values(),
            &criteria,
        );
        let weak_hash = combine_order_independent(&[
            row_order_independent_hash(
                classification
                    .view(MatrixKind::Stoichiometry, Orientation::Species)
                    .single
                    .counts(),
            ),
            row_order_independent_hash(
                classification
                    .view(MatrixKind::Stoichiometry, Orientation::Reaction)
                    .single
                    .counts(),
            ),
        ]);
        let strong_hash = combine_order_independent(&[
            row_order_independent_hash(
                classification
                    .view(MatrixKind::Reactant, Orientation::Species)
                    .single
                    .counts(),
            ),
            row_order_independent_hash(
                classification
                    .view(MatrixKind::Reactant, Orientation::Reaction)
                    .single
                    .counts(),
            ),
            row_order_independent_hash(
                classification
                    .view(MatrixKind::Product, Orientation::Species)
                    .single
                    .counts(),
            ),
            row_order_independent_hash(
                classification
                    .view(MatrixKind::Product, Orientation::Reaction)
                    .single
                    .counts(),
            ),
        ]);
        Ok(Self {
            name: name.into(),
            reactant,
            product,
            stoichiometry,
            criteria,
            classification,
            weak_hash,
            strong_hash,
        })
    }

    /// Constructs a network from raw arrays with generated species ids
    /// `S0..` and reaction ids `J0..`, using the default criteria.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::ShapeMismatch`] when the arrays differ in
    /// shape.
    pub fn from_arrays(
        name: impl Into<String>,
        reactant: Array2<i64>,
        product: Array2<i64>,
    ) -> Result<Self, NetworkError> {
        if reactant.dim() != product.dim() {
            return Err(NetworkError::ShapeMismatch {
                reactant: reactant.dim(),
                product: product.dim(),
            });
        }
        let species: Vec<String> = (0..reactant.nrows()).map(|i| format!("S{i}")).collect();
        let reactions: Vec<String> = (0..reactant.ncols()).map(|i| format!("J{i}")).collect();
        let reactant = NamedMatrix::new(reactant, species.clone(), reactions.clone())?;
        let product = NamedMatrix::new(product, species, reactions)?;
        Self::new(name, reactant, product, CriteriaVector::default())
    }

    /// The network's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The reactant coefficient matrix.
    pub fn reactant(&self) -> &NamedMatrix {
        &self.reactant
    }

    /// The product coefficient matrix.
    pub fn product(&self) -> &NamedMatrix {
        &self.product
    }

    /// The net stoichiometry matrix (product minus reactant).
    pub fn stoichiometry(&self) -> &NamedMatrix {
        &self.stoichiometry
    }

    /// The criteria vector used for classification.
    pub fn criteria(&self) -> &CriteriaVector {
        &self.criteria
    }

    /// Number of species (rows).
    pub fn num_species(&self) -> usize {
        self.reactant.nrows()
    }

    /// Number of reactions (columns).
    pub fn num_reactions(&self) -> usize {
        self.reactant.ncols()
    }

    /// The eagerly computed classification views.
    pub fn classification(&self) -> &NetworkClassification {
        &self.classification
    }

    /// Structural hash over the net stoichiometry. Equal weak hashes are
    /// necessary, not sufficient, for weak identity.
    pub fn weak_hash(&self) -> u64 {
        self.weak_hash
    }

    /// Structural hash over the reactant and product matrices. Equal
    /// strong hashes are necessary, not sufficient, for strong identity.
    pub fn strong_hash(&self) -> u64 {
        self.strong_hash
    }

    /// `true` when both networks have identical reactant and product
    /// values, ignoring ids and names.
    pub fn matrices_eq(&self, other: &Self) -> bool {
        self.reactant.values_eq(other.reactant())
            && self.product.values_eq(other.product())
    }

    /// `true` when both networks have identical net stoichiometry values.
    pub fn stoichiometry_eq(&self, other: &Self) -> bool {
        self.stoichiometry.values_eq(other.stoichiometry())
    }

    fn check_injective(
        axis: MatrixAxis,
        indices: &[usize],
        extent: usize,
    ) -> Result<(), NetworkError> {
        let mut seen = vec![false; extent];
        for &i in indices {
            if i >= extent || seen[i] {
                return Err(NetworkError::InvalidAssignment { axis, index: i });
            }
            seen[i] = true;
        }
        Ok(())
    }

    fn reindexed(&self, pair: &AssignmentPair) -> Result<Self, NetworkError> {
        Self::check_injective(
            MatrixAxis::Row,
            &pair.species_assignment,
            self.num_species(),
        )?;
        Self::check_injective(
            MatrixAxis::Column,
            &pair.reaction_assignment,
            self.num_reactions(),
        )?;
        let reactant = self
            .reactant
            .select(&pair.species_assignment, &pair.reaction_assignment);
        let product = self
            .product
            .select(&pair.species_assignment, &pair.reaction_assignment);
        Self::new(self.name.clone(), reactant, product, self.criteria.clone())
    }

    /// Applies a full relabeling: species `i` of the result is species
    /// `pair.species_assignment[i]` of `self`, likewise for reactions.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::AssignmentLength`] when either vector does
    /// not cover its axis and [`NetworkError::InvalidAssignment`] on an
    /// out-of-bounds or repeated index.
    pub fn permute(&self, pair: &AssignmentPair) -> Result<Self, NetworkError> {
        if pair.species_assignment.len() != self.num_species() {
            return Err(NetworkError::AssignmentLength {
                axis: MatrixAxis::Row,
                expected: self.num_species(),
                actual: pair.species_assignment.len(),
            });
        }
        if pair.reaction_assignment.len() != self.num_reactions() {
            return Err(NetworkError::AssignmentLength {
                axis: MatrixAxis::Column,
                expected: self.num_reactions(),
                actual: pair.reaction_assignment.len(),
            });
        }
        self.reindexed(pair)
    }

    /// Extracts the subnetwork induced by the given species and reaction
    /// indices. The vectors may cover any subset of the axes but must be
    /// injective.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidAssignment`] on an out-of-bounds or
    /// repeated index.
    pub fn subnetwork(&self, pair: &AssignmentPair) -> Result<Self, NetworkError> {
        self.reindexed(pair)
    }

    /// Applies a uniformly random relabeling, returning the permuted
    /// network and the assignment that produced it.
    ///
    /// # Errors
    ///
    /// Propagates construction errors from the permuted matrices; with a
    /// valid network those cannot occur.
    pub fn random_permutation<R: Rng>(
        &self,
        rng: &mut R,
    ) -> Result<(Self, AssignmentPair), NetworkError> {
        let mut species: Vec<usize> = (0..self.num_species()).collect();
        let mut reactions: Vec<usize> = (0..self.num_reactions()).collect();
        species.shuffle(rng);
        reactions.shuffle(rng);
        let pair = AssignmentPair::new(species, reactions);
        let permuted = self.permute(&pair)?;
        Ok((permuted, pair))
    }

    /// Produces a randomly relabeled network whose reactant/product split
    /// is also re-randomized: the same random catalytic coefficient is
    /// added to both sides of each entry, so only the net stoichiometry
    /// is preserved. The result is weakly identical to `self` but in
    /// general not strongly identical.
    ///
    /// # Errors
    ///
    /// Propagates construction errors from the rebuilt matrices; with a
    /// valid network those cannot occur.
    pub fn random_weak_variant<R: Rng>(
        &self,
        rng: &mut R,
    ) -> Result<(Self, AssignmentPair), NetworkError> {
        let (permuted, pair) = self.random_permutation(rng)?;
        let mut reactant = permuted.reactant.values().clone();
        let mut product = permuted.product.values().clone();
        for (r, p) in reactant.iter_mut().zip(product.iter_mut()) {
            let offset = rng.gen_range(0..=1i64);
            *r += offset;
            *p += offset;
        }
        let reactant = permuted.reactant.template(reactant)?;
        let product = permuted.product.template(product)?;
        let variant = Self::new(self.name.clone(), reactant, product, self.criteria.clone())?;
        Ok((variant, pair))
    }

    /// Formats one reaction as `id: reactants -> products`, omitting unit
    /// coefficients. `None` when the index is out of range.
    pub fn format_reaction(&self, index: usize) -> Option<String> {
        if index >= self.num_reactions() {
            return None;
        }
        let side = |matrix: &NamedMatrix| {
            let mut terms = Vec::new();
            for (i, id) in matrix.row_ids().iter().enumerate() {
                let coefficient = matrix.values()[[i, index]];
                if coefficient <= 0 {
                    continue;
                }
                if coefficient == 1 {
                    terms.push(id.clone());
                } else {
                    terms.push(format!("{coefficient} {id}"));
                }
            }
            terms.join(" + ")
        };
        Some(format!(
            "{}: {} -> {}",
            self.reactant.column_ids()[index],
            side(&self.reactant),
            side(&self.product)
        ))
    }
}

impl PartialEq for ReactionNetwork {
    /// Name, ids, and matrix values; derived fields follow from them.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.reactant == other.reactant
            && self.product == other.product
    }
}

impl Eq for ReactionNetwork {}

impl fmt::Display for ReactionNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} species, {} reactions)",
            self.name,
            self.num_species(),
            self.num_reactions()
        )?;
        for index in 0..self.num_reactions() {
            if let Some(line) = self.format_reaction(index) {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}
