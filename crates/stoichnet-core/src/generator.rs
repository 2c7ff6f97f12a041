/// Random network generation by reaction-type mix.
///
/// Each reaction is drawn from a weighted mix of six elementary types
/// (boundary input/output and the four uni/bi combinations); participant
/// species are drawn uniformly with replacement, so repeated draws stack
/// into coefficients above one. Generation is deterministic for a fixed
/// seed.
use std::fmt;

use ndarray::Array2;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::network::{NetworkError, ReactionNetwork};

// ---------------------------------------------------------------------------
// Reaction types and mix
// ---------------------------------------------------------------------------

/// The elementary reaction shapes a generated reaction can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReactionType {
    /// `-> S`
    InputBoundary,
    /// `S ->`
    OutputBoundary,
    /// `S -> S`
    UniUni,
    /// `S -> S + S`
    UniBi,
    /// `S + S -> S`
    BiUni,
    /// `S + S -> S + S`
    BiBi,
}

impl ReactionType {
    /// Number of reactant and product slots.
    fn arity(self) -> (usize, usize) {
        match self {
            Self::InputBoundary => (0, 1),
            Self::OutputBoundary => (1, 0),
            Self::UniUni => (1, 1),
            Self::UniBi => (1, 2),
            Self::BiUni => (2, 1),
            Self::BiBi => (2, 2),
        }
    }
}

/// Relative weights of the reaction types. Weights need not sum to one;
/// they are normalized at draw time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionTypeMix {
    /// Weight of `-> S`.
    pub input_boundary: f64,
    /// Weight of `S ->`.
    pub output_boundary: f64,
    /// Weight of `S -> S`.
    pub uni_uni: f64,
    /// Weight of `S -> S + S`.
    pub uni_bi: f64,
    /// Weight of `S + S -> S`.
    pub bi_uni: f64,
    /// Weight of `S + S -> S + S`.
    pub bi_bi: f64,
}

impl Default for ReactionTypeMix {
    fn default() -> Self {
        Self {
            input_boundary: 0.10,
            output_boundary: 0.14,
            uni_uni: 0.34,
            uni_bi: 0.13,
            bi_uni: 0.19,
            bi_bi: 0.07,
        }
    }
}

impl ReactionTypeMix {
    fn weights(&self) -> [(ReactionType, f64); 6] {
        [
            (ReactionType::InputBoundary, self.input_boundary),
            (ReactionType::OutputBoundary, self.output_boundary),
            (ReactionType::UniUni, self.uni_uni),
            (ReactionType::UniBi, self.uni_bi),
            (ReactionType::BiUni, self.bi_uni),
            (ReactionType::BiBi, self.bi_bi),
        ]
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> ReactionType {
        let weights = self.weights();
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        let mut ticket = rng.gen_range(0.0..total);
        for (ty, w) in weights {
            if ticket < w {
                return ty;
            }
            ticket -= w;
        }
        ReactionType::BiBi
    }
}

// ---------------------------------------------------------------------------
// GeneratorError / GeneratorConfig
// ---------------------------------------------------------------------------

/// Failures of network generation.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// Reactions were requested but there are no species to connect.
    NoSpecies,
    /// Every mix weight is zero or negative.
    EmptyMix,
    /// The generated matrices failed network construction.
    Network(NetworkError),
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpecies => f.write_str("cannot generate reactions without species"),
            Self::EmptyMix => f.write_str("reaction type mix has no positive weight"),
            Self::Network(e) => write!(f, "generated network is invalid: {e}"),
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            Self::NoSpecies | Self::EmptyMix => None,
        }
    }
}

impl From<NetworkError> for GeneratorError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

/// Parameters for one generated network.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Network name.
    pub name: String,
    /// Number of species.
    pub num_species: usize,
    /// Number of reactions.
    pub num_reactions: usize,
    /// Reaction type weights.
    pub mix: ReactionTypeMix,
    /// RNG seed; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            name: "random".to_owned(),
            num_species: 10,
            num_reactions: 10,
            mix: ReactionTypeMix::default(),
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generates a random reaction network per the configuration.
///
/// # Errors
///
/// Returns [`GeneratorError::NoSpecies`] when reactions are requested
/// for an empty species set and [`GeneratorError::EmptyMix`] when the
/// mix has no positive weight.
pub fn random_network(config: &GeneratorConfig) -> Result<ReactionNetwork, GeneratorError> {
    if config.num_species == 0 && config.num_reactions > 0 {
        return Err(GeneratorError::NoSpecies);
    }
    if config.mix.weights().iter().map(|(_, w)| w).sum::<f64>() <= 0.0 {
        return Err(GeneratorError::EmptyMix);
    }
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut reactant = Array2::<i64>::zeros((config.num_species, config.num_reactions));
    let mut product = Array2::<i64>::zeros((config.num_species, config.num_reactions));
    for j in 0..config.num_reactions {
        let (num_reactants, num_products) = config.mix.draw(&mut rng).arity();
        for _ in 0..num_reactants {
            let s = rng.gen_range(0..config.num_species);
            reactant[[s, j]] += 1;
        }
        for _ in 0..num_products {
            let s = rng.gen_range(0..config.num_species);
            product[[s, j]] += 1;
        }
    }
    Ok(ReactionNetwork::from_arrays(
        config.name.clone(),
        reactant,
        product,
    )?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn generation_is_deterministic_per_seed() {
        let config = GeneratorConfig {
            seed: Some(42),
            ..GeneratorConfig::default()
        };
        let a = random_network(&config).expect("generates");
        let b = random_network(&config).expect("generates");
        assert!(a.matrices_eq(&b));
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = random_network(&GeneratorConfig {
            seed: Some(1),
            ..GeneratorConfig::default()
        })
        .expect("generates");
        let b = random_network(&GeneratorConfig {
            seed: Some(2),
            ..GeneratorConfig::default()
        })
        .expect("generates");
        // 10x10 networks from different seeds colliding is negligible.
        assert!(!a.matrices_eq(&b));
    }

    #[test]
    fn coefficients_respect_arity_bounds() {
        let net = random_network(&GeneratorConfig {
            num_species: 5,
            num_reactions: 40,
            seed: Some(9),
            ..GeneratorConfig::default()
        })
        .expect("generates");
        for j in 0..net.num_reactions() {
            let reactants: i64 = (0..net.num_species())
                .map(|i| net.reactant().values()[[i, j]])
                .sum();
            let products: i64 = (0..net.num_species())
                .map(|i| net.product().values()[[i, j]])
                .sum();
            assert!(reactants <= 2, "at most bimolecular");
            assert!(products <= 2, "at most bimolecular");
            assert!(reactants + products >= 1, "no empty reaction");
        }
    }

    #[test]
    fn no_species_with_reactions_errors() {
        let err = random_network(&GeneratorConfig {
            num_species: 0,
            num_reactions: 3,
            seed: Some(0),
            ..GeneratorConfig::default()
        })
        .expect_err("no species to connect");
        assert_eq!(err, GeneratorError::NoSpecies);
    }

    #[test]
    fn empty_mix_errors() {
        let mix = ReactionTypeMix {
            input_boundary: 0.0,
            output_boundary: 0.0,
            uni_uni: 0.0,
            uni_bi: 0.0,
            bi_uni: 0.0,
            bi_bi: 0.0,
        };
        let err = random_network(&GeneratorConfig {
            mix,
            seed: Some(0),
            ..GeneratorConfig::default()
        })
        .expect_err("no positive weight");
        assert_eq!(err, GeneratorError::EmptyMix);
    }
}
