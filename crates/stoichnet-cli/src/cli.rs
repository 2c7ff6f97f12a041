//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use stoichnet_core::{Identity, MatchMode};

/// A CLI argument that is either a filesystem path or the stdin sentinel
/// `"-"`.
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default).
    Human,
    /// Structured JSON.
    Json,
}

/// Identity notion selector for `compare`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum IdentityArg {
    /// Net stoichiometry up to relabeling (default).
    Weak,
    /// Reactant and product matrices under the same relabeling.
    Strong,
}

impl From<IdentityArg> for Identity {
    fn from(arg: IdentityArg) -> Self {
        match arg {
            IdentityArg::Weak => Identity::Weak,
            IdentityArg::Strong => Identity::Strong,
        }
    }
}

/// Match mode selector for `compare`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MatchModeArg {
    /// Whole-network match (default).
    Exact,
    /// Induced-subnetwork match.
    Subset,
}

impl From<MatchModeArg> for MatchMode {
    fn from(arg: MatchModeArg) -> Self {
        match arg {
            MatchModeArg::Exact => MatchMode::Exact,
            MatchModeArg::Subset => MatchMode::Subset,
        }
    }
}

/// All top-level subcommands exposed by the `stoichnet` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Decide structural identity of two network files.
    Compare {
        /// Path to the reference network JSON, or `-` for stdin.
        #[arg(value_name = "REFERENCE")]
        reference: PathOrStdin,
        /// Path to the target network JSON (cannot be `-` if REFERENCE is).
        #[arg(value_name = "TARGET")]
        target: PathOrStdin,
        /// Identity notion: weak (default) or strong.
        #[arg(long, default_value = "weak", value_enum)]
        identity: IdentityArg,
        /// Match mode: exact (default) or subset.
        #[arg(long, default_value = "exact", value_enum)]
        match_mode: MatchModeArg,
        /// Assignment budget per axis before random truncation.
        #[arg(long, default_value_t = stoichnet_core::DEFAULT_MAX_NUM_ASSIGNMENT)]
        max_assignments: usize,
        /// Report every verified relabeling instead of the first.
        #[arg(long)]
        find_all: bool,
        /// RNG seed for reproducible pruning and truncation.
        ///
        /// Can also be set via the `STOICHNET_SEED` environment variable.
        #[arg(long, env = "STOICHNET_SEED")]
        seed: Option<u64>,
    },

    /// Print the structural hashes of a network file.
    Hash {
        /// Path to a network JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// Generate a random network and print its JSON record.
    Generate {
        /// Number of species.
        #[arg(long, default_value_t = 10)]
        species: usize,
        /// Number of reactions.
        #[arg(long, default_value_t = 10)]
        reactions: usize,
        /// Network name.
        #[arg(long, default_value = "random")]
        name: String,
        /// RNG seed for reproducible generation.
        ///
        /// Can also be set via the `STOICHNET_SEED` environment variable.
        #[arg(long, env = "STOICHNET_SEED")]
        seed: Option<u64>,
    },

    /// Print the stoichnet-core library version.
    Version,
}

/// Root CLI struct for the `stoichnet` binary.
#[derive(Parser)]
#[command(
    name = "stoichnet",
    version,
    about = "Structural identity of reaction networks",
    long_about = "Decides whether two reaction networks are structurally \
                  identical up to species and reaction relabeling, under \
                  weak or strong identity and exact or subset matching."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,
}
