//! Implementation of `stoichnet compare <reference> <target>`.
//!
//! Decodes two network records and runs the structural identity
//! pipeline.
//!
//! Exit codes:
//! - 0 = identical (a verified relabeling was found)
//! - 1 = not identical, or the search hit a fatal limit
//! - 2 = input could not be read or decoded
use stoichnet_core::{
    Identity, IdentityConfig, MatchMode, NetworkRecord, ReactionNetwork,
    StructuralIdentityResult, is_structurally_identical,
};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Arguments of one `compare` invocation, after clap parsing.
pub struct CompareArgs {
    /// Identity notion to decide.
    pub identity: Identity,
    /// Exact or subset matching.
    pub match_mode: MatchMode,
    /// Assignment budget per axis.
    pub max_assignments: usize,
    /// Report every verified relabeling.
    pub find_all: bool,
    /// RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

fn decode(content: &str, source: &str) -> Result<ReactionNetwork, CliError> {
    NetworkRecord::from_json(content)
        .and_then(|record| record.to_network())
        .map_err(|e| CliError::ParseFailed {
            source: source.to_owned(),
            detail: e.to_string(),
        })
}

fn print_human(
    reference: &ReactionNetwork,
    target: &ReactionNetwork,
    args: &CompareArgs,
    result: &StructuralIdentityResult,
) {
    println!(
        "reference: {} ({} species, {} reactions)",
        reference.name(),
        reference.num_species(),
        reference.num_reactions()
    );
    println!(
        "target:    {} ({} species, {} reactions)",
        target.name(),
        target.num_species(),
        target.num_reactions()
    );
    let verdict = if result.is_identical {
        "identical"
    } else {
        "not identical"
    };
    println!("{verdict} ({}, {})", args.identity, args.match_mode);
    if !result.is_identical && result.is_truncated {
        println!("search was truncated; a matching relabeling may have been missed");
    }
    for pair in &result.assignment_pairs {
        println!(
            "species {:?} reactions {:?}",
            pair.species_assignment, pair.reaction_assignment
        );
    }
}

fn print_json(args: &CompareArgs, result: &StructuralIdentityResult) {
    let value = serde_json::json!({
        "is_identical": result.is_identical,
        "identity": args.identity.to_string(),
        "match_mode": args.match_mode.to_string(),
        "is_truncated": result.is_truncated,
        "assignment_pairs": result.assignment_pairs,
        "num_species_candidates": result.num_species_candidates,
        "num_reaction_candidates": result.num_reaction_candidates,
        "species_compression_factors": result.species_compression_factors,
        "reaction_compression_factors": result.reaction_compression_factors,
    });
    println!("{value}");
}

/// Runs the `compare` command.
///
/// The verdict is printed to stdout in the requested format; a negative
/// verdict additionally surfaces as [`CliError::NotIdentical`] so `main`
/// exits with code 1.
///
/// # Errors
///
/// Returns [`CliError::ParseFailed`] on undecodable input,
/// [`CliError::SearchFailed`] when the pipeline hits a fatal limit, and
/// [`CliError::NotIdentical`] when no relabeling was verified.
pub fn run(
    reference_content: &str,
    reference_source: &str,
    target_content: &str,
    target_source: &str,
    args: &CompareArgs,
    format: OutputFormat,
) -> Result<(), CliError> {
    let reference = decode(reference_content, reference_source)?;
    let target = decode(target_content, target_source)?;

    let config = IdentityConfig {
        identity: args.identity,
        match_mode: args.match_mode,
        max_num_assignment: args.max_assignments,
        find_all: args.find_all,
        seed: args.seed,
    };
    let result = is_structurally_identical(&reference, &target, &config)
        .map_err(|e| CliError::SearchFailed {
            detail: e.to_string(),
        })?;

    match format {
        OutputFormat::Human => print_human(&reference, &target, args, &result),
        OutputFormat::Json => print_json(args, &result),
    }

    if result.is_identical {
        Ok(())
    } else {
        Err(CliError::NotIdentical)
    }
}
