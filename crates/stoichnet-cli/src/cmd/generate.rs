//! Implementation of `stoichnet generate`.
//!
//! Generates a seeded random network and prints its JSON record to
//! stdout, pretty-printed in human mode and compact in JSON mode.
use stoichnet_core::{GeneratorConfig, NetworkRecord, random_network};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Runs the `generate` command.
///
/// # Errors
///
/// Returns [`CliError::InvalidRequest`] when the generator parameters
/// are unsatisfiable and [`CliError::IoError`] when serialization fails.
pub fn run(
    name: &str,
    num_species: usize,
    num_reactions: usize,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = GeneratorConfig {
        name: name.to_owned(),
        num_species,
        num_reactions,
        seed,
        ..GeneratorConfig::default()
    };
    let network = random_network(&config).map_err(|e| CliError::InvalidRequest {
        detail: e.to_string(),
    })?;
    let record = NetworkRecord::from_network(&network);

    let text = match format {
        OutputFormat::Human => serde_json::to_string_pretty(&record),
        OutputFormat::Json => serde_json::to_string(&record),
    }
    .map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })?;
    println!("{text}");
    Ok(())
}
