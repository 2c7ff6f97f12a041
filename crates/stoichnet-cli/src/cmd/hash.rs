//! Implementation of `stoichnet hash <file>`.
//!
//! Decodes a network record and prints its weak and strong structural
//! hashes. Equal hashes are necessary but not sufficient for identity;
//! differing hashes definitively rule an exact match out.
use stoichnet_core::NetworkRecord;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Runs the `hash` command.
///
/// # Errors
///
/// Returns [`CliError::ParseFailed`] when the content is not a valid
/// network record.
pub fn run(content: &str, source: &str, format: OutputFormat) -> Result<(), CliError> {
    let network = NetworkRecord::from_json(content)
        .and_then(|record| record.to_network())
        .map_err(|e| CliError::ParseFailed {
            source: source.to_owned(),
            detail: e.to_string(),
        })?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} ({} species, {} reactions)",
                network.name(),
                network.num_species(),
                network.num_reactions()
            );
            println!("weak hash:   {:016x}", network.weak_hash());
            println!("strong hash: {:016x}", network.strong_hash());
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "name": network.name(),
                "num_species": network.num_species(),
                "num_reactions": network.num_reactions(),
                "weak_hash": format!("{:016x}", network.weak_hash()),
                "strong_hash": format!("{:016x}", network.strong_hash()),
            });
            println!("{value}");
        }
    }
    Ok(())
}
