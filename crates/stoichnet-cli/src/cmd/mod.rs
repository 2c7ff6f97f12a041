/// Command modules for the `stoichnet` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes the parsed arguments and returns `Ok(())` on success or
/// a [`crate::error::CliError`] on failure.
pub mod compare;
pub mod generate;
pub mod hash;
