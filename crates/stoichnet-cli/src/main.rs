use clap::Parser;

mod cli;
mod cmd;
mod error;
mod io;

use cli::{Cli, Command};
use error::CliError;

fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Compare {
            reference,
            target,
            identity,
            match_mode,
            max_assignments,
            find_all,
            seed,
        } => {
            let reference_content = io::read_input(&reference)?;
            let target_content = io::read_input(&target)?;
            let args = cmd::compare::CompareArgs {
                identity: identity.into(),
                match_mode: match_mode.into(),
                max_assignments,
                find_all,
                seed,
            };
            cmd::compare::run(
                &reference_content,
                &io::source_label(&reference),
                &target_content,
                &io::source_label(&target),
                &args,
                cli.format,
            )
        }
        Command::Hash { file } => {
            let content = io::read_input(&file)?;
            cmd::hash::run(&content, &io::source_label(&file), cli.format)
        }
        Command::Generate {
            species,
            reactions,
            name,
            seed,
        } => cmd::generate::run(&name, species, reactions, seed, cli.format),
        Command::Version => {
            println!("{}", stoichnet_core::version());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = dispatch(cli) {
        eprintln!("{}", e.message());
        std::process::exit(e.exit_code());
    }
}
