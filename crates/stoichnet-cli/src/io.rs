/// File and stdin reading for the `stoichnet` binary.
///
/// `stoichnet-core` never touches the filesystem; all reading happens
/// here and every I/O failure is converted to a [`CliError`] with exit
/// code 2.
use std::io::Read as _;
use std::path::Path;

use crate::cli::PathOrStdin;
use crate::error::CliError;

/// Reads the entire contents of `source` into a `String`.
///
/// # Errors
///
/// Returns [`CliError::FileNotFound`], [`CliError::PermissionDenied`],
/// [`CliError::StdinReadError`], or [`CliError::IoError`] depending on
/// what failed.
pub fn read_input(source: &PathOrStdin) -> Result<String, CliError> {
    match source {
        PathOrStdin::Path(path) => read_file(path),
        PathOrStdin::Stdin => read_stdin(),
    }
}

/// A display label for an input source, for error messages.
pub fn source_label(source: &PathOrStdin) -> String {
    match source {
        PathOrStdin::Path(path) => path.display().to_string(),
        PathOrStdin::Stdin => "stdin".to_owned(),
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CliError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => CliError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        },
    })
}

fn read_stdin() -> Result<String, CliError> {
    let mut content = String::new();
    std::io::stdin()
        .lock()
        .read_to_string(&mut content)
        .map_err(|e| CliError::StdinReadError {
            detail: e.to_string(),
        })?;
    Ok(content)
}
