/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `stoichnet` binary.
/// Every variant maps to a stable exit code via [`CliError::exit_code`]:
///
/// - Exit code **2** — input failure: the tool could not read or decode
///   its input, or the request itself was invalid.
/// - Exit code **1** — logical failure: the tool ran to completion and
///   the answer is a well-defined negative (networks not identical) or
///   the search could not be carried out within its limits.
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions the `stoichnet` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// A generic I/O error not covered by the variants above.
    IoError {
        /// A human-readable label for the source.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The input could not be decoded into a network.
    ParseFailed {
        /// A human-readable label for the source.
        source: String,
        /// The underlying decode error message.
        detail: String,
    },

    /// The requested operation is invalid (bad generator parameters,
    /// conflicting arguments).
    InvalidRequest {
        /// A description of the problem.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// The networks are not structurally identical.
    ///
    /// The result has already been printed; this variant exists so `main`
    /// can exit with code 1 cleanly.
    NotIdentical,

    /// The identity search hit a fatal limit before completing.
    SearchFailed {
        /// A description of the limit that was hit.
        detail: String,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::ParseFailed { .. }
            | Self::InvalidRequest { .. } => 2,

            Self::NotIdentical | Self::SearchFailed { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error reading {source}: {detail}")
            }
            Self::ParseFailed { source, detail } => {
                format!("error: could not decode {source}: {detail}")
            }
            Self::InvalidRequest { detail } => {
                format!("error: invalid request: {detail}")
            }
            Self::NotIdentical => "networks are not structurally identical".to_owned(),
            Self::SearchFailed { detail } => {
                format!("error: identity search failed: {detail}")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::path::PathBuf;

    use super::*;

    #[test]
    fn file_not_found_is_exit_2() {
        let e = CliError::FileNotFound {
            path: PathBuf::from("net.json"),
        };
        assert_eq!(e.exit_code(), 2);
    }

    #[test]
    fn parse_failed_is_exit_2() {
        let e = CliError::ParseFailed {
            source: "net.json".to_owned(),
            detail: "bad token".to_owned(),
        };
        assert_eq!(e.exit_code(), 2);
    }

    #[test]
    fn not_identical_is_exit_1() {
        assert_eq!(CliError::NotIdentical.exit_code(), 1);
    }

    #[test]
    fn search_failed_is_exit_1() {
        let e = CliError::SearchFailed {
            detail: "limit".to_owned(),
        };
        assert_eq!(e.exit_code(), 1);
    }

    #[test]
    fn messages_are_prefixed() {
        let e = CliError::InvalidRequest {
            detail: "zero species".to_owned(),
        };
        assert_eq!(e.message(), "error: invalid request: zero species");
    }
}
