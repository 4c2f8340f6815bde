//! CLI-specific error types with exit codes.
//!
//! This module wraps library errors and the few failures that only the
//! process entry point can hit, mapping each to an exit code.

use pulumilocal::Error as LibError;
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// I/O error outside the library, e.g. reading the current directory.
    Io(std::io::Error),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - the wrapped tool's own code when one of its required steps failed
    /// - 1 for everything else (missing binary, configuration, stack
    ///   resolution, declined confirmation, I/O)
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(lib_err) => lib_err.exit_code(),
            CliError::Io(_) => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failure_keeps_tool_exit_code() {
        let err = CliError::from(LibError::ToolFailed {
            command: "config set-all".to_string(),
            exit_code: 255,
            stderr: String::new(),
        });
        assert_eq!(err.exit_code(), 255);
    }

    #[test]
    fn test_other_failures_exit_one() {
        let err = CliError::from(LibError::BinaryNotFound {
            binary: "pulumi".to_string(),
            reason: "cannot find binary path".to_string(),
        });
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("pulumi"));

        let err = CliError::from(std::io::Error::other("gone"));
        assert_eq!(err.exit_code(), 1);
    }
}
