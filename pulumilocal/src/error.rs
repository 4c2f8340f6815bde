//! Error types for the pulumilocal library.
//!
//! This module provides the error hierarchy for every stage of a wrapped
//! run, using `thiserror` for ergonomic error handling. Each variant knows
//! which process exit code it should surface as.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a pulumilocal error.
///
/// # Examples
///
/// ```
/// use pulumilocal::{Error, Result};
///
/// fn example_operation() -> Result<String> {
///     Ok("dev".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the pulumilocal library.
#[derive(Debug, Error)]
pub enum Error {
    /// The wrapped binary could not be located on the search path.
    #[error("unable to find '{binary}' on PATH: {reason}")]
    BinaryNotFound {
        /// The binary name or path that was searched for.
        binary: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// The wrapped tool exited non-zero during a step that must succeed.
    #[error("`{command}` failed with exit code {exit_code}{}", stderr_suffix(.stderr))]
    ToolFailed {
        /// The subcommand that was invoked, for diagnostics.
        command: String,
        /// The wrapped tool's exit code, propagated unchanged.
        exit_code: i32,
        /// The wrapped tool's captured stderr.
        stderr: String,
    },

    /// The current stack could not be determined.
    #[error("unable to determine the current stack{}", stderr_suffix(.stderr))]
    StackResolution {
        /// The wrapped tool's captured stderr.
        stderr: String,
    },

    /// The user declined to overwrite an existing stack configuration.
    #[error("refusing to overwrite {} without confirmation", path.display())]
    ConfirmationDeclined {
        /// The stack configuration file that would have been mutated.
        path: PathBuf,
    },

    /// The shadow configuration file would replace the user's own file.
    #[error(
        "stack configuration {} is the reserved shadow file; choose another strategy or stack",
        path.display()
    )]
    ShadowCollision {
        /// The colliding path.
        path: PathBuf,
    },

    /// The provider schema did not contain the endpoints configuration type.
    #[error("malformed provider schema: {reason}")]
    MalformedSchema {
        /// What was missing or malformed.
        reason: String,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A configuration value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON produced by the wrapped tool could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML document could not be serialized.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

impl Error {
    /// Returns the process exit code this error should terminate with.
    ///
    /// Wrapped-tool failures propagate the tool's own code; everything else
    /// exits with 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulumilocal::Error;
    ///
    /// let err = Error::ToolFailed {
    ///     command: "about".to_string(),
    ///     exit_code: 255,
    ///     stderr: String::new(),
    /// };
    /// assert_eq!(err.exit_code(), 255);
    /// ```
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolFailed { exit_code, .. } => *exit_code,
            _ => 1,
        }
    }

    /// Check if error came from the wrapped tool itself.
    #[must_use]
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, Self::ToolFailed { .. })
    }
}
