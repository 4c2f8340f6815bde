//! Invocation of the wrapped Pulumi binary.
//!
//! Every interaction with the wrapped tool goes through the [`ToolRunner`]
//! trait and yields a [`ToolOutput`] carrying the exit code and captured
//! streams. Failures are propagated by checking the exit code and returning
//! an error, never by unwinding.
//!
//! Two implementations are provided:
//! - [`ProcessRunner`]: spawns the real binary
//! - [`ScriptedRunner`]: replays canned outputs and records calls, for tests

pub mod process;
pub mod scripted;

use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub use process::{locate_binary, ProcessRunner};
pub use scripted::ScriptedRunner;

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// Capture stdout and stderr into the returned [`ToolOutput`].
    Capture,
    /// Let the child write straight to the terminal.
    Inherit,
}

/// A single invocation of the wrapped tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Arguments passed after the binary name.
    pub args: Vec<String>,
    /// Working directory for the child, if different from ours.
    pub cwd: Option<PathBuf>,
    /// Stream handling.
    pub stdio: StdioMode,
}

impl ToolCommand {
    /// Creates a command whose output is captured.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulumilocal::tool::{StdioMode, ToolCommand};
    ///
    /// let cmd = ToolCommand::captured(["stack", "--show-name"]);
    /// assert_eq!(cmd.args, vec!["stack", "--show-name"]);
    /// assert_eq!(cmd.stdio, StdioMode::Capture);
    /// ```
    pub fn captured<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            stdio: StdioMode::Capture,
        }
    }

    /// Creates a command that writes straight to the terminal.
    pub fn inherited<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stdio: StdioMode::Inherit,
            ..Self::captured(args)
        }
    }

    /// Sets the working directory.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Appends arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns true if the arguments start with `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        self.args.len() >= prefix.len()
            && self.args.iter().zip(prefix).all(|(a, p)| a.as_str() == *p)
    }

    /// A short label for diagnostics: the leading non-flag arguments.
    #[must_use]
    pub fn label(&self) -> String {
        self.args
            .iter()
            .take_while(|arg| !arg.starts_with('-'))
            .take(2)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

/// Result of one invocation of the wrapped tool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolOutput {
    /// The child's exit code.
    pub exit_code: i32,
    /// Captured stdout (empty when inherited).
    pub stdout: String,
    /// Captured stderr (empty when inherited).
    pub stderr: String,
}

impl ToolOutput {
    /// A successful output with the given stdout.
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given code and stderr.
    #[must_use]
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns true if the exit code is zero.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// Converts a non-zero exit into [`Error::ToolFailed`].
    ///
    /// # Errors
    ///
    /// Returns `ToolFailed` carrying the child's exit code and stderr if the
    /// invocation did not succeed.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulumilocal::tool::{ToolCommand, ToolOutput};
    ///
    /// let cmd = ToolCommand::captured(["about", "--json"]);
    /// let err = ToolOutput::failure(7, "boom").check(&cmd).unwrap_err();
    /// assert_eq!(err.exit_code(), 7);
    /// ```
    pub fn check(self, command: &ToolCommand) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::ToolFailed {
                command: command.label(),
                exit_code: self.exit_code,
                stderr: self.stderr,
            })
        }
    }
}

/// Runs commands against the wrapped tool.
///
/// Calls are blocking and sequential; there is no timeout layer.
pub trait ToolRunner {
    /// Runs a single command to completion.
    ///
    /// # Errors
    ///
    /// Returns an error only when the child cannot be started. A child that
    /// runs and exits non-zero is reported through [`ToolOutput::exit_code`].
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;
}
