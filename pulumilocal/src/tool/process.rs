//! Real process execution of the wrapped binary.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::tool::{StdioMode, ToolCommand, ToolOutput, ToolRunner};

/// Locates the wrapped binary.
///
/// Names containing a path separator are checked directly; bare names are
/// searched for on `PATH`.
///
/// # Errors
///
/// Returns [`Error::BinaryNotFound`] if the binary cannot be found.
pub fn locate_binary(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|err| Error::BinaryNotFound {
        binary: name.to_string(),
        reason: err.to_string(),
    })
}

/// Runs the wrapped binary as a child process.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    binary: PathBuf,
}

impl ProcessRunner {
    /// Creates a runner for an already located binary.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Returns the binary this runner spawns.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        log::debug!("running {} {}", self.binary.display(), command);

        let mut child = Command::new(&self.binary);
        child.args(&command.args).stdin(Stdio::inherit());
        if let Some(cwd) = &command.cwd {
            child.current_dir(cwd);
        }

        let spawn_error = |err: std::io::Error| {
            if err.kind() == ErrorKind::NotFound {
                Error::BinaryNotFound {
                    binary: self.binary.display().to_string(),
                    reason: err.to_string(),
                }
            } else {
                Error::Io(err)
            }
        };

        match command.stdio {
            StdioMode::Capture => {
                let output = child.output().map_err(spawn_error)?;
                Ok(ToolOutput {
                    exit_code: output.status.code().unwrap_or(1),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
            StdioMode::Inherit => {
                let status = child
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(spawn_error)?;
                Ok(ToolOutput {
                    exit_code: status.code().unwrap_or(1),
                    ..ToolOutput::default()
                })
            }
        }
    }
}
