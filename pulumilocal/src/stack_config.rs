//! Stack configuration file locations.
//!
//! Pulumi keeps per-stack settings in `Pulumi.<stack>.yaml` next to the
//! project file. This module resolves those paths and copies them for the
//! shadowing strategies. Contents are never interpreted here; all writes go
//! through the wrapped tool's `config` subcommands.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// File name prefix of stack configuration files.
pub const CONFIG_PREFIX: &str = "Pulumi";

/// Returns the configuration file name for `stack`.
///
/// Fully qualified stack names (`org/project/stack`) use their last segment.
///
/// # Examples
///
/// ```
/// use pulumilocal::stack_config::config_file_name;
///
/// assert_eq!(config_file_name("dev"), "Pulumi.dev.yaml");
/// assert_eq!(config_file_name("acme/web/prod"), "Pulumi.prod.yaml");
/// ```
#[must_use]
pub fn config_file_name(stack: &str) -> String {
    let short = stack.rsplit('/').next().unwrap_or(stack);
    format!("{CONFIG_PREFIX}.{short}.yaml")
}

/// Expand tilde (~) to the home directory.
///
/// Handles `~` and `~/path`; other paths are returned unchanged.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let Some(path_str) = path.to_str() else {
        return Ok(path.to_path_buf());
    };

    if path_str != "~" && !path_str.starts_with("~/") {
        return Ok(path.to_path_buf());
    }

    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "Cannot determine home directory".to_string(),
    })?;

    if path_str == "~" {
        Ok(home)
    } else {
        Ok(home.join(&path_str[2..]))
    }
}

/// Resolves `path` against `base` after tilde expansion.
///
/// # Errors
///
/// Returns an error if tilde expansion fails.
pub fn resolve_against(base: &Path, path: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base.join(expanded))
    }
}

/// Resolves the configuration file the stack's settings live in.
///
/// An explicit absolute path is used as-is; an explicit relative path is
/// taken relative to `cwd`; otherwise the file is `<cwd>/Pulumi.<stack>.yaml`.
///
/// # Errors
///
/// Returns an error if tilde expansion fails.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use pulumilocal::stack_config::resolve_config_path;
///
/// let cwd = Path::new("/work");
/// assert_eq!(
///     resolve_config_path(cwd, "dev", None).unwrap(),
///     Path::new("/work/Pulumi.dev.yaml")
/// );
/// assert_eq!(
///     resolve_config_path(cwd, "dev", Some(Path::new("/etc/stack.yaml"))).unwrap(),
///     Path::new("/etc/stack.yaml")
/// );
/// ```
pub fn resolve_config_path(cwd: &Path, stack: &str, explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => resolve_against(cwd, path),
        None => Ok(cwd.join(config_file_name(stack))),
    }
}

/// Minimal stack configuration document used to seed an empty shadow.
#[derive(Debug, Default, Serialize)]
struct StackConfigDocument {
    config: BTreeMap<String, String>,
}

/// Writes an empty stack configuration document to `path`.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized or written.
pub fn seed_empty(path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(&StackConfigDocument::default())?;
    fs::write(path, yaml)?;
    Ok(())
}

/// Copies `source` to `target`, seeding an empty document when the source
/// does not exist.
///
/// # Errors
///
/// Returns an error if the copy or the seed write fails.
pub fn copy_or_seed(source: &Path, target: &Path) -> Result<()> {
    if source.exists() {
        log::debug!("copying {} to {}", source.display(), target.display());
        fs::copy(source, target)?;
        Ok(())
    } else {
        log::debug!(
            "{} does not exist, seeding empty {}",
            source.display(),
            target.display()
        );
        seed_empty(target)
    }
}

/// Copies `source` to `target` like [`copy_or_seed`], but never replaces an
/// existing `target` with an empty document when `source` is missing.
///
/// # Errors
///
/// Returns an error if the copy or the seed write fails.
pub fn copy_or_keep(source: &Path, target: &Path) -> Result<()> {
    if !source.exists() && target.exists() {
        log::debug!(
            "{} does not exist, keeping {}",
            source.display(),
            target.display()
        );
        return Ok(());
    }
    copy_or_seed(source, target)
}
