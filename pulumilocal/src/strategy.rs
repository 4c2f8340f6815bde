//! Configuration strategy engine.
//!
//! Decides which stack and configuration file the reconciler writes to, and
//! what the forwarded command is redirected to:
//!
//! - **overwrite**: the stack's own file, after interactive confirmation
//! - **override**: a shadow copy under the reserved stack's file name,
//!   removed when the run ends
//! - **separation**: the reserved stack and its file, kept across runs
//!
//! The shadow created by `override` is owned by a [`ShadowGuard`], so it is
//! deleted on every path out of the run, including early errors.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::{ConfigStrategy, Settings};
use crate::error::{Error, Result};
use crate::invocation::Redirect;
use crate::logging::Logger;
use crate::prompt::{is_confirmed, Confirmer};
use crate::stack_config::{config_file_name, copy_or_keep, copy_or_seed};
use crate::tool::{ToolCommand, ToolRunner};

/// A deploying invocation with stack, directory and file resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSelection {
    /// The user's stack.
    pub stack: String,
    /// Absolute project directory.
    pub cwd: PathBuf,
    /// The user's stack configuration file.
    pub config_file: PathBuf,
    /// Whether prompts may be shown.
    pub interactive: bool,
}

/// Deletes the shadow configuration file when dropped.
#[derive(Debug)]
pub struct ShadowGuard {
    path: PathBuf,
}

impl ShadowGuard {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The shadow file this guard owns.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ShadowGuard {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => log::debug!("removed shadow config {}", self.path.display()),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => log::debug!(
                "failed to remove shadow config {}: {err}",
                self.path.display()
            ),
        }
    }
}

/// Where configuration writes land for this run.
#[derive(Debug)]
pub struct ConfigTarget {
    stack: String,
    config_file: PathBuf,
    redirect: Option<Redirect>,
    shadow: Option<ShadowGuard>,
}

impl ConfigTarget {
    /// Stack passed to `config` subcommands.
    #[must_use]
    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// File passed to `config` subcommands.
    #[must_use]
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Selector replacements for the forwarded command, if any.
    #[must_use]
    pub fn redirect(&self) -> Option<&Redirect> {
        self.redirect.as_ref()
    }

    /// The shadow file removed when this target is dropped, if any.
    #[must_use]
    pub fn shadow(&self) -> Option<&Path> {
        self.shadow.as_ref().map(ShadowGuard::path)
    }

    /// `--stack` and `--config-file` arguments for `config` subcommands.
    #[must_use]
    pub fn selector_args(&self) -> Vec<String> {
        vec![
            "--stack".to_string(),
            self.stack.clone(),
            "--config-file".to_string(),
            self.config_file.display().to_string(),
        ]
    }
}

/// Applies the selected [`ConfigStrategy`].
pub struct StrategyEngine<'a, R: ToolRunner + ?Sized> {
    runner: &'a R,
    settings: &'a Settings,
    logger: Logger,
}

impl<'a, R: ToolRunner + ?Sized> StrategyEngine<'a, R> {
    /// Creates an engine.
    #[must_use]
    pub fn new(runner: &'a R, settings: &'a Settings, logger: Logger) -> Self {
        Self {
            runner,
            settings,
            logger,
        }
    }

    /// Runs the overwrite confirmation gate.
    ///
    /// Only applies under `overwrite`, in interactive mode, when the stack's
    /// configuration file already exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfirmationDeclined`] for any answer other than a
    /// literal `yes`.
    pub fn confirm_overwrite(
        &self,
        selection: &StackSelection,
        confirmer: &dyn Confirmer,
    ) -> Result<()> {
        if self.settings.strategy != ConfigStrategy::Overwrite
            || !selection.interactive
            || !selection.config_file.exists()
        {
            return Ok(());
        }

        let question = format!(
            "{} will be modified to target the local emulator. Type 'yes' to continue:",
            selection.config_file.display()
        );
        let answer = confirmer.ask(&question)?;
        if is_confirmed(&answer) {
            Ok(())
        } else {
            Err(Error::ConfirmationDeclined {
                path: selection.config_file.clone(),
            })
        }
    }

    /// Resolves the configuration target for `selection`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shadow file would replace the user's own
    /// file, or if copying the configuration fails.
    pub fn apply(&self, selection: &StackSelection) -> Result<ConfigTarget> {
        self.logger
            .debug(&format!("applying {} strategy", self.settings.strategy));
        match self.settings.strategy {
            ConfigStrategy::Overwrite => Ok(ConfigTarget {
                stack: selection.stack.clone(),
                config_file: selection.config_file.clone(),
                redirect: None,
                shadow: None,
            }),
            ConfigStrategy::Override => self.apply_override(selection),
            ConfigStrategy::Separation => self.apply_separation(selection),
        }
    }

    fn reserved_path(&self, selection: &StackSelection) -> PathBuf {
        let dir = selection
            .config_file
            .parent()
            .map_or_else(|| selection.cwd.clone(), Path::to_path_buf);
        dir.join(config_file_name(&self.settings.reserved_stack))
    }

    fn apply_override(&self, selection: &StackSelection) -> Result<ConfigTarget> {
        let shadow_path = self.reserved_path(selection);
        if shadow_path == selection.config_file {
            return Err(Error::ShadowCollision { path: shadow_path });
        }

        let guard = ShadowGuard::new(shadow_path.clone());
        copy_or_seed(&selection.config_file, &shadow_path)?;
        self.logger
            .info(&format!("using shadow config {}", shadow_path.display()));

        Ok(ConfigTarget {
            stack: selection.stack.clone(),
            config_file: shadow_path.clone(),
            redirect: Some(Redirect {
                stack: None,
                config_file: shadow_path,
            }),
            shadow: Some(guard),
        })
    }

    fn apply_separation(&self, selection: &StackSelection) -> Result<ConfigTarget> {
        let reserved = self.settings.reserved_stack.clone();

        let init = ToolCommand::captured(["stack", "init", reserved.as_str(), "--no-select"])
            .with_cwd(&selection.cwd);
        let output = self.runner.run(&init)?;
        if !output.is_success() {
            self.logger.debug(&format!(
                "stack init {reserved} exited {} (ignored): {}",
                output.exit_code,
                output.stderr.trim()
            ));
        }

        let target = self.reserved_path(selection);
        if target != selection.config_file {
            copy_or_keep(&selection.config_file, &target)?;
        }
        self.logger.info(&format!(
            "using separate stack {reserved} with config {}",
            target.display()
        ));

        Ok(ConfigTarget {
            stack: reserved.clone(),
            config_file: target.clone(),
            redirect: Some(Redirect {
                stack: Some(reserved),
                config_file: target,
            }),
            shadow: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::MockConfirmer;
    use crate::tool::{ScriptedRunner, ToolOutput};
    use crate::LogLevel;
    use tempfile::{tempdir, TempDir};

    fn settings(strategy: ConfigStrategy) -> Settings {
        Settings {
            strategy,
            ..Settings::default()
        }
    }

    fn selection(dir: &TempDir, interactive: bool) -> StackSelection {
        StackSelection {
            stack: "dev".to_string(),
            cwd: dir.path().to_path_buf(),
            config_file: dir.path().join("Pulumi.dev.yaml"),
            interactive,
        }
    }

    fn quiet() -> Logger {
        Logger::new(LogLevel::Quiet)
    }

    #[test]
    fn test_overwrite_targets_original_file() {
        let dir = tempdir().unwrap();
        let runner = ScriptedRunner::new();
        let settings = settings(ConfigStrategy::Overwrite);
        let sel = selection(&dir, false);

        let target = StrategyEngine::new(&runner, &settings, quiet())
            .apply(&sel)
            .unwrap();
        assert_eq!(target.config_file(), sel.config_file);
        assert_eq!(target.stack(), "dev");
        assert!(target.redirect().is_none());
        assert!(target.shadow().is_none());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_confirmation_accepted() {
        let dir = tempdir().unwrap();
        let sel = selection(&dir, true);
        fs::write(&sel.config_file, "config: {}\n").unwrap();
        let runner = ScriptedRunner::new();
        let settings = settings(ConfigStrategy::Overwrite);

        let mut confirmer = MockConfirmer::new();
        confirmer
            .expect_ask()
            .times(1)
            .returning(|_| Ok("yes\n".to_string()));

        StrategyEngine::new(&runner, &settings, quiet())
            .confirm_overwrite(&sel, &confirmer)
            .unwrap();
    }

    #[test]
    fn test_confirmation_declined() {
        let dir = tempdir().unwrap();
        let sel = selection(&dir, true);
        fs::write(&sel.config_file, "config: {}\n").unwrap();
        let runner = ScriptedRunner::new();
        let settings = settings(ConfigStrategy::Overwrite);

        let mut confirmer = MockConfirmer::new();
        confirmer
            .expect_ask()
            .returning(|_| Ok("y".to_string()));

        let err = StrategyEngine::new(&runner, &settings, quiet())
            .confirm_overwrite(&sel, &confirmer)
            .unwrap_err();
        assert!(matches!(err, Error::ConfirmationDeclined { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_confirmation_skipped_when_not_needed() {
        let dir = tempdir().unwrap();
        let runner = ScriptedRunner::new();
        let mut confirmer = MockConfirmer::new();
        confirmer.expect_ask().never();

        // Interactive, but the file does not exist yet.
        let settings_overwrite = settings(ConfigStrategy::Overwrite);
        StrategyEngine::new(&runner, &settings_overwrite, quiet())
            .confirm_overwrite(&selection(&dir, true), &confirmer)
            .unwrap();

        // File exists, but the run is non-interactive.
        let sel = selection(&dir, false);
        fs::write(&sel.config_file, "config: {}\n").unwrap();
        StrategyEngine::new(&runner, &settings_overwrite, quiet())
            .confirm_overwrite(&sel, &confirmer)
            .unwrap();

        // Other strategies never touch the user's file.
        let settings_override = settings(ConfigStrategy::Override);
        StrategyEngine::new(&runner, &settings_override, quiet())
            .confirm_overwrite(&selection(&dir, true), &confirmer)
            .unwrap();
    }

    #[test]
    fn test_override_creates_and_removes_shadow() {
        let dir = tempdir().unwrap();
        let sel = selection(&dir, false);
        fs::write(&sel.config_file, "config:\n  aws:region: eu-west-1\n").unwrap();
        let runner = ScriptedRunner::new();
        let settings = settings(ConfigStrategy::Override);

        let target = StrategyEngine::new(&runner, &settings, quiet())
            .apply(&sel)
            .unwrap();
        let shadow = dir.path().join("Pulumi.localstack.yaml");

        assert_eq!(target.config_file(), shadow);
        assert_eq!(target.stack(), "dev");
        assert_eq!(target.shadow(), Some(shadow.as_path()));
        assert_eq!(
            target.redirect(),
            Some(&Redirect {
                stack: None,
                config_file: shadow.clone(),
            })
        );
        assert_eq!(
            fs::read_to_string(&shadow).unwrap(),
            "config:\n  aws:region: eu-west-1\n"
        );

        drop(target);
        assert!(!shadow.exists());
        assert!(sel.config_file.exists());
    }

    #[test]
    fn test_override_refuses_to_shadow_reserved_stack() {
        let dir = tempdir().unwrap();
        let mut sel = selection(&dir, false);
        sel.stack = "localstack".to_string();
        sel.config_file = dir.path().join("Pulumi.localstack.yaml");
        fs::write(&sel.config_file, "config: {}\n").unwrap();
        let runner = ScriptedRunner::new();
        let settings = settings(ConfigStrategy::Override);

        let err = StrategyEngine::new(&runner, &settings, quiet())
            .apply(&sel)
            .unwrap_err();
        assert!(matches!(err, Error::ShadowCollision { .. }));
        assert!(sel.config_file.exists());
    }

    #[test]
    fn test_separation_inits_stack_and_persists_copy() {
        let dir = tempdir().unwrap();
        let sel = selection(&dir, false);
        fs::write(&sel.config_file, "config: {}\n").unwrap();
        let runner = ScriptedRunner::new()
            .respond(&["stack", "init"], ToolOutput::failure(255, "already exists"));
        let settings = settings(ConfigStrategy::Separation);

        let target = StrategyEngine::new(&runner, &settings, quiet())
            .apply(&sel)
            .unwrap();
        let reserved = dir.path().join("Pulumi.localstack.yaml");

        assert_eq!(target.stack(), "localstack");
        assert_eq!(target.config_file(), reserved);
        assert!(target.shadow().is_none());
        assert_eq!(
            target.redirect(),
            Some(&Redirect {
                stack: Some("localstack".to_string()),
                config_file: reserved.clone(),
            })
        );

        let inits = runner.calls_matching(&["stack", "init", "localstack"]);
        assert_eq!(inits.len(), 1);
        assert_eq!(inits[0].cwd.as_deref(), Some(dir.path()));

        drop(target);
        assert!(reserved.exists());
    }

    #[test]
    fn test_separation_skips_copy_onto_itself() {
        let dir = tempdir().unwrap();
        let mut sel = selection(&dir, false);
        sel.stack = "localstack".to_string();
        sel.config_file = dir.path().join("Pulumi.localstack.yaml");
        fs::write(&sel.config_file, "config:\n  keep: me\n").unwrap();
        let runner = ScriptedRunner::new();
        let settings = settings(ConfigStrategy::Separation);

        let target = StrategyEngine::new(&runner, &settings, quiet())
            .apply(&sel)
            .unwrap();
        assert_eq!(target.config_file(), sel.config_file);
        assert_eq!(
            fs::read_to_string(&sel.config_file).unwrap(),
            "config:\n  keep: me\n"
        );
    }

    #[test]
    fn test_selector_args() {
        let dir = tempdir().unwrap();
        let runner = ScriptedRunner::new();
        let settings = settings(ConfigStrategy::Overwrite);
        let sel = selection(&dir, false);

        let target = StrategyEngine::new(&runner, &settings, quiet())
            .apply(&sel)
            .unwrap();
        assert_eq!(
            target.selector_args(),
            vec![
                "--stack".to_string(),
                "dev".to_string(),
                "--config-file".to_string(),
                sel.config_file.display().to_string(),
            ]
        );
    }

    #[test]
    fn test_separation_seeds_when_nothing_exists() {
        let dir = tempdir().unwrap();
        let sel = selection(&dir, false);
        let runner = ScriptedRunner::new();
        let settings = settings(ConfigStrategy::Separation);

        let target = StrategyEngine::new(&runner, &settings, quiet())
            .apply(&sel)
            .unwrap();

        let contents = fs::read_to_string(target.config_file()).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&contents).unwrap();
        assert!(parsed.get("config").is_some());
        assert!(!sel.config_file.exists());
    }

    #[test]
    fn test_separation_keeps_reserved_file_without_source() {
        let dir = tempdir().unwrap();
        let sel = selection(&dir, false);
        let reserved = dir.path().join("Pulumi.localstack.yaml");
        let saved = "encryptionsalt: v1:abc\nconfig:\n  aws:region: eu-west-1\n";
        fs::write(&reserved, saved).unwrap();
        let runner = ScriptedRunner::new();
        let settings = settings(ConfigStrategy::Separation);

        let target = StrategyEngine::new(&runner, &settings, quiet())
            .apply(&sel)
            .unwrap();

        assert_eq!(target.config_file(), reserved);
        assert_eq!(fs::read_to_string(&reserved).unwrap(), saved);
    }
}
