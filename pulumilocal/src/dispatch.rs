//! Top-level flow of one wrapped invocation.
//!
//! Parse → classify → resolve stack and configuration file → confirm →
//! apply strategy → reconcile → forward. Non-deploying subcommands go
//! straight to forward.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::invocation::{Invocation, Redirect};
use crate::logging::Logger;
use crate::prompt::Confirmer;
use crate::reconcile::Reconciler;
use crate::stack_config::{resolve_against, resolve_config_path};
use crate::strategy::{StackSelection, StrategyEngine};
use crate::tool::{ToolCommand, ToolRunner};

/// Drives a single run of the wrapped tool.
///
/// # Examples
///
/// ```
/// use pulumilocal::prompt::PresetConfirmer;
/// use pulumilocal::tool::{ScriptedRunner, ToolOutput};
/// use pulumilocal::{Dispatcher, LogLevel, Logger, Settings};
///
/// let runner = ScriptedRunner::new().respond(&["stack", "ls"], ToolOutput::failure(3, ""));
/// let settings = Settings::default();
/// let confirmer = PresetConfirmer::new("yes");
/// let dispatcher = Dispatcher::new(
///     &runner,
///     &settings,
///     Logger::new(LogLevel::Quiet),
///     &confirmer,
///     "/work",
/// );
///
/// assert_eq!(dispatcher.run(["stack", "ls"]).unwrap(), 3);
/// ```
pub struct Dispatcher<'a, R: ToolRunner + ?Sized> {
    runner: &'a R,
    settings: &'a Settings,
    logger: Logger,
    confirmer: &'a dyn Confirmer,
    working_dir: PathBuf,
}

impl<'a, R: ToolRunner + ?Sized> Dispatcher<'a, R> {
    /// Creates a dispatcher. `working_dir` is the directory relative
    /// `--cwd` values are resolved against.
    #[must_use]
    pub fn new(
        runner: &'a R,
        settings: &'a Settings,
        logger: Logger,
        confirmer: &'a dyn Confirmer,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            settings,
            logger,
            confirmer,
            working_dir: working_dir.into(),
        }
    }

    /// Runs the wrapped tool for `args` and returns the exit code to
    /// terminate with.
    ///
    /// The returned code is the forwarded command's own exit code, or 0
    /// for a dry run.
    ///
    /// # Errors
    ///
    /// Returns an error if any step before forwarding fails; its
    /// [`Error::exit_code`] is the code to exit with.
    pub fn run<I, S>(&self, args: I) -> Result<i32>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(value) = &self.settings.unrecognized_strategy {
            self.logger.warn(&format!(
                "unknown config strategy '{value}', falling back to {}",
                self.settings.strategy
            ));
        }

        let invocation = Invocation::parse(args);
        if !invocation.is_deploying() {
            self.logger.debug(&format!(
                "{} is not a deploying command, forwarding as-is",
                invocation.subcommand().unwrap_or("<none>")
            ));
            return self.forward(&invocation, None);
        }

        let selection = self.select(&invocation)?;
        self.logger.debug(&format!(
            "stack {} with config {}",
            selection.stack,
            selection.config_file.display()
        ));

        let engine = StrategyEngine::new(self.runner, self.settings, self.logger);
        engine.confirm_overwrite(&selection, self.confirmer)?;
        let target = engine.apply(&selection)?;

        Reconciler::new(self.runner, self.settings, self.logger)
            .reconcile(&target, &selection.cwd)?;

        if self.settings.dry_run {
            let args = invocation.forward_args(target.redirect(), self.settings.non_interactive);
            self.logger.notice(&format!(
                "Dry run: configuration updated, not running `{} {}`",
                self.settings.pulumi_cmd,
                args.join(" ")
            ));
            return Ok(0);
        }

        // `target` stays alive across the forward so a shadow outlives it.
        self.forward(&invocation, target.redirect())
    }

    fn forward(&self, invocation: &Invocation, redirect: Option<&Redirect>) -> Result<i32> {
        let args = invocation.forward_args(redirect, self.settings.non_interactive);
        let cmd = ToolCommand::inherited(args);
        self.logger.debug(&format!("forwarding: {cmd}"));
        Ok(self.runner.run(&cmd)?.exit_code)
    }

    fn select(&self, invocation: &Invocation) -> Result<StackSelection> {
        let cwd = match invocation.cwd() {
            Some(path) => resolve_against(&self.working_dir, path)?,
            None => self.working_dir.clone(),
        };

        let stack = match invocation.stack() {
            Some(stack) => stack.to_string(),
            None => self.current_stack(&cwd)?,
        };

        let config_file =
            resolve_config_path(&cwd, &stack, invocation.config_file().map(PathBuf::as_path))?;

        Ok(StackSelection {
            stack,
            cwd,
            config_file,
            interactive: !(invocation.non_interactive() || self.settings.non_interactive),
        })
    }

    fn current_stack(&self, cwd: &Path) -> Result<String> {
        let cmd = ToolCommand::captured(["stack", "--show-name"]).with_cwd(cwd);
        let output = self.runner.run(&cmd)?;
        let name = output.stdout.trim();
        if !output.is_success() || name.is_empty() {
            return Err(Error::StackResolution {
                stderr: output.stderr,
            });
        }
        Ok(name.to_string())
    }
}
