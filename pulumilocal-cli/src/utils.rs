//! Utility functions for the process entry point.
//!
//! Builds the collaborators the dispatcher needs from the real process:
//! settings, the located binary, the confirmation source and the working
//! directory.

use crate::error::CliError;
use pulumilocal::tool::locate_binary;
use pulumilocal::{
    init_logger, Confirmer, Dispatcher, EnvironmentConfig, PresetConfirmer, ProcessRunner,
    Settings, StdinConfirmer,
};
use std::env;

/// Pick the confirmation source.
///
/// Confirmation text from the environment answers the prompt up front;
/// otherwise the user is asked on the terminal.
pub fn select_confirmer(settings: &Settings) -> Box<dyn Confirmer> {
    match &settings.confirm_text {
        Some(text) => Box::new(PresetConfirmer::new(text.clone())),
        None => Box::new(StdinConfirmer),
    }
}

/// Run one wrapped invocation with `args` and return the exit code.
pub fn run(args: Vec<String>) -> Result<i32, CliError> {
    let settings = EnvironmentConfig::from_process_env()?;
    let logger = init_logger(settings.log_mode.as_deref()).install();

    let binary = locate_binary(&settings.pulumi_cmd)?;
    log::debug!("wrapping {}", binary.display());
    let runner = ProcessRunner::new(binary);

    let confirmer = select_confirmer(&settings);
    let working_dir = env::current_dir()?;

    let code =
        Dispatcher::new(&runner, &settings, logger, confirmer.as_ref(), working_dir).run(args)?;
    Ok(code)
}
