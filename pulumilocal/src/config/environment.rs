//! Environment variable handling for run settings.
//!
//! This module reads the environment variables that drive a run and turns
//! them into an immutable [`Settings`]. Lookups go through a caller-supplied
//! function so tests never touch the real process environment.

use crate::config::settings::{ConfigStrategy, Settings};
use crate::error::{Error, Result};

/// Wrapped binary name or path.
pub const PULUMI_CMD: &str = "PULUMI_CMD";
/// Reserved stack name.
pub const STACK_NAME: &str = "PULUMILOCAL_STACK_NAME";
/// Strategy selector.
pub const CONFIG_STRATEGY: &str = "PULUMILOCAL_CONFIG_STRATEGY";
/// Combined endpoint URL.
pub const AWS_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";
/// Discrete emulator hostname.
pub const LOCALSTACK_HOSTNAME: &str = "LOCALSTACK_HOSTNAME";
/// Discrete emulator port.
pub const EDGE_PORT: &str = "EDGE_PORT";
/// TLS flag.
pub const USE_SSL: &str = "USE_SSL";
/// Region default.
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
/// Dry-run flag.
pub const DRY_RUN: &str = "DRY_RUN";
/// Global non-interactive flag.
pub const NON_INTERACTIVE: &str = "PULUMI_NON_INTERACTIVE";
/// Confirmation text used instead of reading stdin.
pub const CONFIRM: &str = "PULUMILOCAL_CONFIRM";
/// Log mode.
pub const LOG_MODE: &str = "PULUMILOCAL_LOG_MODE";

/// Builds [`Settings`] from environment variables.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use pulumilocal::config::{ConfigStrategy, EnvironmentConfig};
///
/// let vars = HashMap::from([
///     ("PULUMILOCAL_CONFIG_STRATEGY", "separation"),
///     ("EDGE_PORT", "4510"),
/// ]);
/// let settings = EnvironmentConfig::load(|key| vars.get(key).map(|v| v.to_string())).unwrap();
/// assert_eq!(settings.strategy, ConfigStrategy::Separation);
/// assert_eq!(settings.endpoint.port, 4510);
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Loads settings from the real process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds an invalid value.
    pub fn from_process_env() -> Result<Settings> {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Loads settings using `lookup` to read each variable.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `EDGE_PORT` is not a valid port or a boolean
    /// flag holds an unrecognized value.
    pub fn load<F>(lookup: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut settings = Settings::default();

        if let Some(cmd) = get(PULUMI_CMD) {
            settings.pulumi_cmd = cmd;
        }

        if let Some(stack) = get(STACK_NAME) {
            settings.reserved_stack = stack;
        }

        if let Some(raw) = get(CONFIG_STRATEGY) {
            match ConfigStrategy::parse(&raw) {
                Some(strategy) => settings.strategy = strategy,
                None => settings.unrecognized_strategy = Some(raw),
            }
        }

        settings.endpoint.endpoint_url = get(AWS_ENDPOINT_URL);

        if let Some(hostname) = get(LOCALSTACK_HOSTNAME) {
            settings.endpoint.hostname = hostname;
        }

        if let Some(port) = get(EDGE_PORT) {
            settings.endpoint.port = Self::parse_port(EDGE_PORT, &port)?;
        }

        if let Some(val) = get(USE_SSL) {
            settings.endpoint.use_ssl = Self::parse_bool(USE_SSL, &val)?;
        }

        if let Some(region) = get(AWS_DEFAULT_REGION) {
            settings.region = region;
        }

        if let Some(val) = get(DRY_RUN) {
            settings.dry_run = Self::parse_bool(DRY_RUN, &val)?;
        }

        if let Some(val) = get(NON_INTERACTIVE) {
            settings.non_interactive = Self::parse_bool(NON_INTERACTIVE, &val)?;
        }

        settings.confirm_text = lookup(CONFIRM);
        settings.log_mode = get(LOG_MODE);

        Ok(settings)
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_port(field: &str, s: &str) -> Result<u16> {
        match s.trim().parse::<u16>() {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!("Invalid port number: '{s}'"),
            }),
        }
    }
}
