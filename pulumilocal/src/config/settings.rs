//! Run settings shared by every component.
//!
//! `Settings` is built exactly once per process (see
//! [`EnvironmentConfig`](super::EnvironmentConfig)) and handed down by
//! reference. No other module reads the process environment.

use std::fmt;

/// Default name of the wrapped binary.
pub const DEFAULT_PULUMI_CMD: &str = "pulumi";

/// Default name of the reserved stack used by `override` and `separation`.
pub const DEFAULT_RESERVED_STACK: &str = "localstack";

/// Default emulator hostname.
pub const DEFAULT_HOSTNAME: &str = "localhost";

/// Default emulator edge port.
pub const DEFAULT_EDGE_PORT: u16 = 4566;

/// Default AWS region written into stacks that have none.
pub const DEFAULT_REGION: &str = "us-east-1";

/// How the stack configuration file is targeted for the run.
///
/// # Examples
///
/// ```
/// use pulumilocal::config::ConfigStrategy;
///
/// assert_eq!(ConfigStrategy::parse("override"), Some(ConfigStrategy::Override));
/// assert_eq!(ConfigStrategy::parse("Override"), None);
/// assert_eq!(ConfigStrategy::default(), ConfigStrategy::Overwrite);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigStrategy {
    /// Write directly into the stack's own configuration file.
    #[default]
    Overwrite,
    /// Write into a temporary shadow copy that is removed after the run.
    Override,
    /// Write into a persistent reserved stack and its configuration file.
    Separation,
}

impl ConfigStrategy {
    /// Parses a strategy selector. Matching is case-sensitive.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "overwrite" => Some(Self::Overwrite),
            "override" => Some(Self::Override),
            "separation" => Some(Self::Separation),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Override => write!(f, "override"),
            Self::Separation => write!(f, "separation"),
        }
    }
}

/// Emulator endpoint inputs, before resolution into a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSettings {
    /// Combined endpoint URL; supplies host and port when present.
    pub endpoint_url: Option<String>,
    /// Discrete hostname.
    pub hostname: String,
    /// Discrete port.
    pub port: u16,
    /// Whether to use `https`.
    pub use_ssl: bool,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_EDGE_PORT,
            use_ssl: false,
        }
    }
}

/// Immutable settings for one run.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Wrapped binary name or path.
    pub pulumi_cmd: String,
    /// Reserved stack name used by `override` and `separation`.
    pub reserved_stack: String,
    /// Selected configuration strategy.
    pub strategy: ConfigStrategy,
    /// A strategy selector that was not recognized, kept for the
    /// fallback notice.
    pub unrecognized_strategy: Option<String>,
    /// Emulator endpoint inputs.
    pub endpoint: EndpointSettings,
    /// Region default for stacks without one.
    pub region: String,
    /// Skip the forwarded deploying command.
    pub dry_run: bool,
    /// Global non-interactive mode.
    pub non_interactive: bool,
    /// Confirmation text supplied up front instead of prompting.
    pub confirm_text: Option<String>,
    /// Requested log mode.
    pub log_mode: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pulumi_cmd: DEFAULT_PULUMI_CMD.to_string(),
            reserved_stack: DEFAULT_RESERVED_STACK.to_string(),
            strategy: ConfigStrategy::default(),
            unrecognized_strategy: None,
            endpoint: EndpointSettings::default(),
            region: DEFAULT_REGION.to_string(),
            dry_run: false,
            non_interactive: false,
            confirm_text: None,
            log_mode: None,
        }
    }
}
