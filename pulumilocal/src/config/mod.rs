//! Configuration for a wrapped run.
//!
//! Settings come from environment variables only. They are read once at
//! startup into an immutable [`Settings`] value which is then passed by
//! reference to every component.
//!
//! # Examples
//!
//! ```
//! use pulumilocal::config::{ConfigStrategy, EnvironmentConfig};
//!
//! let settings = EnvironmentConfig::load(|_| None).unwrap();
//! assert_eq!(settings.strategy, ConfigStrategy::Overwrite);
//! assert_eq!(settings.endpoint.port, 4566);
//! ```

pub mod environment;
pub mod settings;

pub use environment::EnvironmentConfig;
pub use settings::{ConfigStrategy, EndpointSettings, Settings};
