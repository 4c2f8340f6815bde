#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # pulumilocal
//!
//! A library for running Pulumi stacks against a local AWS emulator.
//!
//! Deploying subcommands (`up`, `destroy`, `preview`, `cancel`) are
//! intercepted: the stack's configuration is pointed at the emulator
//! endpoint before the original command is forwarded. Everything else is
//! passed through untouched.
//!
//! ## Core Types
//!
//! - [`Dispatcher`]: runs one wrapped invocation end to end
//! - [`Settings`] and [`EnvironmentConfig`]: immutable run configuration
//! - [`StrategyEngine`] and [`ConfigTarget`]: where configuration is written
//! - [`Reconciler`]: the `config` writes that redirect the provider
//! - [`ToolRunner`]: the seam every call to the wrapped tool goes through
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use pulumilocal::{resolve_endpoint, EndpointSettings, Logger};
//!
//! let endpoint = EndpointSettings::default();
//! assert_eq!(
//!     resolve_endpoint(&endpoint, &Logger::default()),
//!     "http://localhost:4566"
//! );
//! ```

pub mod config;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod invocation;
pub mod logging;
pub mod prompt;
pub mod reconcile;
pub mod schema;
pub mod stack_config;
pub mod strategy;
pub mod tool;

// Re-export key types at crate root for convenience
pub use config::{ConfigStrategy, EndpointSettings, EnvironmentConfig, Settings};
pub use dispatch::Dispatcher;
pub use endpoint::resolve_endpoint;
pub use error::{Error, Result};
pub use invocation::{Invocation, Redirect};
pub use logging::{init_logger, LogLevel, Logger};
pub use prompt::{Confirmer, PresetConfirmer, StdinConfirmer};
pub use reconcile::{ConfigWrite, Reconciler};
pub use schema::SchemaIntrospector;
pub use strategy::{ConfigTarget, StackSelection, StrategyEngine};
pub use tool::{ProcessRunner, ScriptedRunner, ToolCommand, ToolOutput, ToolRunner};
