//! Build script for pulumilocal-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

const ENVIRONMENT_HELP: &str = "\
Environment:
  PULUMI_CMD                    Wrapped binary name or path [default: pulumi]
  PULUMILOCAL_STACK_NAME        Reserved stack for override/separation [default: localstack]
  PULUMILOCAL_CONFIG_STRATEGY   overwrite, override or separation [default: overwrite]
  AWS_ENDPOINT_URL              Combined emulator endpoint URL
  LOCALSTACK_HOSTNAME           Emulator hostname [default: localhost]
  EDGE_PORT                     Emulator port [default: 4566]
  USE_SSL                       Use https for the emulator endpoint
  AWS_DEFAULT_REGION            Region for stacks without one [default: us-east-1]
  DRY_RUN                       Reconcile configuration but skip deploying commands
  PULUMI_NON_INTERACTIVE        Never prompt; forward --non-interactive
  PULUMILOCAL_CONFIRM           Answer to the overwrite confirmation prompt
  PULUMILOCAL_LOG_MODE          quiet, normal or verbose [default: normal]";

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
fn build_cli() -> Command {
    Command::new("pulumilocal")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run Pulumi against a local AWS emulator")
        .long_about(
            "Wraps the pulumi CLI. Deploying commands (up, destroy, preview, cancel) \
             first point the stack's AWS provider endpoints at a local emulator; \
             every other command is forwarded unchanged.",
        )
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("args")
                .value_name("PULUMI_ARGS")
                .help("Arguments forwarded to the wrapped pulumi binary")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true),
        )
        .after_long_help(ENVIRONMENT_HELP)
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("pulumilocal.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
}
