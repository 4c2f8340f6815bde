//! CLI structure.
//!
//! The proxy owns no flags of its own: every argument, including `--help`
//! and `--version`, belongs to the wrapped tool and is collected verbatim.

use clap::Parser;
use std::ffi::OsString;

/// Run Pulumi against a local AWS emulator.
#[derive(Parser, Debug)]
#[command(name = "pulumilocal")]
#[command(
    about = "Run Pulumi against a local AWS emulator",
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Arguments forwarded to the wrapped pulumi binary
    #[arg(
        value_name = "PULUMI_ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

impl Cli {
    /// Parses `argv` (program name first).
    ///
    /// clap treats a leading `--` as its own delimiter and drops it, so that
    /// case bypasses clap and the `--` is forwarded with everything after it.
    pub fn parse_argv<I, T>(argv: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        if argv.get(1).is_some_and(|arg| arg == "--") {
            let args = argv[1..]
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect();
            return Self { args };
        }
        Self::parse_from(argv)
    }
}
