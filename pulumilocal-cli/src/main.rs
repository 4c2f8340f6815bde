//! Main entry point for the pulumilocal CLI.
//!
//! Wraps the `pulumi` binary so that deploying commands (`up`, `destroy`,
//! `preview`, `cancel`) target a local AWS emulator. All arguments are
//! forwarded to the wrapped binary; its exit code becomes ours.

mod cli;
mod error;
mod utils;

use cli::Cli;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse_argv(std::env::args_os());

    // Handle errors and set exit code
    match utils::run(cli.args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
