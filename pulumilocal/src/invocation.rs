//! Parsing of the wrapped command line.
//!
//! Only the handful of selectors that decide whether and how to reconcile
//! are recognized: the subcommand, `--stack`, `--cwd`, `--config-file` and
//! `--non-interactive`. Everything else is carried through untouched.

use std::path::PathBuf;

/// Subcommands that talk to the cloud provider and need reconciliation.
pub const DEPLOYING_COMMANDS: [&str; 4] = ["up", "destroy", "preview", "cancel"];

/// Flag that disables interactive prompts in the wrapped tool.
pub const NON_INTERACTIVE_FLAG: &str = "--non-interactive";

/// Global flags of the wrapped tool that consume a separate value. They are
/// skipped so their values are not mistaken for the subcommand.
const OTHER_VALUE_FLAGS: [&str; 7] = [
    "--color",
    "-v",
    "--verbose",
    "--tracing",
    "--tracing-header",
    "--profiling",
    "--memprofilerate",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selector {
    Stack,
    Cwd,
    ConfigFile,
}

impl Selector {
    fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "-s" | "--stack" => Some(Self::Stack),
            "-C" | "--cwd" => Some(Self::Cwd),
            "--config-file" => Some(Self::ConfigFile),
            _ => None,
        }
    }

    fn long_flag(self) -> &'static str {
        match self {
            Self::Stack => "--stack",
            Self::Cwd => "--cwd",
            Self::ConfigFile => "--config-file",
        }
    }
}

/// Where a selector's value sits in the argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Occurrence {
    selector: Selector,
    index: usize,
    /// Text preceding the value inside the same argument (`--stack=`, `-s`).
    inline_prefix: Option<String>,
}

/// Replacement selectors applied when forwarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Stack to forward to instead of the original one.
    pub stack: Option<String>,
    /// Configuration file to forward instead of the original one.
    pub config_file: PathBuf,
}

/// The recognized subset of one command line, plus the full vector.
///
/// # Examples
///
/// ```
/// use pulumilocal::invocation::Invocation;
///
/// let inv = Invocation::parse(["--color", "never", "up", "-s", "dev", "--yes"]);
/// assert_eq!(inv.subcommand(), Some("up"));
/// assert_eq!(inv.stack(), Some("dev"));
/// assert!(inv.is_deploying());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<String>,
    subcommand: Option<String>,
    stack: Option<String>,
    cwd: Option<PathBuf>,
    config_file: Option<PathBuf>,
    non_interactive: bool,
    occurrences: Vec<Occurrence>,
    /// Index of a bare `--`, after which nothing is interpreted.
    terminator: Option<usize>,
}

impl Invocation {
    /// Parses an argument vector (without the program name).
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut parsed = Self {
            args: Vec::new(),
            subcommand: None,
            stack: None,
            cwd: None,
            config_file: None,
            non_interactive: false,
            occurrences: Vec::new(),
            terminator: None,
        };

        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();

            if arg == "--" {
                parsed.terminator = Some(i);
                break;
            }

            if arg == NON_INTERACTIVE_FLAG {
                parsed.non_interactive = true;
            } else if let Some(selector) = Selector::from_flag(arg) {
                if let Some(value) = args.get(i + 1) {
                    parsed.record(selector, i + 1, None, value);
                }
                i += 1;
            } else if let Some((flag, value)) =
                arg.split_once('=').filter(|_| arg.starts_with('-'))
            {
                if let Some(selector) = Selector::from_flag(flag) {
                    parsed.record(selector, i, Some(format!("{flag}=")), value);
                }
            } else if let Some((flag, value)) = attached_short(arg) {
                if let Some(selector) = Selector::from_flag(flag) {
                    parsed.record(selector, i, Some(flag.to_string()), value);
                }
            } else if OTHER_VALUE_FLAGS.contains(&arg) {
                i += 1;
            } else if !arg.starts_with('-') && parsed.subcommand.is_none() {
                parsed.subcommand = Some(arg.to_string());
            }

            i += 1;
        }

        parsed.args = args;
        parsed
    }

    fn record(&mut self, selector: Selector, index: usize, prefix: Option<String>, value: &str) {
        match selector {
            Selector::Stack => self.stack = Some(value.to_string()),
            Selector::Cwd => self.cwd = Some(PathBuf::from(value)),
            Selector::ConfigFile => self.config_file = Some(PathBuf::from(value)),
        }
        self.occurrences.push(Occurrence {
            selector,
            index,
            inline_prefix: prefix,
        });
    }

    /// The original argument vector.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The subcommand, if one was given.
    #[must_use]
    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    /// The explicitly selected stack.
    #[must_use]
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// The explicitly selected working directory.
    #[must_use]
    pub fn cwd(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    /// The explicitly selected configuration file.
    #[must_use]
    pub fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }

    /// Whether `--non-interactive` was passed.
    #[must_use]
    pub fn non_interactive(&self) -> bool {
        self.non_interactive
    }

    /// Whether the subcommand needs endpoint reconciliation.
    #[must_use]
    pub fn is_deploying(&self) -> bool {
        self.subcommand
            .as_deref()
            .is_some_and(|cmd| DEPLOYING_COMMANDS.contains(&cmd))
    }

    /// Builds the argument vector to forward.
    ///
    /// Selector values named by `redirect` are replaced in place, or
    /// appended when absent. `--non-interactive` is appended when
    /// `force_non_interactive` is set and the flag is not already present.
    /// Appended arguments go before a bare `--`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use pulumilocal::invocation::{Invocation, Redirect};
    ///
    /// let inv = Invocation::parse(["up", "--stack=dev"]);
    /// let redirect = Redirect {
    ///     stack: None,
    ///     config_file: PathBuf::from("/work/Pulumi.localstack.yaml"),
    /// };
    /// assert_eq!(
    ///     inv.forward_args(Some(&redirect), true),
    ///     vec![
    ///         "up",
    ///         "--stack=dev",
    ///         "--config-file",
    ///         "/work/Pulumi.localstack.yaml",
    ///         "--non-interactive",
    ///     ]
    /// );
    /// ```
    #[must_use]
    pub fn forward_args(
        &self,
        redirect: Option<&Redirect>,
        force_non_interactive: bool,
    ) -> Vec<String> {
        let mut args = self.args.clone();
        let mut appended = Vec::new();

        if let Some(redirect) = redirect {
            let config_file = redirect.config_file.display().to_string();
            self.replace_or_append(&mut args, &mut appended, Selector::ConfigFile, &config_file);
            if let Some(stack) = &redirect.stack {
                self.replace_or_append(&mut args, &mut appended, Selector::Stack, stack);
            }
        }

        if force_non_interactive && !self.non_interactive {
            appended.push(NON_INTERACTIVE_FLAG.to_string());
        }

        let insert_at = self.terminator.unwrap_or(args.len());
        let tail = args.split_off(insert_at);
        args.extend(appended);
        args.extend(tail);
        args
    }

    fn replace_or_append(
        &self,
        args: &mut [String],
        appended: &mut Vec<String>,
        selector: Selector,
        value: &str,
    ) {
        let mut replaced = false;
        for occurrence in self.occurrences.iter().filter(|o| o.selector == selector) {
            args[occurrence.index] = match &occurrence.inline_prefix {
                Some(prefix) => format!("{prefix}{value}"),
                None => value.to_string(),
            };
            replaced = true;
        }
        if !replaced {
            appended.push(selector.long_flag().to_string());
            appended.push(value.to_string());
        }
    }
}

/// Splits `-sdev` into (`-s`, `dev`) for the short selector flags.
fn attached_short(arg: &str) -> Option<(&str, &str)> {
    if arg.starts_with("--") || arg.len() <= 2 || !arg.is_char_boundary(2) {
        return None;
    }
    let (flag, value) = arg.split_at(2);
    matches!(flag, "-s" | "-C").then_some((flag, value))
}
