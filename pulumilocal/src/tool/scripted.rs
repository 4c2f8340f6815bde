//! Scripted tool runner for tests.

use std::cell::RefCell;

use crate::error::Result;
use crate::tool::{ToolCommand, ToolOutput, ToolRunner};

/// Replays canned outputs and records every call.
///
/// Responses are matched by argument prefix; the first matching rule wins.
/// Unmatched commands succeed with empty output.
///
/// # Examples
///
/// ```
/// use pulumilocal::tool::{ScriptedRunner, ToolCommand, ToolOutput, ToolRunner};
///
/// let runner = ScriptedRunner::new()
///     .respond(&["stack", "--show-name"], ToolOutput::success("dev\n"));
///
/// let out = runner.run(&ToolCommand::captured(["stack", "--show-name"])).unwrap();
/// assert_eq!(out.stdout, "dev\n");
/// assert_eq!(runner.calls().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: Vec<(Vec<String>, ToolOutput)>,
    calls: RefCell<Vec<ToolCommand>>,
}

impl ScriptedRunner {
    /// Creates a runner with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a response for commands whose arguments start with `prefix`.
    #[must_use]
    pub fn respond(mut self, prefix: &[&str], output: ToolOutput) -> Self {
        self.rules
            .push((prefix.iter().map(|s| (*s).to_string()).collect(), output));
        self
    }

    /// Returns every command run so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.borrow().clone()
    }

    /// Returns the commands whose arguments start with `prefix`.
    #[must_use]
    pub fn calls_matching(&self, prefix: &[&str]) -> Vec<ToolCommand> {
        self.calls
            .borrow()
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl ToolRunner for ScriptedRunner {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        self.calls.borrow_mut().push(command.clone());
        let output = self
            .rules
            .iter()
            .find(|(prefix, _)| {
                let prefix: Vec<&str> = prefix.iter().map(String::as_str).collect();
                command.starts_with(&prefix)
            })
            .map(|(_, output)| output.clone())
            .unwrap_or_default();
        Ok(output)
    }
}
