//! Interactive confirmation.

use std::io::{self, BufRead, Write};

use crate::error::Result;

/// The exact answer that confirms an overwrite.
pub const CONFIRMATION: &str = "yes";

/// Source of answers to yes/no questions.
#[cfg_attr(test, mockall::automock)]
pub trait Confirmer {
    /// Asks `question` and returns the raw answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn ask(&self, question: &str) -> Result<String>;
}

/// Returns true if `answer` is the literal confirmation.
///
/// # Examples
///
/// ```
/// use pulumilocal::prompt::is_confirmed;
///
/// assert!(is_confirmed("yes\n"));
/// assert!(!is_confirmed("y"));
/// assert!(!is_confirmed("YES"));
/// ```
#[must_use]
pub fn is_confirmed(answer: &str) -> bool {
    answer.trim() == CONFIRMATION
}

/// Prompts on stderr and reads one line from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn ask(&self, question: &str) -> Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, "{question} ")?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }
}

/// Answers every question with a fixed text.
#[derive(Debug, Clone)]
pub struct PresetConfirmer {
    answer: String,
}

impl PresetConfirmer {
    /// Creates a confirmer that always answers `answer`.
    #[must_use]
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

impl Confirmer for PresetConfirmer {
    fn ask(&self, question: &str) -> Result<String> {
        log::debug!("answering '{question}' with preset confirmation");
        Ok(self.answer.clone())
    }
}
