//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - `scripted` - Pre-recorded answers for tests
//! - This module - The [Prompter] seam and the terminal implementation

use std::io::{self, BufRead, Write};

use console::style;

use crate::error::{ReleaseError, Result};

pub mod formatter;
pub mod scripted;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_release_plan, display_release_summary,
    display_status, display_success, version_change_message,
};
pub use scripted::{Answer, ScriptedPrompter};

/// Asks the operator questions and returns their answers.
///
/// Implementations only collect raw answers; validating their meaning is up
/// to the caller, which asks again when an answer is rejected.
pub trait Prompter {
    /// Choose one of `choices`; returns its index
    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize>;

    /// Free text, or `default` when the answer is empty
    fn input(&mut self, message: &str, default: Option<&str>) -> Result<String>;

    /// Yes/no question
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

/// Line-based prompter over a reader/writer pair (stdin/stdout in practice).
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        TerminalPrompter::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalPrompter { input, output }
    }

    fn read_answer(&mut self) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ReleaseError::prompt("input closed before an answer was given"));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    /// Displays a numbered list and accepts a 1-based index.
    /// Default selection is the first choice if the operator presses Enter.
    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize> {
        if choices.is_empty() {
            return Err(ReleaseError::prompt(format!("no choices for '{}'", message)));
        }

        writeln!(self.output, "\n{}", style(message).bold())?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, choice)?;
        }

        loop {
            write!(self.output, "\nSelect (1-{}) [default: 1]: ", choices.len())?;
            let answer = self.read_answer()?;
            let index = if answer.is_empty() {
                1
            } else {
                answer.parse::<usize>().unwrap_or(0)
            };

            if index > 0 && index <= choices.len() {
                return Ok(index - 1);
            }
            writeln!(self.output, "{} Invalid selection", style("✗").red())?;
        }
    }

    fn input(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(default) => write!(self.output, "\n{} [{}]: ", message, default)?,
            None => write!(self.output, "\n{}: ", message)?,
        }
        let answer = self.read_answer()?;
        match default {
            Some(default) if answer.is_empty() => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    /// Accepts "y"/"yes" and "n"/"no" (case-insensitive); Enter picks `default`.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "\n{} ({}): ", message, hint)?;
            let answer = self.read_answer()?.to_lowercase();
            match answer.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "{} Please answer y or n", style("✗").red())?,
            }
        }
    }
}
