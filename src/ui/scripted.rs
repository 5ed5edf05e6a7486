use std::collections::VecDeque;

use crate::error::{ReleaseError, Result};
use crate::ui::Prompter;

/// One pre-recorded operator answer
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Select(usize),
    Input(String),
    Confirm(bool),
}

/// Prompter replaying pre-recorded answers, for tests.
///
/// Every question is recorded. Asking a question of a different kind than
/// the next answer, or running out of answers, is a prompt error.
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        ScriptedPrompter {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Messages of all questions asked so far
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, message: &str) -> Result<Answer> {
        self.asked.push(message.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| ReleaseError::prompt(format!("no scripted answer for '{}'", message)))
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize> {
        match self.next(message)? {
            Answer::Select(index) if index < choices.len() => Ok(index),
            other => Err(ReleaseError::prompt(format!(
                "expected a selection for '{}', scripted {:?}",
                message, other
            ))),
        }
    }

    fn input(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        match self.next(message)? {
            Answer::Input(text) if text.is_empty() => Ok(default.unwrap_or_default().to_string()),
            Answer::Input(text) => Ok(text),
            other => Err(ReleaseError::prompt(format!(
                "expected text for '{}', scripted {:?}",
                message, other
            ))),
        }
    }

    fn confirm(&mut self, message: &str, _default: bool) -> Result<bool> {
        match self.next(message)? {
            Answer::Confirm(yes) => Ok(yes),
            other => Err(ReleaseError::prompt(format!(
                "expected a confirmation for '{}', scripted {:?}",
                message, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_answers_in_order() {
        let mut p = ScriptedPrompter::new([
            Answer::Select(1),
            Answer::Input(String::new()),
            Answer::Confirm(true),
        ]);
        let choices = vec!["a".to_string(), "b".to_string()];
        assert_eq!(p.select("pick", &choices).unwrap(), 1);
        assert_eq!(p.input("name", Some("latest")).unwrap(), "latest");
        assert!(p.confirm("ok?", false).unwrap());
        assert_eq!(p.asked(), ["pick", "name", "ok?"]);
        assert_eq!(p.remaining(), 0);
    }

    #[test]
    fn test_kind_mismatch_is_error() {
        let mut p = ScriptedPrompter::new([Answer::Confirm(true)]);
        assert!(p.input("name", None).is_err());
    }

    #[test]
    fn test_exhausted_script_is_error() {
        let mut p = ScriptedPrompter::new(Vec::new());
        assert!(matches!(p.confirm("ok?", true), Err(ReleaseError::Prompt(_))));
    }
}
