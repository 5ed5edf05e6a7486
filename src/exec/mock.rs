use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crate::error::{ReleaseError, Result};
use crate::exec::{command_line, CommandRunner, OutputMode};

/// One invocation seen by [MockRunner].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub mode: OutputMode,
}

impl RecordedCall {
    pub fn command_line(&self) -> String {
        command_line(&self.program, &self.args)
    }
}

#[derive(Debug, Clone)]
enum Outcome {
    Output(String),
    Fail { exit_code: i32, stderr: String },
}

#[derive(Debug, Clone)]
struct Rule {
    prefix: String,
    cwd: Option<PathBuf>,
    outcome: Outcome,
}

impl Rule {
    fn matches(&self, line: &str, cwd: &Path) -> bool {
        line.starts_with(&self.prefix) && self.cwd.as_deref().map_or(true, |dir| dir == cwd)
    }
}

/// Mock runner for testing without spawning processes.
///
/// Every call is recorded. Calls succeed with empty output unless a rule
/// registered with [MockRunner::respond] or [MockRunner::fail] matches the
/// command line prefix (and working directory, when given). The first
/// matching rule wins.
pub struct MockRunner {
    rules: Vec<Rule>,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl MockRunner {
    /// Create a runner where every command succeeds silently
    pub fn new() -> Self {
        MockRunner {
            rules: Vec::new(),
            delay: None,
            calls: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Return `stdout` for commands starting with `prefix`
    pub fn respond(&mut self, prefix: impl Into<String>, stdout: impl Into<String>) {
        self.rules.push(Rule {
            prefix: prefix.into(),
            cwd: None,
            outcome: Outcome::Output(stdout.into()),
        });
    }

    /// Fail commands starting with `prefix`
    pub fn fail(&mut self, prefix: impl Into<String>, exit_code: i32, stderr: impl Into<String>) {
        self.rules.push(Rule {
            prefix: prefix.into(),
            cwd: None,
            outcome: Outcome::Fail {
                exit_code,
                stderr: stderr.into(),
            },
        });
    }

    /// Fail commands starting with `prefix` only when run inside `cwd`
    pub fn fail_in(
        &mut self,
        prefix: impl Into<String>,
        cwd: impl Into<PathBuf>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) {
        self.rules.push(Rule {
            prefix: prefix.into(),
            cwd: Some(cwd.into()),
            outcome: Outcome::Fail {
                exit_code,
                stderr: stderr.into(),
            },
        });
    }

    /// Keep every simulated process alive for `delay`
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = Some(delay);
    }

    /// All calls in the order they started
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Command lines of all calls in the order they started
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(RecordedCall::command_line).collect()
    }

    /// Highest number of calls that were in flight at the same time
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path, mode: OutputMode) -> Result<String> {
        let line = command_line(program, args);
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedCall {
                program: program.to_string(),
                args: args.to_vec(),
                cwd: cwd.to_path_buf(),
                mode,
            });

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        match self.rules.iter().find(|rule| rule.matches(&line, cwd)) {
            Some(Rule {
                outcome: Outcome::Output(stdout),
                ..
            }) => Ok(stdout.clone()),
            Some(Rule {
                outcome: Outcome::Fail { exit_code, stderr },
                ..
            }) => Err(ReleaseError::command_failed(line, Some(*exit_code), stderr.clone())),
            None => Ok(String::new()),
        }
    }
}
