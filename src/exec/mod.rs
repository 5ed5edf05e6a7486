//! External process execution
//!
//! This module provides a trait-based abstraction over running external
//! programs, allowing the release pipeline to drive real processes or a
//! scripted stand-in for testing.
//!
//! # Overview
//!
//! - [CommandRunner]: run one program in one directory, surfacing failures
//! - [system::SystemRunner]: the real implementation over `std::process`
//! - [mock::MockRunner]: a recording implementation for tests
//! - [batch::BatchExecutor]: fans a command out over package directories,
//!   at most [batch::ConcurrencyCeiling] processes at a time
//!
//! Most code should depend on the [CommandRunner] trait rather than a
//! concrete runner.

pub mod batch;
pub mod mock;
pub mod system;

pub use batch::{partition, BatchExecutor, BatchReport, ConcurrencyCeiling};
pub use mock::MockRunner;
pub use system::SystemRunner;

use std::path::Path;

use crate::error::Result;

/// How a child process's output is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Collect stdout and return it; stderr is kept for the failure report.
    Capture,
    /// Stream stdout/stderr straight to the operator's terminal.
    Inherit,
}

/// Runs external programs on behalf of the release pipeline.
///
/// ## Thread Safety
///
/// Implementors must be `Send + Sync`: [batch::BatchExecutor] calls `run`
/// from several threads at once.
///
/// ## Error Handling
///
/// A non-zero exit or a failure to launch must be returned as
/// [crate::error::ReleaseError::CommandFailed]. Implementations never log and
/// swallow a failure, since pipeline stages halt on it.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` inside `cwd`.
    ///
    /// # Returns
    /// * `Ok(String)` - Captured stdout with trailing whitespace trimmed
    ///   (always empty for [OutputMode::Inherit])
    /// * `Err` - If the process could not start or exited non-zero
    fn run(&self, program: &str, args: &[String], cwd: &Path, mode: OutputMode) -> Result<String>;
}

/// Renders a command the way an operator would type it.
pub fn command_line(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Builds an owned argument vector from string literals.
pub fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
