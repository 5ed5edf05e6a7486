use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{ReleaseError, Result};
use crate::exec::{command_line, CommandRunner, OutputMode};

/// Runs programs found on the search path via `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path, mode: OutputMode) -> Result<String> {
        let command = command_line(program, args);
        tracing::info!(command = %command, cwd = %cwd.display(), "exec");

        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(cwd);

        let launch_error =
            |e: std::io::Error| ReleaseError::command_failed(&command, None, e.to_string());

        match mode {
            OutputMode::Capture => {
                let output = cmd.output().map_err(launch_error)?;
                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    tracing::debug!(command = %command, status = ?output.status.code(), "failed");
                    return Err(ReleaseError::command_failed(
                        &command,
                        output.status.code(),
                        stderr.trim(),
                    ));
                }
                let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
                tracing::info!(
                    command = %command,
                    cwd = %cwd.display(),
                    output = %stdout,
                    "finished"
                );
                Ok(stdout)
            }
            OutputMode::Inherit => {
                let status = cmd
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(launch_error)?;
                if !status.success() {
                    // stderr already went to the terminal
                    return Err(ReleaseError::command_failed(&command, status.code(), ""));
                }
                tracing::info!(command = %command, cwd = %cwd.display(), "finished");
                Ok(String::new())
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::exec::args;

    #[test]
    fn test_capture_returns_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let out = SystemRunner
            .run("echo", &args(&["hello"]), dir.path(), OutputMode::Capture)
            .unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn test_runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let out = SystemRunner
            .run("ls", &[], dir.path(), OutputMode::Capture)
            .unwrap();
        assert!(out.contains("marker.txt"));
    }

    #[test]
    fn test_non_zero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = SystemRunner
            .run(
                "sh",
                &args(&["-c", "echo oops >&2; exit 3"]),
                dir.path(),
                OutputMode::Capture,
            )
            .unwrap_err();
        match err {
            ReleaseError::CommandFailed {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_inherit_failure_has_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let err = SystemRunner
            .run("sh", &args(&["-c", "exit 2"]), dir.path(), OutputMode::Inherit)
            .unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::CommandFailed {
                exit_code: Some(2),
                ..
            }
        ));
    }

    #[test]
    fn test_missing_program_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = SystemRunner
            .run(
                "mono-release-no-such-program",
                &[],
                dir.path(),
                OutputMode::Capture,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::CommandFailed {
                exit_code: None,
                ..
            }
        ));
    }
}
