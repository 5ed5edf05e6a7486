use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for mono-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Command `{command}` failed ({}): {stderr}", describe_exit(.exit_code))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Package {} failed: {source}", .package.display())]
    Package {
        package: PathBuf,
        #[source]
        source: Box<ReleaseError>,
    },

    #[error("Manifest error in {}: {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Aborted by operator: {0}")]
    Aborted(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in mono-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}

impl ReleaseError {
    /// Create a command failure
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        ReleaseError::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Attach the failing package directory to an error
    pub fn in_package(package: impl Into<PathBuf>, source: ReleaseError) -> Self {
        ReleaseError::Package {
            package: package.into(),
            source: Box::new(source),
        }
    }

    /// Create a manifest error for the given file
    pub fn manifest(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        ReleaseError::Manifest {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a validation error with context
    pub fn validation(msg: impl Into<String>) -> Self {
        ReleaseError::Validation(msg.into())
    }

    /// Create a precondition error with context
    pub fn precondition(msg: impl Into<String>) -> Self {
        ReleaseError::Precondition(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a prompt error with context
    pub fn prompt(msg: impl Into<String>) -> Self {
        ReleaseError::Prompt(msg.into())
    }

    /// Whether the error is recovered inside the version prompt loop
    /// instead of terminating the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ReleaseError::Validation(_) | ReleaseError::Aborted(_))
    }
}
