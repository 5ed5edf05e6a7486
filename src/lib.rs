pub mod boundary;
pub mod config;
pub mod domain;
pub mod error;
pub mod exec;
pub mod manifest;
pub mod pipeline;
pub mod resolver;
pub mod ui;
pub mod vcs;
pub mod workspace;

pub use error::{ReleaseError, Result};
