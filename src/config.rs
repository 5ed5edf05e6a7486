use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};

/// File name looked up in the repository root.
pub const CONFIG_FILE_NAME: &str = "monorelease.toml";

/// Represents the complete configuration for mono-release.
///
/// Describes where packages live, which external commands build and publish
/// them, and how the version-control steps behave.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_packages_dir")]
    pub packages_dir: String,

    #[serde(default = "default_manifest")]
    pub manifest: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_channels")]
    pub channels: Vec<String>,

    /// Explicit concurrency ceiling; host parallelism when absent.
    #[serde(default)]
    pub concurrency: Option<usize>,

    #[serde(default = "default_build")]
    pub build: CommandConfig,

    #[serde(default = "default_publish")]
    pub publish: CommandConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// An external program plus its argument template.
///
/// Arguments may contain `{channel}` and `{version}` placeholders.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommandConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandConfig {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        CommandConfig {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Returns the arguments with placeholders substituted.
    pub fn render_args(&self, channel: &str, version: Option<&str>) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                let arg = arg.replace("{channel}", channel);
                match version {
                    Some(v) => arg.replace("{version}", v),
                    None => arg,
                }
            })
            .collect()
    }
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BehaviorConfig {
    #[serde(default = "default_true")]
    pub no_verify: bool,

    #[serde(default)]
    pub sync_internal_dependencies: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            no_verify: true,
            sync_internal_dependencies: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_packages_dir() -> String {
    "packages".to_string()
}

fn default_manifest() -> String {
    "package.json".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_channels() -> Vec<String> {
    vec!["latest".to_string(), "alpha".to_string(), "beta".to_string()]
}

fn default_build() -> CommandConfig {
    CommandConfig::new("npm", &["run", "b:all"])
}

fn default_publish() -> CommandConfig {
    CommandConfig::new("pnpm", &["publish", "--tag", "{channel}"])
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            packages_dir: default_packages_dir(),
            manifest: default_manifest(),
            remote: default_remote(),
            channels: default_channels(),
            concurrency: None,
            build: default_build(),
            publish: default_publish(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl ReleaseConfig {
    /// Rejects values no release could run with.
    pub fn validate(&self) -> Result<()> {
        if self.packages_dir.trim().is_empty() {
            return Err(ReleaseError::config("packages_dir must not be empty"));
        }
        if self.manifest.trim().is_empty() {
            return Err(ReleaseError::config("manifest must not be empty"));
        }
        if self.remote.trim().is_empty() {
            return Err(ReleaseError::config("remote must not be empty"));
        }
        if self.concurrency == Some(0) {
            return Err(ReleaseError::config("concurrency must be at least 1"));
        }
        if self.build.program.trim().is_empty() || self.publish.program.trim().is_empty() {
            return Err(ReleaseError::config("build and publish programs must be set"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `monorelease.toml` in the repository root
/// 3. `.monorelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(ReleaseConfig)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed, or validated
pub fn load_config(root: &Path, config_path: Option<&Path>) -> Result<ReleaseConfig> {
    let local = root.join(CONFIG_FILE_NAME);

    let source = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if local.exists() {
        Some(local)
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
            .filter(|path| path.exists())
    };

    let config = match source {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            let text = fs::read_to_string(&path).map_err(|e| {
                ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
            })?;
            parse_config(&text)?
        }
        None => ReleaseConfig::default(),
    };

    config.validate()?;
    Ok(config)
}

/// Parses configuration text, filling omitted fields with defaults.
pub fn parse_config(text: &str) -> Result<ReleaseConfig> {
    toml::from_str(text).map_err(|e| ReleaseError::config(e.to_string()))
}
