//! Registry distribution channel ("dist-tag") a release is published under.
//!
//! Not to be confused with the version-control tag in [super::tag].

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::{ReleaseError, Result};

/// Channel used when the operator leaves the custom channel prompt empty.
pub const DEFAULT_CHANNEL: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PublishChannel {
    #[default]
    Latest,
    Alpha,
    Beta,
    /// Operator-supplied channel name
    Custom(String),
}

const CHANNEL_NAME_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9-]*$";

fn is_valid_channel_name(name: &str) -> bool {
    if let Ok(re) = Regex::new(CHANNEL_NAME_PATTERN) {
        re.is_match(name)
    } else {
        false
    }
}

impl PublishChannel {
    /// Parse a channel name.
    ///
    /// Custom names must be usable both as a registry tag and as a
    /// pre-release label: letters, digits and `-`, not starting with `-`.
    /// Dots are rejected, so no custom name can be read as a version.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn as_str(&self) -> &str {
        match self {
            PublishChannel::Latest => "latest",
            PublishChannel::Alpha => "alpha",
            PublishChannel::Beta => "beta",
            PublishChannel::Custom(name) => name,
        }
    }
}

impl FromStr for PublishChannel {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        match name {
            "latest" => Ok(PublishChannel::Latest),
            "alpha" => Ok(PublishChannel::Alpha),
            "beta" => Ok(PublishChannel::Beta),
            other => {
                if !is_valid_channel_name(other) {
                    return Err(ReleaseError::validation(format!(
                        "Invalid channel name: '{}'",
                        s
                    )));
                }
                Ok(PublishChannel::Custom(other.to_string()))
            }
        }
    }
}

impl fmt::Display for PublishChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
