use std::fmt;

use semver::Version;

/// Version-control tag created for a release (e.g., "v1.3.0")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
}

impl ReleaseTag {
    /// Tag for a resolved version
    pub fn for_version(version: &Version) -> Self {
        ReleaseTag {
            name: format!("v{}", version),
        }
    }

    /// Annotation message for the tag; also used as the commit message
    pub fn message(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
