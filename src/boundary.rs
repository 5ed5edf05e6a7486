use std::fmt;
use std::path::PathBuf;

/// Warnings raised while inspecting the monorepo layout.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Directory under the packages dir has no manifest and is not released
    SkippedDirectory { path: PathBuf },
    /// Package version differs from the reference package's version
    VersionDrift {
        package: String,
        version: String,
        reference: String,
    },
    /// Package version is not semantic; the release replaces it
    UnparsableVersion { package: String, version: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::SkippedDirectory { path } => {
                write!(f, "Skipping '{}': no package manifest", path.display())
            }
            BoundaryWarning::VersionDrift {
                package,
                version,
                reference,
            } => {
                write!(
                    f,
                    "Package '{}' is at {} but the release starts from {}",
                    package, version, reference
                )
            }
            BoundaryWarning::UnparsableVersion { package, version } => {
                write!(
                    f,
                    "Package '{}' has unparsable version '{}'; it will be replaced",
                    package, version
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_directory_display() {
        let warning = BoundaryWarning::SkippedDirectory {
            path: PathBuf::from("packages/docs"),
        };
        let msg = warning.to_string();
        assert!(msg.contains("packages/docs"));
        assert!(msg.contains("no package manifest"));
    }

    #[test]
    fn test_version_drift_display() {
        let warning = BoundaryWarning::VersionDrift {
            package: "@scope/utils".to_string(),
            version: "1.1.0".to_string(),
            reference: "1.2.3".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("@scope/utils"));
        assert!(msg.contains("1.1.0"));
        assert!(msg.contains("1.2.3"));
    }

    #[test]
    fn test_unparsable_version_display() {
        let warning = BoundaryWarning::UnparsableVersion {
            package: "legacy".to_string(),
            version: "1.0".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("legacy"));
        assert!(msg.contains("'1.0'"));
    }
}
