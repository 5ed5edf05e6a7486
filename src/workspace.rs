//! Monorepo layout discovery.
//!
//! A release targets every immediate subdirectory of the packages directory
//! that contains a manifest, in file-name order. The first one is the
//! reference package whose version the release starts from.

use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;

use crate::boundary::BoundaryWarning;
use crate::config::ReleaseConfig;
use crate::error::{ReleaseError, Result};
use crate::manifest::PackageManifest;

/// One releasable package
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    pub dir: PathBuf,
    pub manifest: PackageManifest,
}

impl WorkItem {
    /// Package name, or the directory name for unnamed packages
    pub fn display_name(&self) -> String {
        match self.manifest.name() {
            Some(name) => name.to_string(),
            None => self
                .dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.dir.display().to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    packages_dir: PathBuf,
    items: Vec<WorkItem>,
}

impl Workspace {
    /// Discover packages below `root` according to `config`.
    ///
    /// # Returns
    /// * `Ok((Workspace, warnings))` - At least one package was found
    /// * `Err(ReleaseError::Precondition)` - No packages directory, or no
    ///   package inside it
    /// * `Err(ReleaseError::Manifest)` - A manifest exists but is unreadable
    pub fn discover(root: &Path, config: &ReleaseConfig) -> Result<(Self, Vec<BoundaryWarning>)> {
        let packages_dir = root.join(&config.packages_dir);
        if !packages_dir.is_dir() {
            return Err(ReleaseError::precondition(format!(
                "{} is not a monorepo: missing '{}' directory",
                root.display(),
                config.packages_dir
            )));
        }

        let mut dirs = Vec::new();
        for entry in fs::read_dir(&packages_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();

        let mut warnings = Vec::new();
        let mut items = Vec::with_capacity(dirs.len());
        for dir in dirs {
            let manifest_path = dir.join(&config.manifest);
            if !manifest_path.is_file() {
                warnings.push(BoundaryWarning::SkippedDirectory { path: dir });
                continue;
            }
            let manifest = PackageManifest::load(manifest_path)?;
            items.push(WorkItem { dir, manifest });
        }

        if items.is_empty() {
            return Err(ReleaseError::precondition(format!(
                "no package with a {} found in {}",
                config.manifest,
                packages_dir.display()
            )));
        }

        let workspace = Workspace {
            root: root.to_path_buf(),
            packages_dir,
            items,
        };
        warnings.extend(workspace.version_drift()?);
        tracing::debug!(
            packages = workspace.items.len(),
            root = %workspace.root.display(),
            "workspace discovered"
        );
        Ok((workspace, warnings))
    }

    fn version_drift(&self) -> Result<Vec<BoundaryWarning>> {
        let reference = self.current_version()?;
        let mut warnings = Vec::new();
        for item in &self.items[1..] {
            // only the reference version has to parse
            let Ok(version) = item.manifest.version() else {
                warnings.push(BoundaryWarning::UnparsableVersion {
                    package: item.display_name(),
                    version: item.manifest.raw_version().unwrap_or_default().to_string(),
                });
                continue;
            };
            if version != reference {
                warnings.push(BoundaryWarning::VersionDrift {
                    package: item.display_name(),
                    version: version.to_string(),
                    reference: reference.to_string(),
                });
            }
        }
        Ok(warnings)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn packages_dir(&self) -> &Path {
        &self.packages_dir
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    /// Directories of all target packages, in release order
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.items.iter().map(|item| item.dir.clone()).collect()
    }

    /// The package whose version the release starts from
    pub fn reference(&self) -> &WorkItem {
        &self.items[0]
    }

    pub fn current_version(&self) -> Result<Version> {
        self.reference().manifest.version()
    }

    /// `path` relative to the repository root, as version control expects
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_package(root: &Path, dir: &str, name: &str, version: &str) {
        let dir = root.join("packages").join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("package.json"),
            format!("{{\n  \"name\": \"{}\",\n  \"version\": \"{}\"\n}}\n", name, version),
        )
        .unwrap();
    }

    #[test]
    fn test_missing_packages_dir_is_precondition_failure() {
        let root = tempfile::tempdir().unwrap();
        let err = Workspace::discover(root.path(), &ReleaseConfig::default()).unwrap_err();
        assert!(matches!(err, ReleaseError::Precondition(_)));
    }

    #[test]
    fn test_empty_packages_dir_is_precondition_failure() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("packages")).unwrap();
        let err = Workspace::discover(root.path(), &ReleaseConfig::default()).unwrap_err();
        assert!(matches!(err, ReleaseError::Precondition(_)));
    }

    #[test]
    fn test_discovers_sorted_packages_and_skips_bare_dirs() {
        let root = tempfile::tempdir().unwrap();
        write_package(root.path(), "utils", "@s/utils", "1.2.3");
        write_package(root.path(), "core", "@s/core", "1.2.3");
        fs::create_dir_all(root.path().join("packages/docs")).unwrap();
        fs::write(root.path().join("packages/README.md"), "x").unwrap();

        let (ws, warnings) = Workspace::discover(root.path(), &ReleaseConfig::default()).unwrap();

        let names: Vec<String> = ws.items().iter().map(WorkItem::display_name).collect();
        assert_eq!(names, vec!["@s/core", "@s/utils"]);
        assert_eq!(ws.current_version().unwrap(), Version::new(1, 2, 3));
        assert_eq!(
            warnings,
            vec![BoundaryWarning::SkippedDirectory {
                path: root.path().join("packages/docs")
            }]
        );
    }

    #[test]
    fn test_reports_version_drift() {
        let root = tempfile::tempdir().unwrap();
        write_package(root.path(), "a", "a", "2.0.0");
        write_package(root.path(), "b", "b", "1.9.0");

        let (_, warnings) = Workspace::discover(root.path(), &ReleaseConfig::default()).unwrap();
        assert_eq!(
            warnings,
            vec![BoundaryWarning::VersionDrift {
                package: "b".to_string(),
                version: "1.9.0".to_string(),
                reference: "2.0.0".to_string(),
            }]
        );
    }

    #[test]
    fn test_relative_paths() {
        let root = tempfile::tempdir().unwrap();
        write_package(root.path(), "a", "a", "1.0.0");
        let (ws, _) = Workspace::discover(root.path(), &ReleaseConfig::default()).unwrap();
        let manifest = ws.reference().manifest.path().to_path_buf();
        assert_eq!(ws.relative(&manifest), Path::new("packages/a/package.json"));
    }
}
