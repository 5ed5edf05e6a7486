//! Package manifest (`package.json`) access.
//!
//! Manifests are kept as ordered JSON objects so that rewriting the version
//! leaves every other key, and the key order, untouched.

use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;
use serde_json::{Map, Value};

use crate::domain::parse_version;
use crate::error::{ReleaseError, Result};

/// Dependency maps that may reference sibling packages.
pub const DEPENDENCY_SECTIONS: [&str; 4] = [
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    path: PathBuf,
    doc: Map<String, Value>,
}

impl PackageManifest {
    /// Read and parse the manifest at `path`
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let text = fs::read_to_string(&path)
            .map_err(|e| ReleaseError::manifest(&path, format!("cannot read: {}", e)))?;
        Self::parse(path, &text)
    }

    /// Parse manifest text that belongs to `path`
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let path = path.into();
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ReleaseError::manifest(&path, format!("invalid JSON: {}", e)))?;
        match value {
            Value::Object(doc) => Ok(PackageManifest { path, doc }),
            _ => Err(ReleaseError::manifest(&path, "top level is not an object")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> Option<&str> {
        self.doc.get("name").and_then(Value::as_str)
    }

    /// The `version` field as written
    pub fn raw_version(&self) -> Option<&str> {
        self.doc.get("version").and_then(Value::as_str)
    }

    /// The `version` field, parsed
    pub fn version(&self) -> Result<Version> {
        let raw = self
            .raw_version()
            .ok_or_else(|| ReleaseError::manifest(&self.path, "missing string field 'version'"))?;
        parse_version(raw).map_err(|e| ReleaseError::manifest(&self.path, e.to_string()))
    }

    pub fn set_version(&mut self, version: &Version) {
        self.doc
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    /// Dependency map `section` (e.g. "dependencies"), if present
    pub fn dependencies(&self, section: &str) -> Option<&Map<String, Value>> {
        self.doc.get(section).and_then(Value::as_object)
    }

    /// Point every dependency on `package` at `version`.
    ///
    /// Only specs that are a plain version, optionally prefixed with `^` or
    /// `~`, are rewritten; the prefix is kept. Everything else (`workspace:`,
    /// `file:`, `link:`, `npm:` aliases, git URLs, `>=` or `*` ranges) is
    /// left as written.
    ///
    /// # Returns
    /// `true` if any entry changed
    pub fn set_dependency_version(&mut self, package: &str, version: &Version) -> bool {
        let mut changed = false;
        for section in DEPENDENCY_SECTIONS {
            let Some(Value::Object(deps)) = self.doc.get_mut(section) else {
                continue;
            };
            let Some(Value::String(spec)) = deps.get_mut(package) else {
                continue;
            };
            let Some(operator) = pinned_operator(spec) else {
                continue;
            };
            let updated = format!("{}{}", operator, version);
            if *spec != updated {
                *spec = updated;
                changed = true;
            }
        }
        changed
    }

    /// Serialized form: two-space indented JSON with a trailing newline
    pub fn render(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.doc)
            .map_err(|e| ReleaseError::manifest(&self.path, e.to_string()))?;
        text.push('\n');
        Ok(text)
    }

    pub fn save(&self) -> Result<()> {
        let text = self.render()?;
        fs::write(&self.path, text)
            .map_err(|e| ReleaseError::manifest(&self.path, format!("cannot write: {}", e)))
    }
}

/// Range operator of a `[^|~]<version>` dependency spec, `None` for any
/// other kind of spec
fn pinned_operator(spec: &str) -> Option<&'static str> {
    let (operator, rest) = match spec.chars().next() {
        Some('^') => ("^", &spec[1..]),
        Some('~') => ("~", &spec[1..]),
        _ => ("", spec),
    };
    Version::parse(rest).ok().map(|_| operator)
}

/// Set `version` in the manifest of every directory in `dirs`.
///
/// Every manifest is loaded and validated before the first write, so a
/// malformed manifest leaves the whole set untouched. A write failure after
/// that point halts immediately; files already written are not reverted.
///
/// With `sync_dependencies`, dependency entries naming any of the released
/// packages are moved to `version` as well.
///
/// # Returns
/// Paths of the manifests written, in `dirs` order
pub fn update_versions<P: AsRef<Path>>(
    dirs: &[P],
    manifest_name: &str,
    version: &Version,
    sync_dependencies: bool,
) -> Result<Vec<PathBuf>> {
    let mut manifests = dirs
        .iter()
        .map(|dir| PackageManifest::load(dir.as_ref().join(manifest_name)))
        .collect::<Result<Vec<_>>>()?;

    let released: Vec<String> = if sync_dependencies {
        manifests
            .iter()
            .filter_map(|m| m.name().map(str::to_string))
            .collect()
    } else {
        Vec::new()
    };

    let mut written = Vec::with_capacity(manifests.len());
    for manifest in &mut manifests {
        manifest.set_version(version);
        for package in &released {
            manifest.set_dependency_version(package, version);
        }
        manifest.save()?;
        tracing::debug!(path = %manifest.path().display(), version = %version, "manifest updated");
        written.push(manifest.path().to_path_buf());
    }
    Ok(written)
}
