use std::fmt;

use semver::{BuildMetadata, Prerelease, Version};

use crate::error::{ReleaseError, Result};

/// How the next version is derived from the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Prerelease,
    Patch,
    Minor,
    Major,
    /// Operator types the version literally
    Custom,
}

impl BumpKind {
    /// All kinds in the order they are offered to the operator
    pub const ALL: [BumpKind; 5] = [
        BumpKind::Prerelease,
        BumpKind::Patch,
        BumpKind::Minor,
        BumpKind::Major,
        BumpKind::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BumpKind::Prerelease => "Prerelease",
            BumpKind::Patch => "Patch",
            BumpKind::Minor => "Minor",
            BumpKind::Major => "Major",
            BumpKind::Custom => "Custom Version",
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a version as found in a manifest or typed by the operator.
///
/// A single leading `v` is accepted and dropped.
pub fn parse_version(input: &str) -> Result<Version> {
    let trimmed = input.trim();
    let clean = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(clean).map_err(|e| {
        ReleaseError::validation(format!("The version: {} is not valid ({})", input, e))
    })
}

/// Validate an operator-supplied version against the current one.
///
/// # Returns
/// * `Ok(Version)` - Valid and strictly greater than `current`
/// * `Err(ReleaseError::Validation)` - Unparsable or not an upgrade
pub fn parse_custom(input: &str, current: &Version) -> Result<Version> {
    let version = parse_version(input)?;
    if version <= *current {
        return Err(ReleaseError::validation(format!(
            "The version: {} must be greater than {}",
            version, current
        )));
    }
    Ok(version)
}

/// Compute the next version for a non-custom bump kind.
///
/// Follows the usual registry increment rules:
/// - **Patch**: `1.2.3 -> 1.2.4`, `1.2.4-beta.1 -> 1.2.4`
/// - **Minor**: `1.2.3 -> 1.3.0`, `1.3.0-beta.1 -> 1.3.0`
/// - **Major**: `1.2.3 -> 2.0.0`, `2.0.0-beta.1 -> 2.0.0`
/// - **Prerelease** with label `beta`: `1.2.3 -> 1.2.4-beta.0`,
///   `1.2.4-beta.0 -> 1.2.4-beta.1`, `1.2.4-alpha.3 -> 1.2.4-beta.0`
///
/// The result is always strictly greater than `current`. A prerelease label
/// that would sort below the current one (`1.2.4-rc.1` with `alpha`) moves
/// to the next patch instead: `1.2.5-alpha.0`.
pub fn bump(current: &Version, kind: BumpKind, label: &str) -> Result<Version> {
    let mut next = Version::new(current.major, current.minor, current.patch);
    let is_pre = !current.pre.is_empty();

    match kind {
        BumpKind::Patch => {
            if !is_pre {
                next.patch = increment(current.patch, "patch")?;
            }
        }
        BumpKind::Minor => {
            if !(is_pre && current.patch == 0) {
                next.minor = increment(current.minor, "minor")?;
                next.patch = 0;
            }
        }
        BumpKind::Major => {
            if !(is_pre && current.minor == 0 && current.patch == 0) {
                next.major = increment(current.major, "major")?;
                next.minor = 0;
                next.patch = 0;
            }
        }
        BumpKind::Prerelease => {
            let pre = if is_pre {
                next_prerelease(current.pre.as_str(), label)
            } else {
                next.patch = increment(current.patch, "patch")?;
                format!("{}.0", label)
            };
            next.pre = prerelease(&pre)?;

            if next <= *current {
                let patch = increment(current.patch, "patch")?;
                next = Version::new(current.major, current.minor, patch);
                next.pre = prerelease(&format!("{}.0", label))?;
            }
        }
        BumpKind::Custom => {
            return Err(ReleaseError::validation(
                "custom versions are entered by the operator, not computed",
            ));
        }
    }

    next.build = BuildMetadata::EMPTY;
    Ok(next)
}

fn increment(component: u64, name: &str) -> Result<u64> {
    component.checked_add(1).ok_or_else(|| {
        ReleaseError::validation(format!(
            "The {} version {} cannot be incremented",
            name, component
        ))
    })
}

fn prerelease(text: &str) -> Result<Prerelease> {
    Prerelease::new(text).map_err(|e| {
        ReleaseError::validation(format!("'{}' is not a valid pre-release label: {}", text, e))
    })
}

/// Advance an existing pre-release string for `label`.
fn next_prerelease(current: &str, label: &str) -> String {
    let mut parts: Vec<String> = current.split('.').map(str::to_string).collect();

    if parts.first().map(String::as_str) != Some(label) {
        return format!("{}.0", label);
    }

    match parts.iter().rposition(|p| p.parse::<u64>().is_ok()) {
        Some(index) => match parts[index]
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_add(1))
        {
            Some(n) => parts[index] = n.to_string(),
            // exhausted counter; the caller moves on to the next patch
            None => return format!("{}.0", label),
        },
        None => parts.push("0".to_string()),
    }

    if parts.get(1).map_or(true, |p| p.parse::<u64>().is_err()) {
        return format!("{}.0", label);
    }

    parts.join(".")
}
