//! Version-control steps of a release, run through the system `git` client.

use std::path::{Path, PathBuf};

use crate::domain::ReleaseTag;
use crate::error::{ReleaseError, Result};
use crate::exec::{CommandRunner, OutputMode};

const GIT: &str = "git";

/// `git` invocations rooted at the repository root
pub struct Vcs<'a> {
    runner: &'a dyn CommandRunner,
    root: PathBuf,
}

impl<'a> Vcs<'a> {
    pub fn new(runner: &'a dyn CommandRunner, root: impl Into<PathBuf>) -> Self {
        Vcs {
            runner,
            root: root.into(),
        }
    }

    fn git(&self, args: Vec<String>) -> Result<String> {
        self.runner.run(GIT, &args, &self.root, OutputMode::Capture)
    }

    /// Stage exactly `files` (paths relative to the repository root)
    pub fn stage(&self, files: &[&Path]) -> Result<()> {
        if files.is_empty() {
            return Err(ReleaseError::precondition("nothing to stage"));
        }
        let mut args = vec!["add".to_string()];
        args.extend(files.iter().map(|f| f.to_string_lossy().into_owned()));
        self.git(args)?;
        Ok(())
    }

    pub fn commit(&self, message: &str, no_verify: bool) -> Result<()> {
        let mut args = vec!["commit".to_string(), "-m".to_string(), message.to_string()];
        if no_verify {
            args.push("--no-verify".to_string());
        }
        self.git(args)?;
        Ok(())
    }

    /// Create an annotated tag
    pub fn tag(&self, tag: &ReleaseTag) -> Result<()> {
        self.git(vec![
            "tag".to_string(),
            tag.name.clone(),
            "-m".to_string(),
            tag.message().to_string(),
        ])?;
        Ok(())
    }

    /// Stage `files`, commit them with the tag message, and tag the commit
    pub fn commit_and_tag(&self, files: &[&Path], tag: &ReleaseTag, no_verify: bool) -> Result<()> {
        self.stage(files)?;
        self.commit(tag.message(), no_verify)?;
        self.tag(tag)
    }

    /// Name of the checked-out branch
    ///
    /// # Returns
    /// * `Err(ReleaseError::Precondition)` - HEAD is detached
    pub fn current_branch(&self) -> Result<String> {
        let branch = self.git(vec![
            "rev-parse".to_string(),
            "--abbrev-ref".to_string(),
            "HEAD".to_string(),
        ])?;
        let branch = branch.trim();
        if branch.is_empty() || branch == "HEAD" {
            return Err(ReleaseError::precondition(
                "HEAD is detached; check out a branch to release from",
            ));
        }
        Ok(branch.to_string())
    }

    /// Push `branch` and then `tag` to `remote`
    pub fn push(&self, remote: &str, branch: &str, tag: &ReleaseTag) -> Result<()> {
        self.git(vec!["push".to_string(), remote.to_string(), branch.to_string()])?;
        self.git(vec!["push".to_string(), remote.to_string(), tag.name.clone()])?;
        Ok(())
    }
}
