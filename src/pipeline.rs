//! End-to-end release orchestration.
//!
//! A release walks these stages strictly in order, stopping at the first
//! failure:
//!
//! ```text
//! Init -> ChannelResolved -> VersionResolved -> ManifestsUpdated -> Built
//!      -> Committed -> Pushed -> Published -> Done
//! ```
//!
//! Nothing is rolled back on failure: manifests already written, commits,
//! tags and pushes stay in place. The run record tells the caller how far
//! the pipeline got.

use std::fmt;
use std::path::{Path, PathBuf};

use semver::Version;

use crate::config::ReleaseConfig;
use crate::domain::{PublishChannel, ReleaseTag};
use crate::error::Result;
use crate::exec::{BatchExecutor, CommandRunner, ConcurrencyCeiling, OutputMode};
use crate::manifest::update_versions;
use crate::resolver::{resolve_channel, VersionResolver};
use crate::ui::{self, Prompter};
use crate::vcs::Vcs;
use crate::workspace::{WorkItem, Workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    ChannelResolved,
    VersionResolved,
    ManifestsUpdated,
    Built,
    Committed,
    Pushed,
    Published,
    Done,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::ChannelResolved => "channel-resolved",
            Stage::VersionResolved => "version-resolved",
            Stage::ManifestsUpdated => "manifests-updated",
            Stage::Built => "built",
            Stage::Committed => "committed",
            Stage::Pushed => "pushed",
            Stage::Published => "published",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stage outcomes of one invocation; never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineRun {
    completed: Vec<Stage>,
    failed: Option<Stage>,
}

impl PipelineRun {
    /// Stages that completed, in order
    pub fn completed(&self) -> &[Stage] {
        &self.completed
    }

    /// Last completed stage
    pub fn reached(&self) -> Stage {
        self.completed.last().copied().unwrap_or(Stage::Init)
    }

    /// Stage whose work failed, if any
    pub fn failed_at(&self) -> Option<Stage> {
        self.failed
    }

    pub fn has_reached(&self, stage: Stage) -> bool {
        self.completed.contains(&stage)
    }

    fn advance(&mut self, stage: Stage) {
        tracing::info!(stage = %stage, "stage complete");
        self.completed.push(stage);
    }

    fn fail(&mut self, stage: Stage) {
        tracing::warn!(stage = %stage, "stage failed");
        self.failed = Some(stage);
    }
}

/// Per-invocation choices, usually from the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseOptions {
    /// Skip the channel prompt
    pub channel: Option<PublishChannel>,
    /// Stop after resolving the version and show the plan
    pub dry_run: bool,
}

/// Result of a successful (or dry) run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseReport {
    pub channel: PublishChannel,
    pub version: Option<Version>,
    pub tag: Option<ReleaseTag>,
    pub branch: Option<String>,
    pub modified: Vec<PathBuf>,
    pub published: Vec<PathBuf>,
    pub run: PipelineRun,
}

impl ReleaseReport {
    fn new(channel: PublishChannel) -> Self {
        ReleaseReport {
            channel,
            version: None,
            tag: None,
            branch: None,
            modified: Vec::new(),
            published: Vec::new(),
            run: PipelineRun::default(),
        }
    }
}

/// Drives a release of every package in a [Workspace]
pub struct ReleasePipeline<'a> {
    runner: &'a dyn CommandRunner,
    prompter: &'a mut dyn Prompter,
    workspace: &'a Workspace,
    config: &'a ReleaseConfig,
    ceiling: ConcurrencyCeiling,
    run: PipelineRun,
}

impl<'a> ReleasePipeline<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        prompter: &'a mut dyn Prompter,
        workspace: &'a Workspace,
        config: &'a ReleaseConfig,
        ceiling: ConcurrencyCeiling,
    ) -> Self {
        ReleasePipeline {
            runner,
            prompter,
            workspace,
            config,
            ceiling,
            run: PipelineRun::default(),
        }
    }

    /// How far the most recent run got, including after a failure
    pub fn run_record(&self) -> &PipelineRun {
        &self.run
    }

    fn step<T>(&mut self, stage: Stage, work: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        match work(self) {
            Ok(value) => {
                self.run.advance(stage);
                Ok(value)
            }
            Err(err) => {
                self.run.fail(stage);
                Err(err)
            }
        }
    }

    /// Full release: version, manifests, build, commit/tag, push, publish
    pub fn release(&mut self, options: &ReleaseOptions) -> Result<ReleaseReport> {
        self.run = PipelineRun::default();

        let channel = self.step(Stage::ChannelResolved, |p| p.channel(options))?;
        let mut report = ReleaseReport::new(channel.clone());

        let version = self.step(Stage::VersionResolved, |p| {
            let current = p.workspace.current_version()?;
            VersionResolver::new(&mut *p.prompter).resolve(&current, &channel)
        })?;
        let tag = ReleaseTag::for_version(&version);
        report.version = Some(version.clone());
        report.tag = Some(tag.clone());

        if options.dry_run {
            let names: Vec<String> = self
                .workspace
                .items()
                .iter()
                .map(WorkItem::display_name)
                .collect();
            ui::display_release_plan(&version.to_string(), channel.as_str(), &names);
            report.run = self.run.clone();
            return Ok(report);
        }

        report.modified = self.step(Stage::ManifestsUpdated, |p| {
            ui::display_status(&format!("Updating manifests to {}", version));
            update_versions(
                &p.workspace.dirs(),
                &p.config.manifest,
                &version,
                p.config.behavior.sync_internal_dependencies,
            )
        })?;

        self.step(Stage::Built, |p| {
            let build = &p.config.build;
            let args = build.render_args(channel.as_str(), Some(&version.to_string()));
            ui::display_status("Building packages");
            p.runner
                .run(&build.program, &args, p.workspace.root(), OutputMode::Inherit)
        })?;

        let modified = report.modified.clone();
        self.step(Stage::Committed, |p| {
            let files: Vec<&Path> = modified.iter().map(|f| p.workspace.relative(f)).collect();
            Vcs::new(p.runner, p.workspace.root()).commit_and_tag(
                &files,
                &tag,
                p.config.behavior.no_verify,
            )?;
            ui::display_success(&format!("Committed and tagged {}", tag));
            Ok(())
        })?;

        report.branch = Some(self.step(Stage::Pushed, |p| {
            let vcs = Vcs::new(p.runner, p.workspace.root());
            let branch = vcs.current_branch()?;
            vcs.push(&p.config.remote, &branch, &tag)?;
            ui::display_success(&format!("Pushed {} and {} to {}", branch, tag, p.config.remote));
            Ok(branch)
        })?);

        report.published = self.step(Stage::Published, |p| p.publish(&channel, Some(&version)))?;

        self.run.advance(Stage::Done);
        report.run = self.run.clone();
        Ok(report)
    }

    /// Publish every package as it is, without touching versions or git
    pub fn publish_only(&mut self, options: &ReleaseOptions) -> Result<ReleaseReport> {
        self.run = PipelineRun::default();

        let channel = self.step(Stage::ChannelResolved, |p| p.channel(options))?;
        let mut report = ReleaseReport::new(channel.clone());

        if options.dry_run {
            let names: Vec<String> = self
                .workspace
                .items()
                .iter()
                .map(WorkItem::display_name)
                .collect();
            ui::display_status(&format!(
                "Dry run: would publish {} packages to '{}': {}",
                names.len(),
                channel,
                names.join(", ")
            ));
            report.run = self.run.clone();
            return Ok(report);
        }

        report.published = self.step(Stage::Published, |p| p.publish(&channel, None))?;

        self.run.advance(Stage::Done);
        report.run = self.run.clone();
        Ok(report)
    }

    fn channel(&mut self, options: &ReleaseOptions) -> Result<PublishChannel> {
        match &options.channel {
            Some(channel) => Ok(channel.clone()),
            None => resolve_channel(&mut *self.prompter, &self.config.channels),
        }
    }

    fn publish(&self, channel: &PublishChannel, version: Option<&Version>) -> Result<Vec<PathBuf>> {
        let publish = &self.config.publish;
        let version = version.map(Version::to_string);
        let args = publish.render_args(channel.as_str(), version.as_deref());
        let dirs = self.workspace.dirs();

        ui::display_status(&format!(
            "Publishing {} packages to '{}' ({} at a time)",
            dirs.len(),
            channel,
            self.ceiling.get()
        ));
        let report = BatchExecutor::new(self.runner, self.ceiling).run_batched(
            &publish.program,
            &args,
            &dirs,
            OutputMode::Capture,
        )?;
        Ok(report.completed)
    }
}
