use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mono_release::config;
use mono_release::domain::PublishChannel;
use mono_release::exec::{ConcurrencyCeiling, SystemRunner};
use mono_release::pipeline::{ReleaseOptions, ReleasePipeline};
use mono_release::ui::{self, TerminalPrompter};
use mono_release::workspace::Workspace;

#[derive(clap::Parser)]
#[command(
    name = "mono-release",
    version,
    about = "Version, tag, push and publish every package of a monorepo"
)]
struct Args {
    #[arg(long, help = "Repository root (defaults to the current directory)")]
    root: Option<PathBuf>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short = 't', long, help = "Publish channel (skips the channel prompt)")]
    channel: Option<String>,

    #[arg(short = 'j', long, help = "Maximum number of concurrent publish processes")]
    concurrency: Option<usize>,

    #[arg(long, help = "Only publish the packages as they are")]
    publish_only: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let config = config::load_config(&root, args.config.as_deref())?;
    let ceiling = ConcurrencyCeiling::resolve(args.concurrency.or(config.concurrency))?;
    let channel = args
        .channel
        .as_deref()
        .map(PublishChannel::parse)
        .transpose()?;

    let (workspace, warnings) = Workspace::discover(&root, &config)?;
    for warning in &warnings {
        ui::display_boundary_warning(warning);
    }
    tracing::info!(
        packages = workspace.items().len(),
        ceiling = ceiling.get(),
        "starting release"
    );

    let runner = SystemRunner::new();
    let mut prompter = TerminalPrompter::stdio();
    let mut pipeline = ReleasePipeline::new(&runner, &mut prompter, &workspace, &config, ceiling);
    let options = ReleaseOptions {
        channel,
        dry_run: args.dry_run,
    };

    let outcome = if args.publish_only {
        pipeline.publish_only(&options)
    } else {
        pipeline.release(&options)
    };

    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            let run = pipeline.run_record();
            if let Some(stage) = run.failed_at() {
                ui::display_status(&format!(
                    "Stopped during '{}' after '{}'; completed steps were not rolled back",
                    stage,
                    run.reached()
                ));
            }
            return Err(e.into());
        }
    };

    if args.dry_run {
        ui::display_status("Dry run: nothing was changed");
        return Ok(());
    }

    let version = report.version.as_ref().map(|v| v.to_string());
    ui::display_release_summary(
        version.as_deref(),
        report.channel.as_str(),
        report.published.len(),
    );
    Ok(())
}
