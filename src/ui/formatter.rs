//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use console::style;

use crate::boundary::BoundaryWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Confirmation question for a version change, e.g. "Confirm version bump: 1.2.3 -> 1.3.0"
pub fn version_change_message(current: &str, next: &str) -> String {
    format!(
        "Confirm version bump: {} -> {}",
        style(current).green(),
        style(next).green()
    )
}

/// Display what a release would do without doing it.
///
/// # Arguments
/// * `version` - The resolved version
/// * `channel` - Publish channel the packages would go to
/// * `packages` - Display names of the target packages
pub fn display_release_plan(version: &str, channel: &str, packages: &[String]) {
    println!("\n{}", style("Release plan:").bold());
    println!("  Version: {}", style(version).green());
    println!("  Tag:     {}", style(format!("v{}", version)).cyan());
    println!("  Channel: {}", style(channel).cyan());
    println!("  Packages ({}):", packages.len());
    for package in packages {
        println!("    - {}", package);
    }
}

/// Display the end-of-run summary.
pub fn display_release_summary(version: Option<&str>, channel: &str, published: usize) {
    match version {
        Some(version) => println!(
            "\n{} Released v{} to '{}' ({} packages)\n",
            style("✓").green(),
            version,
            channel,
            published
        ),
        None => println!(
            "\n{} Published {} packages to '{}'\n",
            style("✓").green(),
            published,
            channel
        ),
    }
}
