//! Interactive resolution of the publish channel and the next version.
//!
//! Version selection is a small state machine:
//!
//! ```text
//! Prompting -> Confirming -> Accepted
//!     ^            |
//!     +- Rejected <+
//! ```
//!
//! Invalid answers (an unparsable custom version, a version that is not an
//! upgrade) are reported and asked again without leaving `Prompting`.
//! Rejecting the confirmation starts over with the same current version and
//! channel, as many times as the operator likes.

use semver::Version;

use crate::domain::{bump, parse_custom, BumpKind, PublishChannel, DEFAULT_CHANNEL};
use crate::error::{ReleaseError, Result};
use crate::ui::{self, Prompter};

/// Choice label that switches the channel prompt to free text.
pub const CUSTOM_CHANNEL_CHOICE: &str = "Custom Tag";

#[derive(Debug, Clone, PartialEq)]
enum ResolverState {
    Prompting,
    Confirming(Version),
    Rejected,
    Accepted(Version),
}

/// Asks the operator for the next version until they confirm one.
pub struct VersionResolver<'a> {
    prompter: &'a mut dyn Prompter,
}

impl<'a> VersionResolver<'a> {
    pub fn new(prompter: &'a mut dyn Prompter) -> Self {
        VersionResolver { prompter }
    }

    /// Resolve the version that follows `current`.
    ///
    /// # Returns
    /// * `Ok(Version)` - Confirmed, valid, and strictly greater than `current`
    /// * `Err` - Only when the operator can no longer be asked (e.g. input closed)
    pub fn resolve(&mut self, current: &Version, channel: &PublishChannel) -> Result<Version> {
        let mut state = ResolverState::Prompting;
        let mut attempt = 1;

        loop {
            state = match state {
                ResolverState::Prompting => {
                    ResolverState::Confirming(self.prompt_candidate(current, channel)?)
                }
                ResolverState::Confirming(candidate) => {
                    let message =
                        ui::version_change_message(&current.to_string(), &candidate.to_string());
                    if self.prompter.confirm(&message, true)? {
                        ResolverState::Accepted(candidate)
                    } else {
                        ResolverState::Rejected
                    }
                }
                ResolverState::Rejected => {
                    attempt += 1;
                    tracing::info!(attempt, "version rejected, asking again");
                    ResolverState::Prompting
                }
                ResolverState::Accepted(version) => {
                    tracing::info!(from = %current, to = %version, "version resolved");
                    return Ok(version);
                }
            };
        }
    }

    fn prompt_candidate(&mut self, current: &Version, channel: &PublishChannel) -> Result<Version> {
        let labels: Vec<String> = BumpKind::ALL.iter().map(|k| k.label().to_string()).collect();

        loop {
            let kind = BumpKind::ALL[self.prompter.select("Select version bump", &labels)?];
            let candidate = match kind {
                BumpKind::Custom => self.prompt_custom(current)?,
                kind => match bump(current, kind, channel.as_str()) {
                    Ok(version) => version,
                    Err(err) => {
                        recover(err)?;
                        continue;
                    }
                },
            };
            return Ok(candidate);
        }
    }

    fn prompt_custom(&mut self, current: &Version) -> Result<Version> {
        loop {
            let text = self.prompter.input("Enter custom version", None)?;
            match parse_custom(&text, current) {
                Ok(version) => return Ok(version),
                Err(err) => recover(err)?,
            }
        }
    }
}

/// Report a recoverable error to the operator; pass anything else through.
fn recover(err: ReleaseError) -> Result<()> {
    if err.is_recoverable() {
        tracing::debug!(error = %err, "answer rejected");
        ui::display_error(&err.to_string());
        Ok(())
    } else {
        Err(err)
    }
}

/// Ask the operator which channel to publish to.
///
/// `channels` are offered in order, followed by a free-text option whose
/// empty answer means [DEFAULT_CHANNEL].
pub fn resolve_channel(prompter: &mut dyn Prompter, channels: &[String]) -> Result<PublishChannel> {
    let mut choices = channels.to_vec();
    choices.push(CUSTOM_CHANNEL_CHOICE.to_string());

    let index = prompter.select("Select publish tag", &choices)?;
    if index < channels.len() {
        return PublishChannel::parse(&channels[index]).map_err(|e| {
            ReleaseError::config(format!("configured channel '{}': {}", channels[index], e))
        });
    }

    loop {
        let text = prompter.input("Enter custom tag", Some(DEFAULT_CHANNEL))?;
        match PublishChannel::parse(&text) {
            Ok(channel) => return Ok(channel),
            Err(err) => recover(err)?,
        }
    }
}
