// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Update pipeline stages and their progress encoding.
//!
//! The stage set is fixed; the percent/message mapping is a total,
//! enum-keyed function so a new stage cannot be added without the
//! compiler pointing at every match that must learn about it.

use serde::{Deserialize, Serialize};

/// One discrete, named step of the update pipeline's fixed sequence.
///
/// The serialized form is the wire stage id (`pull-start`, `up-to-date`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Start,
    Fetch,
    PullStart,
    Pull,
    InstallStart,
    Install,
    BuildStart,
    Build,
    CommitStart,
    Commit,
    PushStart,
    Push,
    NoChanges,
    StatusCheckError,
    UpToDate,
    Done,
}

impl Stage {
    /// Wire identifier for this stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Fetch => "fetch",
            Stage::PullStart => "pull-start",
            Stage::Pull => "pull",
            Stage::InstallStart => "install-start",
            Stage::Install => "install",
            Stage::BuildStart => "build-start",
            Stage::Build => "build",
            Stage::CommitStart => "commit-start",
            Stage::Commit => "commit",
            Stage::PushStart => "push-start",
            Stage::Push => "push",
            Stage::NoChanges => "no-changes",
            Stage::StatusCheckError => "status-check-error",
            Stage::UpToDate => "up-to-date",
            Stage::Done => "done",
        }
    }

    /// Parse a wire stage id.
    pub fn parse(raw: &str) -> Option<Stage> {
        match raw {
            "start" => Some(Stage::Start),
            "fetch" => Some(Stage::Fetch),
            "pull-start" => Some(Stage::PullStart),
            "pull" => Some(Stage::Pull),
            "install-start" => Some(Stage::InstallStart),
            "install" => Some(Stage::Install),
            "build-start" => Some(Stage::BuildStart),
            "build" => Some(Stage::Build),
            "commit-start" => Some(Stage::CommitStart),
            "commit" => Some(Stage::Commit),
            "push-start" => Some(Stage::PushStart),
            "push" => Some(Stage::Push),
            "no-changes" => Some(Stage::NoChanges),
            "status-check-error" => Some(Stage::StatusCheckError),
            "up-to-date" => Some(Stage::UpToDate),
            "done" => Some(Stage::Done),
            _ => None,
        }
    }

    /// Progress-bar percentage for this stage.
    ///
    /// Non-decreasing along every reachable emission order, so a
    /// progress bar driven by these values never regresses.
    pub fn percent(&self) -> u8 {
        match self {
            Stage::Start => 0,
            Stage::Fetch => 5,
            Stage::PullStart => 10,
            Stage::Pull => 30,
            Stage::InstallStart => 35,
            Stage::Install => 65,
            Stage::BuildStart => 70,
            Stage::Build => 95,
            Stage::CommitStart => 96,
            Stage::Commit => 97,
            Stage::PushStart => 98,
            Stage::Push => 99,
            Stage::NoChanges => 96,
            Stage::StatusCheckError => 96,
            Stage::UpToDate => 100,
            Stage::Done => 100,
        }
    }

    /// Human-readable message shown next to the progress indicator.
    pub fn message(&self) -> &'static str {
        match self {
            Stage::Start => "Starting update",
            Stage::Fetch => "Fetched remote refs",
            Stage::PullStart => "Pulling remote changes",
            Stage::Pull => "Pulled remote changes",
            Stage::InstallStart => "Installing dependencies",
            Stage::Install => "Dependencies installed",
            Stage::BuildStart => "Building",
            Stage::Build => "Build finished",
            Stage::CommitStart => "Committing local changes",
            Stage::Commit => "Local changes committed",
            Stage::PushStart => "Pushing to remote",
            Stage::Push => "Pushed to remote",
            Stage::NoChanges => "No local changes to publish",
            Stage::StatusCheckError => "Could not check working tree status",
            Stage::UpToDate => "Already up to date",
            Stage::Done => "Update complete",
        }
    }
}

/// Display mapping for a raw stage id.
///
/// Stage ids this build does not recognize fall back to
/// `(0, <raw id>)` instead of failing, so a client rendering events
/// from a newer server still shows something sensible.
pub fn display_for(raw: &str) -> (u8, String) {
    match Stage::parse(raw) {
        Some(stage) => (stage.percent(), stage.message().to_string()),
        None => (0, raw.to_string()),
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
