// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal pipeline failures.
//!
//! Each variant aborts the run, is reported to the triggering client as
//! a single `updateError`, and releases the single-flight guard. The
//! carried string is the captured error text of the failing external
//! command; no structured codes cross the channel boundary.
//!
//! The two non-fatal conditions (behind-count resolution and the
//! post-build status check) are handled inline by the controller and
//! deliberately have no variant here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateFailure {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("could not resolve upstream tracking ref: {0}")]
    UpstreamResolution(String),

    #[error("pull failed: {0}")]
    Pull(String),

    #[error("install failed: {0}")]
    Install(String),

    #[error("build failed: {0}")]
    Build(String),

    #[error("commit failed: {0}")]
    Commit(String),

    #[error("push failed: {0}")]
    Push(String),
}

#[cfg(test)]
#[path = "failure_tests.rs"]
mod tests;
