// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External commands the pipeline invokes, in stage order.
//!
//! All of them run with the deployment root as working directory and
//! mutate the shared working tree only through the invoked program.

use pitwall_adapters::process::args;

/// Fixed message for the automatic publish commit.
pub const COMMIT_MESSAGE: &str = "Automatic update: update automatico (npm install/build)";

pub fn fetch() -> (&'static str, Vec<String>) {
    ("git", args(&["fetch"]))
}

/// Resolve the current branch's remote tracking reference.
pub fn upstream_ref() -> (&'static str, Vec<String>) {
    ("git", args(&["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"]))
}

/// Count commits present on `upstream` but not locally.
pub fn behind_count(upstream: &str) -> (&'static str, Vec<String>) {
    (
        "git",
        vec![
            "rev-list".to_string(),
            "--count".to_string(),
            format!("HEAD..{upstream}"),
        ],
    )
}

pub fn pull() -> (&'static str, Vec<String>) {
    ("git", args(&["pull"]))
}

pub fn install() -> (&'static str, Vec<String>) {
    ("npm", args(&["install"]))
}

pub fn build() -> (&'static str, Vec<String>) {
    ("npm", args(&["run", "build"]))
}

pub fn status() -> (&'static str, Vec<String>) {
    ("git", args(&["status", "--porcelain"]))
}

pub fn stage_all() -> (&'static str, Vec<String>) {
    ("git", args(&["add", "-A"]))
}

pub fn commit() -> (&'static str, Vec<String>) {
    ("git", args(&["commit", "-m", COMMIT_MESSAGE]))
}

pub fn push(remote: &str, branch: &str) -> (&'static str, Vec<String>) {
    (
        "git",
        vec![
            "push".to_string(),
            remote.to_string(),
            format!("HEAD:{branch}"),
        ],
    )
}

/// Split an upstream tracking reference into remote and branch.
///
/// `origin/main` -> (`origin`, `main`); a ref without a separator keeps
/// the whole string as the remote and pushes to `HEAD`.
pub fn split_upstream(upstream: &str) -> (&str, &str) {
    match upstream.split_once('/') {
        Some((remote, branch)) => (remote, branch),
        None => (upstream, "HEAD"),
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
