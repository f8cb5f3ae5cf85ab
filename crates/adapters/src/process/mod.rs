// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External process execution adapters.
//!
//! Every pipeline stage goes through the same primitive: run a named
//! program in a working directory to completion and hand back captured
//! output or the captured error text. Stages differ only in what they
//! pass; there are no retries and no partial-output streaming here.

mod system;

pub use system::SystemProcessRunner;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcessRunner, ProcessCall};

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Captured output of a completed invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Errors from running an external program.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },

    /// Non-zero exit; carries the captured error text.
    #[error("{stderr}")]
    Failed { program: String, stderr: String },
}

/// Adapter for scoped invocation of external programs.
#[async_trait]
pub trait ProcessRunner: Clone + Send + Sync + 'static {
    /// Run `program` with `args` in `cwd` to completion.
    async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<CommandOutput, ProcessError>;
}

/// Build an owned argument list from literals.
pub fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
