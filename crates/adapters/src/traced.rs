// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::process::{CommandOutput, ProcessError, ProcessRunner};
use async_trait::async_trait;
use std::path::Path;
use tracing::Instrument;

/// Wrapper that adds tracing to any ProcessRunner
#[derive(Clone)]
pub struct TracedProcessRunner<P> {
    inner: P,
}

impl<P> TracedProcessRunner<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: ProcessRunner> ProcessRunner for TracedProcessRunner<P> {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<CommandOutput, ProcessError> {
        let span = tracing::info_span!("process.run", program, cwd = %cwd.display());

        {
            let _guard = span.enter();
            tracing::info!(arg_count = args.len(), "starting");
        }

        let start = std::time::Instant::now();
        let result = self.inner.run(program, args, cwd).instrument(span.clone()).await;
        let elapsed = start.elapsed();

        let _guard = span.enter();
        match &result {
            Ok(output) => tracing::info!(
                elapsed_ms = elapsed.as_millis() as u64,
                stdout_len = output.stdout.len(),
                stderr_len = output.stderr.len(),
                "completed"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "failed"
            ),
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
