// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger boundary for update runs.
//!
//! One service instance exists per daemon process. It owns the
//! single-flight guard and spawns accepted runs as detached tasks, so a
//! run's lifecycle is independent of the connection that triggered it.

use crate::guard::UpdateGuard;
use crate::pipeline::UpdatePipeline;
use crate::sink::ProgressSink;
use pitwall_adapters::ProcessRunner;
use pitwall_core::ServerEvent;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Message sent when a trigger arrives while a run is in flight.
pub const REJECTED_MESSAGE: &str = "update already in progress";

pub struct UpdateService<P: ProcessRunner> {
    pipeline: Arc<UpdatePipeline<P>>,
    guard: UpdateGuard,
}

impl<P: ProcessRunner> UpdateService<P> {
    pub fn new(runner: P, root: PathBuf, command_timeout: Duration) -> Self {
        Self {
            pipeline: Arc::new(UpdatePipeline::new(runner, root, command_timeout)),
            guard: UpdateGuard::new(),
        }
    }

    /// Handle a trigger from one connection; progress flows to `tx`.
    ///
    /// Returns whether a run was started. A rejected trigger emits a
    /// single `updateError` on `tx` and leaves the in-flight run
    /// untouched.
    pub fn trigger(&self, tx: mpsc::UnboundedSender<ServerEvent>) -> bool {
        let sink = ProgressSink::new(tx);

        let Some(permit) = self.guard.try_begin() else {
            tracing::warn!("trigger rejected, a run is already in flight");
            sink.error(REJECTED_MESSAGE);
            return false;
        };

        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(async move {
            // Slot stays taken until the task ends, whatever the outcome
            let _permit = permit;
            pipeline.run(&sink).await;
        });
        true
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
