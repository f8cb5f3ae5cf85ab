// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run progress sink.
//!
//! Wraps the triggering connection's outbound queue. A run outlives its
//! connection: once the client disconnects the receiver is gone and
//! every send becomes a silent no-op, so the pipeline never observes
//! the disconnect.

use pitwall_core::{ServerEvent, Stage};
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct ProgressSink {
    tx: mpsc::UnboundedSender<ServerEvent>,
}

impl ProgressSink {
    pub fn new(tx: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: ServerEvent) {
        // Receiver dropped means the client went away mid-run
        let _ = self.tx.send(event);
    }

    pub fn progress(&self, stage: Stage) {
        self.send(ServerEvent::progress(stage));
    }

    pub fn progress_with_stderr(&self, stage: Stage, stderr: impl Into<String>) {
        self.send(ServerEvent::progress_with_stderr(stage, stderr));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(ServerEvent::error(message));
    }

    pub fn complete(&self) {
        self.send(ServerEvent::complete());
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
