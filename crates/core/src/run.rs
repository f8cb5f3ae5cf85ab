// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run pipeline state.
//!
//! A `PipelineRun` is ephemeral: it lives for the duration of one
//! triggered update and is never persisted. The working tree it
//! operates on is a shared, process-wide resource; the run itself
//! carries only what was resolved during this execution.

use crate::stage::Stage;
use uuid::Uuid;

/// Lifecycle state of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// In-memory record of a single update run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Identifier carried through tracing spans.
    pub id: Uuid,
    pub state: RunState,
    /// Last stage reached; transitions are monotonic along the fixed
    /// sequence, no stage is revisited within a run.
    pub current_stage: Stage,
    /// Remote tracking reference, resolved once per run.
    pub upstream_ref: Option<String>,
    /// Commits present upstream but not locally; computed exactly once,
    /// before any pull, never recomputed mid-run.
    pub behind_count: Option<u64>,
    /// Whether the rebuild left uncommitted modifications; resolved
    /// after the build stage.
    pub has_local_changes: Option<bool>,
}

impl PipelineRun {
    /// Create a run in `Running` at the `start` stage.
    pub fn begin() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: RunState::Running,
            current_stage: Stage::Start,
            upstream_ref: None,
            behind_count: None,
            has_local_changes: None,
        }
    }

    /// Record that the run reached `stage`.
    pub fn advance(&mut self, stage: Stage) {
        self.current_stage = stage;
    }

    /// Mark the run completed at its terminal stage.
    pub fn complete(&mut self, stage: Stage) {
        self.current_stage = stage;
        self.state = RunState::Completed;
    }

    /// Mark the run failed.
    pub fn fail(&mut self) {
        self.state = RunState::Failed;
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, RunState::Completed | RunState::Failed)
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
