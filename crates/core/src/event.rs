// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire events for the per-client update channel.
//!
//! Frames are JSON text of the form `{"event": <name>, "data": <payload>}`;
//! payload-less events omit `data`. The event names are the ones the
//! dashboard's settings view listens for.

use crate::stage::Stage;
use serde::{Deserialize, Serialize};

/// Events a client may send to the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Request an update run. No payload.
    #[serde(rename = "triggerUpdate")]
    TriggerUpdate,
}

/// Events the daemon sends to the triggering client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// One stage of the pipeline was reached.
    #[serde(rename = "updateProgress")]
    UpdateProgress {
        stage: String,
        percent: u8,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stderr: Option<String>,
    },

    /// The run aborted; `message` embeds the failing stage's cause text.
    #[serde(rename = "updateError")]
    UpdateError { message: String },

    /// Terminal success marker, after the final progress event.
    #[serde(rename = "updateComplete")]
    UpdateComplete { success: bool },
}

impl ServerEvent {
    /// Progress event for `stage`; percent and message come from the
    /// stage encoder, never from the caller.
    pub fn progress(stage: Stage) -> Self {
        ServerEvent::UpdateProgress {
            stage: stage.as_str().to_string(),
            percent: stage.percent(),
            message: stage.message().to_string(),
            stderr: None,
        }
    }

    /// Progress event carrying captured stderr from a non-fatal failure.
    pub fn progress_with_stderr(stage: Stage, stderr: impl Into<String>) -> Self {
        ServerEvent::UpdateProgress {
            stage: stage.as_str().to_string(),
            percent: stage.percent(),
            message: stage.message().to_string(),
            stderr: Some(stderr.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::UpdateError {
            message: message.into(),
        }
    }

    pub fn complete() -> Self {
        ServerEvent::UpdateComplete { success: true }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
