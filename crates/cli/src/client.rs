// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::io::Write;

use futures_util::{SinkExt, StreamExt};
use pitwall_core::{ClientEvent, ServerEvent};
use pitwall_daemon::protocol;
use thiserror::Error;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::debug;

/// Daemon URL, overridable for non-default deployments.
pub fn default_url() -> String {
    std::env::var("PITWALL_URL").unwrap_or_else(|_| "ws://127.0.0.1:3001/ws".to_string())
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },

    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] pitwall_daemon::ProtocolError),

    #[error("update failed: {0}")]
    UpdateFailed(String),

    #[error("connection closed before the update finished")]
    ConnectionClosed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Update trigger client
pub struct UpdateClient {
    url: String,
}

impl UpdateClient {
    pub fn new(url: String) -> Self {
        Self { url }
    }

    /// Trigger an update and stream progress lines to `out` until the
    /// run reaches a terminal event.
    pub async fn update(&self, out: &mut impl Write) -> Result<(), ClientError> {
        let (mut ws, _) = connect_async(self.url.as_str())
            .await
            .map_err(|source| ClientError::Connect {
                url: self.url.clone(),
                source: Box::new(source),
            })?;

        let frame = protocol::encode(&ClientEvent::TriggerUpdate)?;
        ws.send(Message::Text(frame)).await?;

        while let Some(frame) = ws.next().await {
            match frame? {
                Message::Text(text) => match protocol::decode::<ServerEvent>(&text) {
                    Ok(ServerEvent::UpdateProgress {
                        stage,
                        percent,
                        message,
                        stderr,
                    }) => {
                        write_progress(out, &stage, percent, &message, stderr.as_deref())?;
                    }
                    Ok(ServerEvent::UpdateError { message }) => {
                        let _ = ws.close(None).await;
                        return Err(ClientError::UpdateFailed(message));
                    }
                    Ok(ServerEvent::UpdateComplete { .. }) => {
                        let _ = ws.close(None).await;
                        return Ok(());
                    }
                    Err(e) => {
                        debug!(error = %e, "ignoring unrecognized frame");
                    }
                },
                Message::Close(_) => break,
                _ => {}
            }
        }

        Err(ClientError::ConnectionClosed)
    }
}

/// Render one progress event. An empty message falls back to the local
/// stage table (or the raw id for stages this build does not know).
fn write_progress(
    out: &mut impl Write,
    stage: &str,
    percent: u8,
    message: &str,
    stderr: Option<&str>,
) -> std::io::Result<()> {
    let label = if message.is_empty() {
        pitwall_core::display_for(stage).1
    } else {
        message.to_string()
    };
    writeln!(out, "[{percent:>3}%] {label}")?;
    if let Some(text) = stderr {
        writeln!(out, "       {text}")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
