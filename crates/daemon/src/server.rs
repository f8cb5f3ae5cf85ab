// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server and connection handling.
//!
//! One connection = one progress channel. Each connection gets its own
//! outbound queue; the update service writes into it and this loop
//! forwards frames to the socket. Pipeline events are never broadcast
//! across connections.

use futures_util::{SinkExt, StreamExt};
use pitwall_adapters::ProcessRunner;
use pitwall_core::{ClientEvent, ServerEvent};
use pitwall_engine::UpdateService;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, error};

use crate::protocol::{self, ProtocolError};

/// Handle a single client connection until it closes.
///
/// The upgrade is accepted only on `ws_path`, as the original server
/// only upgraded `/ws`; anything else is refused with a 404.
pub async fn handle_connection<P, S>(
    service: Arc<UpdateService<P>>,
    stream: S,
    ws_path: String,
) -> Result<(), ServerError>
where
    P: ProcessRunner,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let callback = |req: &Request, response: Response| {
        if req.uri().path() == ws_path {
            Ok(response)
        } else {
            debug!(path = req.uri().path(), "refusing upgrade on unknown path");
            let mut reject = ErrorResponse::new(Some("not found\n".to_string()));
            *reject.status_mut() = StatusCode::NOT_FOUND;
            Err(reject)
        }
    };

    let ws = match accept_hdr_async(stream, callback).await {
        Ok(ws) => ws,
        Err(tungstenite::Error::Http(_)) => return Ok(()), // refused above
        Err(e) => return Err(ServerError::Handshake(e)),
    };
    debug!("client connected");

    let (mut ws_tx, mut ws_rx) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    loop {
        tokio::select! {
            // Outbound progress for this connection only
            Some(event) = rx.recv() => {
                let frame = protocol::encode(&event)?;
                ws_tx.send(Message::Text(frame)).await?;
            }

            // Inbound client events
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => match protocol::decode::<ClientEvent>(&text) {
                    Ok(ClientEvent::TriggerUpdate) => {
                        service.trigger(tx.clone());
                    }
                    Err(e) => {
                        // Unknown events are ignored, not fatal
                        debug!(error = %e, "ignoring unrecognized frame");
                    }
                },
                Some(Ok(Message::Ping(payload))) => {
                    ws_tx.send(Message::Pong(payload)).await?;
                }
                Some(Ok(Message::Close(_))) | None => {
                    // The in-flight run, if any, keeps going; its sends
                    // into the dropped queue become no-ops
                    debug!("client disconnected");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!(error = %e, "websocket read failed");
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tungstenite::Error),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
