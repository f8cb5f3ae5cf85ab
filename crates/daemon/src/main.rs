// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pitwall update daemon (pitwalld)
//!
//! Foreground server that owns the update pipeline and streams progress
//! to whichever client triggered it.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use pitwall_daemon::lifecycle::{self, Config};
use pitwall_daemon::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let root = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        std::env::current_dir()?
    };

    setup_logging();

    info!("Starting pitwalld for deployment: {}", root.display());

    let config = match Config::for_root(&root) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            return Err(e.into());
        }
    };
    let daemon = match lifecycle::startup(config).await {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            return Err(e.into());
        }
    };

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let local_addr = daemon.listener.local_addr()?;
    info!(
        "Daemon ready, listening on ws://{}{}",
        local_addr, daemon.config.daemon.ws_path
    );

    // Signal ready for parent process (e.g. systemd, CLI waiting for
    // startup); the address matters when the configured port was 0
    println!("READY {}", local_addr);

    // Main accept loop
    loop {
        tokio::select! {
            // Accept client connections; each gets its own channel task
            result = daemon.listener.accept() => {
                match result {
                    Ok((stream, peer)) => {
                        let service = Arc::clone(&daemon.service);
                        let ws_path = daemon.config.daemon.ws_path.clone();
                        tokio::spawn(async move {
                            if let Err(e) = server::handle_connection(service, stream, ws_path).await {
                                error!(%peer, "Error handling connection: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                    }
                }
            }

            // Graceful shutdown on SIGTERM
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }

            // Graceful shutdown on SIGINT
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                break;
            }
        }
    }

    info!("Daemon stopped");
    Ok(())
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
