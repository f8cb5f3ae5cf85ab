// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pitwall_adapters::{SystemProcessRunner, TracedProcessRunner};
use pitwall_core::{ConfigError, DaemonConfig};
use pitwall_engine::UpdateService;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

/// Service with the concrete adapter stack (wrapped with tracing)
pub type DaemonService = UpdateService<TracedProcessRunner<SystemProcessRunner>>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment root all pipeline commands run in
    pub root: PathBuf,
    /// Listener/timeout settings
    pub daemon: DaemonConfig,
}

impl Config {
    /// Resolve config for a deployment root
    pub fn for_root(root: &Path) -> Result<Self, LifecycleError> {
        let canonical = root
            .canonicalize()
            .map_err(|e| LifecycleError::RootNotFound(root.to_path_buf(), e))?;
        let daemon = DaemonConfig::load(&canonical)?;
        Ok(Self {
            root: canonical,
            daemon,
        })
    }
}

/// Daemon state during operation
pub struct DaemonState {
    pub config: Config,
    /// TCP listener clients upgrade on
    pub listener: TcpListener,
    /// The process-wide update service, shared by every connection
    pub service: Arc<DaemonService>,
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Deployment root not found at {0}: {1}")]
    RootNotFound(PathBuf, std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind {0}: {1}")]
    BindFailed(String, std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub async fn startup(config: Config) -> Result<DaemonState, LifecycleError> {
    let addr = config.daemon.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| LifecycleError::BindFailed(addr, e))?;

    let runner = TracedProcessRunner::new(SystemProcessRunner::new());
    let service = Arc::new(UpdateService::new(
        runner,
        config.root.clone(),
        Duration::from_secs(config.daemon.command_timeout_secs),
    ));

    info!(
        "Daemon started for deployment: {}",
        config.root.display()
    );

    Ok(DaemonState {
        config,
        listener,
        service,
    })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
