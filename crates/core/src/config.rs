// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration.
//!
//! Read from an optional `pitwall.toml` in the deployment root, with
//! environment overrides on top. Defaults reproduce the original
//! deployment: port 3001 so the dashboard can run separately on 3000,
//! WebSocket path `/ws`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name, looked up in the deployment root.
pub const CONFIG_FILE: &str = "pitwall.toml";

/// Port override variables, checked in order. `WS_PORT` is the name the
/// original deployment used.
const PORT_VARS: &[&str] = &["PITWALL_PORT", "WS_PORT"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonConfig {
    /// TCP port the WebSocket server listens on.
    pub port: u16,
    /// Upgrade path; connections to any other path are refused.
    pub ws_path: String,
    /// Per-command timeout; expiry is treated as that stage's fatal
    /// failure.
    pub command_timeout_secs: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            ws_path: "/ws".to_string(),
            command_timeout_secs: 600,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {value}")]
    BadEnvValue { var: String, value: String },
}

impl DaemonConfig {
    /// Load config for a deployment root: file if present, defaults
    /// otherwise, environment overrides last.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(&root.join(CONFIG_FILE))?;
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides through `lookup` (injectable so tests
    /// stay free of process-global state).
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        for &var in PORT_VARS {
            if let Some(value) = lookup(var) {
                self.port = value.parse().map_err(|_| ConfigError::BadEnvValue {
                    var: var.to_string(),
                    value,
                })?;
                break;
            }
        }
        if let Some(value) = lookup("PITWALL_TIMEOUT_SECS") {
            self.command_timeout_secs =
                value.parse().map_err(|_| ConfigError::BadEnvValue {
                    var: "PITWALL_TIMEOUT_SECS".to_string(),
                    value,
                })?;
        }
        Ok(())
    }

    /// Address the listener binds, all interfaces like the original.
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
