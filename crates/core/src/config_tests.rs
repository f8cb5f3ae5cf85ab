// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

#[test]
fn defaults_match_original_deployment() {
    let config = DaemonConfig::default();
    assert_eq!(config.port, 3001);
    assert_eq!(config.ws_path, "/ws");
    assert_eq!(config.command_timeout_secs, 600);
    assert_eq!(config.listen_addr(), "0.0.0.0:3001");
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = DaemonConfig::load(dir.path()).unwrap();
    assert_eq!(config.port, DaemonConfig::default().port);
}

#[test]
fn file_values_are_read() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        "port = 4100\nws_path = \"/updates\"\ncommand_timeout_secs = 30\n",
    )
    .unwrap();
    let config = DaemonConfig::load(dir.path()).unwrap();
    assert_eq!(config.port, 4100);
    assert_eq!(config.ws_path, "/updates");
    assert_eq!(config.command_timeout_secs, 30);
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE), "prot = 4100\n").unwrap();
    assert!(matches!(
        DaemonConfig::load(dir.path()),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn env_port_overrides_file() {
    let env: HashMap<&str, &str> = HashMap::from([("PITWALL_PORT", "5005")]);
    let mut config = DaemonConfig::default();
    config
        .apply_overrides(|var| env.get(var).map(|v| v.to_string()))
        .unwrap();
    assert_eq!(config.port, 5005);
}

#[test]
fn legacy_ws_port_var_is_honored() {
    let env: HashMap<&str, &str> = HashMap::from([("WS_PORT", "3010")]);
    let mut config = DaemonConfig::default();
    config
        .apply_overrides(|var| env.get(var).map(|v| v.to_string()))
        .unwrap();
    assert_eq!(config.port, 3010);
}

#[test]
fn pitwall_port_wins_over_ws_port() {
    let env: HashMap<&str, &str> =
        HashMap::from([("PITWALL_PORT", "7000"), ("WS_PORT", "3010")]);
    let mut config = DaemonConfig::default();
    config
        .apply_overrides(|var| env.get(var).map(|v| v.to_string()))
        .unwrap();
    assert_eq!(config.port, 7000);
}

#[test]
fn unparsable_override_is_an_error() {
    let env: HashMap<&str, &str> = HashMap::from([("WS_PORT", "not-a-port")]);
    let mut config = DaemonConfig::default();
    let err = config
        .apply_overrides(|var| env.get(var).map(|v| v.to_string()))
        .unwrap_err();
    assert!(matches!(err, ConfigError::BadEnvValue { .. }));
}
