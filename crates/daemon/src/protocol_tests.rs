// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol unit tests

use super::*;
use pitwall_core::{ClientEvent, ServerEvent, Stage};

#[test]
fn encode_decode_roundtrip_client_event() {
    let event = ClientEvent::TriggerUpdate;

    let encoded = encode(&event).expect("encode failed");
    let decoded: ClientEvent = decode(&encoded).expect("decode failed");

    assert_eq!(event, decoded);
}

#[test]
fn encode_decode_roundtrip_server_events() {
    for event in [
        ServerEvent::progress(Stage::InstallStart),
        ServerEvent::progress_with_stderr(Stage::UpToDate, "rev-list failed"),
        ServerEvent::error("build failed: tsc exited 2"),
        ServerEvent::complete(),
    ] {
        let encoded = encode(&event).expect("encode failed");
        let decoded: ServerEvent = decode(&encoded).expect("decode failed");
        assert_eq!(event, decoded);
    }
}

#[test]
fn frames_are_bare_json_objects() {
    let encoded = encode(&ServerEvent::complete()).expect("encode failed");
    assert!(encoded.starts_with('{'), "should be JSON object: {encoded}");
    assert!(encoded.contains("\"updateComplete\""));
}

#[test]
fn decode_rejects_unknown_events() {
    let result: Result<ClientEvent, _> = decode(r#"{"event":"launchMissiles"}"#);
    assert!(matches!(result, Err(ProtocolError::Malformed(_))));
}

#[test]
fn decode_rejects_non_json() {
    let result: Result<ClientEvent, _> = decode("trigger please");
    assert!(result.is_err());
}
