//! Daemon startup and connection acceptance.

use crate::prelude::*;

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn missing_deployment_root_fails_fast() {
    Command::cargo_bin("pitwalld")
        .unwrap()
        .arg("/definitely/not/a/deployment")
        .env("WS_PORT", "0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[tokio::test]
async fn daemon_accepts_upgrades_only_on_the_ws_path() {
    let deployment = deployment();
    let daemon = start_daemon(&deployment.work);

    // The configured path upgrades fine
    let ok = tokio::time::timeout(
        EVENT_TIMEOUT,
        tokio_tungstenite::connect_async(daemon.url()),
    )
    .await
    .expect("handshake timed out");
    assert!(ok.is_ok(), "upgrade on /ws should succeed: {ok:?}");

    // Any other path is refused, as the original server destroyed those
    let refused = tokio::time::timeout(
        EVENT_TIMEOUT,
        tokio_tungstenite::connect_async(daemon.url_for_path("/metrics")),
    )
    .await
    .expect("handshake timed out");
    assert!(refused.is_err(), "upgrade on /metrics must be refused");
}
