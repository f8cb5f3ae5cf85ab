//! End-to-end update runs against a real git deployment.
//!
//! Only the up-to-date and fail-fast paths run here: neither reaches
//! the package tooling, so the specs stay hermetic.

use crate::prelude::*;

use assert_cmd::Command;
use futures_util::{SinkExt, StreamExt};
use predicates::prelude::*;
use serde_json::Value;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

const TRIGGER: &str = r#"{"event":"triggerUpdate"}"#;

/// Read frames until a terminal event; returns (stages, terminal event).
async fn run_to_terminal(
    ws: &mut (impl futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
          + Unpin),
) -> (Vec<String>, Value) {
    let mut stages = Vec::new();
    loop {
        let frame = tokio::time::timeout(EVENT_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for event")
            .expect("connection closed mid-run")
            .expect("websocket error");
        let Message::Text(text) = frame else { continue };
        let value: Value = serde_json::from_str(&text).unwrap();
        match value["event"].as_str().unwrap() {
            "updateProgress" => {
                stages.push(value["data"]["stage"].as_str().unwrap().to_string());
            }
            "updateComplete" | "updateError" => return (stages, value),
            other => panic!("unexpected event: {other}"),
        }
    }
}

#[tokio::test]
async fn up_to_date_deployment_is_a_no_op() {
    let deployment = deployment();
    let daemon = start_daemon(&deployment.work);

    let (mut ws, _) = connect_async(daemon.url()).await.unwrap();
    ws.send(Message::Text(TRIGGER.to_string())).await.unwrap();

    let (stages, terminal) = run_to_terminal(&mut ws).await;
    assert_eq!(stages, ["start", "fetch", "up-to-date"]);
    assert_eq!(terminal["event"], "updateComplete");
    assert_eq!(terminal["data"]["success"], true);
}

#[tokio::test]
async fn failed_run_reports_one_error_and_frees_the_guard() {
    let deployment = deployment();

    // Advance origin from a second checkout so the daemon's tree is
    // behind and the pipeline proceeds past the pull. The install or
    // build stage then fails (no real package tooling in the fixture),
    // which is exactly the fail-fast path under test.
    let other = deployment.work.parent().unwrap().join("other");
    git(
        deployment.work.parent().unwrap(),
        &["clone", "origin.git", other.to_str().unwrap()],
    );
    std::fs::write(other.join("README.md"), "new revision\n").unwrap();
    git(&other, &["add", "."]);
    git(
        &other,
        &[
            "-c",
            "user.email=specs@example.com",
            "-c",
            "user.name=specs",
            "commit",
            "-m",
            "advance origin",
        ],
    );
    git(&other, &["push", "origin", "main"]);

    let daemon = start_daemon(&deployment.work);
    let (mut ws, _) = connect_async(daemon.url()).await.unwrap();
    ws.send(Message::Text(TRIGGER.to_string())).await.unwrap();

    let (stages, terminal) = run_to_terminal(&mut ws).await;
    assert_eq!(terminal["event"], "updateError");
    assert!(stages.starts_with(&[
        "start".to_string(),
        "fetch".to_string(),
        "pull-start".to_string(),
        "pull".to_string(),
    ]));

    // The guard is released by the failed run: the next trigger starts
    // a fresh run instead of being rejected.
    ws.send(Message::Text(TRIGGER.to_string())).await.unwrap();
    let (second_stages, second_terminal) = run_to_terminal(&mut ws).await;
    assert_eq!(second_stages.first().map(String::as_str), Some("start"));
    assert_ne!(
        second_terminal["data"]["message"],
        "update already in progress"
    );
}

#[test]
fn cli_update_reports_up_to_date() {
    let deployment = deployment();
    let daemon = start_daemon(&deployment.work);
    let url = daemon.url();

    Command::cargo_bin("pitwall")
        .unwrap()
        .args(["--url", url.as_str(), "update"])
        .timeout(std::time::Duration::from_secs(60))
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up to date"))
        .stdout(predicate::str::contains("Update complete"));
}
