//! Shared fixtures: throwaway git deployments and a running daemon.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;

/// How long to wait for any single wire event. Generous enough to
/// outlast the fixture's per-command timeout.
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Run git in `dir`, panicking with full output on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed:\n{}\n{}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
}

/// A working checkout tracking a local bare origin, already pushed and
/// therefore up to date.
pub struct Deployment {
    _root: TempDir,
    pub work: PathBuf,
}

pub fn deployment() -> Deployment {
    let root = tempfile::tempdir().unwrap();
    let origin = root.path().join("origin.git");
    let work = root.path().join("work");

    git(root.path(), &["init", "--bare", origin.to_str().unwrap()]);
    git(root.path(), &["init", "-b", "main", work.to_str().unwrap()]);

    std::fs::write(work.join("package.json"), "{\"name\":\"deployment\"}\n").unwrap();
    // Cap command runtime so a wedged package tool cannot stall a spec
    std::fs::write(work.join("pitwall.toml"), "command_timeout_secs = 45\n").unwrap();
    git(&work, &["add", "."]);
    git(
        &work,
        &[
            "-c",
            "user.email=specs@example.com",
            "-c",
            "user.name=specs",
            "commit",
            "-m",
            "initial",
        ],
    );
    git(&work, &["remote", "add", "origin", origin.to_str().unwrap()]);
    git(&work, &["push", "-u", "origin", "main"]);

    Deployment { _root: root, work }
}

/// A running `pitwalld` bound to an ephemeral port.
pub struct DaemonHandle {
    child: Child,
    pub port: u16,
}

impl DaemonHandle {
    pub fn url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    pub fn url_for_path(&self, path: &str) -> String {
        format!("ws://127.0.0.1:{}{}", self.port, path)
    }
}

impl Drop for DaemonHandle {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Start the daemon for `root` and wait for its READY line.
pub fn start_daemon(root: &Path) -> DaemonHandle {
    let mut child = Command::new(assert_cmd::cargo::cargo_bin("pitwalld"))
        .arg(root)
        .env("WS_PORT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn pitwalld");

    let stdout = child.stdout.take().expect("daemon stdout");
    let mut lines = BufReader::new(stdout).lines();
    let ready = lines
        .next()
        .expect("daemon exited before READY")
        .expect("failed to read daemon stdout");
    assert!(ready.starts_with("READY "), "unexpected line: {ready}");

    let port = ready
        .rsplit(':')
        .next()
        .and_then(|p| p.trim().parse::<u16>().ok())
        .unwrap_or_else(|| panic!("could not parse port from: {ready}"));

    DaemonHandle { child, port }
}
