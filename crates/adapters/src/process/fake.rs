// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process runner for testing

use super::{CommandOutput, ProcessError, ProcessRunner};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl ProcessCall {
    /// The invocation rendered as a command line, for assertions.
    pub fn rendered(&self) -> String {
        render(&self.program, &self.args)
    }
}

struct Script {
    prefix: String,
    result: Result<CommandOutput, ProcessError>,
}

/// Fake process runner: records every call and answers from scripted
/// responses keyed by command-line prefix. Unscripted commands succeed
/// with empty output.
#[derive(Clone, Default)]
pub struct FakeProcessRunner {
    calls: Arc<Mutex<Vec<ProcessCall>>>,
    scripts: Arc<Mutex<Vec<Script>>>,
}

impl FakeProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response for invocations whose rendered command line
    /// starts with `prefix`. First matching script wins.
    pub fn on(&self, prefix: &str, result: Result<CommandOutput, ProcessError>) {
        self.scripts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Script {
                prefix: prefix.to_string(),
                result,
            });
    }

    /// Script a success whose stdout is `stdout`.
    pub fn succeed_with(&self, prefix: &str, stdout: &str) {
        self.on(
            prefix,
            Ok(CommandOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
            }),
        );
    }

    /// Script a non-zero exit carrying `stderr`.
    pub fn fail_with(&self, prefix: &str, stderr: &str) {
        let program = prefix.split_whitespace().next().unwrap_or(prefix);
        self.on(
            prefix,
            Err(ProcessError::Failed {
                program: program.to_string(),
                stderr: stderr.to_string(),
            }),
        );
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<ProcessCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Recorded calls rendered as command lines.
    pub fn commands(&self) -> Vec<String> {
        self.calls().iter().map(ProcessCall::rendered).collect()
    }
}

#[async_trait]
impl ProcessRunner for FakeProcessRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<CommandOutput, ProcessError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ProcessCall {
                program: program.to_string(),
                args: args.to_vec(),
                cwd: cwd.to_path_buf(),
            });

        let rendered = render(program, args);
        let scripts = self.scripts.lock().unwrap_or_else(|e| e.into_inner());
        for script in scripts.iter() {
            if rendered.starts_with(&script.prefix) {
                return script.result.clone();
            }
        }

        Ok(CommandOutput::default())
    }
}

fn render(program: &str, args: &[String]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
