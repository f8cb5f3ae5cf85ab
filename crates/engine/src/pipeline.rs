// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The update pipeline state machine.
//!
//! Stages run strictly sequentially; every external invocation is a
//! suspension point and nothing else suspends. A fatal stage failure
//! aborts the run with a single error event; the two non-fatal checks
//! (behind count, post-build status) degrade as described in their
//! match arms.

use crate::commands;
use crate::sink::ProgressSink;
use pitwall_adapters::{CommandOutput, ProcessRunner};
use pitwall_core::{PipelineRun, Stage, UpdateFailure};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Instrument;

pub struct UpdatePipeline<P: ProcessRunner> {
    runner: P,
    root: PathBuf,
    command_timeout: Duration,
}

impl<P: ProcessRunner> UpdatePipeline<P> {
    /// `root` is the deployment checkout all commands run in.
    pub fn new(runner: P, root: PathBuf, command_timeout: Duration) -> Self {
        Self {
            runner,
            root,
            command_timeout,
        }
    }

    /// Execute one full run, emitting progress through `sink`.
    ///
    /// Always returns the terminal `PipelineRun`; failures have already
    /// been reported on the sink as a single `updateError`.
    pub async fn run(&self, sink: &ProgressSink) -> PipelineRun {
        let mut run = PipelineRun::begin();
        let span = tracing::info_span!("update.run", run_id = %run.id);

        let result = self.run_inner(&mut run, sink).instrument(span.clone()).await;

        let _guard = span.enter();
        match result {
            Ok(()) => {
                tracing::info!(stage = run.current_stage.as_str(), "update finished");
            }
            Err(failure) => {
                tracing::error!(error = %failure, "update aborted");
                sink.error(failure.to_string());
                run.fail();
            }
        }
        run
    }

    async fn run_inner(
        &self,
        run: &mut PipelineRun,
        sink: &ProgressSink,
    ) -> Result<(), UpdateFailure> {
        sink.progress(Stage::Start);

        self.exec(commands::fetch())
            .await
            .map_err(UpdateFailure::Fetch)?;
        run.advance(Stage::Fetch);
        sink.progress(Stage::Fetch);

        let upstream = self
            .exec(commands::upstream_ref())
            .await
            .map_err(UpdateFailure::UpstreamResolution)?
            .stdout
            .trim()
            .to_string();
        run.upstream_ref = Some(upstream.clone());

        // Resolved exactly once, before any pull. A failure here is
        // non-fatal: default to zero and surface the cause on the
        // up-to-date event so it stays distinguishable from a genuine
        // clean check.
        let (behind, count_error) = match self.exec(commands::behind_count(&upstream)).await {
            Ok(output) => match output.stdout.trim().parse::<u64>() {
                Ok(count) => (count, None),
                Err(_) => (
                    0,
                    Some(format!(
                        "unexpected rev-list output: {}",
                        output.stdout.trim()
                    )),
                ),
            },
            Err(text) => (0, Some(text)),
        };
        if let Some(text) = &count_error {
            tracing::warn!(error = %text, "behind-count check failed, defaulting to zero");
        }
        run.behind_count = Some(behind);

        if behind == 0 {
            run.complete(Stage::UpToDate);
            match count_error {
                Some(text) => sink.progress_with_stderr(Stage::UpToDate, text),
                None => sink.progress(Stage::UpToDate),
            }
            sink.complete();
            return Ok(());
        }

        run.advance(Stage::PullStart);
        sink.progress(Stage::PullStart);
        self.exec(commands::pull())
            .await
            .map_err(UpdateFailure::Pull)?;
        run.advance(Stage::Pull);
        sink.progress(Stage::Pull);

        run.advance(Stage::InstallStart);
        sink.progress(Stage::InstallStart);
        self.exec(commands::install())
            .await
            .map_err(UpdateFailure::Install)?;
        run.advance(Stage::Install);
        sink.progress(Stage::Install);

        run.advance(Stage::BuildStart);
        sink.progress(Stage::BuildStart);
        self.exec(commands::build())
            .await
            .map_err(UpdateFailure::Build)?;
        run.advance(Stage::Build);
        sink.progress(Stage::Build);

        // Install/build may have touched the tree (lockfiles, build
        // artifacts under version control); publish them if so. The
        // status check itself failing skips publish without aborting.
        match self.exec(commands::status()).await {
            Err(text) => {
                tracing::warn!(error = %text, "status check failed, skipping publish");
                run.advance(Stage::StatusCheckError);
                sink.progress_with_stderr(Stage::StatusCheckError, text);
            }
            Ok(output) if output.stdout.trim().is_empty() => {
                run.has_local_changes = Some(false);
                run.advance(Stage::NoChanges);
                sink.progress(Stage::NoChanges);
            }
            Ok(_) => {
                run.has_local_changes = Some(true);
                run.advance(Stage::CommitStart);
                sink.progress(Stage::CommitStart);
                self.exec(commands::stage_all())
                    .await
                    .map_err(UpdateFailure::Commit)?;
                self.exec(commands::commit())
                    .await
                    .map_err(UpdateFailure::Commit)?;
                run.advance(Stage::Commit);
                sink.progress(Stage::Commit);

                run.advance(Stage::PushStart);
                sink.progress(Stage::PushStart);
                let (remote, branch) = commands::split_upstream(&upstream);
                self.exec(commands::push(remote, branch))
                    .await
                    .map_err(UpdateFailure::Push)?;
                run.advance(Stage::Push);
                sink.progress(Stage::Push);
            }
        }

        run.complete(Stage::Done);
        sink.progress(Stage::Done);
        sink.complete();
        Ok(())
    }

    /// Run one external command with the per-command timeout applied;
    /// errors collapse to the captured cause text.
    async fn exec(
        &self,
        (program, args): (&'static str, Vec<String>),
    ) -> Result<CommandOutput, String> {
        let invocation = self.runner.run(program, &args, &self.root);
        match tokio::time::timeout(self.command_timeout, invocation).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "{program} timed out after {}s",
                self.command_timeout.as_secs()
            )),
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
