// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the pipeline run lifecycle.
//!
//! This module contains message types for logging events related to:
//! * Run start, completion, failure and cancellation
//! * Stage completion
//! * Progress checkpoints between stages

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Run accepted after K validation.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use nitrate_pipeline::observability::messages::pipeline::RunStarted;
///
/// let msg = RunStarted {
///     k: "2.0",
///     provider: "local",
///     sample_count: 10,
///     zone_count: 5,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted<'a> {
    pub k: &'a str,
    pub provider: &'a str,
    pub sample_count: usize,
    pub zone_count: usize,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting pipeline run with K={} on the {} provider: {} samples, {} zones",
            self.k, self.provider, self.sample_count, self.zone_count
        )
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            k = self.k,
            provider = self.provider,
            sample_count = self.sample_count,
            zone_count = self.zone_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_run",
            span_name = name,
            k = self.k,
            provider = self.provider,
            sample_count = self.sample_count,
            zone_count = self.zone_count,
        )
    }
}

/// Run finished and produced its artifact bundle.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted<'a> {
    pub k: &'a str,
    pub warning_count: usize,
    pub autocorrelation_report: bool,
    pub duration: std::time::Duration,
}

impl Display for RunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline run with K={} completed in {:?}: {} warnings, autocorrelation report {}",
            self.k,
            self.duration,
            self.warning_count,
            if self.autocorrelation_report { "written" } else { "absent" }
        )
    }
}

impl StructuredLog for RunCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            k = self.k,
            warning_count = self.warning_count,
            autocorrelation_report = self.autocorrelation_report,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// Run aborted by a fatal error.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use nitrate_pipeline::observability::messages::pipeline::RunFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// let msg = RunFailed {
///     k: "2.0",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct RunFailed<'a> {
    pub k: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pipeline run with K={} failed: {}", self.k, self.error)
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(k = self.k, error = %self.error, "{}", self);
    }
}

/// A stage finished successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct StageCompleted<'a> {
    pub stage: &'a str,
    pub k: &'a str,
    pub duration: std::time::Duration,
}

impl Display for StageCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' completed for K={} in {:?}",
            self.stage, self.k, self.duration
        )
    }
}

impl StructuredLog for StageCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            stage = self.stage,
            k = self.k,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// Cancellation was observed at a checkpoint.
///
/// # Log Level
/// `warn!` - Run stopped early; partial artifacts retained
pub struct RunCancelled<'a> {
    pub k: &'a str,
    pub after_stage: &'a str,
}

impl Display for RunCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline run with K={} cancelled after stage '{}'; partial artifacts retained",
            self.k, self.after_stage
        )
    }
}

impl StructuredLog for RunCancelled<'_> {
    fn log(&self) {
        tracing::warn!(k = self.k, after_stage = self.after_stage, "{}", self);
    }
}

/// Progress checkpoint handed to the progress sink.
///
/// # Log Level
/// `info!` - Operator-facing status line
pub struct ProgressReported<'a> {
    pub status: &'a str,
    pub fraction: f64,
}

impl Display for ProgressReported<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "[{:>3.0}%] {}", self.fraction * 100.0, self.status)
    }
}

impl StructuredLog for ProgressReported<'_> {
    fn log(&self) {
        tracing::info!(status = self.status, fraction = self.fraction, "{}", self);
    }
}

/// Output directories exist.
pub struct WorkspacePrepared<'a> {
    pub root: &'a std::path::Path,
}

impl Display for WorkspacePrepared<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Workspace prepared at {}", self.root.display())
    }
}

impl StructuredLog for WorkspacePrepared<'_> {
    fn log(&self) {
        tracing::debug!(root = %self.root.display(), "{}", self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn progress_message_shows_percentage() {
        let msg = ProgressReported {
            status: "Running Ordinary Least Squares regression...",
            fraction: 0.6,
        };
        assert_eq!(
            msg.to_string(),
            "[ 60%] Running Ordinary Least Squares regression..."
        );
    }

    #[test]
    fn completion_message_mentions_absent_report() {
        let msg = RunCompleted {
            k: "2.0",
            warning_count: 1,
            autocorrelation_report: false,
            duration: Duration::from_millis(5),
        };
        let text = msg.to_string();
        assert!(text.contains("K=2.0"));
        assert!(text.contains("1 warnings"));
        assert!(text.contains("absent"));
    }
}
