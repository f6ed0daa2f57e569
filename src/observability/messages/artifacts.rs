// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for run manifest and zone dataset persistence.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Manifest for a run was (re)written.
pub struct ManifestWritten<'a> {
    pub k: &'a str,
    pub path: &'a Path,
}

impl Display for ManifestWritten<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Recorded artifacts for K={} at {}",
            self.k,
            self.path.display()
        )
    }
}

impl StructuredLog for ManifestWritten<'_> {
    fn log(&self) {
        tracing::debug!(k = self.k, path = %self.path.display(), "{}", self);
    }
}

/// Manifest exists but could not be parsed; the lookup falls back to paths only.
///
/// # Log Level
/// `warn!` - Degraded lookup
pub struct ManifestUnreadable<'a> {
    pub path: &'a Path,
    pub error: &'a dyn std::error::Error,
}

impl Display for ManifestUnreadable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Ignoring unreadable manifest {}: {}",
            self.path.display(),
            self.error
        )
    }
}

impl StructuredLog for ManifestUnreadable<'_> {
    fn log(&self) {
        tracing::warn!(path = %self.path.display(), error = %self.error, "{}", self);
    }
}

/// Zone dataset written back after a run, including a failed one.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ZonesSaved<'a> {
    pub path: &'a Path,
    pub run_succeeded: bool,
}

impl Display for ZonesSaved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Saved zone dataset {} after {} run",
            self.path.display(),
            if self.run_succeeded { "a completed" } else { "a failed" }
        )
    }
}

impl StructuredLog for ZonesSaved<'_> {
    fn log(&self) {
        tracing::info!(
            path = %self.path.display(),
            run_succeeded = self.run_succeeded,
            "{}", self
        );
    }
}

/// Zone dataset could not be written back after a failed run.
///
/// # Log Level
/// `error!` - The run error is returned; this one is only logged
pub struct ZonesSaveFailed<'a> {
    pub path: &'a Path,
    pub error: &'a dyn std::error::Error,
}

impl Display for ZonesSaveFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to save zone dataset {}: {}",
            self.path.display(),
            self.error
        )
    }
}

impl StructuredLog for ZonesSaveFailed<'_> {
    fn log(&self) {
        tracing::error!(path = %self.path.display(), error = %self.error, "{}", self);
    }
}
