// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::artifacts::ArtifactLayout;
use crate::config::PipelineSettings;
use crate::errors::StageError;
use crate::model::DecayExponent;
use tokio_util::sync::CancellationToken;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageName {
    Initialization,
    Interpolation,
    ZonalAggregation,
    AttributeJoin,
    Regression,
    Autocorrelation,
    Finalization,
}

impl StageName {
    pub fn label(&self) -> &'static str {
        match self {
            StageName::Initialization => "initialization",
            StageName::Interpolation => "interpolation",
            StageName::ZonalAggregation => "zonal aggregation",
            StageName::AttributeJoin => "attribute join",
            StageName::Regression => "regression",
            StageName::Autocorrelation => "autocorrelation",
            StageName::Finalization => "finalization",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read-only state shared by every stage of one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub k: DecayExponent,
    pub layout: ArtifactLayout,
    pub settings: PipelineSettings,
    /// Cancelled by [`crate::engine::Pipeline::cancel_run`] or by the
    /// pipeline's own token.
    pub cancellation: CancellationToken,
}

/// Transient workspace for intermediate tables.
///
/// A single instance is shared by all runs of a pipeline and is only handed
/// out while the pipeline's scratch lock is held.
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: PathBuf,
}

impl ScratchWorkspace {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `table` as JSON under `name`, replacing the previous run's copy.
    pub fn write_table<T: Serialize>(&self, name: &str, table: &T) -> Result<PathBuf, StageError> {
        let path = self.dir.join(name);
        std::fs::write(&path, serde_json::to_vec_pretty(table)?)?;
        Ok(path)
    }
}
