// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fatal pipeline errors.
//!
//! Anything in this module aborts a run. Recoverable per-row conditions
//! (join misses) travel separately as [`crate::errors::JoinLookupError`]
//! records inside `RunArtifacts::warnings`.

use thiserror::Error;

use crate::engine::StageName;
use crate::errors::{DatasetError, ExternalToolError, SchemaMigrationError};

/// The run parameter K was rejected before any stage ran.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputValidationError {
    #[error("K = {input}: K must be numeric")]
    NotNumeric { input: String },

    #[error("K = {value}: K must be a finite number")]
    NotFinite { value: f64 },

    #[error("K = {value}: K must be a value greater than 1")]
    NotGreaterThanOne { value: f64 },
}

/// Cause of a fatal stage failure.
#[derive(Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    SchemaMigration(#[from] SchemaMigrationError),

    #[error(transparent)]
    ExternalTool(#[from] ExternalToolError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Fatal outcome of `Pipeline::run_pipeline`.
///
/// Stage failures carry the originating stage and the underlying cause.
/// Artifacts written by completed stages are left on disk.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InputValidation(#[from] InputValidationError),

    #[error("{stage} stage failed: {cause}")]
    Stage {
        stage: StageName,
        #[source]
        cause: StageError,
    },

    #[error("run cancelled after {after} stage")]
    Cancelled { after: StageName },

    #[error("a run with K = {k} is already in progress")]
    RunInProgress { k: String },
}

impl PipelineError {
    pub(crate) fn stage(stage: StageName, cause: impl Into<StageError>) -> Self {
        PipelineError::Stage {
            stage,
            cause: cause.into(),
        }
    }

    /// Stage that produced the error, if the error came from a stage.
    pub fn failed_stage(&self) -> Option<StageName> {
        match self {
            PipelineError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type alias for pipeline runs.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_error_display_names_stage_and_cause() {
        let err = PipelineError::stage(
            StageName::Regression,
            ExternalToolError::new("ordinary_least_squares", "insufficient data"),
        );
        let text = err.to_string();
        assert!(text.contains("regression"), "{}", text);
        assert!(text.contains("insufficient data"), "{}", text);
        assert_eq!(err.failed_stage(), Some(StageName::Regression));
    }

    #[test]
    fn validation_error_is_not_a_stage_failure() {
        let err: PipelineError = InputValidationError::NotGreaterThanOne { value: 1.0 }.into();
        assert_eq!(err.failed_stage(), None);
        assert!(err.to_string().contains("greater than 1"));
    }
}
