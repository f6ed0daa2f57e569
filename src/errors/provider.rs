// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors crossing the geoprocessing provider boundary, plus the two
//! non-fatal records the pipeline carries forward instead of aborting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// The geoprocessing provider failed to run a tool.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{tool} failed: {message}")]
pub struct ExternalToolError {
    pub tool: &'static str,
    pub message: String,
}

impl ExternalToolError {
    pub fn new(tool: &'static str, message: impl Into<String>) -> Self {
        Self {
            tool,
            message: message.into(),
        }
    }
}

/// Result type alias for provider capabilities.
pub type ProviderResult<T> = Result<T, ExternalToolError>;

/// A zone identifier had no entry in the zonal statistic.
///
/// Recorded once per missing zone; never aborts the join.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("no zonal mean for zone '{zone_id}'")]
pub struct JoinLookupError {
    pub zone_id: String,
}

/// The autocorrelation report could not be written.
///
/// Soft failure: the provider logs it and hands back an absent report handle.
#[derive(Error, Debug)]
#[error("failed to generate report at {path}: {source}")]
pub struct ReportGenerationError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
