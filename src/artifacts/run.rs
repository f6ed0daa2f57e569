// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::JoinLookupError;
use crate::model::DecayExponent;
use crate::traits::{MoransI, RegressionSummary};

/// Everything one run with a given K produced.
///
/// Returned by the orchestrator and persisted as the run manifest; replaced
/// only by a later run with the identical K.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunArtifacts {
    pub k: DecayExponent,
    pub surface: PathBuf,
    pub regression_layer: PathBuf,
    pub regression_report: PathBuf,
    /// Absent when the autocorrelation report could not be generated.
    pub autocorrelation_report: Option<PathBuf>,
    /// Coefficients and fit of the OLS model; absent for a bundle rebuilt
    /// from files alone.
    #[serde(default)]
    pub regression: Option<RegressionSummary>,
    pub morans_i: Option<MoransI>,
    #[serde(default)]
    pub warnings: Vec<JoinLookupError>,
}

impl RunArtifacts {
    /// Zone ids that had no zonal mean in this run.
    pub fn missing_zone_ids(&self) -> impl Iterator<Item = &str> {
        self.warnings.iter().map(|w| w.zone_id.as_str())
    }
}
