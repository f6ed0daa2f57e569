// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::{RunContext, ScratchWorkspace};
use crate::errors::StageError;
use crate::traits::{GeoprocessingProvider, MoransI};

#[derive(Debug, Clone, PartialEq)]
pub struct AutocorrelationResult {
    pub statistic: MoransI,
    pub report: Option<PathBuf>,
}

/// Global Moran's I on the standardized residuals of the regression layer.
pub struct AutocorrelationStage {
    provider: Arc<dyn GeoprocessingProvider>,
}

impl AutocorrelationStage {
    pub fn new(provider: Arc<dyn GeoprocessingProvider>) -> Self {
        Self { provider }
    }

    /// A missing report is not an error; only a failed statistic is.
    pub async fn analyze(
        &self,
        layer_path: &Path,
        ctx: &RunContext,
        scratch: &ScratchWorkspace,
    ) -> Result<AutocorrelationResult, StageError> {
        let output = self
            .provider
            .spatial_autocorrelation(layer_path, &ctx.settings.fields.residual, scratch.dir())
            .await?;
        Ok(AutocorrelationResult {
            statistic: output.statistic,
            report: output.report,
        })
    }
}
