// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::RunContext;
use crate::errors::StageError;
use crate::model::{Boundary, SamplePointSet};
use crate::observability::messages::stage::ArtifactWritten;
use crate::observability::messages::StructuredLog;
use crate::traits::GeoprocessingProvider;

/// Builds the IDW surface for a run and stores it at the K-keyed raster path.
///
/// K is trusted to be valid here; the orchestrator validated it.
pub struct InterpolationStage {
    provider: Arc<dyn GeoprocessingProvider>,
}

impl InterpolationStage {
    pub fn new(provider: Arc<dyn GeoprocessingProvider>) -> Self {
        Self { provider }
    }

    /// Interpolate `samples` over `boundary` with power K and return the
    /// surface path. A previous surface for the same K is overwritten.
    pub async fn interpolate(
        &self,
        samples: &SamplePointSet,
        boundary: &Boundary,
        ctx: &RunContext,
    ) -> Result<PathBuf, StageError> {
        let surface = self
            .provider
            .idw_interpolate(
                samples,
                &ctx.settings.fields.sample_value,
                ctx.k.value(),
                ctx.settings.cell_size,
                boundary,
            )
            .await?;

        let path = ctx.layout.surface_path(&ctx.k);
        surface.save(&path)?;
        ArtifactWritten {
            kind: "surface",
            path: &path,
        }
        .log();
        Ok(path)
    }
}
