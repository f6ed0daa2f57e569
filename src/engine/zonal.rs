// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::Path;
use std::sync::Arc;

use crate::config::consts::ZONAL_SCRATCH_TABLE;
use crate::engine::ScratchWorkspace;
use crate::errors::StageError;
use crate::model::{InterpolatedSurface, ZonalStatistic, ZoneGeometrySet};
use crate::observability::messages::stage::ArtifactWritten;
use crate::observability::messages::StructuredLog;
use crate::traits::GeoprocessingProvider;

/// Reduces a stored surface to one mean per zone.
pub struct ZonalAggregationStage {
    provider: Arc<dyn GeoprocessingProvider>,
}

impl ZonalAggregationStage {
    pub fn new(provider: Arc<dyn GeoprocessingProvider>) -> Self {
        Self { provider }
    }

    /// Mean of the surface cells inside each zone.
    ///
    /// Zones that cover no cell are absent from the result. The table is
    /// also dumped into the scratch workspace.
    pub async fn aggregate(
        &self,
        surface_path: &Path,
        zones: &ZoneGeometrySet,
        zone_id_field: &str,
        scratch: &ScratchWorkspace,
    ) -> Result<ZonalStatistic, StageError> {
        let surface = InterpolatedSurface::load(surface_path)?;
        let statistic = self
            .provider
            .zonal_mean(zones, zone_id_field, &surface)
            .await?;

        let table = scratch.write_table(ZONAL_SCRATCH_TABLE, &statistic)?;
        ArtifactWritten {
            kind: "zonal table",
            path: &table,
        }
        .log();
        Ok(statistic)
    }
}
