// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process geoprocessing provider.
//!
//! Artifacts are written to the paths the pipeline asks for, whatever their
//! extension: surfaces and residual layers as JSON, reports as plain text.

mod idw;
mod morans;
mod ols;
mod zonal;

use async_trait::async_trait;
use std::path::Path;

use crate::errors::ProviderResult;
use crate::model::{Boundary, InterpolatedSurface, SamplePointSet, ZonalStatistic, ZoneGeometrySet};
use crate::traits::{
    AutocorrelationOutput, GeoprocessingProvider, RegressionOutput, RegressionRequest,
};

pub const TOOL_IDW: &str = "idw";
pub const TOOL_ZONAL: &str = "zonal_statistics";
pub const TOOL_OLS: &str = "ordinary_least_squares";
pub const TOOL_MORANS_I: &str = "spatial_autocorrelation";

/// Native Rust implementation of every provider capability.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalGeoprocessor;

impl LocalGeoprocessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GeoprocessingProvider for LocalGeoprocessor {
    async fn idw_interpolate(
        &self,
        points: &SamplePointSet,
        value_field: &str,
        power: f64,
        cell_size: f64,
        mask: &Boundary,
    ) -> ProviderResult<InterpolatedSurface> {
        idw::interpolate(points, value_field, power, cell_size, mask)
    }

    async fn zonal_mean(
        &self,
        zones: &ZoneGeometrySet,
        zone_id_field: &str,
        surface: &InterpolatedSurface,
    ) -> ProviderResult<ZonalStatistic> {
        zonal::zonal_mean(zones, zone_id_field, surface)
    }

    async fn ordinary_least_squares(
        &self,
        zones: &ZoneGeometrySet,
        request: &RegressionRequest,
    ) -> ProviderResult<RegressionOutput> {
        ols::ordinary_least_squares(zones, request)
    }

    async fn spatial_autocorrelation(
        &self,
        layer_path: &Path,
        field: &str,
        report_dir: &Path,
    ) -> ProviderResult<AutocorrelationOutput> {
        morans::spatial_autocorrelation(layer_path, field, report_dir)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
