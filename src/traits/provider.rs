// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ProviderResult;
use crate::model::{Boundary, InterpolatedSurface, SamplePointSet, ZonalStatistic, ZoneGeometrySet};

/// Output locations and field names for an OLS fit.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionRequest {
    pub id_field: String,
    pub dependent_field: String,
    pub explanatory_field: String,
    /// Name of the standardized-residual field on the output layer.
    pub residual_field: String,
    pub layer_path: PathBuf,
    pub report_path: PathBuf,
}

/// Model-level numbers from an OLS fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummary {
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
    pub adjusted_r_squared: f64,
    pub observations: usize,
    /// Rows left out of the fit because a variable was null.
    pub excluded: usize,
}

/// The residual layer as written to disk: the fitted zones with the model
/// summary alongside. Readers that only want the zones can deserialize the
/// file as a [`ZoneGeometrySet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionLayer {
    pub summary: RegressionSummary,
    #[serde(flatten)]
    pub layer: ZoneGeometrySet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegressionOutput {
    pub layer_path: PathBuf,
    pub report_path: PathBuf,
    pub summary: RegressionSummary,
}

/// Global Moran's I and its significance under randomization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoransI {
    pub index: f64,
    pub expected: f64,
    pub variance: f64,
    pub z_score: f64,
    pub p_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutocorrelationOutput {
    pub statistic: MoransI,
    /// `None` when the report could not be produced.
    pub report: Option<PathBuf>,
}

/// Capability set of the numerical backend.
///
/// The pipeline never performs interpolation, regression or autocorrelation
/// itself; every stage delegates to an implementation of this trait.
/// Any `Err` returned here is fatal for the calling stage.
#[async_trait]
pub trait GeoprocessingProvider: Send + Sync {
    /// Inverse-distance-weighted surface over the mask, weight `1 / d^power`.
    async fn idw_interpolate(
        &self,
        points: &SamplePointSet,
        value_field: &str,
        power: f64,
        cell_size: f64,
        mask: &Boundary,
    ) -> ProviderResult<InterpolatedSurface>;

    /// Mean surface value per zone. Zones covering no cell are omitted.
    async fn zonal_mean(
        &self,
        zones: &ZoneGeometrySet,
        zone_id_field: &str,
        surface: &InterpolatedSurface,
    ) -> ProviderResult<ZonalStatistic>;

    /// Fit OLS, write the residual layer and the report to the requested paths.
    async fn ordinary_least_squares(
        &self,
        zones: &ZoneGeometrySet,
        request: &RegressionRequest,
    ) -> ProviderResult<RegressionOutput>;

    /// Global spatial autocorrelation of `field` on the layer at `layer_path`.
    async fn spatial_autocorrelation(
        &self,
        layer_path: &Path,
        field: &str,
        report_dir: &Path,
    ) -> ProviderResult<AutocorrelationOutput>;

    fn name(&self) -> &'static str;
}
