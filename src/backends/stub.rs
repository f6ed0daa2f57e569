// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::backends::local::{TOOL_IDW, TOOL_MORANS_I, TOOL_OLS, TOOL_ZONAL};
use crate::errors::{ExternalToolError, ProviderResult};
use crate::model::dataset::write_json;
use crate::model::{Boundary, InterpolatedSurface, SamplePointSet, ZonalStatistic, ZoneGeometrySet};
use crate::traits::{
    AutocorrelationOutput, GeoprocessingProvider, MoransI, RegressionOutput, RegressionRequest,
    RegressionSummary,
};

pub const STUB_MORANS_I: MoransI = MoransI {
    index: 0.25,
    expected: -0.25,
    variance: 0.04,
    z_score: 2.5,
    p_value: 0.0124,
};

/// A deterministic provider for orchestrator tests.
///
/// Every capability succeeds with fixed output unless configured otherwise.
#[derive(Default)]
pub struct StubGeoprocessor {
    fail_at: Option<&'static str>,
    omitted_zones: Vec<String>,
    withhold_report: bool,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<&'static str>>,
}

impl StubGeoprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the named tool with an `ExternalToolError`.
    pub fn failing_at(mut self, tool: &'static str) -> Self {
        self.fail_at = Some(tool);
        self
    }

    /// Leave these zone ids out of the zonal statistic.
    pub fn omitting_zone(mut self, zone_id: &str) -> Self {
        self.omitted_zones.push(zone_id.to_string());
        self
    }

    /// Return the statistic without a report handle.
    pub fn without_report(mut self) -> Self {
        self.withhold_report = true;
        self
    }

    /// Hold interpolation until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Tools invoked so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn enter(&self, tool: &'static str) -> ProviderResult<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(tool);
        }
        if self.fail_at == Some(tool) {
            return Err(ExternalToolError::new(tool, "simulated tool failure"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl GeoprocessingProvider for StubGeoprocessor {
    async fn idw_interpolate(
        &self,
        _points: &SamplePointSet,
        _value_field: &str,
        power: f64,
        cell_size: f64,
        _mask: &Boundary,
    ) -> ProviderResult<InterpolatedSurface> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.enter(TOOL_IDW)?;
        let mut surface = InterpolatedSurface::empty(0.0, 0.0, cell_size, 1, 1);
        surface.set(0, 0, Some(power));
        Ok(surface)
    }

    async fn zonal_mean(
        &self,
        zones: &ZoneGeometrySet,
        zone_id_field: &str,
        _surface: &InterpolatedSurface,
    ) -> ProviderResult<ZonalStatistic> {
        self.enter(TOOL_ZONAL)?;
        Ok(zones
            .zones
            .iter()
            .enumerate()
            .filter_map(|(row, zone)| {
                let zone_id = zone.get(zone_id_field).as_key()?;
                (!self.omitted_zones.contains(&zone_id)).then(|| (zone_id, 1.0 + row as f64))
            })
            .collect())
    }

    async fn ordinary_least_squares(
        &self,
        zones: &ZoneGeometrySet,
        request: &RegressionRequest,
    ) -> ProviderResult<RegressionOutput> {
        self.enter(TOOL_OLS)?;
        write_json(&request.layer_path, zones)
            .map_err(|e| ExternalToolError::new(TOOL_OLS, e.to_string()))?;
        fs::write(&request.report_path, "stub regression report")
            .map_err(|e| ExternalToolError::new(TOOL_OLS, e.to_string()))?;
        Ok(RegressionOutput {
            layer_path: request.layer_path.clone(),
            report_path: request.report_path.clone(),
            summary: RegressionSummary {
                intercept: 0.0,
                slope: 1.0,
                r_squared: 0.5,
                adjusted_r_squared: 0.4,
                observations: zones.len(),
                excluded: 0,
            },
        })
    }

    async fn spatial_autocorrelation(
        &self,
        layer_path: &Path,
        _field: &str,
        report_dir: &Path,
    ) -> ProviderResult<AutocorrelationOutput> {
        self.enter(TOOL_MORANS_I)?;
        if self.withhold_report {
            return Ok(AutocorrelationOutput {
                statistic: STUB_MORANS_I,
                report: None,
            });
        }
        let stem = layer_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let report = report_dir.join(format!("{}_morans_i.txt", stem));
        fs::write(&report, "stub autocorrelation report")
            .map_err(|e| ExternalToolError::new(TOOL_MORANS_I, e.to_string()))?;
        Ok(AutocorrelationOutput {
            statistic: STUB_MORANS_I,
            report: Some(report),
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
