// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Single-variable ordinary least squares with standardized residuals.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::backends::local::TOOL_OLS;
use crate::errors::{ExternalToolError, ProviderResult};
use crate::model::dataset::write_json;
use crate::model::{FieldDescriptor, FieldValue, ZoneGeometrySet, ZoneRecord};
use crate::traits::{RegressionLayer, RegressionOutput, RegressionRequest, RegressionSummary};

pub(crate) const ESTIMATED_FIELD: &str = "Estimated";
pub(crate) const RESIDUAL_FIELD: &str = "Residual";

pub(crate) fn ordinary_least_squares(
    zones: &ZoneGeometrySet,
    request: &RegressionRequest,
) -> ProviderResult<RegressionOutput> {
    let observations: Vec<Option<(f64, f64)>> = zones
        .zones
        .iter()
        .map(|zone| {
            let x = zone.get(&request.explanatory_field).as_f64()?;
            let y = zone.get(&request.dependent_field).as_f64()?;
            (x.is_finite() && y.is_finite()).then_some((x, y))
        })
        .collect();
    let usable: Vec<(f64, f64)> = observations.iter().flatten().copied().collect();
    let fit = Fit::estimate(&usable)?;

    let mut layer = ZoneGeometrySet {
        id_field: request.id_field.clone(),
        schema: vec![
            FieldDescriptor::long(request.id_field.as_str()),
            FieldDescriptor::double(request.dependent_field.as_str()),
            FieldDescriptor::double(request.explanatory_field.as_str()),
            FieldDescriptor::double(ESTIMATED_FIELD),
            FieldDescriptor::double(RESIDUAL_FIELD),
            FieldDescriptor::double(request.residual_field.as_str()),
        ],
        zones: Vec::with_capacity(zones.len()),
    };
    for (zone, observation) in zones.zones.iter().zip(&observations) {
        let (estimated, residual, standardized) = match observation {
            Some((x, y)) => {
                let estimated = fit.intercept + fit.slope * x;
                let residual = y - estimated;
                (
                    FieldValue::Double(estimated),
                    FieldValue::Double(residual),
                    FieldValue::Double(fit.standardize(residual)),
                )
            }
            None => (FieldValue::Null, FieldValue::Null, FieldValue::Null),
        };
        layer.zones.push(
            ZoneRecord::new(zone.geometry.clone())
                .with_attribute(&request.id_field, zone.get(&request.id_field).clone())
                .with_attribute(
                    &request.dependent_field,
                    zone.get(&request.dependent_field).clone(),
                )
                .with_attribute(
                    &request.explanatory_field,
                    zone.get(&request.explanatory_field).clone(),
                )
                .with_attribute(ESTIMATED_FIELD, estimated)
                .with_attribute(RESIDUAL_FIELD, residual)
                .with_attribute(&request.residual_field, standardized),
        );
    }

    let summary = RegressionSummary {
        intercept: fit.intercept,
        slope: fit.slope,
        r_squared: fit.r_squared,
        adjusted_r_squared: fit.adjusted_r_squared,
        observations: usable.len(),
        excluded: zones.len() - usable.len(),
    };

    create_parent(&request.report_path)?;
    fs::write(&request.report_path, render_report(request, &summary)).map_err(|e| {
        ExternalToolError::new(
            TOOL_OLS,
            format!("writing {}: {}", request.report_path.display(), e),
        )
    })?;
    create_parent(&request.layer_path)?;
    let written = RegressionLayer {
        summary: summary.clone(),
        layer,
    };
    write_json(&request.layer_path, &written)
        .map_err(|e| ExternalToolError::new(TOOL_OLS, e.to_string()))?;

    Ok(RegressionOutput {
        layer_path: request.layer_path.clone(),
        report_path: request.report_path.clone(),
        summary,
    })
}

struct Fit {
    intercept: f64,
    slope: f64,
    r_squared: f64,
    adjusted_r_squared: f64,
    sigma: f64,
}

impl Fit {
    fn estimate(rows: &[(f64, f64)]) -> ProviderResult<Self> {
        let n = rows.len();
        if n < 3 {
            return Err(ExternalToolError::new(
                TOOL_OLS,
                format!("insufficient data: {} usable observations, need at least 3", n),
            ));
        }
        let nf = n as f64;
        let mean_x = rows.iter().map(|(x, _)| x).sum::<f64>() / nf;
        let mean_y = rows.iter().map(|(_, y)| y).sum::<f64>() / nf;
        let sxx: f64 = rows.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
        let sxy: f64 = rows.iter().map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
        let sst: f64 = rows.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();
        if sxx == 0.0 {
            return Err(ExternalToolError::new(
                TOOL_OLS,
                "insufficient data: explanatory variable has no variance",
            ));
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let sse: f64 = rows
            .iter()
            .map(|(x, y)| (y - intercept - slope * x).powi(2))
            .sum();
        let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 1.0 };
        let adjusted_r_squared = 1.0 - (1.0 - r_squared) * (nf - 1.0) / (nf - 2.0);
        Ok(Self {
            intercept,
            slope,
            r_squared,
            adjusted_r_squared,
            sigma: (sse / (nf - 2.0)).sqrt(),
        })
    }

    fn standardize(&self, residual: f64) -> f64 {
        if self.sigma > 0.0 {
            residual / self.sigma
        } else {
            0.0
        }
    }
}

fn create_parent(path: &Path) -> ProviderResult<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent).map_err(|e| {
            ExternalToolError::new(TOOL_OLS, format!("creating {}: {}", parent.display(), e))
        }),
        None => Ok(()),
    }
}

fn render_report(request: &RegressionRequest, summary: &RegressionSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Ordinary Least Squares Results");
    let _ = writeln!(out, "==============================");
    let _ = writeln!(out, "Dependent variable:   {}", request.dependent_field);
    let _ = writeln!(out, "Explanatory variable: {}", request.explanatory_field);
    let _ = writeln!(out, "Unique id field:      {}", request.id_field);
    let _ = writeln!(out);
    let _ = writeln!(out, "Observations:         {}", summary.observations);
    let _ = writeln!(out, "Excluded (null):      {}", summary.excluded);
    let _ = writeln!(out, "Intercept:            {:.6}", summary.intercept);
    let _ = writeln!(out, "Coefficient:          {:.6}", summary.slope);
    let _ = writeln!(out, "R-squared:            {:.6}", summary.r_squared);
    let _ = writeln!(out, "Adjusted R-squared:   {:.6}", summary.adjusted_r_squared);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Residual layer: {} (standardized residuals in '{}')",
        request.layer_path.display(),
        request.residual_field
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dataset::read_json;
    use geo::{polygon, MultiPolygon};

    fn zones(rows: &[(Option<f64>, f64)]) -> ZoneGeometrySet {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, (mean, rate))| {
                let x = i as f64;
                let square: MultiPolygon<f64> = MultiPolygon(vec![polygon![
                    (x: x, y: 0.0),
                    (x: x + 1.0, y: 0.0),
                    (x: x + 1.0, y: 1.0),
                    (x: x, y: 0.0),
                ]]);
                ZoneRecord::new(square)
                    .with_attribute("UID", FieldValue::Long(i as i64))
                    .with_attribute("canrate", FieldValue::Double(*rate))
                    .with_attribute("MEAN", mean.map_or(FieldValue::Null, FieldValue::Double))
            })
            .collect();
        ZoneGeometrySet::new(
            "UID",
            vec![
                FieldDescriptor::long("UID"),
                FieldDescriptor::double("canrate"),
                FieldDescriptor::double("MEAN"),
            ],
            records,
        )
        .unwrap()
    }

    fn request(dir: &Path) -> RegressionRequest {
        RegressionRequest {
            id_field: "UID".to_string(),
            dependent_field: "canrate".to_string(),
            explanatory_field: "MEAN".to_string(),
            residual_field: "StdResid".to_string(),
            layer_path: dir.join("layers/OLS_2_0.shp"),
            report_path: dir.join("reports/2.0_ols.pdf"),
        }
    }

    #[test]
    fn fits_line_and_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let set = zones(&[
            (Some(1.0), 2.1),
            (Some(2.0), 3.9),
            (Some(3.0), 6.2),
            (Some(4.0), 7.8),
            (None, 9.0),
        ]);
        let output = ordinary_least_squares(&set, &request(dir.path())).unwrap();

        assert!((output.summary.slope - 1.94).abs() < 1e-9);
        assert!((output.summary.intercept - 0.15).abs() < 1e-9);
        assert!(output.summary.r_squared > 0.99);
        assert_eq!(output.summary.observations, 4);
        assert_eq!(output.summary.excluded, 1);
        assert!(output.report_path.is_file());

        let written: RegressionLayer = read_json(&output.layer_path).unwrap();
        assert_eq!(written.summary, output.summary);
        let layer = written.layer;
        assert_eq!(layer.id_field, "UID");
        assert_eq!(layer.zones.len(), 5);
        assert!(layer.zones[4].get("StdResid").is_null());
        let resid: f64 = layer.zones[..4]
            .iter()
            .filter_map(|z| z.get(RESIDUAL_FIELD).as_f64())
            .sum();
        assert!(resid.abs() < 1e-9);
    }

    #[test]
    fn layer_file_still_reads_as_plain_zone_set() {
        let dir = tempfile::tempdir().unwrap();
        let set = zones(&[(Some(1.0), 2.0), (Some(2.0), 2.5), (Some(3.0), 4.5)]);
        let output = ordinary_least_squares(&set, &request(dir.path())).unwrap();

        let zones_only: ZoneGeometrySet = read_json(&output.layer_path).unwrap();
        assert!(zones_only.has_field("StdResid"));
        assert_eq!(zones_only.len(), 3);
    }

    #[test]
    fn too_few_rows_is_insufficient_data() {
        let dir = tempfile::tempdir().unwrap();
        let set = zones(&[(Some(1.0), 2.0), (Some(2.0), 3.0), (None, 1.0)]);
        let err = ordinary_least_squares(&set, &request(dir.path())).unwrap_err();
        assert!(err.message.contains("insufficient data"));
        assert!(!request(dir.path()).layer_path.exists());
    }

    #[test]
    fn constant_explanatory_is_insufficient_data() {
        let dir = tempfile::tempdir().unwrap();
        let set = zones(&[(Some(1.0), 2.0), (Some(1.0), 3.0), (Some(1.0), 4.0)]);
        assert!(ordinary_least_squares(&set, &request(dir.path())).is_err());
    }
}
