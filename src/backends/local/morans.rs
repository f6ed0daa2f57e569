// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Global Moran's I with inverse-distance weights between zone centroids.
//!
//! Weights are row-standardized. Significance uses the randomization
//! variance and a two-sided normal p-value.

use geo::{Centroid, EuclideanDistance, Point};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::backends::local::TOOL_MORANS_I;
use crate::errors::{ExternalToolError, ProviderResult, ReportGenerationError};
use crate::model::dataset::read_json;
use crate::model::ZoneGeometrySet;
use crate::observability::messages::stage::{ArtifactWritten, ReportGenerationSkipped};
use crate::observability::messages::StructuredLog;
use crate::traits::{AutocorrelationOutput, MoransI};

pub(crate) fn spatial_autocorrelation(
    layer_path: &Path,
    field: &str,
    report_dir: &Path,
) -> ProviderResult<AutocorrelationOutput> {
    let layer: ZoneGeometrySet = read_json(layer_path)
        .map_err(|e| ExternalToolError::new(TOOL_MORANS_I, e.to_string()))?;
    if !layer.has_field(field) {
        return Err(ExternalToolError::new(
            TOOL_MORANS_I,
            format!("field '{}' does not exist on {}", field, layer_path.display()),
        ));
    }

    let features: Vec<(Point<f64>, f64)> = layer
        .zones
        .iter()
        .filter_map(|zone| {
            let value = zone.get(field).as_f64().filter(|v| v.is_finite())?;
            Some((zone.geometry.centroid()?, value))
        })
        .collect();
    let statistic = morans_i(&features)?;

    let report = match write_report(layer_path, field, report_dir, features.len(), &statistic) {
        Ok(path) => {
            ArtifactWritten {
                kind: "autocorrelation report",
                path: &path,
            }
            .log();
            Some(path)
        }
        Err(error) => {
            ReportGenerationSkipped { error: &error }.log();
            None
        }
    };
    Ok(AutocorrelationOutput { statistic, report })
}

fn morans_i(features: &[(Point<f64>, f64)]) -> ProviderResult<MoransI> {
    let n = features.len();
    if n < 4 {
        return Err(ExternalToolError::new(
            TOOL_MORANS_I,
            format!("insufficient data: {} features, need at least 4", n),
        ));
    }
    let nf = n as f64;
    let mean = features.iter().map(|(_, v)| v).sum::<f64>() / nf;
    let deviations: Vec<f64> = features.iter().map(|(_, v)| v - mean).collect();
    let m2: f64 = deviations.iter().map(|z| z * z).sum();
    let m4: f64 = deviations.iter().map(|z| z.powi(4)).sum();
    if m2 == 0.0 {
        return Err(ExternalToolError::new(
            TOOL_MORANS_I,
            "field has no variance across features",
        ));
    }

    let weights = row_standardized_weights(features);
    let s0: f64 = weights.iter().flatten().sum();
    if s0 == 0.0 {
        return Err(ExternalToolError::new(
            TOOL_MORANS_I,
            "no feature has a neighbour at non-zero distance",
        ));
    }

    let mut cross = 0.0;
    let mut s1 = 0.0;
    for i in 0..n {
        for j in 0..n {
            cross += weights[i][j] * deviations[i] * deviations[j];
            s1 += (weights[i][j] + weights[j][i]).powi(2);
        }
    }
    s1 /= 2.0;
    let s2: f64 = (0..n)
        .map(|i| {
            let row: f64 = weights[i].iter().sum();
            let col: f64 = weights.iter().map(|w| w[i]).sum();
            (row + col).powi(2)
        })
        .sum();

    let index = (nf / s0) * cross / m2;
    let expected = -1.0 / (nf - 1.0);
    let b2 = nf * m4 / (m2 * m2);
    let numerator = nf * ((nf * nf - 3.0 * nf + 3.0) * s1 - nf * s2 + 3.0 * s0 * s0)
        - b2 * ((nf * nf - nf) * s1 - 2.0 * nf * s2 + 6.0 * s0 * s0);
    let variance =
        numerator / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0) * s0 * s0) - expected * expected;
    if variance.is_nan() || variance <= 0.0 {
        return Err(ExternalToolError::new(
            TOOL_MORANS_I,
            format!("degenerate variance {}", variance),
        ));
    }
    let z_score = (index - expected) / variance.sqrt();
    Ok(MoransI {
        index,
        expected,
        variance,
        z_score,
        p_value: erfc(z_score.abs() / std::f64::consts::SQRT_2),
    })
}

fn row_standardized_weights(features: &[(Point<f64>, f64)]) -> Vec<Vec<f64>> {
    features
        .iter()
        .enumerate()
        .map(|(i, (from, _))| {
            let mut row: Vec<f64> = features
                .iter()
                .enumerate()
                .map(|(j, (to, _))| {
                    let distance = from.euclidean_distance(to);
                    if i == j || distance == 0.0 {
                        0.0
                    } else {
                        1.0 / distance
                    }
                })
                .collect();
            let total: f64 = row.iter().sum();
            if total > 0.0 {
                row.iter_mut().for_each(|w| *w /= total);
            }
            row
        })
        .collect()
}

/// Complementary error function, fractional error below 1.2e-7.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87 + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let r = t * poly.exp();
    if x >= 0.0 {
        r
    } else {
        2.0 - r
    }
}

fn write_report(
    layer_path: &Path,
    field: &str,
    report_dir: &Path,
    features: usize,
    statistic: &MoransI,
) -> Result<PathBuf, ReportGenerationError> {
    let stem = layer_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "layer".to_string());
    let path = report_dir.join(format!("{}_morans_i.txt", stem));

    let mut out = String::new();
    let _ = writeln!(out, "Global Moran's I Summary");
    let _ = writeln!(out, "========================");
    let _ = writeln!(out, "Input layer:   {}", layer_path.display());
    let _ = writeln!(out, "Field:         {}", field);
    let _ = writeln!(out, "Features:      {}", features);
    let _ = writeln!(out, "Weights:       inverse distance, euclidean, row standardized");
    let _ = writeln!(out);
    let _ = writeln!(out, "Moran's Index: {:.6}", statistic.index);
    let _ = writeln!(out, "Expected:      {:.6}", statistic.expected);
    let _ = writeln!(out, "Variance:      {:.6}", statistic.variance);
    let _ = writeln!(out, "z-score:       {:.6}", statistic.z_score);
    let _ = writeln!(out, "p-value:       {:.6}", statistic.p_value);
    let _ = writeln!(out, "Pattern:       {}", pattern(statistic));

    fs::create_dir_all(report_dir)
        .and_then(|_| fs::write(&path, out))
        .map_err(|source| ReportGenerationError {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

fn pattern(statistic: &MoransI) -> &'static str {
    if statistic.p_value >= 0.05 {
        "random"
    } else if statistic.z_score > 0.0 {
        "clustered"
    } else {
        "dispersed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(values: &[f64]) -> Vec<(Point<f64>, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (Point::new(i as f64, 0.0), *v))
            .collect()
    }

    #[test]
    fn erfc_reference_values() {
        assert!((erfc(0.0) - 1.0).abs() < 1e-6);
        assert!((erfc(1.0) - 0.157_299_207).abs() < 1e-6);
        assert!((erfc(-1.0) - 1.842_700_793).abs() < 1e-6);
    }

    #[test]
    fn clustered_values_give_positive_index() {
        let statistic = morans_i(&line(&[1.0, 1.1, 0.9, 1.0, 5.0, 5.2, 4.9, 5.1])).unwrap();
        assert!(statistic.index > statistic.expected);
        assert!(statistic.z_score > 0.0);
        assert!((0.0..=1.0).contains(&statistic.p_value));
    }

    #[test]
    fn alternating_values_give_negative_index() {
        let statistic = morans_i(&line(&[1.0, -1.0, 1.0, -1.0, 1.0, -1.0])).unwrap();
        assert!(statistic.index < statistic.expected);
    }

    #[test]
    fn too_few_features_or_no_variance_fails() {
        assert!(morans_i(&line(&[1.0, 2.0, 3.0])).is_err());
        assert!(morans_i(&line(&[2.0, 2.0, 2.0, 2.0])).is_err());
    }

    #[test]
    fn unwritable_report_is_absent_not_fatal() {
        use crate::model::dataset::write_json;
        use crate::model::{FieldDescriptor, FieldValue, ZoneRecord};
        use geo::{polygon, MultiPolygon};

        let dir = tempfile::tempdir().unwrap();
        let records = [0.5, -1.2, 0.3, 1.4, -0.9]
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let x = i as f64;
                let square: MultiPolygon<f64> = MultiPolygon(vec![polygon![
                    (x: x, y: 0.0),
                    (x: x + 1.0, y: 0.0),
                    (x: x + 1.0, y: 1.0),
                    (x: x, y: 1.0),
                    (x: x, y: 0.0),
                ]]);
                ZoneRecord::new(square)
                    .with_attribute("UID", FieldValue::Long(i as i64))
                    .with_attribute("StdResid", FieldValue::Double(*v))
            })
            .collect();
        let layer = ZoneGeometrySet::new(
            "UID",
            vec![FieldDescriptor::long("UID"), FieldDescriptor::double("StdResid")],
            records,
        )
        .unwrap();
        let layer_path = dir.path().join("OLS_2_0.shp");
        write_json(&layer_path, &layer).unwrap();

        let report_dir = dir.path().join("scratch");
        let written = spatial_autocorrelation(&layer_path, "StdResid", &report_dir).unwrap();
        assert_eq!(
            written.report,
            Some(report_dir.join("OLS_2_0_morans_i.txt"))
        );

        // a directory squatting on the report path makes the write fail
        fs::remove_file(report_dir.join("OLS_2_0_morans_i.txt")).unwrap();
        fs::create_dir(report_dir.join("OLS_2_0_morans_i.txt")).unwrap();
        let skipped = spatial_autocorrelation(&layer_path, "StdResid", &report_dir).unwrap();
        assert_eq!(skipped.report, None);
        assert_eq!(skipped.statistic, written.statistic);
    }
}
