// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use geo::{BoundingRect, Contains, EuclideanDistance, Point};

use crate::backends::local::TOOL_IDW;
use crate::config::consts::MAX_SURFACE_CELLS;
use crate::errors::{ExternalToolError, ProviderResult};
use crate::model::{Boundary, InterpolatedSurface, SamplePointSet};

/// Grid over the mask's bounding box. Cells whose center falls outside the
/// mask are no-data.
pub(crate) fn interpolate(
    points: &SamplePointSet,
    value_field: &str,
    power: f64,
    cell_size: f64,
    mask: &Boundary,
) -> ProviderResult<InterpolatedSurface> {
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(ExternalToolError::new(
            TOOL_IDW,
            format!("cell size {} must be positive", cell_size),
        ));
    }

    let samples: Vec<(Point<f64>, f64)> = points
        .points
        .iter()
        .filter_map(|p| {
            p.value(value_field)
                .filter(|v| v.is_finite())
                .map(|v| (p.location, v))
        })
        .collect();
    if samples.is_empty() {
        return Err(ExternalToolError::new(
            TOOL_IDW,
            format!("no sample points carry a value in '{}'", value_field),
        ));
    }

    let bbox = mask
        .geometry
        .bounding_rect()
        .ok_or_else(|| ExternalToolError::new(TOOL_IDW, "mask geometry is empty"))?;
    let cols = ((bbox.width() / cell_size).ceil() as usize).max(1);
    let rows = ((bbox.height() / cell_size).ceil() as usize).max(1);
    match cols.checked_mul(rows) {
        Some(cells) if cells <= MAX_SURFACE_CELLS => {}
        _ => {
            return Err(ExternalToolError::new(
                TOOL_IDW,
                format!(
                    "{}x{} grid exceeds the {} cell limit; increase the cell size",
                    cols, rows, MAX_SURFACE_CELLS
                ),
            ))
        }
    }

    let mut surface = InterpolatedSurface::empty(bbox.min().x, bbox.min().y, cell_size, cols, rows);
    for row in 0..rows {
        for col in 0..cols {
            let center = surface.cell_center(col, row);
            if mask.geometry.contains(&center) {
                let estimate = weighted_value(center, &samples, power);
                if !estimate.is_finite() {
                    return Err(ExternalToolError::new(
                        TOOL_IDW,
                        format!("non-finite estimate at cell ({}, {}) with power {}", col, row, power),
                    ));
                }
                surface.set(col, row, Some(estimate));
            }
        }
    }
    Ok(surface)
}

/// Weight `(d_min / d)^power`, scaled against the nearest sample so large
/// powers neither overflow nor underflow. A coincident sample wins outright.
fn weighted_value(at: Point<f64>, samples: &[(Point<f64>, f64)], power: f64) -> f64 {
    let distances: Vec<f64> = samples
        .iter()
        .map(|(location, _)| at.euclidean_distance(location))
        .collect();
    if let Some(i) = distances.iter().position(|d| *d == 0.0) {
        return samples[i].1;
    }
    let nearest = distances.iter().copied().fold(f64::INFINITY, f64::min);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for ((_, value), distance) in samples.iter().zip(&distances) {
        let weight = (nearest / distance).powf(power);
        numerator += weight * value;
        denominator += weight;
    }
    numerator / denominator
}
