// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use geo::{BoundingRect, Contains};

use crate::backends::local::TOOL_ZONAL;
use crate::errors::{ExternalToolError, ProviderResult};
use crate::model::{InterpolatedSurface, ZonalStatistic, ZoneGeometrySet};

/// Mean of the data cells whose centers fall inside each zone.
pub(crate) fn zonal_mean(
    zones: &ZoneGeometrySet,
    zone_id_field: &str,
    surface: &InterpolatedSurface,
) -> ProviderResult<ZonalStatistic> {
    if !zones.has_field(zone_id_field) {
        return Err(ExternalToolError::new(
            TOOL_ZONAL,
            format!("zone field '{}' does not exist", zone_id_field),
        ));
    }

    let mut statistic = ZonalStatistic::new();
    for zone in &zones.zones {
        let Some(zone_id) = zone.get(zone_id_field).as_key() else {
            continue;
        };
        let Some(window) = zone
            .geometry
            .bounding_rect()
            .and_then(|rect| surface.window(&rect))
        else {
            continue;
        };

        let (cols, rows) = window;
        let mut sum = 0.0;
        let mut count = 0usize;
        for row in rows {
            for col in cols.clone() {
                let Some(value) = surface.value(col, row) else {
                    continue;
                };
                if zone.geometry.contains(&surface.cell_center(col, row)) {
                    sum += value;
                    count += 1;
                }
            }
        }
        if count > 0 {
            statistic.insert(zone_id, sum / count as f64);
        }
    }
    Ok(statistic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDescriptor, FieldValue, ZoneRecord};
    use geo::{polygon, MultiPolygon};

    fn square(x0: f64, x1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x0, y: 0.0),
            (x: x1, y: 0.0),
            (x: x1, y: 1.0),
            (x: x0, y: 1.0),
            (x: x0, y: 0.0),
        ]])
    }

    fn zones() -> ZoneGeometrySet {
        let records = vec![
            ZoneRecord::new(square(0.0, 1.0)).with_attribute("GEOID10", FieldValue::Text("a".into())),
            ZoneRecord::new(square(1.0, 2.0)).with_attribute("GEOID10", FieldValue::Text("b".into())),
            ZoneRecord::new(square(5.0, 6.0)).with_attribute("GEOID10", FieldValue::Text("far".into())),
        ];
        ZoneGeometrySet::new("GEOID10", vec![FieldDescriptor::text("GEOID10")], records).unwrap()
    }

    fn surface() -> InterpolatedSurface {
        let mut surface = InterpolatedSurface::empty(0.0, 0.0, 0.5, 4, 2);
        for row in 0..2 {
            for col in 0..4 {
                surface.set(col, row, Some(col as f64));
            }
        }
        surface.set(3, 1, None);
        surface
    }

    #[test]
    fn means_per_zone() {
        let statistic = zonal_mean(&zones(), "GEOID10", &surface()).unwrap();
        assert_eq!(statistic.get("a"), Some(0.5));
        // (2 + 3 + 2) / 3, one cell is no-data
        let b = statistic.get("b").unwrap();
        assert!((b - 7.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn uncovered_zone_is_absent() {
        let statistic = zonal_mean(&zones(), "GEOID10", &surface()).unwrap();
        assert!(!statistic.contains("far"));
        assert_eq!(statistic.len(), 2);
    }

    #[test]
    fn unknown_id_field_is_an_error() {
        assert!(zonal_mean(&zones(), "NOPE", &surface()).is_err());
    }
}
