// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Writes zonal means back onto the zone attribute table.

use crate::errors::{JoinLookupError, SchemaMigrationError};
use crate::model::{FieldDescriptor, FieldHandle, FieldValue, ZonalStatistic, ZoneGeometrySet};
use crate::observability::messages::stage::{FieldCreated, JoinCompleted, JoinLookupMissed};
use crate::observability::messages::StructuredLog;

#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcomeKind {
    Hit(f64),
    Miss,
}

/// What happened to one zone row.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub zone_id: String,
    pub kind: JoinOutcomeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinReport {
    pub field: FieldHandle,
    pub outcomes: Vec<JoinOutcome>,
}

impl JoinReport {
    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.kind, JoinOutcomeKind::Hit(_)))
            .count()
    }

    /// One record per zone that had no zonal mean, in row order.
    pub fn warnings(&self) -> Vec<JoinLookupError> {
        self.outcomes
            .iter()
            .filter(|o| o.kind == JoinOutcomeKind::Miss)
            .map(|o| JoinLookupError {
                zone_id: o.zone_id.clone(),
            })
            .collect()
    }
}

/// Copy each zone's mean into `mean_field`, creating the field if needed.
///
/// A zone without a mean keeps whatever value it had and is reported as a
/// miss. The join never aborts on a miss.
pub fn join(
    zones: &mut ZoneGeometrySet,
    statistic: &ZonalStatistic,
    mean_field: &str,
) -> Result<JoinReport, SchemaMigrationError> {
    let id_field = zones.id_field.clone();
    let zone_ids = zones
        .zones
        .iter()
        .enumerate()
        .map(|(row, zone)| {
            zone.get(&id_field)
                .as_key()
                .ok_or_else(|| SchemaMigrationError::MissingZoneId {
                    row,
                    field: id_field.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let field = zones.ensure_field(&FieldDescriptor::double(mean_field))?;
    if field.created() {
        FieldCreated {
            field: field.name(),
            field_type: field.field_type(),
        }
        .log();
    }

    let mut outcomes = Vec::with_capacity(zones.len());
    for (zone, zone_id) in zones.zones.iter_mut().zip(zone_ids) {
        let kind = match statistic.get(&zone_id) {
            Some(mean) => {
                zone.set(mean_field, FieldValue::Double(mean));
                JoinOutcomeKind::Hit(mean)
            }
            None => {
                JoinLookupMissed {
                    zone_id: &zone_id,
                    field: mean_field,
                }
                .log();
                JoinOutcomeKind::Miss
            }
        };
        outcomes.push(JoinOutcome { zone_id, kind });
    }

    let report = JoinReport { field, outcomes };
    JoinCompleted {
        field: mean_field,
        updated: report.updated(),
        missed: report.outcomes.len() - report.updated(),
    }
    .log();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ZoneRecord;
    use geo::{polygon, MultiPolygon};

    fn zones(ids: &[&str]) -> ZoneGeometrySet {
        let records = ids
            .iter()
            .map(|id| {
                let square: MultiPolygon<f64> = MultiPolygon(vec![polygon![
                    (x: 0.0, y: 0.0),
                    (x: 1.0, y: 0.0),
                    (x: 1.0, y: 1.0),
                    (x: 0.0, y: 0.0),
                ]]);
                ZoneRecord::new(square).with_attribute("GEOID10", FieldValue::Text(id.to_string()))
            })
            .collect();
        ZoneGeometrySet::new("GEOID10", vec![FieldDescriptor::text("GEOID10")], records).unwrap()
    }

    #[test]
    fn join_writes_means_and_records_misses() {
        let mut set = zones(&["a", "b", "c"]);
        let statistic: ZonalStatistic =
            vec![("a".to_string(), 1.5), ("c".to_string(), 0.0)].into_iter().collect();

        let report = join(&mut set, &statistic, "MEAN").unwrap();

        assert!(report.field.created());
        assert_eq!(report.updated(), 2);
        assert_eq!(
            report.warnings(),
            vec![JoinLookupError {
                zone_id: "b".to_string()
            }]
        );
        assert_eq!(set.value("a", "MEAN"), Some(&FieldValue::Double(1.5)));
        assert_eq!(set.value("b", "MEAN"), Some(&FieldValue::Null));
        assert_eq!(set.value("c", "MEAN"), Some(&FieldValue::Double(0.0)));
    }

    #[test]
    fn missed_zone_keeps_previous_value() {
        let mut set = zones(&["a", "b"]);
        let full: ZonalStatistic =
            vec![("a".to_string(), 1.0), ("b".to_string(), 2.0)].into_iter().collect();
        join(&mut set, &full, "MEAN").unwrap();

        let partial: ZonalStatistic = vec![("a".to_string(), 3.0)].into_iter().collect();
        let report = join(&mut set, &partial, "MEAN").unwrap();

        assert!(!report.field.created());
        assert_eq!(set.schema.iter().filter(|f| f.name == "MEAN").count(), 1);
        assert_eq!(set.value("a", "MEAN"), Some(&FieldValue::Double(3.0)));
        assert_eq!(set.value("b", "MEAN"), Some(&FieldValue::Double(2.0)));
    }

    #[test]
    fn join_refuses_text_mean_field() {
        let mut set = zones(&["a"]);
        set.ensure_field(&FieldDescriptor::text("MEAN")).unwrap();
        let err = join(&mut set, &ZonalStatistic::new(), "MEAN").unwrap_err();
        assert!(matches!(err, SchemaMigrationError::TypeConflict { .. }));
    }

    #[test]
    fn zone_without_identifier_is_refused_before_any_write() {
        let mut set = zones(&["a", "b"]);
        set.zones[1] = ZoneRecord::new(set.zones[1].geometry.clone());
        let statistic: ZonalStatistic = vec![("a".to_string(), 1.0)].into_iter().collect();

        let err = join(&mut set, &statistic, "MEAN").unwrap_err();

        assert!(matches!(
            err,
            SchemaMigrationError::MissingZoneId { row: 1, ref field } if field == "GEOID10"
        ));
        assert!(!set.has_field("MEAN"));
        assert!(set.zones[0].get("MEAN").is_null());
    }
}
