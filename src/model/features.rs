// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Vector feature collections: sample wells, zone polygons, and the
//! interpolation boundary.

use geo::{MultiPolygon, Point};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::errors::{DatasetError, SchemaMigrationError};
use crate::model::{FieldDescriptor, FieldHandle, FieldType, FieldValue};

static NULL_VALUE: FieldValue = FieldValue::Null;

/// One measured sample location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub location: Point<f64>,
    #[serde(default)]
    pub attributes: BTreeMap<String, FieldValue>,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            location: Point::new(x, y),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, field: &str, value: f64) -> Self {
        self.attributes
            .insert(field.to_string(), FieldValue::Double(value));
        self
    }

    pub fn value(&self, field: &str) -> Option<f64> {
        self.attributes.get(field).and_then(FieldValue::as_f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplePointSet {
    pub points: Vec<SamplePoint>,
}

impl SamplePointSet {
    pub fn new(points: Vec<SamplePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Polygon extent used to mask interpolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub geometry: MultiPolygon<f64>,
}

impl Boundary {
    pub fn new(geometry: MultiPolygon<f64>) -> Self {
        Self { geometry }
    }
}

/// One zone polygon and its attribute row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub geometry: MultiPolygon<f64>,
    #[serde(default)]
    pub attributes: BTreeMap<String, FieldValue>,
}

impl ZoneRecord {
    pub fn new(geometry: MultiPolygon<f64>) -> Self {
        Self {
            geometry,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, field: &str, value: FieldValue) -> Self {
        self.attributes.insert(field.to_string(), value);
        self
    }

    pub fn get(&self, field: &str) -> &FieldValue {
        self.attributes.get(field).unwrap_or(&NULL_VALUE)
    }

    pub fn set(&mut self, field: &str, value: FieldValue) {
        self.attributes.insert(field.to_string(), value);
    }
}

/// Zone polygons keyed by a stable identifier field.
///
/// The set is mutated in place by the attribute join and the regression
/// stage; its schema only ever grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneGeometrySet {
    pub id_field: String,
    pub schema: Vec<FieldDescriptor>,
    pub zones: Vec<ZoneRecord>,
}

impl ZoneGeometrySet {
    /// Build a set and check identifier uniqueness.
    pub fn new(
        id_field: impl Into<String>,
        schema: Vec<FieldDescriptor>,
        zones: Vec<ZoneRecord>,
    ) -> Result<Self, DatasetError> {
        let set = Self {
            id_field: id_field.into(),
            schema,
            zones,
        };
        set.validate()?;
        Ok(set)
    }

    /// Every row has an identifier and no identifier repeats.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let mut seen = HashSet::with_capacity(self.zones.len());
        for (row, zone) in self.zones.iter().enumerate() {
            let zone_id = zone
                .get(&self.id_field)
                .as_key()
                .ok_or_else(|| DatasetError::MissingZoneId {
                    row,
                    field: self.id_field.clone(),
                })?;
            if !seen.insert(zone_id.clone()) {
                return Err(DatasetError::DuplicateZoneId { zone_id });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.schema.iter().any(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.schema.iter().find(|f| f.name == name)
    }

    /// Confirm a field exists with the requested type without changing the schema.
    pub fn require_field(
        &self,
        descriptor: &FieldDescriptor,
    ) -> Result<FieldHandle, SchemaMigrationError> {
        match self.field(&descriptor.name) {
            Some(existing) if existing.field_type == descriptor.field_type => Ok(
                FieldHandle::new(existing.name.clone(), existing.field_type, false),
            ),
            Some(existing) => Err(SchemaMigrationError::TypeConflict {
                field: existing.name.clone(),
                existing: existing.field_type,
                requested: descriptor.field_type,
            }),
            None => Err(SchemaMigrationError::MissingField {
                field: descriptor.name.clone(),
            }),
        }
    }

    /// Like [`Self::require_field`] but accepts either numeric type.
    pub fn require_numeric_field(&self, name: &str) -> Result<FieldHandle, SchemaMigrationError> {
        match self.field(name) {
            Some(existing) if existing.field_type != FieldType::Text => Ok(FieldHandle::new(
                existing.name.clone(),
                existing.field_type,
                false,
            )),
            Some(existing) => Err(SchemaMigrationError::TypeConflict {
                field: existing.name.clone(),
                existing: existing.field_type,
                requested: FieldType::Double,
            }),
            None => Err(SchemaMigrationError::MissingField {
                field: name.to_string(),
            }),
        }
    }

    /// Add a field if absent. Existing rows get `Null`.
    ///
    /// A no-op when the field already exists with the same type. Existing
    /// fields are never retyped and their values are never reset.
    pub fn ensure_field(
        &mut self,
        descriptor: &FieldDescriptor,
    ) -> Result<FieldHandle, SchemaMigrationError> {
        if descriptor.name.trim().is_empty() {
            return Err(SchemaMigrationError::InvalidName {
                field: descriptor.name.clone(),
            });
        }
        match self.require_field(descriptor) {
            Ok(handle) => Ok(handle),
            Err(SchemaMigrationError::MissingField { .. }) => {
                self.schema.push(descriptor.clone());
                for zone in &mut self.zones {
                    zone.attributes
                        .entry(descriptor.name.clone())
                        .or_insert(FieldValue::Null);
                }
                Ok(FieldHandle::new(
                    descriptor.name.clone(),
                    descriptor.field_type,
                    true,
                ))
            }
            Err(other) => Err(other),
        }
    }

    /// Row index of the zone with identifier `zone_id`.
    pub fn position(&self, zone_id: &str) -> Option<usize> {
        self.zones
            .iter()
            .position(|zone| zone.get(&self.id_field).as_key().as_deref() == Some(zone_id))
    }

    pub fn value(&self, zone_id: &str, field: &str) -> Option<&FieldValue> {
        self.position(zone_id).map(|row| self.zones[row].get(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square(x: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x, y: 0.0),
            (x: x + 1.0, y: 0.0),
            (x: x + 1.0, y: 1.0),
            (x: x, y: 1.0),
            (x: x, y: 0.0),
        ]])
    }

    fn zones() -> ZoneGeometrySet {
        let records = (0..3)
            .map(|i| {
                ZoneRecord::new(square(i as f64))
                    .with_attribute("GEOID10", FieldValue::Text(format!("z{}", i)))
                    .with_attribute("canrate", FieldValue::Double(0.1 * i as f64))
            })
            .collect();
        ZoneGeometrySet::new(
            "GEOID10",
            vec![
                FieldDescriptor::text("GEOID10"),
                FieldDescriptor::double("canrate"),
            ],
            records,
        )
        .unwrap()
    }

    #[test]
    fn ensure_field_creates_once() {
        let mut set = zones();
        let first = set.ensure_field(&FieldDescriptor::double("MEAN")).unwrap();
        assert!(first.created());
        assert!(set.zones.iter().all(|z| z.get("MEAN").is_null()));

        set.zones[1].set("MEAN", FieldValue::Double(4.0));
        let second = set.ensure_field(&FieldDescriptor::double("MEAN")).unwrap();
        assert!(!second.created());
        assert_eq!(set.schema.iter().filter(|f| f.name == "MEAN").count(), 1);
        assert_eq!(set.zones[1].get("MEAN"), &FieldValue::Double(4.0));
    }

    #[test]
    fn ensure_field_refuses_to_retype() {
        let mut set = zones();
        let err = set
            .ensure_field(&FieldDescriptor::long("canrate"))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaMigrationError::TypeConflict {
                field: "canrate".to_string(),
                existing: FieldType::Double,
                requested: FieldType::Long,
            }
        );
    }

    #[test]
    fn ensure_field_rejects_blank_name() {
        let mut set = zones();
        assert!(matches!(
            set.ensure_field(&FieldDescriptor::double("  ")),
            Err(SchemaMigrationError::InvalidName { .. })
        ));
    }

    #[test]
    fn require_field_reports_missing() {
        let set = zones();
        assert!(set.require_field(&FieldDescriptor::double("canrate")).is_ok());
        assert!(matches!(
            set.require_field(&FieldDescriptor::double("MEAN")),
            Err(SchemaMigrationError::MissingField { .. })
        ));
    }

    #[test]
    fn require_numeric_field_accepts_long_and_double() {
        let mut set = zones();
        set.ensure_field(&FieldDescriptor::long("UID")).unwrap();
        assert_eq!(
            set.require_numeric_field("UID").unwrap().field_type(),
            FieldType::Long
        );
        assert!(set.require_numeric_field("canrate").is_ok());
        assert!(matches!(
            set.require_numeric_field("GEOID10"),
            Err(SchemaMigrationError::TypeConflict { .. })
        ));
    }

    #[test]
    fn duplicate_zone_ids_are_rejected() {
        let records = vec![
            ZoneRecord::new(square(0.0)).with_attribute("GEOID10", FieldValue::Text("a".into())),
            ZoneRecord::new(square(1.0)).with_attribute("GEOID10", FieldValue::Text("a".into())),
        ];
        let err = ZoneGeometrySet::new("GEOID10", vec![FieldDescriptor::text("GEOID10")], records)
            .unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateZoneId { .. }));
    }

    #[test]
    fn lookup_by_zone_id() {
        let set = zones();
        assert_eq!(set.position("z2"), Some(2));
        assert_eq!(set.position("z0"), Some(0));
        assert_eq!(set.value("z1", "canrate"), Some(&FieldValue::Double(0.1)));
        assert_eq!(set.value("nope", "canrate"), None);
    }
}
