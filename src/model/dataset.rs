// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! JSON-backed vector data source.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::errors::DatasetError;
use crate::model::{Boundary, SamplePointSet, ZoneGeometrySet};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DatasetError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DatasetError> {
    let encoded = serde_json::to_string_pretty(value).map_err(|source| DatasetError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, encoded).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_samples(path: &Path) -> Result<SamplePointSet, DatasetError> {
    read_json(path)
}

pub fn load_boundary(path: &Path) -> Result<Boundary, DatasetError> {
    read_json(path)
}

/// Load a zone set and reject duplicate or missing identifiers.
pub fn load_zones(path: &Path) -> Result<ZoneGeometrySet, DatasetError> {
    let zones: ZoneGeometrySet = read_json(path)?;
    zones.validate()?;
    Ok(zones)
}

pub fn save_zones(path: &Path, zones: &ZoneGeometrySet) -> Result<(), DatasetError> {
    write_json(path, zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDescriptor, FieldValue, ZoneRecord};
    use geo::{polygon, MultiPolygon};

    #[test]
    fn zones_survive_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones.json");
        let zone = ZoneRecord::new(MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ]]))
        .with_attribute("GEOID10", FieldValue::Text("55025000100".into()));
        let zones =
            ZoneGeometrySet::new("GEOID10", vec![FieldDescriptor::text("GEOID10")], vec![zone])
                .unwrap();

        save_zones(&path, &zones).unwrap();
        assert_eq!(load_zones(&path).unwrap(), zones);
    }

    #[test]
    fn load_zones_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones.json");
        let raw = r#"{
            "id_field": "GEOID10",
            "schema": [{"name": "GEOID10", "field_type": "text"}],
            "zones": [
                {"geometry": [], "attributes": {"GEOID10": "a"}},
                {"geometry": [], "attributes": {"GEOID10": "a"}}
            ]
        }"#;
        std::fs::write(&path, raw).unwrap();
        assert!(matches!(
            load_zones(&path),
            Err(DatasetError::DuplicateZoneId { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_samples(&dir.path().join("absent.json")),
            Err(DatasetError::Io { .. })
        ));
    }
}
