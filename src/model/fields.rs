// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Field values and the schema descriptor used by stages to validate
//! their inputs once at entry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage type of a feature field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Double,
    Long,
}

/// A single attribute value on a feature row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Text(String),
    Long(i64),
    Double(f64),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Numeric view of the value; text is not coerced.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Double(v) => Some(*v),
            FieldValue::Long(v) => Some(*v as f64),
            FieldValue::Null | FieldValue::Text(_) => None,
        }
    }

    /// Value usable as a zone key: text as-is, integers in decimal form.
    pub fn as_key(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Long(v) => Some(v.to_string()),
            FieldValue::Null | FieldValue::Double(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("<null>"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Long(v) => write!(f, "{}", v),
            FieldValue::Double(v) => write!(f, "{}", v),
        }
    }
}

/// Name and type of a field a stage reads or writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn double(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Double)
    }

    pub fn long(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Long)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }
}

/// Typed confirmation that a field exists with the expected type.
///
/// Only obtainable from `ZoneGeometrySet::ensure_field` or
/// `ZoneGeometrySet::require_field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHandle {
    name: String,
    field_type: FieldType,
    created: bool,
}

impl FieldHandle {
    pub(crate) fn new(name: String, field_type: FieldType, created: bool) -> Self {
        Self {
            name,
            field_type,
            created,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// True when this call added the field to the schema.
    pub fn created(&self) -> bool {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_values_deserialize_by_shape() {
        let values: Vec<FieldValue> =
            serde_json::from_str(r#"[null, "55025000100", 7, 0.25]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FieldValue::Null,
                FieldValue::Text("55025000100".to_string()),
                FieldValue::Long(7),
                FieldValue::Double(0.25),
            ]
        );
    }

    #[test]
    fn numeric_and_key_views() {
        assert_eq!(FieldValue::Long(3).as_f64(), Some(3.0));
        assert_eq!(FieldValue::Text("3".into()).as_f64(), None);
        assert_eq!(FieldValue::Long(42).as_key().as_deref(), Some("42"));
        assert_eq!(FieldValue::Double(4.2).as_key(), None);
    }
}
