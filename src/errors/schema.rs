// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while validating or evolving a zone schema.

use thiserror::Error;

use crate::model::FieldType;

/// Field creation or field validation failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaMigrationError {
    /// The field exists but with a different type; fields are never retyped.
    #[error("field '{field}' exists as {existing:?}, expected {requested:?}")]
    TypeConflict {
        field: String,
        existing: FieldType,
        requested: FieldType,
    },

    /// A field the stage reads from is missing.
    #[error("required field '{field}' is missing")]
    MissingField { field: String },

    #[error("invalid field name '{field}'")]
    InvalidName { field: String },

    /// A zone carries no value in the identifier field.
    #[error("zone at row {row} has no value in identifier field '{field}'")]
    MissingZoneId { row: usize, field: String },
}
