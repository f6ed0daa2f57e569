// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating pipeline configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("cell_size must be a positive finite number, got {0}")]
    InvalidCellSize(f64),

    #[error("field name for '{role}' must not be empty")]
    EmptyFieldName { role: &'static str },

    #[error("field name '{name}' is used for both '{first}' and '{second}'")]
    DuplicateFieldName {
        name: String,
        first: &'static str,
        second: &'static str,
    },
}

/// Errors that can occur while reading or writing JSON datasets
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to access dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("zone id '{zone_id}' appears more than once")]
    DuplicateZoneId { zone_id: String },

    #[error("zone at row {row} is missing its identifier field '{field}'")]
    MissingZoneId { row: usize, field: String },
}
