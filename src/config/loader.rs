// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::consts::{
    DEFAULT_CANCER_RATE_FIELD, DEFAULT_CELL_SIZE, DEFAULT_MEAN_FIELD, DEFAULT_RESIDUAL_FIELD,
    DEFAULT_SAMPLE_VALUE_FIELD, DEFAULT_UID_FIELD, DEFAULT_ZONE_ID_FIELD,
};
use crate::errors::ConfigError;

/// Main configuration structure for a pipeline workspace.
///
/// Relative paths are resolved against the directory holding the config file.
///
/// # Example
/// ```yaml
/// workspace_root: .
/// cell_size: 0.003
/// log_level: info
/// inputs:
///   samples: data/well_nitrate.json
///   zones: data/cancer_tracts.json
///   boundary: data/cancer_county.json
/// fields:
///   zone_id: GEOID10
///   cancer_rate: canrate
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_workspace_root")]
    pub workspace_root: PathBuf,
    pub inputs: InputPaths,
    #[serde(default)]
    pub fields: FieldNames,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Locations of the three input datasets (JSON).
#[derive(Debug, Clone, Deserialize)]
pub struct InputPaths {
    pub samples: PathBuf,
    pub zones: PathBuf,
    pub boundary: PathBuf,
}

/// Names of the fields the pipeline reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub zone_id: String,
    pub sample_value: String,
    pub cancer_rate: String,
    pub mean: String,
    pub uid: String,
    pub residual: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            zone_id: DEFAULT_ZONE_ID_FIELD.to_string(),
            sample_value: DEFAULT_SAMPLE_VALUE_FIELD.to_string(),
            cancer_rate: DEFAULT_CANCER_RATE_FIELD.to_string(),
            mean: DEFAULT_MEAN_FIELD.to_string(),
            uid: DEFAULT_UID_FIELD.to_string(),
            residual: DEFAULT_RESIDUAL_FIELD.to_string(),
        }
    }
}

impl FieldNames {
    fn roles(&self) -> [(&'static str, &str); 6] {
        [
            ("zone_id", self.zone_id.as_str()),
            ("sample_value", self.sample_value.as_str()),
            ("cancer_rate", self.cancer_rate.as_str()),
            ("mean", self.mean.as_str()),
            ("uid", self.uid.as_str()),
            ("residual", self.residual.as_str()),
        ]
    }

    /// Names are non-empty, and the zone-schema fields are pairwise distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let roles = self.roles();
        if let Some((role, _)) = roles.iter().find(|(_, name)| name.trim().is_empty()) {
            return Err(ConfigError::EmptyFieldName { role: *role });
        }
        // The sample value lives on a different dataset and may share a name.
        let zone_roles: Vec<(&'static str, &str)> = roles
            .iter()
            .copied()
            .filter(|(role, _)| *role != "sample_value")
            .collect();
        for (i, (first, name)) in zone_roles.iter().enumerate() {
            if let Some((second, _)) = zone_roles[i + 1..].iter().find(|(_, other)| other == name) {
                return Err(ConfigError::DuplicateFieldName {
                    name: name.to_string(),
                    first: *first,
                    second: *second,
                });
            }
        }
        Ok(())
    }
}

/// Stage parameters that do not vary with K.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub cell_size: f64,
    pub fields: FieldNames,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            fields: FieldNames::default(),
        }
    }
}

impl PipelineSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        self.fields.validate()
    }
}

impl PipelineConfig {
    pub fn settings(&self) -> PipelineSettings {
        PipelineSettings {
            cell_size: self.cell_size,
            fields: self.fields.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.settings().validate()
    }

    fn resolve_against(mut self, base: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.workspace_root);
        resolve(&mut self.inputs.samples);
        resolve(&mut self.inputs.zones);
        resolve(&mut self.inputs.boundary);
        self
    }
}

fn default_workspace_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_cell_size() -> f64 {
    DEFAULT_CELL_SIZE
}

/// Parse a config from YAML text without touching the filesystem
pub fn parse_config(content: &str) -> Result<PipelineConfig, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Load a config from a YAML file, resolve relative paths and validate it
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let cfg = parse_config(&content)?.resolve_against(base);
    cfg.validate()?;
    Ok(cfg)
}
