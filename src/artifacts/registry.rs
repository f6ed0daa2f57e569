// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Lookup of previously produced run artifacts by K.

use std::fs;
use std::io;

use crate::artifacts::{ArtifactLayout, RunArtifacts};
use crate::model::DecayExponent;
use crate::observability::messages::artifacts::{ManifestUnreadable, ManifestWritten};
use crate::observability::messages::StructuredLog;

/// Cache of run artifacts keyed by K.
///
/// Lookups never compute anything and never check staleness; re-run the
/// pipeline to refresh an entry.
#[derive(Debug, Clone)]
pub struct ArtifactRegistry {
    layout: ArtifactLayout,
}

impl ArtifactRegistry {
    pub fn new(layout: ArtifactLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// The bundle for `k`, if the surface, regression layer and regression
    /// report all exist on disk.
    pub fn locate(&self, k: &DecayExponent) -> Option<RunArtifacts> {
        let surface = self.layout.surface_path(k);
        let regression_layer = self.layout.regression_layer_path(k);
        let regression_report = self.layout.regression_report_path(k);
        if !(surface.is_file() && regression_layer.is_file() && regression_report.is_file()) {
            return None;
        }

        let mut artifacts = self.read_manifest(k).unwrap_or(RunArtifacts {
            k: *k,
            surface: surface.clone(),
            regression_layer: regression_layer.clone(),
            regression_report: regression_report.clone(),
            autocorrelation_report: None,
            regression: None,
            morans_i: None,
            warnings: Vec::new(),
        });
        artifacts.surface = surface;
        artifacts.regression_layer = regression_layer;
        artifacts.regression_report = regression_report;
        if artifacts
            .autocorrelation_report
            .as_ref()
            .is_some_and(|path| !path.is_file())
        {
            artifacts.autocorrelation_report = None;
        }
        Some(artifacts)
    }

    /// Persist `artifacts` as the manifest for its K, replacing any earlier one.
    pub fn record(&self, artifacts: &RunArtifacts) -> io::Result<()> {
        let path = self.layout.manifest_path(&artifacts.k);
        let encoded = serde_json::to_vec_pretty(artifacts).map_err(io::Error::other)?;
        fs::write(&path, encoded)?;
        ManifestWritten {
            k: &artifacts.k.literal(),
            path: &path,
        }
        .log();
        Ok(())
    }

    fn read_manifest(&self, k: &DecayExponent) -> Option<RunArtifacts> {
        let path = self.layout.manifest_path(k);
        let bytes = fs::read(&path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(artifacts) => Some(artifacts),
            Err(error) => {
                ManifestUnreadable {
                    path: &path,
                    error: &error,
                }
                .log();
                None
            }
        }
    }
}
