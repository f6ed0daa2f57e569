// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Deterministic per-K file locations.
//!
//! The raster, regression layer and map image names use the sanitized K
//! (`2_0`); the regression report keeps the literal K (`2.0`).

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::consts::{
    MANIFEST_DIR, MAP_IMAGE_DIR, REGRESSION_LAYER_DIR, REGRESSION_REPORT_DIR, SCRATCH_DIR,
    SURFACE_DIR,
};
use crate::model::DecayExponent;

/// Which exported map an image path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    Idw,
    Ols,
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKind::Idw => f.write_str("IDW"),
            MapKind::Ols => f.write_str("OLS"),
        }
    }
}

/// Naming scheme rooted at a workspace directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn surface_path(&self, k: &DecayExponent) -> PathBuf {
        self.root
            .join(SURFACE_DIR)
            .join(format!("{}.tif", k.sanitized()))
    }

    pub fn regression_layer_path(&self, k: &DecayExponent) -> PathBuf {
        self.root
            .join(REGRESSION_LAYER_DIR)
            .join(format!("OLS_{}.shp", k.sanitized()))
    }

    pub fn regression_report_path(&self, k: &DecayExponent) -> PathBuf {
        self.root
            .join(REGRESSION_REPORT_DIR)
            .join(format!("{}_ols.pdf", k.literal()))
    }

    /// Where an external map exporter is expected to place its image.
    pub fn map_image_path(&self, kind: MapKind, k: &DecayExponent) -> PathBuf {
        self.root
            .join(MAP_IMAGE_DIR)
            .join(format!("{}_{}.png", kind, k.sanitized()))
    }

    pub fn manifest_path(&self, k: &DecayExponent) -> PathBuf {
        self.root
            .join(MANIFEST_DIR)
            .join(format!("{}.json", k.sanitized()))
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.root.join(SCRATCH_DIR)
    }

    /// Directories a run writes into.
    pub fn directories(&self) -> Vec<PathBuf> {
        [
            SURFACE_DIR,
            REGRESSION_LAYER_DIR,
            REGRESSION_REPORT_DIR,
            MANIFEST_DIR,
            SCRATCH_DIR,
        ]
        .iter()
        .map(|dir| self.root.join(dir))
        .collect()
    }

    /// Create any missing output directory. Safe to call on every run.
    pub fn prepare(&self) -> io::Result<()> {
        for dir in self.directories() {
            fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(value: f64) -> DecayExponent {
        DecayExponent::new(value).unwrap()
    }

    #[test]
    fn paths_encode_k_per_artifact_type() {
        let layout = ArtifactLayout::new("/work");
        let k = k(2.0);
        assert_eq!(layout.surface_path(&k), PathBuf::from("/work/data/rasters/2_0.tif"));
        assert_eq!(
            layout.regression_layer_path(&k),
            PathBuf::from("/work/data/ols_layers/OLS_2_0.shp")
        );
        assert_eq!(
            layout.regression_report_path(&k),
            PathBuf::from("/work/ols_reports/2.0_ols.pdf")
        );
        assert_eq!(
            layout.map_image_path(MapKind::Idw, &k),
            PathBuf::from("/work/reports/IDW_2_0.png")
        );
        assert_eq!(
            layout.map_image_path(MapKind::Ols, &k),
            PathBuf::from("/work/reports/OLS_2_0.png")
        );
    }

    #[test]
    fn fractional_k_keeps_dot_only_in_report_name() {
        let layout = ArtifactLayout::new("w");
        let k = k(3.75);
        assert!(layout.surface_path(&k).ends_with("data/rasters/3_75.tif"));
        assert!(layout.regression_report_path(&k).ends_with("ols_reports/3.75_ols.pdf"));
    }

    #[test]
    fn prepare_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout::new(dir.path());
        layout.prepare().unwrap();
        layout.prepare().unwrap();
        for d in layout.directories() {
            assert!(d.is_dir(), "{} missing", d.display());
        }
    }
}
