// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Geoprocessing provider implementations.
//!
//! # Available Backends
//!
//! ## Local Backend
//! Native IDW, zonal mean, OLS and Moran's I:
//! - **Interpolation**: inverse-distance weighting over the boundary's bounding box
//! - **Aggregation**: cell-center-in-polygon zonal mean
//! - **Statistics**: single-variable OLS, global Moran's I
//!
//! ## Stub Backend (Test-Only)
//! Deterministic provider with failure injection, only available in test builds:
//! - failing a chosen tool
//! - dropping zones from the zonal statistic
//! - withholding the autocorrelation report
//! - blocking interpolation until released
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use nitrate_pipeline::artifacts::ArtifactLayout;
//! use nitrate_pipeline::backends::local::LocalGeoprocessor;
//! use nitrate_pipeline::engine::Pipeline;
//!
//! let pipeline = Pipeline::new(
//!     Arc::new(LocalGeoprocessor::new()),
//!     ArtifactLayout::new("workspace"),
//! );
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
