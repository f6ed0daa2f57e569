// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod artifacts;     // per-K naming + run registry
pub mod backends;      // geoprocessing providers
pub mod config;        // YAML config + constants
pub mod engine;        // stages + orchestrator
pub mod errors;        // error handling
pub mod model;         // features, surfaces, K
pub mod observability;
pub mod traits;        // provider + progress seams
