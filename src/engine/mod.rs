// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod autocorrelation;
pub mod interpolation;
pub mod join;
pub mod orchestrator;
pub mod regression;
mod stage;
pub mod zonal;

pub use orchestrator::Pipeline;
pub use stage::{RunContext, ScratchWorkspace, StageName};
