// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod pipeline;
mod provider;
mod schema;

pub use config::{ConfigError, DatasetError};
pub use pipeline::{InputValidationError, PipelineError, PipelineResult, StageError};
pub use provider::{ExternalToolError, JoinLookupError, ProviderResult, ReportGenerationError};
pub use schema::SchemaMigrationError;
