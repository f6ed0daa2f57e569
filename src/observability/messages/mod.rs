// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for human-readable output and
//! [`StructuredLog`] to emit the same event with typed fields attached.
//!
//! # Organization
//!
//! * `pipeline` - run lifecycle, stage completion and progress checkpoints
//! * `stage` - schema evolution, join outcomes and artifact writes inside stages
//! * `artifacts` - run manifest persistence
//!
//! # Usage Pattern
//!
//! ```rust
//! use nitrate_pipeline::observability::messages::pipeline::RunStarted;
//! use nitrate_pipeline::observability::messages::StructuredLog;
//!
//! let msg = RunStarted {
//!     k: "2.0",
//!     provider: "local",
//!     sample_count: 10,
//!     zone_count: 5,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod artifacts;
pub mod pipeline;
pub mod stage;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span {
        tracing::info_span!("message", span_name = name)
    }
}
