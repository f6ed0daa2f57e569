// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types follow a struct-based pattern with `Display` and
//! [`messages::StructuredLog`] implementations so that log text is not
//! scattered through the pipeline as magic strings.
//!
//! # Architecture
//!
//! * `messages::pipeline` - run lifecycle and progress checkpoints
//! * `messages::stage` - schema evolution, join outcomes, artifact writes
//! * `messages::artifacts` - run manifest persistence
//!
//! [`init_tracing`] installs a `tracing-subscriber` formatter; library code
//! only emits events and never installs a subscriber itself.

pub mod messages;

use crate::observability::messages::pipeline::ProgressReported;
use crate::observability::messages::StructuredLog;
use crate::traits::ProgressSink;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over `default_level` when set. Returns an error if a
/// global subscriber is already installed.
pub fn init_tracing(default_level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
}

/// Progress sink that forwards every checkpoint to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn report(&self, status: &str, fraction: f64) {
        ProgressReported { status, fraction }.log();
    }
}
