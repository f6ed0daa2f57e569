// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Receiver of `(status, fraction)` notifications between stages.
///
/// Called on the pipeline's own task; implementations should return quickly.
pub trait ProgressSink: Send + Sync {
    fn report(&self, status: &str, fraction: f64);
}

/// Sink that discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn report(&self, _status: &str, _fraction: f64) {}
}
