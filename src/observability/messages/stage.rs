// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for events inside individual stages.

use crate::model::FieldType;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// A field was added to the zone schema.
///
/// # Log Level
/// `info!` - Schema evolution is worth recording
///
/// # Example
/// ```
/// use nitrate_pipeline::model::FieldType;
/// use nitrate_pipeline::observability::messages::stage::FieldCreated;
///
/// let msg = FieldCreated {
///     field: "MEAN",
///     field_type: FieldType::Double,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct FieldCreated<'a> {
    pub field: &'a str,
    pub field_type: FieldType,
}

impl Display for FieldCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Created {:?} field '{}'", self.field_type, self.field)
    }
}

impl StructuredLog for FieldCreated<'_> {
    fn log(&self) {
        tracing::info!(field = self.field, field_type = ?self.field_type, "{}", self);
    }
}

/// A zone had no zonal mean; its row was left unchanged.
///
/// # Log Level
/// `warn!` - Recoverable per-row failure
pub struct JoinLookupMissed<'a> {
    pub zone_id: &'a str,
    pub field: &'a str,
}

impl Display for JoinLookupMissed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Error updating id {}: no zonal mean, '{}' left unchanged",
            self.zone_id, self.field
        )
    }
}

impl StructuredLog for JoinLookupMissed<'_> {
    fn log(&self) {
        tracing::warn!(zone_id = self.zone_id, field = self.field, "{}", self);
    }
}

/// Summary of an attribute join.
///
/// # Log Level
/// `info!` - Important operational event
pub struct JoinCompleted<'a> {
    pub field: &'a str,
    pub updated: usize,
    pub missed: usize,
}

impl Display for JoinCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Joined '{}': {} zones updated, {} zones without a zonal mean",
            self.field, self.updated, self.missed
        )
    }
}

impl StructuredLog for JoinCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            field = self.field,
            updated = self.updated,
            missed = self.missed,
            "{}", self
        );
    }
}

/// Unique ids were assigned from row indices.
pub struct UidAssigned<'a> {
    pub field: &'a str,
    pub count: usize,
}

impl Display for UidAssigned<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Assigned '{}' from row index for {} zones",
            self.field, self.count
        )
    }
}

impl StructuredLog for UidAssigned<'_> {
    fn log(&self) {
        tracing::info!(field = self.field, count = self.count, "{}", self);
    }
}

/// An artifact file was written.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct ArtifactWritten<'a> {
    pub kind: &'a str,
    pub path: &'a Path,
}

impl Display for ArtifactWritten<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Wrote {} to {}", self.kind, self.path.display())
    }
}

impl StructuredLog for ArtifactWritten<'_> {
    fn log(&self) {
        tracing::debug!(kind = self.kind, path = %self.path.display(), "{}", self);
    }
}

/// The autocorrelation report could not be produced.
///
/// # Log Level
/// `warn!` - Soft failure; the run continues without a report handle
pub struct ReportGenerationSkipped<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for ReportGenerationSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Autocorrelation report skipped: {}", self.error)
    }
}

impl StructuredLog for ReportGenerationSkipped<'_> {
    fn log(&self) {
        tracing::warn!(error = %self.error, "{}", self);
    }
}
