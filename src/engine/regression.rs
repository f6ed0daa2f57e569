// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::engine::RunContext;
use crate::errors::StageError;
use crate::model::{FieldDescriptor, FieldValue, ZoneGeometrySet};
use crate::observability::messages::stage::{ArtifactWritten, FieldCreated, UidAssigned};
use crate::observability::messages::StructuredLog;
use crate::traits::{GeoprocessingProvider, RegressionRequest, RegressionSummary};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct RegressionResult {
    pub layer_path: PathBuf,
    pub report_path: PathBuf,
    pub summary: RegressionSummary,
}

/// Cancer rate regressed on mean nitrate.
pub struct RegressionStage {
    provider: Arc<dyn GeoprocessingProvider>,
}

impl RegressionStage {
    pub fn new(provider: Arc<dyn GeoprocessingProvider>) -> Self {
        Self { provider }
    }

    /// Ensure the unique-id field, then fit OLS through the provider.
    ///
    /// UID values are assigned from the row index only when the field is
    /// created; later runs leave them untouched.
    pub async fn regress(
        &self,
        zones: &mut ZoneGeometrySet,
        ctx: &RunContext,
    ) -> Result<RegressionResult, StageError> {
        let fields = &ctx.settings.fields;
        zones.require_numeric_field(&fields.cancer_rate)?;
        zones.require_field(&FieldDescriptor::double(fields.mean.as_str()))?;

        let uid = zones.ensure_field(&FieldDescriptor::long(fields.uid.as_str()))?;
        if uid.created() {
            FieldCreated {
                field: uid.name(),
                field_type: uid.field_type(),
            }
            .log();
            for (row, zone) in zones.zones.iter_mut().enumerate() {
                zone.set(&fields.uid, FieldValue::Long(row as i64));
            }
            UidAssigned {
                field: uid.name(),
                count: zones.len(),
            }
            .log();
        }

        let request = RegressionRequest {
            id_field: fields.uid.clone(),
            dependent_field: fields.cancer_rate.clone(),
            explanatory_field: fields.mean.clone(),
            residual_field: fields.residual.clone(),
            layer_path: ctx.layout.regression_layer_path(&ctx.k),
            report_path: ctx.layout.regression_report_path(&ctx.k),
        };
        let output = self
            .provider
            .ordinary_least_squares(zones, &request)
            .await?;

        ArtifactWritten {
            kind: "regression layer",
            path: &output.layer_path,
        }
        .log();
        ArtifactWritten {
            kind: "regression report",
            path: &output.report_path,
        }
        .log();

        Ok(RegressionResult {
            layer_path: output.layer_path,
            report_path: output.report_path,
            summary: output.summary,
        })
    }
}
