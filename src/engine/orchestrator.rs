// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sequential pipeline driver.
//!
//! A run walks the stages from initialization to finalization. Between
//! stages the orchestrator reports progress, yields to the runtime and checks
//! the run's cancellation token. Any fatal error ends the run immediately;
//! artifacts written by earlier stages stay on disk.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::Mutex as AsyncMutex;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::artifacts::{ArtifactLayout, ArtifactRegistry, RunArtifacts};
use crate::config::consts::{
    PROGRESS_AGGREGATED, PROGRESS_AUTOCORRELATED, PROGRESS_FINISHED, PROGRESS_INITIALIZED,
    PROGRESS_INTERPOLATED, PROGRESS_JOINED, PROGRESS_REGRESSED,
};
use crate::config::PipelineSettings;
use crate::engine::autocorrelation::AutocorrelationStage;
use crate::engine::interpolation::InterpolationStage;
use crate::engine::join::join;
use crate::engine::regression::RegressionStage;
use crate::engine::zonal::ZonalAggregationStage;
use crate::engine::{RunContext, ScratchWorkspace, StageName};
use crate::errors::{PipelineError, PipelineResult, SchemaMigrationError};
use crate::model::dataset::save_zones;
use crate::model::{Boundary, DecayExponent, SamplePointSet, ZoneGeometrySet};
use crate::observability::messages::artifacts::{ZonesSaveFailed, ZonesSaved};
use crate::observability::messages::pipeline::{
    RunCancelled, RunCompleted, RunFailed, RunStarted, StageCompleted, WorkspacePrepared,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{GeoprocessingProvider, NullProgressSink, ProgressSink};

/// Runs the nitrate/cancer analysis for one K at a time per workspace.
///
/// Runs with different K values may be issued concurrently; they queue on
/// the shared scratch workspace. A second run with a K that is already in
/// flight is rejected.
pub struct Pipeline {
    provider: Arc<dyn GeoprocessingProvider>,
    progress: Arc<dyn ProgressSink>,
    registry: ArtifactRegistry,
    settings: PipelineSettings,
    scratch: AsyncMutex<ScratchWorkspace>,
    active: Mutex<HashMap<String, CancellationToken>>,
    cancellation: CancellationToken,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn GeoprocessingProvider>, layout: ArtifactLayout) -> Self {
        let scratch = ScratchWorkspace::new(layout.scratch_dir());
        Self {
            provider,
            progress: Arc::new(NullProgressSink),
            registry: ArtifactRegistry::new(layout),
            settings: PipelineSettings::default(),
            scratch: AsyncMutex::new(scratch),
            active: Mutex::new(HashMap::new()),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Use an externally owned token as the parent of every run's token.
    ///
    /// Cancelling it stops in-flight runs at their next checkpoint and every
    /// later run right after initialization. Use [`Self::cancel_run`] to stop
    /// a single run and keep the pipeline usable.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn registry(&self) -> &ArtifactRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// The pipeline-wide parent token. See [`Self::with_cancellation`].
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Cancel the in-flight run for `k`, if there is one.
    ///
    /// The run stops at its next checkpoint; later runs are unaffected.
    pub fn cancel_run(&self, k: &DecayExponent) -> bool {
        let active = self.active.lock().unwrap_or_else(|p| p.into_inner());
        match active.get(&k.literal()) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Run every stage for `k`.
    ///
    /// `k` is validated before anything touches the filesystem. `zones` is
    /// updated in place: the mean field and the unique-id field are added
    /// if missing and the mean values are rewritten.
    pub async fn run_pipeline(
        &self,
        k: f64,
        samples: &SamplePointSet,
        zones: &mut ZoneGeometrySet,
        boundary: &Boundary,
    ) -> PipelineResult<RunArtifacts> {
        let k = DecayExponent::new(k)?;
        self.execute(k, samples, zones, boundary).await
    }

    /// Same as [`Self::run_pipeline`] with K given as text.
    pub async fn run_pipeline_str(
        &self,
        k: &str,
        samples: &SamplePointSet,
        zones: &mut ZoneGeometrySet,
        boundary: &Boundary,
    ) -> PipelineResult<RunArtifacts> {
        let k: DecayExponent = k.parse()?;
        self.execute(k, samples, zones, boundary).await
    }

    /// [`Self::run_pipeline_str`], then write `zones` back to `zones_path`.
    ///
    /// Zones are saved after a failed or cancelled run too, whenever the run
    /// got far enough to change them; like stage artifacts, schema and value
    /// updates are never rolled back. A run rejected before it touched the
    /// zones leaves the file alone. When both the run and the save fail, the
    /// run error is returned and the save error is logged.
    pub async fn run_and_save_zones(
        &self,
        k: &str,
        samples: &SamplePointSet,
        zones: &mut ZoneGeometrySet,
        boundary: &Boundary,
        zones_path: &Path,
    ) -> PipelineResult<RunArtifacts> {
        let before = zones.clone();
        let result = self.run_pipeline_str(k, samples, zones, boundary).await;
        if result.is_err() && *zones == before {
            return result;
        }

        let saved = save_zones(zones_path, zones);
        match (result, saved) {
            (Ok(artifacts), Ok(())) => {
                ZonesSaved {
                    path: zones_path,
                    run_succeeded: true,
                }
                .log();
                Ok(artifacts)
            }
            (Ok(_), Err(e)) => Err(PipelineError::stage(StageName::Finalization, e)),
            (Err(run), Ok(())) => {
                ZonesSaved {
                    path: zones_path,
                    run_succeeded: false,
                }
                .log();
                Err(run)
            }
            (Err(run), Err(e)) => {
                ZonesSaveFailed {
                    path: zones_path,
                    error: &e,
                }
                .log();
                Err(run)
            }
        }
    }

    async fn execute(
        &self,
        k: DecayExponent,
        samples: &SamplePointSet,
        zones: &mut ZoneGeometrySet,
        boundary: &Boundary,
    ) -> PipelineResult<RunArtifacts> {
        let literal = k.literal();
        let claim = self.claim(&literal)?;
        let scratch = self.scratch.lock().await;

        let started = Instant::now();
        let announcement = RunStarted {
            k: &literal,
            provider: self.provider.name(),
            sample_count: samples.len(),
            zone_count: zones.len(),
        };
        announcement.log();

        let result = self
            .run_stages(k, claim.token.clone(), samples, zones, boundary, &scratch)
            .instrument(announcement.span("run_pipeline"))
            .await;
        match &result {
            Ok(artifacts) => RunCompleted {
                k: &literal,
                warning_count: artifacts.warnings.len(),
                autocorrelation_report: artifacts.autocorrelation_report.is_some(),
                duration: started.elapsed(),
            }
            .log(),
            Err(PipelineError::Cancelled { after }) => RunCancelled {
                k: &literal,
                after_stage: after.label(),
            }
            .log(),
            Err(error) => RunFailed {
                k: &literal,
                error,
            }
            .log(),
        }
        result
    }

    async fn run_stages(
        &self,
        k: DecayExponent,
        cancellation: CancellationToken,
        samples: &SamplePointSet,
        zones: &mut ZoneGeometrySet,
        boundary: &Boundary,
        scratch: &ScratchWorkspace,
    ) -> PipelineResult<RunArtifacts> {
        let ctx = RunContext {
            k,
            layout: self.registry.layout().clone(),
            settings: self.settings.clone(),
            cancellation,
        };
        let mut timer = Instant::now();

        if !zones.has_field(&zones.id_field) {
            return Err(PipelineError::stage(
                StageName::Initialization,
                SchemaMigrationError::MissingField {
                    field: zones.id_field.clone(),
                },
            ));
        }
        ctx.layout
            .prepare()
            .map_err(|e| PipelineError::stage(StageName::Initialization, e))?;
        WorkspacePrepared {
            root: ctx.layout.root(),
        }
        .log();
        self.checkpoint(StageName::Initialization, &ctx, "Initializing...", PROGRESS_INITIALIZED, &mut timer)
            .await?;

        let surface = InterpolationStage::new(self.provider.clone())
            .interpolate(samples, boundary, &ctx)
            .await
            .map_err(|e| PipelineError::stage(StageName::Interpolation, e))?;
        self.checkpoint(
            StageName::Interpolation,
            &ctx,
            "Calculating average nitrate per census tract...",
            PROGRESS_INTERPOLATED,
            &mut timer,
        )
        .await?;

        let id_field = zones.id_field.clone();
        let statistic = ZonalAggregationStage::new(self.provider.clone())
            .aggregate(&surface, zones, &id_field, scratch)
            .await
            .map_err(|e| PipelineError::stage(StageName::ZonalAggregation, e))?;
        self.checkpoint(
            StageName::ZonalAggregation,
            &ctx,
            "Updating nitrates field in tracts...",
            PROGRESS_AGGREGATED,
            &mut timer,
        )
        .await?;

        let joined = join(zones, &statistic, &ctx.settings.fields.mean)
            .map_err(|e| PipelineError::stage(StageName::AttributeJoin, e))?;
        self.checkpoint(
            StageName::AttributeJoin,
            &ctx,
            "Running Ordinary Least Squares regression...",
            PROGRESS_JOINED,
            &mut timer,
        )
        .await?;

        let regression = RegressionStage::new(self.provider.clone())
            .regress(zones, &ctx)
            .await
            .map_err(|e| PipelineError::stage(StageName::Regression, e))?;
        self.checkpoint(
            StageName::Regression,
            &ctx,
            "Running Moran's I spatial autocorrelation...",
            PROGRESS_REGRESSED,
            &mut timer,
        )
        .await?;

        let autocorrelation = AutocorrelationStage::new(self.provider.clone())
            .analyze(&regression.layer_path, &ctx, scratch)
            .await
            .map_err(|e| PipelineError::stage(StageName::Autocorrelation, e))?;
        self.checkpoint(
            StageName::Autocorrelation,
            &ctx,
            "Recording run artifacts...",
            PROGRESS_AUTOCORRELATED,
            &mut timer,
        )
        .await?;

        let artifacts = RunArtifacts {
            k,
            surface,
            regression_layer: regression.layer_path,
            regression_report: regression.report_path,
            autocorrelation_report: autocorrelation.report,
            regression: Some(regression.summary),
            morans_i: Some(autocorrelation.statistic),
            warnings: joined.warnings(),
        };
        self.registry
            .record(&artifacts)
            .map_err(|e| PipelineError::stage(StageName::Finalization, e))?;
        self.report("Finalizing output...", PROGRESS_FINISHED).await;
        StageCompleted {
            stage: StageName::Finalization.label(),
            k: &ctx.k.literal(),
            duration: timer.elapsed(),
        }
        .log();
        Ok(artifacts)
    }

    /// Close out `completed`: log it, report progress, then honour cancellation.
    async fn checkpoint(
        &self,
        completed: StageName,
        ctx: &RunContext,
        status: &str,
        fraction: f64,
        timer: &mut Instant,
    ) -> PipelineResult<()> {
        StageCompleted {
            stage: completed.label(),
            k: &ctx.k.literal(),
            duration: timer.elapsed(),
        }
        .log();
        *timer = Instant::now();

        self.report(status, fraction).await;
        if ctx.cancellation.is_cancelled() {
            return Err(PipelineError::Cancelled { after: completed });
        }
        Ok(())
    }

    async fn report(&self, status: &str, fraction: f64) {
        self.progress.report(status, fraction);
        tokio::task::yield_now().await;
    }

    fn claim(&self, k: &str) -> PipelineResult<ActiveRun<'_>> {
        let mut active = self.active.lock().unwrap_or_else(|p| p.into_inner());
        if active.contains_key(k) {
            return Err(PipelineError::RunInProgress { k: k.to_string() });
        }
        let token = self.cancellation.child_token();
        active.insert(k.to_string(), token.clone());
        Ok(ActiveRun {
            active: &self.active,
            k: k.to_string(),
            token,
        })
    }
}

/// Releases the K claim when the run ends, however it ends.
struct ActiveRun<'a> {
    active: &'a Mutex<HashMap<String, CancellationToken>>,
    k: String,
    token: CancellationToken,
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        let mut active = self.active.lock().unwrap_or_else(|p| p.into_inner());
        active.remove(&self.k);
    }
}
