/// Directory of interpolated surfaces, relative to the workspace root
pub const SURFACE_DIR: &str = "data/rasters";
/// Directory of regression residual layers
pub const REGRESSION_LAYER_DIR: &str = "data/ols_layers";
/// Directory of regression reports
pub const REGRESSION_REPORT_DIR: &str = "ols_reports";
/// Directory an external map exporter writes into; never created by the pipeline
pub const MAP_IMAGE_DIR: &str = "reports";
/// Directory of per-K run manifests
pub const MANIFEST_DIR: &str = "data/runs";
/// Shared transient workspace for intermediate tables
pub const SCRATCH_DIR: &str = "scratch";
/// File name of the zonal statistic table dumped into the scratch workspace
pub const ZONAL_SCRATCH_TABLE: &str = "zonal_stats.json";

/// Default interpolation cell size, in dataset units
pub const DEFAULT_CELL_SIZE: f64 = 0.003;
/// Upper bound on surface cells the native provider will allocate
pub const MAX_SURFACE_CELLS: usize = 50_000_000;

pub const DEFAULT_ZONE_ID_FIELD: &str = "GEOID10";
pub const DEFAULT_SAMPLE_VALUE_FIELD: &str = "nitr_ran";
pub const DEFAULT_CANCER_RATE_FIELD: &str = "canrate";
pub const DEFAULT_MEAN_FIELD: &str = "MEAN";
pub const DEFAULT_UID_FIELD: &str = "UID";
pub const DEFAULT_RESIDUAL_FIELD: &str = "StdResid";

/// Progress fraction reported once the workspace is prepared
pub const PROGRESS_INITIALIZED: f64 = 0.05;
pub const PROGRESS_INTERPOLATED: f64 = 0.35;
pub const PROGRESS_AGGREGATED: f64 = 0.40;
pub const PROGRESS_JOINED: f64 = 0.60;
pub const PROGRESS_REGRESSED: f64 = 0.75;
pub const PROGRESS_AUTOCORRELATED: f64 = 0.90;
pub const PROGRESS_FINISHED: f64 = 1.0;
