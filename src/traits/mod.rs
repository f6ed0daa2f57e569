pub mod progress;
pub mod provider;

pub use progress::{NullProgressSink, ProgressSink};
pub use provider::{
    AutocorrelationOutput, GeoprocessingProvider, MoransI, RegressionLayer, RegressionOutput,
    RegressionRequest, RegressionSummary,
};
