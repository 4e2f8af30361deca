//! sc-results: run summaries, comparison tables and the summary store.

pub mod compare;
pub mod conversion;
pub mod hash;
pub mod metrics;
pub mod store;
pub mod summary;
pub mod types;

pub use compare::{Comparison, ComparisonRow};
pub use conversion::VolumeConversion;
pub use hash::compute_run_id;
pub use metrics::{MetricDef, MetricSource, default_summary_def};
pub use store::SummaryStore;
pub use summary::{RunSummary, SummarySource, summarize};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown node '{name}' in summary metric '{metric}'")]
    UnknownHandle { metric: String, name: String },

    #[error("Summaries do not list the same metrics: {message}")]
    MetricMismatch { message: String },

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },
}
