pub mod error;
pub mod export;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{PipelineOptions, RunSummary, run_pipeline};
