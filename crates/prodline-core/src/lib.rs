pub mod charts;
pub mod classify;
pub mod error;
pub mod html;
pub mod pipelines;
pub mod processing;
pub mod render;
pub mod trend;
pub mod types;
pub mod validation;

pub use error::{DashboardError, ErrorKind, Result};
pub use pipelines::{render_upload, run_pipeline, ExecutionContext, PipelineOutput};
