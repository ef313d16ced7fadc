use prodline_parser::{load_sheet, SheetFormat};
use tracing::info;

use crate::charts::{build_dashboard, Dashboard};
use crate::error::Result;
use crate::html::render_dashboard;
use crate::processing::preprocess;
use crate::render::SvgRenderer;
use crate::types::Dataset;
use crate::validation::ColumnSchema;

/// Settings shared by every run. Holds no data between runs.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    pub schema: ColumnSchema,
    pub renderer: SvgRenderer,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub file_hash: String,
    pub format: SheetFormat,
    pub dataset: Dataset,
    pub dashboard: Dashboard,
}

/// Load, validate, preprocess and fit one upload. Any failure aborts the run
/// before charts exist.
pub fn run_pipeline(context: &ExecutionContext, bytes: &[u8]) -> Result<PipelineOutput> {
    let sheet = load_sheet(bytes)?;
    context.schema.validate(&sheet)?;

    let dataset = preprocess(&sheet, &context.schema)?;
    let dashboard = build_dashboard(&dataset)?;

    info!(
        file_hash = %sheet.file_hash,
        format = %sheet.format,
        sheet = sheet.sheet_name.as_deref().unwrap_or("-"),
        rows = dataset.record_count(),
        lines = dataset.groups.len(),
        "pipeline run complete"
    );

    Ok(PipelineOutput {
        file_hash: sheet.file_hash,
        format: sheet.format,
        dataset,
        dashboard,
    })
}

/// Runs the pipeline and renders the resulting dashboard page.
pub fn render_upload(
    context: &ExecutionContext,
    bytes: &[u8],
    source_name: &str,
) -> Result<String> {
    let output = run_pipeline(context, bytes)?;
    let page = render_dashboard(&output.dashboard, &context.renderer, source_name)?;
    Ok(page)
}
