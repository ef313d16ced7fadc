use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use prodline_core::charts::LineCharts;
use prodline_core::render::format_number;
use prodline_core::types::LineGroup;
use prodline_core::{run_pipeline, ExecutionContext};
use tracing::info;

/// Runs the same pipeline as an upload and prints one summary table per
/// production line.
pub fn run(path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let context = ExecutionContext::default();
    let output = run_pipeline(&context, &bytes)
        .with_context(|| format!("failed to process {}", path.display()))?;

    info!(
        path = %path.display(),
        file_hash = %output.file_hash,
        format = %output.format,
        "inspected file"
    );

    println!(
        "{} ({}): {} rows across {} production lines",
        path.display(),
        output.format,
        output.dataset.record_count(),
        output.dataset.groups.len()
    );

    for (group, line) in output.dataset.groups.iter().zip(&output.dashboard.lines) {
        println!();
        println!("{}", line_heading(group));
        println!("{}", summary_table(line));
    }

    Ok(())
}

fn line_heading(group: &LineGroup) -> String {
    let first = group.records.first().map(|r| r.date_label());
    let last = group.records.last().map(|r| r.date_label());
    match (first, last) {
        (Some(first), Some(last)) => format!(
            "Line {}: {} rows, {} to {}",
            group.line,
            group.records.len(),
            first,
            last
        ),
        _ => format!("Line {}: no rows", group.line),
    }
}

pub fn summary_table(line: &LineCharts) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Series", "Slope", "Intercept", "R²", "On target"]);

    for chart in &line.charts {
        let on_target = chart
            .on_target_share()
            .map(|share| format!("{}%", format_number(share * 100.0)))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            chart.y_label.clone(),
            format_number(chart.trend.slope),
            format_number(chart.trend.intercept),
            format_number(chart.trend.r_squared),
            on_target,
        ]);
    }

    table
}
