//! Self-contained HTML pages for the upload flow. Styles and the hover
//! readout script are inlined so a page works without further requests.

use crate::charts::Dashboard;
use crate::error::RenderError;
use crate::render::{escape_html, format_number, ChartRenderer};
use crate::validation::ColumnSchema;

const PAGE_TITLE: &str = "Production Line Performance Dashboard";

/// Renders every line section (PR chart first, then the three downtime
/// charts) plus the chart data as JSON for the hover readout.
pub fn render_dashboard(
    dashboard: &Dashboard,
    renderer: &dyn ChartRenderer,
    source_name: &str,
) -> Result<String, RenderError> {
    let row_count: usize = dashboard.lines.iter().map(|l| l.row_count).sum();
    let mut sections = String::new();

    for (line_idx, line) in dashboard.lines.iter().enumerate() {
        sections.push_str(&format!(
            r#"<section class="line"><h2>Line {} Charts</h2><p class="meta">{} observations</p>"#,
            escape_html(line.line.label()),
            line.row_count,
        ));

        for (chart_idx, chart) in line.charts.iter().enumerate() {
            let chart_id = format!("chart-{line_idx}-{chart_idx}");
            let svg = renderer.render(chart, &chart_id)?;
            let mut caption = format!(
                "Trendline slope {} per observation, intercept {}, R² {}",
                format_number(chart.trend.slope),
                format_number(chart.trend.intercept),
                format_number(chart.trend.r_squared),
            );
            if let Some(share) = chart.on_target_share() {
                caption.push_str(&format!("; on target {}%", format_number(share * 100.0)));
            }

            sections.push_str(&format!(
                r#"<figure class="chart-card" data-line="{line_idx}" data-chart="{chart_idx}"><h3>{heading}</h3>{svg}<figcaption>{caption}</figcaption><div class="readout" aria-live="polite"></div></figure>"#,
                heading = escape_html(&chart.kind.heading()),
                caption = escape_html(&caption),
            ));
        }

        sections.push_str("</section>");
    }

    let data = serde_json::to_string(dashboard)?.replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{PAGE_TITLE}</title>
    <style>{css}</style>
</head>
<body>
    <main class="container">
        <header>
            <h1>{PAGE_TITLE}</h1>
            <p class="meta">{source} &middot; {lines} production lines &middot; {rows} rows</p>
            <p><a href="/">Upload another file</a></p>
        </header>
        {sections}
    </main>
    <script type="application/json" id="chart-data">{data}</script>
    <script>{js}</script>
</body>
</html>"#,
        css = INLINE_CSS,
        js = INLINE_JS,
        source = escape_html(source_name),
        lines = dashboard.lines.len(),
        rows = row_count,
    ))
}

pub fn render_upload_page(max_upload_mb: u64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{PAGE_TITLE}</title>
    <style>{css}</style>
</head>
<body>
    <main class="container">
        <header><h1>{PAGE_TITLE}</h1></header>
        <form class="upload" method="post" action="/upload" enctype="multipart/form-data">
            <label for="file">Upload your Excel file</label>
            <input id="file" type="file" name="file" accept=".xlsx,.xlsm,.xlsb,.xls,.ods,.csv" required>
            <button type="submit">Render charts</button>
            <p class="meta">Up to {max_upload_mb} MB. Required columns: {columns}</p>
        </form>
    </main>
</body>
</html>"#,
        css = INLINE_CSS,
        columns = required_columns_list(),
    )
}

pub fn render_error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{PAGE_TITLE}</title>
    <style>{css}</style>
</head>
<body>
    <main class="container">
        <header><h1>{PAGE_TITLE}</h1></header>
        <div class="error" role="alert">{message}</div>
        <p class="meta">Expected columns: {columns}</p>
        <p><a href="/">Try another file</a></p>
    </main>
</body>
</html>"#,
        css = INLINE_CSS,
        message = escape_html(message),
        columns = required_columns_list(),
    )
}

fn required_columns_list() -> String {
    ColumnSchema::STANDARD
        .required()
        .iter()
        .map(|c| format!("<code>{}</code>", escape_html(c)))
        .collect::<Vec<_>>()
        .join(", ")
}

const INLINE_CSS: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0; background: #f6f7f9; color: #1d2330; }
.container { max-width: 1100px; margin: 0 auto; padding: 24px; }
h1 { font-size: 1.6rem; margin-bottom: 4px; }
h2 { border-bottom: 2px solid #d0d5dd; padding-bottom: 4px; margin-top: 40px; }
h3 { font-size: 1rem; margin: 0 0 8px; }
.meta { color: #5b6475; font-size: 0.9rem; }
.chart-card { background: #fff; border: 1px solid #e1e4ea; border-radius: 6px; margin: 16px 0; padding: 16px; }
.chart { width: 100%; height: auto; cursor: crosshair; }
figcaption { color: #5b6475; font-size: 0.85rem; margin-top: 6px; }
.readout { min-height: 1.2em; font-size: 0.85rem; font-family: monospace; }
.upload { background: #fff; border: 1px solid #e1e4ea; border-radius: 6px; padding: 24px; display: grid; gap: 12px; max-width: 560px; }
.error { background: #fdecea; border: 1px solid #f5c2bd; color: #8a1c12; border-radius: 6px; padding: 12px 16px; }
"#;

const INLINE_JS: &str = r#"
(function () {
    var node = document.getElementById('chart-data');
    if (!node) { return; }
    var data = JSON.parse(node.textContent);
    document.querySelectorAll('figure.chart-card').forEach(function (card) {
        var chart = data.lines[Number(card.dataset.line)].charts[Number(card.dataset.chart)];
        var svg = card.querySelector('svg.chart');
        var readout = card.querySelector('.readout');
        if (!svg || !readout) { return; }
        var left = Number(svg.dataset.plotLeft);
        var right = Number(svg.dataset.plotRight);
        var count = Number(svg.dataset.points);
        var width = (svg.viewBox && svg.viewBox.baseVal && svg.viewBox.baseVal.width) ||
            Number(svg.getAttribute('width'));
        svg.addEventListener('mousemove', function (event) {
            var box = svg.getBoundingClientRect();
            var x = (event.clientX - box.left) * width / box.width;
            var i = Math.floor((x - left) / (right - left) * count);
            if (i < 0 || i >= count) { readout.textContent = ''; return; }
            var text = chart.labels[i] + ': ' + chart.y_label + ' ' + chart.values[i] +
                ' (trend ' + chart.trend.fitted[i].toFixed(2) + ')';
            if (chart.targets) { text += ', target ' + chart.targets[i]; }
            readout.textContent = text;
        });
        svg.addEventListener('mouseleave', function () { readout.textContent = ''; });
    });
})();
"#;
