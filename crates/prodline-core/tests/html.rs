use prodline_core::charts::{build_dashboard, Dashboard};
use prodline_core::html::{render_dashboard, render_error_page, render_upload_page};
use prodline_core::render::SvgRenderer;
use prodline_core::types::{Dataset, LineId, Record};

fn record(day: u32, line: &str, pr: f64) -> Record {
    Record {
        row: day as usize,
        date: chrono::NaiveDate::from_ymd_opt(2024, 5, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date"),
        production_line: LineId::parse(line).expect("line id"),
        planned_downtime: 10.0,
        micro_stops: 2.0,
        unplanned_downtime: 0.0,
        pr,
        target_pr: 85.0,
    }
}

fn dashboard(records: Vec<Record>) -> Dashboard {
    build_dashboard(&Dataset::from_records(records)).expect("dashboard")
}

#[test]
fn sections_follow_line_order_and_chart_order() {
    let board = dashboard(vec![record(2, "B", 90.0), record(1, "A", 80.0)]);
    let page = render_dashboard(&board, &SvgRenderer::default(), "may.xlsx").unwrap();

    let a = page.find("Line A Charts").unwrap();
    let b = page.find("Line B Charts").unwrap();
    assert!(a < b);

    let section_a = &page[a..b];
    let order: Vec<usize> = [
        "<h3>PR vs Target PR</h3>",
        "<h3>Planned Downtime</h3>",
        "<h3>Micro stops</h3>",
        "<h3>Unplanned Downtime</h3>",
    ]
    .iter()
    .map(|heading| section_a.find(heading).expect("heading present"))
    .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
    assert!(section_a.contains("on target 0%"));
}

#[test]
fn user_text_is_escaped_in_markup_and_json() {
    let board = dashboard(vec![record(1, "<script>alert(1)</script>", 90.0)]);
    let page = render_dashboard(&board, &SvgRenderer::default(), "<b>.csv").unwrap();

    assert!(page.contains("Line &lt;script&gt;alert(1)&lt;/script&gt; Charts"));
    assert!(page.contains("&lt;b&gt;.csv"));
    assert!(!page.contains("<script>alert(1)</script>"));
    assert!(page.contains(r#"<\/script>"#));
}

#[test]
fn upload_page_posts_multipart_file() {
    let page = render_upload_page(20);
    assert!(page.contains(r#"action="/upload""#));
    assert!(page.contains(r#"enctype="multipart/form-data""#));
    assert!(page.contains(r#"name="file""#));
    assert!(page.contains("Up to 20 MB"));
    assert!(page.contains("<code>Target PR</code>"));
}

#[test]
fn error_page_shows_the_message() {
    let page = render_error_page("Validation failed: missing <Date>");
    assert!(page.contains(r#"role="alert""#));
    assert!(page.contains("Validation failed: missing &lt;Date&gt;"));
    assert!(page.contains("<code>Production Line</code>"));
}
