use plotters::coord::Shift;
use plotters::prelude::*;

use crate::charts::{BarColor, ChartSpec};
use crate::error::RenderError;

const MARGIN: u32 = 16;
const CAPTION_FONT_SIZE: i32 = 22;
const TICK_FONT_SIZE: i32 = 12;
const X_LABEL_AREA: u32 = 110;
const Y_LABEL_AREA: u32 = 72;
const BAR_HALF_WIDTH: f64 = 0.4;
const MAX_X_LABELS: usize = 30;
const TREND_DASH: i32 = 8;
const TREND_GAP: i32 = 5;
const TREND_LABEL: &str = "Trendline";

pub trait ChartRenderer {
    /// Returns markup for one chart; `chart_id` must be unique within a page.
    fn render(&self, chart: &ChartSpec, chart_id: &str) -> Result<String, RenderError>;
}

/// Draws bar charts as inline SVG through plotters: one bar per observation,
/// a dashed black trendline through the bar centres and a legend.
#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
        }
    }
}

impl SvgRenderer {
    /// Horizontal extent of the plotting area in SVG units. Bars split it
    /// into equal slots, which the page script uses to find the hovered bar.
    pub fn plot_span(&self) -> (u32, u32) {
        (MARGIN + Y_LABEL_AREA, self.width.saturating_sub(MARGIN))
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        let n = spec.values.len();
        let (y_min, y_max) = y_bounds(spec);
        let mut chart = ChartBuilder::on(root)
            .caption(spec.title.as_str(), ("sans-serif", CAPTION_FONT_SIZE))
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)?;

        let labels = &spec.labels;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n.min(MAX_X_LABELS))
            .x_label_formatter(&|x| slot_label(labels, *x))
            .y_label_formatter(&|y| format_number(*y))
            .x_label_style(
                ("sans-serif", TICK_FONT_SIZE)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .draw()?;

        chart.draw_series(spec.values.iter().zip(&spec.colors).enumerate().map(
            |(i, (value, color))| {
                let x = i as f64;
                Rectangle::new(
                    [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, *value)],
                    bar_fill(*color).filled(),
                )
            },
        ))?;

        chart
            .draw_series(DashedLineSeries::new(
                trend_points(spec),
                TREND_DASH,
                TREND_GAP,
                BLACK.stroke_width(2),
            ))?
            .label(TREND_LABEL)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], BLACK.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        Ok(())
    }
}

impl ChartRenderer for SvgRenderer {
    fn render(&self, spec: &ChartSpec, chart_id: &str) -> Result<String, RenderError> {
        check_lengths(spec)?;

        let mut svg = String::new();
        {
            let root =
                SVGBackend::with_string(&mut svg, (self.width, self.height)).into_drawing_area();
            self.draw(&root, spec).map_err(|err| draw_error(spec, err))?;
            root.present().map_err(|err| draw_error(spec, err))?;
        }

        let (plot_left, plot_right) = self.plot_span();
        let root_attrs = format!(
            r#"<svg class="chart" id="{id}" role="img" aria-label="{title}" data-plot-left="{plot_left}" data-plot-right="{plot_right}" data-points="{n}" "#,
            id = escape_html(chart_id),
            title = escape_html(&spec.title),
            n = spec.values.len(),
        );
        Ok(svg.replacen("<svg ", &root_attrs, 1))
    }
}

fn bar_fill(color: BarColor) -> RGBColor {
    match color {
        BarColor::OnTarget => RGBColor(0, 128, 0),
        BarColor::BelowTarget => RGBColor(255, 0, 0),
        BarColor::Neutral => RGBColor(70, 130, 180),
    }
}

// Ticks land on bar centres; anything between two bars stays unlabelled.
fn slot_label(labels: &[String], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels.get(nearest as usize).cloned().unwrap_or_default()
}

/// A single observation gets a flat line across its whole slot.
fn trend_points(spec: &ChartSpec) -> Vec<(f64, f64)> {
    match spec.trend.fitted.as_slice() {
        [only] => vec![(-0.5, *only), (0.5, *only)],
        fitted => fitted
            .iter()
            .enumerate()
            .map(|(i, y)| (i as f64, *y))
            .collect(),
    }
}

fn draw_error<E>(spec: &ChartSpec, err: DrawingAreaErrorKind<E>) -> RenderError
where
    E: std::error::Error + Send + Sync,
{
    RenderError::Draw {
        title: spec.title.clone(),
        message: err.to_string(),
    }
}

fn check_lengths(chart: &ChartSpec) -> Result<(), RenderError> {
    let expected = chart.values.len();
    if expected == 0 {
        return Err(RenderError::EmptySeries {
            title: chart.title.clone(),
        });
    }

    let mut fields = vec![
        ("labels", chart.labels.len()),
        ("colors", chart.colors.len()),
        ("trend values", chart.trend.fitted.len()),
    ];
    if let Some(targets) = &chart.targets {
        fields.push(("targets", targets.len()));
    }

    for (field, found) in fields {
        if found != expected {
            return Err(RenderError::LengthMismatch {
                title: chart.title.clone(),
                field,
                expected,
                found,
            });
        }
    }
    Ok(())
}

/// The value axis always includes zero so bars start from a common baseline.
fn y_bounds(chart: &ChartSpec) -> (f64, f64) {
    let observed = chart.values.iter().chain(&chart.trend.fitted).copied();
    let (mut lo, mut hi) = observed.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let span = hi - lo;
    if span == 0.0 {
        return (lo, lo + 1.0);
    }
    if hi > 0.0 {
        hi += span * 0.05;
    }
    if lo < 0.0 {
        lo -= span * 0.05;
    }
    (lo, hi)
}

/// Integral values print without a fraction, everything else with at most two
/// decimals.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e12 {
        return format!("{value:.0}");
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartKind;
    use crate::trend::fit_trend;

    fn chart(values: Vec<f64>) -> ChartSpec {
        let n = values.len();
        ChartSpec {
            kind: ChartKind::MicroStops,
            title: "Micro stops Over Time for <L1>".to_string(),
            x_label: "Date".to_string(),
            y_label: "Micro stops".to_string(),
            labels: (1..=n).map(|d| format!("2024-01-{d:02}")).collect(),
            trend: fit_trend(&values).unwrap_or_else(|_| crate::trend::TrendLine {
                slope: 0.0,
                intercept: 0.0,
                r_squared: 1.0,
                fitted: Vec::new(),
            }),
            values,
            targets: None,
            colors: vec![BarColor::Neutral; n],
        }
    }

    #[test]
    fn draws_one_bar_per_value_and_a_dashed_trend() {
        let svg = SvgRenderer::default()
            .render(&chart(vec![3.0, 5.0, 4.0]), "chart-0-2")
            .unwrap();

        assert!(svg.starts_with(r#"<svg class="chart" id="chart-0-2""#));
        assert_eq!(svg.matches("<svg").count(), 1);
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"data-points="3""#));
        assert!(svg.contains(r#"data-plot-left="88""#));
        assert!(svg.contains(r#"data-plot-right="984""#));
        assert!(svg.contains("Trendline"));
        assert!(svg.contains("2024-01-02"));
        assert!(svg.contains(r#"aria-label="Micro stops Over Time for &lt;L1&gt;""#));
    }

    #[test]
    fn single_point_trend_spans_the_slot() {
        let spec = chart(vec![7.5]);
        assert_eq!(trend_points(&spec), vec![(-0.5, 7.5), (0.5, 7.5)]);

        let svg = SvgRenderer::default().render(&spec, "chart-single").unwrap();
        assert!(svg.contains(r#"data-points="1""#));
    }

    #[test]
    fn labels_only_on_bar_centres() {
        let labels = vec!["2024-01-01".to_string(), "2024-01-02".to_string()];
        assert_eq!(slot_label(&labels, 1.0), "2024-01-02");
        assert_eq!(slot_label(&labels, 0.5), "");
        assert_eq!(slot_label(&labels, -0.5), "");
        assert_eq!(slot_label(&labels, 2.0), "");
    }

    #[test]
    fn empty_series_is_a_render_error() {
        let err = SvgRenderer::default()
            .render(&chart(Vec::new()), "chart-empty")
            .unwrap_err();
        assert!(matches!(err, RenderError::EmptySeries { .. }));
    }

    #[test]
    fn mismatched_colors_are_rejected() {
        let mut spec = chart(vec![1.0, 2.0]);
        spec.colors.pop();
        let err = SvgRenderer::default().render(&spec, "chart-bad").unwrap_err();
        match err {
            RenderError::LengthMismatch {
                field,
                expected,
                found,
                ..
            } => {
                assert_eq!(field, "colors");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bounds_include_zero_and_handle_flat_series() {
        assert_eq!(y_bounds(&chart(vec![0.0, 0.0])), (0.0, 1.0));

        let (lo, hi) = y_bounds(&chart(vec![10.0, 20.0]));
        assert_eq!(lo, 0.0);
        assert!(hi > 20.0);

        let (lo, hi) = y_bounds(&chart(vec![-4.0, 6.0]));
        assert!(lo < -4.0);
        assert!(hi > 6.0);
    }

    #[test]
    fn formats_numbers_compactly() {
        assert_eq!(format_number(85.0), "85");
        assert_eq!(format_number(81.5), "81.5");
        assert_eq!(format_number(1.0 / 3.0), "0.33");
        assert_eq!(format_number(-0.001), "0");
        assert_eq!(format_number(-2.25), "-2.25");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }
}
