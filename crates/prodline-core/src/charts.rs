use serde::Serialize;

use crate::classify::{classify, PerformanceClass};
use crate::error::TrendError;
use crate::trend::{fit_trend, TrendLine};
use crate::types::{Dataset, LineGroup, LineId, Metric};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartKind {
    Pr,
    PlannedDowntime,
    MicroStops,
    UnplannedDowntime,
}

impl ChartKind {
    /// Presentation order within a line section.
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Pr,
        ChartKind::PlannedDowntime,
        ChartKind::MicroStops,
        ChartKind::UnplannedDowntime,
    ];

    pub fn metric(&self) -> Metric {
        match self {
            ChartKind::Pr => Metric::Pr,
            ChartKind::PlannedDowntime => Metric::PlannedDowntime,
            ChartKind::MicroStops => Metric::MicroStops,
            ChartKind::UnplannedDowntime => Metric::UnplannedDowntime,
        }
    }

    pub fn heading(&self) -> String {
        match self {
            ChartKind::Pr => "PR vs Target PR".to_string(),
            other => other.metric().display_name().to_string(),
        }
    }

    pub fn title(&self, line: &LineId) -> String {
        match self {
            ChartKind::Pr => format!("PR vs Target PR for {line}"),
            other => format!("{} Over Time for {line}", other.metric()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BarColor {
    OnTarget,
    BelowTarget,
    Neutral,
}

impl From<PerformanceClass> for BarColor {
    fn from(class: PerformanceClass) -> Self {
        match class {
            PerformanceClass::OnTarget => BarColor::OnTarget,
            PerformanceClass::BelowTarget => BarColor::BelowTarget,
        }
    }
}

/// Everything a renderer needs to draw one bar chart with its trendline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub targets: Option<Vec<f64>>,
    pub colors: Vec<BarColor>,
    pub trend: TrendLine,
}

impl ChartSpec {
    pub fn for_group(group: &LineGroup, kind: ChartKind) -> Result<Self, TrendError> {
        let values = group.series(kind.metric());
        let trend = fit_trend(&values)?;

        let (targets, colors) = match kind {
            ChartKind::Pr => {
                let targets = group.series(Metric::TargetPr);
                let colors = values
                    .iter()
                    .zip(&targets)
                    .map(|(pr, target)| BarColor::from(classify(*pr, *target)))
                    .collect();
                (Some(targets), colors)
            }
            _ => (None, vec![BarColor::Neutral; values.len()]),
        };

        Ok(Self {
            kind,
            title: kind.title(&group.line),
            x_label: "Date".to_string(),
            y_label: kind.metric().display_name().to_string(),
            labels: group.date_labels(),
            values,
            targets,
            colors,
            trend,
        })
    }

    pub fn on_target_share(&self) -> Option<f64> {
        if self.kind != ChartKind::Pr || self.colors.is_empty() {
            return None;
        }
        let hits = self
            .colors
            .iter()
            .filter(|c| **c == BarColor::OnTarget)
            .count();
        Some(hits as f64 / self.colors.len() as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineCharts {
    pub line: LineId,
    pub row_count: usize,
    pub charts: Vec<ChartSpec>,
}

impl LineCharts {
    pub fn chart(&self, kind: ChartKind) -> Option<&ChartSpec> {
        self.charts.iter().find(|c| c.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub lines: Vec<LineCharts>,
}

pub fn build_line_charts(group: &LineGroup) -> Result<LineCharts, TrendError> {
    let charts = ChartKind::ALL
        .iter()
        .map(|kind| ChartSpec::for_group(group, *kind))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LineCharts {
        line: group.line.clone(),
        row_count: group.records.len(),
        charts,
    })
}

pub fn build_dashboard(dataset: &Dataset) -> Result<Dashboard, TrendError> {
    let lines = dataset
        .groups
        .iter()
        .map(build_line_charts)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Dashboard { lines })
}
