use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Identifier of a production line. Cells that read as a finite number are
/// compared by value so `1` and `1.0` land in the same group.
#[derive(Debug, Clone)]
pub enum LineId {
    Numeric { value: f64, label: String },
    Text(String),
}

impl LineId {
    /// Returns `None` for blank cells.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<f64>() {
            // `+ 0.0` folds `-0` into `0` so both land in one group.
            Ok(value) if value.is_finite() => Some(LineId::Numeric {
                value: value + 0.0,
                label: trimmed.to_string(),
            }),
            _ => Some(LineId::Text(trimmed.to_string())),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            LineId::Numeric { label, .. } => label,
            LineId::Text(label) => label,
        }
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Numbers sort before text when a sheet mixes both.
impl Ord for LineId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LineId::Numeric { value: a, .. }, LineId::Numeric { value: b, .. }) => a.total_cmp(b),
            (LineId::Numeric { .. }, LineId::Text(_)) => Ordering::Less,
            (LineId::Text(_), LineId::Numeric { .. }) => Ordering::Greater,
            (LineId::Text(a), LineId::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for LineId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LineId {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LineId {}

impl Serialize for LineId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub row: usize,
    pub date: NaiveDateTime,
    pub production_line: LineId,
    pub planned_downtime: f64,
    pub micro_stops: f64,
    pub unplanned_downtime: f64,
    pub pr: f64,
    pub target_pr: f64,
}

impl Record {
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Pr => self.pr,
            Metric::TargetPr => self.target_pr,
            Metric::PlannedDowntime => self.planned_downtime,
            Metric::MicroStops => self.micro_stops,
            Metric::UnplannedDowntime => self.unplanned_downtime,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    Pr,
    TargetPr,
    PlannedDowntime,
    MicroStops,
    UnplannedDowntime,
}

impl Metric {
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::Pr => "PR",
            Metric::TargetPr => "Target PR",
            Metric::PlannedDowntime => "Planned Downtime",
            Metric::MicroStops => "Micro stops",
            Metric::UnplannedDowntime => "Unplanned Downtime",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGroup {
    pub line: LineId,
    pub records: Vec<Record>,
}

impl LineGroup {
    pub fn series(&self, metric: Metric) -> Vec<f64> {
        self.records.iter().map(|r| r.value(metric)).collect()
    }

    pub fn date_labels(&self) -> Vec<String> {
        self.records.iter().map(Record::date_label).collect()
    }
}

/// Records partitioned by production line. Groups ascend by [`LineId`] and
/// each group's records ascend by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub groups: Vec<LineGroup>,
}

impl Dataset {
    /// Stable-sorts by date, so rows sharing a date keep upload order, then
    /// partitions by line.
    pub fn from_records(mut records: Vec<Record>) -> Self {
        records.sort_by_key(|record| record.date);

        let mut by_line: BTreeMap<LineId, Vec<Record>> = BTreeMap::new();
        for record in records {
            by_line
                .entry(record.production_line.clone())
                .or_default()
                .push(record);
        }

        let groups = by_line
            .into_iter()
            .map(|(line, records)| LineGroup { line, records })
            .collect();

        Self { groups }
    }

    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }

    pub fn group(&self, line: &str) -> Option<&LineGroup> {
        self.groups.iter().find(|g| g.line.label() == line)
    }
}
