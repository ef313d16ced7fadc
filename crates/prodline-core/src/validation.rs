use prodline_parser::RawSheet;

use crate::error::ValidationError;

/// Column names the dashboard reads. Checked once against the upload header
/// before any row is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    pub date: &'static str,
    pub production_line: &'static str,
    pub planned_downtime: &'static str,
    pub micro_stops: &'static str,
    pub unplanned_downtime: &'static str,
    pub pr: &'static str,
    pub target_pr: &'static str,
}

impl ColumnSchema {
    pub const STANDARD: ColumnSchema = ColumnSchema {
        date: "Date",
        production_line: "Production Line",
        planned_downtime: "Planned Downtime",
        micro_stops: "Micro stops",
        unplanned_downtime: "Unplanned Downtime",
        pr: "PR",
        target_pr: "Target PR",
    };

    pub fn required(&self) -> [&'static str; 7] {
        [
            self.date,
            self.production_line,
            self.planned_downtime,
            self.micro_stops,
            self.unplanned_downtime,
            self.pr,
            self.target_pr,
        ]
    }

    pub fn validate(&self, sheet: &RawSheet) -> Result<(), ValidationError> {
        let missing: Vec<&'static str> = self
            .required()
            .into_iter()
            .filter(|column| !sheet.has_column(column))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                required: self.required().to_vec(),
                missing,
            })
        }
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::STANDARD
    }
}
