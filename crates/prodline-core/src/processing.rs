use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use prodline_parser::RawSheet;

use crate::error::{ParseError, Result};
use crate::types::{Dataset, LineId, Record};
use crate::validation::ColumnSchema;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

// Slash dates are read month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
];

/// Types every row of a validated sheet and returns the grouped dataset.
pub fn preprocess(sheet: &RawSheet, schema: &ColumnSchema) -> Result<Dataset> {
    let records = parse_records(&sheet.df, schema)?;
    Ok(Dataset::from_records(records))
}

/// Converts the string table into records in upload order. The first bad
/// cell aborts the whole run.
pub fn parse_records(df: &DataFrame, schema: &ColumnSchema) -> Result<Vec<Record>> {
    let dates = df.column(schema.date)?.str()?;
    let lines = df.column(schema.production_line)?.str()?;
    let planned = df.column(schema.planned_downtime)?.str()?;
    let micro = df.column(schema.micro_stops)?.str()?;
    let unplanned = df.column(schema.unplanned_downtime)?.str()?;
    let pr = df.column(schema.pr)?.str()?;
    let target = df.column(schema.target_pr)?.str()?;

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let row = idx + 1;

        let raw_date = required_cell(dates, idx, row, schema.date)?;
        let date = parse_date(raw_date).ok_or_else(|| ParseError::InvalidDate {
            row,
            column: schema.date,
            value: raw_date.to_string(),
        })?;

        let production_line = LineId::parse(lines.get(idx).unwrap_or_default()).ok_or(
            ParseError::MissingValue {
                row,
                column: schema.production_line,
            },
        )?;

        records.push(Record {
            row,
            date,
            production_line,
            planned_downtime: numeric_cell(planned, idx, row, schema.planned_downtime)?,
            micro_stops: numeric_cell(micro, idx, row, schema.micro_stops)?,
            unplanned_downtime: numeric_cell(unplanned, idx, row, schema.unplanned_downtime)?,
            pr: numeric_cell(pr, idx, row, schema.pr)?,
            target_pr: numeric_cell(target, idx, row, schema.target_pr)?,
        });
    }

    Ok(records)
}

fn required_cell<'a>(
    column: &'a StringChunked,
    idx: usize,
    row: usize,
    name: &'static str,
) -> std::result::Result<&'a str, ParseError> {
    match column.get(idx).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ParseError::MissingValue { row, column: name }),
    }
}

fn numeric_cell(
    column: &StringChunked,
    idx: usize,
    row: usize,
    name: &'static str,
) -> std::result::Result<f64, ParseError> {
    let raw = required_cell(column, idx, row, name)?;
    parse_number(raw).ok_or_else(|| ParseError::InvalidNumber {
        row,
        column: name,
        value: raw.to_string(),
    })
}

/// Finite numbers only; `NaN` and `inf` are rejected like any other text.
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

/// Accepts the common spreadsheet date spellings. Date-only values resolve to
/// midnight.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    parse_compact_date(trimmed)
}

// `YYYYMMDD`, which chrono cannot split unambiguously on its own.
fn parse_compact_date(value: &str) -> Option<NaiveDateTime> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = value[0..4].parse().ok()?;
    let month = value[4..6].parse().ok()?;
    let day = value[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}
