// crates/prodline-core/src/error.rs

use prodline_parser::LoadError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing one or more expected columns {missing:?}; required columns are {required:?}")]
pub struct ValidationError {
    pub required: Vec<&'static str>,
    pub missing: Vec<&'static str>,
}

/// Row numbers count data rows from 1, in upload order, after blank rows are skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("row {row}: column '{column}' is empty")]
    MissingValue { row: usize, column: &'static str },

    #[error("row {row}: column '{column}' has unparseable date '{value}'")]
    InvalidDate {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrendError {
    #[error("cannot fit a trendline to an empty series")]
    EmptySeries,

    #[error("series value at index {index} is not finite ({value})")]
    NonFiniteValue { index: usize, value: f64 },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("chart '{title}' has no data points")]
    EmptySeries { title: String },

    #[error("chart '{title}' has {found} {field} for {expected} data points")]
    LengthMismatch {
        title: String,
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("chart '{title}' could not be drawn: {message}")]
    Draw { title: String, message: String },

    #[error("failed to embed chart data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Could not read upload: {0}")]
    Load(#[from] LoadError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Could not parse data: {0}")]
    Parse(#[from] ParseError),

    #[error("Trend fitting failed: {0}")]
    Trend(#[from] TrendError),

    #[error("Chart rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Coarse classification used by callers that need to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Load,
    Validation,
    Parse,
    Internal,
}

impl DashboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DashboardError::Load(_) => ErrorKind::Load,
            DashboardError::Validation(_) => ErrorKind::Validation,
            DashboardError::Parse(_) => ErrorKind::Parse,
            DashboardError::Trend(_) | DashboardError::Render(_) | DashboardError::Polars(_) => {
                ErrorKind::Internal
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
