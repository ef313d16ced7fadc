use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct ParserAttempt {
    pub loader: &'static str,
    pub message: String,
}

impl ParserAttempt {
    pub fn new(loader: &'static str, message: impl Into<String>) -> Self {
        Self {
            loader,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParserAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.loader, self.message)
    }
}

/// Failures while turning an uploaded byte stream into a raw table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("uploaded file is empty")]
    EmptyInput,

    #[error("{loader} format mismatch: {reason}")]
    FormatMismatch {
        loader: &'static str,
        reason: String,
    },

    #[error("{loader} header row invalid: {message}")]
    InvalidHeader {
        loader: &'static str,
        message: String,
    },

    #[error("{loader} CSV error: {source}")]
    Csv {
        loader: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{loader} could not read workbook: {message}")]
    Workbook {
        loader: &'static str,
        message: String,
    },

    #[error("{loader} failed to build table: {message}")]
    Table {
        loader: &'static str,
        message: String,
    },

    #[error("{loader} file did not contain any data rows")]
    EmptyData { loader: &'static str },

    #[error("file is not a readable spreadsheet; attempts: {}", format_attempts(.attempts))]
    NoMatchingLoader { attempts: Vec<ParserAttempt> },
}

fn format_attempts(attempts: &[ParserAttempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
