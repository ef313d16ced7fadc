use std::fmt;

use polars::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetFormat {
    Workbook,
    Csv,
}

impl SheetFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetFormat::Workbook => "workbook",
            SheetFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single sheet as read from the upload: every column is `String` typed and
/// named after its header cell. Typing happens downstream.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub format: SheetFormat,
    pub sheet_name: Option<String>,
    pub file_hash: String,
    pub df: DataFrame,
}

impl RawSheet {
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|name| name.as_str().to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df
            .get_column_names()
            .iter()
            .any(|column| column.as_str() == name)
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }
}
