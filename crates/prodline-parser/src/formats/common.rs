use std::collections::HashSet;

use blake3::Hasher;
use polars::prelude::*;

use crate::errors::LoadError;

/// Collects header and data cells column-wise before handing them to polars.
pub(crate) struct TableBuilder {
    loader: &'static str,
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
}

impl TableBuilder {
    pub(crate) fn new(loader: &'static str, headers: Vec<String>) -> Result<Self, LoadError> {
        let headers = name_headers(headers);

        if headers.is_empty() {
            return Err(LoadError::InvalidHeader {
                loader,
                message: "header row has no columns".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(headers.len());
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(LoadError::InvalidHeader {
                    loader,
                    message: format!("duplicate column '{header}'"),
                });
            }
        }

        let columns = vec![Vec::new(); headers.len()];
        Ok(Self {
            loader,
            headers,
            columns,
        })
    }

    /// Appends one data row. Short rows are padded with empty cells, cells past
    /// the last header are dropped and rows with only blank cells are skipped.
    pub(crate) fn push_row<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.headers.len())
            .map(|cell| cell.trim().to_string())
            .collect();

        if row.iter().all(String::is_empty) {
            return;
        }

        row.resize(self.headers.len(), String::new());
        for (column, cell) in self.columns.iter_mut().zip(row) {
            column.push(cell);
        }
    }

    pub(crate) fn row_count(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    pub(crate) fn finish(self) -> Result<DataFrame, LoadError> {
        let loader = self.loader;
        if self.row_count() == 0 {
            return Err(LoadError::EmptyData { loader });
        }

        let columns: Vec<Column> = self
            .headers
            .iter()
            .zip(self.columns)
            .map(|(header, values)| Series::new(header.as_str().into(), values).into())
            .collect();

        DataFrame::new(columns).map_err(|err| LoadError::Table {
            loader,
            message: err.to_string(),
        })
    }
}

/// Trims header cells and names blank ones `Unnamed: {index}`. Trailing blank
/// headers are dropped entirely since workbook ranges often overshoot.
fn name_headers(headers: Vec<String>) -> Vec<String> {
    let mut trimmed: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
    while trimmed.last().is_some_and(String::is_empty) {
        trimmed.pop();
    }

    trimmed
        .into_iter()
        .enumerate()
        .map(|(idx, header)| {
            if header.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                header
            }
        })
        .collect()
}

pub(crate) fn content_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    hasher.finalize().to_hex().to_string()
}
