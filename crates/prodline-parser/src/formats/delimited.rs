use csv::{ReaderBuilder, Trim};

use crate::errors::LoadError;
use crate::formats::common::{content_hash, TableBuilder};
use crate::model::{RawSheet, SheetFormat};
use crate::registry::SheetLoader;

const LOADER: &str = "csv";
const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Reads UTF-8 delimited text with a header row. The delimiter is whichever of
/// comma, semicolon or tab occurs most often in the header line.
pub struct CsvLoader;

impl SheetLoader for CsvLoader {
    fn name(&self) -> &'static str {
        LOADER
    }

    fn load(&self, bytes: &[u8]) -> Result<RawSheet, LoadError> {
        let text = std::str::from_utf8(bytes).map_err(|err| LoadError::FormatMismatch {
            loader: LOADER,
            reason: format!("contents were not valid UTF-8: {err}"),
        })?;
        let text = text.trim_start_matches('\u{feff}');

        if text.trim().is_empty() {
            return Err(LoadError::FormatMismatch {
                loader: LOADER,
                reason: "file contains only whitespace".to_string(),
            });
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(sniff_delimiter(text))
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| LoadError::Csv {
                loader: LOADER,
                source,
            })?
            .iter()
            .map(str::to_string)
            .collect();

        let mut builder = TableBuilder::new(LOADER, headers)?;
        for record in reader.records() {
            let record = record.map_err(|source| LoadError::Csv {
                loader: LOADER,
                source,
            })?;
            builder.push_row(record.iter().map(str::to_string));
        }

        Ok(RawSheet {
            format: SheetFormat::Csv,
            sheet_name: None,
            file_hash: content_hash(bytes),
            df: builder.finish()?,
        })
    }
}

pub(crate) fn sniff_delimiter(text: &str) -> u8 {
    let header_line = text.lines().next().unwrap_or_default();
    let mut best = b',';
    let mut best_count = 0;
    for delimiter in CANDIDATE_DELIMITERS {
        let count = header_line.bytes().filter(|b| *b == delimiter).count();
        if count > best_count {
            best = delimiter;
            best_count = count;
        }
    }
    best
}
