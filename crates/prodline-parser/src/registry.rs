use tracing::debug;

use crate::errors::{LoadError, ParserAttempt};
use crate::formats::{CsvLoader, WorkbookLoader};
use crate::model::RawSheet;

pub trait SheetLoader {
    fn name(&self) -> &'static str;
    fn load(&self, bytes: &[u8]) -> Result<RawSheet, LoadError>;
}

/// Reads the first sheet of an uploaded spreadsheet, trying the workbook
/// reader before falling back to delimited text.
pub fn load_sheet(bytes: &[u8]) -> Result<RawSheet, LoadError> {
    let workbook = WorkbookLoader;
    let csv = CsvLoader;
    let loaders: [&dyn SheetLoader; 2] = [&workbook, &csv];
    load_with_loaders(bytes, &loaders)
}

pub fn load_with_loaders(
    bytes: &[u8],
    loaders: &[&dyn SheetLoader],
) -> Result<RawSheet, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::EmptyInput);
    }

    let mut attempts = Vec::new();

    for loader in loaders {
        match loader.load(bytes) {
            Ok(sheet) => return Ok(sheet),
            Err(LoadError::FormatMismatch { reason, .. }) => {
                debug!(loader = loader.name(), %reason, "loader skipped upload");
                attempts.push(ParserAttempt::new(loader.name(), reason));
            }
            Err(err) => return Err(err),
        }
    }

    Err(LoadError::NoMatchingLoader { attempts })
}
