use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};

use crate::errors::LoadError;
use crate::formats::common::{content_hash, TableBuilder};
use crate::model::{RawSheet, SheetFormat};
use crate::registry::SheetLoader;

const LOADER: &str = "workbook";
const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";
const OLE2_SIGNATURE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const WORKBOOK_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reads xlsx, xlsm, xlsb, xls and ods uploads. Only the first sheet is used.
pub struct WorkbookLoader;

impl SheetLoader for WorkbookLoader {
    fn name(&self) -> &'static str {
        LOADER
    }

    fn load(&self, bytes: &[u8]) -> Result<RawSheet, LoadError> {
        if !bytes.starts_with(ZIP_SIGNATURE) && !bytes.starts_with(OLE2_SIGNATURE) {
            return Err(LoadError::FormatMismatch {
                loader: LOADER,
                reason: "missing ZIP or OLE2 signature".to_string(),
            });
        }

        let mut workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|err| LoadError::Workbook {
                loader: LOADER,
                message: err.to_string(),
            })?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| LoadError::Workbook {
                loader: LOADER,
                message: "workbook has no sheets".to_string(),
            })?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|err| LoadError::Workbook {
                loader: LOADER,
                message: format!("sheet '{sheet_name}': {err}"),
            })?;

        let mut rows = range.rows();
        let header_row = rows.next().ok_or_else(|| LoadError::InvalidHeader {
            loader: LOADER,
            message: format!("sheet '{sheet_name}' has no header row"),
        })?;

        let headers = header_row.iter().map(cell_text).collect();
        let mut builder = TableBuilder::new(LOADER, headers)?;
        for row in rows {
            builder.push_row(row.iter().map(cell_text));
        }

        Ok(RawSheet {
            format: SheetFormat::Workbook,
            sheet_name: Some(sheet_name),
            file_hash: content_hash(bytes),
            df: builder.finish()?,
        })
    }
}

/// Renders a cell the way a user would type it. Date cells become
/// `YYYY-MM-DD HH:MM:SS` and integral floats lose their fraction.
pub(crate) fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(datetime) => datetime.format(WORKBOOK_DATETIME_FORMAT).to_string(),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}
