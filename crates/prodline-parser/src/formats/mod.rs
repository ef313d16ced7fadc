mod common;
mod delimited;
mod workbook;

pub use delimited::CsvLoader;
pub use workbook::WorkbookLoader;

#[cfg(test)]
pub(crate) use delimited::sniff_delimiter;
#[cfg(test)]
pub(crate) use workbook::cell_text;
