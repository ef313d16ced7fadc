pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use errors::{LoadError, ParserAttempt};
pub use formats::{CsvLoader, WorkbookLoader};
pub use model::{RawSheet, SheetFormat};
pub use registry::{load_sheet, load_with_loaders, SheetLoader};
