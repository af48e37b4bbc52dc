//! Renders alignment results as CSV and XLSX tables and caches them in SQLite.

#![deny(unsafe_code)]

pub mod csv;
pub mod error;
pub mod export;
pub mod layout;
pub mod store;
pub mod xlsx;

pub use crate::csv::{export_csv, write_csv};
pub use error::{OutputError, Result};
pub use export::{ExportFormat, ExportOptions, write_outputs};
pub use layout::{CHANGE_HEADER, TableLayout};
pub use store::{ComparisonKey, ComparisonStore, StoredLine};
pub use xlsx::export_xlsx;
