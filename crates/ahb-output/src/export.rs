//! Writes one comparison unit to disk in the requested formats.

use std::path::{Path, PathBuf};

use ahb_model::RowComparison;

use crate::csv::export_csv;
use crate::error::{OutputError, Result};
use crate::layout::TableLayout;
use crate::xlsx::export_xlsx;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    #[default]
    Both,
}

impl ExportFormat {
    pub fn writes_csv(self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Both)
    }

    pub fn writes_xlsx(self) -> bool {
        matches!(self, ExportFormat::Xlsx | ExportFormat::Both)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub format: ExportFormat,
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }
}

/// Writes `<dir>/<stem>.csv` and/or `<dir>/<stem>.xlsx`, creating `dir` first.
///
/// Returns the written paths in the order csv, xlsx.
pub fn write_outputs(
    dir: &Path,
    stem: &str,
    layout: &TableLayout,
    comparisons: &[RowComparison],
    options: &ExportOptions,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| OutputError::io(dir, e))?;
    let mut written = Vec::new();
    if options.format.writes_csv() {
        let path = dir.join(format!("{stem}.csv"));
        export_csv(&path, layout, comparisons)?;
        written.push(path);
    }
    if options.format.writes_xlsx() {
        let path = dir.join(format!("{stem}.xlsx"));
        export_xlsx(&path, layout, comparisons)?;
        written.push(path);
    }
    Ok(written)
}
