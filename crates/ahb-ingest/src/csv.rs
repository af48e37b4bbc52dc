//! Loading AHB tables from CSV into [`AhbRow`] values.

use std::path::Path;

use ::csv::{ReaderBuilder, StringRecord};
use ahb_model::{AhbField, AhbRow, field::SECTION_NAME_HEADER};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Where each source column ends up on a row.
#[derive(Debug, Default)]
struct ColumnLayout {
    section_name: usize,
    known: Vec<(AhbField, usize)>,
    qualifier: Option<usize>,
    extra: Vec<(String, usize)>,
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

impl ColumnLayout {
    fn from_headers(path: &Path, headers: &StringRecord) -> Result<Self> {
        let mut section_name = None;
        let mut layout = ColumnLayout::default();
        for (idx, raw) in headers.iter().enumerate() {
            let header = normalize_header(raw);
            if header.is_empty() {
                continue;
            }
            if header == SECTION_NAME_HEADER {
                section_name.get_or_insert(idx);
                continue;
            }
            match AhbField::from_header(&header) {
                // `Qualifier` only fills the value pool entry when `Code` is blank.
                Some(AhbField::ValuePoolEntry) if header == "Qualifier" => {
                    layout.qualifier.get_or_insert(idx);
                }
                Some(field) => {
                    if !layout.known.iter().any(|(known, _)| *known == field) {
                        layout.known.push((field, idx));
                    }
                }
                None => layout.extra.push((header, idx)),
            }
        }
        layout.section_name = section_name.ok_or_else(|| IngestError::MissingSectionColumn {
            path: path.to_path_buf(),
        })?;
        Ok(layout)
    }

    fn build_row(&self, format_version: &str, record: &StringRecord) -> AhbRow {
        let cell = |idx: usize| record.get(idx).map(str::to_string);
        let mut row = AhbRow::new(format_version, cell(self.section_name).unwrap_or_default());
        for (field, idx) in &self.known {
            *row.known_mut(*field) = cell(*idx);
        }
        if let Some(idx) = self.qualifier {
            let code_is_blank = row
                .value_pool_entry
                .as_deref()
                .is_none_or(|code| code.is_empty());
            if code_is_blank && let Some(qualifier) = cell(idx) {
                row.value_pool_entry = Some(qualifier);
            }
        }
        for (header, idx) in &self.extra {
            if let Some(value) = cell(*idx) {
                row.extra.insert(header.clone(), value);
            }
        }
        row
    }
}

/// Reads all rows of one AHB table, tagging them with `format_version`.
///
/// Cell values are kept verbatim; a table without a `Segmentname` column is
/// rejected.
pub fn read_rows(path: &Path, format_version: &str) -> Result<Vec<AhbRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| IngestError::csv(path, e))?;
    let headers = reader
        .headers()
        .map_err(|e| IngestError::csv(path, e))?
        .clone();
    let layout = ColumnLayout::from_headers(path, &headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::csv(path, e))?;
        rows.push(layout.build_row(format_version, &record));
    }
    debug!(
        path = %path.display(),
        format_version,
        rows = rows.len(),
        extra_columns = layout.extra.len(),
        "loaded AHB table"
    );
    Ok(rows)
}

/// Reads the previous and subsequent table of one comparison.
pub fn load_pair(
    previous_path: &Path,
    subsequent_path: &Path,
    previous_format_version: &str,
    subsequent_format_version: &str,
) -> Result<(Vec<AhbRow>, Vec<AhbRow>)> {
    let previous = read_rows(previous_path, previous_format_version)?;
    let subsequent = read_rows(subsequent_path, subsequent_format_version)?;
    Ok((previous, subsequent))
}
