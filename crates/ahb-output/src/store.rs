//! SQLite cache of computed comparisons.

use std::path::Path;

use ahb_model::{ComparisonSummary, DiffType, RowComparison};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::error::Result;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS ahb_line_comparison (
    id INTEGER PRIMARY KEY,
    pruefidentifikator TEXT NOT NULL,
    previous_format_version TEXT NOT NULL,
    subsequent_format_version TEXT NOT NULL,
    line_index INTEGER NOT NULL,
    section_name TEXT NOT NULL,
    diff_type TEXT NOT NULL,
    changed_fields TEXT
);
CREATE INDEX IF NOT EXISTS ix_line_comp_versions
    ON ahb_line_comparison (previous_format_version, subsequent_format_version);
CREATE INDEX IF NOT EXISTS ix_line_comp_pruefi_versions
    ON ahb_line_comparison (pruefidentifikator, previous_format_version, subsequent_format_version);

CREATE TABLE IF NOT EXISTS ahb_comparison_summary (
    id INTEGER PRIMARY KEY,
    pruefidentifikator TEXT NOT NULL,
    previous_format_version TEXT NOT NULL,
    subsequent_format_version TEXT NOT NULL,
    total_lines INTEGER NOT NULL,
    unchanged_count INTEGER NOT NULL,
    modified_count INTEGER NOT NULL,
    added_count INTEGER NOT NULL,
    removed_count INTEGER NOT NULL,
    compared_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS ix_summary_versions
    ON ahb_comparison_summary (previous_format_version, subsequent_format_version);
CREATE UNIQUE INDEX IF NOT EXISTS ix_summary_pruefi_versions
    ON ahb_comparison_summary (pruefidentifikator, previous_format_version, subsequent_format_version);
";

/// Identifies one stored comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonKey {
    pub pruefid: String,
    pub previous_format_version: String,
    pub subsequent_format_version: String,
}

/// One persisted line of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLine {
    pub line_index: usize,
    pub section_name: String,
    pub diff_type: DiffType,
    pub changed_fields: Option<String>,
}

pub struct ComparisonStore {
    conn: Connection,
}

impl ComparisonStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Stores one comparison, replacing any earlier result for the same key.
    pub fn store_comparison(
        &mut self,
        key: &ComparisonKey,
        comparisons: &[RowComparison],
        summary: &ComparisonSummary,
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM ahb_line_comparison WHERE pruefidentifikator = ?1 \
             AND previous_format_version = ?2 AND subsequent_format_version = ?3",
            params![
                key.pruefid,
                key.previous_format_version,
                key.subsequent_format_version
            ],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO ahb_line_comparison (pruefidentifikator, previous_format_version, \
                 subsequent_format_version, line_index, section_name, diff_type, changed_fields) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (idx, comparison) in comparisons.iter().enumerate() {
                let changed_fields = if comparison.diff.changed_fields.is_empty() {
                    None
                } else {
                    Some(comparison.diff.changed_fields.join(","))
                };
                insert.execute(params![
                    key.pruefid,
                    key.previous_format_version,
                    key.subsequent_format_version,
                    idx as i64,
                    comparison.display_section_name(),
                    comparison.diff_type().as_str(),
                    changed_fields,
                ])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO ahb_comparison_summary (pruefidentifikator, \
             previous_format_version, subsequent_format_version, total_lines, unchanged_count, \
             modified_count, added_count, removed_count, compared_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                key.pruefid,
                key.previous_format_version,
                key.subsequent_format_version,
                summary.total_lines as i64,
                summary.unchanged as i64,
                summary.modified as i64,
                summary.added as i64,
                summary.removed as i64,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        debug!(
            pruefid = %key.pruefid,
            lines = comparisons.len(),
            "stored comparison"
        );
        Ok(())
    }

    pub fn load_summary(&self, key: &ComparisonKey) -> Result<Option<ComparisonSummary>> {
        let summary = self
            .conn
            .query_row(
                "SELECT total_lines, unchanged_count, modified_count, added_count, removed_count \
                 FROM ahb_comparison_summary WHERE pruefidentifikator = ?1 \
                 AND previous_format_version = ?2 AND subsequent_format_version = ?3",
                params![
                    key.pruefid,
                    key.previous_format_version,
                    key.subsequent_format_version
                ],
                |row| {
                    Ok(ComparisonSummary {
                        total_lines: row.get::<_, i64>(0)? as usize,
                        unchanged: row.get::<_, i64>(1)? as usize,
                        modified: row.get::<_, i64>(2)? as usize,
                        added: row.get::<_, i64>(3)? as usize,
                        removed: row.get::<_, i64>(4)? as usize,
                    })
                },
            )
            .optional()?;
        Ok(summary)
    }

    pub fn load_lines(&self, key: &ComparisonKey) -> Result<Vec<StoredLine>> {
        let mut stmt = self.conn.prepare(
            "SELECT line_index, section_name, diff_type, changed_fields \
             FROM ahb_line_comparison WHERE pruefidentifikator = ?1 \
             AND previous_format_version = ?2 AND subsequent_format_version = ?3 \
             ORDER BY line_index",
        )?;
        let rows = stmt.query_map(
            params![
                key.pruefid,
                key.previous_format_version,
                key.subsequent_format_version
            ],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )?;
        let mut lines = Vec::new();
        for row in rows {
            let (line_index, section_name, diff_type, changed_fields) = row?;
            lines.push(StoredLine {
                line_index: line_index as usize,
                section_name,
                diff_type: diff_type.parse()?,
                changed_fields,
            });
        }
        Ok(lines)
    }
}
