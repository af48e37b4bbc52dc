use std::path::PathBuf;

use ahb_model::ComparisonSummary;

/// Outcome of one compared pruefid.
#[derive(Debug, Clone)]
pub struct UnitSummary {
    pub previous_format_version: String,
    pub subsequent_format_version: String,
    pub message_format: String,
    pub pruefid: String,
    pub counts: ComparisonSummary,
    pub outputs: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct BatchResult {
    pub output_dir: PathBuf,
    pub database: Option<PathBuf>,
    pub units: Vec<UnitSummary>,
    /// One message per failed unit; the batch continued past each of them.
    pub errors: Vec<String>,
}

impl BatchResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn totals(&self) -> ComparisonSummary {
        let mut totals = ComparisonSummary::default();
        for unit in &self.units {
            totals.total_lines += unit.counts.total_lines;
            totals.unchanged += unit.counts.unchanged;
            totals.modified += unit.counts.modified;
            totals.added += unit.counts.added;
            totals.removed += unit.counts.removed;
        }
        totals
    }
}
