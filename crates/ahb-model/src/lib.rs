//! Data model for comparing AHB tables across format versions.

pub mod diff;
pub mod error;
pub mod field;
pub mod format_version;
pub mod row;

pub use diff::{ComparisonSummary, DiffType, RowComparison, RowDiff};
pub use error::{ModelError, Result};
pub use field::{AhbField, FieldName};
pub use format_version::FormatVersion;
pub use row::AhbRow;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_serializes() {
        let comparison = RowComparison {
            previous: AhbRow::new("FV2410", "Nachrichten-Kopfsegment"),
            diff: RowDiff::unchanged(),
            subsequent: AhbRow::new("FV2504", "Nachrichten-Kopfsegment"),
        };
        let json = serde_json::to_string(&comparison).expect("serialize comparison");
        assert!(json.contains("\"diff_type\":\"UNCHANGED\""));
        let round: RowComparison = serde_json::from_str(&json).expect("deserialize comparison");
        assert_eq!(round, comparison);
    }
}
