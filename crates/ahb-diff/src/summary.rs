use ahb_model::{ComparisonSummary, RowComparison};

/// Counts the diff types of an alignment result.
pub fn summarize(comparisons: &[RowComparison]) -> ComparisonSummary {
    let mut summary = ComparisonSummary::default();
    for comparison in comparisons {
        summary.record(comparison.diff_type());
    }
    summary
}

#[cfg(test)]
mod tests {
    use ahb_model::AhbRow;

    use super::*;
    use crate::align;

    #[test]
    fn counts_match_alignment() {
        let previous: Vec<AhbRow> = ["1", "2", "2"]
            .iter()
            .map(|name| AhbRow::new("FV2410", *name))
            .collect();
        let subsequent: Vec<AhbRow> = ["1", "2", "4"]
            .iter()
            .map(|name| AhbRow::new("FV2504", *name))
            .collect();
        let summary = summarize(&align(&previous, &subsequent));
        assert_eq!(
            summary,
            ComparisonSummary {
                total_lines: 4,
                unchanged: 2,
                modified: 0,
                added: 1,
                removed: 1,
            }
        );
    }
}
