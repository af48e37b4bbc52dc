//! Two-sided column layout shared by the CSV and XLSX writers.

use ahb_diff::field_list_for;
use ahb_model::{AhbRow, FieldName, RowComparison, field::SECTION_NAME_HEADER};

/// Header of the column between the two sides.
pub const CHANGE_HEADER: &str = "Änderung";

/// Columns of a rendered comparison: all fields of the previous version, the
/// change column, then all fields of the subsequent version.
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub previous_version: String,
    pub subsequent_version: String,
    pub fields: Vec<FieldName>,
}

impl TableLayout {
    pub fn new(
        previous_version: impl Into<String>,
        subsequent_version: impl Into<String>,
        comparisons: &[RowComparison],
    ) -> Self {
        let rows = comparisons
            .iter()
            .flat_map(|comparison| [&comparison.previous, &comparison.subsequent]);
        Self {
            previous_version: previous_version.into(),
            subsequent_version: subsequent_version.into(),
            fields: field_list_for(rows),
        }
    }

    /// Number of columns per side, section name included.
    pub fn side_width(&self) -> usize {
        self.fields.len() + 1
    }

    pub fn change_column(&self) -> usize {
        self.side_width()
    }

    pub fn subsequent_start(&self) -> usize {
        self.side_width() + 1
    }

    fn side_headers(&self, version: &str) -> impl Iterator<Item = String> + '_ {
        let version = version.to_string();
        std::iter::once(SECTION_NAME_HEADER)
            .chain(self.fields.iter().map(FieldName::header))
            .map(move |header| format!("{header}_{version}"))
    }

    pub fn headers(&self) -> Vec<String> {
        self.side_headers(&self.previous_version)
            .chain(std::iter::once(CHANGE_HEADER.to_string()))
            .chain(self.side_headers(&self.subsequent_version))
            .collect()
    }

    /// Cell values of one side; absent fields render as "".
    pub fn cells<'a>(&self, row: &'a AhbRow) -> Vec<&'a str> {
        std::iter::once(row.section_name.as_str())
            .chain(self.fields.iter().map(|field| row.field(field).unwrap_or("")))
            .collect()
    }

    /// The changed-field identifier for the cell at `offset` within one side.
    pub fn changed_id(&self, offset: usize, format_version: &str) -> Option<String> {
        offset
            .checked_sub(1)
            .and_then(|idx| self.fields.get(idx))
            .map(|field| field.changed_id(format_version))
    }
}

#[cfg(test)]
mod tests {
    use ahb_model::{AhbField, RowDiff};

    use super::*;

    #[test]
    fn headers_are_suffixed_per_side() {
        let layout = TableLayout::new("FV2410", "FV2504", &[]);
        let headers = layout.headers();
        assert_eq!(headers.len(), 19);
        assert_eq!(headers[0], "Segmentname_FV2410");
        assert_eq!(headers[5], "Code_FV2410");
        assert_eq!(headers[9], "Änderung");
        assert_eq!(headers[10], "Segmentname_FV2504");
        assert_eq!(headers[18], "Bedingung_FV2504");
    }

    #[test]
    fn extra_columns_follow_known_fields() {
        let comparisons = vec![RowComparison {
            previous: AhbRow::new("FV2410", "A").with_extra("Hinweis", "x"),
            diff: RowDiff::unchanged(),
            subsequent: AhbRow::new("FV2504", "A").with_field(AhbField::Name, "Kopf"),
        }];
        let layout = TableLayout::new("FV2410", "FV2504", &comparisons);
        assert_eq!(layout.side_width(), 10);
        assert_eq!(layout.headers()[9], "Hinweis_FV2410");
        assert_eq!(layout.cells(&comparisons[0].previous)[9], "x");
        assert_eq!(layout.cells(&comparisons[0].subsequent)[9], "");
        assert_eq!(layout.changed_id(6, "FV2504").as_deref(), Some("name_FV2504"));
        assert_eq!(layout.changed_id(0, "FV2504"), None);
    }
}
