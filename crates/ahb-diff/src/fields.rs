//! Field-level change detection between two matched rows.

use std::collections::BTreeSet;

use ahb_model::{AhbField, AhbRow, FieldName, RowDiff};

/// Comparable fields for a set of rows: the known fields in canonical order,
/// then every extra column seen on any row, sorted by name.
pub fn field_list_for<'a>(rows: impl IntoIterator<Item = &'a AhbRow>) -> Vec<FieldName> {
    let extras: BTreeSet<&str> = rows
        .into_iter()
        .flat_map(|row| row.extra.keys().map(String::as_str))
        .collect();
    AhbField::ALL
        .into_iter()
        .map(FieldName::Known)
        .chain(extras.into_iter().map(|name| FieldName::Extra(name.to_string())))
        .collect()
}

/// Field list agreed by both sides of one comparison.
pub fn resolve_field_list(previous: &AhbRow, subsequent: &AhbRow) -> Vec<FieldName> {
    field_list_for([previous, subsequent])
}

/// Compares `fields` of two rows.
///
/// A field counts as changed when at least one side is non-blank after
/// trimming and the raw values differ; absent values read as "". Every
/// changed field adds a previous-side and a subsequent-side identifier.
pub fn compare_fields(
    previous: &AhbRow,
    subsequent: &AhbRow,
    fields: &[FieldName],
) -> (bool, Vec<String>) {
    let mut changed = Vec::new();
    for field in fields {
        let before = previous.field(field).unwrap_or("");
        let after = subsequent.field(field).unwrap_or("");
        let has_content = !before.trim().is_empty() || !after.trim().is_empty();
        if has_content && before != after {
            changed.push(field.changed_id(&previous.format_version));
            changed.push(field.changed_id(&subsequent.format_version));
        }
    }
    (!changed.is_empty(), changed)
}

/// Runs [`compare_fields`] over the resolved field list of the pair.
pub fn compare_rows(previous: &AhbRow, subsequent: &AhbRow) -> RowDiff {
    let fields = resolve_field_list(previous, subsequent);
    let (_, changed) = compare_fields(previous, subsequent, &fields);
    RowDiff::from_changes(changed)
}

#[cfg(test)]
mod tests {
    use ahb_model::DiffType;

    use super::*;

    fn row(version: &str) -> AhbRow {
        AhbRow::new(version, "Nachrichten-Kopfsegment")
            .with_field(AhbField::SegmentCode, "UNH")
            .with_field(AhbField::AhbExpression, "Muss")
    }

    #[test]
    fn identical_rows_are_unchanged() {
        let diff = compare_rows(&row("FV2410"), &row("FV2504"));
        assert_eq!(diff.diff_type, DiffType::Unchanged);
        assert!(diff.changed_fields.is_empty());
    }

    #[test]
    fn changed_field_is_recorded_for_both_sides() {
        let previous = row("FV2410").with_field(AhbField::SegmentGroupKey, "SG2");
        let subsequent = row("FV2504").with_field(AhbField::SegmentGroupKey, "SG3");
        let diff = compare_rows(&previous, &subsequent);
        assert_eq!(diff.diff_type, DiffType::Modified);
        assert_eq!(
            diff.changed_fields,
            vec!["segment_group_key_FV2410", "segment_group_key_FV2504"]
        );
    }

    #[test]
    fn absent_and_blank_are_equivalent() {
        let previous = row("FV2410");
        let subsequent = row("FV2504")
            .with_field(AhbField::Name, "")
            .with_field(AhbField::Conditions, "  ");
        assert_eq!(compare_rows(&previous, &subsequent), RowDiff::unchanged());
    }

    #[test]
    fn whitespace_only_difference_in_content_is_a_change() {
        let previous = row("FV2410").with_field(AhbField::Name, "Absender");
        let subsequent = row("FV2504").with_field(AhbField::Name, "Absender ");
        assert!(compare_rows(&previous, &subsequent).is_modified());
    }

    #[test]
    fn extra_field_on_one_side_only_flags_when_populated() {
        let previous = row("FV2410");
        let blank = row("FV2504").with_extra("Hinweis", "");
        assert_eq!(compare_rows(&previous, &blank), RowDiff::unchanged());

        let filled = row("FV2504").with_extra("Hinweis", "neu");
        let diff = compare_rows(&previous, &filled);
        assert_eq!(diff.changed_fields, vec!["Hinweis_FV2410", "Hinweis_FV2504"]);
    }

    #[test]
    fn field_list_puts_known_fields_first_and_sorts_extras() {
        let previous = AhbRow::new("FV2410", "A").with_extra("Zusatz", "1");
        let subsequent = AhbRow::new("FV2504", "A").with_extra("Anmerkung", "2");
        let fields = resolve_field_list(&previous, &subsequent);
        let keys: Vec<&str> = fields.iter().map(FieldName::key).collect();
        assert_eq!(
            keys,
            vec![
                "segment_group_key",
                "segment_code",
                "data_element",
                "segment_id",
                "value_pool_entry",
                "name",
                "ahb_expression",
                "conditions",
                "Anmerkung",
                "Zusatz",
            ]
        );
    }

    #[test]
    fn changes_follow_field_order() {
        let previous = row("FV2410")
            .with_field(AhbField::Conditions, "[1]")
            .with_field(AhbField::SegmentCode, "UNT");
        let subsequent = row("FV2504").with_field(AhbField::Conditions, "[2]");
        let (modified, changed) =
            compare_fields(&previous, &subsequent, &resolve_field_list(&previous, &subsequent));
        assert!(modified);
        assert_eq!(
            changed,
            vec![
                "segment_code_FV2410",
                "segment_code_FV2504",
                "conditions_FV2410",
                "conditions_FV2504",
            ]
        );
    }
}
