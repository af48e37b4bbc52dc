//! Flat CSV rendering of an alignment result.

use std::io::Write;
use std::path::Path;

use ::csv::WriterBuilder;
use ahb_model::RowComparison;

use crate::error::{OutputError, Result};
use crate::layout::TableLayout;

/// Writes the header and one record per comparison to `writer`.
pub fn write_csv<W: Write>(
    writer: W,
    layout: &TableLayout,
    comparisons: &[RowComparison],
) -> std::result::Result<(), ::csv::Error> {
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(layout.headers())?;
    for comparison in comparisons {
        let mut record = layout.cells(&comparison.previous);
        record.push(comparison.diff_type().label());
        record.extend(layout.cells(&comparison.subsequent));
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn export_csv(path: &Path, layout: &TableLayout, comparisons: &[RowComparison]) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| OutputError::io(path, e))?;
    write_csv(file, layout, comparisons).map_err(|e| OutputError::csv(path, e))
}

#[cfg(test)]
mod tests {
    use ahb_model::{AhbField, AhbRow, RowDiff};

    use super::*;

    fn render(comparisons: &[RowComparison]) -> String {
        let layout = TableLayout::new("FV2410", "FV2504", comparisons);
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &layout, comparisons).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn empty_result_still_has_headers() {
        let output = render(&[]);
        assert_eq!(output.lines().count(), 1);
        assert!(output.starts_with("Segmentname_FV2410,"));
    }

    #[test]
    fn rows_are_written_side_by_side() {
        let comparisons = vec![
            RowComparison {
                previous: AhbRow::new("FV2410", "Kopf").with_field(AhbField::SegmentCode, "UNH"),
                diff: RowDiff::unchanged(),
                subsequent: AhbRow::new("FV2504", "Kopf").with_field(AhbField::SegmentCode, "UNH"),
            },
            RowComparison {
                previous: AhbRow::empty("FV2504"),
                diff: RowDiff::added(),
                subsequent: AhbRow::new("FV2504", "Referenz, neu"),
            },
        ];
        insta::assert_snapshot!(render(&comparisons), @r#"
        Segmentname_FV2410,Segmentgruppe_FV2410,Segment_FV2410,Datenelement_FV2410,Segment ID_FV2410,Code_FV2410,Beschreibung_FV2410,Bedingungsausdruck_FV2410,Bedingung_FV2410,Änderung,Segmentname_FV2504,Segmentgruppe_FV2504,Segment_FV2504,Datenelement_FV2504,Segment ID_FV2504,Code_FV2504,Beschreibung_FV2504,Bedingungsausdruck_FV2504,Bedingung_FV2504
        Kopf,,UNH,,,,,,,,Kopf,,UNH,,,,,,
        ,,,,,,,,,ADDED,"Referenz, neu",,,,,,,,
        "#);
    }
}
