//! XLSX rendering with per-diff-type highlighting.

use std::path::Path;

use ahb_model::{AhbRow, DiffType, RowComparison};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::info;

use crate::error::Result;
use crate::layout::TableLayout;

const GREY: u32 = 0xD9D9D9;
const ADDED_FILL: u32 = 0xC6EFCE;
const REMOVED_FILL: u32 = 0xFFC7CE;
const MODIFIED_FILL: u32 = 0xF5DC98;
const ADDED_TEXT: u32 = 0x7AAB8A;
const REMOVED_TEXT: u32 = 0xE94C74;
const MODIFIED_TEXT: u32 = 0xB8860B;

const DEFAULT_COLUMN_WIDTH_PX: u16 = 100;
const CUSTOM_COLUMN_WIDTHS_PX: [(&str, u16); 2] = [("Segmentname_", 175), ("Beschreibung_", 150)];
const MAX_SHEET_NAME_LEN: usize = 31;

fn base_format() -> Format {
    Format::new().set_border(FormatBorder::Thin).set_text_wrap()
}

fn header_format() -> Format {
    base_format()
        .set_bold()
        .set_background_color(Color::RGB(GREY))
        .set_align(FormatAlign::Center)
}

fn fill(diff_type: DiffType) -> Option<u32> {
    match diff_type {
        DiffType::Added => Some(ADDED_FILL),
        DiffType::Removed => Some(REMOVED_FILL),
        DiffType::Modified => Some(MODIFIED_FILL),
        DiffType::Unchanged => None,
    }
}

/// Fill and weight of one data cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    fill: Option<u32>,
    bold: bool,
}

impl CellStyle {
    fn new(diff_type: DiffType, new_section: bool, section_cell: bool, changed: bool) -> Self {
        let fill = match fill(diff_type) {
            Some(color) => Some(color),
            None if new_section => Some(GREY),
            None => None,
        };
        Self {
            fill,
            bold: (section_cell && new_section) || changed,
        }
    }

    fn format(self) -> Format {
        let mut format = base_format();
        if let Some(color) = self.fill {
            format = format.set_background_color(Color::RGB(color));
        }
        if self.bold {
            format = format.set_bold();
        }
        format
    }
}

/// For each comparison, whether it opens a new section: its displayed
/// section name is non-empty and differs from the previous line's.
fn section_starts(comparisons: &[RowComparison]) -> Vec<bool> {
    let mut last_section: Option<&str> = None;
    comparisons
        .iter()
        .map(|comparison| {
            let section = comparison.display_section_name();
            let starts = !section.is_empty() && last_section != Some(section);
            last_section = Some(section);
            starts
        })
        .collect()
}

/// Styles of the cells of one side, section name first.
fn side_styles(
    layout: &TableLayout,
    row: &AhbRow,
    comparison: &RowComparison,
    new_section: bool,
) -> Vec<CellStyle> {
    let diff_type = comparison.diff_type();
    (0..layout.side_width())
        .map(|offset| {
            let changed = diff_type == DiffType::Modified
                && layout
                    .changed_id(offset, &row.format_version)
                    .is_some_and(|id| comparison.diff.has_changed(&id));
            CellStyle::new(diff_type, new_section, offset == 0, changed)
        })
        .collect()
}

fn change_format(diff_type: DiffType) -> Format {
    let format = base_format()
        .set_background_color(Color::RGB(GREY))
        .set_align(FormatAlign::Center);
    let text = match diff_type {
        DiffType::Added => ADDED_TEXT,
        DiffType::Removed => REMOVED_TEXT,
        DiffType::Modified => MODIFIED_TEXT,
        DiffType::Unchanged => return format,
    };
    format.set_bold().set_font_color(Color::RGB(text))
}

fn sheet_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("comparison");
    let cleaned: String = stem
        .chars()
        .filter(|ch| !matches!(ch, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if cleaned.is_empty() {
        "comparison".to_string()
    } else {
        cleaned
    }
}

fn write_side(
    worksheet: &mut Worksheet,
    layout: &TableLayout,
    row_num: u32,
    start_col: usize,
    row: &AhbRow,
    comparison: &RowComparison,
    new_section: bool,
) -> Result<()> {
    let styles = side_styles(layout, row, comparison, new_section);
    for (offset, (value, style)) in layout.cells(row).into_iter().zip(styles).enumerate() {
        worksheet.write_string_with_format(
            row_num,
            column(start_col + offset),
            value,
            &style.format(),
        )?;
    }
    Ok(())
}

fn column(index: usize) -> u16 {
    u16::try_from(index).unwrap_or(u16::MAX)
}

/// Writes `comparisons` to a single-sheet workbook at `path`.
///
/// A section-name cell is bold whenever its section differs from the one of
/// the previously written line; unchanged lines starting a new section are
/// filled grey.
pub fn export_xlsx(path: &Path, layout: &TableLayout, comparisons: &[RowComparison]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(path))?;

    let headers = layout.headers();
    let header = header_format();
    for (col, title) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column(col), title, &header)?;
    }

    let starts = section_starts(comparisons);
    for (idx, (comparison, new_section)) in comparisons.iter().zip(starts).enumerate() {
        let row_num = u32::try_from(idx + 1).unwrap_or(u32::MAX);
        write_side(worksheet, layout, row_num, 0, &comparison.previous, comparison, new_section)?;
        worksheet.write_string_with_format(
            row_num,
            column(layout.change_column()),
            comparison.diff_type().label(),
            &change_format(comparison.diff_type()),
        )?;
        write_side(
            worksheet,
            layout,
            row_num,
            layout.subsequent_start(),
            &comparison.subsequent,
            comparison,
            new_section,
        )?;
    }

    for (col, title) in headers.iter().enumerate() {
        let width = CUSTOM_COLUMN_WIDTHS_PX
            .iter()
            .find(|(prefix, _)| title.starts_with(prefix))
            .map_or(DEFAULT_COLUMN_WIDTH_PX, |(_, width)| *width);
        worksheet.set_column_width_pixels(column(col), width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    info!(path = %path.display(), rows = comparisons.len(), "exported XLSX");
    Ok(())
}

#[cfg(test)]
mod tests {
    use ahb_model::{AhbField, RowDiff};

    use super::*;

    fn unchanged(name: &str) -> RowComparison {
        RowComparison {
            previous: AhbRow::new("FV2410", name),
            diff: RowDiff::unchanged(),
            subsequent: AhbRow::new("FV2504", name),
        }
    }

    #[test]
    fn sheet_name_is_sanitized_and_truncated() {
        assert_eq!(sheet_name(Path::new("out/55001.xlsx")), "55001");
        assert_eq!(sheet_name(Path::new("a[1]:b.xlsx")), "a1b");
        let long = format!("{}.xlsx", "x".repeat(40));
        assert_eq!(sheet_name(Path::new(&long)).len(), 31);
    }

    #[test]
    fn sections_start_on_name_change_only() {
        let comparisons = vec![
            unchanged("Kopf"),
            unchanged("Kopf"),
            unchanged("Datum"),
            unchanged("Kopf"),
        ];
        assert_eq!(section_starts(&comparisons), vec![true, false, true, true]);
    }

    #[test]
    fn added_row_takes_section_from_subsequent_side() {
        let comparisons = vec![
            unchanged("Kopf"),
            RowComparison {
                previous: AhbRow::empty("FV2504"),
                diff: RowDiff::added(),
                subsequent: AhbRow::new("FV2504", "Kopf"),
            },
            RowComparison {
                previous: AhbRow::empty("FV2504"),
                diff: RowDiff::added(),
                subsequent: AhbRow::new("FV2504", "Referenz"),
            },
        ];
        assert_eq!(section_starts(&comparisons), vec![true, false, true]);
    }

    #[test]
    fn empty_section_name_never_starts_a_section() {
        let comparisons = vec![unchanged("Kopf"), unchanged(""), unchanged("Kopf")];
        assert_eq!(section_starts(&comparisons), vec![true, false, true]);
    }

    #[test]
    fn unchanged_rows_are_grey_only_at_section_start() {
        let start = CellStyle::new(DiffType::Unchanged, true, true, false);
        assert_eq!(start, CellStyle { fill: Some(GREY), bold: true });
        let start_field = CellStyle::new(DiffType::Unchanged, true, false, false);
        assert_eq!(start_field, CellStyle { fill: Some(GREY), bold: false });
        let inner = CellStyle::new(DiffType::Unchanged, false, true, false);
        assert_eq!(inner, CellStyle { fill: None, bold: false });
    }

    #[test]
    fn diff_type_fill_wins_over_section_grey() {
        assert_eq!(
            CellStyle::new(DiffType::Added, true, false, false).fill,
            Some(ADDED_FILL)
        );
        assert_eq!(
            CellStyle::new(DiffType::Removed, false, false, false).fill,
            Some(REMOVED_FILL)
        );
        assert_eq!(
            CellStyle::new(DiffType::Modified, true, true, false),
            CellStyle { fill: Some(MODIFIED_FILL), bold: true }
        );
    }

    #[test]
    fn changed_cells_of_modified_row_are_bold_on_both_sides() {
        let comparison = RowComparison {
            previous: AhbRow::new("FV2410", "Kopf")
                .with_field(AhbField::SegmentCode, "UNH")
                .with_field(AhbField::Name, "alt"),
            diff: RowDiff::from_changes(vec![
                "name_FV2410".to_string(),
                "name_FV2504".to_string(),
            ]),
            subsequent: AhbRow::new("FV2504", "Kopf")
                .with_field(AhbField::SegmentCode, "UNH")
                .with_field(AhbField::Name, "neu"),
        };
        let layout = TableLayout::new("FV2410", "FV2504", std::slice::from_ref(&comparison));
        let name_offset = 1 + AhbField::ALL
            .iter()
            .position(|field| *field == AhbField::Name)
            .unwrap();

        for row in [&comparison.previous, &comparison.subsequent] {
            let bold: Vec<usize> = side_styles(&layout, row, &comparison, false)
                .iter()
                .enumerate()
                .filter(|(_, style)| style.bold)
                .map(|(offset, _)| offset)
                .collect();
            assert_eq!(bold, vec![name_offset]);
        }
        let styles = side_styles(&layout, &comparison.previous, &comparison, false);
        assert!(styles.iter().all(|style| style.fill == Some(MODIFIED_FILL)));
    }
}
