use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{BatchResult, UnitSummary};

pub fn print_batch_summary(result: &BatchResult) {
    println!("Output: {}", result.output_dir.display());
    if let Some(path) = &result.database {
        println!("Database: {}", path.display());
    }
    println!("{}", batch_table(result));
    if result.has_errors() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

pub fn print_unit_summary(unit: &UnitSummary) {
    for path in &unit.outputs {
        println!("Wrote {}", path.display());
    }
    let mut table = Table::new();
    set_header(&mut table);
    apply_summary_table_style(&mut table);
    table.add_row(unit_row(unit));
    println!("{table}");
}

pub fn batch_table(result: &BatchResult) -> Table {
    let mut table = Table::new();
    set_header(&mut table);
    apply_summary_table_style(&mut table);
    for unit in &result.units {
        table.add_row(unit_row(unit));
    }
    let totals = result.totals();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} units", result.units.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(totals.total_lines).add_attribute(Attribute::Bold),
        dim_cell(totals.unchanged),
        count_cell(totals.modified, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(totals.added, Color::Green).add_attribute(Attribute::Bold),
        count_cell(totals.removed, Color::Red).add_attribute(Attribute::Bold),
    ]);
    table
}

fn set_header(table: &mut Table) {
    table.set_header(vec![
        header_cell("Versions"),
        header_cell("Format"),
        header_cell("Pruefid"),
        header_cell("Lines"),
        header_cell("Unchanged"),
        header_cell("Modified"),
        header_cell("Added"),
        header_cell("Removed"),
    ]);
    for index in 3..8 {
        align_column(table, index, CellAlignment::Right);
    }
}

fn unit_row(unit: &UnitSummary) -> Vec<Cell> {
    vec![
        Cell::new(format!(
            "{} → {}",
            unit.previous_format_version, unit.subsequent_format_version
        )),
        Cell::new(&unit.message_format).fg(Color::Blue),
        Cell::new(&unit.pruefid).add_attribute(Attribute::Bold),
        Cell::new(unit.counts.total_lines),
        dim_cell(unit.counts.unchanged),
        count_cell(unit.counts.modified, Color::Yellow),
        count_cell(unit.counts.added, Color::Green),
        count_cell(unit.counts.removed, Color::Red),
    ]
}

/// Condensed style for plain listings.
pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use ahb_model::ComparisonSummary;

    use super::*;

    #[test]
    fn batch_table_has_one_row_per_unit_plus_total() {
        let unit = UnitSummary {
            previous_format_version: "FV2410".to_string(),
            subsequent_format_version: "FV2504".to_string(),
            message_format: "UTILMD".to_string(),
            pruefid: "55001".to_string(),
            counts: ComparisonSummary {
                total_lines: 4,
                unchanged: 1,
                modified: 1,
                added: 1,
                removed: 1,
            },
            outputs: Vec::new(),
        };
        let result = BatchResult {
            units: vec![unit.clone(), unit],
            ..BatchResult::default()
        };
        let table = batch_table(&result);
        assert_eq!(table.row_count(), 3);
        assert_eq!(result.totals().total_lines, 8);
    }
}
