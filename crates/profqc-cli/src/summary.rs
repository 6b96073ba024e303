use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use profqc_cli::types::{CheckResult, FlagResult, MergeResult, VisitsResult, Written};

pub fn print_check_summary(result: &CheckResult) {
    println!("Input: {}", result.input.display());
    println!(
        "Rows: {}  Visits: {}  Checks: {}",
        result.summary.rows, result.visits, result.summary.checks
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Description"),
        header_cell("Fail"),
        header_cell("Success"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (name, remarks) in result.log.iter() {
        table.add_row(vec![
            Cell::new(name).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(&remarks.description),
            count_cell(remarks.fail_count(), Color::Red),
            count_cell(remarks.success_count(), Color::Green),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(result.log.fail_count(), Color::Red).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_remarks(result);
    println!(
        "Rows changed: {}  Rows flagged worse than good: {}",
        result.summary.rows_changed, result.summary.rows_flagged
    );
    print_written(&result.written);
}

fn print_remarks(result: &CheckResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Column"),
        header_cell("Remark"),
    ]);
    apply_table_style(&mut table);
    let mut rows = 0usize;
    for (name, remarks) in result.log.iter() {
        for (column, messages) in &remarks.fail {
            for message in messages {
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(column),
                    Cell::new(message).fg(Color::Red),
                ]);
                rows += 1;
            }
        }
    }
    if rows > 0 {
        println!();
        println!("Remarks:");
        println!("{table}");
    }
}

pub fn print_visits(result: &VisitsResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Visit"),
        header_cell("Station"),
        header_cell("Cruise"),
        header_cell("Date"),
        header_cell("Rows"),
        header_cell("Parameters"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    for visit in &result.visits {
        table.add_row(vec![
            Cell::new(&visit.visit_key)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            optional_cell(visit.station.as_deref()),
            optional_cell(visit.cruise.as_deref()),
            optional_cell(visit.date.as_deref()),
            Cell::new(visit.rows),
            Cell::new(visit.parameters.join(", ")),
        ]);
    }
    println!("{table}");
    println!("Showing {} of {} visits", result.visits.len(), result.total);
    println!("Years: {}", join(&result.possible_years));
    println!("Months: {}", join(&result.possible_months));
    println!("Cruises: {}", join(&result.possible_cruises));
    println!("Stations: {}", join(&result.possible_stations));
}

pub fn print_flag_summary(result: &FlagResult) {
    println!(
        "Visit {}  parameter {}  flag {} ({})",
        result.visit_key,
        result.parameter,
        result.flag,
        result.flag.description()
    );
    match &result.outcome {
        Some(outcome) => println!(
            "Selected {} points, {} rows updated",
            result.selected, outcome.rows_updated
        ),
        None => println!("No matching points; nothing changed"),
    }
    print_written(&result.written);
}

pub fn print_merge_summary(result: &MergeResult) {
    let outcome = &result.outcome;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Feedback"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, count, color) in [
        ("Feedback rows", outcome.feedback_rows, Color::Reset),
        ("Matched", outcome.matched, Color::Reset),
        ("Applied", outcome.applied, Color::Green),
        ("Unmatched", outcome.unmatched, Color::Yellow),
        ("Unparseable", outcome.unparseable, Color::Yellow),
        ("Duplicates", outcome.duplicates, Color::Yellow),
        ("Invalid key", outcome.invalid_key, Color::Yellow),
    ] {
        table.add_row(vec![Cell::new(label), count_cell(count, color)]);
    }
    println!("{table}");
    print_written(&result.written);
}

pub fn print_changes_written(path: &Path, rows: usize) {
    println!("Changes report: {} ({rows} rows)", path.display());
}

fn print_written(written: &Written) {
    println!("Changed rows: {}", written.changed_rows);
    match &written.table {
        Some(path) => println!("Saved: {}", path.display()),
        None => println!("Not saved (use --output)"),
    }
    if let Some(path) = &written.changes {
        println!("Changes report: {}", path.display());
    }
}

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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn join<T: ToString>(values: &[T]) -> String {
    if values.is_empty() {
        return "-".to_string();
    }
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
