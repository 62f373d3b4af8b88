//! Operator-facing tables printed after each command.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use jobetl_map::MappingReport;
use jobetl_model::{Field, RunSummary};
use jobetl_standards::LoadedFile;

use crate::commands::RunResult;

pub fn print_run_summary(result: &RunResult) {
    let summary = &result.output.summary;
    println!("Input: {}", result.input_dir.display());
    match &result.written {
        Some(paths) => {
            if let Some(dir) = paths.run_summary.parent() {
                println!("Output: {}", dir.display());
            }
        }
        None => println!("Output: (dry run, nothing written)"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Records"),
        header_cell("Passed"),
        header_cell("Dropped"),
        header_cell("Dropped columns"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 1..=3 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for source in &summary.sources {
        table.add_row(vec![
            Cell::new(&source.source)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(source.records_in),
            Cell::new(source.records_passed),
            count_cell(source.records_dropped, Color::Yellow),
            dim_or(source.dropped_columns.join(", ")),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.records_in).add_attribute(Attribute::Bold),
        Cell::new(summary.records_passed).add_attribute(Attribute::Bold),
        count_cell(summary.records_dropped, Color::Yellow).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    println!("{table}");

    print_drop_reasons(summary);
    print_field_counts(summary);

    if !summary.file_failures.is_empty() {
        eprintln!("Failed sources:");
        for failure in &summary.file_failures {
            eprintln!("- {}: {}", failure.source, failure.error);
        }
    }
}

fn print_drop_reasons(summary: &RunSummary) {
    let reasons = summary.drop_reason_counts();
    if reasons.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Drop reason"), header_cell("Records")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (reason, count) in reasons {
        table.add_row(vec![Cell::new(reason), count_cell(count, Color::Yellow)]);
    }
    println!();
    println!("Dropped records:");
    println!("{table}");
}

fn print_field_counts(summary: &RunSummary) {
    let fields: Vec<Field> = Field::ALL
        .iter()
        .copied()
        .filter(|field| {
            summary.unmatched_by_field.contains_key(field)
                || summary.soft_flags_by_field.contains_key(field)
        })
        .collect();
    if fields.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Unmatched"),
        header_cell("Soft flags"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for field in fields {
        let unmatched = summary.unmatched_by_field.get(&field).copied().unwrap_or(0);
        let flagged = summary.soft_flags_by_field.get(&field).copied().unwrap_or(0);
        table.add_row(vec![
            Cell::new(field.name()),
            count_cell(unmatched, Color::Yellow),
            count_cell(flagged, Color::Magenta),
        ]);
    }
    println!();
    println!("Diagnostics by field:");
    println!("{table}");
}

pub fn print_mapping_report(report: &MappingReport) {
    let plan = &report.plan;
    println!("Source: {}", plan.source);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Field"), header_cell("Status")]);
    apply_table_style(&mut table);
    for binding in &plan.bindings {
        table.add_row(vec![
            Cell::new(&binding.column),
            Cell::new(binding.field.name()),
            Cell::new("mapped").fg(Color::Green),
        ]);
    }
    for column in &plan.unused {
        table.add_row(vec![Cell::new(column), dim_cell("-"), dim_cell("unused")]);
    }
    for column in &plan.unmapped {
        let suggestion = report
            .suggestions
            .iter()
            .find(|suggestion| &suggestion.column == column)
            .map_or_else(
                || dim_cell("-"),
                |suggestion| Cell::new(format!("{}?", suggestion.field.name())).fg(Color::Cyan),
            );
        table.add_row(vec![
            Cell::new(column),
            suggestion,
            Cell::new("unmapped").fg(Color::Yellow),
        ]);
    }
    println!("{table}");

    if report.passed() {
        println!("All required fields are mapped.");
    } else {
        let missing: Vec<&str> = plan.missing_required.iter().map(Field::name).collect();
        eprintln!("Missing required fields: {}", missing.join(", "));
    }
}

pub fn print_references(files: &[LoadedFile]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Role"),
        header_cell("File"),
        header_cell("Rows"),
        header_cell("SHA-256"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for file in files {
        let name = file
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&file.role)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(name),
            Cell::new(file.rows),
            dim_cell(&file.sha256[..file.sha256.len().min(16)]),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
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

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(content: T) -> Cell {
    Cell::new(content).fg(Color::DarkGrey)
}

fn dim_or(content: String) -> Cell {
    if content.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(content)
    }
}
