use std::io::{self, IsTerminal};

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use caselink_cli::types::{IndexSummary, RunSummary};
use caselink_model::CaseId;
use caselink_store::WriteMode;

pub fn print_run_summary(summary: &RunSummary) {
    println!("Data: {}", summary.data_dir.display());
    println!(
        "Mode: {} ({} records{})",
        summary.mode,
        summary.scope.as_str(),
        summary
            .limit
            .map(|limit| format!(", limit {limit}"))
            .unwrap_or_default()
    );
    println!(
        "Registry: {} cases, fingerprint {}",
        summary.case_count,
        short_fingerprint(&summary.registry_fingerprint)
    );

    if !io::stdout().is_terminal() {
        print!("{}", summary.report.render_text());
        print_write_lines(summary);
        return;
    }

    print_source_table(summary);
    print_strategy_table(summary);
    print_unmatched_table(summary);
    print_write_table(summary);
    print_failures(summary);
}

fn print_source_table(summary: &RunSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Loaded"),
        header_cell("In scope"),
        header_cell("Processed"),
        header_cell("Matched"),
        header_cell("Unmatched"),
        header_cell("Rejected"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut totals = [0usize; 6];
    for source in &summary.sources {
        let row = [
            source.loaded,
            source.in_scope,
            source.processed,
            source.matched,
            source.unmatched,
            source.rejected,
        ];
        for (total, value) in totals.iter_mut().zip(row) {
            *total += value;
        }
        table.add_row(vec![
            Cell::new(source.source.as_str()),
            Cell::new(source.loaded),
            Cell::new(source.in_scope),
            Cell::new(source.processed),
            count_cell(Some(source.matched), Color::Green),
            count_cell(Some(source.unmatched), Color::Yellow),
            count_cell(Some(source.rejected), Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(totals[0]).add_attribute(Attribute::Bold),
        Cell::new(totals[1]).add_attribute(Attribute::Bold),
        Cell::new(totals[2]).add_attribute(Attribute::Bold),
        count_cell(Some(totals[3]), Color::Green).add_attribute(Attribute::Bold),
        count_cell(Some(totals[4]), Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(Some(totals[5]), Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn print_strategy_table(summary: &RunSummary) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Strategy"), header_cell("Matched")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (position, strategy) in summary.strategies.iter().enumerate() {
        let count = summary
            .report
            .by_strategy
            .get(*strategy)
            .copied()
            .unwrap_or(0);
        table.add_row(vec![
            dim_cell(position + 1),
            Cell::new(strategy),
            count_cell(Some(count), Color::Green),
        ]);
    }
    println!("{table}");
    match summary.report.match_rate() {
        Some(rate) => println!(
            "Matched {} of {} records ({rate:.1}%)",
            summary.report.matched, summary.report.total
        ),
        None => println!("No records to resolve"),
    }
}

fn print_unmatched_table(summary: &RunSummary) {
    if summary.report.top_unmatched.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Unmatched label"), header_cell("Records")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for entry in &summary.report.top_unmatched {
        table.add_row(vec![Cell::new(&entry.label), Cell::new(entry.count)]);
    }
    println!("{table}");
}

fn print_write_table(summary: &RunSummary) {
    let write = &summary.write;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Linkages"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let written = match write.mode {
        WriteMode::Commit => Some(write.written),
        WriteMode::DryRun => None,
    };
    table.add_row(vec![Cell::new("planned"), Cell::new(write.planned)]);
    table.add_row(vec![Cell::new("written"), count_cell(written, Color::Green)]);
    table.add_row(vec![Cell::new("unchanged"), dim_cell(write.unchanged)]);
    table.add_row(vec![
        Cell::new("protected (manual)"),
        count_cell(Some(write.protected), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("skipped batches"),
        count_cell(Some(write.skipped_batches), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("failed batches"),
        count_cell(Some(write.failed_batches.len()), Color::Red),
    ]);
    println!("{table}");
    if write.mode == WriteMode::DryRun && write.planned > 0 {
        println!("Dry run: re-run with --commit to write {} linkages", write.planned);
    }
    if summary.interrupted {
        println!("Interrupted: unprocessed records stay unlinked until the next run");
    }
}

fn print_write_lines(summary: &RunSummary) {
    let write = &summary.write;
    println!();
    println!("planned: {}", write.planned);
    println!("written: {}", write.written);
    println!("unchanged: {}", write.unchanged);
    println!("protected: {}", write.protected);
    println!("skipped batches: {}", write.skipped_batches);
    println!("failed batches: {}", write.failed_batches.len());
    print_failures(summary);
}

fn print_failures(summary: &RunSummary) {
    if summary.write.failed_batches.is_empty() {
        return;
    }
    eprintln!("Failed batches:");
    for failure in &summary.write.failed_batches {
        eprintln!(
            "- batch {} ({} linkages): {}",
            failure.batch, failure.size, failure.error
        );
    }
}

pub fn print_index_summary(summary: &IndexSummary) {
    println!("Data: {}", summary.data_dir.display());
    println!(
        "Registry: {} cases, fingerprint {}",
        summary.case_count,
        short_fingerprint(&summary.registry_fingerprint)
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Index"),
        header_cell("Keys"),
        header_cell("Ambiguous"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for stat in &summary.stats {
        table.add_row(vec![
            Cell::new(stat.index),
            Cell::new(stat.keys),
            count_cell(Some(stat.ambiguous), Color::Yellow),
        ]);
    }
    println!("{table}");

    if summary.ambiguous.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Index"),
        header_cell("Shared key"),
        header_cell("Cases"),
    ]);
    apply_summary_table_style(&mut table);
    for entry in &summary.ambiguous {
        let case_ids: Vec<&str> = entry.case_ids.iter().map(CaseId::as_str).collect();
        table.add_row(vec![
            dim_cell(entry.index),
            Cell::new(&entry.key),
            Cell::new(case_ids.join(", ")),
        ]);
    }
    println!("{table}");
}

fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
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
        .set_width(120);
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
