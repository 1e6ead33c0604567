use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use nemt_batch::BatchOutcome;
use nemt_compliance::{ComplianceReport, PayerRuleReport};
use nemt_model::{PAYER_PROFILES, Severity};

pub fn print_payers() {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Payer ID"),
        header_cell("Name"),
        header_cell("Qualifier"),
    ]);
    apply_table_style(&mut table);
    for (key, id, name, qualifier) in PAYER_PROFILES {
        table.add_row(vec![
            Cell::new(key).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(id),
            Cell::new(name),
            Cell::new(qualifier),
        ]);
    }
    println!("{table}");
}

pub fn print_batch_summary(outcome: &BatchOutcome) {
    let report = &outcome.report;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Claim"),
        header_cell("DOS"),
        header_cell("Lines"),
        header_cell("Total"),
        header_cell("Frequency"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    let mut total = 0.0;
    for claim in &outcome.claims {
        total += claim.claim.total_charge;
        table.add_row(vec![
            Cell::new(&claim.claim.claim_number)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            claim
                .claim
                .from
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(claim.services.len()),
            Cell::new(format!("{:.2}", claim.claim.total_charge)),
            Cell::new(claim.claim.resolved_frequency().code()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(outcome.claims.iter().map(|c| c.services.len()).sum::<usize>())
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{total:.2}")).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!(
        "Trips: {}  Claims: {}  Status: {}",
        report.trips_processed,
        report.claims_generated,
        status_label(report.is_success())
    );
    println!("{table}");

    if report.issues().is_empty() {
        return;
    }
    let mut issues = Table::new();
    issues.set_header(vec![
        header_cell("Severity"),
        header_cell("Code"),
        header_cell("Where"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut issues);
    align_column(&mut issues, 0, CellAlignment::Center);
    for issue in report.issues() {
        let location = match (issue.trip_index, &issue.claim_number) {
            (Some(index), _) => format!("trip {index}"),
            (None, Some(claim)) => claim.clone(),
            (None, None) => "-".to_string(),
        };
        issues.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(&issue.code),
            Cell::new(location),
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{issues}");
}

pub fn print_compliance(report: &ComplianceReport) {
    println!(
        "Segments: {}  Transaction sets: {}  Status: {}",
        report.segment_count,
        report.transaction_count,
        status_label(report.is_compliant())
    );
    if report.issues().is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Code"),
        header_cell("Segment"),
        header_cell("Loop"),
        header_cell("Message"),
        header_cell("Expected"),
        header_cell("Found"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    let mut issues: Vec<_> = report.issues().iter().collect();
    issues.sort_by_key(|issue| std::cmp::Reverse(issue.severity));
    for issue in issues {
        let segment = match (&issue.segment_id, issue.segment_index) {
            (Some(id), Some(index)) => Cell::new(format!("{id} #{index}")),
            _ => dim_cell("-"),
        };
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(issue.code),
            segment,
            optional_cell(issue.loop_id.as_deref()),
            Cell::new(&issue.message),
            optional_cell(issue.expected.as_deref()),
            optional_cell(issue.actual.as_deref()),
        ]);
    }
    println!("{table}");
}

pub fn print_payer_rules(reports: &[PayerRuleReport]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Claim"),
        header_cell("Severity"),
        header_cell("Code"),
        header_cell("Field"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for report in reports {
        if report.issues().is_empty() {
            table.add_row(vec![
                Cell::new(&report.claim_number).fg(Color::Blue),
                Cell::new("PASS").fg(Color::Green),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ]);
        }
        for issue in report.issues() {
            table.add_row(vec![
                Cell::new(&report.claim_number).fg(Color::Blue),
                severity_cell(issue.severity),
                Cell::new(issue.code),
                optional_cell(issue.field.as_deref()),
                Cell::new(&issue.message),
            ]);
        }
    }
    println!("UHC business rules:");
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_label(ok: bool) -> &'static str {
    if ok { "OK" } else { "FAILED" }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => Cell::new("INFO").fg(Color::DarkGrey),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn optional_cell(value: Option<&str>) -> Cell {
    value.map_or_else(|| dim_cell("-"), Cell::new)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
