//! Dry-run rendering of a computed diff.

use comfy_table::{ContentArrangement, Table, modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL};

use crate::core::report::{Report, STORE_DEPARTMENT};
use crate::core::{DiffResult, PeriodType};

fn store_sales_total(report: &Report) -> f64 {
    report
        .departments
        .iter()
        .find(|d| d.name == STORE_DEPARTMENT)
        .map(|d| d.metrics.own.sales_total)
        .unwrap_or(0.0)
}

fn push_rows(table: &mut Table, reports: &[Report], action: impl Fn(&Report) -> &'static str) {
    for report in reports {
        table.add_row(vec![
            report.key(),
            action(report).to_string(),
            format!("{:.2}", store_sales_total(report)),
            report.days_open.to_string(),
            report.days_left.to_string(),
        ]);
    }
}

/// Print the write set a run would submit, without submitting it.
pub(crate) fn print_diff_table(store: &str, period: PeriodType, diff: &DiffResult) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Action", "Sales total", "Days open", "Days left"]);

    push_rows(&mut table, &diff.updated, |r| {
        if r.id.is_some() { "update" } else { "create" }
    });
    push_rows(&mut table, &diff.deleted, |_| "delete");

    println!("\n{store} {} reports (dry run)", period.name());
    println!("{table}");
    println!(
        "  {} to write, {} to delete, {} unchanged\n",
        diff.updated.len(),
        diff.deleted.len(),
        diff.equal.len()
    );
}
