//! Mutation documents: aliased add/update operations and fixed-size
//! chunking of the write set.

use chrono::SecondsFormat;
use std::fmt::Write;

use crate::core::report::{Department, Report};

/// One aliased operation. Reports carrying a backend id become updates;
/// the rest become creates. The alias keys on the bucket date, which is
/// unique within a run's single period type.
pub(crate) fn report_mutation(report: &Report) -> String {
    let action = if report.id.is_some() {
        "updateReport"
    } else {
        "addReport"
    };
    let id_arg = report
        .id
        .as_deref()
        .map(|id| format!("      id: \"{id}\"\n"))
        .unwrap_or_default();
    let alias: String = report
        .local_date
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    let departments = report
        .departments
        .iter()
        .map(department_mutation)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"    a{alias}: {action}(
{id_arg}      report: {{
        store: "{store}",
        type: "{period}",
        date: "{date}",
        local_date: "{local_date}",
        days_open: {days_open},
        days_left: {days_left},
        prev_period_days_open: {ppdo},
        prev_period_days_left: {ppdl},
        prev_year_days_open: {pydo},
        prev_year_days_left: {pydl},
        departments: [
{departments}
        ]
      }}) {{
      _id
    }}"#,
        store = report.store,
        period = report.period.name(),
        date = report.date.to_rfc3339_opts(SecondsFormat::Millis, true),
        local_date = report.local_date,
        days_open = report.days_open,
        days_left = report.days_left,
        ppdo = report.prev_period_days_open,
        ppdl = report.prev_period_days_left,
        pydo = report.prev_year_days_open,
        pydl = report.prev_year_days_left,
    )
}

fn department_mutation(dept: &Department) -> String {
    let mut fields = String::new();
    let sets = [
        ("", &dept.metrics.own),
        ("prev_period_", &dept.metrics.prev_period),
        ("prev_year_", &dept.metrics.prev_year),
    ];
    for (prefix, record) in sets {
        for (name, value) in record.entries() {
            let _ = writeln!(fields, "              {prefix}{name}: {value}");
        }
    }
    format!(
        "          {{\n            name: \"{}\"\n            metrics: {{\n{fields}            }}\n          }}",
        dept.name
    )
}

/// Wrap the aliased operations into bounded mutation documents.
pub(crate) fn chunk_mutations(mutations: &[String], size: usize) -> Vec<String> {
    mutations
        .chunks(size.max(1))
        .map(|chunk| format!("mutation {{\n{}\n}}", chunk.join("\n")))
        .collect()
}
