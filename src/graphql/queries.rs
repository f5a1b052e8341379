//! Query documents sent to the reporting backend.

use std::fmt::Write;
use std::sync::OnceLock;

use crate::core::metrics::MetricsRecord;

pub(crate) const STORE_QUERY: &str = r"
  query Store($store: String!) {
    store(name: $store) {
      name
      days_open
      state
      timezone
    }
  }";

pub(crate) const DELETE_REPORTS: &str = r"
  mutation deleteReport($store: String!, $ids: [String]!) {
    delete: deleteReport(store: $store, ids: $ids) {
      _id
    }
  }";

const TARGET_FIGURES: &str = "{total, retail, daycare, grooming}";

fn metric_names() -> Vec<&'static str> {
    MetricsRecord::default()
        .entries()
        .iter()
        .map(|(name, _)| *name)
        .collect()
}

fn metric_selection(prefixes: &[&str]) -> String {
    let mut out = String::new();
    for prefix in prefixes {
        for name in metric_names() {
            let _ = writeln!(out, "          {prefix}{name}");
        }
    }
    out
}

fn target_selection() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "      weeks {{");
    for week in 1..=52 {
        let _ = writeln!(out, "        w{week} {TARGET_FIGURES}");
    }
    let _ = writeln!(out, "      }}");
    let _ = writeln!(out, "      months {{");
    for month in [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ] {
        let _ = writeln!(out, "        {month} {TARGET_FIGURES}");
    }
    let _ = writeln!(out, "      }}");
    out
}

/// Fetches everything one store run needs: persisted reports for the
/// window, the raw event streams, and the target tree for the spanned
/// years.
pub(crate) fn window_query() -> &'static str {
    static DOC: OnceLock<String> = OnceLock::new();
    DOC.get_or_init(|| {
        format!(
            r"
  query window($store: String!, $from: Date!, $to: Date!, $years: [Int]!, $group: String!, $type: String!) {{
    reports(store: $store, from: $from, to: $to, type: $type) {{
      _id
      store
      type
      date
      local_date
      days_open
      days_left
      prev_period_days_open
      prev_period_days_left
      prev_year_days_open
      prev_year_days_left
      departments {{
        name
        metrics {{
{report_metrics}        }}
      }}
    }}
    deptSales: calcSales(store: $store, from: $from, to: $to, group: $group, department: true) {{
      date
      department
      total
      tax
      units
      subtotal
      discount
      transactions
    }}
    sales: calcSales(store: $store, from: $from, to: $to, group: $group, department: false) {{
      date
      department
      total
      tax
      units
      subtotal
      discount
      transactions
    }}
    wages: calcWages(store: $store, from: $from, to: $to, group: $group) {{
      date
      department
      total
      employees
      hours
    }}
    bookings: calcBookings(store: $store, from: $from, to: $to, group: $group) {{
      date
      department
      bookings
    }}
    targets(store: $store, years: $years) {{
      year
{targets}    }}
  }}",
            report_metrics = metric_selection(&["", "prev_period_", "prev_year_"]),
            targets = target_selection(),
        )
    })
    .as_str()
}

/// Single-report lookup used by comparative enrichment; only the report's
/// own metrics are needed.
pub(crate) fn prev_report_query() -> &'static str {
    static DOC: OnceLock<String> = OnceLock::new();
    DOC.get_or_init(|| {
        format!(
            r"
  query report($store: String!, $local_date: String!, $type: String!) {{
    report(store: $store, local_date: $local_date, type: $type) {{
      _id
      store
      type
      date
      local_date
      days_open
      days_left
      departments {{
        name
        metrics {{
{metrics}        }}
      }}
    }}
  }}",
            metrics = metric_selection(&[""]),
        )
    })
    .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_query_selects_all_streams() {
        let doc = window_query();
        for stream in ["reports", "deptSales:", "sales:", "wages:", "bookings:", "targets("] {
            assert!(doc.contains(stream), "missing {stream}");
        }
    }

    #[test]
    fn window_query_covers_the_target_tree() {
        let doc = window_query();
        assert!(doc.contains("w1 {total, retail, daycare, grooming}"));
        assert!(doc.contains("w52 {total, retail, daycare, grooming}"));
        assert!(!doc.contains("w53"));
        assert!(doc.contains("jan {total, retail, daycare, grooming}"));
        assert!(doc.contains("dec {total, retail, daycare, grooming}"));
    }

    #[test]
    fn window_query_selects_prefixed_metrics() {
        let doc = window_query();
        assert!(doc.contains("sales_total"));
        assert!(doc.contains("prev_period_sales_total"));
        assert!(doc.contains("prev_year_wage_cost_percent"));
    }

    #[test]
    fn prev_report_query_selects_own_metrics_only() {
        let doc = prev_report_query();
        assert!(doc.contains("sales_total"));
        assert!(!doc.contains("prev_period_sales_total"));
    }
}
