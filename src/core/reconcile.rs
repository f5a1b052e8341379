//! Reconciliation: diff freshly computed reports against persisted state
//! to produce the minimal write set.

use std::collections::HashMap;

use crate::core::report::Report;

#[derive(Debug, Default)]
pub(crate) struct DiffResult {
    /// New or changed reports; changed ones carry the existing id forward.
    pub(crate) updated: Vec<Report>,
    /// Persisted reports no longer produced by the computation.
    pub(crate) deleted: Vec<Report>,
    /// Persisted reports the computation reproduced exactly.
    pub(crate) equal: Vec<Report>,
}

/// Partition by stable key. A matched pair is compared structurally with
/// the backend id ignored; unmatched fresh reports become creates and
/// unmatched existing reports become deletes.
pub(crate) fn diff_reports(existing: Vec<Report>, fresh: Vec<Report>) -> DiffResult {
    let mut existing_by_key: HashMap<String, Report> =
        existing.into_iter().map(|r| (r.key(), r)).collect();

    let mut result = DiffResult::default();

    for mut report in fresh {
        match existing_by_key.remove(&report.key()) {
            Some(current) => {
                if report.content_eq(&current) {
                    result.equal.push(current);
                } else {
                    report.id = current.id;
                    result.updated.push(report);
                }
            }
            None => result.updated.push(report),
        }
    }

    result.deleted = existing_by_key.into_values().collect();
    result.deleted.sort_by(|a, b| a.local_date.cmp(&b.local_date));

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::period::PeriodType;
    use crate::core::report::{Department, DepartmentMetrics, STORE_DEPARTMENT};

    fn report(local_date: &str, sales_total: f64, id: Option<&str>) -> Report {
        let mut metrics = DepartmentMetrics::default();
        metrics.own.sales_total = sales_total;
        Report {
            id: id.map(|i| i.to_string()),
            store: "parramatta".to_string(),
            period: PeriodType::Day,
            date: format!("{local_date}T07:00:00Z").parse().unwrap(),
            local_date: local_date.to_string(),
            days_open: 1,
            days_left: 0,
            prev_period_days_open: 0,
            prev_period_days_left: 0,
            prev_year_days_open: 0,
            prev_year_days_left: 0,
            departments: vec![Department {
                name: STORE_DEPARTMENT.to_string(),
                metrics,
            }],
        }
    }

    #[test]
    fn changed_report_carries_existing_id() {
        let existing = vec![report("2024-01-10", 100.0, Some("abc123"))];
        let fresh = vec![report("2024-01-10", 110.0, None)];

        let diff = diff_reports(existing, fresh);
        assert_eq!(diff.updated.len(), 1);
        assert_eq!(diff.updated[0].id.as_deref(), Some("abc123"));
        assert!(diff.deleted.is_empty());
        assert!(diff.equal.is_empty());
    }

    #[test]
    fn identical_report_is_equal_not_updated() {
        let existing = vec![report("2024-01-10", 100.0, Some("abc123"))];
        let fresh = vec![report("2024-01-10", 100.0, None)];

        let diff = diff_reports(existing, fresh);
        assert!(diff.updated.is_empty());
        assert!(diff.deleted.is_empty());
        assert_eq!(diff.equal.len(), 1);
        assert_eq!(diff.equal[0].id.as_deref(), Some("abc123"));
    }

    #[test]
    fn unmatched_fresh_report_is_a_create() {
        let fresh = vec![report("2024-01-10", 100.0, None)];
        let diff = diff_reports(Vec::new(), fresh);
        assert_eq!(diff.updated.len(), 1);
        assert!(diff.updated[0].id.is_none());
    }

    #[test]
    fn unmatched_existing_reports_are_deleted() {
        let existing = vec![
            report("2024-01-09", 50.0, Some("old")),
            report("2024-01-10", 100.0, Some("abc123")),
        ];
        let fresh = vec![report("2024-01-10", 100.0, None)];

        let diff = diff_reports(existing, fresh);
        assert!(diff.updated.is_empty());
        assert_eq!(diff.equal.len(), 1);
        assert_eq!(diff.deleted.len(), 1);
        assert_eq!(diff.deleted[0].local_date, "2024-01-09");
    }

    #[test]
    fn keys_distinguish_period_types() {
        let mut weekly = report("2024-01-10", 100.0, Some("weekly"));
        weekly.period = PeriodType::Week;
        let fresh = vec![report("2024-01-10", 100.0, None)];

        let diff = diff_reports(vec![weekly], fresh);
        // Different keys: one create, one delete.
        assert_eq!(diff.updated.len(), 1);
        assert_eq!(diff.deleted.len(), 1);
    }

    #[test]
    fn rerun_against_own_output_is_a_noop() {
        let fresh = vec![
            report("2024-01-09", 50.0, None),
            report("2024-01-10", 100.0, None),
        ];
        let first = diff_reports(Vec::new(), fresh.clone());
        assert_eq!(first.updated.len(), 2);

        // Persist the first run's output (ids assigned by the backend, and
        // a wire round-trip in between), then recompute identically.
        let persisted: Vec<Report> = first
            .updated
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let json = serde_json::to_value(r).unwrap();
                let mut stored: Report = serde_json::from_value(json).unwrap();
                stored.id = Some(format!("id-{i}"));
                stored
            })
            .collect();

        let second = diff_reports(persisted, fresh);
        assert!(second.updated.is_empty());
        assert!(second.deleted.is_empty());
        assert_eq!(second.equal.len(), 2);
    }
}
