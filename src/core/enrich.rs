//! Comparative enrichment: merges previous-period and previous-year
//! metrics into each computed report.
//!
//! Comparison reports are located in the current batch first; each missing
//! key costs exactly one backend lookup. Lookups for different reports run
//! concurrently.

use rayon::prelude::*;
use serde_json::json;
use std::collections::HashMap;

use crate::core::metrics::MetricsRecord;
use crate::core::report::Report;
use crate::error::{AppError, GraphError};
use crate::graphql::client::Transport;
use crate::graphql::queries;
use crate::store::StoreConfig;

pub(crate) fn append_comparisons(
    reports: Vec<Report>,
    store: &StoreConfig,
    transport: &dyn Transport,
) -> Result<Vec<Report>, AppError> {
    // Pre-enrichment snapshot; in-window comparisons resolve here without
    // touching the backend.
    let batch: HashMap<String, Report> = reports
        .iter()
        .map(|r| (r.local_date.clone(), r.clone()))
        .collect();

    reports
        .into_par_iter()
        .map(|report| enrich_one(report, &batch, store, transport))
        .collect()
}

fn enrich_one(
    mut report: Report,
    batch: &HashMap<String, Report>,
    store: &StoreConfig,
    transport: &dyn Transport,
) -> Result<Report, AppError> {
    let period = report.period;
    let local = report.date.with_timezone(&store.timezone).date_naive();

    let prev_period_key = period.bucket_key(period.previous_period(local));
    let prev_year_key = period.bucket_key(period.previous_year(local));

    let prev_period = locate(&prev_period_key, &report, batch, transport)?;
    let prev_year = locate(&prev_year_key, &report, batch, transport)?;

    let (open, left) = day_counts(prev_period.as_ref());
    report.prev_period_days_open = open;
    report.prev_period_days_left = left;
    let (open, left) = day_counts(prev_year.as_ref());
    report.prev_year_days_open = open;
    report.prev_year_days_left = left;

    for dept in &mut report.departments {
        dept.metrics.prev_period = comparison_metrics(&dept.name, prev_period.as_ref());
        dept.metrics.prev_year = comparison_metrics(&dept.name, prev_year.as_ref());
    }

    Ok(report)
}

/// Same store, same type, given key: the batch wins, otherwise one backend
/// lookup. `None` when the comparison period was never persisted.
fn locate(
    local_date: &str,
    report: &Report,
    batch: &HashMap<String, Report>,
    transport: &dyn Transport,
) -> Result<Option<Report>, AppError> {
    if let Some(found) = batch.get(local_date) {
        return Ok(Some(found.clone()));
    }

    let data = transport.query(
        queries::prev_report_query(),
        json!({
            "store": report.store,
            "local_date": local_date,
            "type": report.period.name(),
        }),
    )?;

    match data.get("report") {
        Some(value) if !value.is_null() => {
            let found: Report =
                serde_json::from_value(value.clone()).map_err(GraphError::from)?;
            Ok(Some(found))
        }
        _ => Ok(None),
    }
}

fn day_counts(comparison: Option<&Report>) -> (i64, i64) {
    comparison.map_or((0, 0), |c| (c.days_open, c.days_left))
}

/// The comparison department's own metrics, or the zero record so the
/// prefixed set is always fully populated.
fn comparison_metrics(name: &str, comparison: Option<&Report>) -> MetricsRecord {
    comparison
        .and_then(|c| c.departments.iter().find(|d| d.name == name))
        .map(|d| d.metrics.own)
        .unwrap_or_default()
}
