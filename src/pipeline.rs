//! Per-store report pipeline and the multi-store fan-out.
//!
//! Each store runs fetch -> bucket -> aggregate -> enrich -> reconcile ->
//! write strictly in sequence; stores run concurrently and fail
//! independently of each other.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use rayon::prelude::*;
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::core::{
    PeriodType, TargetTree, WindowData, append_comparisons, bucket_events, build_report,
    diff_reports,
};
use crate::core::reconcile::DiffResult;
use crate::core::report::Report;
use crate::error::{AppError, GraphError};
use crate::graphql::Transport;
use crate::graphql::mutations::{chunk_mutations, report_mutation};
use crate::graphql::queries;
use crate::output::print_diff_table;
use crate::store::{AuHolidays, NETWORK_STORE, StoreConfig, StoreWire};

#[derive(Debug, Clone)]
pub(crate) struct RunOptions {
    pub(crate) period: PeriodType,
    pub(crate) from: NaiveDate,
    pub(crate) to: NaiveDate,
    pub(crate) stores: Vec<String>,
    pub(crate) dry_run: bool,
}

#[derive(Debug)]
pub(crate) struct StoreSummary {
    pub(crate) store: String,
    pub(crate) written: usize,
    pub(crate) deleted: usize,
    pub(crate) unchanged: usize,
}

/// Process every store, isolating failures: transient upstream signals skip
/// the store with a warning, anything else logs an error. Returns the
/// summaries of the stores that completed.
pub(crate) fn run(
    options: &RunOptions,
    config: &Config,
    transport: &dyn Transport,
) -> Vec<StoreSummary> {
    let now = Utc::now();
    options
        .stores
        .par_iter()
        .filter_map(
            |name| match process_store(name, options, config, transport, now) {
                Ok(summary) => {
                    info!(
                        store = %name,
                        written = summary.written,
                        deleted = summary.deleted,
                        unchanged = summary.unchanged,
                        "updated reports"
                    );
                    Some(summary)
                }
                Err(err) if err.is_transient() => {
                    warn!(store = %name, %err, "skipping store until upstream recovers");
                    None
                }
                Err(err) => {
                    error!(store = %name, %err, "store pipeline failed");
                    None
                }
            },
        )
        .collect()
}

fn fetch_store(
    name: &str,
    config: &Config,
    transport: &dyn Transport,
) -> Result<StoreConfig, AppError> {
    if name == NETWORK_STORE {
        let tz = Tz::from_str(&config.fallback_timezone).map_err(|_| AppError::InvalidTimezone {
            input: config.fallback_timezone.clone(),
        })?;
        return Ok(StoreConfig::network(tz));
    }

    let data = transport.query(queries::STORE_QUERY, json!({ "store": name }))?;
    match data.get("store") {
        Some(value) if !value.is_null() => {
            let wire: StoreWire =
                serde_json::from_value(value.clone()).map_err(GraphError::from)?;
            StoreConfig::from_wire(wire)
        }
        _ => Err(AppError::UnknownStore {
            name: name.to_string(),
        }),
    }
}

fn local_day_start(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
        .with_timezone(&Utc)
}

fn local_day_end(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    local_day_start(date, tz) + Duration::days(1) - Duration::milliseconds(1)
}

pub(crate) fn process_store(
    name: &str,
    options: &RunOptions,
    config: &Config,
    transport: &dyn Transport,
    now: DateTime<Utc>,
) -> Result<StoreSummary, AppError> {
    let period = options.period;
    let store = fetch_store(name, config, transport)?;
    let holidays = AuHolidays::for_state(store.state.as_deref());

    // Clamp the window to the end of the current store-local day.
    let today = now.with_timezone(&store.timezone).date_naive();
    let window_start = period.start_of(options.from);
    let window_end = period.end_of(options.to).min(today);
    if window_end < window_start {
        info!(store = %store.name, "window is entirely in the future, nothing to compute");
        return Ok(StoreSummary {
            store: store.name,
            written: 0,
            deleted: 0,
            unchanged: 0,
        });
    }

    info!(
        store = %store.name,
        period = period.name(),
        from = %window_start,
        to = %window_end,
        "computing reports"
    );

    let years: Vec<i32> = (window_start.year()..=window_end.year()).collect();
    let data = transport.query(
        queries::window_query(),
        json!({
            "store": store.name,
            "from": local_day_start(window_start, store.timezone).to_rfc3339(),
            "to": local_day_end(window_end, store.timezone).to_rfc3339(),
            "years": years,
            "group": period.query_granularity(),
            "type": period.name(),
        }),
    )?;
    let window: WindowData = serde_json::from_value(data).map_err(GraphError::from)?;

    let WindowData {
        reports: existing,
        dept_sales,
        sales,
        wages,
        bookings,
        targets,
    } = window;
    let targets = TargetTree::from_years(targets);

    let buckets = bucket_events(
        period,
        store.timezone,
        sales,
        dept_sales,
        wages,
        bookings,
        &targets,
        now,
    );

    let mut fresh: Vec<Report> = buckets
        .values()
        .map(|bucket| build_report(&store, bucket, &holidays, now, config.cutover_hour))
        .collect();
    fresh.sort_by(|a, b| a.local_date.cmp(&b.local_date));

    let fresh = append_comparisons(fresh, &store, transport)?;
    let diff = diff_reports(existing, fresh);

    let summary = StoreSummary {
        store: store.name.clone(),
        written: diff.updated.len(),
        deleted: diff.deleted.len(),
        unchanged: diff.equal.len(),
    };

    if options.dry_run {
        print_diff_table(&store.name, period, &diff);
        return Ok(summary);
    }

    submit(&store, &diff, config, transport)?;
    Ok(summary)
}

fn submit(
    store: &StoreConfig,
    diff: &DiffResult,
    config: &Config,
    transport: &dyn Transport,
) -> Result<(), AppError> {
    if !diff.updated.is_empty() {
        info!(store = %store.name, count = diff.updated.len(), "writing changed reports");
        let mutations: Vec<String> = diff.updated.iter().map(report_mutation).collect();
        // Chunks submit independently; a failure leaves earlier chunks
        // applied and the next run converges.
        chunk_mutations(&mutations, config.mutation_chunk_size)
            .par_iter()
            .try_for_each(|document| transport.mutate(document, json!({})).map(|_| ()))?;
    }

    let ids: Vec<&str> = diff.deleted.iter().filter_map(|r| r.id.as_deref()).collect();
    if !ids.is_empty() {
        info!(store = %store.name, count = ids.len(), "deleting stale reports");
        transport.mutate(
            queries::DELETE_REPORTS,
            json!({ "store": store.name, "ids": ids }),
        )?;
    }

    Ok(())
}
