//! Core module - period model, bucketing, aggregation and reconciliation.

pub(crate) mod bucket;
pub(crate) mod enrich;
pub(crate) mod events;
pub(crate) mod metrics;
pub(crate) mod period;
pub(crate) mod report;
pub(crate) mod targets;
pub(crate) mod reconcile;

pub(crate) use bucket::bucket_events;
pub(crate) use enrich::append_comparisons;
pub(crate) use events::WindowData;
pub(crate) use period::PeriodType;
pub(crate) use reconcile::{DiffResult, diff_reports};
pub(crate) use report::build_report;
pub(crate) use targets::TargetTree;
