//! Period bucketing: groups raw events by bucket key, prunes buckets that
//! should not produce a report, and snapshots each bucket's target.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;

use crate::core::events::{BookingEvent, SaleEvent, WageEvent};
use crate::core::period::PeriodType;
use crate::core::targets::{TargetFigures, TargetTree};

#[derive(Debug, Default)]
pub(crate) struct DeptBucket {
    pub(crate) sales: Vec<SaleEvent>,
    pub(crate) wages: Vec<WageEvent>,
    pub(crate) bookings: i64,
}

/// Transient aggregation unit for one period instance. Discarded once
/// reduced into a report.
#[derive(Debug)]
pub(crate) struct Bucket {
    pub(crate) period: PeriodType,
    /// Bucket key, e.g. `2024-01-10`, `2024-2`, `2024-01`.
    pub(crate) local_date: String,
    /// Store-local start date of the period.
    pub(crate) date: NaiveDate,
    /// Representative instant at the fixed local hour.
    pub(crate) instant: DateTime<Utc>,
    pub(crate) target: TargetFigures,
    /// Store-level sales stream.
    pub(crate) sales: Vec<SaleEvent>,
    pub(crate) departments: HashMap<String, DeptBucket>,
}

fn bucket_for<'a>(
    buckets: &'a mut HashMap<String, Bucket>,
    period: PeriodType,
    tz: Tz,
    date: NaiveDate,
) -> &'a mut Bucket {
    let key = period.bucket_key(date);
    buckets.entry(key.clone()).or_insert_with(|| Bucket {
        period,
        local_date: key,
        date: period.start_of(date),
        instant: period.localized_instant(date, tz),
        target: TargetFigures::default(),
        sales: Vec::new(),
        departments: HashMap::new(),
    })
}

/// Place every event into its period bucket (created lazily on first
/// reference), drop buckets that are still in the future or hold no sale
/// and no wage events, and resolve each surviving bucket's target.
/// Assignment is a pure function of event date and period type.
pub(crate) fn bucket_events(
    period: PeriodType,
    tz: Tz,
    sales: Vec<SaleEvent>,
    dept_sales: Vec<SaleEvent>,
    wages: Vec<WageEvent>,
    bookings: Vec<BookingEvent>,
    targets: &TargetTree,
    now: DateTime<Utc>,
) -> HashMap<String, Bucket> {
    let mut buckets: HashMap<String, Bucket> = HashMap::new();
    let local_date = |instant: &DateTime<Utc>| instant.with_timezone(&tz).date_naive();

    for sale in sales {
        let date = local_date(&sale.date);
        bucket_for(&mut buckets, period, tz, date).sales.push(sale);
    }

    for sale in dept_sales {
        let Some(name) = sale.department.as_deref().map(str::to_lowercase) else {
            continue;
        };
        let date = local_date(&sale.date);
        bucket_for(&mut buckets, period, tz, date)
            .departments
            .entry(name)
            .or_default()
            .sales
            .push(sale);
    }

    for wage in wages {
        let name = wage.department.to_lowercase();
        let date = local_date(&wage.date);
        bucket_for(&mut buckets, period, tz, date)
            .departments
            .entry(name)
            .or_default()
            .wages
            .push(wage);
    }

    for booking in bookings {
        let name = booking.department.to_lowercase();
        let date = local_date(&booking.date);
        bucket_for(&mut buckets, period, tz, date)
            .departments
            .entry(name)
            .or_default()
            .bookings += booking.bookings;
    }

    buckets.retain(|_, bucket| {
        if bucket.instant > now {
            return false;
        }
        let has_sales = !bucket.sales.is_empty()
            || bucket.departments.values().any(|d| !d.sales.is_empty());
        let has_wages = bucket.departments.values().any(|d| !d.wages.is_empty());
        has_sales || has_wages
    });

    for bucket in buckets.values_mut() {
        bucket.target = period.resolve_target(bucket.date, targets);
    }

    buckets
}
