//! The persisted report entity and its assembly from a bucket.

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::core::bucket::{Bucket, DeptBucket};
use crate::core::events::WageEvent;
use crate::core::metrics::MetricsRecord;
use crate::core::period::PeriodType;
use crate::store::{HolidayCalendar, StoreConfig};

/// Fixed department vocabulary; events naming anything else are ignored.
pub(crate) const DEPARTMENTS: [&str; 3] = ["daycare", "grooming", "retail"];

/// Synthetic department holding store-wide totals.
pub(crate) const STORE_DEPARTMENT: &str = "store";

/// Own metrics plus the previous-period and previous-year comparison sets.
/// On the wire this is one flat map with `prev_period_` / `prev_year_`
/// prefixes; absent fields fill from the zero defaults on the way in.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DepartmentMetrics {
    pub(crate) own: MetricsRecord,
    pub(crate) prev_period: MetricsRecord,
    pub(crate) prev_year: MetricsRecord,
}

impl DepartmentMetrics {
    fn sets(&self) -> [(&'static str, &MetricsRecord); 3] {
        [
            ("", &self.own),
            ("prev_period_", &self.prev_period),
            ("prev_year_", &self.prev_year),
        ]
    }
}

impl Serialize for DepartmentMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(48))?;
        for (prefix, record) in self.sets() {
            for (name, value) in record.entries() {
                if prefix.is_empty() {
                    map.serialize_entry(name, &value)?;
                } else {
                    map.serialize_entry(&format!("{prefix}{name}"), &value)?;
                }
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DepartmentMetrics {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(DepartmentMetrics {
            own: MetricsRecord::from_map("", &raw),
            prev_period: MetricsRecord::from_map("prev_period_", &raw),
            prev_year: MetricsRecord::from_map("prev_year_", &raw),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Department {
    pub(crate) name: String,
    pub(crate) metrics: DepartmentMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Report {
    /// Backend document id; absent on freshly computed reports.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,
    pub(crate) store: String,
    #[serde(rename = "type")]
    pub(crate) period: PeriodType,
    /// Period start at the fixed local hour, in UTC.
    pub(crate) date: DateTime<Utc>,
    pub(crate) local_date: String,
    #[serde(default)]
    pub(crate) days_open: i64,
    #[serde(default)]
    pub(crate) days_left: i64,
    #[serde(default)]
    pub(crate) prev_period_days_open: i64,
    #[serde(default)]
    pub(crate) prev_period_days_left: i64,
    #[serde(default)]
    pub(crate) prev_year_days_open: i64,
    #[serde(default)]
    pub(crate) prev_year_days_left: i64,
    pub(crate) departments: Vec<Department>,
}

impl Report {
    /// Stable identity within a store: at most one report per key.
    pub(crate) fn key(&self) -> String {
        format!("{}-{}", self.local_date, self.period.name())
    }

    /// Field-for-field equality ignoring the backend id and department
    /// order.
    pub(crate) fn content_eq(&self, other: &Report) -> bool {
        if self.store != other.store
            || self.period != other.period
            || self.date != other.date
            || self.local_date != other.local_date
            || self.days_open != other.days_open
            || self.days_left != other.days_left
            || self.prev_period_days_open != other.prev_period_days_open
            || self.prev_period_days_left != other.prev_period_days_left
            || self.prev_year_days_open != other.prev_year_days_open
            || self.prev_year_days_left != other.prev_year_days_left
            || self.departments.len() != other.departments.len()
        {
            return false;
        }
        let index = |report: &'_ Report| -> BTreeMap<String, DepartmentMetrics> {
            report
                .departments
                .iter()
                .map(|d| (d.name.clone(), d.metrics.clone()))
                .collect()
        };
        index(self) == index(other)
    }
}

/// Reduce a bucket into its report: one metrics set per fixed department
/// plus the synthetic store aggregate, and the period's trading-day counts.
/// Comparison sets start zeroed; enrichment fills them afterwards.
pub(crate) fn build_report(
    store: &StoreConfig,
    bucket: &Bucket,
    holidays: &dyn HolidayCalendar,
    now: DateTime<Utc>,
    cutover_hour: u32,
) -> Report {
    let period = bucket.period;
    let in_progress = period.is_in_progress(now, bucket.date, store.timezone, cutover_hour);

    let today = now.with_timezone(&store.timezone).date_naive();
    let (days_open, days_left) = store.open_days(
        period.start_of(bucket.date),
        period.end_of(bucket.date),
        today,
        holidays,
    );

    let empty = DeptBucket::default();
    let mut departments = Vec::with_capacity(DEPARTMENTS.len() + 1);
    let mut store_wages: Vec<&[WageEvent]> = Vec::new();
    let mut store_bookings = 0;

    for name in DEPARTMENTS {
        let dept = bucket.departments.get(name).unwrap_or(&empty);
        store_wages.push(&dept.wages);
        store_bookings += dept.bookings;

        let own = MetricsRecord::aggregate(
            &dept.sales,
            &[&dept.wages],
            dept.bookings,
            bucket.target.department(name),
            in_progress,
        );
        departments.push(Department {
            name: name.to_string(),
            metrics: DepartmentMetrics {
                own,
                ..Default::default()
            },
        });
    }

    let store_own = MetricsRecord::aggregate(
        &bucket.sales,
        &store_wages,
        store_bookings,
        bucket.target.total,
        in_progress,
    );
    departments.push(Department {
        name: STORE_DEPARTMENT.to_string(),
        metrics: DepartmentMetrics {
            own: store_own,
            ..Default::default()
        },
    });

    Report {
        id: None,
        store: store.name.clone(),
        period,
        date: bucket.instant,
        local_date: bucket.local_date.clone(),
        days_open,
        days_left,
        prev_period_days_open: 0,
        prev_period_days_left: 0,
        prev_year_days_open: 0,
        prev_year_days_left: 0,
        departments,
    }
}
