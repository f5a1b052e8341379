//! Raw event streams as the backend returns them. Events are read-only
//! inputs; bucketing and aggregation never mutate them.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::core::report::Report;
use crate::core::targets::YearTargets;

/// One row of the store- or department-level sales stream.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SaleEvent {
    pub(crate) date: DateTime<Utc>,
    /// Absent on the store-level stream.
    #[serde(default)]
    pub(crate) department: Option<String>,
    #[serde(default)]
    pub(crate) total: f64,
    #[serde(default)]
    pub(crate) subtotal: f64,
    #[serde(default)]
    pub(crate) tax: f64,
    #[serde(default)]
    pub(crate) discount: f64,
    #[serde(default)]
    pub(crate) transactions: i64,
    #[serde(default)]
    pub(crate) units: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WageEvent {
    pub(crate) date: DateTime<Utc>,
    pub(crate) department: String,
    #[serde(default)]
    pub(crate) total: f64,
    #[serde(default)]
    pub(crate) hours: f64,
    #[serde(default)]
    pub(crate) employees: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BookingEvent {
    pub(crate) date: DateTime<Utc>,
    pub(crate) department: String,
    #[serde(default)]
    pub(crate) bookings: i64,
}

/// Everything the window query returns for one store run.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct WindowData {
    #[serde(default)]
    pub(crate) reports: Vec<Report>,
    #[serde(default, rename = "deptSales")]
    pub(crate) dept_sales: Vec<SaleEvent>,
    #[serde(default)]
    pub(crate) sales: Vec<SaleEvent>,
    #[serde(default)]
    pub(crate) wages: Vec<WageEvent>,
    #[serde(default)]
    pub(crate) bookings: Vec<BookingEvent>,
    #[serde(default)]
    pub(crate) targets: Vec<YearTargets>,
}
