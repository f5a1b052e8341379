//! Metric reduction: sales and wage sums, KPI derivation, and the wire
//! field map shared by serialization and the mutation builder.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::core::events::{SaleEvent, WageEvent};

/// Round to two decimal places; currency sums and quotients are finalized
/// through this.
pub(crate) fn round2(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    (v * 100.0).round() / 100.0
}

/// Division with the zero rule: a zero operand yields 0, never NaN or an
/// unbounded value. The quotient carries two decimal places.
pub(crate) fn divide(numerator: f64, denominator: f64) -> f64 {
    if numerator == 0.0 || denominator == 0.0 {
        return 0.0;
    }
    round2(numerator / denominator)
}

/// The full metric field set for one department. Every field is always
/// present; missing inputs fill with the zero default so downstream
/// comparisons never see absent values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct MetricsRecord {
    pub(crate) sales_target: f64,
    pub(crate) sales_total: f64,
    pub(crate) sales_subtotal: f64,
    pub(crate) sales_tax: f64,
    pub(crate) sales_discount: f64,
    pub(crate) sales_transactions: i64,
    pub(crate) sales_units: i64,
    pub(crate) units_per_transaction: f64,
    pub(crate) avg_transaction_value: f64,
    pub(crate) average_unit_value: f64,
    pub(crate) average_hourly_productivity: f64,
    pub(crate) wage_cost_percent: f64,
    pub(crate) staff_count: i64,
    pub(crate) staff_hours: f64,
    pub(crate) staff_wages: f64,
    pub(crate) bookings: i64,
}

/// Wire value for one metric field. Counts stay integral; everything else
/// is a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum MetricValue {
    Float(f64),
    Int(i64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Float(v) => write!(f, "{v}"),
            MetricValue::Int(v) => write!(f, "{v}"),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Float(v) => serializer.serialize_f64(*v),
            MetricValue::Int(v) => serializer.serialize_i64(*v),
        }
    }
}

impl MetricsRecord {
    /// Field/value pairs in wire order.
    pub(crate) fn entries(&self) -> [(&'static str, MetricValue); 16] {
        use MetricValue::{Float, Int};
        [
            ("sales_target", Float(self.sales_target)),
            ("sales_total", Float(self.sales_total)),
            ("sales_subtotal", Float(self.sales_subtotal)),
            ("sales_tax", Float(self.sales_tax)),
            ("sales_discount", Float(self.sales_discount)),
            ("sales_transactions", Int(self.sales_transactions)),
            ("sales_units", Int(self.sales_units)),
            ("units_per_transaction", Float(self.units_per_transaction)),
            ("avg_transaction_value", Float(self.avg_transaction_value)),
            ("average_unit_value", Float(self.average_unit_value)),
            (
                "average_hourly_productivity",
                Float(self.average_hourly_productivity),
            ),
            ("wage_cost_percent", Float(self.wage_cost_percent)),
            ("staff_count", Int(self.staff_count)),
            ("staff_hours", Float(self.staff_hours)),
            ("staff_wages", Float(self.staff_wages)),
            ("bookings", Int(self.bookings)),
        ]
    }

    /// Rebuild a record from a flat wire map under the given field prefix.
    /// Absent fields take their zero default.
    pub(crate) fn from_map(prefix: &str, raw: &HashMap<String, Value>) -> Self {
        let float = |name: &str| {
            raw.get(&format!("{prefix}{name}"))
                .and_then(Value::as_f64)
                .unwrap_or(0.0)
        };
        let int = |name: &str| {
            raw.get(&format!("{prefix}{name}"))
                .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
                .unwrap_or(0)
        };
        MetricsRecord {
            sales_target: float("sales_target"),
            sales_total: float("sales_total"),
            sales_subtotal: float("sales_subtotal"),
            sales_tax: float("sales_tax"),
            sales_discount: float("sales_discount"),
            sales_transactions: int("sales_transactions"),
            sales_units: int("sales_units"),
            units_per_transaction: float("units_per_transaction"),
            avg_transaction_value: float("avg_transaction_value"),
            average_unit_value: float("average_unit_value"),
            average_hourly_productivity: float("average_hourly_productivity"),
            wage_cost_percent: float("wage_cost_percent"),
            staff_count: int("staff_count"),
            staff_hours: float("staff_hours"),
            staff_wages: float("staff_wages"),
            bookings: int("bookings"),
        }
    }

    /// Reduce one department's (or the whole store's) event lists into a
    /// complete record: defaults first, observed sums and derived KPIs on
    /// top.
    pub(crate) fn aggregate(
        sales: &[SaleEvent],
        wage_lists: &[&[WageEvent]],
        bookings: i64,
        target: f64,
        in_progress: bool,
    ) -> Self {
        let mut record = MetricsRecord::default();
        sales_metrics(&mut record, sales, target);
        wage_metrics(&mut record, wage_lists);
        record.bookings = bookings;
        kpi_metrics(&mut record, in_progress);
        record
    }
}

fn sales_metrics(record: &mut MetricsRecord, sales: &[SaleEvent], target: f64) {
    record.sales_target = target;
    record.sales_total = round2(sales.iter().map(|s| s.total).sum());
    record.sales_subtotal = round2(sales.iter().map(|s| s.subtotal).sum());
    record.sales_tax = round2(sales.iter().map(|s| s.tax).sum());
    record.sales_discount = round2(sales.iter().map(|s| s.discount).sum());
    record.sales_transactions = sales.iter().map(|s| s.transactions).sum();
    record.sales_units = sales.iter().map(|s| s.units).sum();
}

fn wage_metrics(record: &mut MetricsRecord, wage_lists: &[&[WageEvent]]) {
    let mut hours = 0.0;
    let mut wages = 0.0;
    let mut staff: HashSet<&str> = HashSet::new();

    for list in wage_lists {
        hours += round2(list.iter().map(|w| w.hours).sum());
        wages += round2(list.iter().map(|w| w.total).sum());
        for wage in *list {
            for employee in &wage.employees {
                staff.insert(employee.as_str());
            }
        }
    }

    record.staff_hours = round2(hours);
    record.staff_wages = round2(wages);
    record.staff_count = staff.len() as i64;
}

fn kpi_metrics(record: &mut MetricsRecord, in_progress: bool) {
    record.units_per_transaction = divide(
        record.sales_units as f64,
        record.sales_transactions as f64,
    );
    record.average_unit_value = divide(record.sales_subtotal, record.sales_units as f64);
    record.avg_transaction_value =
        divide(record.sales_subtotal, record.sales_transactions as f64);

    // Labor ratios over a partial period mislead; suppress until the period
    // is complete.
    if in_progress {
        record.wage_cost_percent = 0.0;
        record.average_hourly_productivity = 0.0;
    } else {
        record.wage_cost_percent = divide(100.0 * record.staff_wages, record.sales_subtotal);
        record.average_hourly_productivity = divide(record.sales_subtotal, record.staff_hours);
    }
}
