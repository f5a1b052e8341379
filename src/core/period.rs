//! Calendar period model: boundary math, bucket keys and in-progress rules
//! for the three report granularities.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::core::targets::{TargetFigures, TargetTree};

/// Local hour used for representative instants. Anchoring away from midnight
/// keeps bucket instants stable across daylight-saving transitions.
const REPRESENTATIVE_HOUR: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PeriodType {
    Day,
    Week,
    Month,
}

impl PeriodType {
    pub(crate) fn name(self) -> &'static str {
        match self {
            PeriodType::Day => "day",
            PeriodType::Week => "week",
            PeriodType::Month => "month",
        }
    }

    /// Granularity the backend groups raw events by for this period.
    pub(crate) fn query_granularity(self) -> &'static str {
        match self {
            PeriodType::Day | PeriodType::Week => "day",
            PeriodType::Month => "month",
        }
    }

    pub(crate) fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            PeriodType::Day => date,
            PeriodType::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            PeriodType::Month => date.with_day(1).unwrap_or(date),
        }
    }

    pub(crate) fn end_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            PeriodType::Day => date,
            PeriodType::Week => self.start_of(date) + Duration::days(6),
            PeriodType::Month => {
                let first = self.start_of(date);
                first
                    .checked_add_months(Months::new(1))
                    .map(|next| next - Duration::days(1))
                    .unwrap_or(first)
            }
        }
    }

    /// Deterministic bucket key: `YYYY-MM-DD`, `YYYY-W` (ISO week year and
    /// unpadded ISO week number) or `YYYY-MM`.
    pub(crate) fn bucket_key(self, date: NaiveDate) -> String {
        match self {
            PeriodType::Day => date.format("%Y-%m-%d").to_string(),
            PeriodType::Week => {
                let week = date.iso_week();
                format!("{}-{}", week.year(), week.week())
            }
            PeriodType::Month => date.format("%Y-%m").to_string(),
        }
    }

    pub(crate) fn previous_period(self, date: NaiveDate) -> NaiveDate {
        match self {
            PeriodType::Day => date - Duration::days(1),
            PeriodType::Week => date - Duration::days(7),
            PeriodType::Month => date.checked_sub_months(Months::new(1)).unwrap_or(date),
        }
    }

    /// Same date one year back, clamped to the end of shorter months.
    pub(crate) fn previous_year(self, date: NaiveDate) -> NaiveDate {
        date.checked_sub_months(Months::new(12)).unwrap_or(date)
    }

    /// Representative instant of the period containing `date`: the period
    /// start at a fixed local hour, converted to UTC.
    pub(crate) fn localized_instant(self, date: NaiveDate, tz: Tz) -> DateTime<Utc> {
        let naive =
            self.start_of(date).and_time(NaiveTime::MIN) + Duration::hours(REPRESENTATIVE_HOUR);
        tz.from_local_datetime(&naive)
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive))
            .with_timezone(&Utc)
    }

    /// Budget lookup for the period containing `date`. Day periods have no
    /// slot in the 52-week/12-month tree and always resolve to zero.
    pub(crate) fn resolve_target(self, date: NaiveDate, targets: &TargetTree) -> TargetFigures {
        match self {
            PeriodType::Day => TargetFigures::default(),
            PeriodType::Week => {
                let week = date.iso_week();
                // Week 53 folds into the tree's fixed 52-slot shape.
                targets.week(week.year(), week.week().min(52))
            }
            PeriodType::Month => targets.month(date.year(), date.month()),
        }
    }

    /// Whether the period's trading activity is still incomplete. Day
    /// periods stay in progress until the store-local cutover hour passes;
    /// week and month periods aggregate enough data to never count as in
    /// progress once started.
    pub(crate) fn is_in_progress(
        self,
        now: DateTime<Utc>,
        date: NaiveDate,
        tz: Tz,
        cutover_hour: u32,
    ) -> bool {
        match self {
            PeriodType::Week | PeriodType::Month => false,
            PeriodType::Day => {
                let local_now = now.with_timezone(&tz);
                let today = local_now.date_naive();
                date > today || (date == today && local_now.hour() < cutover_hour)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::targets::YearTargets;
    use std::collections::HashMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sydney() -> Tz {
        chrono_tz::Australia::Sydney
    }

    #[test]
    fn day_boundaries_are_identity() {
        let date = d(2024, 1, 10);
        assert_eq!(PeriodType::Day.start_of(date), date);
        assert_eq!(PeriodType::Day.end_of(date), date);
    }

    #[test]
    fn week_starts_monday_ends_sunday() {
        // 2024-01-10 is a Wednesday
        assert_eq!(PeriodType::Week.start_of(d(2024, 1, 10)), d(2024, 1, 8));
        assert_eq!(PeriodType::Week.end_of(d(2024, 1, 10)), d(2024, 1, 14));
        // Monday maps to itself
        assert_eq!(PeriodType::Week.start_of(d(2024, 1, 8)), d(2024, 1, 8));
    }

    #[test]
    fn month_boundaries() {
        assert_eq!(PeriodType::Month.start_of(d(2024, 2, 15)), d(2024, 2, 1));
        assert_eq!(PeriodType::Month.end_of(d(2024, 2, 15)), d(2024, 2, 29));
        assert_eq!(PeriodType::Month.end_of(d(2023, 12, 2)), d(2023, 12, 31));
    }

    #[test]
    fn bucket_keys() {
        assert_eq!(PeriodType::Day.bucket_key(d(2024, 1, 10)), "2024-01-10");
        assert_eq!(PeriodType::Week.bucket_key(d(2024, 1, 10)), "2024-2");
        assert_eq!(PeriodType::Month.bucket_key(d(2024, 1, 10)), "2024-01");
    }

    #[test]
    fn week_key_uses_iso_week_year_across_boundary() {
        // 2024-12-30 is a Monday belonging to ISO week 1 of 2025
        assert_eq!(PeriodType::Week.bucket_key(d(2024, 12, 30)), "2025-1");
        // 2021-01-01 belongs to ISO week 53 of 2020
        assert_eq!(PeriodType::Week.bucket_key(d(2021, 1, 1)), "2020-53");
    }

    #[test]
    fn previous_period_per_variant() {
        assert_eq!(PeriodType::Day.previous_period(d(2024, 1, 1)), d(2023, 12, 31));
        assert_eq!(PeriodType::Week.previous_period(d(2024, 1, 10)), d(2024, 1, 3));
        assert_eq!(PeriodType::Month.previous_period(d(2024, 3, 31)), d(2024, 2, 29));
    }

    #[test]
    fn previous_year_clamps_leap_day() {
        assert_eq!(PeriodType::Day.previous_year(d(2024, 2, 29)), d(2023, 2, 28));
        assert_eq!(PeriodType::Month.previous_year(d(2024, 6, 15)), d(2023, 6, 15));
    }

    #[test]
    fn localized_instant_fixed_local_hour() {
        // AEDT (UTC+11) in January: 07:00 local is 20:00 UTC the day before.
        let instant = PeriodType::Day.localized_instant(d(2024, 1, 10), sydney());
        assert_eq!(instant.to_rfc3339(), "2024-01-09T20:00:00+00:00");
        // AEST (UTC+10) in June.
        let instant = PeriodType::Day.localized_instant(d(2024, 6, 10), sydney());
        assert_eq!(instant.to_rfc3339(), "2024-06-09T21:00:00+00:00");
    }

    #[test]
    fn localized_instant_uses_period_start() {
        let week = PeriodType::Week.localized_instant(d(2024, 1, 10), sydney());
        let monday = PeriodType::Week.localized_instant(d(2024, 1, 8), sydney());
        assert_eq!(week, monday);
    }

    fn tree_with_week(year: i32, key: &str, total: f64) -> TargetTree {
        let mut weeks = HashMap::new();
        weeks.insert(
            key.to_string(),
            Some(TargetFigures {
                total,
                ..Default::default()
            }),
        );
        TargetTree::from_years(vec![YearTargets {
            year,
            weeks,
            months: HashMap::new(),
        }])
    }

    #[test]
    fn day_target_is_always_zero() {
        let targets = tree_with_week(2024, "w2", 500.0);
        assert_eq!(
            PeriodType::Day.resolve_target(d(2024, 1, 10), &targets),
            TargetFigures::default()
        );
    }

    #[test]
    fn week_target_resolves_by_iso_week() {
        let targets = tree_with_week(2024, "w2", 500.0);
        assert_eq!(
            PeriodType::Week.resolve_target(d(2024, 1, 10), &targets).total,
            500.0
        );
    }

    #[test]
    fn week_53_folds_into_w52() {
        let targets = tree_with_week(2020, "w52", 900.0);
        // 2021-01-01 is ISO week 53 of 2020
        assert_eq!(
            PeriodType::Week.resolve_target(d(2021, 1, 1), &targets).total,
            900.0
        );
    }

    #[test]
    fn month_target_resolves_by_abbreviation() {
        let mut months = HashMap::new();
        months.insert(
            "mar".to_string(),
            Some(TargetFigures {
                total: 1200.0,
                ..Default::default()
            }),
        );
        let targets = TargetTree::from_years(vec![YearTargets {
            year: 2024,
            weeks: HashMap::new(),
            months,
        }]);
        assert_eq!(
            PeriodType::Month.resolve_target(d(2024, 3, 20), &targets).total,
            1200.0
        );
    }

    #[test]
    fn week_and_month_never_in_progress() {
        let now = "2024-01-10T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert!(!PeriodType::Week.is_in_progress(now, d(2024, 1, 10), sydney(), 17));
        assert!(!PeriodType::Month.is_in_progress(now, d(2024, 1, 10), sydney(), 17));
    }

    #[test]
    fn future_day_is_in_progress() {
        let now = "2024-01-10T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert!(PeriodType::Day.is_in_progress(now, d(2024, 1, 11), sydney(), 17));
    }

    #[test]
    fn today_in_progress_until_cutover() {
        // 2024-01-10 02:00 UTC is 13:00 AEDT on the 10th: before cutover.
        let before = "2024-01-10T02:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert!(PeriodType::Day.is_in_progress(before, d(2024, 1, 10), sydney(), 17));

        // 2024-01-10 07:00 UTC is 18:00 AEDT: cutover passed.
        let after = "2024-01-10T07:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert!(!PeriodType::Day.is_in_progress(after, d(2024, 1, 10), sydney(), 17));
    }

    #[test]
    fn cutover_hour_is_configurable() {
        // 13:00 AEDT counts as complete once the cutover is noon.
        let now = "2024-01-10T02:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert!(!PeriodType::Day.is_in_progress(now, d(2024, 1, 10), sydney(), 12));
    }

    #[test]
    fn past_day_is_not_in_progress() {
        let now = "2024-01-10T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert!(!PeriodType::Day.is_in_progress(now, d(2024, 1, 8), sydney(), 17));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PeriodType::Day).unwrap(), "\"day\"");
        let parsed: PeriodType = serde_json::from_str("\"week\"").unwrap();
        assert_eq!(parsed, PeriodType::Week);
    }
}
