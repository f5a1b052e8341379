//! Store configuration and trading-day arithmetic.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::Deserialize;
use std::str::FromStr;

use crate::error::AppError;
use crate::store::holidays::HolidayCalendar;

pub(crate) const NETWORK_STORE: &str = "network";

/// Store configuration as the backend returns it.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StoreWire {
    pub(crate) name: String,
    pub(crate) timezone: String,
    #[serde(default)]
    pub(crate) days_open: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) state: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct StoreConfig {
    pub(crate) name: String,
    pub(crate) timezone: Tz,
    /// Lower-cased weekday names the store trades on; empty means no
    /// trading-day calendar (day counts stay zero).
    pub(crate) days_open: Vec<String>,
    pub(crate) state: Option<String>,
}

impl StoreConfig {
    pub(crate) fn from_wire(wire: StoreWire) -> Result<Self, AppError> {
        let timezone =
            Tz::from_str(wire.timezone.trim()).map_err(|_| AppError::InvalidTimezone {
                input: wire.timezone.clone(),
            })?;
        Ok(StoreConfig {
            name: wire.name,
            timezone,
            days_open: wire
                .days_open
                .unwrap_or_default()
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            state: wire.state,
        })
    }

    /// The whole-network pseudo store has no configuration of its own.
    pub(crate) fn network(timezone: Tz) -> Self {
        StoreConfig {
            name: NETWORK_STORE.to_string(),
            timezone,
            days_open: Vec::new(),
            state: None,
        }
    }

    fn is_open(&self, date: NaiveDate, holidays: &dyn HolidayCalendar) -> bool {
        self.days_open
            .iter()
            .any(|d| d == weekday_name(date.weekday()))
            && !holidays.is_holiday(date)
    }

    /// Count trading days in `[from, to]` and how many of those are today
    /// or later.
    pub(crate) fn open_days(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        today: NaiveDate,
        holidays: &dyn HolidayCalendar,
    ) -> (i64, i64) {
        if self.days_open.is_empty() {
            return (0, 0);
        }
        let mut open = 0;
        let mut left = 0;
        let mut day = from;
        while day <= to {
            if self.is_open(day, holidays) {
                open += 1;
                if day >= today {
                    left += 1;
                }
            }
            day += Duration::days(1);
        }
        (open, left)
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
