//! Holiday calendar collaborator used for trading-day counting.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub(crate) trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// Australian public holidays: the national set plus Labour Day for states
/// observing it on a fixed weekday rule. Bank-only observances are not
/// trading holidays.
#[derive(Debug, Default)]
pub(crate) struct AuHolidays {
    state: Option<String>,
}

impl AuHolidays {
    pub(crate) fn for_state(state: Option<&str>) -> Self {
        AuHolidays {
            state: state.map(str::to_uppercase),
        }
    }
}

impl HolidayCalendar for AuHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        const FIXED: [(u32, u32); 5] = [(1, 1), (1, 26), (4, 25), (12, 25), (12, 26)];
        if FIXED.contains(&(date.month(), date.day())) {
            return true;
        }

        let easter = easter_sunday(date.year());
        if date == easter - Duration::days(2) || date == easter + Duration::days(1) {
            return true;
        }

        match self.state.as_deref() {
            Some("NSW") | Some("ACT") | Some("SA") => {
                date == nth_weekday(date.year(), 10, Weekday::Mon, 1)
            }
            Some("VIC") | Some("TAS") => date == nth_weekday(date.year(), 3, Weekday::Mon, 2),
            Some("QLD") | Some("NT") => date == nth_weekday(date.year(), 5, Weekday::Mon, 1),
            Some("WA") => date == nth_weekday(date.year(), 3, Weekday::Mon, 1),
            _ => false,
        }
    }
}

/// Gregorian computus (Meeus/Jones/Butcher); always a March or April date.
fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .unwrap_or_else(|| NaiveDate::from_yo_opt(year, 90).unwrap_or(NaiveDate::MIN))
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, nth: u8) -> NaiveDate {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, nth).unwrap_or(NaiveDate::MIN)
}
