//! Budget target tree: year -> week/month slot -> per-department figures.

use serde::Deserialize;
use std::collections::HashMap;

/// Budget figures for one period slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub(crate) struct TargetFigures {
    #[serde(default)]
    pub(crate) total: f64,
    #[serde(default)]
    pub(crate) retail: f64,
    #[serde(default)]
    pub(crate) daycare: f64,
    #[serde(default)]
    pub(crate) grooming: f64,
}

impl TargetFigures {
    pub(crate) fn department(&self, name: &str) -> f64 {
        match name {
            "retail" => self.retail,
            "daycare" => self.daycare,
            "grooming" => self.grooming,
            _ => 0.0,
        }
    }
}

/// One year of targets as the backend returns them: 52 week slots keyed
/// "w1".."w52" and 12 month slots keyed "jan".."dec", any of which may be
/// null.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct YearTargets {
    pub(crate) year: i32,
    #[serde(default)]
    pub(crate) weeks: HashMap<String, Option<TargetFigures>>,
    #[serde(default)]
    pub(crate) months: HashMap<String, Option<TargetFigures>>,
}

const MONTH_KEYS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// All fetched years, indexed for lookup. Absent years and empty slots
/// resolve to the zero record rather than failing.
#[derive(Debug, Default)]
pub(crate) struct TargetTree {
    years: HashMap<i32, YearTargets>,
}

impl TargetTree {
    pub(crate) fn from_years(years: Vec<YearTargets>) -> Self {
        TargetTree {
            years: years.into_iter().map(|y| (y.year, y)).collect(),
        }
    }

    pub(crate) fn week(&self, year: i32, week: u32) -> TargetFigures {
        self.years
            .get(&year)
            .and_then(|y| y.weeks.get(&format!("w{week}")))
            .copied()
            .flatten()
            .unwrap_or_default()
    }

    pub(crate) fn month(&self, year: i32, month: u32) -> TargetFigures {
        let Some(key) = MONTH_KEYS.get(month.saturating_sub(1) as usize) else {
            return TargetFigures::default();
        };
        self.years
            .get(&year)
            .and_then(|y| y.months.get(*key))
            .copied()
            .flatten()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figures(total: f64) -> TargetFigures {
        TargetFigures {
            total,
            retail: total / 2.0,
            daycare: total / 4.0,
            grooming: total / 4.0,
        }
    }

    fn tree() -> TargetTree {
        let mut weeks = HashMap::new();
        weeks.insert("w3".to_string(), Some(figures(1000.0)));
        weeks.insert("w4".to_string(), None);
        let mut months = HashMap::new();
        months.insert("jan".to_string(), Some(figures(4000.0)));
        TargetTree::from_years(vec![YearTargets {
            year: 2024,
            weeks,
            months,
        }])
    }

    #[test]
    fn week_lookup_hits() {
        let t = tree().week(2024, 3);
        assert_eq!(t.total, 1000.0);
        assert_eq!(t.department("retail"), 500.0);
    }

    #[test]
    fn null_week_slot_is_zero() {
        assert_eq!(tree().week(2024, 4), TargetFigures::default());
    }

    #[test]
    fn missing_week_is_zero() {
        assert_eq!(tree().week(2024, 17), TargetFigures::default());
    }

    #[test]
    fn missing_year_is_zero() {
        assert_eq!(tree().week(2019, 3), TargetFigures::default());
        assert_eq!(tree().month(2019, 1), TargetFigures::default());
    }

    #[test]
    fn month_lookup_hits() {
        assert_eq!(tree().month(2024, 1).total, 4000.0);
        assert_eq!(tree().month(2024, 2), TargetFigures::default());
    }

    #[test]
    fn month_out_of_range_is_zero() {
        assert_eq!(tree().month(2024, 0), TargetFigures::default());
        assert_eq!(tree().month(2024, 13), TargetFigures::default());
    }

    #[test]
    fn unknown_department_is_zero() {
        assert_eq!(figures(100.0).department("cafe"), 0.0);
    }

    #[test]
    fn deserializes_wire_shape() {
        let year: YearTargets = serde_json::from_value(serde_json::json!({
            "year": 2024,
            "weeks": { "w1": { "total": 10.0, "retail": 5.0 }, "w2": null },
            "months": { "jan": { "total": 40.0 } }
        }))
        .unwrap();
        let tree = TargetTree::from_years(vec![year]);
        assert_eq!(tree.week(2024, 1).total, 10.0);
        assert_eq!(tree.week(2024, 1).daycare, 0.0);
        assert_eq!(tree.week(2024, 2), TargetFigures::default());
        assert_eq!(tree.month(2024, 1).total, 40.0);
    }
}
