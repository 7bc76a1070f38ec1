//! # Week Ranges
//!
//! Payroll and the cashbox disagree on what a week is.
//!
//! ```text
//!            Mon  Tue  Wed  Thu  Fri  Sat  Sun
//! salary     [──────────────────────────]          MondayToSaturday
//! cashbox    [───────────────────────────────]     MondayToSunday
//! ```
//!
//! Both are configurable. A Sunday under `MondayToSaturday` maps to the week
//! that started the Monday before, but is not contained in it: Sunday work
//! is never part of a salary period.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which days make up a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum WeekDefinition {
    /// Six-day week. Default for salaries and production.
    MondayToSaturday,
    /// Calendar week. Default for cashbox week views.
    MondayToSunday,
}

impl WeekDefinition {
    /// Default definition for salary periods.
    pub const SALARY_DEFAULT: WeekDefinition = WeekDefinition::MondayToSaturday;

    /// Default definition for cashbox week views.
    pub const CASHBOX_DEFAULT: WeekDefinition = WeekDefinition::MondayToSunday;

    /// Days after Monday on which the week ends.
    fn last_offset(&self) -> u64 {
        match self {
            WeekDefinition::MondayToSaturday => 5,
            WeekDefinition::MondayToSunday => 6,
        }
    }

    /// The week that `date` falls in.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use barberia_core::week::WeekDefinition;
    ///
    /// let wed = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
    /// let week = WeekDefinition::MondayToSaturday.range_containing(wed);
    /// assert_eq!(week.start, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    /// assert_eq!(week.end, NaiveDate::from_ymd_opt(2024, 6, 8).unwrap());
    /// ```
    pub fn range_containing(&self, date: NaiveDate) -> DateRange {
        let back = u64::from(date.weekday().num_days_from_monday());
        let start = date - Days::new(back);
        DateRange {
            start,
            end: start + Days::new(self.last_offset()),
        }
    }

    /// Parses the config spelling (`monday_to_saturday`, `mon-sat`, ...).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "monday_to_saturday" | "mon_sat" => Some(WeekDefinition::MondayToSaturday),
            "monday_to_sunday" | "mon_sun" => Some(WeekDefinition::MondayToSunday),
            _ => None,
        }
    }
}

impl std::fmt::Display for WeekDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeekDefinition::MondayToSaturday => f.write_str("monday_to_saturday"),
            WeekDefinition::MondayToSunday => f.write_str("monday_to_sunday"),
        }
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// Closed date interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Inclusive on both ends.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Monday after this range's Monday.
    pub fn next_week_start(&self) -> NaiveDate {
        self.start + Days::new(7)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_product_defaults() {
        assert_eq!(WeekDefinition::SALARY_DEFAULT, WeekDefinition::MondayToSaturday);
        assert_eq!(WeekDefinition::CASHBOX_DEFAULT, WeekDefinition::MondayToSunday);
    }

    #[test]
    fn test_salary_week_excludes_sunday() {
        let sunday = d(2024, 6, 9);
        let week = WeekDefinition::MondayToSaturday.range_containing(sunday);
        assert_eq!(week.start, d(2024, 6, 3));
        assert_eq!(week.end, d(2024, 6, 8));
        assert!(!week.contains(sunday));
    }

    #[test]
    fn test_cashbox_week_includes_sunday() {
        let sunday = d(2024, 6, 9);
        let week = WeekDefinition::MondayToSunday.range_containing(sunday);
        assert_eq!(week.start, d(2024, 6, 3));
        assert_eq!(week.end, sunday);
        assert!(week.contains(sunday));
    }

    #[test]
    fn test_monday_maps_to_itself() {
        let monday = d(2024, 6, 3);
        assert_eq!(WeekDefinition::MondayToSaturday.range_containing(monday).start, monday);
    }

    #[test]
    fn test_week_crossing_month_and_year() {
        let week = WeekDefinition::MondayToSaturday.range_containing(d(2025, 1, 2));
        assert_eq!(week.start, d(2024, 12, 30));
        assert_eq!(week.end, d(2025, 1, 4));
        assert_eq!(week.next_week_start(), d(2025, 1, 6));
    }

    #[test]
    fn test_parse() {
        assert_eq!(WeekDefinition::parse("mon-sat"), Some(WeekDefinition::MondayToSaturday));
        assert_eq!(
            WeekDefinition::parse("Monday_To_Sunday"),
            Some(WeekDefinition::MondayToSunday)
        );
        assert_eq!(WeekDefinition::parse("fortnight"), None);
        for def in [WeekDefinition::MondayToSaturday, WeekDefinition::MondayToSunday] {
            assert_eq!(WeekDefinition::parse(&def.to_string()), Some(def));
        }
    }
}
