//! Day and week buckets for the date strip above the slot grid.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::engine::GridError;

/// How the date strip groups days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekType {
    /// Whole Sunday-start weeks enclosing the range.
    #[default]
    Week,
    /// The range as given, cut into runs of seven days.
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    /// Two-digit day of month.
    pub short: String,
    /// Abbreviated weekday name.
    pub weekday: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRow {
    /// `YYYY-MM` of the row's first day.
    pub month: String,
    pub week: Vec<DayEntry>,
}

pub fn parse_date(s: &str) -> Result<NaiveDate, GridError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| GridError::InvalidDate(s.to_string()))
}

/// Days from `start` to `end` inclusive in rows of seven.
///
/// A trailing partial row is dropped.
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> Vec<WeekRow> {
    let mut rows = Vec::new();
    let mut week: Vec<DayEntry> = Vec::with_capacity(7);
    let mut first_of_week = start;

    for day in start.iter_days().take_while(|d| *d <= end) {
        if week.is_empty() {
            first_of_week = day;
        }
        week.push(DayEntry {
            date: day.format("%Y-%m-%d").to_string(),
            short: day.format("%d").to_string(),
            weekday: day.format("%a").to_string(),
        });
        if week.len() == 7 {
            rows.push(WeekRow {
                month: first_of_week.format("%Y-%m").to_string(),
                week: std::mem::take(&mut week),
            });
        }
    }

    rows
}

/// Like [`dates_between`] after widening to whole Sunday-start weeks.
pub fn dates_by_week(start: NaiveDate, end: NaiveDate) -> Vec<WeekRow> {
    let lead = u64::from(start.weekday().num_days_from_sunday());
    let tail = 6 - u64::from(end.weekday().num_days_from_sunday());
    let (Some(from), Some(to)) = (start.checked_sub_days(Days::new(lead)), end.checked_add_days(Days::new(tail))) else {
        return Vec::new();
    };
    dates_between(from, to)
}

pub fn dates(kind: WeekType, start: NaiveDate, end: NaiveDate) -> Vec<WeekRow> {
    match kind {
        WeekType::Week => dates_by_week(start, end),
        WeekType::Date => dates_between(start, end),
    }
}

/// Outside the bookable window `[start, end]`.
pub fn is_disabled(cur: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    cur < start || cur > end
}
