/*
Calendar date helpers.
Everything here works on plain local calendar days (no time of day, no zone).
*/

use chrono::{Datelike, Days, Months, NaiveDate};

pub const ISO_FORMAT: &str = "%Y-%m-%d";

// Canonical "YYYY-MM-DD" form
pub fn to_iso_date(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_FORMAT).ok()
}

fn saturate(forward: bool) -> NaiveDate {
    if forward { NaiveDate::MAX } else { NaiveDate::MIN }
}

pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    let days = Days::new(n.unsigned_abs());
    let moved = if n >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    };
    moved.unwrap_or_else(|| saturate(n >= 0))
}

/// Add calendar months, clamping the day to the end of the target month.
///
/// Jan 31 + 1 month lands on Feb 28 (or 29), never on a day in March.
pub fn add_months(date: NaiveDate, n: i32) -> NaiveDate {
    let months = Months::new(n.unsigned_abs());
    let moved = if n >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    moved.unwrap_or_else(|| saturate(n >= 0))
}

/// Add calendar years. A Feb 29 that has no counterpart in the target year
/// rolls over to Mar 1.
pub fn add_years(date: NaiveDate, n: i32) -> NaiveDate {
    let year = date.year().saturating_add(n);
    NaiveDate::from_ymd_opt(year, date.month(), 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(date.day() - 1))))
        .unwrap_or_else(|| saturate(n >= 0))
}

// Last valid day number of the month (28..=31).
// Years outside chrono's range fall back to the Gregorian rules.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let month = month.clamp(1, 12);
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or_else(|| match month {
            2 if is_leap_year(year) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        })
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

// week 1 -> day 1, week 2 -> day 8, ... clamped to the month end.
// Week 5 of a 28-day February is the 28th.
pub fn week_start_day(year: i32, month: u32, week: u32) -> u32 {
    let start = 1 + (week.max(1) - 1).saturating_mul(7);
    start.min(days_in_month(year, month))
}

/// Build a date from parts, clamping month to 1..=12 and day to the month end.
pub fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let month = month.clamp(1, 12);
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| saturate(year >= 0))
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn month_name(month: u32) -> String {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize].to_string(),
        other => format!("Month {other}"),
    }
}

// Header label, e.g. "Sunday, Oct 18"
pub fn format_nice(date: NaiveDate) -> String {
    date.format("%A, %b %-d").to_string()
}
