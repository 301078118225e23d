/*
Recurrence engine.
Computes the first and the following due dates of a recurring task.
Kept free of storage / HTTP so it can be tested on its own.
*/

use chrono::{Datelike, NaiveDate};

use crate::date::{add_days, add_months, add_years, clamped_date, month_name, week_start_day};
use crate::models::{RecurrenceConstraint, RecurrenceRule, RecurrenceUnit};

// Upper bound for the skip-forward loops. Only reachable with absurd inputs
// (e.g. a daily task completed decades before its due date).
pub const MAX_ADVANCE_STEPS: usize = 10_000;

impl RecurrenceConstraint {
    /// Keep only the parts of a month/week pin that the rule can honor:
    /// the month for yearly rules, the week for monthly rules or for yearly
    /// rules that also have a month. Out-of-range values are dropped.
    pub fn normalized(rule: RecurrenceRule, month: Option<u32>, week: Option<u32>) -> Self {
        let month = month.filter(|m| (1..=12).contains(m));
        let week = week.filter(|w| (1..=5).contains(w));
        match rule {
            RecurrenceRule::Every { unit: RecurrenceUnit::Year, .. } => Self {
                month,
                week: month.and(week),
            },
            RecurrenceRule::Every { unit: RecurrenceUnit::Month, .. } => Self { month: None, week },
            _ => Self::default(),
        }
    }

    // Whether the pin changes date math for this unit at all
    pub fn is_active_for(&self, unit: RecurrenceUnit) -> bool {
        match unit {
            RecurrenceUnit::Year => self.month.is_some(),
            RecurrenceUnit::Month => self.week.is_some(),
            RecurrenceUnit::Day | RecurrenceUnit::Week => false,
        }
    }
}

// Month/year step count; intervals past i32::MAX saturate instead of wrapping
fn calendar_steps(interval: u32) -> i32 {
    i32::try_from(interval.max(1)).unwrap_or(i32::MAX)
}

// Plain (unpinned) step of `interval` units
fn plain_step(date: NaiveDate, interval: u32, unit: RecurrenceUnit) -> NaiveDate {
    let n = interval.max(1);
    match unit {
        RecurrenceUnit::Day => add_days(date, i64::from(n)),
        RecurrenceUnit::Week => add_days(date, 7 * i64::from(n)),
        RecurrenceUnit::Month => add_months(date, calendar_steps(n)),
        RecurrenceUnit::Year => add_years(date, calendar_steps(n)),
    }
}

/// Move a pinned due date forward by one rule period.
///
/// Yearly: jump `interval` years, land on the pinned month (or stay in the
/// current one) at the pinned week start, or day 1 without a week.
/// Monthly: add `interval` months (clamped), then snap to the pinned week.
pub fn constrained_advance(
    date: NaiveDate,
    interval: u32,
    unit: RecurrenceUnit,
    constraint: RecurrenceConstraint,
) -> NaiveDate {
    let n = interval.max(1);
    match unit {
        RecurrenceUnit::Year => {
            let year = date.year().saturating_add(calendar_steps(n));
            let month = constraint.month.unwrap_or(date.month());
            let day = constraint
                .week
                .map(|w| week_start_day(year, month, w))
                .unwrap_or(1);
            clamped_date(year, month, day)
        }
        RecurrenceUnit::Month => {
            let moved = add_months(date, calendar_steps(n));
            match constraint.week {
                Some(w) => clamped_date(
                    moved.year(),
                    moved.month(),
                    week_start_day(moved.year(), moved.month(), w),
                ),
                None => moved,
            }
        }
        RecurrenceUnit::Day | RecurrenceUnit::Week => plain_step(date, n, unit),
    }
}

/// First due date of a newly created recurring task.
///
/// Without an active pin the task is due on `start` itself. With one, the
/// pinned date inside `start`'s period is used, pushed forward one period
/// at a time until it is not before `start`.
pub fn compute_initial_due_date(
    start: NaiveDate,
    rule: RecurrenceRule,
    constraint: RecurrenceConstraint,
) -> Option<NaiveDate> {
    let RecurrenceRule::Every { interval, unit } = rule else {
        return None;
    };
    if !constraint.is_active_for(unit) {
        return Some(start);
    }

    let mut candidate = match unit {
        RecurrenceUnit::Year => {
            let month = constraint.month.unwrap_or(start.month());
            let day = constraint
                .week
                .map(|w| week_start_day(start.year(), month, w))
                .unwrap_or(1);
            clamped_date(start.year(), month, day)
        }
        _ => {
            let week = constraint.week.unwrap_or(1);
            clamped_date(
                start.year(),
                start.month(),
                week_start_day(start.year(), start.month(), week),
            )
        }
    };

    let mut steps = 0;
    while candidate < start {
        if steps >= MAX_ADVANCE_STEPS {
            tracing::warn!(%start, %candidate, "initial due date did not converge");
            break;
        }
        candidate = constrained_advance(candidate, interval, unit, constraint);
        steps += 1;
    }
    Some(candidate)
}

/// Due date after completing a recurring task on `completion`.
///
/// Pinned rules walk forward from `current_due` until strictly after the
/// completion day, so a due date left far in the past catches up in one call.
/// Unpinned rules anchor on the completion day instead: finishing late does
/// not pile up missed occurrences. The result is always after `current_due`.
pub fn compute_next_due_date(
    current_due: NaiveDate,
    rule: RecurrenceRule,
    completion: NaiveDate,
    constraint: RecurrenceConstraint,
) -> Option<NaiveDate> {
    let RecurrenceRule::Every { interval, unit } = rule else {
        return None;
    };

    if constraint.is_active_for(unit) {
        let mut next = constrained_advance(current_due, interval, unit, constraint);
        let mut steps = 1;
        while next <= completion && steps < MAX_ADVANCE_STEPS {
            next = constrained_advance(next, interval, unit, constraint);
            steps += 1;
        }
        if next <= completion {
            tracing::warn!(%current_due, %completion, "pinned recurrence did not pass completion date");
        }
        return Some(next);
    }

    let mut next = plain_step(completion, interval, unit);
    let mut steps = 1;
    while next <= current_due && steps < MAX_ADVANCE_STEPS {
        // re-anchor from the computed date itself
        next = plain_step(next, interval, unit);
        steps += 1;
    }
    if next <= current_due {
        tracing::warn!(%current_due, %completion, "recurrence did not pass current due date");
    }
    Some(next)
}

// "Every 2 weeks", "Every year (Jun, week 2)", "One-time"
pub fn describe(rule: RecurrenceRule, constraint: RecurrenceConstraint) -> String {
    let RecurrenceRule::Every { interval, unit } = rule else {
        return "One-time".to_string();
    };
    let n = interval.max(1);
    let unit_name = match unit {
        RecurrenceUnit::Day => "day",
        RecurrenceUnit::Week => "week",
        RecurrenceUnit::Month => "month",
        RecurrenceUnit::Year => "year",
    };
    let base = if n == 1 {
        format!("Every {unit_name}")
    } else {
        format!("Every {n} {unit_name}s")
    };

    let pin = RecurrenceConstraint::normalized(rule, constraint.month, constraint.week);
    match (unit, pin.month, pin.week) {
        (RecurrenceUnit::Year, Some(m), Some(w)) => format!("{base} ({}, week {w})", month_name(m)),
        (RecurrenceUnit::Year, Some(m), None) => format!("{base} ({})", month_name(m)),
        (RecurrenceUnit::Month, _, Some(w)) => format!("{base} (week {w})"),
        _ => base,
    }
}
