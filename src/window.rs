//! Scoring window construction
//!
//! This module builds the date ranges scoring operates over and implements
//! the calendar-week arithmetic behind expected-completion counts. Weeks are
//! Monday-start: both range endpoints are floored to their Monday before
//! counting, so a range always spans at least one week.

use crate::types::DateRange;
use chrono::{Datelike, Duration, Local, NaiveDate};

/// Length of the default scoring window in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 28;

/// The Monday on or before the given date.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Trailing 28-day window ending on `today`, both endpoints inclusive.
pub fn default_range_on(today: NaiveDate) -> DateRange {
    DateRange {
        from: today - Duration::days(DEFAULT_WINDOW_DAYS - 1),
        to: today,
    }
}

/// Trailing 28-day window ending on the local calendar date.
///
/// Habit completion is a local-day concept, so the convenience builders read
/// the local clock; `default_range_on` is the deterministic core.
pub fn default_range() -> DateRange {
    default_range_on(Local::now().date_naive())
}

/// The 28-day window immediately preceding the default one, i.e. days 29-56
/// ago. Scores for this window come from stored snapshots of a prior run;
/// the engine never recomputes them.
pub fn previous_range_on(today: NaiveDate) -> DateRange {
    DateRange {
        from: today - Duration::days(2 * DEFAULT_WINDOW_DAYS - 1),
        to: today - Duration::days(DEFAULT_WINDOW_DAYS),
    }
}

/// The previous 28-day window relative to the local calendar date.
pub fn previous_range() -> DateRange {
    previous_range_on(Local::now().date_naive())
}

/// Number of Monday-start calendar weeks the range touches, minimum 1.
///
/// weeks = (monday(to) - monday(from)) / 7 + 1
///
/// A range inside a single week counts as 1 even when it is shorter than
/// seven days, and an inverted range (from > to) floors to 1 rather than
/// erroring, so week counts are always safe divisors.
pub fn weeks_spanned(range: &DateRange) -> u32 {
    let span_days = (monday_of(range.to) - monday_of(range.from)).num_days();
    (span_days / 7 + 1).max(1) as u32
}
