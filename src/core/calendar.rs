//! Local-calendar day bucketing
//!
//! Every series the engine emits is keyed by the observer's local calendar
//! day. Keys are derived from the instant converted into the observer's zone,
//! never from the UTC date, so a session logged at 23:30 stays on its own day
//! whatever the offset.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::consts::DATE_FORMAT;
use crate::utils::Timezone;

pub(crate) fn local_day(instant: DateTime<Utc>, timezone: Timezone) -> NaiveDate {
    timezone.local_date(instant)
}

/// "YYYY-MM-DD" of the local day containing `instant`
pub(crate) fn local_day_key(instant: DateTime<Utc>, timezone: Timezone) -> String {
    day_key(local_day(instant, timezone))
}

pub(crate) fn day_key(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

/// Day count of a range token: "day" -> 1, "<N>_days" -> N
pub(crate) fn days_from_range_token(token: &str) -> Option<i64> {
    let token = token.trim();
    if token == "day" {
        return Some(1);
    }
    let n: i64 = token.strip_suffix("_days")?.parse().ok()?;
    (n > 0).then_some(n)
}

/// Consecutive calendar days, oldest first. Cloning restarts the walk.
#[derive(Debug, Clone)]
pub(crate) struct DaySeries {
    next: NaiveDate,
    remaining: usize,
}

impl DaySeries {
    pub(crate) fn new(start: NaiveDate, count: usize) -> Self {
        Self {
            next: start,
            remaining: count,
        }
    }

    /// The `count` days that end on (and include) `end`
    pub(crate) fn ending_on(end: NaiveDate, count: usize) -> Self {
        let back = count.saturating_sub(1) as i64;
        Self::new(end - Duration::days(back), count)
    }
}

impl Iterator for DaySeries {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.remaining == 0 {
            return None;
        }
        let day = self.next;
        self.remaining -= 1;
        match day.succ_opt() {
            Some(succ) => self.next = succ,
            None => self.remaining = 0,
        }
        Some(day)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for DaySeries {}

/// Keys for `count` consecutive days starting at `start`
pub(crate) fn build_day_series(start: NaiveDate, count: usize) -> Vec<String> {
    DaySeries::new(start, count).map(day_key).collect()
}

/// Every local date of `year`, Jan 1 through Dec 31
pub(crate) fn year_days(year: i32) -> Option<DaySeries> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
    let count = (end - start).num_days() + 1;
    Some(DaySeries::new(start, count as usize))
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

/// Weekday of the 1st, 0 = Sunday
pub(crate) fn first_weekday_of_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(first.weekday().num_days_from_sunday())
}

/// Inclusive run of local days used for period comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct DayWindow {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
}

impl DayWindow {
    /// The `days` days ending on `end` (a 1-day window is just `end`)
    pub(crate) fn ending_on(end: NaiveDate, days: i64) -> Self {
        Self {
            start: end - Duration::days(days.max(1) - 1),
            end,
        }
    }

    /// Same-length window immediately before this one: no gap, no overlap
    pub(crate) fn preceding(&self) -> Self {
        Self::ending_on(self.start - Duration::days(1), self.len())
    }

    pub(crate) fn len(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Round half up to the nearest integer (-0.5 rounds to 0)
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// round(100 * numerator / denominator), 0 when the denominator is 0
pub(crate) fn ratio_percent(numerator: i64, denominator: i64) -> i64 {
    if denominator == 0 {
        return 0;
    }
    round_half_up(numerator as f64 * 100.0 / denominator as f64)
}
