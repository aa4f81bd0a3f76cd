//! Core data types for the study log and its statistics
//!
//! `StudySession` is what the store hands to the engine; `AggregationParams`
//! carries the view parameters of a single computation; `StatsResult` and its
//! row types are what the engine hands back.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::consts::DEFAULT_DAILY_GOAL_MINUTES;
use crate::core::calendar::{DayWindow, days_from_range_token};
use crate::utils::Timezone;

/// One logged block of study time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct StudySession {
    pub(crate) id: String,
    pub(crate) subject: String,
    pub(crate) duration_minutes: i64,
    /// Authoritative instant; all day bucketing derives from it
    pub(crate) date: DateTime<Utc>,
    /// Epoch milliseconds of `date`, for ordering
    pub(crate) timestamp: i64,
}

impl StudySession {
    pub(crate) fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        duration_minutes: i64,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            duration_minutes,
            date,
            timestamp: date.timestamp_millis(),
        }
    }
}

/// Selectable span for the header, trend line and rhythm views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub(crate) enum TimeRange {
    /// Today only
    #[default]
    #[value(name = "day")]
    #[serde(rename = "day")]
    Day,
    #[value(name = "7_days")]
    #[serde(rename = "7_days")]
    Days7,
    #[value(name = "14_days")]
    #[serde(rename = "14_days")]
    Days14,
    #[value(name = "30_days")]
    #[serde(rename = "30_days")]
    Days30,
    #[value(name = "90_days")]
    #[serde(rename = "90_days")]
    Days90,
    #[value(name = "180_days")]
    #[serde(rename = "180_days")]
    Days180,
    #[value(name = "360_days")]
    #[serde(rename = "360_days")]
    Days360,
}

impl TimeRange {
    pub(crate) fn token(self) -> &'static str {
        match self {
            TimeRange::Day => "day",
            TimeRange::Days7 => "7_days",
            TimeRange::Days14 => "14_days",
            TimeRange::Days30 => "30_days",
            TimeRange::Days90 => "90_days",
            TimeRange::Days180 => "180_days",
            TimeRange::Days360 => "360_days",
        }
    }

    pub(crate) fn days(self) -> i64 {
        days_from_range_token(self.token()).unwrap_or(1)
    }

    pub(crate) fn label(self) -> String {
        match self {
            TimeRange::Day => "Today".to_string(),
            other => format!("{} Days", other.days()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SortOrder {
    /// Smallest first
    Asc,
    /// Largest first (default)
    #[default]
    Desc,
}

/// Parameters of one statistics computation
#[derive(Debug, Clone, Copy)]
pub(crate) struct AggregationParams {
    pub(crate) time_range: TimeRange,
    pub(crate) line_chart_range: TimeRange,
    pub(crate) daily_rhythm_range: TimeRange,
    pub(crate) sort_order: SortOrder,
    pub(crate) heatmap_year: i32,
    pub(crate) daily_goal_minutes: i64,
    /// Evaluation instant; "today" is derived from it once
    pub(crate) now: DateTime<Utc>,
    pub(crate) timezone: Timezone,
}

impl AggregationParams {
    pub(crate) fn new(now: DateTime<Utc>, timezone: Timezone) -> Self {
        Self {
            time_range: TimeRange::Day,
            line_chart_range: TimeRange::Days30,
            daily_rhythm_range: TimeRange::Days30,
            sort_order: SortOrder::Desc,
            heatmap_year: timezone.local_date(now).year(),
            daily_goal_minutes: DEFAULT_DAILY_GOAL_MINUTES,
            now,
            timezone,
        }
    }

    /// Goal used for every percentage; non-positive input falls back to the default
    pub(crate) fn effective_goal(&self) -> i64 {
        if self.daily_goal_minutes > 0 {
            self.daily_goal_minutes
        } else {
            DEFAULT_DAILY_GOAL_MINUTES
        }
    }
}

/// Minutes per subject, as listed in the breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SubjectShare {
    pub(crate) name: String,
    pub(crate) value: i64,
    pub(crate) percentage: i64,
    pub(crate) hours: String,
}

/// Entry of the pie/radar/bar distribution, "Other" bucket included
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ChartSlice {
    pub(crate) name: String,
    pub(crate) value: i64,
    pub(crate) percentage: i64,
    pub(crate) hours: String,
    pub(crate) color: &'static str,
    pub(crate) is_other: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct HeatmapCell {
    pub(crate) date: NaiveDate,
    pub(crate) count: i64,
    /// Density bucket 0..=4
    pub(crate) level: u8,
    pub(crate) is_goal_met: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct LinePoint {
    pub(crate) date: NaiveDate,
    pub(crate) accumulated: i64,
    pub(crate) reference: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct RhythmPoint {
    pub(crate) date: NaiveDate,
    pub(crate) minutes: i64,
    pub(crate) moving_average: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Trend {
    Up,
    Down,
    Neutral,
}

/// Current vs previous window of one fixed period length
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct EvolutionRow {
    pub(crate) days: i64,
    pub(crate) label: String,
    pub(crate) current: String,
    pub(crate) prev: String,
    pub(crate) current_raw: i64,
    pub(crate) prev_raw: i64,
    /// `None` when the previous window has no minutes to compare against
    pub(crate) percent: Option<i64>,
    pub(crate) trend: Trend,
    pub(crate) current_window: DayWindow,
    pub(crate) previous_window: DayWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ComparativePoint {
    pub(crate) name: String,
    pub(crate) current: i64,
    pub(crate) previous: i64,
}

/// Every derived view of the study log, recomputed from scratch per call
#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatsResult {
    pub(crate) total_minutes: i64,
    pub(crate) avg_minutes_per_day: i64,
    pub(crate) range_minutes: i64,
    pub(crate) today_minutes: i64,
    pub(crate) daily_goal_minutes: i64,
    pub(crate) current_goal_minutes: i64,
    pub(crate) filtered_count: usize,
    pub(crate) goal_percentage: i64,
    pub(crate) goal_deviation: i64,
    pub(crate) current_period_minutes: i64,
    pub(crate) previous_period_minutes: i64,
    pub(crate) growth_percent: i64,
    pub(crate) rhythm_deviation_percent: i64,
    pub(crate) accumulated_deviation_percent: i64,
    pub(crate) subjects: Vec<SubjectShare>,
    pub(crate) chart_data: Vec<ChartSlice>,
    pub(crate) heatmap: Vec<HeatmapCell>,
    pub(crate) line_chart: Vec<LinePoint>,
    pub(crate) comparative: Vec<ComparativePoint>,
    pub(crate) daily_rhythm: Vec<RhythmPoint>,
    pub(crate) evolution_report: Vec<EvolutionRow>,
    /// Local day key -> minutes, for calendar views
    pub(crate) session_map: BTreeMap<String, i64>,
}

impl StatsResult {
    pub(crate) fn pie_data(&self) -> &[ChartSlice] {
        &self.chart_data
    }

    pub(crate) fn radar_data(&self) -> &[ChartSlice] {
        &self.chart_data
    }

    pub(crate) fn bar_chart_data(&self) -> &[ChartSlice] {
        &self.chart_data
    }

    pub(crate) fn minutes_on(&self, key: &str) -> i64 {
        self.session_map.get(key).copied().unwrap_or(0)
    }
}

/// Date filter for listings
#[derive(Debug, Clone, Default)]
pub(crate) struct DateFilter {
    pub(crate) since: Option<NaiveDate>,
    pub(crate) until: Option<NaiveDate>,
}

impl DateFilter {
    pub(crate) fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { since, until }
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        if let Some(s) = self.since
            && date < s
        {
            return false;
        }
        if let Some(u) = self.until
            && date > u
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // --- StudySession ---

    #[test]
    fn study_session_caches_timestamp() {
        let date = "2024-03-15T13:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let s = StudySession::new("a1", "Física", 30, date);
        assert_eq!(s.timestamp, date.timestamp_millis());
        assert_eq!(s.subject, "Física");
    }

    // --- TimeRange ---

    #[test]
    fn time_range_days() {
        let days: Vec<i64> = [
            TimeRange::Day,
            TimeRange::Days7,
            TimeRange::Days14,
            TimeRange::Days30,
            TimeRange::Days90,
            TimeRange::Days180,
            TimeRange::Days360,
        ]
        .iter()
        .map(|r| r.days())
        .collect();
        assert_eq!(days, [1, 7, 14, 30, 90, 180, 360]);
    }

    #[test]
    fn time_range_labels() {
        assert_eq!(TimeRange::Day.label(), "Today");
        assert_eq!(TimeRange::Days90.label(), "90 Days");
    }

    #[test]
    fn time_range_serde_uses_tokens() {
        let json = serde_json::to_string(&TimeRange::Days14).unwrap();
        assert_eq!(json, r#""14_days""#);
    }

    // --- AggregationParams ---

    #[test]
    fn params_defaults() {
        let now = "2024-12-31T23:30:00-03:00".parse::<DateTime<Utc>>().unwrap();
        let p = AggregationParams::new(now, Timezone::Named(chrono_tz::America::Sao_Paulo));
        assert_eq!(p.time_range, TimeRange::Day);
        assert_eq!(p.line_chart_range, TimeRange::Days30);
        assert_eq!(p.daily_rhythm_range, TimeRange::Days30);
        assert_eq!(p.sort_order, SortOrder::Desc);
        // Local year, not the UTC one (already 2025 in UTC)
        assert_eq!(p.heatmap_year, 2024);
        assert_eq!(p.effective_goal(), 180);
    }

    #[test]
    fn params_non_positive_goal_falls_back() {
        let now = Utc::now();
        let mut p = AggregationParams::new(now, Timezone::Named(chrono_tz::UTC));
        p.daily_goal_minutes = 0;
        assert_eq!(p.effective_goal(), 180);
        p.daily_goal_minutes = -20;
        assert_eq!(p.effective_goal(), 180);
        p.daily_goal_minutes = 90;
        assert_eq!(p.effective_goal(), 90);
    }

    // --- DateFilter ---

    #[test]
    fn date_filter_no_bounds() {
        let f = DateFilter::new(None, None);
        assert!(f.contains(d(2020, 1, 1)));
        assert!(f.contains(d(2099, 12, 31)));
    }

    #[test]
    fn date_filter_both_bounds_inclusive() {
        let f = DateFilter::new(Some(d(2025, 3, 1)), Some(d(2025, 3, 31)));
        assert!(!f.contains(d(2025, 2, 28)));
        assert!(f.contains(d(2025, 3, 1)));
        assert!(f.contains(d(2025, 3, 31)));
        assert!(!f.contains(d(2025, 4, 1)));
    }
}
