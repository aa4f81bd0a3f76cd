//! Core module - study session types and the statistics engine

mod aggregator;
pub(crate) mod calendar;
pub(crate) mod subjects;
mod types;

pub(crate) use aggregator::compute_statistics;
pub(crate) use calendar::{
    build_day_series, day_key, days_in_month, first_weekday_of_month, local_day, local_day_key,
};
pub(crate) use subjects::{SUBJECTS, match_subject, suggest_subjects};
pub(crate) use types::{
    AggregationParams, DateFilter, HeatmapCell, SortOrder, StatsResult, StudySession, TimeRange,
    Trend,
};
