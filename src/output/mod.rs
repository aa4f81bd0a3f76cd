mod calendar;
mod format;
mod heatmap;
mod history;
mod json;
mod stats;
mod timer;

pub(crate) use calendar::{CalendarOptions, print_day_sessions, print_month_calendar};
pub(crate) use heatmap::print_heatmap;
pub(crate) use history::{HistoryTableOptions, print_history_table, print_subject_list};
pub(crate) use json::{print_json, sessions_json, stats_json, timer_json};
pub(crate) use stats::{
    StatsTableOptions, print_distribution_table, print_evolution_table, print_rhythm_table,
    print_subject_table, print_summary_table, print_trend_table,
};
pub(crate) use timer::print_timer_status;
