//! Text tables for the statistics views

use comfy_table::{Cell, Color};

use crate::core::{StatsResult, TimeRange};
use crate::output::format::{
    create_styled_table, delta_color, format_evolution_percent, format_number, header_cell,
    hex_color, right_cell, styled_cell, trend_color,
};
use crate::utils::{format_duration, format_goal_duration, format_signed_percent};

#[derive(Debug, Clone, Copy)]
pub(crate) struct StatsTableOptions {
    pub(crate) use_color: bool,
    pub(crate) time_range: TimeRange,
    pub(crate) line_chart_range: TimeRange,
    pub(crate) daily_rhythm_range: TimeRange,
}

fn goal_color(percentage: i64, use_color: bool) -> Option<Color> {
    if !use_color {
        return None;
    }
    Some(if percentage >= 100 {
        Color::Green
    } else if percentage >= 66 {
        Color::Yellow
    } else {
        Color::Red
    })
}

/// Header metrics of the dashboard
pub(crate) fn print_summary_table(stats: &StatsResult, opts: StatsTableOptions) {
    let c = opts.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![header_cell("Metric", c), header_cell("Value", c)]);

    let range_label = opts.time_range.label();
    let rows: Vec<(String, Cell)> = vec![
        (
            "Total studied".to_string(),
            right_cell(&format_duration(stats.total_minutes), None, true),
        ),
        (
            "Average per study day".to_string(),
            right_cell(&format_duration(stats.avg_minutes_per_day), None, false),
        ),
        (
            "Today".to_string(),
            right_cell(&format_duration(stats.today_minutes), None, false),
        ),
        (
            format!("Studied ({range_label})"),
            right_cell(
                &format!(
                    "{} in {} sessions",
                    format_duration(stats.range_minutes),
                    stats.filtered_count
                ),
                None,
                false,
            ),
        ),
        (
            format!("Goal ({range_label})"),
            right_cell(
                &format!(
                    "{} ({}/day)",
                    format_duration(stats.current_goal_minutes),
                    format_goal_duration(stats.daily_goal_minutes)
                ),
                None,
                false,
            ),
        ),
        (
            "Goal progress".to_string(),
            right_cell(
                &format!(
                    "{}% ({})",
                    stats.goal_percentage,
                    format_signed_percent(stats.goal_deviation)
                ),
                goal_color(stats.goal_percentage, c),
                true,
            ),
        ),
        (
            "Growth vs previous period".to_string(),
            right_cell(
                &format!(
                    "{} ({} → {})",
                    format_signed_percent(stats.growth_percent),
                    format_duration(stats.previous_period_minutes),
                    format_duration(stats.current_period_minutes)
                ),
                delta_color(stats.growth_percent, c),
                false,
            ),
        ),
        (
            format!("Rhythm vs goal ({})", opts.daily_rhythm_range.label()),
            right_cell(
                &format_signed_percent(stats.rhythm_deviation_percent),
                delta_color(stats.rhythm_deviation_percent, c),
                false,
            ),
        ),
        (
            format!("Accumulated vs goal ({})", opts.line_chart_range.label()),
            right_cell(
                &format_signed_percent(stats.accumulated_deviation_percent),
                delta_color(stats.accumulated_deviation_percent, c),
                false,
            ),
        ),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), value]);
    }

    println!("\n  Study Statistics ({range_label})\n");
    println!("{table}");
}

/// Per-subject breakdown in the requested sort order
pub(crate) fn print_subject_table(stats: &StatsResult, use_color: bool) {
    let c = use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Subject", c),
        header_cell("Minutes", c),
        header_cell("Time", c),
        header_cell("Share", c),
    ]);
    for s in &stats.subjects {
        table.add_row(vec![
            Cell::new(&s.name),
            right_cell(&format_number(s.value), None, false),
            right_cell(&s.hours, None, false),
            right_cell(&format!("{}%", s.percentage), None, false),
        ]);
    }
    table.add_row(vec![
        styled_cell("TOTAL", if c { Some(Color::Yellow) } else { None }, true),
        right_cell(&format_number(stats.total_minutes), None, true),
        right_cell(&format_duration(stats.total_minutes), None, true),
        right_cell("100%", None, true),
    ]);

    println!("\n  Subjects\n");
    println!("{table}");
}

/// Chart slices, largest first, with the folded "Other" bucket last
pub(crate) fn print_distribution_table(stats: &StatsResult, use_color: bool) {
    let c = use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Slice", c),
        header_cell("Time", c),
        header_cell("Share", c),
        header_cell("Color", c),
    ]);
    for slice in stats.pie_data() {
        let swatch = if c { hex_color(slice.color) } else { None };
        table.add_row(vec![
            styled_cell(&slice.name, None, slice.is_other),
            right_cell(&slice.hours, None, false),
            right_cell(&format!("{}%", slice.percentage), None, false),
            styled_cell(&format!("■ {}", slice.color), swatch, false),
        ]);
    }

    println!("\n  Distribution\n");
    println!("{table}");
}

pub(crate) fn print_evolution_table(stats: &StatsResult, use_color: bool) {
    let c = use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Period", c),
        header_cell("Current", c),
        header_cell("Previous", c),
        header_cell("Change", c),
        header_cell("Windows", c),
    ]);
    for row in &stats.evolution_report {
        table.add_row(vec![
            Cell::new(&row.label),
            right_cell(&row.current, None, false),
            right_cell(&row.prev, None, false),
            right_cell(
                &format_evolution_percent(row.percent),
                trend_color(row.trend, c),
                true,
            ),
            Cell::new(format!(
                "{} – {} vs {} – {}",
                row.current_window.start,
                row.current_window.end,
                row.previous_window.start,
                row.previous_window.end
            )),
        ]);
    }

    println!("\n  Evolution\n");
    println!("{table}");
}

/// Cumulative minutes against the straight goal line
pub(crate) fn print_trend_table(stats: &StatsResult, opts: StatsTableOptions) {
    let c = opts.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Date", c),
        header_cell("Accumulated", c),
        header_cell("Goal line", c),
        header_cell("Gap", c),
    ]);
    for point in &stats.line_chart {
        let gap = point.accumulated - point.reference;
        table.add_row(vec![
            Cell::new(point.date.to_string()),
            right_cell(&format_duration(point.accumulated), None, false),
            right_cell(&format_duration(point.reference), None, false),
            right_cell(
                &format!(
                    "{}{}",
                    if gap < 0 { "-" } else { "+" },
                    format_duration(gap.abs())
                ),
                delta_color(gap, c),
                false,
            ),
        ]);
    }

    println!("\n  Accumulated Trend ({})\n", opts.line_chart_range.label());
    println!("{table}");
    println!(
        "\n  Deviation from goal: {}\n",
        format_signed_percent(stats.accumulated_deviation_percent)
    );
}

/// Daily minutes with the trailing 7-day average
pub(crate) fn print_rhythm_table(stats: &StatsResult, opts: StatsTableOptions) {
    let c = opts.use_color;
    let goal = stats.daily_goal_minutes;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Date", c),
        header_cell("Minutes", c),
        header_cell("7-day avg", c),
        header_cell("", c),
    ]);
    for point in &stats.daily_rhythm {
        let met = point.minutes >= goal;
        table.add_row(vec![
            Cell::new(point.date.format("%a %Y-%m-%d").to_string()),
            right_cell(&format_number(point.minutes), None, false),
            right_cell(&format_number(point.moving_average), None, false),
            styled_cell(
                &rhythm_bar(point.minutes, goal),
                if c && met { Some(Color::Green) } else { None },
                false,
            ),
        ]);
    }

    println!("\n  Daily Rhythm ({})\n", opts.daily_rhythm_range.label());
    println!("{table}");
    println!(
        "\n  Mean vs goal: {}\n",
        format_signed_percent(stats.rhythm_deviation_percent)
    );
}

const BAR_WIDTH: i64 = 20;

/// Bar scaled so the goal fills the width; overshoot is capped
fn rhythm_bar(minutes: i64, goal: i64) -> String {
    if goal <= 0 || minutes <= 0 {
        return String::new();
    }
    let filled = (minutes * BAR_WIDTH / goal).clamp(1, BAR_WIDTH) as usize;
    "█".repeat(filled)
}
