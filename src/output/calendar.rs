use chrono::NaiveDate;
use comfy_table::{Cell, Color};
use std::collections::BTreeMap;

use crate::core::{StudySession, day_key, days_in_month, first_weekday_of_month};
use crate::output::format::{create_styled_table, header_cell, right_cell, styled_cell};
use crate::utils::{Timezone, format_duration};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy)]
pub(crate) struct CalendarOptions {
    pub(crate) use_color: bool,
    pub(crate) daily_goal_minutes: i64,
    pub(crate) today: NaiveDate,
}

/// Weeks of a month as rows of seven optional day numbers, Sunday first
pub(crate) fn month_weeks(year: i32, month: u32) -> Vec<[Option<u32>; 7]> {
    let (Some(days), Some(first)) = (
        days_in_month(year, month),
        first_weekday_of_month(year, month),
    )
    else {
        return Vec::new();
    };
    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut slot = first as usize;
    for day in 1..=days {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }
    weeks
}

pub(crate) fn print_month_calendar(
    year: i32,
    month: u32,
    session_map: &BTreeMap<String, i64>,
    opts: CalendarOptions,
) {
    let c = opts.use_color;
    let mut table = create_styled_table();
    table.set_header(WEEKDAYS.iter().map(|d| header_cell(d, c)).collect::<Vec<_>>());

    let mut month_total = 0;
    let mut study_days = 0;
    for week in month_weeks(year, month) {
        let row: Vec<Cell> = week
            .iter()
            .map(|day| {
                let Some(date) = day.and_then(|d| NaiveDate::from_ymd_opt(year, month, d)) else {
                    return Cell::new("");
                };
                let minutes = session_map.get(&day_key(date)).copied().unwrap_or(0);
                month_total += minutes;
                if minutes > 0 {
                    study_days += 1;
                }
                let text = if minutes > 0 {
                    format!("{:>2}\n{}", date.format("%-d"), format_duration(minutes))
                } else {
                    format!("{:>2}", date.format("%-d"))
                };
                let color = if !c {
                    None
                } else if minutes >= opts.daily_goal_minutes {
                    Some(Color::Green)
                } else if minutes > 0 {
                    Some(Color::Yellow)
                } else {
                    None
                };
                styled_cell(&text, color, date == opts.today)
            })
            .collect();
        table.add_row(row);
    }

    let title = NaiveDate::from_ymd_opt(year, month, 1)
        .map_or_else(|| format!("{year}-{month:02}"), |d| d.format("%B %Y").to_string());
    println!("\n  {title}\n");
    println!("{table}");
    println!(
        "\n  {} study days, {} total\n",
        study_days,
        format_duration(month_total)
    );
}

/// Sessions logged on one local day
pub(crate) fn print_day_sessions(
    day: NaiveDate,
    sessions: &[&StudySession],
    timezone: Timezone,
    use_color: bool,
) {
    let c = use_color;
    println!("\n  {}\n", day.format("%A, %Y-%m-%d"));
    if sessions.is_empty() {
        println!("  No study sessions on this day.\n");
        return;
    }

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Time", c),
        header_cell("Subject", c),
        header_cell("Duration", c),
        header_cell("ID", c),
    ]);
    let mut total = 0;
    for s in sessions {
        total += s.duration_minutes;
        table.add_row(vec![
            Cell::new(timezone.to_fixed_offset(s.date).format("%H:%M").to_string()),
            Cell::new(&s.subject),
            right_cell(&format_duration(s.duration_minutes), None, false),
            styled_cell(&s.id, if c { Some(Color::DarkGrey) } else { None }, false),
        ]);
    }
    table.add_row(vec![
        styled_cell("TOTAL", if c { Some(Color::Yellow) } else { None }, true),
        Cell::new(""),
        right_cell(&format_duration(total), None, true),
        Cell::new(""),
    ]);
    println!("{table}");
}
