use chrono::{Datelike, NaiveDate};

use crate::core::HeatmapCell;
use crate::utils::{format_duration, format_goal_duration};

const LEVEL_GLYPHS: [char; 5] = ['·', '░', '▒', '▓', '█'];
const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// ANSI shades from dim to bright gold, indexed by level
const LEVEL_ANSI: [&str; 5] = ["\x1b[90m", "\x1b[33m", "\x1b[33m", "\x1b[93m", "\x1b[1;93m"];

fn glyph(level: u8) -> char {
    LEVEL_GLYPHS[usize::from(level.min(4))]
}

/// Seven weekday rows (Sunday first), one column per week
pub(crate) fn render_heatmap_grid(cells: &[HeatmapCell], use_color: bool) -> Vec<String> {
    let Some(first) = cells.first() else {
        return Vec::new();
    };
    let offset = first.date.weekday().num_days_from_sunday() as usize;
    let weeks = (offset + cells.len()).div_ceil(7);

    let mut grid: Vec<Vec<Option<&HeatmapCell>>> = vec![vec![None; weeks]; 7];
    for (i, cell) in cells.iter().enumerate() {
        let slot = offset + i;
        grid[slot % 7][slot / 7] = Some(cell);
    }

    let mut lines = vec![format!("     {}", month_header(cells, offset, weeks))];
    for (weekday, row) in grid.iter().enumerate() {
        let mut line = format!("{:<4} ", WEEKDAY_LABELS[weekday]);
        for cell in row {
            match cell {
                Some(cell) if use_color => {
                    let shade = LEVEL_ANSI[usize::from(cell.level.min(4))];
                    line.push_str(&format!("{shade}{}\x1b[0m", glyph(cell.level)));
                }
                Some(cell) => line.push(glyph(cell.level)),
                None => line.push(' '),
            }
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

/// Month names placed over the week column holding each month's first day
fn month_header(cells: &[HeatmapCell], offset: usize, weeks: usize) -> String {
    let mut header = vec![' '; weeks + 3];
    let mut next_free = 0;
    for (i, cell) in cells.iter().enumerate() {
        if cell.date.day() != 1 {
            continue;
        }
        let column = (offset + i) / 7;
        if column < next_free {
            continue;
        }
        let label = MONTH_LABELS[cell.date.month0() as usize];
        for (j, ch) in label.chars().enumerate() {
            if let Some(slot) = header.get_mut(column + j) {
                *slot = ch;
            }
        }
        next_free = column + label.len() + 1;
    }
    header.into_iter().collect::<String>().trim_end().to_string()
}

pub(crate) fn print_heatmap(cells: &[HeatmapCell], year: i32, goal: i64, use_color: bool) {
    println!("\n  Study Heatmap {year} (goal {}/day)\n", format_goal_duration(goal));
    for line in render_heatmap_grid(cells, use_color) {
        println!("  {line}");
    }

    let legend: String = LEVEL_GLYPHS.iter().map(|g| format!("{g} ")).collect();
    println!("\n  Less {}More", legend);

    let studied: Vec<&HeatmapCell> = cells.iter().filter(|c| c.count > 0).collect();
    let goal_days = cells.iter().filter(|c| c.is_goal_met).count();
    let total: i64 = cells.iter().map(|c| c.count).sum();
    let best = cells.iter().max_by_key(|c| (c.count, std::cmp::Reverse(c.date)));
    println!(
        "\n  {} study days, {} at goal, {} total",
        studied.len(),
        goal_days,
        format_duration(total)
    );
    if let Some(best) = best.filter(|c| c.count > 0) {
        println!(
            "  Best day: {} ({})",
            best.date,
            format_duration(best.count)
        );
    }
    if let Some(streak) = longest_goal_streak(cells) {
        println!(
            "  Longest goal streak: {} days ({} – {})\n",
            streak.2, streak.0, streak.1
        );
    } else {
        println!();
    }
}

/// (start, end, length) of the longest run of consecutive goal-met days
fn longest_goal_streak(cells: &[HeatmapCell]) -> Option<(NaiveDate, NaiveDate, usize)> {
    let mut best: Option<(NaiveDate, NaiveDate, usize)> = None;
    let mut current: Option<(NaiveDate, NaiveDate, usize)> = None;
    for cell in cells {
        if !cell.is_goal_met {
            current = None;
            continue;
        }
        current = Some(match current {
            Some((start, _, len)) => (start, cell.date, len + 1),
            None => (cell.date, cell.date, 1),
        });
        if let Some(run) = current
            && best.is_none_or(|b| run.2 > b.2)
        {
            best = Some(run);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calendar::year_days;

    fn cells_for(year: i32, filled: &[(u32, u32, i64)], goal: i64) -> Vec<HeatmapCell> {
        year_days(year)
            .unwrap()
            .map(|date| {
                let count = filled
                    .iter()
                    .find(|(m, d, _)| date.month() == *m && date.day() == *d)
                    .map_or(0, |(_, _, c)| *c);
                HeatmapCell {
                    date,
                    count,
                    level: if count >= goal { 4 } else if count > 0 { 1 } else { 0 },
                    is_goal_met: count >= goal,
                }
            })
            .collect()
    }

    #[test]
    fn grid_has_header_and_seven_rows() {
        let cells = cells_for(2024, &[], 60);
        let lines = render_heatmap_grid(&cells, false);
        assert_eq!(lines.len(), 8);
        assert!(lines[0].trim_start().starts_with("Jan"));
        assert!(lines[1].starts_with("Sun"));
        assert!(lines[7].starts_with("Sat"));
    }

    #[test]
    fn grid_places_first_day_on_its_weekday() {
        // 2024-01-01 was a Monday
        let cells = cells_for(2024, &[(1, 1, 120)], 60);
        let lines = render_heatmap_grid(&cells, false);
        let monday: Vec<char> = lines[2].chars().skip(5).collect();
        assert_eq!(monday[0], '█');
        // Sunday row starts in the second week
        let sunday: Vec<char> = lines[1].chars().skip(5).collect();
        assert_eq!(sunday[0], ' ');
        assert_eq!(sunday[1], '·');
    }

    #[test]
    fn grid_empty_input() {
        assert!(render_heatmap_grid(&[], false).is_empty());
    }

    #[test]
    fn longest_streak_picks_longest_run() {
        let cells = cells_for(
            2024,
            &[(3, 1, 90), (3, 2, 90), (3, 10, 90), (3, 11, 90), (3, 12, 90)],
            60,
        );
        let (start, end, len) = longest_goal_streak(&cells).unwrap();
        assert_eq!(len, 3);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 3, 12).unwrap());
    }

    #[test]
    fn no_streak_without_goal_days() {
        assert!(longest_goal_streak(&cells_for(2023, &[(5, 5, 10)], 60)).is_none());
    }
}
