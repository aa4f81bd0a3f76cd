use comfy_table::{Cell, Color};

use crate::core::{SUBJECTS, SortOrder, StudySession};
use crate::output::format::{create_styled_table, header_cell, right_cell, styled_cell};
use crate::utils::{Timezone, format_duration};

#[derive(Debug, Clone, Copy)]
pub(crate) struct HistoryTableOptions {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
    pub(crate) timezone: Timezone,
}

pub(crate) fn print_history_table(sessions: &[StudySession], opts: HistoryTableOptions) {
    let c = opts.use_color;
    let mut sorted: Vec<&StudySession> = sessions.iter().collect();
    match opts.order {
        SortOrder::Asc => sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        SortOrder::Desc => sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
    }

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Date", c),
        header_cell("Time", c),
        header_cell("Subject", c),
        header_cell("Duration", c),
        header_cell("ID", c),
    ]);

    let mut total = 0;
    for s in &sorted {
        total += s.duration_minutes;
        let local = opts.timezone.to_fixed_offset(s.date);
        table.add_row(vec![
            Cell::new(local.format("%Y-%m-%d").to_string()),
            Cell::new(local.format("%H:%M").to_string()),
            Cell::new(&s.subject),
            right_cell(&format_duration(s.duration_minutes), None, false),
            styled_cell(&s.id, if c { Some(Color::DarkGrey) } else { None }, false),
        ]);
    }
    table.add_row(vec![
        styled_cell("TOTAL", if c { Some(Color::Yellow) } else { None }, true),
        Cell::new(""),
        Cell::new(format!("{} sessions", sorted.len())),
        right_cell(&format_duration(total), None, true),
        Cell::new(""),
    ]);

    println!("\n  Study History\n");
    println!("{table}");
}

/// Catalog listing, or the ranked suggestions for a query
pub(crate) fn print_subject_list(title: &str, subjects: &[&str]) {
    println!("\n  {title}\n");
    if subjects.is_empty() {
        println!("  No matching subjects.\n");
        return;
    }
    for s in subjects {
        println!("  {s}");
    }
    if subjects.len() < SUBJECTS.len() {
        println!("\n  {} of {} subjects\n", subjects.len(), SUBJECTS.len());
    } else {
        println!();
    }
}
