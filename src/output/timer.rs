use crate::timer::{TimerMode, TimerState};
use crate::utils::{format_clock, format_duration};

pub(crate) fn timer_status_line(state: &TimerState) -> String {
    let mode = match state.mode {
        TimerMode::Stopwatch => "Stopwatch".to_string(),
        TimerMode::Countdown => format!(
            "Countdown {}",
            format_duration(state.countdown_initial_minutes)
        ),
    };
    let status = if state.is_active { "running" } else { "paused" };
    let subject = state.subject.as_deref().unwrap_or("no subject");
    format!(
        "{mode} {} [{status}] · {subject} · {} to save",
        format_clock(state.seconds),
        format_duration(state.minutes_to_save())
    )
}

pub(crate) fn print_timer_status(state: &TimerState, use_color: bool) {
    let line = timer_status_line(state);
    if use_color && state.is_active {
        println!("\x1b[32m{line}\x1b[0m");
    } else {
        println!("{line}");
    }
}
