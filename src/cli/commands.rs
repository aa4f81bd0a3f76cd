//! CLI subcommand definitions

use clap::Subcommand;

use crate::timer::TimerMode;

/// Main CLI commands
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the dashboard: header metrics, subjects and evolution (default)
    Stats,
    /// Show time per subject and the chart distribution
    Subjects,
    /// Show the year heatmap
    Heatmap,
    /// Show accumulated minutes against the goal line
    Trend,
    /// Show daily minutes with a 7-day moving average
    Rhythm,
    /// Compare each period with the one before it
    Evolution,
    /// Show a month calendar, or the sessions of one day
    Calendar {
        /// Month to show (YYYY-MM) [default: current month]
        #[arg(short, long)]
        month: Option<String>,
        /// List the sessions of this day (YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "month")]
        day: Option<String>,
    },
    /// List logged sessions
    History {
        /// From local date (YYYYMMDD or YYYY-MM-DD)
        #[arg(short, long)]
        since: Option<String>,
        /// Until local date (YYYYMMDD or YYYY-MM-DD)
        #[arg(short, long)]
        until: Option<String>,
        /// Show at most this many sessions
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Log a study session
    Add {
        /// Subject from the catalog (accents and case are ignored)
        subject: String,
        /// Duration in minutes
        #[arg(allow_hyphen_values = true)]
        minutes: i64,
        /// When the session happened [default: now]
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Delete a session by id
    Delete {
        id: String,
    },
    /// List the subject catalog, or suggest subjects for a query
    Catalog {
        query: Option<String>,
    },
    /// Show or set the daily goal in minutes
    Goal {
        #[arg(allow_hyphen_values = true)]
        minutes: Option<i64>,
    },
    /// Stopwatch / countdown timer
    Timer {
        #[command(subcommand)]
        command: Option<TimerCommand>,
    },
}

#[derive(Clone, Subcommand)]
pub(crate) enum TimerCommand {
    /// Start or resume the timer
    Start {
        /// Subject to save the time under
        #[arg(short, long)]
        subject: Option<String>,
    },
    /// Pause the timer
    Pause,
    /// Show the timer (default)
    Status,
    /// Stop the timer and rewind it
    Reset,
    /// Switch between stopwatch and countdown (stops the timer)
    Mode {
        #[arg(value_enum)]
        mode: TimerMode,
        /// Countdown length in minutes
        #[arg(short, long)]
        minutes: Option<i64>,
    },
    /// Save the elapsed time as a session and reset the timer
    Save {
        /// Subject [default: the one given to start]
        subject: Option<String>,
    },
}
