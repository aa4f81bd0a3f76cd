use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Invalid date/time \"{input}\" (expected RFC 3339, YYYY-MM-DD HH:MM or YYYY-MM-DD)")]
    InvalidDateTime { input: String },

    #[error("Invalid month \"{input}\" (expected YYYY-MM)")]
    InvalidMonth { input: String },

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Subject not found: {input}")]
    UnknownSubject { input: String },

    #[error("Cannot log study time in the future ({input})")]
    FutureDate { input: String },

    #[error(
        "Duration must be between 1 and {} minutes (got {minutes})",
        crate::consts::MAX_SESSION_MINUTES
    )]
    InvalidDuration { minutes: i64 },

    #[error("Daily goal must be a positive number of minutes (got {minutes})")]
    InvalidGoal { minutes: i64 },

    #[error("No session with id {id}")]
    SessionNotFound { id: String },

    #[error("Not enough time on the timer to save a session")]
    TimerTooShort,

    #[error("No subject for the timer (pass one to `timer save` or `timer start --subject`)")]
    TimerWithoutSubject,

    #[error("No data directory (set STUDYSTATS_HOME or data_dir in config)")]
    NoDataDir,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl AppError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
