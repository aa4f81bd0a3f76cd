/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Daily goal used when the profile has none (or a non-positive one)
pub(crate) const DEFAULT_DAILY_GOAL_MINUTES: i64 = 180;

/// Longest single session; stored records above it are clamped, new ones rejected
pub(crate) const MAX_SESSION_MINUTES: i64 = 24 * 60;

/// Subject assigned to stored records that lack one
pub(crate) const FALLBACK_SUBJECT: &str = "Outras";

/// Environment variable that relocates the data directory
pub(crate) const STUDYSTATS_HOME_ENV: &str = "STUDYSTATS_HOME";

/// Data directory under $HOME when neither env nor config set one
pub(crate) const DEFAULT_DATA_DIR: &str = ".studystats";
