pub(crate) mod date;
pub(crate) mod debug;
pub(crate) mod format;
pub(crate) mod timezone;

pub(crate) use date::{parse_date, parse_instant, parse_month};
pub(crate) use debug::{debug_log, set_debug};
pub(crate) use format::{format_clock, format_duration, format_goal_duration, format_signed_percent};
pub(crate) use timezone::Timezone;
