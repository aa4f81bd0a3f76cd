/// Human-readable study time: "45min", "2h05min"
pub(crate) fn format_duration(minutes: i64) -> String {
    let h = minutes / 60;
    let m = minutes % 60;
    if h == 0 {
        return format!("{m}min");
    }
    format!("{h}h{m:02}min")
}

/// Compact goal label: "3h", "2h30m"
pub(crate) fn format_goal_duration(minutes: i64) -> String {
    let h = minutes / 60;
    let m = minutes % 60;
    if m == 0 {
        return format!("{h}h");
    }
    format!("{h}h{m}m")
}

/// Timer readout: "MM:SS" under an hour, "H:MM:SS" above
pub(crate) fn format_clock(seconds: i64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Signed percentage for deltas: "+12%", "-4%", "0%"
pub(crate) fn format_signed_percent(value: i64) -> String {
    if value > 0 {
        format!("+{value}%")
    } else {
        format!("{value}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_minutes_only() {
        assert_eq!(format_duration(0), "0min");
        assert_eq!(format_duration(45), "45min");
    }

    #[test]
    fn format_duration_pads_minutes() {
        assert_eq!(format_duration(60), "1h00min");
        assert_eq!(format_duration(125), "2h05min");
        assert_eq!(format_duration(754), "12h34min");
    }

    #[test]
    fn format_goal_duration_drops_zero_minutes() {
        assert_eq!(format_goal_duration(180), "3h");
        assert_eq!(format_goal_duration(150), "2h30m");
        assert_eq!(format_goal_duration(45), "0h45m");
    }

    #[test]
    fn format_clock_switches_at_one_hour() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(3600), "1:00:00");
        assert_eq!(format_clock(3725), "1:02:05");
    }

    #[test]
    fn format_signed_percent_sign() {
        assert_eq!(format_signed_percent(12), "+12%");
        assert_eq!(format_signed_percent(-4), "-4%");
        assert_eq!(format_signed_percent(0), "0%");
    }
}
