use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::AppError;
use crate::utils::Timezone;

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    // Try YYYYMMDD
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Ok(d);
    }
    // Try YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    Err(AppError::InvalidDate {
        input: s.to_string(),
    })
}

/// Parse "YYYY-MM" into (year, month)
pub(crate) fn parse_month(s: &str) -> Result<(i32, u32), AppError> {
    let err = || AppError::InvalidMonth {
        input: s.to_string(),
    };
    let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
    let year: i32 = year.parse().map_err(|_| err())?;
    let month: u32 = month.parse().map_err(|_| err())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(err)?;
    Ok((year, month))
}

/// Parse a user-supplied instant.
///
/// RFC 3339 strings carry their own offset. Wall-clock forms
/// ("YYYY-MM-DD HH:MM", "YYYY-MM-DDTHH:MM", bare dates at 12:00) are read in
/// the observer's zone.
pub(crate) fn parse_instant(s: &str, timezone: Timezone) -> Result<DateTime<Utc>, AppError> {
    let trimmed = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            let date = parse_date(trimmed).ok()?;
            Some(date.and_time(NaiveTime::from_hms_opt(12, 0, 0)?))
        });

    naive
        .and_then(|n| timezone.from_local(n))
        .ok_or_else(|| AppError::InvalidDateTime {
            input: trimmed.to_string(),
        })
}
