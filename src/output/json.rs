use serde::Serialize;
use serde_json::{Value, json};

use crate::core::{StatsResult, StudySession, local_day_key};
use crate::error::AppError;
use crate::timer::TimerState;
use crate::utils::{Timezone, format_clock};

pub(crate) fn to_json_string(
    value: &impl Serialize,
    what: &'static str,
) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|source| AppError::Json { what, source })
}

pub(crate) fn print_json(value: &impl Serialize, what: &'static str) -> Result<(), AppError> {
    println!("{}", to_json_string(value, what)?);
    Ok(())
}

/// Whole result plus the chart aliases under their view names
pub(crate) fn stats_json(stats: &StatsResult) -> Result<Value, AppError> {
    let json_err = |source| AppError::Json {
        what: "statistics",
        source,
    };
    let mut value = serde_json::to_value(stats).map_err(json_err)?;
    if let Value::Object(map) = &mut value {
        map.insert(
            "pie_data".to_string(),
            serde_json::to_value(stats.pie_data()).map_err(json_err)?,
        );
        map.insert(
            "radar_data".to_string(),
            serde_json::to_value(stats.radar_data()).map_err(json_err)?,
        );
        map.insert(
            "bar_chart_data".to_string(),
            serde_json::to_value(stats.bar_chart_data()).map_err(json_err)?,
        );
        map.insert(
            "list_data".to_string(),
            serde_json::to_value(&stats.subjects).map_err(json_err)?,
        );
    }
    Ok(value)
}

/// Sessions with their local day attached
pub(crate) fn sessions_json(sessions: &[StudySession], timezone: Timezone) -> Value {
    let rows: Vec<Value> = sessions
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "subject": s.subject,
                "duration_minutes": s.duration_minutes,
                "date": s.date.to_rfc3339(),
                "local_day": local_day_key(s.date, timezone),
                "timestamp": s.timestamp,
            })
        })
        .collect();
    Value::Array(rows)
}

pub(crate) fn timer_json(state: &TimerState) -> Value {
    json!({
        "mode": state.mode,
        "seconds": state.seconds,
        "clock": format_clock(state.seconds),
        "countdown_initial_minutes": state.countdown_initial_minutes,
        "is_active": state.is_active,
        "subject": state.subject,
        "minutes_to_save": state.minutes_to_save(),
    })
}
