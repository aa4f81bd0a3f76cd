use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde_json::json;
use std::path::PathBuf;

use crate::cli::{Cli, Commands, TimerCommand};
use crate::config::Config;
use crate::consts::{DEFAULT_DAILY_GOAL_MINUTES, MAX_SESSION_MINUTES};
use crate::core::{
    AggregationParams, DateFilter, SUBJECTS, StatsResult, StudySession, build_day_series,
    compute_statistics, day_key, days_in_month, first_weekday_of_month, local_day, match_subject,
    suggest_subjects,
};
use crate::error::AppError;
use crate::output::{
    CalendarOptions, HistoryTableOptions, StatsTableOptions, print_day_sessions,
    print_distribution_table, print_evolution_table, print_heatmap, print_history_table,
    print_json, print_month_calendar, print_rhythm_table, print_subject_list,
    print_subject_table, print_summary_table, print_timer_status, print_trend_table,
    sessions_json, stats_json, timer_json,
};
use crate::store::{LoadResult, Profile, SessionStore, new_session_id, resolve_data_dir};
use crate::timer::TimerState;
use crate::utils::{
    Timezone, debug_log, format_duration, format_goal_duration, parse_date, parse_instant,
    parse_month,
};

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) data_dir: PathBuf,
    pub(crate) timezone: Timezone,
    pub(crate) now: DateTime<Utc>,
    pub(crate) config_goal: Option<i64>,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(cli: &'a Cli, config: &Config) -> Result<Self, AppError> {
        let timezone = Timezone::parse(cli.timezone.as_deref())?;
        let now = match cli.now.as_deref() {
            Some(raw) => parse_instant(raw, timezone)?,
            None => Utc::now(),
        };
        let data_dir = resolve_data_dir(config.data_dir.as_deref())?;
        debug_log(format!("Data directory: {}", data_dir.display()));
        Ok(Self {
            cli,
            data_dir,
            timezone,
            now,
            config_goal: config.daily_goal,
        })
    }

    fn store(&self) -> SessionStore {
        SessionStore::new(&self.data_dir, self.cli.json)
    }

    fn load(&self) -> LoadResult {
        let result = self.store().load(self.timezone);
        if result.skipped > 0 && !self.cli.json {
            eprintln!("Skipped {} unreadable records", result.skipped);
        }
        result
    }

    /// --goal, then the saved profile, then the config file, then the default
    fn daily_goal(&self) -> i64 {
        self.cli
            .goal
            .or_else(|| Profile::load(&self.data_dir).daily_goal_minutes)
            .or(self.config_goal)
            .filter(|g| *g > 0)
            .unwrap_or(DEFAULT_DAILY_GOAL_MINUTES)
    }

    fn params(&self) -> AggregationParams {
        let mut params = AggregationParams::new(self.now, self.timezone);
        params.daily_goal_minutes = self.daily_goal();
        params.sort_order = self.cli.sort_order();
        if let Some(range) = self.cli.range {
            params.time_range = range;
        }
        if let Some(range) = self.cli.line_range {
            params.line_chart_range = range;
        }
        if let Some(range) = self.cli.rhythm_range {
            params.daily_rhythm_range = range;
        }
        if let Some(year) = self.cli.year {
            params.heatmap_year = year;
        }
        params
    }

    fn table_options(&self, params: &AggregationParams) -> StatsTableOptions {
        StatsTableOptions {
            use_color: self.cli.use_color(),
            time_range: params.time_range,
            line_chart_range: params.line_chart_range,
            daily_rhythm_range: params.daily_rhythm_range,
        }
    }

    fn compute(&self) -> (LoadResult, AggregationParams, StatsResult) {
        let result = self.load();
        let params = self.params();
        let stats = compute_statistics(&result.sessions, &params);
        (result, params, stats)
    }
}

fn print_no_sessions() {
    println!("No study sessions found. Log one with `studystats add <SUBJECT> <MINUTES>`.");
}

fn handle_stats(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let (loaded, params, stats) = ctx.compute();
    if ctx.cli.json {
        return print_json(&stats_json(&stats)?, "statistics");
    }
    if loaded.sessions.is_empty() {
        print_no_sessions();
        return Ok(());
    }
    let opts = ctx.table_options(&params);
    print_summary_table(&stats, opts);
    print_subject_table(&stats, opts.use_color);
    print_evolution_table(&stats, opts.use_color);
    Ok(())
}

fn handle_subjects(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let (loaded, _, stats) = ctx.compute();
    if ctx.cli.json {
        let value = json!({
            "total_minutes": stats.total_minutes,
            "subjects": stats.subjects,
            "chart_data": stats.chart_data,
        });
        return print_json(&value, "subjects");
    }
    if loaded.sessions.is_empty() {
        print_no_sessions();
        return Ok(());
    }
    let use_color = ctx.cli.use_color();
    print_subject_table(&stats, use_color);
    print_distribution_table(&stats, use_color);
    Ok(())
}

fn handle_heatmap(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let (_, params, stats) = ctx.compute();
    if ctx.cli.json {
        let value = json!({
            "year": params.heatmap_year,
            "daily_goal_minutes": stats.daily_goal_minutes,
            "heatmap": stats.heatmap,
        });
        return print_json(&value, "heatmap");
    }
    print_heatmap(
        &stats.heatmap,
        params.heatmap_year,
        stats.daily_goal_minutes,
        ctx.cli.use_color(),
    );
    Ok(())
}

fn handle_trend(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let (_, params, stats) = ctx.compute();
    if ctx.cli.json {
        let value = json!({
            "range": params.line_chart_range,
            "daily_goal_minutes": stats.daily_goal_minutes,
            "line_chart": stats.line_chart,
            "accumulated_deviation_percent": stats.accumulated_deviation_percent,
        });
        return print_json(&value, "trend");
    }
    print_trend_table(&stats, ctx.table_options(&params));
    Ok(())
}

fn handle_rhythm(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let (_, params, stats) = ctx.compute();
    if ctx.cli.json {
        let value = json!({
            "range": params.daily_rhythm_range,
            "daily_goal_minutes": stats.daily_goal_minutes,
            "daily_rhythm": stats.daily_rhythm,
            "rhythm_deviation_percent": stats.rhythm_deviation_percent,
        });
        return print_json(&value, "rhythm");
    }
    print_rhythm_table(&stats, ctx.table_options(&params));
    Ok(())
}

fn handle_evolution(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let (_, _, stats) = ctx.compute();
    if ctx.cli.json {
        let value = json!({
            "evolution_report": stats.evolution_report,
            "comparative": stats.comparative,
        });
        return print_json(&value, "evolution");
    }
    print_evolution_table(&stats, ctx.cli.use_color());
    Ok(())
}

fn handle_calendar(
    ctx: &CommandContext<'_>,
    month: Option<&str>,
    day: Option<&str>,
) -> Result<(), AppError> {
    let today = local_day(ctx.now, ctx.timezone);

    if let Some(raw) = day {
        let day = parse_date(raw)?;
        let loaded = ctx.load();
        let mut sessions: Vec<&StudySession> = loaded
            .sessions
            .iter()
            .filter(|s| local_day(s.date, ctx.timezone) == day)
            .collect();
        sessions.sort_by_key(|s| s.timestamp);
        if ctx.cli.json {
            let owned: Vec<StudySession> = sessions.into_iter().cloned().collect();
            let value = json!({
                "date": day_key(day),
                "total_minutes": owned.iter().map(|s| s.duration_minutes).sum::<i64>(),
                "sessions": sessions_json(&owned, ctx.timezone),
            });
            return print_json(&value, "day");
        }
        print_day_sessions(day, &sessions, ctx.timezone, ctx.cli.use_color());
        return Ok(());
    }

    let (year, month) = match month {
        Some(raw) => parse_month(raw)?,
        None => (today.year(), today.month()),
    };
    let (_, _, stats) = ctx.compute();
    if ctx.cli.json {
        let keys = match (NaiveDate::from_ymd_opt(year, month, 1), days_in_month(year, month)) {
            (Some(first), Some(count)) => build_day_series(first, count as usize),
            _ => Vec::new(),
        };
        let days: serde_json::Map<String, serde_json::Value> = keys
            .into_iter()
            .map(|key| {
                let minutes = stats.minutes_on(&key);
                (key, json!(minutes))
            })
            .collect();
        let value = json!({
            "year": year,
            "month": month,
            "days_in_month": days_in_month(year, month),
            "first_weekday": first_weekday_of_month(year, month),
            "days": days,
        });
        return print_json(&value, "calendar");
    }
    print_month_calendar(
        year,
        month,
        &stats.session_map,
        CalendarOptions {
            use_color: ctx.cli.use_color(),
            daily_goal_minutes: stats.daily_goal_minutes,
            today,
        },
    );
    Ok(())
}

fn handle_history(
    ctx: &CommandContext<'_>,
    since: Option<&str>,
    until: Option<&str>,
    limit: Option<usize>,
) -> Result<(), AppError> {
    let filter = DateFilter::new(
        since.map(parse_date).transpose()?,
        until.map(parse_date).transpose()?,
    );
    let loaded = ctx.load();
    let mut sessions: Vec<StudySession> = loaded
        .sessions
        .into_iter()
        .filter(|s| filter.contains(local_day(s.date, ctx.timezone)))
        .collect();
    if let Some(limit) = limit {
        // Store order is newest first
        sessions.truncate(limit);
    }

    if ctx.cli.json {
        return print_json(&sessions_json(&sessions, ctx.timezone), "history");
    }
    if sessions.is_empty() {
        print_no_sessions();
        return Ok(());
    }
    print_history_table(
        &sessions,
        HistoryTableOptions {
            order: ctx.cli.sort_order(),
            use_color: ctx.cli.use_color(),
            timezone: ctx.timezone,
        },
    );
    Ok(())
}

/// Resolve free text to a catalog subject, hinting at close matches on failure
fn resolve_subject(input: &str, quiet: bool) -> Result<&'static str, AppError> {
    if let Some(subject) = match_subject(input) {
        return Ok(subject);
    }
    let suggestions = suggest_subjects(input);
    if !quiet && !suggestions.is_empty() {
        eprintln!("Did you mean: {}?", suggestions.join(", "));
    }
    Err(AppError::UnknownSubject {
        input: input.trim().to_string(),
    })
}

fn record_session(
    ctx: &CommandContext<'_>,
    subject: &'static str,
    minutes: i64,
    date: DateTime<Utc>,
) -> Result<StudySession, AppError> {
    if !(1..=MAX_SESSION_MINUTES).contains(&minutes) {
        return Err(AppError::InvalidDuration { minutes });
    }
    if date > ctx.now {
        return Err(AppError::FutureDate {
            input: date.to_rfc3339(),
        });
    }
    let session = StudySession::new(new_session_id(ctx.now), subject, minutes, date);
    let path = ctx.store().append(&session)?;
    debug_log(format!("Appended {} to {}", session.id, path.display()));
    Ok(session)
}

fn print_recorded(ctx: &CommandContext<'_>, session: &StudySession) -> Result<(), AppError> {
    if ctx.cli.json {
        let value = sessions_json(std::slice::from_ref(session), ctx.timezone);
        return print_json(&value[0], "session");
    }
    println!(
        "Logged {} of {} on {} (id {})",
        format_duration(session.duration_minutes),
        session.subject,
        day_key(local_day(session.date, ctx.timezone)),
        session.id
    );
    Ok(())
}

fn handle_add(
    ctx: &CommandContext<'_>,
    subject: &str,
    minutes: i64,
    date: Option<&str>,
) -> Result<(), AppError> {
    let subject = resolve_subject(subject, ctx.cli.json)?;
    let date = match date {
        Some(raw) => parse_instant(raw, ctx.timezone)?,
        None => ctx.now,
    };
    let session = record_session(ctx, subject, minutes, date)?;
    print_recorded(ctx, &session)
}

fn handle_delete(ctx: &CommandContext<'_>, id: &str) -> Result<(), AppError> {
    let removed = ctx.store().delete(id)?;
    if ctx.cli.json {
        return print_json(&json!({ "deleted": id, "records": removed }), "delete");
    }
    println!("Deleted session {id}");
    Ok(())
}

fn handle_catalog(ctx: &CommandContext<'_>, query: Option<&str>) -> Result<(), AppError> {
    let (title, subjects) = match query {
        Some(q) => (format!("Subjects matching \"{}\"", q.trim()), suggest_subjects(q)),
        None => ("Subjects".to_string(), SUBJECTS.to_vec()),
    };
    if ctx.cli.json {
        return print_json(&subjects, "catalog");
    }
    print_subject_list(&title, &subjects);
    Ok(())
}

fn handle_goal(ctx: &CommandContext<'_>, minutes: Option<i64>) -> Result<(), AppError> {
    let goal = match minutes {
        Some(minutes) => {
            let mut profile = Profile::load(&ctx.data_dir);
            profile.set_daily_goal(minutes)?;
            profile.save(&ctx.data_dir)?;
            minutes
        }
        None => ctx.daily_goal(),
    };
    if ctx.cli.json {
        return print_json(&json!({ "daily_goal_minutes": goal }), "goal");
    }
    match minutes {
        Some(_) => println!("Daily goal set to {}", format_goal_duration(goal)),
        None => println!("Daily goal: {}", format_goal_duration(goal)),
    }
    Ok(())
}

fn handle_timer(ctx: &CommandContext<'_>, command: Option<TimerCommand>) -> Result<(), AppError> {
    let mut state = TimerState::load(&ctx.data_dir);
    state.sync(ctx.now);

    let mut saved = None;
    match command.unwrap_or(TimerCommand::Status) {
        TimerCommand::Start { subject } => {
            if let Some(raw) = subject {
                state.subject = Some(resolve_subject(&raw, ctx.cli.json)?.to_string());
            }
            state.start(ctx.now);
        }
        TimerCommand::Pause => state.pause(ctx.now),
        TimerCommand::Status => {}
        TimerCommand::Reset => state.reset(),
        TimerCommand::Mode { mode, minutes } => {
            state.set_mode(mode);
            if let Some(minutes) = minutes {
                state.set_countdown_minutes(minutes)?;
            }
        }
        TimerCommand::Save { subject } => {
            let raw = subject
                .or_else(|| state.subject.clone())
                .ok_or(AppError::TimerWithoutSubject)?;
            let subject = resolve_subject(&raw, ctx.cli.json)?;
            let minutes = state.minutes_to_save();
            if minutes <= 0 {
                return Err(AppError::TimerTooShort);
            }
            saved = Some(record_session(ctx, subject, minutes, ctx.now)?);
            state.reset();
        }
    }
    state.save(&ctx.data_dir)?;

    if let Some(session) = &saved {
        print_recorded(ctx, session)?;
        if ctx.cli.json {
            return Ok(());
        }
    }
    if ctx.cli.json {
        return print_json(&timer_json(&state), "timer");
    }
    print_timer_status(&state, ctx.cli.use_color());
    Ok(())
}

/// Dispatch a parsed command line
pub(crate) fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let ctx = CommandContext::new(cli, config)?;
    match &cli.command {
        None | Some(Commands::Stats) => handle_stats(&ctx),
        Some(Commands::Subjects) => handle_subjects(&ctx),
        Some(Commands::Heatmap) => handle_heatmap(&ctx),
        Some(Commands::Trend) => handle_trend(&ctx),
        Some(Commands::Rhythm) => handle_rhythm(&ctx),
        Some(Commands::Evolution) => handle_evolution(&ctx),
        Some(Commands::Calendar { month, day }) => {
            handle_calendar(&ctx, month.as_deref(), day.as_deref())
        }
        Some(Commands::History {
            since,
            until,
            limit,
        }) => handle_history(&ctx, since.as_deref(), until.as_deref(), *limit),
        Some(Commands::Add {
            subject,
            minutes,
            date,
        }) => handle_add(&ctx, subject, *minutes, date.as_deref()),
        Some(Commands::Delete { id }) => handle_delete(&ctx, id),
        Some(Commands::Catalog { query }) => handle_catalog(&ctx, query.as_deref()),
        Some(Commands::Goal { minutes }) => handle_goal(&ctx, *minutes),
        Some(Commands::Timer { command }) => handle_timer(&ctx, command.clone()),
    }
}
