//! Statistics aggregation engine
//!
//! Derives every view of the study log from a session snapshot. The engine is
//! pure: it reads its inputs, allocates fresh output, and takes "today" from
//! `AggregationParams::now` exactly once so all series agree on the date.

use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::core::calendar::{
    DaySeries, DayWindow, day_key, local_day, ratio_percent, round_half_up, year_days,
};
use crate::core::types::{
    AggregationParams, ChartSlice, ComparativePoint, EvolutionRow, HeatmapCell, LinePoint,
    RhythmPoint, SortOrder, StatsResult, StudySession, SubjectShare, Trend,
};
use crate::utils::format_duration;

/// Period lengths of the evolution report, in days
pub(crate) const EVOLUTION_PERIODS: [i64; 6] = [7, 14, 30, 90, 180, 360];

/// Trailing window of the daily-rhythm moving average
pub(crate) const MOVING_AVERAGE_WINDOW: usize = 7;

/// Distribution charts show at most this many slices before folding
const CHART_MAX_SLICES: usize = 16;
const CHART_TOP_SUBJECTS: usize = 15;

pub(crate) const OTHER_BUCKET: &str = "Other";

/// Per-subject palette, cycled by rank
pub(crate) const CHART_PALETTE: [&str; 11] = [
    "#EAB308", "#CA8A04", "#A16207", "#854D0E", "#713F12", "#FEF08A", "#FDE047", "#FACC15",
    "#F59E0B", "#D97706", "#B45309",
];

/// Neutral color reserved for the "Other" bucket
pub(crate) const OTHER_COLOR: &str = "#525252";

/// Compute every statistic the views display
pub(crate) fn compute_statistics(
    sessions: &[StudySession],
    params: &AggregationParams,
) -> StatsResult {
    let goal = params.effective_goal();
    let today = local_day(params.now, params.timezone);

    // Bucket each session once; everything below reads these
    let days: Vec<NaiveDate> = sessions
        .iter()
        .map(|s| local_day(s.date, params.timezone))
        .collect();
    let daily = daily_totals(sessions, &days);

    let total_minutes: i64 = sessions.iter().map(|s| s.duration_minutes).sum();
    let unique_days = days.iter().collect::<HashSet<_>>().len() as i64;
    let avg_minutes_per_day = if unique_days > 0 {
        round_half_up(total_minutes as f64 / unique_days as f64)
    } else {
        0
    };
    let today_minutes = daily.get(&today).copied().unwrap_or(0);

    let range_days = params.time_range.days();
    let (range_minutes, filtered_count) = range_totals(sessions, &days, today, range_days);
    let current_goal_minutes = goal * range_days;
    let goal_percentage = ratio_percent(range_minutes, current_goal_minutes);
    let goal_deviation = ratio_percent(range_minutes - current_goal_minutes, current_goal_minutes);

    let subjects = subject_breakdown(sessions, total_minutes, params.sort_order);
    let chart_data = chart_slices(&subjects, total_minutes);

    let line_days = params.line_chart_range.days();
    let line_chart = cumulative_line(&daily, today, line_days, goal);
    let final_accumulated = line_chart.last().map_or(0, |p| p.accumulated);
    let accumulated_deviation_percent =
        ratio_percent(final_accumulated - line_days * goal, line_days * goal);

    let heatmap = heatmap(&daily, params.heatmap_year, goal);

    let daily_rhythm = daily_rhythm(&daily, today, params.daily_rhythm_range.days());
    let rhythm_deviation_percent = rhythm_deviation(&daily_rhythm, goal);

    let evolution_report = evolution_report(&daily, today);
    let comparative = evolution_report
        .iter()
        .map(|row| ComparativePoint {
            name: row.label.clone(),
            current: row.current_raw,
            previous: row.prev_raw,
        })
        .collect();

    let current_window = DayWindow::ending_on(today, range_days);
    let current_period_minutes = minutes_in(&daily, current_window);
    let previous_period_minutes = minutes_in(&daily, current_window.preceding());
    let growth_percent = growth_percent(current_period_minutes, previous_period_minutes);

    let session_map = daily
        .iter()
        .map(|(day, minutes)| (day_key(*day), *minutes))
        .collect();

    StatsResult {
        total_minutes,
        avg_minutes_per_day,
        range_minutes,
        today_minutes,
        daily_goal_minutes: goal,
        current_goal_minutes,
        filtered_count,
        goal_percentage,
        goal_deviation,
        current_period_minutes,
        previous_period_minutes,
        growth_percent,
        rhythm_deviation_percent,
        accumulated_deviation_percent,
        subjects,
        chart_data,
        heatmap,
        line_chart,
        comparative,
        daily_rhythm,
        evolution_report,
        session_map,
    }
}

/// Minutes per local day. Days whose sessions total zero minutes still appear.
fn daily_totals(sessions: &[StudySession], days: &[NaiveDate]) -> BTreeMap<NaiveDate, i64> {
    let mut daily = BTreeMap::new();
    for (session, day) in sessions.iter().zip(days) {
        *daily.entry(*day).or_insert(0) += session.duration_minutes;
    }
    daily
}

fn minutes_in(daily: &BTreeMap<NaiveDate, i64>, window: DayWindow) -> i64 {
    daily.range(window.start..=window.end).map(|(_, m)| m).sum()
}

/// Sum and count of sessions inside the header range.
///
/// `day` compares calendar days directly; longer ranges accept any session
/// within `range_days` days of today in either direction.
fn range_totals(
    sessions: &[StudySession],
    days: &[NaiveDate],
    today: NaiveDate,
    range_days: i64,
) -> (i64, usize) {
    let mut minutes = 0;
    let mut count = 0;
    for (session, day) in sessions.iter().zip(days) {
        let included = if range_days == 1 {
            *day == today
        } else {
            (today - *day).num_days().abs() <= range_days
        };
        if included {
            minutes += session.duration_minutes;
            count += 1;
        }
    }
    (minutes, count)
}

pub(crate) fn subject_breakdown(
    sessions: &[StudySession],
    total_minutes: i64,
    order: SortOrder,
) -> Vec<SubjectShare> {
    let mut by_subject: HashMap<&str, i64> = HashMap::new();
    for s in sessions {
        *by_subject.entry(s.subject.as_str()).or_insert(0) += s.duration_minutes;
    }

    let mut shares: Vec<SubjectShare> = by_subject
        .into_iter()
        .map(|(name, value)| SubjectShare {
            name: name.to_string(),
            value,
            percentage: share_of(value, total_minutes),
            hours: format_duration(value),
        })
        .collect();

    match order {
        SortOrder::Desc => {
            shares.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)))
        }
        SortOrder::Asc => {
            shares.sort_by(|a, b| a.value.cmp(&b.value).then_with(|| a.name.cmp(&b.name)))
        }
    }
    shares
}

fn share_of(value: i64, total: i64) -> i64 {
    if total > 0 { ratio_percent(value, total) } else { 0 }
}

/// Distribution slices, largest first. Past 16 subjects the top 15 are kept
/// and the remainder is folded into a single "Other" slice.
pub(crate) fn chart_slices(subjects: &[SubjectShare], total_minutes: i64) -> Vec<ChartSlice> {
    let mut ranked: Vec<&SubjectShare> = subjects.iter().collect();
    ranked.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));

    let (kept, folded) = if ranked.len() > CHART_MAX_SLICES {
        ranked.split_at(CHART_TOP_SUBJECTS)
    } else {
        (&ranked[..], &[][..])
    };

    let mut slices: Vec<ChartSlice> = kept
        .iter()
        .enumerate()
        .map(|(i, s)| ChartSlice {
            name: s.name.clone(),
            value: s.value,
            percentage: s.percentage,
            hours: s.hours.clone(),
            color: CHART_PALETTE[i % CHART_PALETTE.len()],
            is_other: false,
        })
        .collect();

    if !folded.is_empty() {
        let value: i64 = folded.iter().map(|s| s.value).sum();
        slices.push(ChartSlice {
            name: OTHER_BUCKET.to_string(),
            value,
            percentage: share_of(value, total_minutes),
            hours: format_duration(value),
            color: OTHER_COLOR,
            is_other: true,
        });
    }
    slices
}

/// Running total over the `days` days ending today, against a straight
/// goal-per-day reference line
fn cumulative_line(
    daily: &BTreeMap<NaiveDate, i64>,
    today: NaiveDate,
    days: i64,
    goal: i64,
) -> Vec<LinePoint> {
    let mut accumulated = 0;
    DaySeries::ending_on(today, days as usize)
        .enumerate()
        .map(|(i, date)| {
            accumulated += daily.get(&date).copied().unwrap_or(0);
            LinePoint {
                date,
                accumulated,
                reference: (i as i64 + 1) * goal,
            }
        })
        .collect()
}

/// Density bucket of one day relative to the goal
pub(crate) fn heatmap_level(minutes: i64, goal: i64) -> u8 {
    if minutes <= 0 {
        return 0;
    }
    let m = minutes as f64;
    let g = goal as f64;
    let mut level = 1;
    if m >= g * 0.33 {
        level = 2;
    }
    if m >= g * 0.66 {
        level = 3;
    }
    if m >= g {
        level = 4;
    }
    level
}

fn heatmap(daily: &BTreeMap<NaiveDate, i64>, year: i32, goal: i64) -> Vec<HeatmapCell> {
    let Some(days) = year_days(year) else {
        return Vec::new();
    };
    days.map(|date| {
        let count = daily.get(&date).copied().unwrap_or(0);
        HeatmapCell {
            date,
            count,
            level: heatmap_level(count, goal),
            is_goal_met: count >= goal,
        }
    })
    .collect()
}

/// Daily minutes with a trailing 7-day moving average.
///
/// The series starts `days + 7` days before today so the first emitted point
/// already has a full window behind it; `days + 1` points are emitted, the
/// last one being today.
fn daily_rhythm(daily: &BTreeMap<NaiveDate, i64>, today: NaiveDate, days: i64) -> Vec<RhythmPoint> {
    let warmup = MOVING_AVERAGE_WINDOW as i64;
    let start = today - Duration::days(days + warmup);
    let series: Vec<(NaiveDate, i64)> = DaySeries::new(start, (days + warmup + 1) as usize)
        .map(|date| (date, daily.get(&date).copied().unwrap_or(0)))
        .collect();

    (MOVING_AVERAGE_WINDOW..series.len())
        .map(|i| {
            let window = &series[i + 1 - MOVING_AVERAGE_WINDOW..=i];
            let sum: i64 = window.iter().map(|(_, m)| m).sum();
            let (date, minutes) = series[i];
            RhythmPoint {
                date,
                minutes,
                moving_average: round_half_up(sum as f64 / MOVING_AVERAGE_WINDOW as f64),
            }
        })
        .collect()
}

fn rhythm_deviation(points: &[RhythmPoint], goal: i64) -> i64 {
    if goal == 0 {
        return 0;
    }
    let mean = if points.is_empty() {
        0.0
    } else {
        points.iter().map(|p| p.minutes).sum::<i64>() as f64 / points.len() as f64
    };
    round_half_up((mean - goal as f64) / goal as f64 * 100.0)
}

/// Evolution percent: `None` when there is no previous minute to compare with
pub(crate) fn evolution_percent(current: i64, previous: i64) -> Option<i64> {
    (previous > 0).then(|| ratio_percent(current - previous, previous))
}

/// Header growth: an empty baseline with activity counts as +100%
pub(crate) fn growth_percent(current: i64, previous: i64) -> i64 {
    if previous > 0 {
        ratio_percent(current - previous, previous)
    } else if current > 0 {
        100
    } else {
        0
    }
}

fn evolution_report(daily: &BTreeMap<NaiveDate, i64>, today: NaiveDate) -> Vec<EvolutionRow> {
    EVOLUTION_PERIODS
        .iter()
        .map(|&days| {
            let current_window = DayWindow::ending_on(today, days);
            let previous_window = current_window.preceding();
            let current_raw = minutes_in(daily, current_window);
            let prev_raw = minutes_in(daily, previous_window);
            let percent = evolution_percent(current_raw, prev_raw);
            let trend = match percent {
                Some(p) if p >= 0 => Trend::Up,
                Some(_) => Trend::Down,
                None => Trend::Neutral,
            };
            EvolutionRow {
                days,
                label: format!("{days}d"),
                current: format_duration(current_raw),
                prev: format_duration(prev_raw),
                current_raw,
                prev_raw,
                percent,
                trend,
                current_window,
                previous_window,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::subjects::SUBJECTS;
    use crate::core::types::TimeRange;
    use crate::utils::Timezone;
    use chrono::{DateTime, Utc};

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn session(subject: &str, minutes: i64, date: &str) -> StudySession {
        StudySession::new(format!("{subject}-{date}"), subject, minutes, at(date))
    }

    fn sao_paulo_params(now: &str) -> AggregationParams {
        AggregationParams::new(at(now), Timezone::Named(chrono_tz::America::Sao_Paulo))
    }

    #[test]
    fn scenario_day_range_against_goal() {
        let sessions = vec![
            session("Matemática", 60, "2024-03-15T10:00:00-03:00"),
            session("Física", 30, "2024-03-14T10:00:00-03:00"),
        ];
        let mut params = sao_paulo_params("2024-03-15T20:00:00-03:00");
        params.daily_goal_minutes = 90;
        params.time_range = TimeRange::Day;

        let stats = compute_statistics(&sessions, &params);
        assert_eq!(stats.range_minutes, 60);
        assert_eq!(stats.goal_percentage, 67);
        assert_eq!(stats.goal_deviation, -33);
        assert_eq!(stats.total_minutes, 90);
        assert_eq!(stats.today_minutes, 60);
        assert_eq!(stats.filtered_count, 1);
        assert_eq!(stats.current_goal_minutes, 90);
        assert_eq!(stats.avg_minutes_per_day, 45);
    }

    #[test]
    fn late_night_session_buckets_on_local_day_west() {
        let sessions = vec![session("Física", 40, "2024-03-15T23:30:00-03:00")];
        let params = sao_paulo_params("2024-03-15T23:45:00-03:00");
        let stats = compute_statistics(&sessions, &params);
        assert_eq!(stats.today_minutes, 40);
        assert_eq!(stats.minutes_on("2024-03-15"), 40);
        assert_eq!(stats.minutes_on("2024-03-16"), 0);
    }

    #[test]
    fn late_night_session_buckets_on_local_day_east() {
        let sessions = vec![
            session("Física", 40, "2024-03-15T23:30:00+09:00"),
            session("Química", 20, "2024-03-15T00:30:00+09:00"),
        ];
        let params = AggregationParams::new(
            at("2024-03-15T23:50:00+09:00"),
            Timezone::Named(chrono_tz::Asia::Tokyo),
        );
        let stats = compute_statistics(&sessions, &params);
        assert_eq!(stats.minutes_on("2024-03-15"), 60);
        assert_eq!(stats.today_minutes, 60);
        assert_eq!(stats.session_map.len(), 1);
    }

    #[test]
    fn total_equals_sum_of_breakdown() {
        let sessions = vec![
            session("Matemática", 60, "2024-03-15T10:00:00-03:00"),
            session("Matemática", 25, "2024-03-10T10:00:00-03:00"),
            session("Física", 30, "2024-03-14T10:00:00-03:00"),
            session("Redação", 0, "2024-01-02T10:00:00-03:00"),
            session("História", 95, "2023-07-04T10:00:00-03:00"),
        ];
        let stats = compute_statistics(&sessions, &sao_paulo_params("2024-03-15T20:00:00-03:00"));
        let sum: i64 = stats.subjects.iter().map(|s| s.value).sum();
        assert_eq!(stats.total_minutes, sum);
        assert_eq!(stats.total_minutes, 210);
    }

    #[test]
    fn breakdown_sort_orders_and_format() {
        let sessions = vec![
            session("Matemática", 125, "2024-03-15T10:00:00-03:00"),
            session("Física", 30, "2024-03-14T10:00:00-03:00"),
            session("Química", 45, "2024-03-13T10:00:00-03:00"),
        ];
        let mut params = sao_paulo_params("2024-03-15T20:00:00-03:00");
        let stats = compute_statistics(&sessions, &params);
        let names: Vec<&str> = stats.subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Matemática", "Química", "Física"]);
        assert_eq!(stats.subjects[0].hours, "2h05min");
        assert_eq!(stats.subjects[0].percentage, 63);
        assert_eq!(stats.subjects[2].hours, "30min");

        params.sort_order = SortOrder::Asc;
        let stats = compute_statistics(&sessions, &params);
        let names: Vec<&str> = stats.subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Física", "Química", "Matemática"]);
        // Chart order ignores sort order
        assert_eq!(stats.chart_data[0].name, "Matemática");
    }

    #[test]
    fn other_bucket_conserves_total_above_sixteen_subjects() {
        let sessions: Vec<StudySession> = SUBJECTS
            .iter()
            .take(20)
            .enumerate()
            .map(|(i, s)| session(s, 10 + i as i64, "2024-03-15T10:00:00-03:00"))
            .collect();
        let stats = compute_statistics(&sessions, &sao_paulo_params("2024-03-15T20:00:00-03:00"));

        assert_eq!(stats.chart_data.len(), 16);
        let other = stats.chart_data.last().unwrap();
        assert!(other.is_other);
        assert_eq!(other.name, OTHER_BUCKET);
        assert_eq!(other.color, OTHER_COLOR);
        // The five smallest (10..=14) are folded
        assert_eq!(other.value, 10 + 11 + 12 + 13 + 14);
        let sum: i64 = stats.chart_data.iter().map(|s| s.value).sum();
        assert_eq!(sum, stats.total_minutes);
        assert!(stats.chart_data[..15].iter().all(|s| s.color != OTHER_COLOR));
        assert_eq!(stats.pie_data(), stats.bar_chart_data());
        assert_eq!(stats.radar_data().len(), 16);
    }

    #[test]
    fn no_other_bucket_at_sixteen_subjects() {
        let sessions: Vec<StudySession> = SUBJECTS
            .iter()
            .take(16)
            .map(|s| session(s, 30, "2024-03-15T10:00:00-03:00"))
            .collect();
        let stats = compute_statistics(&sessions, &sao_paulo_params("2024-03-15T20:00:00-03:00"));
        assert_eq!(stats.chart_data.len(), 16);
        assert!(stats.chart_data.iter().all(|s| !s.is_other));
    }

    #[test]
    fn heatmap_levels_by_goal_share() {
        assert_eq!(heatmap_level(0, 180), 0);
        assert_eq!(heatmap_level(1, 180), 1);
        assert_eq!(heatmap_level(59, 180), 1);
        assert_eq!(heatmap_level(60, 180), 2); // 59.4 threshold
        assert_eq!(heatmap_level(119, 180), 3); // 118.8 threshold
        assert_eq!(heatmap_level(179, 180), 3);
        assert_eq!(heatmap_level(180, 180), 4);
        assert_eq!(heatmap_level(600, 180), 4);
    }

    #[test]
    fn heatmap_level_is_monotonic() {
        for goal in [1, 45, 90, 180, 241] {
            let mut prev = 0;
            for minutes in 0..=goal * 2 {
                let level = heatmap_level(minutes, goal);
                assert!(level >= prev, "goal {goal} minutes {minutes}");
                if minutes >= goal {
                    assert_eq!(level, 4);
                }
                prev = level;
            }
        }
    }

    #[test]
    fn heatmap_covers_whole_year() {
        let sessions = vec![
            session("Física", 200, "2024-02-29T10:00:00-03:00"),
            session("Física", 50, "2023-12-31T23:00:00-03:00"),
        ];
        let mut params = sao_paulo_params("2024-03-15T20:00:00-03:00");
        params.heatmap_year = 2024;
        let stats = compute_statistics(&sessions, &params);
        assert_eq!(stats.heatmap.len(), 366);
        assert_eq!(stats.heatmap[0].date, d(2024, 1, 1));
        assert_eq!(stats.heatmap[0].count, 0);
        let leap = stats.heatmap.iter().find(|c| c.date == d(2024, 2, 29)).unwrap();
        assert_eq!(leap.count, 200);
        assert_eq!(leap.level, 4);
        assert!(leap.is_goal_met);
        assert!(stats.heatmap.iter().filter(|c| c.is_goal_met).all(|c| c.level == 4));

        params.heatmap_year = 2023;
        let stats = compute_statistics(&sessions, &params);
        assert_eq!(stats.heatmap.len(), 365);
        assert_eq!(stats.heatmap.last().unwrap().count, 50);
    }

    #[test]
    fn evolution_windows_do_not_overlap() {
        let params = sao_paulo_params("2024-03-15T20:00:00-03:00");
        let stats = compute_statistics(&[], &params);
        let week = &stats.evolution_report[0];
        assert_eq!(week.days, 7);
        assert_eq!(week.label, "7d");
        assert_eq!(week.current_window.start, d(2024, 3, 9));
        assert_eq!(week.current_window.end, d(2024, 3, 15));
        assert_eq!(week.previous_window.start, d(2024, 3, 2));
        assert_eq!(week.previous_window.end, d(2024, 3, 8));

        for row in &stats.evolution_report {
            assert_eq!(row.current_window.len(), row.days);
            assert_eq!(row.previous_window.len(), row.days);
            assert_eq!(
                row.previous_window.end,
                row.current_window.start - Duration::days(1)
            );
        }
    }

    #[test]
    fn evolution_percent_and_trend() {
        let sessions = vec![
            session("Física", 90, "2024-03-14T10:00:00-03:00"),
            session("Física", 120, "2024-03-05T10:00:00-03:00"),
        ];
        let stats = compute_statistics(&sessions, &sao_paulo_params("2024-03-15T20:00:00-03:00"));
        let week = &stats.evolution_report[0];
        assert_eq!(week.current_raw, 90);
        assert_eq!(week.prev_raw, 120);
        assert_eq!(week.percent, Some(-25));
        assert_eq!(week.trend, Trend::Down);
        assert_eq!(week.current, "1h30min");
        // 14 days: both sessions current, nothing before
        let fortnight = &stats.evolution_report[1];
        assert_eq!(fortnight.current_raw, 210);
        assert_eq!(fortnight.percent, None);
        assert_eq!(fortnight.trend, Trend::Neutral);
        assert_eq!(stats.comparative[0].name, "7d");
        assert_eq!(stats.comparative[0].current, 90);
        assert_eq!(stats.comparative[0].previous, 120);
    }

    #[test]
    fn empty_input_zeroes_totals_and_misses_goal() {
        let stats = compute_statistics(&[], &sao_paulo_params("2024-03-15T20:00:00-03:00"));
        assert_eq!(stats.total_minutes, 0);
        assert_eq!(stats.avg_minutes_per_day, 0);
        assert_eq!(stats.goal_percentage, 0);
        assert_eq!(stats.goal_deviation, -100);
        assert_eq!(stats.growth_percent, 0);
        assert!(stats.subjects.is_empty());
        assert!(stats.chart_data.is_empty());
        assert!(stats.session_map.is_empty());
        assert_eq!(stats.evolution_report.len(), EVOLUTION_PERIODS.len());
        assert!(stats.evolution_report.iter().all(|r| r.percent.is_none()));
    }

    #[test]
    fn zero_baseline_growth_differs_from_evolution() {
        let sessions = vec![session("Física", 45, "2024-03-15T10:00:00-03:00")];
        let mut params = sao_paulo_params("2024-03-15T20:00:00-03:00");
        params.time_range = TimeRange::Days7;
        let stats = compute_statistics(&sessions, &params);
        assert_eq!(stats.current_period_minutes, 45);
        assert_eq!(stats.previous_period_minutes, 0);
        assert_eq!(stats.growth_percent, 100);
        assert_eq!(stats.evolution_report[0].current_raw, 45);
        assert_eq!(stats.evolution_report[0].percent, None);
    }

    #[test]
    fn growth_day_range_compares_with_yesterday() {
        let sessions = vec![
            session("Física", 60, "2024-03-15T10:00:00-03:00"),
            session("Física", 40, "2024-03-14T10:00:00-03:00"),
            session("Física", 500, "2024-03-13T10:00:00-03:00"),
        ];
        let stats = compute_statistics(&sessions, &sao_paulo_params("2024-03-15T20:00:00-03:00"));
        assert_eq!(stats.current_period_minutes, 60);
        assert_eq!(stats.previous_period_minutes, 40);
        assert_eq!(stats.growth_percent, 50);
    }

    #[test]
    fn growth_percent_rules() {
        assert_eq!(growth_percent(0, 0), 0);
        assert_eq!(growth_percent(45, 0), 100);
        assert_eq!(growth_percent(30, 60), -50);
        assert_eq!(evolution_percent(45, 0), None);
        assert_eq!(evolution_percent(30, 60), Some(-50));
    }

    #[test]
    fn range_filter_includes_n_days_either_side() {
        let sessions = vec![
            session("Física", 10, "2024-03-15T10:00:00-03:00"),
            session("Física", 20, "2024-03-08T10:00:00-03:00"), // 7 days back
            session("Física", 40, "2024-03-07T10:00:00-03:00"), // 8 days back
        ];
        let mut params = sao_paulo_params("2024-03-15T20:00:00-03:00");
        params.time_range = TimeRange::Days7;
        let stats = compute_statistics(&sessions, &params);
        assert_eq!(stats.range_minutes, 30);
        assert_eq!(stats.filtered_count, 2);
        assert_eq!(stats.current_goal_minutes, 180 * 7);
    }

    #[test]
    fn cumulative_line_runs_to_today() {
        let sessions = vec![
            session("Física", 100, "2024-03-13T10:00:00-03:00"),
            session("Física", 50, "2024-03-15T10:00:00-03:00"),
            session("Física", 999, "2024-03-01T10:00:00-03:00"),
        ];
        let mut params = sao_paulo_params("2024-03-15T20:00:00-03:00");
        params.line_chart_range = TimeRange::Days7;
        params.daily_goal_minutes = 60;
        let stats = compute_statistics(&sessions, &params);

        assert_eq!(stats.line_chart.len(), 7);
        assert_eq!(stats.line_chart[0].date, d(2024, 3, 9));
        assert_eq!(stats.line_chart[0].accumulated, 0);
        assert_eq!(stats.line_chart[0].reference, 60);
        let last = stats.line_chart.last().unwrap();
        assert_eq!(last.date, d(2024, 3, 15));
        assert_eq!(last.accumulated, 150);
        assert_eq!(last.reference, 420);
        // round(100 * (150 - 420) / 420) = round(-64.28)
        assert_eq!(stats.accumulated_deviation_percent, -64);
    }

    #[test]
    fn daily_rhythm_window_and_moving_average() {
        let sessions = vec![
            session("Física", 70, "2024-03-15T10:00:00-03:00"),
            session("Física", 140, "2024-03-08T10:00:00-03:00"),
        ];
        let mut params = sao_paulo_params("2024-03-15T20:00:00-03:00");
        params.daily_rhythm_range = TimeRange::Days7;
        params.daily_goal_minutes = 30;
        let stats = compute_statistics(&sessions, &params);

        // 7 + 1 points ending today
        assert_eq!(stats.daily_rhythm.len(), 8);
        assert_eq!(stats.daily_rhythm[0].date, d(2024, 3, 8));
        assert_eq!(stats.daily_rhythm[0].minutes, 140);
        assert_eq!(stats.daily_rhythm[0].moving_average, 20);
        let today = stats.daily_rhythm.last().unwrap();
        assert_eq!(today.date, d(2024, 3, 15));
        // Window 03-09..03-15 no longer holds the 03-08 session
        assert_eq!(today.moving_average, 10);
        // mean = 210 / 8 = 26.25 → round(100 * (26.25 - 30) / 30) = round(-12.5)
        assert_eq!(stats.rhythm_deviation_percent, -12);
    }

    #[test]
    fn future_sessions_only_count_where_windows_reach() {
        let sessions = vec![session("Física", 30, "2024-03-17T10:00:00-03:00")];
        let mut params = sao_paulo_params("2024-03-15T20:00:00-03:00");
        params.time_range = TimeRange::Days7;
        let stats = compute_statistics(&sessions, &params);
        assert_eq!(stats.range_minutes, 30);
        assert_eq!(stats.current_period_minutes, 0);
        assert_eq!(stats.today_minutes, 0);
    }
}
