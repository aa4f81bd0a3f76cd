//! JSONL session store
//!
//! Sessions live in `<data dir>/sessions/*.jsonl`, one record per line.
//! Records are written in camelCase (`durationMinutes`) so files exported by
//! the web app can be dropped in unchanged.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::consts::{FALLBACK_SUBJECT, MAX_SESSION_MINUTES};
use crate::core::StudySession;
use crate::core::calendar::round_half_up;
use crate::error::AppError;
use crate::utils::{Timezone, debug_log, parse_instant};

const SESSION_SUBDIR: &str = "sessions";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSessionRecord {
    id: Option<String>,
    subject: Option<String>,
    duration_minutes: Option<f64>,
    date: Option<String>,
    timestamp: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord<'a> {
    id: &'a str,
    subject: &'a str,
    duration_minutes: i64,
    date: String,
    timestamp: i64,
}

impl<'a> From<&'a StudySession> for SessionRecord<'a> {
    fn from(s: &'a StudySession) -> Self {
        SessionRecord {
            id: &s.id,
            subject: &s.subject,
            duration_minutes: s.duration_minutes,
            date: s.date.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            timestamp: s.timestamp,
        }
    }
}

/// Outcome of one store scan
#[derive(Debug, Default)]
pub(crate) struct LoadResult {
    /// Newest first
    pub(crate) sessions: Vec<StudySession>,
    /// Lines dropped for bad JSON or an unparseable date
    pub(crate) skipped: usize,
}

pub(crate) struct SessionStore {
    dir: PathBuf,
    quiet: bool,
}

impl SessionStore {
    pub(crate) fn new(data_dir: &Path, quiet: bool) -> Self {
        Self {
            dir: data_dir.join(SESSION_SUBDIR),
            quiet,
        }
    }

    fn find_files(&self) -> Vec<PathBuf> {
        if !self.dir.is_dir() {
            return Vec::new();
        }
        let mut files = Vec::new();
        if let Ok(entries) = glob::glob(&format!("{}/*.jsonl", self.dir.display())) {
            for entry in entries.flatten() {
                files.push(entry);
            }
        }
        files.sort();
        files
    }

    /// Parse every session file in parallel. Unreadable lines are skipped,
    /// never fatal; duplicate ids keep their first occurrence.
    pub(crate) fn load(&self, timezone: Timezone) -> LoadResult {
        let start = Instant::now();
        let files = self.find_files();
        if files.is_empty() {
            return LoadResult::default();
        }

        let (parsed, skipped) = files
            .par_iter()
            .map(|path| parse_session_file(path, timezone))
            .reduce(
                || (Vec::new(), 0),
                |(mut acc, acc_skipped), (part, part_skipped)| {
                    acc.extend(part);
                    (acc, acc_skipped + part_skipped)
                },
            );

        let mut seen = HashSet::new();
        let mut sessions: Vec<StudySession> = parsed
            .into_iter()
            .filter(|s| seen.insert(s.id.clone()))
            .collect();
        sessions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        if !self.quiet {
            eprintln!(
                "Loaded {} sessions from {} files ({:.2}ms)",
                sessions.len(),
                files.len(),
                elapsed_ms
            );
        }
        debug_log(format!("Skipped {skipped} unreadable records"));

        LoadResult { sessions, skipped }
    }

    /// Append a session to the file of its month
    pub(crate) fn append(&self, session: &StudySession) -> Result<PathBuf, AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| AppError::io(&self.dir, e))?;
        let path = self
            .dir
            .join(format!("{}.jsonl", session.date.format("%Y-%m")));

        let line = serde_json::to_string(&SessionRecord::from(session)).map_err(|source| {
            AppError::Json {
                what: "session",
                source,
            }
        })?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| AppError::io(&path, e))?;
        writeln!(file, "{line}").map_err(|e| AppError::io(&path, e))?;
        Ok(path)
    }

    /// Remove every record listed under `id`, rewriting only the files that held it.
    /// Records without a stored id are matched by their `<stem>-<line>` id, and
    /// the survivors in a rewritten file get that id written in so it stays put.
    pub(crate) fn delete(&self, id: &str) -> Result<usize, AppError> {
        let mut removed = 0;
        for path in self.find_files() {
            let content = fs::read_to_string(&path).map_err(|e| AppError::io(&path, e))?;
            let stem = file_stem(&path);
            let mut kept = String::with_capacity(content.len());
            let mut file_removed = 0;
            for (line_no, line) in content.lines().enumerate() {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match listed_record(trimmed, &stem, line_no) {
                    Some((listed, _)) if listed == id => file_removed += 1,
                    Some((listed, false)) => kept.push_str(&with_id(trimmed, listed)),
                    _ => kept.push_str(line),
                }
                kept.push('\n');
            }
            if file_removed > 0 {
                fs::write(&path, kept).map_err(|e| AppError::io(&path, e))?;
                debug_log(format!("Removed {id} from {}", path.display()));
                removed += file_removed;
            }
        }

        if removed == 0 {
            return Err(AppError::SessionNotFound { id: id.to_string() });
        }
        Ok(removed)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sessions")
        .to_string()
}

/// Id given to a record stored without one
fn fallback_id(stem: &str, line_no: usize) -> String {
    format!("{stem}-{}", line_no + 1)
}

/// The id a stored line is listed under, and whether that id is stored in the line
fn listed_record(line: &str, stem: &str, line_no: usize) -> Option<(String, bool)> {
    let raw: RawSessionRecord = serde_json::from_str(line).ok()?;
    match raw.id.filter(|id| !id.is_empty()) {
        Some(id) => Some((id, true)),
        None => Some((fallback_id(stem, line_no), false)),
    }
}

/// Re-serialize a record with `id` set, leaving its other fields untouched
fn with_id(line: &str, id: String) -> String {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(mut record)) => {
            record.insert("id".to_string(), Value::String(id));
            Value::Object(record).to_string()
        }
        _ => line.to_string(),
    }
}

/// Parse one JSONL file, returning its sessions and the number of lines skipped
fn parse_session_file(path: &Path, timezone: Timezone) -> (Vec<StudySession>, usize) {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(err) => {
            debug_log(format!("Failed to open {}: {}", path.display(), err));
            return (Vec::new(), 0);
        }
    };
    let stem = file_stem(path);

    let mut sessions = Vec::new();
    let mut skipped = 0;
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                debug_log(format!(
                    "Failed to read line {} in {}: {}",
                    line_no + 1,
                    path.display(),
                    err
                ));
                skipped += 1;
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let raw: RawSessionRecord = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(err) => {
                debug_log(format!(
                    "Invalid JSON at {}:{}: {}",
                    path.display(),
                    line_no + 1,
                    err
                ));
                skipped += 1;
                continue;
            }
        };

        match session_from_record(raw, timezone, || fallback_id(&stem, line_no)) {
            Some(session) => sessions.push(session),
            None => {
                debug_log(format!(
                    "Missing or invalid date at {}:{}",
                    path.display(),
                    line_no + 1
                ));
                skipped += 1;
            }
        }
    }
    (sessions, skipped)
}

/// Fill defaults for a stored record; `None` when its date cannot be read
fn session_from_record(
    raw: RawSessionRecord,
    timezone: Timezone,
    fallback_id: impl FnOnce() -> String,
) -> Option<StudySession> {
    let date = parse_instant(raw.date.as_deref()?, timezone).ok()?;
    let subject = raw
        .subject
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_SUBJECT.to_string());
    let minutes = raw
        .duration_minutes
        .filter(|m| m.is_finite())
        .map_or(0, |m| round_half_up(m).clamp(0, MAX_SESSION_MINUTES));
    let id = raw
        .id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(fallback_id);

    let mut session = StudySession::new(id, subject, minutes, date);
    if let Some(ts) = raw.timestamp {
        session.timestamp = ts;
    }
    Some(session)
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Fresh session id derived from the creation instant
pub(crate) fn new_session_id(now: DateTime<Utc>) -> String {
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_millis() * 1_000_000);
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("s{nanos:x}{seq:02x}")
}
