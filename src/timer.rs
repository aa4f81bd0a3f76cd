//! Stopwatch / countdown timer whose elapsed time becomes a session
//!
//! A command-line process cannot keep an interval running between
//! invocations, so a running timer records the instant it was last synced
//! and `sync` replays the whole seconds elapsed since then as ticks.

use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::consts::MAX_SESSION_MINUTES;
use crate::core::calendar::round_half_up;
use crate::error::AppError;
use crate::utils::debug_log;

const TIMER_FILE: &str = "timer.json";
pub(crate) const DEFAULT_COUNTDOWN_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TimerMode {
    /// Counts up from zero
    #[default]
    Stopwatch,
    /// Counts down from the configured minutes
    Countdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TimerState {
    pub(crate) mode: TimerMode,
    pub(crate) seconds: i64,
    pub(crate) countdown_initial_minutes: i64,
    pub(crate) is_active: bool,
    /// Last instant the running timer was brought up to date
    #[serde(default)]
    pub(crate) resumed_at: Option<DateTime<Utc>>,
    /// Subject the elapsed time will be saved under
    #[serde(default)]
    pub(crate) subject: Option<String>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            mode: TimerMode::Stopwatch,
            seconds: 0,
            countdown_initial_minutes: DEFAULT_COUNTDOWN_MINUTES,
            is_active: false,
            resumed_at: None,
            subject: None,
        }
    }
}

impl TimerState {
    pub(crate) fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(TIMER_FILE)
    }

    /// Stored state, or a fresh stopwatch when none is readable
    pub(crate) fn load(data_dir: &Path) -> Self {
        let path = Self::path(data_dir);
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|err| {
            debug_log(format!("Ignoring invalid {}: {}", path.display(), err));
            Self::default()
        })
    }

    pub(crate) fn save(&self, data_dir: &Path) -> Result<(), AppError> {
        fs::create_dir_all(data_dir).map_err(|e| AppError::io(data_dir, e))?;
        let path = Self::path(data_dir);
        let json = serde_json::to_string_pretty(self).map_err(|source| AppError::Json {
            what: "timer",
            source,
        })?;
        fs::write(&path, json).map_err(|e| AppError::io(&path, e))
    }

    fn initial_seconds(&self) -> i64 {
        match self.mode {
            TimerMode::Stopwatch => 0,
            TimerMode::Countdown => self.countdown_initial_minutes * 60,
        }
    }

    /// One second of a running timer
    pub(crate) fn tick(&mut self) {
        if !self.is_active {
            return;
        }
        match self.mode {
            TimerMode::Stopwatch => self.seconds += 1,
            TimerMode::Countdown => {
                self.seconds = (self.seconds - 1).max(0);
                if self.seconds == 0 {
                    self.is_active = false;
                    self.resumed_at = None;
                }
            }
        }
    }

    /// `ticks` consecutive calls to `tick`, stopping once the timer halts
    fn advance(&mut self, ticks: i64) {
        for _ in 0..ticks {
            if !self.is_active {
                break;
            }
            self.tick();
        }
    }

    /// Replay the whole seconds elapsed since the last sync
    pub(crate) fn sync(&mut self, now: DateTime<Utc>) {
        let Some(since) = self.resumed_at.filter(|_| self.is_active) else {
            return;
        };
        let elapsed = (now - since).num_seconds();
        if elapsed <= 0 {
            return;
        }
        self.advance(elapsed);
        if self.is_active {
            self.resumed_at = Some(since + Duration::seconds(elapsed));
        }
    }

    pub(crate) fn start(&mut self, now: DateTime<Utc>) {
        if self.is_active {
            self.sync(now);
            return;
        }
        if self.mode == TimerMode::Countdown && self.seconds == 0 {
            self.seconds = self.initial_seconds();
        }
        self.is_active = true;
        self.resumed_at = Some(now);
    }

    pub(crate) fn pause(&mut self, now: DateTime<Utc>) {
        self.sync(now);
        self.is_active = false;
        self.resumed_at = None;
    }

    /// Switching modes stops the timer and rewinds it
    pub(crate) fn set_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.reset();
    }

    pub(crate) fn set_countdown_minutes(&mut self, minutes: i64) -> Result<(), AppError> {
        if !(1..=MAX_SESSION_MINUTES).contains(&minutes) {
            return Err(AppError::InvalidDuration { minutes });
        }
        self.countdown_initial_minutes = minutes;
        if self.mode == TimerMode::Countdown && !self.is_active {
            self.seconds = self.initial_seconds();
        }
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.is_active = false;
        self.resumed_at = None;
        self.seconds = self.initial_seconds();
    }

    /// Minutes the timer is worth as a session
    pub(crate) fn minutes_to_save(&self) -> i64 {
        let elapsed = match self.mode {
            TimerMode::Stopwatch => self.seconds,
            TimerMode::Countdown => self.countdown_initial_minutes * 60 - self.seconds,
        };
        round_half_up(elapsed as f64 / 60.0)
    }
}
