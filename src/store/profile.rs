use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::utils::debug_log;

const PROFILE_FILE: &str = "profile.json";

/// Per-user settings persisted next to the session files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) daily_goal_minutes: Option<i64>,
}

impl Profile {
    fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(PROFILE_FILE)
    }

    /// Missing or unreadable profiles load as the default
    pub(crate) fn load(data_dir: &Path) -> Self {
        let path = Self::path(data_dir);
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(profile) => profile,
            Err(err) => {
                debug_log(format!("Ignoring invalid {}: {}", path.display(), err));
                Self::default()
            }
        }
    }

    pub(crate) fn save(&self, data_dir: &Path) -> Result<(), AppError> {
        fs::create_dir_all(data_dir).map_err(|e| AppError::io(data_dir, e))?;
        let path = Self::path(data_dir);
        let json = serde_json::to_string_pretty(self).map_err(|source| AppError::Json {
            what: "profile",
            source,
        })?;
        fs::write(&path, json).map_err(|e| AppError::io(&path, e))
    }

    pub(crate) fn set_daily_goal(&mut self, minutes: i64) -> Result<(), AppError> {
        if minutes <= 0 {
            return Err(AppError::InvalidGoal { minutes });
        }
        self.daily_goal_minutes = Some(minutes);
        Ok(())
    }
}
