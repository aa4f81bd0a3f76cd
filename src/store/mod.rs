//! On-disk persistence: session log, profile, timer state
//!
//! Everything lives under one data directory, resolved from
//! `STUDYSTATS_HOME`, then the config file, then `~/.studystats`.

pub(crate) mod profile;
pub(crate) mod sessions;

use std::env;
use std::path::PathBuf;

use crate::consts::{DEFAULT_DATA_DIR, STUDYSTATS_HOME_ENV};
use crate::error::AppError;

pub(crate) use profile::Profile;
pub(crate) use sessions::{LoadResult, SessionStore, new_session_id};

pub(crate) fn resolve_data_dir(configured: Option<&str>) -> Result<PathBuf, AppError> {
    if let Ok(home) = env::var(STUDYSTATS_HOME_ENV)
        && !home.trim().is_empty()
    {
        return Ok(PathBuf::from(home));
    }
    if let Some(dir) = configured
        && !dir.trim().is_empty()
    {
        return Ok(expand_home(dir.trim()));
    }
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_DATA_DIR))
        .ok_or(AppError::NoDataDir)
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/var/data"), PathBuf::from("/var/data"));
    }

    #[test]
    fn expand_home_resolves_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/study"), home.join("study"));
        }
    }
}
