use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::cli::ColorMode;
use crate::core::{SortOrder, TimeRange};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) order: Option<SortOrder>,
    #[serde(default)]
    pub(crate) color: Option<ColorMode>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) daily_goal: Option<i64>,
    #[serde(default)]
    pub(crate) data_dir: Option<String>,
    #[serde(default)]
    pub(crate) time_range: Option<TimeRange>,
    #[serde(default)]
    pub(crate) line_chart_range: Option<TimeRange>,
    #[serde(default)]
    pub(crate) daily_rhythm_range: Option<TimeRange>,
}

impl Config {
    pub(crate) fn load() -> Self {
        Self::load_internal(false)
    }

    pub(crate) fn load_quiet() -> Self {
        Self::load_internal(true)
    }

    fn load_internal(quiet: bool) -> Self {
        // Try config locations in order of priority
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        if !quiet {
                            eprintln!("Loaded config from {}", path.display());
                        }
                        return config;
                    }
                    Err(e) => {
                        if !quiet {
                            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                        }
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/studystats/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("studystats").join("config.toml"));
        }

        // 2. Platform config dir (Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("studystats").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.studystats.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".studystats.toml"));
        }

        paths
    }
}
