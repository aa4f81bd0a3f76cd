//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;

use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::config::Config;
use crate::core::{SortOrder, TimeRange};

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "studystats")]
#[command(about = "Study time tracker with goals, heatmaps and trend statistics", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Sort order for the subject breakdown and history [default: desc]
    #[arg(short, long, global = true, value_enum)]
    pub(crate) order: Option<SortOrder>,

    /// Header range: day, 7_days, 14_days, 30_days, 90_days, 180_days, 360_days
    #[arg(short, long, global = true, value_enum, value_name = "RANGE")]
    pub(crate) range: Option<TimeRange>,

    /// Range of the accumulated trend line [default: 30_days]
    #[arg(long, global = true, value_enum, value_name = "RANGE")]
    pub(crate) line_range: Option<TimeRange>,

    /// Range of the daily rhythm series [default: 30_days]
    #[arg(long, global = true, value_enum, value_name = "RANGE")]
    pub(crate) rhythm_range: Option<TimeRange>,

    /// Heatmap year [default: current year]
    #[arg(long, global = true)]
    pub(crate) year: Option<i32>,

    /// Daily goal in minutes (overrides the saved goal)
    #[arg(short, long, global = true, value_name = "MINUTES")]
    pub(crate) goal: Option<i64>,

    /// Evaluate as of this instant instead of now (RFC 3339 or YYYY-MM-DD HH:MM)
    #[arg(long, global = true, value_name = "INSTANT")]
    pub(crate) now: Option<String>,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub(crate) color: Option<ColorMode>,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug output (show processing details)
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// Timezone for day boundaries (e.g., "America/Sao_Paulo", "UTC")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // For boolean flags, config only applies if CLI is false (default)
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        self.order = self.order.or(config.order);
        self.color = self.color.or(config.color);
        self.range = self.range.or(config.time_range);
        self.line_range = self.line_range.or(config.line_chart_range);
        self.rhythm_range = self.rhythm_range.or(config.daily_rhythm_range);

        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }

        self
    }

    pub(crate) fn sort_order(&self) -> SortOrder {
        self.order.unwrap_or_default()
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color || self.json {
            return false;
        }
        match self.color.unwrap_or_default() {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("studystats").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn config_fills_unset_flags() {
        let config: Config = toml::from_str(
            r#"
            order = "asc"
            time_range = "30_days"
            timezone = "Asia/Tokyo"
            debug = true
            "#,
        )
        .unwrap();
        let cli = parse(&[]).with_config(&config);
        assert_eq!(cli.sort_order(), SortOrder::Asc);
        assert_eq!(cli.range, Some(TimeRange::Days30));
        assert_eq!(cli.timezone.as_deref(), Some("Asia/Tokyo"));
        assert!(cli.debug);
    }

    #[test]
    fn cli_flags_beat_config() {
        let config: Config = toml::from_str(
            r#"
            order = "asc"
            time_range = "30_days"
            timezone = "Asia/Tokyo"
            "#,
        )
        .unwrap();
        let cli = parse(&["--order", "desc", "--range", "7_days", "--timezone", "UTC"])
            .with_config(&config);
        assert_eq!(cli.sort_order(), SortOrder::Desc);
        assert_eq!(cli.range, Some(TimeRange::Days7));
        assert_eq!(cli.timezone.as_deref(), Some("UTC"));
    }

    #[test]
    fn default_order_is_desc() {
        assert_eq!(parse(&[]).sort_order(), SortOrder::Desc);
    }

    #[test]
    fn json_and_no_color_disable_color() {
        assert!(!parse(&["--json", "--color", "always"]).use_color());
        assert!(!parse(&["--no-color", "--color", "always"]).use_color());
        assert!(parse(&["--color", "always"]).use_color());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["heatmap", "--year", "2023", "--json"]);
        assert_eq!(cli.year, Some(2023));
        assert!(cli.json);
    }
}
