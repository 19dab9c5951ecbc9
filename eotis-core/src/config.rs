//! Calendar view configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};
use crate::geometry::{DEFAULT_HOUR_HEIGHT, DEFAULT_MIN_EVENT_HEIGHT, GridMetrics};
use crate::indicator::DEFAULT_REFRESH_INTERVAL;
use crate::time::parse_timezone;
use crate::window::Granularity;

fn default_hour_height() -> f64 {
    DEFAULT_HOUR_HEIGHT
}

fn default_min_event_height() -> f64 {
    DEFAULT_MIN_EVENT_HEIGHT
}

fn default_refresh_secs() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

/// View configuration at ~/.config/eotis/calendar.toml
///
/// Every field is optional. `timezone` falls back to whatever the caller
/// considers local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_hour_height")]
    pub hour_height: f64,

    #[serde(default = "default_min_event_height")]
    pub min_event_height: f64,

    #[serde(default)]
    pub clip_overflow: bool,

    /// IANA name, e.g. "Europe/London"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default = "default_refresh_secs")]
    pub indicator_refresh_secs: u64,

    #[serde(default)]
    pub default_view: Granularity,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            hour_height: DEFAULT_HOUR_HEIGHT,
            min_event_height: DEFAULT_MIN_EVENT_HEIGHT,
            clip_overflow: false,
            timezone: None,
            indicator_refresh_secs: default_refresh_secs(),
            default_view: Granularity::default(),
        }
    }
}

impl GridConfig {
    pub fn config_path() -> LayoutResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| LayoutError::Config("Could not determine config directory".into()))?
            .join("eotis");

        Ok(config_dir.join("calendar.toml"))
    }

    /// Load from the default location, or defaults if there is no file yet.
    pub fn load() -> LayoutResult<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> LayoutResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LayoutError::Config(format!("Could not read {}: {e}", path.display()))
        })?;

        let config: GridConfig = toml::from_str(&content)
            .map_err(|e| LayoutError::Config(format!("Invalid {}: {e}", path.display())))?;

        config.metrics()?;
        if config.indicator_refresh_secs == 0 {
            return Err(LayoutError::Config(
                "indicator_refresh_secs must be at least 1".into(),
            ));
        }

        Ok(config)
    }

    /// Validated grid scale.
    pub fn metrics(&self) -> LayoutResult<GridMetrics> {
        let metrics = GridMetrics::new(self.hour_height)
            .with_min_event_height(self.min_event_height)
            .with_clip_overflow(self.clip_overflow);
        metrics.validate()?;
        Ok(metrics)
    }

    /// Configured timezone, or `fallback` when none is set.
    pub fn timezone_or(&self, fallback: Tz) -> LayoutResult<Tz> {
        match &self.timezone {
            Some(name) => parse_timezone(name),
            None => Ok(fallback),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.indicator_refresh_secs.max(1))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> LayoutResult<()> {
        let contents = format!(
            "\
# EOTIS calendar view configuration

# Pixels per hour on the day/week grid:
# hour_height = {hour_height:.1}

# Height for zero-length or very short events:
# min_event_height = {min_event_height:.1}

# Cut events that run past midnight at the bottom of the grid:
# clip_overflow = false

# Timezone used to place events (defaults to the system timezone):
# timezone = \"Europe/London\"

# Seconds between current-time indicator refreshes:
# indicator_refresh_secs = {refresh_secs}

# View used when none is given (day, week or month):
# default_view = \"week\"
",
            hour_height = DEFAULT_HOUR_HEIGHT,
            min_event_height = DEFAULT_MIN_EVENT_HEIGHT,
            refresh_secs = default_refresh_secs(),
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LayoutError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| LayoutError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
