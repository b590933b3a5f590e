use crate::capacity::DEFAULT_CAPACITY_HOURS;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Largest week grid a config may ask for (about ten years).
pub const MAX_WEEK_COUNT: usize = 520;
/// Largest padding on either side of the timeline window.
pub const MAX_TIMELINE_PADDING_DAYS: i64 = 3650;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_week_count must be at least 1")]
    ZeroMaxWeeks,
    #[error("default_week_count must be at least 1")]
    ZeroDefaultWeeks,
    #[error("default_week_count {default} exceeds max_week_count {max}")]
    DefaultExceedsMax { default: usize, max: usize },
    #[error("max_week_count {0} exceeds the limit of {MAX_WEEK_COUNT}")]
    TooManyWeeks(usize),
    #[error("timeline_padding_days {0} must be between 0 and {MAX_TIMELINE_PADDING_DAYS}")]
    InvalidTimelinePadding(i64),
    #[error("default_capacity_hours {0} must be a non-negative number")]
    InvalidDefaultCapacity(f64),
    #[error("load thresholds must satisfy 0 <= light ({light}) <= medium ({medium})")]
    InvalidThresholds { light: f64, medium: f64 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunables for week grids, capacity defaults and load classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub default_week_count: usize,
    pub max_week_count: usize,
    pub week_start: Weekday,
    pub default_capacity_hours: f64,
    pub light_threshold: f64,
    pub medium_threshold: f64,
    pub timeline_padding_days: i64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_week_count: 8,
            max_week_count: 12,
            week_start: Weekday::Mon,
            default_capacity_hours: DEFAULT_CAPACITY_HOURS,
            light_threshold: 0.7,
            medium_threshold: 1.0,
            timeline_padding_days: 7,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_week_count == 0 {
            return Err(ConfigError::ZeroMaxWeeks);
        }
        if self.default_week_count == 0 {
            return Err(ConfigError::ZeroDefaultWeeks);
        }
        if self.default_week_count > self.max_week_count {
            return Err(ConfigError::DefaultExceedsMax {
                default: self.default_week_count,
                max: self.max_week_count,
            });
        }
        if self.max_week_count > MAX_WEEK_COUNT {
            return Err(ConfigError::TooManyWeeks(self.max_week_count));
        }
        if !(0..=MAX_TIMELINE_PADDING_DAYS).contains(&self.timeline_padding_days) {
            return Err(ConfigError::InvalidTimelinePadding(
                self.timeline_padding_days,
            ));
        }
        if !self.default_capacity_hours.is_finite() || self.default_capacity_hours < 0.0 {
            return Err(ConfigError::InvalidDefaultCapacity(
                self.default_capacity_hours,
            ));
        }
        let ordered = self.light_threshold.is_finite()
            && self.medium_threshold.is_finite()
            && self.light_threshold >= 0.0
            && self.light_threshold <= self.medium_threshold;
        if !ordered {
            return Err(ConfigError::InvalidThresholds {
                light: self.light_threshold,
                medium: self.medium_threshold,
            });
        }
        Ok(())
    }

    /// Reads a (possibly partial) JSON config; absent fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: PlannerConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }
}
