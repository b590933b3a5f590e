use crate::config::PlannerConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadClass {
    Empty,
    NoCapacity,
    Light,
    Medium,
    Heavy,
}

impl LoadClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadClass::Empty => "empty",
            LoadClass::NoCapacity => "no_capacity",
            LoadClass::Light => "light",
            LoadClass::Medium => "medium",
            LoadClass::Heavy => "heavy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadThresholds {
    pub light: f64,
    pub medium: f64,
}

impl Default for LoadThresholds {
    fn default() -> Self {
        Self {
            light: 0.7,
            medium: 1.0,
        }
    }
}

impl From<&PlannerConfig> for LoadThresholds {
    fn from(config: &PlannerConfig) -> Self {
        Self {
            light: config.light_threshold,
            medium: config.medium_threshold,
        }
    }
}

impl LoadThresholds {
    pub fn classify(&self, hours: f64, capacity_hours: f64) -> LoadClass {
        if hours == 0.0 {
            return LoadClass::Empty;
        }
        if capacity_hours <= 0.0 {
            return LoadClass::NoCapacity;
        }
        let utilisation = hours / capacity_hours;
        if utilisation <= self.light {
            LoadClass::Light
        } else if utilisation <= self.medium {
            LoadClass::Medium
        } else {
            LoadClass::Heavy
        }
    }
}

/// `hours / capacity`, or `None` when there is no capacity to divide by.
pub fn utilisation(hours: f64, capacity_hours: f64) -> Option<f64> {
    if capacity_hours > 0.0 {
        Some(hours / capacity_hours)
    } else {
        None
    }
}

pub fn utilisation_percent(utilisation: Option<f64>) -> Option<f64> {
    utilisation.map(|ratio| round_to(ratio * 100.0, 1))
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
