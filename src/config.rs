//! Configuration handling
//!
//! Configuration is optional TOML; every field has a default so the server
//! runs with no file at all. Loaded once at startup and handed to the engine.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PlannerParams, PRIORITY_RANGE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("literal time")
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the server binds to
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Weekly planner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Start of the schedulable day window
    pub day_start: NaiveTime,

    /// End of the schedulable day window
    pub day_end: NaiveTime,

    /// Length of one study session in minutes
    pub session_minutes: u32,

    /// Default cap on sessions per day (overridable per request)
    pub slots_per_day: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            day_start: hm(8, 0),
            day_end: hm(20, 0),
            session_minutes: 60,
            slots_per_day: 3,
        }
    }
}

impl PlannerConfig {
    /// Planner parameters with a per-request slot cap applied
    pub fn params(&self, slots_per_day: Option<u32>) -> PlannerParams {
        PlannerParams {
            day_start: self.day_start,
            day_end: self.day_end,
            session_minutes: self.session_minutes,
            slots_per_day: slots_per_day.unwrap_or(self.slots_per_day),
        }
    }
}

/// Review follow-up scheduling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Days between completing a task and its scheduled review
    pub interval_days: i64,

    /// Priority score assigned to review tasks
    pub priority: u8,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            interval_days: 3,
            priority: 85,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub planner: PlannerConfig,
    pub review: ReviewConfig,
}

impl Config {
    /// Loads configuration from a TOML file, or defaults when `path` is None
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints the type system cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.planner.day_start >= self.planner.day_end {
            return Err(ConfigError::Invalid(format!(
                "planner.day_start ({}) must be before planner.day_end ({})",
                self.planner.day_start, self.planner.day_end
            )));
        }
        if self.planner.session_minutes == 0 {
            return Err(ConfigError::Invalid(
                "planner.session_minutes must be positive".to_string(),
            ));
        }
        if self.planner.slots_per_day == 0 {
            return Err(ConfigError::Invalid(
                "planner.slots_per_day must be positive".to_string(),
            ));
        }
        if self.review.interval_days < 0 {
            return Err(ConfigError::Invalid(
                "review.interval_days must not be negative".to_string(),
            ));
        }
        if !PRIORITY_RANGE.contains(&i64::from(self.review.priority)) {
            return Err(ConfigError::Invalid(format!(
                "review.priority must be in [1, 100], got {}",
                self.review.priority
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.planner.slots_per_day, 3);
        assert_eq!(config.review.priority, 85);
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.planner.session_minutes, 60);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[planner]\nday_start = \"06:00:00\"\nslots_per_day = 5"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.planner.day_start, hm(6, 0));
        assert_eq!(config.planner.slots_per_day, 5);
        assert_eq!(config.planner.day_end, hm(20, 0));
        assert_eq!(config.review.interval_days, 3);
    }

    #[test]
    fn inverted_day_window_is_rejected() {
        let mut config = Config::default();
        config.planner.day_start = hm(21, 0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_session_length_is_rejected() {
        let mut config = Config::default();
        config.planner.session_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_review_priority_is_rejected() {
        let mut config = Config::default();
        config.review.priority = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn params_prefer_request_override() {
        let config = Config::default();
        assert_eq!(config.planner.params(None).slots_per_day, 3);
        assert_eq!(config.planner.params(Some(6)).slots_per_day, 6);
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/studyflow.toml")));
        assert!(result.is_err());
    }
}
