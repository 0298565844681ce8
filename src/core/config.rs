//! # Configuration
//!
//! Environment-driven settings, loaded after `dotenvy` has populated the process env.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{anyhow, Result};
use chrono::Weekday;
use chrono_tz::Tz;

/// Default Google Calendar v3 endpoint
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Default marker title used to find previously generated reminders
pub const DEFAULT_TITLE: &str = "Weight";

/// Default number of reminders generated per week
pub const DEFAULT_COUNT: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub calendar_id: Option<String>,
    pub access_token: Option<String>,
    pub api_base: String,
    pub schedule_path: Option<String>,
    pub reminder_count: usize,
    pub reminder_title: String,
    pub timezone: Tz,
    pub run_weekday: Weekday,
    pub run_hour: u32,
    pub check_interval_secs: u64,
    pub run_once: bool,
    pub dry_run: bool,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let reminder_count = match non_empty("REMINDER_COUNT") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|e| anyhow!("Invalid REMINDER_COUNT '{}': {}", v, e))?,
            None => DEFAULT_COUNT,
        };

        let timezone = match non_empty("TIMEZONE") {
            Some(v) => v
                .trim()
                .parse::<Tz>()
                .map_err(|e| anyhow!("Invalid TIMEZONE '{}': {}", v, e))?,
            None => chrono_tz::America::New_York,
        };

        let run_weekday = match non_empty("RUN_WEEKDAY") {
            Some(v) => v
                .trim()
                .parse::<Weekday>()
                .map_err(|e| anyhow!("Invalid RUN_WEEKDAY '{}': {:?}", v, e))?,
            None => Weekday::Sat,
        };

        let run_hour = match non_empty("RUN_HOUR") {
            Some(v) => {
                let hour = v
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| anyhow!("Invalid RUN_HOUR '{}': {}", v, e))?;
                if hour > 23 {
                    return Err(anyhow!("RUN_HOUR must be 0-23, got {}", hour));
                }
                hour
            }
            None => 22,
        };

        let check_interval_secs = match non_empty("CHECK_INTERVAL_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow!("Invalid CHECK_INTERVAL_SECS '{}': {}", v, e))?,
            None => 3600,
        };
        if check_interval_secs == 0 {
            return Err(anyhow!("CHECK_INTERVAL_SECS must be greater than zero"));
        }

        let verbose = parse_flag(non_empty("VERBOSE").as_deref());
        let log_level = if verbose {
            "debug".to_string()
        } else {
            non_empty("LOG_LEVEL").unwrap_or_else(|| "info".to_string())
        };

        Ok(Config {
            calendar_id: non_empty("CALENDAR_ID"),
            access_token: non_empty("CALENDAR_ACCESS_TOKEN"),
            api_base: non_empty("CALENDAR_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            schedule_path: non_empty("SCHEDULE_PATH"),
            reminder_count,
            reminder_title: non_empty("REMINDER_TITLE")
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            timezone,
            run_weekday,
            run_hour,
            check_interval_secs,
            run_once: parse_flag(non_empty("RUN_ONCE").as_deref()),
            dry_run: parse_flag(non_empty("DRY_RUN").as_deref()),
            log_level,
        })
    }

    /// Calendar id and token, required unless running dry
    pub fn calendar_credentials(&self) -> Result<(String, String)> {
        let calendar_id = self
            .calendar_id
            .clone()
            .ok_or_else(|| anyhow!("CALENDAR_ID must be set (or enable DRY_RUN)"))?;
        let token = self
            .access_token
            .clone()
            .ok_or_else(|| anyhow!("CALENDAR_ACCESS_TOKEN must be set (or enable DRY_RUN)"))?;
        Ok((calendar_id, token))
    }
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}
