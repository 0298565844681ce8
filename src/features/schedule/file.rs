//! # Schedule File
//!
//! YAML week schedule. Each weekday maps to a flat boundary list (start, end, ...).
//! Boundaries are either `"HH:MM"` strings or HHMM integers such as `1615`.
//!
//! ```yaml
//! days:
//!   sunday: ["06:30", "20:30"]
//!   monday: [500, 800, 1615, 2030]
//! ```
//!
//! Weekdays left out of the file have no availability.

use super::week::{DayProfile, WeekSchedule, WEEKDAYS};
use crate::core::ScheduleError;
use anyhow::{anyhow, Result};
use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single interval boundary as written in the file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Boundary {
    /// Packed hours and minutes, e.g. `1615` for 16:15
    Hhmm(u32),
    /// Wall-clock text, e.g. `"16:15"`
    Clock(String),
}

impl Boundary {
    /// Minutes since midnight
    pub fn to_minutes(&self, weekday: u8) -> Result<u32, ScheduleError> {
        match self {
            Boundary::Hhmm(value) => {
                let (hour, minute) = (value / 100, value % 100);
                if hour > 23 || minute > 59 {
                    return Err(ScheduleError::malformed(
                        weekday,
                        format!("{value} is not a valid HHMM time"),
                    ));
                }
                Ok(hour * 60 + minute)
            }
            Boundary::Clock(text) => NaiveTime::parse_from_str(text.trim(), "%H:%M")
                .map(|t| t.hour() * 60 + t.minute())
                .map_err(|e| {
                    ScheduleError::malformed(weekday, format!("'{text}' is not HH:MM: {e}"))
                }),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScheduleFile {
    #[serde(default)]
    pub days: BTreeMap<String, Vec<Boundary>>,
}

impl ScheduleFile {
    /// Load and validate a week schedule from a YAML file
    pub fn load(path: &str) -> Result<WeekSchedule> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read schedule {}: {}", path, e))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<WeekSchedule> {
        let file: ScheduleFile = serde_yaml::from_str(contents)?;
        file.into_week()
    }

    pub fn into_week(self) -> Result<WeekSchedule> {
        let mut by_day: BTreeMap<u8, Vec<Boundary>> = BTreeMap::new();
        for (name, boundaries) in self.days {
            let weekday: Weekday = name
                .trim()
                .parse()
                .map_err(|_| anyhow!("Unknown weekday in schedule: {}", name))?;
            let index = weekday.num_days_from_sunday() as u8;
            if by_day.insert(index, boundaries).is_some() {
                return Err(anyhow!("Weekday listed twice in schedule: {}", name));
            }
        }

        let mut days = Vec::with_capacity(7);
        for weekday in WEEKDAYS {
            let index = weekday.num_days_from_sunday() as u8;
            let profile = match by_day.remove(&index) {
                Some(boundaries) => {
                    let minutes = boundaries
                        .iter()
                        .map(|b| b.to_minutes(index))
                        .collect::<Result<Vec<_>, _>>()?;
                    DayProfile::from_boundaries(index, &minutes)?
                }
                None => DayProfile::empty(index)?,
            };
            days.push(profile);
        }

        Ok(WeekSchedule::new(days)?)
    }
}
