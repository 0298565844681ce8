//! # Error Types
//!
//! Typed failures for schedule construction, slot resolution and the remote calendar.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use thiserror::Error;

/// Failures raised while building a week schedule or resolving a sampled slot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Configuration error, raised once at construction
    #[error("malformed profile for weekday {weekday}: {reason}")]
    MalformedDayProfile { weekday: u8, reason: String },

    /// The sampled day has no allowed minutes; reported per slot
    #[error("no availability configured for weekday {weekday}")]
    NoAvailabilityForDay { weekday: u8 },

    /// The local wall-clock time does not exist in the configured timezone
    #[error("local time {local} does not exist in {timezone}")]
    NonexistentLocalTime { local: String, timezone: String },
}

impl ScheduleError {
    pub(crate) fn malformed(weekday: u8, reason: impl Into<String>) -> Self {
        ScheduleError::MalformedDayProfile {
            weekday,
            reason: reason.into(),
        }
    }
}

/// Failures from the external calendar collaborator. Never retried here.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("calendar returned {status} for {operation}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("unexpected calendar response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("event {0} not found")]
    NotFound(String),

    #[error("invalid calendar configuration: {0}")]
    Config(String),
}
