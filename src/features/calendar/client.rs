//! Calendar client trait and the event shapes it exchanges.
//!
//! Field names follow the Calendar v3 JSON representation so the same types serve
//! the REST client and the in-memory calendar.

use crate::core::CalendarError;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Start or end of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// An event as returned by the calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub html_link: Option<String>,
    #[serde(default)]
    pub start: Option<EventTime>,
}

impl CalendarEvent {
    pub fn has_title(&self, title: &str) -> bool {
        self.summary.as_deref() == Some(title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Popup,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: ReminderMethod,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

impl Reminders {
    /// Popup and email, both firing at event time
    pub fn immediate() -> Self {
        Reminders {
            use_default: false,
            overrides: vec![
                ReminderOverride {
                    method: ReminderMethod::Popup,
                    minutes: 0,
                },
                ReminderOverride {
                    method: ReminderMethod::Email,
                    minutes: 0,
                },
            ],
        }
    }
}

/// Body of an insert request: a zero-duration marker event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderEvent {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    pub reminders: Reminders,
}

impl ReminderEvent {
    pub fn at(title: &str, timestamp: &DateTime<Tz>) -> Self {
        let time = EventTime {
            date_time: Some(timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
            time_zone: Some(timestamp.timezone().name().to_string()),
        };
        ReminderEvent {
            summary: title.to_string(),
            start: time.clone(),
            end: time,
            reminders: Reminders::immediate(),
        }
    }
}

/// Remote calendar operations needed to replace marker events
#[async_trait]
pub trait CalendarClient: Send + Sync {
    /// Every event on the calendar
    async fn list_events(&self) -> Result<Vec<CalendarEvent>, CalendarError>;

    /// Returns `CalendarError::NotFound` if the event is already gone
    async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError>;

    async fn insert_event(&self, event: &ReminderEvent) -> Result<CalendarEvent, CalendarError>;
}
