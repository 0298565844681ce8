//! # Feature: Calendar Collaborators
//!
//! The remote calendar as seen by reconciliation: list, delete and insert.
//! `GoogleCalendar` talks to the Calendar v3 REST API; `InMemoryCalendar` backs
//! dry runs and tests.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod client;
pub mod google;
pub mod memory;

pub use client::{
    CalendarClient, CalendarEvent, EventTime, ReminderEvent, ReminderMethod, ReminderOverride,
    Reminders,
};
pub use google::GoogleCalendar;
pub use memory::InMemoryCalendar;
