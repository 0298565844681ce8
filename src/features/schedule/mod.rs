//! # Feature: Weekly Schedule
//!
//! Per-weekday tables of allowed, non-overlapping intervals. Built once from
//! configuration and shared read-only for the process lifetime.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: YAML schedule files with `HH:MM` or HHMM boundaries
//! - 1.0.0: Initial release with the built-in week

pub mod file;
pub mod week;

pub use file::ScheduleFile;
pub use week::{DayProfile, Interval, WeekSchedule, MINUTES_PER_DAY};
