//! # Features
//!
//! - `schedule`: weekly allowed-interval model
//! - `sampler`: stratified slot sampling and timestamp resolution
//! - `calendar`: remote calendar collaborators
//! - `reminders`: reconciliation and the weekly run loop

pub mod calendar;
pub mod reminders;
pub mod sampler;
pub mod schedule;

pub use calendar::{CalendarClient, CalendarEvent, GoogleCalendar, InMemoryCalendar, ReminderEvent};
pub use reminders::{ReconcileReport, Reconciler, ReminderScheduler, RunGate, WeeklyWindow};
pub use sampler::{LatinHypercube, ResolvedSlot, SamplePoint, SlotSampler};
pub use schedule::{DayProfile, WeekSchedule};
