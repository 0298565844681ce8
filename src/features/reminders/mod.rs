//! # Reminders Feature
//!
//! Weekly replacement of randomized reminder events: delete the previous batch by
//! marker title, then insert freshly sampled slots.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Run gate with explicit last-run state replaces the weekly done flag
//! - 1.0.0: Initial release

pub mod reconcile;
pub mod scheduler;

pub use reconcile::{ReconcileReport, Reconciler};
pub use scheduler::{ReminderScheduler, RunGate, WeeklyWindow};
