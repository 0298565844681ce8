//! # Core Module
//!
//! Configuration and error types shared by every feature.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::Config;
pub use error::{CalendarError, ScheduleError};
