// Core layer - shared configuration and error types
pub mod core;

// Features layer - schedule model, sampler, calendar collaborators, reminders
pub mod features;

// Re-export core config
pub use crate::core::{CalendarError, Config, ScheduleError};

// Re-export feature items
pub use features::{
    // Calendar
    CalendarClient, CalendarEvent, GoogleCalendar, InMemoryCalendar, ReminderEvent,
    // Reminders
    ReconcileReport, Reconciler, ReminderScheduler, RunGate, WeeklyWindow,
    // Sampler
    LatinHypercube, ResolvedSlot, SamplePoint, SlotSampler,
    // Schedule
    DayProfile, WeekSchedule,
};
