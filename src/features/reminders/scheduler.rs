//! # Reminder Scheduler
//!
//! Hourly check that runs one reminder batch per week inside a fixed window
//! (Saturday from 22:00 by default). Run state lives in a `RunGate` owned by the
//! caller, not in a global flag.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Explicit `RunGate`; failed batches retry on the next tick in the window
//! - 1.0.0: Initial release

use super::reconcile::{ReconcileReport, Reconciler};
use crate::core::ScheduleError;
use crate::features::sampler::{ResolvedSlot, SlotSampler};
use anyhow::Result;
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use log::{debug, error, info};
use rand::Rng;
use std::time::Duration;

/// Weekday and hour from which a weekly batch becomes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyWindow {
    pub weekday: Weekday,
    pub hour: u32,
}

impl WeeklyWindow {
    pub fn new(weekday: Weekday, hour: u32) -> Self {
        WeeklyWindow {
            weekday,
            hour: hour.min(23),
        }
    }

    /// True from `hour` until the end of `weekday`
    pub fn contains(&self, now: &DateTime<Tz>) -> bool {
        now.weekday() == self.weekday && now.hour() >= self.hour
    }
}

impl Default for WeeklyWindow {
    fn default() -> Self {
        WeeklyWindow::new(Weekday::Sat, 22)
    }
}

/// Whether this week's batch still needs to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunGate {
    window: WeeklyWindow,
    last_run: Option<DateTime<Tz>>,
}

impl RunGate {
    pub fn new(window: WeeklyWindow) -> Self {
        RunGate {
            window,
            last_run: None,
        }
    }

    pub fn with_last_run(window: WeeklyWindow, last_run: DateTime<Tz>) -> Self {
        RunGate {
            window,
            last_run: Some(last_run),
        }
    }

    pub fn last_run(&self) -> Option<&DateTime<Tz>> {
        self.last_run.as_ref()
    }

    pub fn is_due(&self, now: &DateTime<Tz>) -> bool {
        if !self.window.contains(now) {
            return false;
        }
        match &self.last_run {
            Some(last) => last.date_naive() != now.date_naive(),
            None => true,
        }
    }

    pub fn record_run(&mut self, now: DateTime<Tz>) {
        self.last_run = Some(now);
    }
}

/// Samples and reconciles one weekly batch when the gate allows it
pub struct ReminderScheduler {
    sampler: SlotSampler,
    reconciler: Reconciler,
    count: usize,
    check_interval: Duration,
}

impl ReminderScheduler {
    pub fn new(
        sampler: SlotSampler,
        reconciler: Reconciler,
        count: usize,
        check_interval: Duration,
    ) -> Self {
        ReminderScheduler {
            sampler,
            reconciler,
            count,
            check_interval,
        }
    }

    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.sampler.timezone())
    }

    pub fn sample<R: Rng + ?Sized>(
        &self,
        now: &DateTime<Tz>,
        rng: &mut R,
    ) -> Vec<Result<ResolvedSlot, ScheduleError>> {
        self.sampler.generate(self.count, now, rng)
    }

    /// Sample `count` slots and replace the calendar's marker events with them
    pub async fn run_batch(&self, now: &DateTime<Tz>) -> Result<ReconcileReport> {
        let slots = self.sample(now, &mut rand::rng());
        let report = self.reconciler.reconcile(&slots).await?;
        Ok(report)
    }

    /// Sample from the current time with the thread RNG and reconcile, ignoring the gate
    pub async fn run_now(&self) -> Result<ReconcileReport> {
        let slots = self.sampler.generate_now(self.count);
        let report = self.reconciler.reconcile(&slots).await?;
        Ok(report)
    }

    /// One scheduler check. Returns `None` when nothing was due.
    ///
    /// A failed batch is not recorded, so the next check inside the window retries it.
    pub async fn tick(
        &self,
        gate: &mut RunGate,
        now: DateTime<Tz>,
    ) -> Option<Result<ReconcileReport>> {
        if !gate.is_due(&now) {
            return None;
        }

        info!("Generating '{}' reminders...", self.reconciler.title());
        let result = self.run_batch(&now).await;
        match &result {
            Ok(report) => {
                info!("Reminder batch complete: {}", report);
                gate.record_run(now);
            }
            Err(e) => error!("Reminder batch failed: {:#}", e),
        }
        Some(result)
    }

    /// Check the gate every `check_interval`, forever
    pub async fn run(&self, mut gate: RunGate) {
        let mut interval = tokio::time::interval(self.check_interval);
        loop {
            interval.tick().await;
            let now = self.now();
            info!("Now {}, last run {:?}", now, gate.last_run().map(|t| t.to_rfc3339()));
            if self.tick(&mut gate, now).await.is_none() {
                debug!("Outside the run window or already run today");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::calendar::InMemoryCalendar;
    use crate::features::schedule::WeekSchedule;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;
    use std::sync::Arc;

    fn at(day: u32, hour: u32) -> DateTime<Tz> {
        // October 2026: the 17th and 24th are Saturdays
        New_York.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap()
    }

    fn scheduler(calendar: Arc<InMemoryCalendar>) -> ReminderScheduler {
        ReminderScheduler::new(
            SlotSampler::new(WeekSchedule::default_week(), New_York),
            Reconciler::new(calendar, "Weight"),
            10,
            Duration::from_secs(3600),
        )
    }

    #[test]
    fn test_window_contains() {
        let window = WeeklyWindow::default();
        assert!(!window.contains(&at(17, 21)));
        assert!(window.contains(&at(17, 22)));
        assert!(window.contains(&at(17, 23)));
        assert!(!window.contains(&at(18, 22)));
        assert!(!window.contains(&at(16, 23)));
    }

    #[test]
    fn test_gate_runs_once_per_week() {
        let mut gate = RunGate::new(WeeklyWindow::default());
        assert!(!gate.is_due(&at(17, 10)));
        assert!(gate.is_due(&at(17, 22)));

        gate.record_run(at(17, 22));
        assert!(!gate.is_due(&at(17, 23)));
        assert!(!gate.is_due(&at(18, 22)));
        assert!(gate.is_due(&at(24, 22)));
    }

    #[test]
    fn test_gate_with_prior_run() {
        let gate = RunGate::with_last_run(WeeklyWindow::new(Weekday::Sat, 22), at(10, 22));
        assert!(gate.is_due(&at(17, 22)));
        assert_eq!(gate.last_run(), Some(&at(10, 22)));
    }

    #[tokio::test]
    async fn test_tick_runs_batch_when_due() {
        let calendar = Arc::new(InMemoryCalendar::new());
        let scheduler = scheduler(calendar.clone());
        let mut gate = RunGate::new(WeeklyWindow::default());

        assert!(scheduler.tick(&mut gate, at(17, 21)).await.is_none());
        assert!(calendar.is_empty());

        let report = scheduler.tick(&mut gate, at(17, 22)).await.unwrap().unwrap();
        assert_eq!(report.created, 10);
        assert_eq!(calendar.count_titled("Weight"), 10);
        assert_eq!(gate.last_run(), Some(&at(17, 22)));

        assert!(scheduler.tick(&mut gate, at(17, 23)).await.is_none());

        let report = scheduler.tick(&mut gate, at(24, 22)).await.unwrap().unwrap();
        assert_eq!(report.deleted, 10);
        assert_eq!(calendar.count_titled("Weight"), 10);
    }

    #[tokio::test]
    async fn test_failed_batch_retries_next_tick() {
        let calendar = Arc::new(InMemoryCalendar::with_insert_limit(3));
        let scheduler = scheduler(calendar.clone());
        let mut gate = RunGate::new(WeeklyWindow::default());

        let result = scheduler.tick(&mut gate, at(17, 22)).await.unwrap();
        assert!(result.is_err());
        assert!(gate.last_run().is_none());
        assert!(gate.is_due(&at(17, 23)));
    }

    #[tokio::test]
    async fn test_run_now_replaces_markers() {
        let calendar = Arc::new(InMemoryCalendar::new());
        calendar.add("old-1", "Weight");
        let scheduler = scheduler(calendar.clone());

        let report = scheduler.run_now().await.unwrap();
        assert_eq!(report.deleted, 1);
        assert_eq!(report.created, 10);
        assert!(!calendar.contains("old-1"));
        assert_eq!(calendar.count_titled("Weight"), 10);
    }

    #[test]
    fn test_sample_uses_configured_count() {
        let scheduler = scheduler(Arc::new(InMemoryCalendar::new()));
        let mut rng = rand::rng();
        assert_eq!(scheduler.sample(&at(17, 22), &mut rng).len(), 10);
    }
}
