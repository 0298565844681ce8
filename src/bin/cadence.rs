use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;

use cadence::core::Config;
use cadence::features::calendar::{CalendarClient, GoogleCalendar, InMemoryCalendar};
use cadence::features::reminders::{Reconciler, ReminderScheduler, RunGate, WeeklyWindow};
use cadence::features::sampler::SlotSampler;
use cadence::features::schedule::{ScheduleFile, WeekSchedule};

fn load_schedule(config: &Config) -> Result<WeekSchedule> {
    match &config.schedule_path {
        Some(path) => {
            let schedule = ScheduleFile::load(path)?;
            info!("📄 Loaded week schedule from {path}");
            Ok(schedule)
        }
        None => {
            info!("📄 No SCHEDULE_PATH set - using the built-in week");
            Ok(WeekSchedule::default_week())
        }
    }
}

fn build_calendar(config: &Config) -> Result<Arc<dyn CalendarClient>> {
    if config.dry_run {
        info!("Dry run: reminders go to an in-memory calendar");
        return Ok(Arc::new(InMemoryCalendar::new()));
    }
    let (calendar_id, token) = config.calendar_credentials()?;
    let calendar = GoogleCalendar::new(&config.api_base, &calendar_id, &token)?;
    info!("Using calendar {}", calendar.events_url());
    Ok(Arc::new(calendar))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting cadence reminder generator...");

    // Schedule problems are configuration errors: fail before touching the calendar
    let schedule = load_schedule(&config)?;
    let calendar = build_calendar(&config)?;

    let sampler = SlotSampler::new(schedule, config.timezone);
    let reconciler = Reconciler::new(calendar, config.reminder_title.clone());
    let scheduler = ReminderScheduler::new(
        sampler,
        reconciler,
        config.reminder_count,
        Duration::from_secs(config.check_interval_secs),
    );

    if config.run_once {
        info!("Current time: {}", scheduler.now());
        let report = scheduler.run_now().await.map_err(|e| {
            error!("Reminder batch failed: {e:#}");
            e
        })?;
        info!("Reminder batch complete: {report}");
        return Ok(());
    }

    let window = WeeklyWindow::new(config.run_weekday, config.run_hour);
    info!(
        "Checking every {}s for the {:?} {:02}:00 window",
        config.check_interval_secs, window.weekday, window.hour
    );

    tokio::select! {
        _ = scheduler.run(RunGate::new(window)) => {}
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!("Failed to listen for shutdown signal: {e}");
            }
            info!("Shutting down");
        }
    }

    Ok(())
}
