//! Delete-then-insert replacement of marker events.
//!
//! Not transactional: the first calendar error stops the batch and nothing already
//! deleted or created is rolled back. The next run's delete-by-marker clears up.

use crate::core::{CalendarError, ScheduleError};
use crate::features::calendar::{CalendarClient, ReminderEvent};
use crate::features::sampler::ResolvedSlot;
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;

/// What a reconciliation pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Marker events removed
    pub deleted: usize,
    /// Marker events that vanished between list and delete
    pub already_gone: usize,
    /// New marker events inserted
    pub created: usize,
    /// Slots that failed to resolve and were not inserted
    pub skipped: usize,
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deleted {} ({} already gone), created {}, skipped {}",
            self.deleted, self.already_gone, self.created, self.skipped
        )
    }
}

#[derive(Clone)]
pub struct Reconciler {
    calendar: Arc<dyn CalendarClient>,
    title: String,
}

impl Reconciler {
    pub fn new(calendar: Arc<dyn CalendarClient>, title: impl Into<String>) -> Self {
        Reconciler {
            calendar,
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Remove every event carrying the marker title
    pub async fn clear_markers(&self, report: &mut ReconcileReport) -> Result<(), CalendarError> {
        let events = self.calendar.list_events().await?;
        let markers: Vec<_> = events.into_iter().filter(|e| e.has_title(&self.title)).collect();
        debug!("Found {} '{}' events to delete", markers.len(), self.title);

        for event in markers {
            match self.calendar.delete_event(&event.id).await {
                Ok(()) => {
                    report.deleted += 1;
                    info!("Deleted event {}", event.id);
                }
                Err(CalendarError::NotFound(id)) => {
                    report.already_gone += 1;
                    debug!("Event {} was already gone", id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Replace all marker events with one event per resolved slot
    pub async fn reconcile(
        &self,
        slots: &[Result<ResolvedSlot, ScheduleError>],
    ) -> Result<ReconcileReport, CalendarError> {
        let mut report = ReconcileReport::default();
        self.clear_markers(&mut report).await?;

        for slot in slots {
            let slot = match slot {
                Ok(slot) => slot,
                Err(e) => {
                    warn!("Skipping slot: {}", e);
                    report.skipped += 1;
                    continue;
                }
            };

            let event = ReminderEvent::at(&self.title, &slot.timestamp);
            let created = self.calendar.insert_event(&event).await?;
            report.created += 1;
            info!(
                "Event created: {}",
                created.html_link.as_deref().unwrap_or(created.id.as_str())
            );
        }

        Ok(report)
    }
}
