//! In-memory calendar for dry runs and tests.

use super::client::{CalendarClient, CalendarEvent, ReminderEvent};
use crate::core::CalendarError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct InMemoryCalendar {
    events: DashMap<String, CalendarEvent>,
    inserted: AtomicUsize,
    /// Inserts beyond this many fail with a 500, to exercise partial batches
    insert_limit: Option<usize>,
}

impl InMemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_insert_limit(limit: usize) -> Self {
        InMemoryCalendar {
            insert_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Seed an event with a fixed id and title
    pub fn add(&self, id: &str, title: &str) {
        self.events.insert(
            id.to_string(),
            CalendarEvent {
                id: id.to_string(),
                summary: Some(title.to_string()),
                html_link: None,
                start: None,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn count_titled(&self, title: &str) -> usize {
        self.events.iter().filter(|e| e.has_title(title)).count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.events.contains_key(id)
    }
}

#[async_trait]
impl CalendarClient for InMemoryCalendar {
    async fn list_events(&self) -> Result<Vec<CalendarEvent>, CalendarError> {
        let mut events: Vec<CalendarEvent> = self.events.iter().map(|e| e.value().clone()).collect();
        events.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(events)
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError> {
        self.events
            .remove(event_id)
            .map(|_| ())
            .ok_or_else(|| CalendarError::NotFound(event_id.to_string()))
    }

    async fn insert_event(&self, event: &ReminderEvent) -> Result<CalendarEvent, CalendarError> {
        let count = self.inserted.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.insert_limit {
            if count >= limit {
                return Err(CalendarError::Status {
                    operation: "insert",
                    status: 500,
                    body: "insert limit reached".to_string(),
                });
            }
        }

        let id = uuid::Uuid::new_v4().simple().to_string();
        let created = CalendarEvent {
            id: id.clone(),
            summary: Some(event.summary.clone()),
            html_link: Some(format!("memory://events/{id}")),
            start: Some(event.start.clone()),
        };
        self.events.insert(id, created.clone());
        Ok(created)
    }
}
