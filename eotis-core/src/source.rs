//! Seams to the event store.
//!
//! The hub keeps events in a hosted document database. The engine only needs
//! "fetch events for a range" and "mutate by id", expressed as two traits.
//! `MemoryEventStore` implements both for tests and for JSON exports.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::{LayoutError, LayoutResult};
use crate::event::CalendarEvent;
use crate::window::ViewWindow;

/// Read side: events whose start falls in `[from, to)`.
pub trait EventSource {
    fn events_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        student_id: Option<&str>,
    ) -> LayoutResult<Vec<CalendarEvent>>;

    /// Events anchored to a day in `window`.
    ///
    /// All-day starts are dates, so the UTC fetch is padded by a day on each
    /// side and the result narrowed by anchor day.
    fn events_for_window(
        &self,
        window: &ViewWindow,
        student_id: Option<&str>,
    ) -> LayoutResult<Vec<CalendarEvent>> {
        let (from, to) = window.utc_bounds();
        let padded = self.events_between(
            from - Duration::days(1),
            to + Duration::days(1),
            student_id,
        )?;
        Ok(padded
            .into_iter()
            .filter(|e| window.contains(window.anchor_day(e)))
            .collect())
    }
}

/// Write side. Callers refetch through `EventSource` after mutating.
pub trait EventSink {
    /// Store a new event and return its id. An empty id is replaced with a fresh one.
    fn create(&mut self, event: CalendarEvent) -> LayoutResult<String>;

    /// Replace the event with the same id.
    fn update(&mut self, event: CalendarEvent) -> LayoutResult<()>;

    /// Remove and return the event with `id`.
    fn delete(&mut self, id: &str) -> LayoutResult<CalendarEvent>;
}

/// Insertion-ordered in-memory event list.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    events: Vec<CalendarEvent>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<CalendarEvent>) -> LayoutResult<Self> {
        let mut store = Self::new();
        for event in events {
            store.create(event)?;
        }
        Ok(store)
    }

    /// Load a JSON array of events.
    pub fn from_json_str(json: &str) -> LayoutResult<Self> {
        let events: Vec<CalendarEvent> =
            serde_json::from_str(json).map_err(|e| LayoutError::Serialization(e.to_string()))?;
        Self::from_events(events)
    }

    pub fn from_json_file(path: &Path) -> LayoutResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&content)?;
        debug!(path = %path.display(), events = store.len(), "loaded events");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    fn position(&self, id: &str) -> LayoutResult<usize> {
        self.events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| LayoutError::EventNotFound(id.to_string()))
    }
}

impl EventSource for MemoryEventStore {
    fn events_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        student_id: Option<&str>,
    ) -> LayoutResult<Vec<CalendarEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.start >= from && e.start < to)
            .filter(|e| match student_id {
                Some(student) => e.student_id.as_deref() == Some(student),
                None => true,
            })
            .cloned()
            .collect())
    }
}

impl EventSink for MemoryEventStore {
    fn create(&mut self, mut event: CalendarEvent) -> LayoutResult<String> {
        if event.id.is_empty() {
            event.id = uuid::Uuid::new_v4().to_string();
        } else if self.get(&event.id).is_some() {
            return Err(LayoutError::DuplicateEvent(event.id));
        }

        let id = event.id.clone();
        self.events.push(event);
        Ok(id)
    }

    fn update(&mut self, event: CalendarEvent) -> LayoutResult<()> {
        let pos = self.position(&event.id)?;
        self.events[pos] = event;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> LayoutResult<CalendarEvent> {
        let pos = self.position(id)?;
        Ok(self.events.remove(pos))
    }
}
