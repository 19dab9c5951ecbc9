//! Calendar event record shared with the hub's dashboards.
//!
//! The layout engine only reads `id`, `start`, `end` and `all_day`. The rest of
//! the record rides along untouched so callers can render from the same value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event as supplied by the event store.
///
/// Field names serialize in camelCase to match the stored document shape
/// (`allDay`, `tutorName`, `meetingLink`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,

    // Opaque payload
    /// Tutor running the session; its presence marks the event as a lesson
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Student the event belongs to (used by event sources for filtering)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

/// Dashboard classification of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Lesson,
    Meeting,
}

impl CalendarEvent {
    /// Create a timed event with an empty payload.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        CalendarEvent {
            id: id.into(),
            title: title.into(),
            start,
            end,
            all_day: false,
            tutor_name: None,
            cost: None,
            meeting_link: None,
            description: None,
            student_id: None,
        }
    }

    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    pub fn with_tutor(mut self, tutor_name: impl Into<String>) -> Self {
        self.tutor_name = Some(tutor_name.into());
        self
    }

    pub fn for_student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    /// Lessons have a tutor; everything else is a meeting.
    pub fn kind(&self) -> EventKind {
        match self.tutor_name.as_deref() {
            Some(name) if !name.trim().is_empty() => EventKind::Lesson,
            _ => EventKind::Meeting,
        }
    }

    /// True when `end` is before `start`.
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }
}

impl std::fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deserialize_document_shape() {
        let json = r#"{
            "id": "evt-1",
            "title": "Speech therapy",
            "start": "2025-03-17T09:00:00Z",
            "end": "2025-03-17T10:00:00Z",
            "allDay": false,
            "tutorName": "Ms Patel",
            "cost": 45.5,
            "meetingLink": "https://meet.example.com/abc"
        }"#;

        let event: CalendarEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt-1");
        assert_eq!(event.start, Utc.with_ymd_and_hms(2025, 3, 17, 9, 0, 0).unwrap());
        assert_eq!(event.tutor_name.as_deref(), Some("Ms Patel"));
        assert_eq!(event.cost, Some(45.5));
        assert_eq!(event.description, None);
        assert_eq!(event.kind(), EventKind::Lesson);
    }

    #[test]
    fn test_all_day_defaults_to_false() {
        let json = r#"{"id":"x","title":"Review","start":"2025-03-19T00:00:00Z","end":"2025-03-20T00:00:00Z"}"#;
        let event: CalendarEvent = serde_json::from_str(json).unwrap();
        assert!(!event.all_day);
        assert_eq!(event.kind(), EventKind::Meeting);
    }

    #[test]
    fn test_inverted_interval() {
        let start = Utc.with_ymd_and_hms(2025, 3, 17, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 17, 9, 0, 0).unwrap();
        assert!(CalendarEvent::new("a", "Backwards", start, end).is_inverted());
        assert!(!CalendarEvent::new("b", "Instant", start, start).is_inverted());
    }

    #[test]
    fn test_blank_tutor_is_a_meeting() {
        let start = Utc.with_ymd_and_hms(2025, 3, 17, 9, 0, 0).unwrap();
        let event = CalendarEvent::new("a", "Check-in", start, start).with_tutor("  ");
        assert_eq!(event.kind(), EventKind::Meeting);
    }
}
