//! Provider-neutral calendar event types.
//!
//! Events are a read-only projection of the external calendar for a
//! requested range. The engine never writes back to them; moving or
//! hiding an occurrence lives entirely in override records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A calendar event as handed back by the external calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Provider-native ID.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Start of the event.
    pub start: NaiveDateTime,
    /// End of the event, if the provider supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDateTime>,
    /// Whole-day event.
    pub all_day: bool,
}

impl CalendarEvent {
    /// Create a timed event.
    pub fn new(id: impl Into<String>, title: impl Into<String>, start: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end: None,
            all_day: false,
        }
    }

    /// Builder: set the end time.
    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Builder: mark as a whole-day event.
    pub fn as_all_day(mut self) -> Self {
        self.all_day = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn new_event_defaults() {
        let event = CalendarEvent::new("ext-1", "Swim practice", at(16, 0));
        assert!(event.end.is_none());
        assert!(!event.all_day);
    }

    #[test]
    fn event_serde_roundtrip() {
        let event = CalendarEvent::new("ext-1", "Swim practice", at(16, 0)).with_end(at(17, 0));
        let json = serde_json::to_string(&event).unwrap();
        let parsed: CalendarEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn end_omitted_when_absent() {
        let event = CalendarEvent::new("ext-1", "Holiday", at(0, 0)).as_all_day();
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("\"end\""));
        assert!(json.contains("\"all_day\":true"));
    }
}
