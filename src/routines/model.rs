//! Routine data model — recurring templates evaluated per calendar day.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weekday codes as persisted in weekly recurrence patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayCode {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl From<Weekday> for DayCode {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayCode::Mon,
            Weekday::Tue => DayCode::Tue,
            Weekday::Wed => DayCode::Wed,
            Weekday::Thu => DayCode::Thu,
            Weekday::Fri => DayCode::Fri,
            Weekday::Sat => DayCode::Sat,
            Weekday::Sun => DayCode::Sun,
        }
    }
}

/// When a routine recurs.
///
/// Unrecognized persisted patterns deserialize to `Unknown`, which
/// never recurs — one corrupt routine must not take down a whole day's
/// schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecurrencePattern {
    /// Every day.
    Daily,
    /// On the listed weekdays. An empty list never recurs.
    Weekly {
        #[serde(default)]
        days: Vec<DayCode>,
    },
    /// On one day of the month. `day_of_month: 31` simply never fires
    /// in short months; there is no end-of-month clamping.
    Monthly {
        #[serde(default)]
        day_of_month: u32,
    },
    /// Catch-all for unrecognized persisted patterns.
    #[serde(other)]
    Unknown,
}

/// A recurring template. Immutable from the engine's perspective during
/// a single date's resolution; edited only by its owning store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineDefinition {
    /// Unique ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// When the routine recurs.
    pub recurrence: RecurrencePattern,
    /// Clock time of the occurrence, persisted as `"HH:MM"`.
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<NaiveTime>,
    /// Family member responsible, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Whether occurrences appear on the day timeline.
    pub show_on_timeline: bool,
}

impl RoutineDefinition {
    /// Create a new timeline-visible routine.
    pub fn new(name: impl Into<String>, recurrence: RecurrencePattern) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            recurrence,
            time_of_day: None,
            assigned_to: None,
            show_on_timeline: true,
        }
    }

    /// Builder: set the occurrence clock time.
    pub fn with_time_of_day(mut self, time: NaiveTime) -> Self {
        self.time_of_day = Some(time);
        self
    }

    /// Builder: assign to a family member.
    pub fn with_assignee(mut self, who: impl Into<String>) -> Self {
        self.assigned_to = Some(who.into());
        self
    }

    /// Builder: keep occurrences off the day timeline.
    pub fn hidden_from_timeline(mut self) -> Self {
        self.show_on_timeline = false;
        self
    }
}

/// `"HH:MM"` serde for `Option<NaiveTime>`.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}
