//! Task data model — one-off actionable items.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of work a task represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Household,
    Errand,
    School,
    Work,
    Health,
    Other,
}

/// A single one-off task.
///
/// "Done" is a property of the task itself, not of an occurrence —
/// a task has no recurrence, so completing it flips `completed` through
/// the task store rather than leaving an override record behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique ID.
    pub id: Uuid,
    /// Short title.
    pub title: String,
    /// Whether the task is done.
    pub completed: bool,
    /// When the task is scheduled, if it has left the inbox.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<NaiveDateTime>,
    /// Scheduled for a whole day rather than a clock time.
    pub is_all_day: bool,
    /// Inbox items stay hidden until this day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferred_until: Option<NaiveDate>,
    /// Kind of work.
    pub category: TaskCategory,
}

impl Task {
    /// Create a new unscheduled task.
    pub fn new(title: impl Into<String>, category: TaskCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
            scheduled_for: None,
            is_all_day: false,
            deferred_until: None,
            category,
        }
    }

    /// Builder: schedule at a specific date and time.
    pub fn with_schedule(mut self, when: NaiveDateTime) -> Self {
        self.scheduled_for = Some(when);
        self.is_all_day = false;
        self
    }

    /// Builder: schedule for a whole day.
    pub fn with_all_day_schedule(mut self, day: NaiveDate) -> Self {
        self.scheduled_for = day.and_hms_opt(0, 0, 0);
        self.is_all_day = true;
        self
    }

    /// Builder: hide from the inbox until a day.
    pub fn with_deferred_until(mut self, day: NaiveDate) -> Self {
        self.deferred_until = Some(day);
        self
    }
}
