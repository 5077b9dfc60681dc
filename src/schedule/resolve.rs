//! Occurrence resolution — candidates for a date, per entity kind, with
//! override filtering and relocation.
//!
//! Three independent rules, one per kind, all consuming the viewed
//! date's [`OverrideIndex`] plus a second index of records deferred
//! *into* the viewed date from another day. A missing override record
//! always reads as pending; resolution never errors on override data,
//! it only excludes entities whose own fields are malformed.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calendar::model::CalendarEvent;
use crate::routines::model::{RecurrencePattern, RoutineDefinition};
use crate::schedule::instance::{ActionableInstance, EntityKind, InstanceStatus};
use crate::schedule::overrides::OverrideIndex;
use crate::schedule::recurrence;
use crate::tasks::model::Task;

/// One entity's appearance on one calendar date, in the common shape
/// shared by all three kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineItem {
    /// The entity's id in string form.
    pub id: String,
    /// The day this occurrence's override record is keyed by. For an
    /// occurrence moved across days this is the source day, not the
    /// viewed day — status actions must address the source key.
    pub occurrence_date: NaiveDate,
    /// Kind of the underlying entity.
    pub kind: EntityKind,
    /// Display title.
    pub title: String,
    /// Effective start, after any same-day retime.
    pub start: Option<NaiveDateTime>,
    /// End time, where the source carries one.
    pub end: Option<NaiveDateTime>,
    /// Whole-day occurrence.
    pub all_day: bool,
    /// Done, either on the occurrence or on the entity itself.
    pub completed: bool,
    /// Struck from the day but still listed.
    pub skipped: bool,
}

/// Same-day `deferred_to` acts as a retime of the occurrence's start.
///
/// The writer only pairs `deferred_to` with `Deferred`, but a `Pending`
/// record carrying one is honored rather than rejected — odd override
/// data never errors.
fn effective_start(
    native: Option<NaiveDateTime>,
    record: Option<&ActionableInstance>,
    date: NaiveDate,
) -> Option<NaiveDateTime> {
    if let Some(record) = record
        && matches!(
            record.status,
            InstanceStatus::Deferred | InstanceStatus::Pending
        )
        && let Some(target) = record.deferred_to
        && target.date() == date
    {
        return Some(target);
    }
    native
}

/// Whether a record moves its occurrence off `date` to another day.
///
/// A deferred record without a target is treated as pending.
fn deferred_away(record: &ActionableInstance, date: NaiveDate) -> bool {
    record.status == InstanceStatus::Deferred
        && matches!(record.deferred_to_date(), Some(target) if target != date)
}

/// Resolve scheduled tasks for `date`.
///
/// Only explicitly scheduled tasks are examined here — inbox resolution
/// (no `scheduled_for`, `deferred_until` elapsed) lives in the caller's
/// presentation layer. A skipped task stays listed but struck: the only
/// occurrence of a one-off must not vanish from the day view the way a
/// recurring occurrence can.
pub fn resolve_tasks(
    tasks: &[Task],
    date: NaiveDate,
    overrides: &OverrideIndex,
    deferred_in: &OverrideIndex,
) -> Vec<TimelineItem> {
    let mut items = Vec::new();
    for task in tasks {
        let Some(scheduled) = task.scheduled_for else {
            continue;
        };
        let id = task.id.to_string();
        if scheduled.date() == date {
            let record = overrides.get(EntityKind::Task, &id);
            if record.is_some_and(|r| deferred_away(r, date)) {
                continue;
            }
            let status = record.map(|r| r.status);
            items.push(TimelineItem {
                id,
                occurrence_date: date,
                kind: EntityKind::Task,
                title: task.title.clone(),
                start: effective_start(Some(scheduled), record, date),
                end: None,
                all_day: task.is_all_day,
                completed: task.completed || status == Some(InstanceStatus::Completed),
                skipped: status == Some(InstanceStatus::Skipped),
            });
        } else if let Some(moved) = deferred_in.get(EntityKind::Task, &id) {
            items.push(TimelineItem {
                id,
                occurrence_date: moved.date,
                kind: EntityKind::Task,
                title: task.title.clone(),
                start: moved.deferred_to,
                end: None,
                all_day: false,
                completed: task.completed,
                skipped: false,
            });
        }
    }
    items
}

/// Resolve routine occurrences for `date`.
///
/// Candidates are the timeline-visible definitions whose pattern
/// recurs on `date`, union routines deferred into `date` from another
/// day (injected even when the pattern does not naturally recur).
/// Skipped occurrences are dropped; deferred occurrences are dropped
/// unless their target is the viewed date.
pub fn resolve_routines(
    definitions: &[RoutineDefinition],
    date: NaiveDate,
    overrides: &OverrideIndex,
    deferred_in: &OverrideIndex,
) -> Vec<TimelineItem> {
    let mut items = Vec::new();
    for definition in definitions {
        if !definition.show_on_timeline {
            continue;
        }
        if definition.recurrence == RecurrencePattern::Unknown {
            warn!(
                routine = %definition.name,
                "Unrecognized recurrence pattern, excluding from resolution"
            );
            continue;
        }
        let id = definition.id.to_string();
        let record = overrides.get(EntityKind::Routine, &id);

        match record.map(|r| r.status) {
            Some(InstanceStatus::Skipped) => continue,
            Some(InstanceStatus::Deferred) => {
                if record.is_some_and(|r| deferred_away(r, date)) {
                    continue;
                }
            }
            _ => {}
        }

        let (occurrence_date, start) = if recurrence::applies(&definition.recurrence, date) {
            let native = definition.time_of_day.map(|t| date.and_time(t));
            (date, effective_start(native, record, date))
        } else {
            match deferred_in.get(EntityKind::Routine, &id) {
                Some(moved) => (moved.date, moved.deferred_to),
                None => continue,
            }
        };

        items.push(TimelineItem {
            id,
            occurrence_date,
            kind: EntityKind::Routine,
            title: definition.name.clone(),
            start,
            end: None,
            all_day: false,
            completed: record.map(|r| r.status) == Some(InstanceStatus::Completed),
            skipped: false,
        });
    }
    items
}

/// Resolve calendar events for `date`.
///
/// Skipped events and events deferred to a different day are dropped.
/// A moved event is not re-injected on its target date — the external
/// calendar, not this engine, is the source of truth for event timing;
/// only a same-day retime is applied.
pub fn resolve_events(
    events: &[CalendarEvent],
    date: NaiveDate,
    overrides: &OverrideIndex,
) -> Vec<TimelineItem> {
    let mut items = Vec::new();
    for event in events {
        if event.start.date() != date {
            continue;
        }
        let record = overrides.get(EntityKind::CalendarEvent, &event.id);
        match record.map(|r| r.status) {
            Some(InstanceStatus::Skipped) => continue,
            Some(InstanceStatus::Deferred) => {
                if record.is_some_and(|r| deferred_away(r, date)) {
                    continue;
                }
            }
            _ => {}
        }
        items.push(TimelineItem {
            id: event.id.clone(),
            occurrence_date: date,
            kind: EntityKind::CalendarEvent,
            title: event.title.clone(),
            start: effective_start(Some(event.start), record, date),
            end: event.end,
            all_day: event.all_day,
            completed: record.map(|r| r.status) == Some(InstanceStatus::Completed),
            skipped: false,
        });
    }
    items
}
