//! Override records — the one entity the engine itself produces.
//!
//! An [`ActionableInstance`] captures a user action against a single
//! occurrence (one entity on one calendar day). Records are created
//! lazily on the first status-changing action; absence implies
//! `pending`. At most one record exists per key — upserts replace,
//! never append.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Which kind of entity an occurrence belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    Routine,
    CalendarEvent,
}

impl EntityKind {
    /// The string tag stored in the entity_kind column.
    pub fn type_tag(&self) -> &'static str {
        match self {
            EntityKind::Task => "task",
            EntityKind::Routine => "routine",
            EntityKind::CalendarEvent => "calendar_event",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(EntityKind::Task),
            "routine" => Ok(EntityKind::Routine),
            "calendar_event" => Ok(EntityKind::CalendarEvent),
            other => Err(format!("unknown entity kind: {other}")),
        }
    }
}

/// Status of one occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    Pending,
    Completed,
    Skipped,
    Deferred,
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            InstanceStatus::Pending => "pending",
            InstanceStatus::Completed => "completed",
            InstanceStatus::Skipped => "skipped",
            InstanceStatus::Deferred => "deferred",
        };
        f.write_str(tag)
    }
}

impl FromStr for InstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InstanceStatus::Pending),
            "completed" => Ok(InstanceStatus::Completed),
            "skipped" => Ok(InstanceStatus::Skipped),
            "deferred" => Ok(InstanceStatus::Deferred),
            other => Err(format!("unknown instance status: {other}")),
        }
    }
}

/// The persisted override record for one occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionableInstance {
    /// Kind of the entity this occurrence belongs to.
    pub entity_kind: EntityKind,
    /// The entity's own id, in string form since it spans all kinds.
    pub entity_id: String,
    /// The calendar day the override applies to — the occurrence's own
    /// day, never the deferral target.
    pub date: NaiveDate,
    /// Current status of the occurrence.
    pub status: InstanceStatus,
    /// Deferral target, written only alongside `Deferred`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferred_to: Option<NaiveDateTime>,
}

impl ActionableInstance {
    /// Create a record with no deferral target.
    pub fn new(
        entity_kind: EntityKind,
        entity_id: impl Into<String>,
        date: NaiveDate,
        status: InstanceStatus,
    ) -> Self {
        Self {
            entity_kind,
            entity_id: entity_id.into(),
            date,
            status,
            deferred_to: None,
        }
    }

    /// The key this record is upserted under.
    pub fn key(&self) -> InstanceKey {
        InstanceKey {
            entity_kind: self.entity_kind,
            entity_id: self.entity_id.clone(),
            date: self.date,
        }
    }

    /// The calendar day the deferral target lands on, if any.
    pub fn deferred_to_date(&self) -> Option<NaiveDate> {
        self.deferred_to.map(|t| t.date())
    }
}

/// Composite key for an occurrence's override record.
///
/// The struct form is authoritative in memory; the string form exists
/// only at the persistence boundary, where the entity kind lives in its
/// own column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    pub entity_kind: EntityKind,
    pub entity_id: String,
    pub date: NaiveDate,
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_LEN: usize = 10;

impl InstanceKey {
    /// The persisted string form: `"{entity_id}_{YYYY-MM-DD}"`.
    pub fn storage_id(&self) -> String {
        format!("{}_{}", self.entity_id, self.date.format(DATE_FORMAT))
    }

    /// Rebuild a key from its persisted string form and the kind column.
    ///
    /// Splits on the fixed-width date suffix, so entity ids containing
    /// underscores round-trip.
    pub fn from_storage_id(entity_kind: EntityKind, s: &str) -> Result<Self, String> {
        if s.len() < DATE_LEN + 2 {
            return Err(format!("instance key too short: {s}"));
        }
        let (head, date_part) = s.split_at(s.len() - DATE_LEN);
        let entity_id = head
            .strip_suffix('_')
            .ok_or_else(|| format!("instance key missing date separator: {s}"))?;
        if entity_id.is_empty() {
            return Err(format!("instance key missing entity id: {s}"));
        }
        let date = NaiveDate::parse_from_str(date_part, DATE_FORMAT)
            .map_err(|e| format!("instance key has invalid date '{date_part}': {e}"))?;
        Ok(Self {
            entity_kind,
            entity_id: entity_id.to_string(),
            date,
        })
    }
}
