//! Collaborator contracts consumed by the engine.
//!
//! Durable persistence and the external calendar integration live
//! outside this crate; the engine only ever sees these traits. Fetch
//! failures propagate to the caller — the engine neither retries nor
//! falls back silently, since masking one would present a stale or
//! incomplete agenda as complete.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::calendar::model::CalendarEvent;
use crate::error::{CalendarError, StoreError};
use crate::routines::model::RoutineDefinition;
use crate::schedule::instance::ActionableInstance;
use crate::tasks::model::Task;

/// Owner of one-off tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks for the account.
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;

    /// Flip a task's own `completed` flag. Tasks are the one entity
    /// kind where "done" is a property of the entity itself, not only
    /// of an occurrence.
    async fn set_completed(&self, task_id: Uuid, completed: bool) -> Result<(), StoreError>;
}

/// Owner of recurring routine definitions.
#[async_trait]
pub trait RoutineStore: Send + Sync {
    /// All routine definitions for the account.
    async fn list_routine_definitions(&self) -> Result<Vec<RoutineDefinition>, StoreError>;
}

/// The external calendar integration.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Events whose start falls within `[range_start, range_end]`,
    /// both ends inclusive.
    async fn fetch_events(
        &self,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, CalendarError>;
}

/// Owner of the persisted override records.
#[async_trait]
pub trait InstanceStore: Send + Sync {
    /// Records relevant to `date`: those keyed by it, plus deferred
    /// records whose target lands on it. One list — the engine splits
    /// it by predicate, never by a second fetch.
    async fn list_instances_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ActionableInstance>, StoreError>;

    /// Replace-by-key upsert: at most one record per
    /// `(entity_kind, entity_id, date)`, never an append.
    async fn upsert_instance(&self, record: ActionableInstance) -> Result<(), StoreError>;
}
