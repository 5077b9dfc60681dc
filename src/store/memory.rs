//! In-memory reference store — implements every collaborator trait.
//!
//! Backs the integration tests and is usable for lightweight embedding.
//! Durable persistence belongs to an external collaborator; this store
//! exists so the engine's contracts have a reference implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::calendar::model::CalendarEvent;
use crate::error::{CalendarError, StoreError};
use crate::routines::model::RoutineDefinition;
use crate::schedule::instance::{ActionableInstance, InstanceKey};
use crate::store::traits::{CalendarProvider, InstanceStore, RoutineStore, TaskStore};
use crate::tasks::model::Task;

/// One store implementing all four collaborator contracts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: RwLock<Vec<Task>>,
    routines: RwLock<Vec<RoutineDefinition>>,
    events: RwLock<Vec<CalendarEvent>>,
    instances: RwLock<HashMap<InstanceKey, ActionableInstance>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a task.
    pub async fn add_task(&self, task: Task) {
        self.tasks.write().await.push(task);
    }

    /// Seed a routine definition.
    pub async fn add_routine(&self, routine: RoutineDefinition) {
        self.routines.write().await.push(routine);
    }

    /// Seed a calendar event.
    pub async fn add_event(&self, event: CalendarEvent) {
        self.events.write().await.push(event);
    }

    /// Number of persisted override records.
    pub async fn instance_count(&self) -> usize {
        self.instances.read().await.len()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.read().await.clone())
    }

    async fn set_completed(&self, task_id: Uuid, completed: bool) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "task".to_string(),
                id: task_id.to_string(),
            })?;
        task.completed = completed;
        Ok(())
    }
}

#[async_trait]
impl RoutineStore for MemoryStore {
    async fn list_routine_definitions(&self) -> Result<Vec<RoutineDefinition>, StoreError> {
        Ok(self.routines.read().await.clone())
    }
}

#[async_trait]
impl CalendarProvider for MemoryStore {
    async fn fetch_events(
        &self,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        if range_start > range_end {
            return Err(CalendarError::InvalidRange {
                start: range_start,
                end: range_end,
            });
        }
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|e| {
                let day = e.start.date();
                range_start <= day && day <= range_end
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InstanceStore for MemoryStore {
    async fn list_instances_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ActionableInstance>, StoreError> {
        let instances = self.instances.read().await;
        let mut records: Vec<ActionableInstance> = instances
            .values()
            .filter(|r| r.date == date || r.deferred_to_date() == Some(date))
            .cloned()
            .collect();
        // Deterministic order regardless of map iteration.
        records.sort_by(|a, b| {
            (a.entity_kind.type_tag(), &a.entity_id, a.date)
                .cmp(&(b.entity_kind.type_tag(), &b.entity_id, b.date))
        });
        Ok(records)
    }

    async fn upsert_instance(&self, record: ActionableInstance) -> Result<(), StoreError> {
        self.instances.write().await.insert(record.key(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::instance::{EntityKind, InstanceStatus};
    use crate::tasks::model::TaskCategory;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn set_completed_flips_task() {
        let store = MemoryStore::new();
        let task = Task::new("T", TaskCategory::Other);
        let id = task.id;
        store.add_task(task).await;

        store.set_completed(id, true).await.unwrap();
        let tasks = store.list_tasks().await.unwrap();
        assert!(tasks[0].completed);
    }

    #[tokio::test]
    async fn set_completed_unknown_task_errors() {
        let store = MemoryStore::new();
        let err = store.set_completed(Uuid::new_v4(), true).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn upsert_replaces_by_key() {
        let store = MemoryStore::new();
        let date = day(2024, 3, 1);
        store
            .upsert_instance(ActionableInstance::new(
                EntityKind::Routine,
                "r1",
                date,
                InstanceStatus::Completed,
            ))
            .await
            .unwrap();
        store
            .upsert_instance(ActionableInstance::new(
                EntityKind::Routine,
                "r1",
                date,
                InstanceStatus::Skipped,
            ))
            .await
            .unwrap();

        assert_eq!(store.instance_count().await, 1);
        let records = store.list_instances_for_date(date).await.unwrap();
        assert_eq!(records[0].status, InstanceStatus::Skipped);
    }

    #[tokio::test]
    async fn list_includes_records_deferred_into_date() {
        let store = MemoryStore::new();
        let source = day(2024, 3, 1);
        let target = day(2024, 3, 2);
        let mut record =
            ActionableInstance::new(EntityKind::Routine, "r1", source, InstanceStatus::Deferred);
        record.deferred_to = target.and_hms_opt(8, 0, 0);
        store.upsert_instance(record).await.unwrap();

        let for_source = store.list_instances_for_date(source).await.unwrap();
        assert_eq!(for_source.len(), 1);

        let for_target = store.list_instances_for_date(target).await.unwrap();
        assert_eq!(for_target.len(), 1);

        let elsewhere = store
            .list_instances_for_date(day(2024, 3, 3))
            .await
            .unwrap();
        assert!(elsewhere.is_empty());
    }

    #[tokio::test]
    async fn fetch_events_filters_by_range() {
        let store = MemoryStore::new();
        let in_range = CalendarEvent::new(
            "e1",
            "Swim",
            day(2024, 3, 1).and_hms_opt(16, 0, 0).unwrap(),
        );
        let out_of_range = CalendarEvent::new(
            "e2",
            "Recital",
            day(2024, 3, 8).and_hms_opt(18, 0, 0).unwrap(),
        );
        store.add_event(in_range).await;
        store.add_event(out_of_range).await;

        let events = store
            .fetch_events(day(2024, 3, 1), day(2024, 3, 2))
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "e1");
    }

    #[tokio::test]
    async fn fetch_events_rejects_inverted_range() {
        let store = MemoryStore::new();
        let err = store
            .fetch_events(day(2024, 3, 2), day(2024, 3, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CalendarError::InvalidRange { .. }));
    }
}
