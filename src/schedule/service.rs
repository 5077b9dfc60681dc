//! Agenda service — async facade wiring collaborator stores to the
//! pure engine.
//!
//! Every read is a fresh fetch: the engine caches nothing across calls,
//! so after any status transition resolves the caller must re-fetch the
//! affected date(s) before the next agenda read. Discarding a stale
//! in-flight fetch when the viewed date changes is likewise the
//! caller's job — everything below the fetch is synchronous.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SectionConfig;
use crate::error::{Result, StoreError};
use crate::schedule::aggregate::{DaySections, aggregate};
use crate::schedule::instance::EntityKind;
use crate::schedule::transition::{StatusAction, TransitionEffect, plan};
use crate::store::traits::{CalendarProvider, InstanceStore, RoutineStore, TaskStore};

/// Resolves day agendas and applies status transitions.
pub struct AgendaService {
    tasks: Arc<dyn TaskStore>,
    routines: Arc<dyn RoutineStore>,
    calendar: Arc<dyn CalendarProvider>,
    instances: Arc<dyn InstanceStore>,
    sections: SectionConfig,
}

impl AgendaService {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        routines: Arc<dyn RoutineStore>,
        calendar: Arc<dyn CalendarProvider>,
        instances: Arc<dyn InstanceStore>,
        sections: SectionConfig,
    ) -> Self {
        Self {
            tasks,
            routines,
            calendar,
            instances,
            sections,
        }
    }

    /// Fetch all four inputs for `date` and aggregate them.
    ///
    /// Any fetch failure propagates; the previous display staying
    /// intact on error is the caller's concern.
    pub async fn agenda_for(&self, date: NaiveDate) -> Result<DaySections> {
        let tasks = self.tasks.list_tasks().await?;
        let routines = self.routines.list_routine_definitions().await?;
        let events = self.calendar.fetch_events(date, date).await?;
        let instances = self.instances.list_instances_for_date(date).await?;

        let sections = aggregate(&tasks, &routines, &events, &instances, date, &self.sections);
        debug!(%date, items = sections.len(), "Resolved agenda");
        Ok(sections)
    }

    /// Mark an occurrence done. For tasks this also flips the task's
    /// own `completed` flag — a task has no other occurrences.
    pub async fn complete(
        &self,
        kind: EntityKind,
        entity_id: &str,
        date: NaiveDate,
    ) -> Result<()> {
        self.apply(kind, entity_id, date, StatusAction::Complete)
            .await?;
        if kind == EntityKind::Task {
            let id = parse_task_id(entity_id)?;
            self.tasks.set_completed(id, true).await?;
        }
        Ok(())
    }

    /// Undo a completion or a deferral back to pending.
    pub async fn undo_complete(
        &self,
        kind: EntityKind,
        entity_id: &str,
        date: NaiveDate,
    ) -> Result<()> {
        self.apply(kind, entity_id, date, StatusAction::UndoComplete)
            .await?;
        if kind == EntityKind::Task {
            let id = parse_task_id(entity_id)?;
            self.tasks.set_completed(id, false).await?;
        }
        Ok(())
    }

    /// Strike an occurrence from its day. Idempotent.
    pub async fn skip(&self, kind: EntityKind, entity_id: &str, date: NaiveDate) -> Result<()> {
        self.apply(kind, entity_id, date, StatusAction::Skip).await
    }

    /// Move an occurrence to `to` — same day (retime) or another day.
    /// The record stays keyed by `from_date`, the occurrence's own day.
    pub async fn defer(
        &self,
        kind: EntityKind,
        entity_id: &str,
        from_date: NaiveDate,
        to: NaiveDateTime,
    ) -> Result<()> {
        self.apply(kind, entity_id, from_date, StatusAction::Defer { to })
            .await
    }

    async fn apply(
        &self,
        kind: EntityKind,
        entity_id: &str,
        date: NaiveDate,
        action: StatusAction,
    ) -> Result<()> {
        let records = self.instances.list_instances_for_date(date).await?;
        let existing = records
            .iter()
            .find(|r| r.entity_kind == kind && r.entity_id == entity_id && r.date == date);

        match plan(kind, entity_id, date, action, existing) {
            TransitionEffect::Upsert(record) => {
                info!(
                    kind = %record.entity_kind,
                    entity_id = %record.entity_id,
                    %date,
                    status = %record.status,
                    "Applying status transition"
                );
                self.instances.upsert_instance(record).await?;
            }
            TransitionEffect::Noop => {
                debug!(kind = %kind, entity_id, %date, "Transition is a no-op");
            }
        }
        Ok(())
    }
}

fn parse_task_id(entity_id: &str) -> Result<Uuid> {
    Uuid::parse_str(entity_id)
        .map_err(|_| StoreError::InvalidId(entity_id.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::model::CalendarEvent;
    use crate::error::{CalendarError, Error};
    use crate::routines::model::{DayCode, RecurrencePattern, RoutineDefinition};
    use crate::schedule::instance::InstanceStatus;
    use crate::store::memory::MemoryStore;
    use crate::tasks::model::{Task, TaskCategory};
    use async_trait::async_trait;
    use chrono::NaiveTime;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(store: Arc<MemoryStore>) -> AgendaService {
        AgendaService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            SectionConfig::default(),
        )
    }

    #[tokio::test]
    async fn completing_a_task_flips_the_store() {
        let store = Arc::new(MemoryStore::new());
        let date = day(2024, 3, 1);
        let task = Task::new("Dentist forms", TaskCategory::Health)
            .with_schedule(date.and_hms_opt(14, 0, 0).unwrap());
        let id = task.id;
        store.add_task(task).await;
        let service = service(store.clone());

        service
            .complete(EntityKind::Task, &id.to_string(), date)
            .await
            .unwrap();

        let tasks = store.list_tasks().await.unwrap();
        assert!(tasks[0].completed);

        let agenda = service.agenda_for(date).await.unwrap();
        assert!(agenda.afternoon[0].completed);

        service
            .undo_complete(EntityKind::Task, &id.to_string(), date)
            .await
            .unwrap();
        let tasks = store.list_tasks().await.unwrap();
        assert!(!tasks[0].completed);
    }

    #[tokio::test]
    async fn completing_a_task_with_bad_id_errors() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store);
        let err = service
            .complete(EntityKind::Task, "not-a-uuid", day(2024, 3, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::InvalidId(_))));
    }

    #[tokio::test]
    async fn skip_twice_leaves_one_record() {
        let store = Arc::new(MemoryStore::new());
        let date = day(2024, 3, 5);
        let routine = RoutineDefinition::new(
            "Trash day",
            RecurrencePattern::Weekly {
                days: vec![DayCode::Tue],
            },
        );
        let id = routine.id.to_string();
        store.add_routine(routine).await;
        let service = service(store.clone());

        service.skip(EntityKind::Routine, &id, date).await.unwrap();
        service.skip(EntityKind::Routine, &id, date).await.unwrap();

        assert_eq!(store.instance_count().await, 1);
        let records = store.list_instances_for_date(date).await.unwrap();
        assert_eq!(records[0].status, InstanceStatus::Skipped);
    }

    #[tokio::test]
    async fn redefer_replaces_the_target() {
        let store = Arc::new(MemoryStore::new());
        let date = day(2024, 3, 5);
        let routine = RoutineDefinition::new("Trash day", RecurrencePattern::Daily);
        let id = routine.id.to_string();
        store.add_routine(routine).await;
        let service = service(store.clone());

        let first = day(2024, 3, 6).and_hms_opt(8, 0, 0).unwrap();
        let second = day(2024, 3, 7).and_hms_opt(10, 0, 0).unwrap();
        service.defer(EntityKind::Routine, &id, date, first).await.unwrap();
        service.defer(EntityKind::Routine, &id, date, second).await.unwrap();

        assert_eq!(store.instance_count().await, 1);
        let records = store.list_instances_for_date(date).await.unwrap();
        assert_eq!(records[0].deferred_to, Some(second));
    }

    struct FailingCalendar;

    #[async_trait]
    impl CalendarProvider for FailingCalendar {
        async fn fetch_events(
            &self,
            _range_start: NaiveDate,
            _range_end: NaiveDate,
        ) -> std::result::Result<Vec<CalendarEvent>, CalendarError> {
            Err(CalendarError::Fetch("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn calendar_failure_propagates() {
        let store = Arc::new(MemoryStore::new());
        let service = AgendaService::new(
            store.clone(),
            store.clone(),
            Arc::new(FailingCalendar),
            store,
            SectionConfig::default(),
        );
        let err = service.agenda_for(day(2024, 3, 1)).await.unwrap_err();
        assert!(matches!(err, Error::Calendar(CalendarError::Fetch(_))));
    }

    #[tokio::test]
    async fn agenda_reflects_transitions_after_refetch() {
        let store = Arc::new(MemoryStore::new());
        let date = day(2024, 3, 5);
        let routine = RoutineDefinition::new("Trash day", RecurrencePattern::Daily)
            .with_time_of_day(NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let id = routine.id.to_string();
        store.add_routine(routine).await;
        let service = service(store);

        let before = service.agenda_for(date).await.unwrap();
        assert_eq!(before.morning.len(), 1);
        assert!(!before.morning[0].completed);

        service.complete(EntityKind::Routine, &id, date).await.unwrap();

        let after = service.agenda_for(date).await.unwrap();
        assert!(after.morning[0].completed);
    }
}
