//! Per-date index over raw override records.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::schedule::instance::{ActionableInstance, EntityKind, InstanceStatus};

/// O(1) lookup of the override record for one entity on one day view.
///
/// Built in a single pass from the raw list the instance store returned
/// for a date. A pure projection: building twice from the same list
/// yields the same index. Duplicate keys in the raw list resolve
/// last-write-wins, matching the store's upsert-replace semantics.
#[derive(Debug, Clone, Default)]
pub struct OverrideIndex {
    map: HashMap<(EntityKind, String), ActionableInstance>,
}

impl OverrideIndex {
    /// Index the records that belong to `date` — their own day, not a
    /// deferral target.
    pub fn for_date(raw: &[ActionableInstance], date: NaiveDate) -> Self {
        Self::filtered(raw, |record| record.date == date)
    }

    /// Index the deferred records whose target lands on `date`.
    ///
    /// Same raw list as [`OverrideIndex::for_date`], different
    /// predicate — never a second fetch.
    pub fn deferred_into(raw: &[ActionableInstance], date: NaiveDate) -> Self {
        Self::filtered(raw, |record| {
            record.status == InstanceStatus::Deferred && record.deferred_to_date() == Some(date)
        })
    }

    fn filtered(raw: &[ActionableInstance], keep: impl Fn(&ActionableInstance) -> bool) -> Self {
        let mut map = HashMap::new();
        for record in raw.iter().filter(|r| keep(r)) {
            map.insert((record.entity_kind, record.entity_id.clone()), record.clone());
        }
        Self { map }
    }

    /// The current override for an entity, if one exists. Absence means
    /// the occurrence is pending.
    pub fn get(&self, kind: EntityKind, entity_id: &str) -> Option<&ActionableInstance> {
        self.map.get(&(kind, entity_id.to_string()))
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
