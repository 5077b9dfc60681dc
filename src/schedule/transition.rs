//! Status transitions — the engine's one mutation surface.
//!
//! `pending → completed | skipped | deferred`, with `completed` and
//! `deferred` undoing back to `pending`. `skipped` has no modeled
//! reverse; a later action simply overwrites the record. All
//! transitions are last-write-wins — the system has a single writer
//! per account, so concurrent edits to one key are not merged.

use chrono::{NaiveDate, NaiveDateTime};

use crate::schedule::instance::{ActionableInstance, EntityKind, InstanceStatus};

/// A user action against one occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    /// Mark done.
    Complete,
    /// Undo a completion or a deferral back to pending.
    UndoComplete,
    /// Strike from the day.
    Skip,
    /// Move to another time — same day (retime) or another day. The
    /// distinction is resolved at read time, never at write time.
    Defer { to: NaiveDateTime },
}

/// What a transition asks the instance store to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionEffect {
    /// Replace (or create) the record for this key.
    Upsert(ActionableInstance),
    /// Nothing to write.
    Noop,
}

/// Compute the override record an action produces.
///
/// `existing` is the currently persisted record for the key, if any.
/// Undo is an upsert back to `pending` rather than a delete, for
/// symmetry with every other transition. Re-deferring replaces the
/// target rather than stacking.
pub fn plan(
    entity_kind: EntityKind,
    entity_id: &str,
    date: NaiveDate,
    action: StatusAction,
    existing: Option<&ActionableInstance>,
) -> TransitionEffect {
    let record = |status: InstanceStatus, deferred_to: Option<NaiveDateTime>| ActionableInstance {
        entity_kind,
        entity_id: entity_id.to_string(),
        date,
        status,
        deferred_to,
    };
    match action {
        StatusAction::Complete => TransitionEffect::Upsert(record(InstanceStatus::Completed, None)),
        StatusAction::UndoComplete => {
            TransitionEffect::Upsert(record(InstanceStatus::Pending, None))
        }
        StatusAction::Skip => {
            if existing.is_some_and(|r| r.status == InstanceStatus::Skipped) {
                TransitionEffect::Noop
            } else {
                TransitionEffect::Upsert(record(InstanceStatus::Skipped, None))
            }
        }
        StatusAction::Defer { to } => {
            TransitionEffect::Upsert(record(InstanceStatus::Deferred, Some(to)))
        }
    }
}
