//! The daily actionable schedule engine.
//!
//! Reconciles one-off tasks, recurring routine definitions, and
//! externally-sourced calendar events into a single ordered agenda for
//! an arbitrary date. A user can mark any individual occurrence done,
//! skipped, or moved without mutating the underlying definition or the
//! external event; those per-occurrence facts live in override records.

pub mod aggregate;
pub mod instance;
pub mod overrides;
pub mod recurrence;
pub mod resolve;
pub mod service;
pub mod transition;

pub use aggregate::{DaySections, aggregate, happening_now};
pub use instance::{ActionableInstance, EntityKind, InstanceKey, InstanceStatus};
pub use overrides::OverrideIndex;
pub use resolve::TimelineItem;
pub use service::AgendaService;
pub use transition::{StatusAction, TransitionEffect};
