//! Recurring routines.

pub mod model;

pub use model::{DayCode, RecurrencePattern, RoutineDefinition};
