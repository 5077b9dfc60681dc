//! External calendar projection.

pub mod model;

pub use model::CalendarEvent;
