//! Error types for the agenda engine.

use chrono::NaiveDate;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),
}

/// Persistence collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Invalid entity id: {0}")]
    InvalidId(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// External calendar collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Provider request failed: {0}")]
    Fetch(String),

    #[error("Invalid range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;
