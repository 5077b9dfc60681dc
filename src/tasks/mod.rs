//! One-off tasks.

pub mod model;

pub use model::{Task, TaskCategory};
