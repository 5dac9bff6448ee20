//! Bridge between the UI thread and the backend worker owning the coordinator.

pub mod commands;
pub mod runtime;
