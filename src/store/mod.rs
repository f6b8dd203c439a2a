// SPDX-License-Identifier: MIT

//! Habit store: the durable system of record for habits and records.

pub mod memory;

pub use memory::{HabitDraft, HabitStore, NewDetail, NewRecord};

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Unknown detail reference: {0}")]
    UnknownDetail(String),

    #[error("Invalid completion goal: {0} (must be >= 1)")]
    InvalidGoal(u32),

    #[error("Failed to read snapshot: {0}")]
    SnapshotRead(String),

    #[error("Failed to write snapshot: {0}")]
    SnapshotWrite(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
