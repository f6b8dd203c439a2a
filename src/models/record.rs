// SPDX-License-Identifier: MIT

//! Habit completion record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged instance of a habit being performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitRecord {
    /// Stable unique identifier
    pub id: String,
    /// Owning habit
    pub habit_id: String,
    /// When the record was first logged
    pub created_at: DateTime<Utc>,
    /// When the user says the habit was actually done. May be backdated
    /// to an earlier point in the day; a 23:59:59 time-of-day is the
    /// retroactive-logging sentinel, interpreted only at display time.
    pub completed_at: DateTime<Utc>,
    /// Detail values, each referencing one of the owning habit's
    /// detail definitions
    pub details: Vec<DetailValue>,
}

/// A detail value carried by a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailValue {
    /// References an `ActivityDetail` belonging to the owning habit
    pub detail_id: String,
    /// String-encoded value (numeric details parse this as a number)
    pub value: String,
    /// Optional unit override
    pub unit: Option<String>,
}
