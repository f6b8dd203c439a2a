// SPDX-License-Identifier: MIT

//! Activity detail definitions: reusable typed fields attachable to a habit.

use serde::{Deserialize, Serialize};

/// A typed field a habit's records may carry, such as "Duration" as a
/// number with unit "min", or "Notes" as free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDetail {
    /// Stable unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Value type
    pub kind: DetailKind,
    /// Optional display unit (e.g. "min", "km")
    pub unit: Option<String>,
    /// How multiple same-day values are combined for display.
    /// Only meaningful for numeric details.
    pub aggregation: Option<DetailAggregation>,
}

/// Value type of an activity detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    Number,
    Text,
}

/// Rule for combining multiple same-day numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailAggregation {
    Sum,
    Average,
}
