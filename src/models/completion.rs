// SPDX-License-Identifier: MIT

//! Derived habit-completion pairing.

use serde::Serialize;

use crate::models::Habit;

/// A habit paired with its completion status for a selected day.
///
/// Derived, never persisted: recreated wholesale on every projection
/// recomputation and never mutated once emitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsCompletedHabit {
    pub habit: Habit,
    pub is_completed: bool,
}
