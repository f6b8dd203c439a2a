// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod completion;
pub mod detail;
pub mod habit;
pub mod record;

pub use completion::IsCompletedHabit;
pub use detail::{ActivityDetail, DetailAggregation, DetailKind};
pub use habit::{Habit, HabitColor, RepeatUnit, Schedule, ScheduleDay};
pub use record::{DetailValue, HabitRecord};
