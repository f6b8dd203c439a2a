// SPDX-License-Identifier: MIT

//! Habit definition model.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::ActivityDetail;

/// A user-defined recurring activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Stable unique identifier (also used as document ID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Soft-delete flag; archived habits are hidden from active views
    pub archived: bool,
    /// Per-day completion goal. `None` means the habit never
    /// auto-completes by record count. Must be >= 1 when present.
    pub goal: Option<u32>,
    /// Color tag for display
    pub color: HabitColor,
    /// Ordered set of typed detail fields a record may carry
    pub details: Vec<ActivityDetail>,
    /// Recurrence rule (reminders carried as data, not delivered here)
    pub schedule: Schedule,
}

impl Habit {
    /// Create a habit with a fresh id and default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            archived: false,
            goal: None,
            color: HabitColor::default(),
            details: Vec::new(),
            schedule: Schedule::default(),
        }
    }

    /// Look up one of this habit's detail definitions by id.
    pub fn detail(&self, detail_id: &str) -> Option<&ActivityDetail> {
        self.details.iter().find(|d| d.id == detail_id)
    }
}

/// Color tag for a habit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitColor {
    #[default]
    Blue,
    Green,
    Orange,
    Pink,
    Purple,
    Red,
    Teal,
    Yellow,
}

/// Unit of recurrence for a schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatUnit {
    #[default]
    Daily,
    Weekly,
}

/// Day of the week a schedule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleDay {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl From<Weekday> for ScheduleDay {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => ScheduleDay::Mon,
            Weekday::Tue => ScheduleDay::Tue,
            Weekday::Wed => ScheduleDay::Wed,
            Weekday::Thu => ScheduleDay::Thu,
            Weekday::Fri => ScheduleDay::Fri,
            Weekday::Sat => ScheduleDay::Sat,
            Weekday::Sun => ScheduleDay::Sun,
        }
    }
}

/// Recurrence rule for a habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Unit of recurrence
    #[serde(default)]
    pub unit: RepeatUnit,
    /// Times per unit (>= 1)
    #[serde(default = "default_rate")]
    pub rate: u32,
    /// Applicable weekdays. Empty means no weekday restriction.
    #[serde(default)]
    pub days: Vec<ScheduleDay>,
    /// Optional reminder time of day
    #[serde(default)]
    pub reminder: Option<NaiveTime>,
}

fn default_rate() -> u32 {
    1
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            unit: RepeatUnit::Daily,
            rate: 1,
            days: Vec::new(),
            reminder: None,
        }
    }
}

impl Schedule {
    /// Whether this schedule applies on the given weekday.
    pub fn applies_on(&self, day: Weekday) -> bool {
        self.days.is_empty() || self.days.contains(&ScheduleDay::from(day))
    }
}
