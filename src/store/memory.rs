// SPDX-License-Identifier: MIT

//! In-memory habit store with optional JSON snapshot persistence.
//!
//! Provides high-level operations for:
//! - Habits (create/edit/archive/delete with record cascade)
//! - Records (logging with detail validation, per-day queries)
//! - A change feed of the active habit list for reactive consumers
//!
//! Durability is exactly what the snapshot file provides: the full state
//! is rewritten after every mutation and reloaded at open.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::models::{
    ActivityDetail, DetailAggregation, DetailKind, DetailValue, Habit, HabitColor, HabitRecord,
    Schedule,
};
use crate::store::StoreError;

/// Input for creating or fully updating a habit.
#[derive(Debug, Clone)]
pub struct HabitDraft {
    pub name: String,
    pub goal: Option<u32>,
    pub color: HabitColor,
    pub schedule: Schedule,
    pub details: Vec<NewDetail>,
}

/// Input for a detail definition within a habit draft.
///
/// A present `id` must reference one of the habit's existing details
/// (preserving record references across edits); an absent `id` creates a
/// new definition.
#[derive(Debug, Clone)]
pub struct NewDetail {
    pub id: Option<String>,
    pub name: String,
    pub kind: DetailKind,
    pub unit: Option<String>,
    pub aggregation: Option<DetailAggregation>,
}

/// Input for logging a completion record.
#[derive(Debug, Clone)]
pub struct NewRecord {
    /// Completion time; defaults to now when absent
    pub completed_at: Option<DateTime<Utc>>,
    pub details: Vec<DetailValue>,
}

/// Serialized store state.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    habits: Vec<Habit>,
    records: Vec<HabitRecord>,
}

/// The habit store: in-memory tables plus an optional snapshot file.
pub struct HabitStore {
    habits: DashMap<String, Habit>,
    records: DashMap<String, HabitRecord>,
    /// Active habit list, alphabetical by name. Re-sent on every store
    /// mutation (including record mutations), so the channel doubles as
    /// the store's change signal for reactive consumers.
    habits_tx: watch::Sender<Arc<Vec<Habit>>>,
    snapshot_path: Option<PathBuf>,
    snapshot_lock: Mutex<()>,
}

impl HabitStore {
    /// Open a store, loading the snapshot file if one is configured and
    /// present. `None` keeps the store purely in-memory.
    pub fn open(snapshot_path: Option<PathBuf>) -> Result<Self, StoreError> {
        let snapshot = match &snapshot_path {
            Some(path) if path.exists() => {
                let data = fs::read_to_string(path)
                    .map_err(|e| StoreError::SnapshotRead(e.to_string()))?;
                serde_json::from_str::<Snapshot>(&data)
                    .map_err(|e| StoreError::SnapshotRead(e.to_string()))?
            }
            _ => Snapshot::default(),
        };

        let habits: DashMap<String, Habit> = snapshot
            .habits
            .into_iter()
            .map(|h| (h.id.clone(), h))
            .collect();
        let records: DashMap<String, HabitRecord> = snapshot
            .records
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();

        tracing::info!(
            habits = habits.len(),
            records = records.len(),
            snapshot = ?snapshot_path,
            "Habit store opened"
        );

        let (habits_tx, _) = watch::channel(Arc::new(Vec::new()));
        let store = Self {
            habits,
            records,
            habits_tx,
            snapshot_path,
            snapshot_lock: Mutex::new(()),
        };
        store.notify();
        Ok(store)
    }

    /// Subscribe to the active habit feed.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Habit>>> {
        self.habits_tx.subscribe()
    }

    // ─── Habit Operations ────────────────────────────────────────

    /// Create a habit from a draft.
    pub fn create_habit(&self, draft: HabitDraft) -> Result<Habit, StoreError> {
        let habit = Habit {
            id: uuid::Uuid::new_v4().to_string(),
            name: draft.name.clone(),
            archived: false,
            goal: validated_goal(draft.goal)?,
            color: draft.color,
            details: resolve_details(&[], draft.details)?,
            schedule: draft.schedule,
        };

        self.habits.insert(habit.id.clone(), habit.clone());
        self.commit()?;

        tracing::info!(habit_id = %habit.id, name = %habit.name, "Habit created");
        Ok(habit)
    }

    /// Get a habit by id.
    pub fn get_habit(&self, id: &str) -> Option<Habit> {
        self.habits.get(id).map(|h| h.clone())
    }

    /// List habits, alphabetical by name.
    pub fn list_habits(&self, include_archived: bool) -> Vec<Habit> {
        let mut habits: Vec<Habit> = self
            .habits
            .iter()
            .filter(|h| include_archived || !h.archived)
            .map(|h| h.clone())
            .collect();
        sort_by_name(&mut habits);
        habits
    }

    /// Replace a habit's settings from a draft.
    pub fn update_habit(&self, id: &str, draft: HabitDraft) -> Result<Habit, StoreError> {
        let goal = validated_goal(draft.goal)?;

        let updated = {
            let mut entry = self
                .habits
                .get_mut(id)
                .ok_or_else(|| StoreError::HabitNotFound(id.to_string()))?;

            let details = resolve_details(&entry.details, draft.details)?;
            entry.details = details;
            entry.name = draft.name;
            entry.goal = goal;
            entry.color = draft.color;
            entry.schedule = draft.schedule;
            entry.clone()
        };

        self.commit()?;
        tracing::info!(habit_id = %id, "Habit updated");
        Ok(updated)
    }

    /// Set the archived (soft-delete) flag.
    pub fn set_archived(&self, id: &str, archived: bool) -> Result<Habit, StoreError> {
        let updated = {
            let mut entry = self
                .habits
                .get_mut(id)
                .ok_or_else(|| StoreError::HabitNotFound(id.to_string()))?;
            entry.archived = archived;
            entry.clone()
        };

        self.commit()?;
        tracing::info!(habit_id = %id, archived, "Habit archive flag changed");
        Ok(updated)
    }

    /// Hard-delete a habit, cascading deletion of its records.
    ///
    /// Returns the number of records removed.
    pub fn delete_habit(&self, id: &str) -> Result<usize, StoreError> {
        self.habits
            .remove(id)
            .ok_or_else(|| StoreError::HabitNotFound(id.to_string()))?;

        let record_ids: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.habit_id == id)
            .map(|r| r.id.clone())
            .collect();
        let removed = record_ids.len();
        for record_id in record_ids {
            self.records.remove(&record_id);
        }

        self.commit()?;
        tracing::info!(habit_id = %id, removed_records = removed, "Habit deleted");
        Ok(removed)
    }

    // ─── Record Operations ───────────────────────────────────────

    /// Log a completion record for a habit.
    ///
    /// Every detail value must reference one of the habit's detail
    /// definitions.
    pub fn log_record(&self, habit_id: &str, new: NewRecord) -> Result<HabitRecord, StoreError> {
        let habit = self
            .get_habit(habit_id)
            .ok_or_else(|| StoreError::HabitNotFound(habit_id.to_string()))?;

        for value in &new.details {
            if habit.detail(&value.detail_id).is_none() {
                return Err(StoreError::UnknownDetail(value.detail_id.clone()));
            }
        }

        let now = Utc::now();
        let record = HabitRecord {
            id: uuid::Uuid::new_v4().to_string(),
            habit_id: habit_id.to_string(),
            created_at: now,
            completed_at: new.completed_at.unwrap_or(now),
            details: new.details,
        };

        self.records.insert(record.id.clone(), record.clone());
        self.commit()?;

        tracing::info!(
            habit_id,
            record_id = %record.id,
            completed_at = %record.completed_at,
            "Record logged"
        );
        Ok(record)
    }

    /// Delete a record by id.
    pub fn delete_record(&self, id: &str) -> Result<(), StoreError> {
        self.records
            .remove(id)
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;
        self.commit()?;
        tracing::info!(record_id = %id, "Record deleted");
        Ok(())
    }

    /// All records completed on the given calendar day, optionally for a
    /// single habit, ordered by completion time.
    pub fn records_on(&self, day: NaiveDate, habit_id: Option<&str>) -> Vec<HabitRecord> {
        let mut records: Vec<HabitRecord> = self
            .records
            .iter()
            .filter(|r| r.completed_at.date_naive() == day)
            .filter(|r| habit_id.map_or(true, |id| r.habit_id == id))
            .map(|r| r.clone())
            .collect();
        records.sort_by(|a, b| {
            a.completed_at
                .cmp(&b.completed_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        records
    }

    // ─── Snapshot & Change Feed ──────────────────────────────────

    /// Persist the snapshot (if configured) and re-send the habit feed.
    fn commit(&self) -> Result<(), StoreError> {
        self.persist()?;
        self.notify();
        Ok(())
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        // Serialize a stable ordering so snapshots diff cleanly.
        let mut snapshot = Snapshot {
            habits: self.habits.iter().map(|h| h.clone()).collect(),
            records: self.records.iter().map(|r| r.clone()).collect(),
        };
        snapshot.habits.sort_by(|a, b| a.id.cmp(&b.id));
        snapshot.records.sort_by(|a, b| a.id.cmp(&b.id));

        let data = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::SnapshotWrite(e.to_string()))?;

        let _guard = self
            .snapshot_lock
            .lock()
            .map_err(|_| StoreError::SnapshotWrite("snapshot lock poisoned".to_string()))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| StoreError::SnapshotWrite(e.to_string()))?;
            }
        }
        fs::write(path, data).map_err(|e| StoreError::SnapshotWrite(e.to_string()))?;
        Ok(())
    }

    fn notify(&self) {
        let mut active: Vec<Habit> = self
            .habits
            .iter()
            .filter(|h| !h.archived)
            .map(|h| h.clone())
            .collect();
        sort_by_name(&mut active);
        self.habits_tx.send_replace(Arc::new(active));
    }
}

impl crate::services::ProjectionFeed for HabitStore {
    fn habits(&self) -> watch::Receiver<Arc<Vec<Habit>>> {
        self.subscribe()
    }

    async fn records_for_day(&self, day: NaiveDate) -> Result<Vec<HabitRecord>, StoreError> {
        Ok(self.records_on(day, None))
    }
}

fn sort_by_name(habits: &mut [Habit]) {
    habits.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn validated_goal(goal: Option<u32>) -> Result<Option<u32>, StoreError> {
    match goal {
        Some(0) => Err(StoreError::InvalidGoal(0)),
        other => Ok(other),
    }
}

/// Resolve draft details against a habit's existing definitions.
///
/// Drafts carrying an id keep the matching existing definition's
/// identity; drafts without an id become new definitions.
fn resolve_details(
    existing: &[ActivityDetail],
    drafts: Vec<NewDetail>,
) -> Result<Vec<ActivityDetail>, StoreError> {
    drafts
        .into_iter()
        .map(|draft| {
            let id = match draft.id {
                Some(id) => {
                    if !existing.iter().any(|d| d.id == id) {
                        return Err(StoreError::UnknownDetail(id));
                    }
                    id
                }
                None => uuid::Uuid::new_v4().to_string(),
            };
            Ok(ActivityDetail {
                id,
                name: draft.name,
                kind: draft.kind,
                unit: draft.unit,
                aggregation: draft.aggregation,
            })
        })
        .collect()
}
