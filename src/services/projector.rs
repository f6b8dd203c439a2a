// SPDX-License-Identifier: MIT

//! Completion projector service.
//!
//! Maintains a live view of "which habits are done on the selected day"
//! from three independently changing inputs:
//! 1. The active habit list (store change feed)
//! 2. The selected day
//! 3. That day's completion records (fetched per day change)
//!
//! The projection itself is the pure [`project`] function; the reactive
//! wrapper recombines latest inputs and republishes on every change.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::watch;

use crate::models::{Habit, HabitRecord, IsCompletedHabit};
use crate::store::StoreError;

/// Inbound feeds the projector consumes.
pub trait ProjectionFeed: Send + Sync + 'static {
    /// Active habits, alphabetical by name. The channel is also the
    /// store's change signal: it is re-sent on every mutation, record
    /// mutations included.
    fn habits(&self) -> watch::Receiver<Arc<Vec<Habit>>>;

    /// All records completed on the given calendar day.
    fn records_for_day(
        &self,
        day: NaiveDate,
    ) -> impl Future<Output = Result<Vec<HabitRecord>, StoreError>> + Send;
}

/// Error published when a projection cycle cannot complete.
///
/// Recoverable: the last good entry list stays available and the next
/// successful cycle clears the error without any manual reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case", tag = "kind", content = "details")]
pub enum ProjectionError {
    #[error("Record fetch failed: {0}")]
    Fetch(String),
}

/// Latest published projection.
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// The selected day this cycle targeted
    pub day: NaiveDate,
    /// Ordered completion entries: incomplete habits first, then
    /// complete, each group in habit-list order. When `error` is set,
    /// these are the previous successful cycle's entries.
    pub entries: Arc<Vec<IsCompletedHabit>>,
    /// Failure of the latest cycle, if any
    pub error: Option<ProjectionError>,
}

/// Handle for driving the projector's selected day.
pub struct ProjectorHandle {
    day_tx: watch::Sender<NaiveDate>,
}

impl ProjectorHandle {
    /// Replace the day used for computing completion.
    ///
    /// Setting the already-selected day is a no-op and skips
    /// recomputation.
    pub fn set_selected_day(&self, day: NaiveDate) {
        self.day_tx.send_if_modified(|current| {
            if *current == day {
                false
            } else {
                *current = day;
                true
            }
        });
    }

    /// The currently selected day.
    pub fn selected_day(&self) -> NaiveDate {
        *self.day_tx.borrow()
    }
}

/// Annotate habits with their completion status for a day and order them
/// incomplete-first.
///
/// A habit with no goal is never completed; a habit with goal G is
/// completed iff at least G of the day's records reference it. Records
/// referencing unknown habit ids are ignored. The two status groups each
/// preserve the input habit order (stable two-bucket partition).
pub fn project(habits: &[Habit], records_for_day: &[HabitRecord]) -> Vec<IsCompletedHabit> {
    let mut incomplete = Vec::with_capacity(habits.len());
    let mut complete = Vec::new();

    for habit in habits {
        let is_completed = match habit.goal {
            Some(goal) => {
                let count = records_for_day
                    .iter()
                    .filter(|r| r.habit_id == habit.id)
                    .count();
                count >= goal as usize
            }
            None => false,
        };

        let entry = IsCompletedHabit {
            habit: habit.clone(),
            is_completed,
        };
        if is_completed {
            complete.push(entry);
        } else {
            incomplete.push(entry);
        }
    }

    incomplete.extend(complete);
    incomplete
}

/// The reactive wrapper around [`project`].
pub struct CompletionProjector;

impl CompletionProjector {
    /// Spawn the projector task.
    ///
    /// Returns a handle for day selection and the outbound feed of
    /// projection states. The task recomputes on every input change and
    /// exits once the handle and all receivers are dropped.
    ///
    /// Superseding semantics: any input change while a record fetch is
    /// in flight drops that fetch and restarts the cycle with the latest
    /// inputs, so a stale fetch result can never overwrite a newer
    /// cycle's output (last-write-wins by request-issue order).
    pub fn spawn<S: ProjectionFeed>(
        feed: Arc<S>,
        initial_day: NaiveDate,
    ) -> (ProjectorHandle, watch::Receiver<ProjectionState>) {
        let (day_tx, mut day_rx) = watch::channel(initial_day);
        let mut habits_rx = feed.habits();
        let (out_tx, out_rx) = watch::channel(ProjectionState {
            day: initial_day,
            entries: Arc::new(Vec::new()),
            error: None,
        });

        tokio::spawn(async move {
            loop {
                let day = *day_rx.borrow_and_update();
                let habits = habits_rx.borrow_and_update().clone();

                let fetch = feed.records_for_day(day);
                tokio::pin!(fetch);

                let outcome = tokio::select! {
                    result = &mut fetch => Some(result),
                    changed = day_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        None
                    }
                    changed = habits_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        None
                    }
                };

                let Some(result) = outcome else {
                    // Superseded: the in-flight fetch is dropped and the
                    // cycle restarts from the latest inputs.
                    continue;
                };

                match result {
                    Ok(records) => {
                        let entries = Arc::new(project(&habits, &records));
                        tracing::debug!(
                            day = %day,
                            habits = habits.len(),
                            records = records.len(),
                            "Projection recomputed"
                        );
                        out_tx.send_replace(ProjectionState {
                            day,
                            entries,
                            error: None,
                        });
                    }
                    Err(e) => {
                        tracing::warn!(
                            day = %day,
                            error = %e,
                            "Record fetch failed; keeping last good projection"
                        );
                        let last_good = out_tx.borrow().entries.clone();
                        out_tx.send_replace(ProjectionState {
                            day,
                            entries: last_good,
                            error: Some(ProjectionError::Fetch(e.to_string())),
                        });
                    }
                }

                // Wait for the next input change before recomputing.
                tokio::select! {
                    changed = day_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                    changed = habits_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
            }
        });

        (ProjectorHandle { day_tx }, out_rx)
    }
}
