// SPDX-License-Identifier: MIT

//! Habit CRUD routes.

use crate::error::{AppError, Result};
use crate::models::{DetailAggregation, DetailKind, Habit, HabitColor, Schedule};
use crate::store::{HabitDraft, NewDetail};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Habit routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/habits", post(create_habit))
        .route("/api/habits", get(list_habits))
        .route("/api/habits/{id}", get(get_habit))
        .route("/api/habits/{id}", put(update_habit))
        .route("/api/habits/{id}/archive", post(archive_habit))
        .route("/api/habits/{id}", delete(delete_habit))
}

// ─── Requests ────────────────────────────────────────────────

/// Detail definition within a habit payload. A present `id` must
/// reference one of the habit's existing details (keeps record
/// references valid across edits); absent means a new definition.
#[derive(Deserialize, Validate)]
pub struct DetailSpec {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "detail name must not be empty"))]
    pub name: String,
    pub kind: DetailKind,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub aggregation: Option<DetailAggregation>,
}

/// Full habit settings, used by both create and update.
#[derive(Deserialize, Validate)]
pub struct HabitRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// Per-day completion goal; absent means never auto-completes
    #[validate(range(min = 1))]
    pub goal: Option<u32>,
    #[serde(default)]
    pub color: HabitColor,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    #[validate(nested)]
    pub details: Vec<DetailSpec>,
}

impl HabitRequest {
    fn into_draft(self) -> Result<HabitDraft> {
        self.validate()?;
        if self.schedule.rate == 0 {
            return Err(AppError::BadRequest(
                "Schedule rate must be >= 1".to_string(),
            ));
        }
        Ok(HabitDraft {
            name: self.name,
            goal: self.goal,
            color: self.color,
            schedule: self.schedule,
            details: self
                .details
                .into_iter()
                .map(|d| NewDetail {
                    id: d.id,
                    name: d.name,
                    kind: d.kind,
                    unit: d.unit,
                    aggregation: d.aggregation,
                })
                .collect(),
        })
    }
}

#[derive(Deserialize)]
struct HabitsQuery {
    /// Include archived habits in the listing
    #[serde(default)]
    include_archived: bool,
    /// Only habits whose schedule applies on this day
    due: Option<chrono::NaiveDate>,
}

#[derive(Deserialize)]
pub struct ArchiveRequest {
    pub archived: bool,
}

#[derive(Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
    /// Records removed by the cascade
    pub removed_records: usize,
}

// ─── Handlers ────────────────────────────────────────────────

/// Create a habit.
async fn create_habit(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<HabitRequest>,
) -> Result<Json<Habit>> {
    let habit = state.store.create_habit(payload.into_draft()?)?;
    Ok(Json(habit))
}

/// List habits, alphabetical by name.
async fn list_habits(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HabitsQuery>,
) -> Result<Json<Vec<Habit>>> {
    let mut habits = state.store.list_habits(params.include_archived);
    if let Some(day) = params.due {
        habits.retain(|h| h.schedule.applies_on(day.weekday()));
    }
    Ok(Json(habits))
}

/// Get a habit by id.
async fn get_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Habit>> {
    let habit = state
        .store
        .get_habit(&id)
        .ok_or_else(|| AppError::NotFound(format!("Habit {} not found", id)))?;
    Ok(Json(habit))
}

/// Replace a habit's settings.
async fn update_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<HabitRequest>,
) -> Result<Json<Habit>> {
    let habit = state.store.update_habit(&id, payload.into_draft()?)?;
    Ok(Json(habit))
}

/// Set or clear the archived (soft-delete) flag.
async fn archive_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<ArchiveRequest>,
) -> Result<Json<Habit>> {
    let habit = state.store.set_archived(&id, payload.archived)?;
    Ok(Json(habit))
}

/// Hard-delete a habit and all of its records.
async fn delete_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteHabitResponse>> {
    let removed_records = state.store.delete_habit(&id)?;
    Ok(Json(DeleteHabitResponse {
        success: true,
        removed_records,
    }))
}
