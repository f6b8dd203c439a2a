// SPDX-License-Identifier: MIT

//! Record logging and per-day query routes.

use crate::error::{AppError, Result};
use crate::models::{DetailValue, HabitRecord};
use crate::services::{summarize_details, DetailSummary};
use crate::store::NewRecord;
use crate::time_utils::{format_utc_rfc3339, is_backdated};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Record routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/habits/{id}/records", post(log_record))
        .route("/api/habits/{id}/summary", get(day_summary))
        .route("/api/records", get(list_records))
        .route("/api/records/{id}", delete(delete_record))
}

// ─── Requests & Responses ────────────────────────────────────

#[derive(Deserialize)]
pub struct LogRecordRequest {
    /// Completion time; defaults to now. May be backdated within the day
    /// (the client uses a 23:59:59 time to mean "retroactively logged").
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub details: Vec<DetailValueRequest>,
}

#[derive(Deserialize)]
pub struct DetailValueRequest {
    pub detail_id: String,
    pub value: String,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Serialize)]
pub struct RecordResponse {
    pub id: String,
    pub habit_id: String,
    pub created_at: String,
    pub completed_at: String,
    /// Presentation flag: the completion time carries the
    /// retroactive-logging sentinel, so only its date is meaningful.
    pub backdated: bool,
    pub details: Vec<DetailValue>,
}

impl From<HabitRecord> for RecordResponse {
    fn from(record: HabitRecord) -> Self {
        Self {
            id: record.id,
            habit_id: record.habit_id,
            created_at: format_utc_rfc3339(record.created_at),
            completed_at: format_utc_rfc3339(record.completed_at),
            backdated: is_backdated(record.completed_at),
            details: record.details,
        }
    }
}

#[derive(Deserialize)]
struct RecordsQuery {
    /// Calendar day (YYYY-MM-DD)
    day: NaiveDate,
    /// Restrict to a single habit
    habit: Option<String>,
}

#[derive(Deserialize)]
struct SummaryQuery {
    /// Calendar day (YYYY-MM-DD)
    day: NaiveDate,
}

#[derive(Serialize)]
pub struct DeleteRecordResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct DaySummaryResponse {
    pub habit_id: String,
    pub day: NaiveDate,
    pub details: Vec<DetailSummary>,
}

// ─── Handlers ────────────────────────────────────────────────

/// Log a completion record for a habit.
async fn log_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<LogRecordRequest>,
) -> Result<Json<RecordResponse>> {
    let record = state.store.log_record(
        &id,
        NewRecord {
            completed_at: payload.completed_at,
            details: payload
                .details
                .into_iter()
                .map(|d| DetailValue {
                    detail_id: d.detail_id,
                    value: d.value,
                    unit: d.unit,
                })
                .collect(),
        },
    )?;
    Ok(Json(record.into()))
}

/// List records completed on a day, optionally for one habit.
async fn list_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordsQuery>,
) -> Result<Json<Vec<RecordResponse>>> {
    let records = state.store.records_on(params.day, params.habit.as_deref());
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Delete a record.
async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteRecordResponse>> {
    state.store.delete_record(&id)?;
    Ok(Json(DeleteRecordResponse { success: true }))
}

/// Aggregate a habit's detail values for a day.
async fn day_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<SummaryQuery>,
) -> Result<Json<DaySummaryResponse>> {
    let habit = state
        .store
        .get_habit(&id)
        .ok_or_else(|| AppError::NotFound(format!("Habit {} not found", id)))?;

    let records = state.store.records_on(params.day, Some(&id));
    let details = summarize_details(&habit, &records);

    Ok(Json(DaySummaryResponse {
        habit_id: habit.id,
        day: params.day,
        details,
    }))
}
