// SPDX-License-Identifier: MIT

//! Projection view routes: the derived "which habits are done today"
//! list and day selection.

use crate::error::Result;
use crate::models::IsCompletedHabit;
use crate::services::ProjectionError;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Projection routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/projection", get(get_projection))
        .route("/api/projection/day", put(select_day))
}

#[derive(Serialize)]
pub struct ProjectionResponse {
    /// The selected day the latest cycle targeted
    pub day: NaiveDate,
    /// Incomplete habits first, then complete, each in habit-list order.
    /// When `error` is set these are the last successful cycle's entries.
    pub entries: Vec<IsCompletedHabit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProjectionError>,
}

/// Latest projection state.
///
/// Recomputation is asynchronous: after a day change or store write this
/// reflects the new inputs once the projector's next cycle publishes.
async fn get_projection(State(state): State<Arc<AppState>>) -> Result<Json<ProjectionResponse>> {
    let snapshot = state.projection.borrow().clone();
    Ok(Json(ProjectionResponse {
        day: snapshot.day,
        entries: snapshot.entries.as_ref().clone(),
        error: snapshot.error,
    }))
}

#[derive(Deserialize)]
pub struct SelectDayRequest {
    /// Calendar day (YYYY-MM-DD)
    pub day: NaiveDate,
}

#[derive(Serialize)]
pub struct SelectDayResponse {
    pub day: NaiveDate,
}

/// Change the selected day. Selecting the current day again is a no-op.
async fn select_day(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectDayRequest>,
) -> Result<Json<SelectDayResponse>> {
    state.projector.set_selected_day(payload.day);
    Ok(Json(SelectDayResponse { day: payload.day }))
}
