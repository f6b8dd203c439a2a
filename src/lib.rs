// SPDX-License-Identifier: MIT

//! Habit-Tracker: personal habit tracking with a live completion view.
//!
//! This crate provides the backend API for defining habits, logging
//! completion records, and projecting which habits are done on the
//! selected day.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use services::{ProjectionState, ProjectorHandle};
use store::HabitStore;
use tokio::sync::watch;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<HabitStore>,
    pub projector: ProjectorHandle,
    pub projection: watch::Receiver<ProjectionState>,
}
