// SPDX-License-Identifier: MIT

//! Habit-Tracker API Server
//!
//! Serves a personal habit-tracking client: habit definitions,
//! completion records, and the live per-day completion projection.

use habit_tracker::{
    config::Config, services::CompletionProjector, store::HabitStore, AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Habit-Tracker API");

    // Open the habit store (loads the snapshot file if configured)
    let store =
        Arc::new(HabitStore::open(config.snapshot_path.clone()).expect("Failed to open store"));

    // Spawn the completion projector on today's date
    let today = chrono::Local::now().date_naive();
    let (projector, projection) = CompletionProjector::spawn(store.clone(), today);
    tracing::info!(day = %today, "Completion projector started");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        projector,
        projection,
    });

    // Build router
    let app = habit_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("habit_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
