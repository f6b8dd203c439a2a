// SPDX-License-Identifier: MIT

//! API integration tests over the full router.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::NaiveDate;
use habit_tracker::config::Config;
use habit_tracker::routes::create_router;
use habit_tracker::services::CompletionProjector;
use habit_tracker::store::HabitStore;
use habit_tracker::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const TEST_DAY: &str = "2024-03-15";

fn test_day() -> NaiveDate {
    TEST_DAY.parse().unwrap()
}

/// Create a test app over a fresh in-memory store.
fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let store = Arc::new(HabitStore::open(None).expect("in-memory store"));
    let (projector, projection) = CompletionProjector::spawn(store.clone(), test_day());

    let state = Arc::new(AppState {
        config,
        store,
        projector,
        projection,
    });

    (create_router(state.clone()), state)
}

async fn send(app: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_habit(app: &axum::Router, body: Value) -> Value {
    let (status, json) = send(app, Method::POST, "/api/habits", Some(body)).await;
    assert_eq!(status, StatusCode::OK, "create habit failed: {}", json);
    json
}

#[tokio::test]
async fn test_health() {
    let (app, _) = create_test_app();
    let (status, json) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_and_list_habits_alphabetical() {
    let (app, _) = create_test_app();

    create_habit(&app, json!({ "name": "Stretch" })).await;
    create_habit(&app, json!({ "name": "journal", "goal": 2 })).await;

    let (status, json) = send(&app, Method::GET, "/api/habits", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["journal", "Stretch"]);
}

#[tokio::test]
async fn test_create_habit_validation() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, Method::POST, "/api/habits", Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_failed");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/habits",
        Some(json!({ "name": "Run", "goal": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_habit_404() {
    let (app, _) = create_test_app();
    let (status, json) = send(&app, Method::GET, "/api/habits/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_archived_habit_hidden_from_default_listing() {
    let (app, _) = create_test_app();
    let habit = create_habit(&app, json!({ "name": "Run" })).await;
    let id = habit["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/habits/{}/archive", id),
        Some(json!({ "archived": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, Method::GET, "/api/habits", None).await;
    assert!(json.as_array().unwrap().is_empty());

    let (_, json) = send(&app, Method::GET, "/api/habits?include_archived=true", None).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_record_with_unknown_detail_rejected() {
    let (app, _) = create_test_app();
    let habit = create_habit(&app, json!({ "name": "Run", "goal": 1 })).await;
    let id = habit["id"].as_str().unwrap();

    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/habits/{}/records", id),
        Some(json!({
            "details": [{ "detail_id": "no-such-detail", "value": "5" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn test_backdated_flag_on_sentinel_completion() {
    let (app, _) = create_test_app();
    let habit = create_habit(&app, json!({ "name": "Run" })).await;
    let id = habit["id"].as_str().unwrap();

    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/habits/{}/records", id),
        Some(json!({ "completed_at": format!("{}T23:59:59Z", TEST_DAY) })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["backdated"], true);

    let (_, json) = send(
        &app,
        Method::POST,
        &format!("/api/habits/{}/records", id),
        Some(json!({ "completed_at": format!("{}T09:30:00Z", TEST_DAY) })),
    )
    .await;
    assert_eq!(json["backdated"], false);
}

#[tokio::test]
async fn test_delete_habit_cascades_records() {
    let (app, _) = create_test_app();
    let habit = create_habit(&app, json!({ "name": "Run", "goal": 1 })).await;
    let id = habit["id"].as_str().unwrap();

    for hour in ["08", "18"] {
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/habits/{}/records", id),
            Some(json!({ "completed_at": format!("{}T{}:00:00Z", TEST_DAY, hour) })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) = send(&app, Method::DELETE, &format!("/api/habits/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed_records"], 2);

    let (_, json) = send(
        &app,
        Method::GET,
        &format!("/api/records?day={}", TEST_DAY),
        None,
    )
    .await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_day_summary_aggregates_details() {
    let (app, _) = create_test_app();
    let habit = create_habit(
        &app,
        json!({
            "name": "Run",
            "goal": 1,
            "details": [
                { "name": "Distance", "kind": "number", "unit": "km", "aggregation": "sum" }
            ]
        }),
    )
    .await;
    let id = habit["id"].as_str().unwrap();
    let detail_id = habit["details"][0]["id"].as_str().unwrap();

    for value in ["2.5", "4"] {
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/habits/{}/records", id),
            Some(json!({
                "completed_at": format!("{}T09:00:00Z", TEST_DAY),
                "details": [{ "detail_id": detail_id, "value": value }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) = send(
        &app,
        Method::GET,
        &format!("/api/habits/{}/summary?day={}", id, TEST_DAY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["details"][0]["number"], 6.5);
    assert_eq!(json["details"][0]["samples"], 2);
    assert_eq!(json["details"][0]["unit"], "km");
}

#[tokio::test]
async fn test_projection_reflects_logged_records() {
    let (app, state) = create_test_app();
    let habit = create_habit(&app, json!({ "name": "Run", "goal": 1 })).await;
    let id = habit["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/projection/day",
        Some(json!({ "day": TEST_DAY })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/habits/{}/records", id),
        Some(json!({ "completed_at": format!("{}T09:00:00Z", TEST_DAY) })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The projector publishes asynchronously; poll until the completed
    // entry shows up.
    let mut completed = false;
    for _ in 0..100 {
        let (_, json) = send(&app, Method::GET, "/api/projection", None).await;
        let entries = json["entries"].as_array().unwrap().clone();
        if entries.len() == 1 && entries[0]["is_completed"] == true {
            completed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(completed, "projection never showed the completed habit");
    drop(state);
}
