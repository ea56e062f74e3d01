//! Integration tests for the Observer API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use partsim_observer::router::build_router;
use partsim_observer::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

/// A small two-job workload: job 1 fits partition 0, job 2 is larger than
/// every partition and will be rejected as too big.
fn init_body() -> Value {
    json!({
        "jobs": [
            { "id": 1, "size": 100, "run_time": 2 },
            { "id": 2, "size": 600, "run_time": 1 },
        ],
        "partitions": [200, 500],
        "strategy": "first-fit",
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send one request against a fresh router sharing the given state.
async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
    let response = build_router(Arc::clone(state)).oneshot(request).await.unwrap();
    let status = response.status();
    let body = body_to_json(response.into_body()).await;
    (status, body)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let state = Arc::new(AppState::new());
    let response = build_router(state)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_inactive_before_init() {
    let state = Arc::new(AppState::new());
    let (status, body) = send(&state, Request::get("/api/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["simulation_active"], false);
}

#[tokio::test]
async fn test_snapshot_before_init_is_rejected() {
    let state = Arc::new(AppState::new());
    let (status, body) =
        send(&state, Request::get("/api/snapshot").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Simulation not initialized");
}

#[tokio::test]
async fn test_step_before_init_is_rejected() {
    let state = Arc::new(AppState::new());
    let (status, _body) = send(&state, post_empty("/api/step")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_init_then_snapshot() {
    let state = Arc::new(AppState::new());

    let (status, body) = send(&state, post_json("/api/init", &init_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Simulation initialized successfully");
    assert_eq!(body["strategy"], "first-fit");
    assert_eq!(body["total_jobs"], 2);
    assert_eq!(body["total_partitions"], 2);

    let (status, body) =
        send(&state, Request::get("/api/snapshot").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clock"], 0);
    assert_eq!(body["is_done"], false);
    assert_eq!(body["strategy"], "first-fit");
    assert_eq!(body["job_table"].as_array().unwrap().len(), 2);
    assert_eq!(body["memory_table"].as_array().unwrap().len(), 2);
    // Statistics are withheld until the run completes.
    assert_eq!(body["statistics"], Value::Null);
    // The construction log entry is already visible.
    assert!(!body["recent_logs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_init_with_empty_jobs_is_rejected() {
    let state = Arc::new(AppState::new());
    let body = json!({ "jobs": [], "partitions": [500] });
    let (status, response) = send(&state, post_json("/api/init", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["status"], 400);
}

#[tokio::test]
async fn test_init_with_unknown_strategy_is_rejected() {
    let state = Arc::new(AppState::new());
    let mut body = init_body();
    body["strategy"] = json!("worst-fit");
    let (status, _response) = send(&state, post_json("/api/init", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_step_advances_the_clock() {
    let state = Arc::new(AppState::new());
    send(&state, post_json("/api/init", &init_body())).await;

    let (status, body) = send(&state, post_empty("/api/step")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clock"], 1);

    // Job 2 was rejected as too big during the first tick.
    let too_big = body["job_table"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["id"] == 2)
        .unwrap();
    assert_eq!(too_big["status"], "too big");
}

#[tokio::test]
async fn test_step_after_completion_is_rejected() {
    let state = Arc::new(AppState::new());
    send(&state, post_json("/api/init", &init_body())).await;
    send(&state, post_empty("/api/run-complete")).await;

    let (status, body) = send(&state, post_empty("/api/step")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Simulation already completed");
}

#[tokio::test]
async fn test_run_complete_returns_final_state_and_statistics() {
    let state = Arc::new(AppState::new());
    send(&state, post_json("/api/init", &init_body())).await;

    let (status, body) = send(&state, post_empty("/api/run-complete")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_done"], true);

    let stats = &body["statistics"];
    assert_ne!(*stats, Value::Null);
    assert_eq!(stats["throughput"], 1);
    assert_eq!(stats["too_big_count"], 1);
    assert_eq!(stats["strategy"], "first-fit");

    // Every job reached a terminal state.
    for row in body["job_table"].as_array().unwrap() {
        let job_status = row["status"].as_str().unwrap();
        assert!(job_status == "done" || job_status == "too big");
    }
}

#[tokio::test]
async fn test_run_complete_is_idempotent_once_done() {
    let state = Arc::new(AppState::new());
    send(&state, post_json("/api/init", &init_body())).await;

    let (_status, first) = send(&state, post_empty("/api/run-complete")).await;
    let (status, second) = send(&state, post_empty("/api/run-complete")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["clock"], second["clock"]);
}

#[tokio::test]
async fn test_reset_rebuilds_from_original_parameters() {
    let state = Arc::new(AppState::new());
    send(&state, post_json("/api/init", &init_body())).await;
    send(&state, post_empty("/api/run-complete")).await;

    let (status, body) = send(&state, post_empty("/api/reset")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Simulation reset successfully");

    let (_status, body) =
        send(&state, Request::get("/api/snapshot").body(Body::empty()).unwrap()).await;
    assert_eq!(body["clock"], 0);
    assert_eq!(body["is_done"], false);
    for row in body["job_table"].as_array().unwrap() {
        assert_eq!(row["status"], "new");
    }
}

#[tokio::test]
async fn test_reset_before_init_is_rejected() {
    let state = Arc::new(AppState::new());
    let (status, _body) = send(&state, post_empty("/api/reset")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_active_after_init() {
    let state = Arc::new(AppState::new());
    send(&state, post_json("/api/init", &init_body())).await;
    let (_status, body) =
        send(&state, Request::get("/api/health").body(Body::empty()).unwrap()).await;
    assert_eq!(body["simulation_active"], true);
}
