//! Integration tests for health check endpoints

mod common;

use axum::http::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_health_endpoint() {
    let app = common::TestApp::new(500.0);

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("healthy"));
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = common::TestApp::new(500.0);

    let (status, body) = app.get("/health/live").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("alive"));
}

#[tokio::test]
async fn test_readiness_endpoint() {
    let app = common::TestApp::new(500.0);

    let (status, body) = app.get("/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["model"]["status"], "healthy");
    assert_eq!(body["checks"]["model"]["info"]["name"], "scripted");
}

#[tokio::test]
async fn test_readiness_reports_unhealthy_model() {
    let app = common::TestApp::unhealthy();

    let (status, body) = app.get("/health/ready").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["checks"]["model"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_root_welcome() {
    let app = common::TestApp::new(500.0);

    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["message"], "Welcome to the Calorie Prediction API");
    assert_eq!(app.model_calls(), 0);
}

#[tokio::test]
async fn test_metrics_disabled_is_not_found() {
    let app = common::TestApp::new(500.0);

    let (status, _) = app.get("/metrics").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
