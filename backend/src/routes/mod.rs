//! Route definitions for the Calorie Prediction API
//!
//! This module organizes all API routes and applies middleware.

use crate::config::AppConfig;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod health;
mod metrics;
mod predict;


/// Largest accepted request body; a workout record is well under 1 KiB
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shortest whole-request timeout
const MIN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gap kept between the model timeout and the request timeout
const MODEL_TIMEOUT_HEADROOM: Duration = Duration::from_secs(5);

/// Whole-request timeout, always longer than a single model call
pub fn request_timeout(config: &AppConfig) -> Duration {
    MIN_REQUEST_TIMEOUT.max(config.model.timeout() + MODEL_TIMEOUT_HEADROOM)
}

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let timeout = request_timeout(state.config());

    Router::new()
        .route("/", get(predict::home))
        .route("/predict", post(predict::predict))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::render_metrics))
        // Apply middleware layers
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
