//! Prometheus metrics endpoint

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::State;

/// GET /metrics - Prometheus text exposition
pub async fn render_metrics(State(state): State<AppState>) -> ApiResult<String> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| ApiError::NotFound("Metrics are disabled".to_string()))
}
