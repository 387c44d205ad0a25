//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use crate::inference::InferenceError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use calorie_predictor_shared::{ErrorResponse, ValidationError};
use thiserror::Error;
use tracing::{debug, error};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    /// Field range or cross-field rule violated
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Body could not be decoded into a workout record
    #[error("Malformed request body: {detail}")]
    MalformedBody { status: StatusCode, detail: String },

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Size and content-type problems keep their own status; anything
        // else about the body is a schema violation
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNSUPPORTED_MEDIA_TYPE => rejection.status(),
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        ApiError::MalformedBody {
            status,
            detail: rejection.body_text(),
        }
    }
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody { status, .. } => *status,
            ApiError::Inference(InferenceError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Inference(InferenceError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(err) => {
                debug!(fields = ?err.field_names(), "Rejected workout input: {}", err);
                ErrorResponse {
                    detail: err.message.clone(),
                    fields: Some(err.field_names()),
                }
            }
            ApiError::MalformedBody { detail, .. } => {
                debug!("Rejected request body: {}", detail);
                ErrorResponse {
                    detail: detail.clone(),
                    fields: None,
                }
            }
            ApiError::Inference(err) => {
                // Model diagnostics stay in the log
                error!("Inference error: {}", err);
                let detail = match err {
                    InferenceError::Unavailable(_) => "Prediction model is unavailable",
                    InferenceError::Timeout(_) => "Prediction model did not respond in time",
                    _ => "Prediction failed",
                };
                ErrorResponse {
                    detail: detail.to_string(),
                    fields: None,
                }
            }
            ApiError::NotFound(msg) => ErrorResponse {
                detail: msg.clone(),
                fields: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
