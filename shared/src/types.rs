//! API request and response types

use serde::{Deserialize, Serialize};

/// Message returned with every successful prediction
pub const PREDICTION_SUCCESS_MESSAGE: &str = "Prediction successful";

/// Welcome message served at the API root
pub const WELCOME_MESSAGE: &str = "Welcome to the Calorie Prediction API";

/// Round a model output to two decimal places, half away from zero
pub fn round_prediction(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Prediction
// ============================================================================

/// Outcome of a successful model call
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Predicted calories, non-negative and rounded to two decimals
    pub calories_burned: f64,
    pub success: bool,
    pub message: String,
}

impl PredictionResult {
    /// Wrap a raw model output, clamping below zero and rounding
    pub fn from_model_output(raw: f64) -> Self {
        Self {
            calories_burned: round_prediction(raw.max(0.0)),
            success: true,
            message: PREDICTION_SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// Body of a successful `POST /predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(rename = "Calories_Burned_Predicted")]
    pub calories_burned_predicted: f64,
    pub message: String,
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            calories_burned_predicted: result.calories_burned,
            message: result.message,
        }
    }
}

// ============================================================================
// Misc
// ============================================================================

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

impl Default for WelcomeResponse {
    fn default() -> Self {
        Self {
            message: WELCOME_MESSAGE.to_string(),
        }
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    /// Public names of the offending fields, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}
