//! Calorie prediction API routes

use crate::error::{ApiError, ApiResult};
use crate::services::PredictionService;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use calorie_predictor_shared::{PredictResponse, WelcomeResponse, WorkoutInput};
use tracing::info;

/// GET / - Welcome message
pub async fn home() -> Json<WelcomeResponse> {
    Json(WelcomeResponse::default())
}

/// POST /predict - Predict calories burned for one workout session
///
/// Bodies that cannot be decoded answer 422, range and heart-rate
/// violations answer 400, model failures answer 5xx.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<WorkoutInput>, JsonRejection>,
) -> ApiResult<Json<PredictResponse>> {
    let Json(input) = payload.map_err(ApiError::from)?;

    let result = PredictionService::predict_calories(
        state.predictor(),
        &input,
        state.config().model.timeout(),
    )
    .await?;

    info!(
        calories = result.calories_burned,
        workout_type = input.workout_type,
        "Prediction served"
    );

    Ok(Json(result.into()))
}
