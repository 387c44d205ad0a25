//! Prediction service
//!
//! Orchestrates one calorie prediction:
//! - Validation of the raw workout record
//! - Feature mapping to the model's column names
//! - A single, time-bounded model call (never retried)
//! - Rounding and wrapping of the result

use crate::error::ApiError;
use crate::inference::{CaloriePredictor, InferenceError};
use calorie_predictor_shared::{to_feature_vector, validate, PredictionResult, WorkoutInput};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Prediction service for business logic
pub struct PredictionService;

impl PredictionService {
    /// Validate, map and predict calories for one workout
    ///
    /// Validation failures return before the model is touched, so no partial
    /// or unchecked feature record ever reaches it.
    pub async fn predict_calories(
        predictor: &dyn CaloriePredictor,
        input: &WorkoutInput,
        timeout: Duration,
    ) -> Result<PredictionResult, ApiError> {
        let session = validate(input).map_err(|err| {
            metrics::counter!("predictions_total", "outcome" => "invalid").increment(1);
            ApiError::Validation(err)
        })?;

        let features = to_feature_vector(&session);
        debug!(features = features.len(), "Calling calorie model");

        let started = Instant::now();
        let outcome = tokio::time::timeout(timeout, predictor.predict(&features)).await;
        metrics::histogram!("prediction_duration_seconds").record(started.elapsed().as_secs_f64());

        let raw = match outcome {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => return Err(Self::failed(err)),
            Err(_) => return Err(Self::failed(InferenceError::Timeout(timeout.as_millis() as u64))),
        };

        if !raw.is_finite() {
            return Err(Self::failed(InferenceError::InvalidOutput(format!(
                "non-finite value {}",
                raw
            ))));
        }
        if raw < 0.0 {
            warn!(raw, "Model predicted negative calories, clamping to zero");
        }

        let result = PredictionResult::from_model_output(raw);
        // Scaling to cents overflows for huge outputs
        if !result.calories_burned.is_finite() {
            return Err(Self::failed(InferenceError::InvalidOutput(format!(
                "value {} cannot be rounded",
                raw
            ))));
        }

        metrics::counter!("predictions_total", "outcome" => "success").increment(1);
        Ok(result)
    }

    fn failed(err: InferenceError) -> ApiError {
        metrics::counter!("predictions_total", "outcome" => "error").increment(1);
        ApiError::Inference(err)
    }
}
