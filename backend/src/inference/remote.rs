//! HTTP client for an external model server
//!
//! Sends `{"instances": [<features>]}` and expects `{"predictions": [<f64>]}`,
//! the row-oriented predict protocol spoken by common model servers.

use super::{CaloriePredictor, InferenceError, ModelInfo};
use crate::config::ModelBackend;
use anyhow::Result;
use async_trait::async_trait;
use calorie_predictor_shared::FeatureVector;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: [&'a FeatureVector; 1],
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Vec<f64>,
}

/// Model served by a separate process
#[derive(Debug, Clone)]
pub struct RemoteModel {
    client: Client,
    predict_url: String,
    health_url: String,
    timeout: Duration,
}

impl RemoteModel {
    /// Build a client; no request is made until the first prediction
    pub fn new(predict_url: &str, health_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            predict_url: predict_url.to_string(),
            health_url: health_url.to_string(),
            timeout,
        })
    }

    fn send_error(&self, err: reqwest::Error) -> InferenceError {
        if err.is_timeout() {
            InferenceError::Timeout(self.timeout.as_millis() as u64)
        } else {
            InferenceError::Unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl CaloriePredictor for RemoteModel {
    async fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let response = self
            .client
            .post(&self.predict_url)
            .json(&PredictRequest {
                instances: [features],
            })
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Rejected(format!("{}: {}", status, body)));
        }
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::SERVICE_UNAVAILABLE => {
                    InferenceError::Unavailable(format!("{}: {}", status, body))
                }
                _ => InferenceError::Runtime(format!("{}: {}", status, body)),
            });
        }

        let body: PredictResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                InferenceError::Timeout(self.timeout.as_millis() as u64)
            } else {
                InferenceError::InvalidOutput(e.to_string())
            }
        })?;

        debug!(count = body.predictions.len(), "Model server responded");

        body.predictions
            .first()
            .copied()
            .ok_or_else(|| InferenceError::InvalidOutput("empty predictions".to_string()))
    }

    async fn health_check(&self) -> Result<(), InferenceError> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(InferenceError::Unavailable(format!(
                "health check returned {}",
                response.status()
            )))
        }
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            name: self.predict_url.clone(),
            version: "remote".to_string(),
            backend: ModelBackend::Remote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calorie_predictor_shared::{to_feature_vector, validate, WorkoutInput};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn features() -> FeatureVector {
        let input: WorkoutInput = serde_json::from_value(json!({
            "Age": 30, "Weight": 70.0, "Height": 1.75,
            "Max_BPM": 180, "Avg_BPM": 140, "Resting_BPM": 60,
            "Session_Duration": 1.0, "Workout_Type": 1,
            "Fat_Percentage": 20.0, "Water_Intake": 2.5, "Workout_Frequency": 4,
            "BMI": 22.9, "Intensity": 0.8, "BMI_Workout": 18.3,
            "Calories_per_hour": 450.0
        }))
        .unwrap();
        to_feature_vector(&validate(&input).unwrap())
    }

    fn model_for(server: &MockServer, timeout_ms: u64) -> RemoteModel {
        RemoteModel::new(
            &format!("{}/predict", server.uri()),
            &format!("{}/health", server.uri()),
            Duration::from_millis(timeout_ms),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_predict_sends_renamed_features() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_partial_json(json!({
                "instances": [{ "Weight (kg)": 70.0, "Workout_Frequency (days/week)": 4.0 }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "predictions": [512.345] })))
            .expect(1)
            .mount(&server)
            .await;

        let model = model_for(&server, 1000);
        let prediction = model.predict(&features()).await.unwrap();
        assert_eq!(prediction, 512.345);
    }

    #[tokio::test]
    async fn test_client_error_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad columns"))
            .mount(&server)
            .await;

        let err = model_for(&server, 1000).predict(&features()).await.unwrap_err();
        assert!(matches!(err, InferenceError::Rejected(msg) if msg.contains("bad columns")));
    }

    #[tokio::test]
    async fn test_server_error_is_runtime_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = model_for(&server, 1000).predict(&features()).await.unwrap_err();
        assert!(matches!(err, InferenceError::Runtime(_)));
    }

    #[tokio::test]
    async fn test_service_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = model_for(&server, 1000).predict(&features()).await.unwrap_err();
        assert!(matches!(err, InferenceError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_empty_predictions_are_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "predictions": [] })))
            .mount(&server)
            .await;

        let err = model_for(&server, 1000).predict(&features()).await.unwrap_err();
        assert!(matches!(err, InferenceError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn test_garbage_body_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = model_for(&server, 1000).predict(&features()).await.unwrap_err();
        assert!(matches!(err, InferenceError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "predictions": [1.0] }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let err = model_for(&server, 50).predict(&features()).await.unwrap_err();
        assert_eq!(err, InferenceError::Timeout(50));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        // Nothing listens on port 9 (discard) in the test environment
        let model = RemoteModel::new(
            "http://127.0.0.1:9/predict",
            "http://127.0.0.1:9/health",
            Duration::from_millis(500),
        )
        .unwrap();

        let err = model.predict(&features()).await.unwrap_err();
        assert!(matches!(err, InferenceError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        assert!(model_for(&server, 1000).health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = model_for(&server, 1000).health_check().await.unwrap_err();
        assert!(matches!(err, InferenceError::Unavailable(_)));
    }
}
