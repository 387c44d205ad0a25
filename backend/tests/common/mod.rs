//! Common test utilities for integration tests
//!
//! This module provides a router wired to a scripted model, so the HTTP
//! surface can be exercised without a model artifact or model server.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use calorie_predictor_backend::{
    config::{AppConfig, ModelBackend},
    inference::{CaloriePredictor, InferenceError, ModelInfo},
    routes,
    state::AppState,
};
use calorie_predictor_shared::FeatureVector;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the scripted model does when called
#[derive(Clone)]
pub enum Script {
    Returns(f64),
    Fails(InferenceError),
    Sleeps(Duration),
}

/// Model stand-in that follows a script and records every call
pub struct ScriptedModel {
    script: Script,
    healthy: bool,
    calls: AtomicUsize,
    last_features: Mutex<Option<FeatureVector>>,
}

#[async_trait]
impl CaloriePredictor for ScriptedModel {
    async fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_features.lock().unwrap() = Some(features.clone());

        match &self.script {
            Script::Returns(value) => Ok(*value),
            Script::Fails(err) => Err(err.clone()),
            Script::Sleeps(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(500.0)
            }
        }
    }

    async fn health_check(&self) -> Result<(), InferenceError> {
        if self.healthy {
            Ok(())
        } else {
            Err(InferenceError::Unavailable("model server is down".to_string()))
        }
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            name: "scripted".to_string(),
            version: "test".to_string(),
            backend: ModelBackend::File,
        }
    }
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub model: Arc<ScriptedModel>,
}

impl TestApp {
    /// Create a test application whose model always returns `value`
    pub fn new(value: f64) -> Self {
        Self::with_script(Script::Returns(value))
    }

    pub fn with_script(script: Script) -> Self {
        Self::build(script, true, test_config())
    }

    /// Create a test application whose model reports itself unhealthy
    pub fn unhealthy() -> Self {
        Self::build(Script::Returns(0.0), false, test_config())
    }

    pub fn with_config(script: Script, config: AppConfig) -> Self {
        Self::build(script, true, config)
    }

    fn build(script: Script, healthy: bool, config: AppConfig) -> Self {
        let model = Arc::new(ScriptedModel {
            script,
            healthy,
            calls: AtomicUsize::new(0),
            last_features: Mutex::new(None),
        });
        let state = AppState::new(config, model.clone());
        let app = routes::create_router(state);

        Self { app, model }
    }

    /// Number of times the model was invoked
    pub fn model_calls(&self) -> usize {
        self.model.calls.load(Ordering::SeqCst)
    }

    /// Feature vector from the most recent model call
    pub fn last_features(&self) -> Option<FeatureVector> {
        self.model.last_features.lock().unwrap().clone()
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// POST a workout record to /predict and decode the JSON reply
    pub async fn predict(&self, body: &Value) -> (StatusCode, Value) {
        let (status, text) = self.post("/predict", &body.to_string()).await;
        let json = serde_json::from_str(&text).unwrap_or(Value::Null);
        (status, json)
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        use tower::ServiceExt;

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.metrics.enabled = false;
    config
}

/// A workout record that passes every rule
pub fn example_workout() -> Value {
    json!({
        "Age": 30, "Weight": 70.0, "Height": 1.75,
        "Max_BPM": 180, "Avg_BPM": 140, "Resting_BPM": 60,
        "Session_Duration": 1.0, "Workout_Type": 1,
        "Fat_Percentage": 20.0, "Water_Intake": 2.5, "Workout_Frequency": 4,
        "BMI": 22.9, "Intensity": 0.8, "BMI_Workout": 18.3,
        "Calories_per_hour": 450.0
    })
}
