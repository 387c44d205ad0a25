//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Load expensive resources once**: the model is acquired at startup
//! 2. **Cheap cloning**: All fields are Arc'd or already Clone-cheap
//! 3. **Immutable after creation**: State is read-only during request handling

use crate::config::AppConfig;
use crate::inference::CaloriePredictor;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
///
/// # Performance
///
/// - `config`: Wrapped in Arc, cloning is O(1)
/// - `predictor`: Arc'd trait object, cloning is O(1)
/// - `metrics`: PrometheusHandle is internally Arc'd
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// The loaded calorie model, shared read-only by every request
    pub predictor: Arc<dyn CaloriePredictor>,
    /// Prometheus render handle, present when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: AppConfig, predictor: Arc<dyn CaloriePredictor>) -> Self {
        Self {
            config: Arc::new(config),
            predictor,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the model
    #[inline]
    pub fn predictor(&self) -> &dyn CaloriePredictor {
        self.predictor.as_ref()
    }
}
