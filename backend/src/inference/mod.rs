//! Calorie model backends
//!
//! The regression model is an external collaborator. Handlers only see the
//! [`CaloriePredictor`] trait: hand it a [`FeatureVector`], get back one
//! number. Two implementations exist, a tree ensemble loaded from disk and an
//! HTTP client for a model server. Which one runs is decided once at startup
//! by [`load_predictor`].

use crate::config::{ModelBackend, ModelConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use calorie_predictor_shared::FeatureVector;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub mod forest;
pub mod remote;

pub use forest::ForestModel;
pub use remote::RemoteModel;

/// Model call failures
///
/// The messages here are for logs only; clients get a generic message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("model unavailable: {0}")]
    Unavailable(String),

    #[error("feature vector rejected by model: {0}")]
    Rejected(String),

    #[error("model runtime failure: {0}")]
    Runtime(String),

    #[error("model returned an invalid prediction: {0}")]
    InvalidOutput(String),

    #[error("model call timed out after {0} ms")]
    Timeout(u64),
}

/// Descriptive metadata about the loaded model
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub backend: ModelBackend,
}

/// A loaded regression model
///
/// Implementations are shared read-only across all requests and must be
/// safe to call concurrently.
#[async_trait]
pub trait CaloriePredictor: Send + Sync {
    /// Predict calories burned for one feature record
    async fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError>;

    /// Check the model can currently serve predictions
    async fn health_check(&self) -> Result<(), InferenceError> {
        Ok(())
    }

    fn info(&self) -> ModelInfo;
}

/// Build the configured model backend and confirm it can serve
///
/// Called once during startup. Any error here is fatal: the service must not
/// accept traffic without a model, so a remote server that does not answer
/// its health endpoint fails the load.
pub async fn load_predictor(config: &ModelConfig) -> Result<Arc<dyn CaloriePredictor>> {
    let predictor: Arc<dyn CaloriePredictor> = match config.backend {
        ModelBackend::File => {
            let model = ForestModel::load(&config.path)
                .with_context(|| format!("failed to load model from {}", config.path))?;
            info!(
                path = %config.path,
                trees = model.tree_count(),
                name = %model.info().name,
                "Loaded tree ensemble model"
            );
            Arc::new(model)
        }
        ModelBackend::Remote => {
            let model = RemoteModel::new(&config.url, &config.health_url, config.timeout())
                .context("failed to create remote model client")?;
            info!(url = %config.url, "Using remote model server");
            Arc::new(model)
        }
    };

    predictor
        .health_check()
        .await
        .with_context(|| format!("model backend {:?} is not ready", config.backend))?;

    Ok(predictor)
}
