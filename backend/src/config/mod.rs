//! Configuration management for the Calorie Predictor backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: CP__)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use validator::Validate;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which model implementation serves predictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// Tree ensemble loaded from a JSON artifact on disk
    File,
    /// External model server reached over HTTP
    Remote,
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ModelConfig {
    pub backend: ModelBackend,
    /// Path of the model artifact (file backend)
    #[validate(length(min = 1))]
    pub path: String,
    /// Prediction endpoint (remote backend)
    #[validate(url)]
    pub url: String,
    /// Health endpoint (remote backend)
    #[validate(url)]
    pub health_url: String,
    /// Upper bound on a single model call
    #[validate(range(min = 1, max = 300000))]
    pub timeout_ms: u64,
}

impl ModelConfig {
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::File,
            path: "models/calories_forest.json".to_string(),
            url: "http://localhost:8501/v1/models/calories:predict".to_string(),
            health_url: "http://localhost:8501/v1/models/calories".to_string(),
            timeout_ms: 2000,
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            model: ModelConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with CP__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (CP__ prefix)
            // e.g., CP__MODEL__TIMEOUT_MS=500 sets model.timeout_ms
            .add_source(config::Environment::with_prefix("CP").separator("__"))
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Reject settings that would leave the service unable to predict
    pub fn check(&self) -> Result<()> {
        self.model
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid model configuration: {}", e))
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
