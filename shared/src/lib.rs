//! Calorie Predictor Shared Library
//!
//! Pure domain logic shared by the backend and the WASM module: the workout
//! record, its validation rules, the mapping to model features, and the API
//! payload types. Nothing in this crate performs I/O.

pub mod features;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use features::{to_feature_vector, FeatureVector, FEATURE_NAMES};
pub use models::{WorkoutField, WorkoutInput, WorkoutSession, WorkoutType};
pub use types::*;
pub use validation::{validate, validate_all, ValidationError, ValidationErrorKind};
