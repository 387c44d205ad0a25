//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! request handlers and the calorie model.

pub mod prediction;

pub use prediction::PredictionService;
