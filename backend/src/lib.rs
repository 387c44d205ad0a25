//! Calorie Predictor Backend Library
//!
//! This library exposes the backend modules for use in tests and the binary.

pub mod config;
pub mod error;
pub mod inference;
pub mod routes;
pub mod services;
pub mod state;
