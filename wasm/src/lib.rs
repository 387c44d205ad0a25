//! Calorie Predictor WASM Module
//!
//! This crate provides WebAssembly bindings so a browser form can check a
//! workout record with the same rules the backend enforces before it is
//! submitted.

use calorie_predictor_shared::{round_prediction, validate_all, WorkoutInput};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// One problem found in a submitted form
#[derive(Serialize)]
struct FieldProblem {
    fields: Vec<String>,
    message: String,
}

/// Check a workout record given as JSON
///
/// Returns a JSON array of problems (every out-of-range field, or the
/// heart-rate rule); an empty array means the record would be accepted.
#[wasm_bindgen]
pub fn check_workout(json: &str) -> String {
    let problems = match serde_json::from_str::<WorkoutInput>(json) {
        Ok(input) => match validate_all(&input) {
            Ok(_) => Vec::new(),
            Err(errors) => errors
                .into_iter()
                .map(|e| FieldProblem {
                    fields: e.field_names(),
                    message: e.message,
                })
                .collect(),
        },
        Err(e) => vec![FieldProblem {
            fields: Vec::new(),
            message: e.to_string(),
        }],
    };

    serde_json::to_string(&problems).unwrap_or_else(|_| "[]".to_string())
}

/// Round a calorie value the way the API does
#[wasm_bindgen]
pub fn round_calories(value: f64) -> f64 {
    round_prediction(value)
}
