//! Feature mapping
//!
//! Turns a validated [`WorkoutSession`] into the named feature record the
//! calorie model was trained on. Five fields are relabelled with their unit,
//! the rest keep their public names; values are never converted.

use crate::models::{WorkoutField, WorkoutSession};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Feature names expected by the model, in declaration order
pub const FEATURE_NAMES: [&str; 15] = [
    "Age",
    "Weight (kg)",
    "Height (m)",
    "Max_BPM",
    "Avg_BPM",
    "Resting_BPM",
    "Session_Duration (hours)",
    "Workout_Type",
    "Fat_Percentage",
    "Water_Intake (liters)",
    "Workout_Frequency (days/week)",
    "BMI",
    "Intensity",
    "BMI_Workout",
    "Calories_per_hour",
];

/// Ordered, name-keyed numeric features for one prediction
///
/// Serializes as a JSON object whose keys keep declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(&'static str, f64)>,
}

impl FeatureVector {
    /// Value of a feature by its model-facing name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    /// Feature names in order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    /// Feature values in order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    /// `(name, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Build the model input for a validated session
pub fn to_feature_vector(session: &WorkoutSession) -> FeatureVector {
    let entries = WorkoutField::ALL
        .into_iter()
        .map(|field| (field.feature_name(), session.value(field)))
        .collect();
    FeatureVector { entries }
}
