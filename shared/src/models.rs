//! Data models for workout sessions
//!
//! `WorkoutInput` is the raw record as it arrives on the wire.
//! `WorkoutSession` is the same record after validation and can only be
//! obtained through [`crate::validation::validate`].

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Workout Type
// ============================================================================

/// Kind of training performed during the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutType {
    Cardio,
    Strength,
}

impl WorkoutType {
    /// Numeric code used by the public API and the model
    pub fn code(&self) -> i64 {
        match self {
            WorkoutType::Cardio => 0,
            WorkoutType::Strength => 1,
        }
    }

    /// Map a numeric code back to a workout type
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(WorkoutType::Cardio),
            1 => Some(WorkoutType::Strength),
            _ => None,
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkoutType::Cardio => write!(f, "Cardio"),
            WorkoutType::Strength => write!(f, "Strength"),
        }
    }
}

// ============================================================================
// Raw Input
// ============================================================================

/// Workout measurements as submitted by a client
///
/// Field names on the wire follow the public API (`Age`, `Weight`, ...).
/// Nothing here is range-checked yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutInput {
    #[serde(rename = "Age", deserialize_with = "whole_number::deserialize")]
    pub age: i64,
    #[serde(rename = "Weight")]
    pub weight_kg: f64,
    #[serde(rename = "Height")]
    pub height_m: f64,
    #[serde(rename = "Max_BPM", deserialize_with = "whole_number::deserialize")]
    pub max_bpm: i64,
    #[serde(rename = "Avg_BPM", deserialize_with = "whole_number::deserialize")]
    pub avg_bpm: i64,
    #[serde(rename = "Resting_BPM", deserialize_with = "whole_number::deserialize")]
    pub resting_bpm: i64,
    #[serde(rename = "Session_Duration")]
    pub session_duration_hours: f64,
    #[serde(rename = "Workout_Type", deserialize_with = "whole_number::deserialize")]
    pub workout_type: i64,
    #[serde(rename = "Fat_Percentage")]
    pub fat_percentage: f64,
    #[serde(rename = "Water_Intake")]
    pub water_intake_liters: f64,
    #[serde(rename = "Workout_Frequency", deserialize_with = "whole_number::deserialize")]
    pub workout_frequency_days: i64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "Intensity")]
    pub intensity: f64,
    #[serde(rename = "BMI_Workout")]
    pub bmi_workout: f64,
    #[serde(rename = "Calories_per_hour")]
    pub calories_per_hour: f64,
}

impl WorkoutInput {
    /// Numeric value of a field, integers widened to f64
    pub fn value(&self, field: WorkoutField) -> f64 {
        match field {
            WorkoutField::Age => self.age as f64,
            WorkoutField::Weight => self.weight_kg,
            WorkoutField::Height => self.height_m,
            WorkoutField::MaxBpm => self.max_bpm as f64,
            WorkoutField::AvgBpm => self.avg_bpm as f64,
            WorkoutField::RestingBpm => self.resting_bpm as f64,
            WorkoutField::SessionDuration => self.session_duration_hours,
            WorkoutField::WorkoutType => self.workout_type as f64,
            WorkoutField::FatPercentage => self.fat_percentage,
            WorkoutField::WaterIntake => self.water_intake_liters,
            WorkoutField::WorkoutFrequency => self.workout_frequency_days as f64,
            WorkoutField::Bmi => self.bmi,
            WorkoutField::Intensity => self.intensity,
            WorkoutField::BmiWorkout => self.bmi_workout,
            WorkoutField::CaloriesPerHour => self.calories_per_hour,
        }
    }
}

/// Integer fields accept whole-number floats such as `30.0`
mod whole_number {
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    struct WholeNumber;

    impl<'de> Visitor<'de> for WholeNumber {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            // i64::MAX as f64 is 2^63, one past the largest i64
            if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        deserializer.deserialize_i64(WholeNumber)
    }
}

// ============================================================================
// Validated Session
// ============================================================================

/// A workout session whose fields all passed validation
///
/// Fields are private; the only constructor lives in the validation module,
/// so holding a `WorkoutSession` proves the ranges and the heart-rate
/// relationship hold.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    pub(crate) age: i64,
    pub(crate) weight_kg: f64,
    pub(crate) height_m: f64,
    pub(crate) max_bpm: i64,
    pub(crate) avg_bpm: i64,
    pub(crate) resting_bpm: i64,
    pub(crate) session_duration_hours: f64,
    pub(crate) workout_type: WorkoutType,
    pub(crate) fat_percentage: f64,
    pub(crate) water_intake_liters: f64,
    pub(crate) workout_frequency_days: i64,
    pub(crate) bmi: f64,
    pub(crate) intensity: f64,
    pub(crate) bmi_workout: f64,
    pub(crate) calories_per_hour: f64,
}

impl WorkoutSession {
    pub fn age(&self) -> i64 {
        self.age
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn height_m(&self) -> f64 {
        self.height_m
    }

    pub fn max_bpm(&self) -> i64 {
        self.max_bpm
    }

    pub fn avg_bpm(&self) -> i64 {
        self.avg_bpm
    }

    pub fn resting_bpm(&self) -> i64 {
        self.resting_bpm
    }

    pub fn session_duration_hours(&self) -> f64 {
        self.session_duration_hours
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.workout_type
    }

    pub fn fat_percentage(&self) -> f64 {
        self.fat_percentage
    }

    pub fn water_intake_liters(&self) -> f64 {
        self.water_intake_liters
    }

    pub fn workout_frequency_days(&self) -> i64 {
        self.workout_frequency_days
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn bmi_workout(&self) -> f64 {
        self.bmi_workout
    }

    pub fn calories_per_hour(&self) -> f64 {
        self.calories_per_hour
    }

    /// Numeric value of a field, integers widened to f64
    pub fn value(&self, field: WorkoutField) -> f64 {
        match field {
            WorkoutField::Age => self.age as f64,
            WorkoutField::Weight => self.weight_kg,
            WorkoutField::Height => self.height_m,
            WorkoutField::MaxBpm => self.max_bpm as f64,
            WorkoutField::AvgBpm => self.avg_bpm as f64,
            WorkoutField::RestingBpm => self.resting_bpm as f64,
            WorkoutField::SessionDuration => self.session_duration_hours,
            WorkoutField::WorkoutType => self.workout_type.code() as f64,
            WorkoutField::FatPercentage => self.fat_percentage,
            WorkoutField::WaterIntake => self.water_intake_liters,
            WorkoutField::WorkoutFrequency => self.workout_frequency_days as f64,
            WorkoutField::Bmi => self.bmi,
            WorkoutField::Intensity => self.intensity,
            WorkoutField::BmiWorkout => self.bmi_workout,
            WorkoutField::CaloriesPerHour => self.calories_per_hour,
        }
    }
}

// ============================================================================
// Field Catalogue
// ============================================================================

/// The fifteen workout fields, in request declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkoutField {
    Age,
    Weight,
    Height,
    MaxBpm,
    AvgBpm,
    RestingBpm,
    SessionDuration,
    WorkoutType,
    FatPercentage,
    WaterIntake,
    WorkoutFrequency,
    Bmi,
    Intensity,
    BmiWorkout,
    CaloriesPerHour,
}

impl WorkoutField {
    /// Every field in declaration order
    pub const ALL: [WorkoutField; 15] = [
        WorkoutField::Age,
        WorkoutField::Weight,
        WorkoutField::Height,
        WorkoutField::MaxBpm,
        WorkoutField::AvgBpm,
        WorkoutField::RestingBpm,
        WorkoutField::SessionDuration,
        WorkoutField::WorkoutType,
        WorkoutField::FatPercentage,
        WorkoutField::WaterIntake,
        WorkoutField::WorkoutFrequency,
        WorkoutField::Bmi,
        WorkoutField::Intensity,
        WorkoutField::BmiWorkout,
        WorkoutField::CaloriesPerHour,
    ];

    /// Name used in request bodies and error responses
    pub fn public_name(&self) -> &'static str {
        match self {
            WorkoutField::Age => "Age",
            WorkoutField::Weight => "Weight",
            WorkoutField::Height => "Height",
            WorkoutField::MaxBpm => "Max_BPM",
            WorkoutField::AvgBpm => "Avg_BPM",
            WorkoutField::RestingBpm => "Resting_BPM",
            WorkoutField::SessionDuration => "Session_Duration",
            WorkoutField::WorkoutType => "Workout_Type",
            WorkoutField::FatPercentage => "Fat_Percentage",
            WorkoutField::WaterIntake => "Water_Intake",
            WorkoutField::WorkoutFrequency => "Workout_Frequency",
            WorkoutField::Bmi => "BMI",
            WorkoutField::Intensity => "Intensity",
            WorkoutField::BmiWorkout => "BMI_Workout",
            WorkoutField::CaloriesPerHour => "Calories_per_hour",
        }
    }

    /// Name the regression model was trained with
    ///
    /// Five fields carry their unit in the model's column name; the rest keep
    /// their public name.
    pub fn feature_name(&self) -> &'static str {
        match self {
            WorkoutField::Weight => "Weight (kg)",
            WorkoutField::Height => "Height (m)",
            WorkoutField::SessionDuration => "Session_Duration (hours)",
            WorkoutField::WaterIntake => "Water_Intake (liters)",
            WorkoutField::WorkoutFrequency => "Workout_Frequency (days/week)",
            other => other.public_name(),
        }
    }

}

impl fmt::Display for WorkoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.public_name())
    }
}

// Serialized by public name so error payloads match request keys
impl Serialize for WorkoutField {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.public_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "Age": 30, "Weight": 70.0, "Height": 1.75,
            "Max_BPM": 180, "Avg_BPM": 140, "Resting_BPM": 60,
            "Session_Duration": 1.0, "Workout_Type": 1,
            "Fat_Percentage": 20.0, "Water_Intake": 2.5, "Workout_Frequency": 4,
            "BMI": 22.9, "Intensity": 0.8, "BMI_Workout": 18.3,
            "Calories_per_hour": 450.0
        }"#
    }

    #[test]
    fn test_input_uses_public_field_names() {
        let input: WorkoutInput = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(input.age, 30);
        assert_eq!(input.weight_kg, 70.0);
        assert_eq!(input.workout_frequency_days, 4);
        assert_eq!(input.calories_per_hour, 450.0);
    }

    #[test]
    fn test_input_rejects_missing_field() {
        let json = r#"{"Age": 30, "Weight": 70.0}"#;
        assert!(serde_json::from_str::<WorkoutInput>(json).is_err());
    }

    #[test]
    fn test_input_rejects_fractional_integer() {
        let json = sample_json().replace("\"Age\": 30", "\"Age\": 30.5");
        assert!(serde_json::from_str::<WorkoutInput>(&json).is_err());
    }

    #[test]
    fn test_workout_type_codes() {
        assert_eq!(WorkoutType::from_code(0), Some(WorkoutType::Cardio));
        assert_eq!(WorkoutType::from_code(1), Some(WorkoutType::Strength));
        assert_eq!(WorkoutType::from_code(2), None);
        assert_eq!(WorkoutType::Strength.code(), 1);
        assert_eq!(WorkoutType::Cardio.to_string(), "Cardio");
    }

    #[test]
    fn test_feature_names_rename_exactly_five_fields() {
        let renamed: Vec<_> = WorkoutField::ALL
            .iter()
            .filter(|f| f.feature_name() != f.public_name())
            .collect();
        assert_eq!(renamed.len(), 5);
        assert_eq!(WorkoutField::Weight.feature_name(), "Weight (kg)");
        assert_eq!(WorkoutField::Age.feature_name(), "Age");
    }

    #[test]
    fn test_input_accepts_whole_number_floats() {
        let json = sample_json()
            .replace("\"Age\": 30", "\"Age\": 30.0")
            .replace("\"Max_BPM\": 180", "\"Max_BPM\": 180.0")
            .replace("\"Workout_Type\": 1", "\"Workout_Type\": 1.0");
        let input: WorkoutInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input.age, 30);
        assert_eq!(input.max_bpm, 180);
        assert_eq!(input.workout_type, 1);
    }

    #[test]
    fn test_input_rejects_out_of_range_float_for_integer() {
        let json = sample_json().replace("\"Age\": 30", "\"Age\": 1e300");
        assert!(serde_json::from_str::<WorkoutInput>(&json).is_err());
    }

    #[test]
    fn test_input_rejects_string_for_integer() {
        let json = sample_json().replace("\"Age\": 30", "\"Age\": \"30\"");
        assert!(serde_json::from_str::<WorkoutInput>(&json).is_err());
    }

    #[test]
    fn test_integer_fields_serialize_as_integers() {
        let input: WorkoutInput = serde_json::from_str(sample_json()).unwrap();
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["Age"], serde_json::json!(30));
    }
}
