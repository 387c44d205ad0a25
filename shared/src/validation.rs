//! Workout input validation
//!
//! Range checks are data, not code: every constrained field has an entry in
//! the constraint table (`WorkoutField::constraint`) and a single routine
//! walks that table in declaration order. The heart-rate consistency rule is
//! evaluated only once every individual field is in range.

use crate::models::{WorkoutField, WorkoutInput, WorkoutSession, WorkoutType};
use serde::Serialize;
use thiserror::Error;

/// Message reported when the heart-rate relationship is violated
pub const HEART_RATE_ORDER_MESSAGE: &str =
    "max heart rate cannot be lower than resting heart rate";

// ============================================================================
// Range Constraints
// ============================================================================

/// One side of a numeric range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Value may equal the limit
    Inclusive(f64),
    /// Value must differ from the limit
    Exclusive(f64),
}

/// Numeric range with independently open or closed ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeConstraint {
    pub min: Bound,
    pub max: Bound,
}

impl RangeConstraint {
    /// `min <= v <= max`
    pub const fn closed(min: f64, max: f64) -> Self {
        Self {
            min: Bound::Inclusive(min),
            max: Bound::Inclusive(max),
        }
    }

    /// `min < v < max`
    pub const fn open(min: f64, max: f64) -> Self {
        Self {
            min: Bound::Exclusive(min),
            max: Bound::Exclusive(max),
        }
    }

    /// `min < v <= max`
    pub const fn open_closed(min: f64, max: f64) -> Self {
        Self {
            min: Bound::Exclusive(min),
            max: Bound::Inclusive(max),
        }
    }

    /// Whether `value` lies inside the range. NaN never does.
    pub fn contains(&self, value: f64) -> bool {
        let above_min = match self.min {
            Bound::Inclusive(min) => value >= min,
            Bound::Exclusive(min) => value > min,
        };
        let below_max = match self.max {
            Bound::Inclusive(max) => value <= max,
            Bound::Exclusive(max) => value < max,
        };
        above_min && below_max
    }
}

impl WorkoutField {
    /// Accepted range for this field, `None` for pass-through fields
    pub fn constraint(&self) -> Option<RangeConstraint> {
        match self {
            WorkoutField::Age => Some(RangeConstraint::closed(1.0, 99.0)),
            WorkoutField::Weight => Some(RangeConstraint::open(30.0, 200.0)),
            WorkoutField::Height => Some(RangeConstraint::open(1.2, 2.5)),
            WorkoutField::MaxBpm => Some(RangeConstraint::open(50.0, 220.0)),
            WorkoutField::AvgBpm => Some(RangeConstraint::open(50.0, 220.0)),
            WorkoutField::RestingBpm => Some(RangeConstraint::open(30.0, 120.0)),
            WorkoutField::SessionDuration => Some(RangeConstraint::open(0.0, 5.0)),
            WorkoutField::WorkoutType => Some(RangeConstraint::closed(0.0, 1.0)),
            WorkoutField::FatPercentage => Some(RangeConstraint::closed(0.0, 50.0)),
            WorkoutField::WaterIntake => Some(RangeConstraint::closed(0.0, 10.0)),
            WorkoutField::WorkoutFrequency => Some(RangeConstraint::closed(1.0, 7.0)),
            WorkoutField::Bmi => Some(RangeConstraint::open(10.0, 50.0)),
            WorkoutField::Intensity => Some(RangeConstraint::open_closed(0.0, 1.0)),
            WorkoutField::BmiWorkout | WorkoutField::CaloriesPerHour => None,
        }
    }

    /// Human readable description of the accepted range
    pub fn violation_message(&self) -> &'static str {
        match self {
            WorkoutField::Age => "Age must be between 1 and 99 years",
            WorkoutField::Weight => "Weight must be greater than 30 kg and less than 200 kg",
            WorkoutField::Height => "Height must be greater than 1.2 m and less than 2.5 m",
            WorkoutField::MaxBpm => "Max heart rate must be greater than 50 and less than 220 BPM",
            WorkoutField::AvgBpm => {
                "Average heart rate must be greater than 50 and less than 220 BPM"
            }
            WorkoutField::RestingBpm => {
                "Resting heart rate must be greater than 30 and less than 120 BPM"
            }
            WorkoutField::SessionDuration => {
                "Session duration must be greater than 0 and less than 5 hours"
            }
            WorkoutField::WorkoutType => "Workout type must be 0 (Cardio) or 1 (Strength)",
            WorkoutField::FatPercentage => "Fat percentage must be between 0 and 50%",
            WorkoutField::WaterIntake => "Water intake must be between 0 and 10 liters",
            WorkoutField::WorkoutFrequency => {
                "Workout frequency must be between 1 and 7 days per week"
            }
            WorkoutField::Bmi => "BMI must be greater than 10 and less than 50",
            WorkoutField::Intensity => "Intensity must be greater than 0 and at most 1",
            WorkoutField::BmiWorkout => "BMI_Workout must be a number",
            WorkoutField::CaloriesPerHour => "Calories_per_hour must be a number",
        }
    }
}

// ============================================================================
// Validation Errors
// ============================================================================

/// Which kind of rule rejected the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// A single field is outside its range
    Field,
    /// A rule spanning several fields failed
    CrossField,
}

/// Validation error with field context
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub fields: Vec<WorkoutField>,
    pub message: String,
}

impl ValidationError {
    /// Error for one field outside its declared range
    pub fn field(field: WorkoutField) -> Self {
        Self {
            kind: ValidationErrorKind::Field,
            fields: vec![field],
            message: field.violation_message().to_string(),
        }
    }

    /// Error for the max/resting heart-rate relationship
    pub fn heart_rate_order() -> Self {
        Self {
            kind: ValidationErrorKind::CrossField,
            fields: vec![WorkoutField::MaxBpm, WorkoutField::RestingBpm],
            message: HEART_RATE_ORDER_MESSAGE.to_string(),
        }
    }

    /// Public names of the offending fields
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.public_name().to_string()).collect()
    }
}

// ============================================================================
// Validator
// ============================================================================

/// Validate a raw workout record, stopping at the first violation
///
/// Per-field ranges are checked in declaration order. The heart-rate rule
/// (`max_bpm >= resting_bpm`) runs only after every field is in range.
pub fn validate(input: &WorkoutInput) -> Result<WorkoutSession, ValidationError> {
    if let Some(field) = out_of_range_fields(input).next() {
        return Err(ValidationError::field(field));
    }
    check_heart_rate_order(input)?;
    Ok(into_session(input))
}

/// Validate a raw workout record, reporting every out-of-range field
///
/// Unlike [`validate`] this does not stop at the first bad field. The
/// heart-rate rule is still only evaluated when every field is in range, so
/// the result holds either per-field errors or the single cross-field error.
pub fn validate_all(input: &WorkoutInput) -> Result<WorkoutSession, Vec<ValidationError>> {
    let errors: Vec<ValidationError> = out_of_range_fields(input)
        .map(ValidationError::field)
        .collect();
    if !errors.is_empty() {
        return Err(errors);
    }
    check_heart_rate_order(input).map_err(|e| vec![e])?;
    Ok(into_session(input))
}

fn out_of_range_fields(input: &WorkoutInput) -> impl Iterator<Item = WorkoutField> + '_ {
    WorkoutField::ALL.into_iter().filter(move |field| match field.constraint() {
        Some(range) => !range.contains(input.value(*field)),
        None => !input.value(*field).is_finite(),
    })
}

fn check_heart_rate_order(input: &WorkoutInput) -> Result<(), ValidationError> {
    if input.max_bpm < input.resting_bpm {
        return Err(ValidationError::heart_rate_order());
    }
    Ok(())
}

/// Copy a fully checked input into a session
fn into_session(input: &WorkoutInput) -> WorkoutSession {
    // Range 0..=1 was checked above
    let workout_type = WorkoutType::from_code(input.workout_type).unwrap_or(WorkoutType::Cardio);

    WorkoutSession {
        age: input.age,
        weight_kg: input.weight_kg,
        height_m: input.height_m,
        max_bpm: input.max_bpm,
        avg_bpm: input.avg_bpm,
        resting_bpm: input.resting_bpm,
        session_duration_hours: input.session_duration_hours,
        workout_type,
        fat_percentage: input.fat_percentage,
        water_intake_liters: input.water_intake_liters,
        workout_frequency_days: input.workout_frequency_days,
        bmi: input.bmi,
        intensity: input.intensity,
        bmi_workout: input.bmi_workout,
        calories_per_hour: input.calories_per_hour,
    }
}
