//! Prediction Input
//!
//! The shell hands over numeric-like text. `RawPredictionInput::validate` is the
//! only way to obtain a `PredictionInput`, so the evaluator only ever sees
//! finite non-negative values.

use serde::{Deserialize, Serialize};

use super::errors::{Field, FieldError, FieldErrorKind, ValidationError, ValidationResult};

/// Largest accepted parameter value. Keeps the evaluated output finite.
pub const MAX_INPUT: f64 = 1e300;

/// Unvalidated form values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPredictionInput {
    pub param1: String,
    pub param2: String,
}

impl RawPredictionInput {
    /// Create from the two form values.
    pub fn new(param1: impl Into<String>, param2: impl Into<String>) -> Self {
        Self {
            param1: param1.into(),
            param2: param2.into(),
        }
    }

    /// Create from already-numeric values. They still go through validation.
    pub fn from_numbers(param1: f64, param2: f64) -> Self {
        Self::new(param1.to_string(), param2.to_string())
    }

    /// Validate both fields.
    ///
    /// Every offending field is reported, not just the first. An empty or
    /// blank field is "Expected a number"; it is never read as zero.
    pub fn validate(&self) -> ValidationResult<PredictionInput> {
        let param1 = parse_field(Field::Param1, &self.param1);
        let param2 = parse_field(Field::Param2, &self.param2);

        match (param1, param2) {
            (Ok(param1), Ok(param2)) => Ok(PredictionInput { param1, param2 }),
            (param1, param2) => {
                let fields = [param1.err(), param2.err()].into_iter().flatten().collect();
                Err(ValidationError::new(fields))
            }
        }
    }
}

fn parse_field(field: Field, raw: &str) -> Result<f64, FieldError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(FieldError {
            field,
            kind: FieldErrorKind::NotANumber,
        })?;

    if value < 0.0 {
        return Err(FieldError {
            field,
            kind: FieldErrorKind::Negative,
        });
    }

    if value > MAX_INPUT {
        return Err(FieldError {
            field,
            kind: FieldErrorKind::TooLarge,
        });
    }

    // -0.0 passes the check above; normalize it
    Ok(value + 0.0)
}

/// Validated model input: both parameters finite, non-negative and at most
/// `MAX_INPUT`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionInput {
    param1: f64,
    param2: f64,
}

impl PredictionInput {
    /// Validate numeric values directly.
    pub fn new(param1: f64, param2: f64) -> ValidationResult<Self> {
        RawPredictionInput::from_numbers(param1, param2).validate()
    }

    pub fn param1(&self) -> f64 {
        self.param1
    }

    pub fn param2(&self) -> f64 {
        self.param2
    }
}
