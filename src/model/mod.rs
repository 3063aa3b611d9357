//! # Linear Model
//!
//! Input validation and the evaluator for the fixed two-parameter model.

mod errors;
mod evaluator;
mod input;

pub use errors::{Field, FieldError, FieldErrorKind, ValidationError, ValidationResult};
pub use evaluator::{evaluate, Coefficients, PredictionResult, COEFFICIENTS};
pub use input::{PredictionInput, RawPredictionInput, MAX_INPUT};
