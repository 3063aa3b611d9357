//! # Input Validation Errors

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type for input validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A form field of the prediction input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Param1,
    Param2,
}

impl Field {
    /// Field name as the shell knows it
    pub fn name(&self) -> &'static str {
        match self {
            Field::Param1 => "param1",
            Field::Param2 => "param2",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a single field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Empty, unparsable or non-finite
    #[error("Expected a number")]
    NotANumber,

    /// Parsed but below zero
    #[error("Value must be non-negative")]
    Negative,

    /// Above `MAX_INPUT`
    #[error("Value is too large")]
    TooLarge,
}

/// One rejected field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// User-facing message shown next to the field
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

/// Input failed validation. Carries every offending field, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid prediction input: {}", summary(.fields))]
pub struct ValidationError {
    fields: Vec<FieldError>,
}

fn summary(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(FieldError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Build from a non-empty list of field errors.
    pub(crate) fn new(fields: Vec<FieldError>) -> Self {
        debug_assert!(!fields.is_empty());
        Self { fields }
    }

    /// All rejected fields
    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    /// Error for a specific field, if it was rejected
    pub fn field(&self, field: Field) -> Option<&FieldError> {
        self.fields.iter().find(|e| e.field == field)
    }

    /// Whether the given field was rejected
    pub fn names(&self, field: Field) -> bool {
        self.field(field).is_some()
    }
}
