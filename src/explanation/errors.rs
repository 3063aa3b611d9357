//! # Explanation Errors

use thiserror::Error;

/// Result type for gateway calls
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Result type for explanation state transitions
pub type TransitionResult<T> = Result<T, TransitionError>;

/// Gateway failures
///
/// The coordinator collapses all of these into one user-facing notice; the
/// detail is only ever logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Gateway returned an empty explanation")]
    EmptyExplanation,
}

impl GatewayError {
    /// Short machine-readable cause for logs
    pub fn cause_code(&self) -> &'static str {
        match self {
            GatewayError::Unavailable(_) => "unavailable",
            GatewayError::Backend(_) => "backend",
            GatewayError::MalformedResponse(_) => "malformed_response",
            GatewayError::EmptyExplanation => "empty_explanation",
        }
    }
}

/// A transition the explanation state machine does not allow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("forbidden transition: {from} → {to}")]
pub struct TransitionError {
    pub from: &'static str,
    pub to: &'static str,
}

impl TransitionError {
    pub fn forbidden(from: &'static str, to: &'static str) -> Self {
        Self { from, to }
    }
}
