//! Coordinator Outcomes
//!
//! What each entry point reports back to the caller, in addition to the
//! session change subscribers see.

use crate::model::PredictionResult;

/// Result of a validated submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PredictionOutcome {
    /// Result is now the session's prediction.
    Published(PredictionResult),

    /// A newer submission started while this one was predicting; its result
    /// was discarded.
    Superseded,
}

impl PredictionOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published(_))
    }

    /// Published result, if any.
    pub fn result(&self) -> Option<PredictionResult> {
        match self {
            Self::Published(result) => Some(*result),
            Self::Superseded => None,
        }
    }
}

/// Result of an expand or retry intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplanationOutcome {
    /// This call fetched the explanation.
    Loaded(String),

    /// This call fetched and the gateway failed. Carries the user-facing notice.
    Failed(String),

    /// No gateway call was made; the session was already past NotRequested
    /// (or retry is disabled).
    Suppressed { state: &'static str },
}

impl ExplanationOutcome {
    /// Whether this call issued a gateway request.
    pub fn fetched(&self) -> bool {
        !matches!(self, Self::Suppressed { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Loaded(text) => Some(text),
            _ => None,
        }
    }
}
