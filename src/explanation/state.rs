//! Explanation State Machine
//!
//! ```text
//! NotRequested --begin_fetch--> Loading --complete--> Loaded
//!                                   |
//!                                   +------fail-----> Failed --begin_retry--> Loading
//! ```
//!
//! - Transitions consume the current state and return the next one
//! - Nothing ever leads back to NotRequested
//! - Loaded is terminal; Failed is terminal unless the caller opts into retry

use serde::Serialize;

use super::errors::{TransitionError, TransitionResult};

/// Where the session's explanation fetch stands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum ExplanationState {
    /// Panel never expanded.
    #[default]
    NotRequested,

    /// One gateway call in flight.
    Loading,

    /// Gateway returned text.
    Loaded(String),

    /// Gateway failed. Holds the user-facing notice, never the cause.
    Failed(String),
}

impl ExplanationState {
    /// Create a new state machine in NotRequested.
    pub fn new() -> Self {
        Self::NotRequested
    }

    /// State name for observability.
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::NotRequested => "NotRequested",
            Self::Loading => "Loading",
            Self::Loaded(_) => "Loaded",
            Self::Failed(_) => "Failed",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether a fetch has resolved, one way or the other.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Failed(_))
    }

    /// Loaded text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Loaded(text) => Some(text),
            _ => None,
        }
    }

    /// Failure notice, if any.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    // =========================================================================
    // ALLOWED TRANSITIONS
    // =========================================================================

    /// NotRequested → Loading
    ///
    /// First expansion of the explanation panel.
    pub fn begin_fetch(self) -> TransitionResult<Self> {
        match self {
            Self::NotRequested => Ok(Self::Loading),
            _ => Err(TransitionError::forbidden(self.state_name(), "Loading")),
        }
    }

    /// Failed → Loading
    ///
    /// Explicit retry after a failed fetch.
    pub fn begin_retry(self) -> TransitionResult<Self> {
        match self {
            Self::Failed(_) => Ok(Self::Loading),
            _ => Err(TransitionError::forbidden(self.state_name(), "Loading")),
        }
    }

    /// Loading → Loaded
    pub fn complete(self, text: String) -> TransitionResult<Self> {
        match self {
            Self::Loading => Ok(Self::Loaded(text)),
            _ => Err(TransitionError::forbidden(self.state_name(), "Loaded")),
        }
    }

    /// Loading → Failed
    pub fn fail(self, message: String) -> TransitionResult<Self> {
        match self {
            Self::Loading => Ok(Self::Failed(message)),
            _ => Err(TransitionError::forbidden(self.state_name(), "Failed")),
        }
    }
}
