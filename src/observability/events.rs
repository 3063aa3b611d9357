//! Observable session events
//!
//! Events are explicit and typed. Each maps to one stable log name.

use std::fmt;

use super::logger::Severity;

/// Observable events in a prediction session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// A new session was created
    SessionStart,

    // Prediction flow
    /// Validated submission entered the predicting state
    PredictionBegin,
    /// Submission rejected by input validation
    PredictionRejected,
    /// Prediction result published to the session
    PredictionPublished,
    /// Submission finished after a newer one and was discarded
    PredictionSuperseded,

    // Explanation flow
    /// Explanation fetch started
    ExplanationRequested,
    /// Explanation intent swallowed by the single-flight guard
    ExplanationSuppressed,
    /// Explanation text received
    ExplanationLoaded,
    /// Gateway call failed
    ExplanationFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SessionStart => "SESSION_START",

            Event::PredictionBegin => "PREDICTION_BEGIN",
            Event::PredictionRejected => "PREDICTION_REJECTED",
            Event::PredictionPublished => "PREDICTION_PUBLISHED",
            Event::PredictionSuperseded => "PREDICTION_SUPERSEDED",

            Event::ExplanationRequested => "EXPLANATION_REQUESTED",
            Event::ExplanationSuppressed => "EXPLANATION_SUPPRESSED",
            Event::ExplanationLoaded => "EXPLANATION_LOADED",
            Event::ExplanationFailed => "EXPLANATION_FAILED",
        }
    }

    /// Severity this event is logged at.
    ///
    /// Validation rejections are user errors, not faults.
    pub fn severity(&self) -> Severity {
        match self {
            Event::ExplanationFailed => Severity::Error,
            Event::ExplanationSuppressed | Event::PredictionSuperseded => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_unique() {
        let events = [
            Event::ConfigLoaded,
            Event::SessionStart,
            Event::PredictionBegin,
            Event::PredictionRejected,
            Event::PredictionPublished,
            Event::PredictionSuperseded,
            Event::ExplanationRequested,
            Event::ExplanationSuppressed,
            Event::ExplanationLoaded,
            Event::ExplanationFailed,
        ];

        let mut names: Vec<_> = events.iter().map(|e| e.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), events.len());
    }

    #[test]
    fn test_rejection_is_not_a_fault() {
        assert_eq!(Event::PredictionRejected.severity(), Severity::Info);
        assert_eq!(Event::ExplanationFailed.severity(), Severity::Error);
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(Event::SessionStart.to_string(), "SESSION_START");
    }
}
