//! Session State
//!
//! One value holds everything the shell renders: the prediction slice and the
//! explanation slice. Each slice is a sum type, so "predicting while showing a
//! stale result" or "loading and loaded at once" cannot be represented.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::explanation::ExplanationState;
use crate::model::PredictionResult;

/// Prediction slice of the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "result", rename_all = "snake_case")]
pub enum PredictionState {
    /// Nothing submitted yet.
    #[default]
    Idle,

    /// A validated submission is waiting out the minimum latency.
    Predicting,

    /// Latest published result.
    Ready(PredictionResult),
}

impl PredictionState {
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Predicting => "Predicting",
            Self::Ready(_) => "Ready",
        }
    }

    pub fn is_predicting(&self) -> bool {
        matches!(self, Self::Predicting)
    }

    pub fn result(&self) -> Option<PredictionResult> {
        match self {
            Self::Ready(result) => Some(*result),
            _ => None,
        }
    }
}

/// Per-interaction container. Subscribers receive clones of it.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    prediction: PredictionState,
    explanation: ExplanationState,

    /// Ticket of the most recent validated submission
    #[serde(skip)]
    latest_ticket: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Fresh session: Idle prediction, NotRequested explanation.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            prediction: PredictionState::Idle,
            explanation: ExplanationState::NotRequested,
            latest_ticket: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn prediction(&self) -> &PredictionState {
        &self.prediction
    }

    pub fn explanation(&self) -> &ExplanationState {
        &self.explanation
    }

    pub fn is_predicting(&self) -> bool {
        self.prediction.is_predicting()
    }

    pub fn prediction_result(&self) -> Option<PredictionResult> {
        self.prediction.result()
    }

    /// Enter Predicting and hand out the next ticket.
    ///
    /// Any previous result is cleared.
    pub(crate) fn begin_prediction(&mut self) -> u64 {
        self.latest_ticket += 1;
        self.prediction = PredictionState::Predicting;
        self.latest_ticket
    }

    /// Publish `result` if `ticket` is still the latest. Returns whether it was.
    pub(crate) fn publish_prediction(&mut self, ticket: u64, result: PredictionResult) -> bool {
        if ticket != self.latest_ticket {
            return false;
        }
        self.prediction = PredictionState::Ready(result);
        true
    }

    pub(crate) fn explanation_mut(&mut self) -> &mut ExplanationState {
        &mut self.explanation
    }
}
