//! Request Coordinator Subsystem
//!
//! Drives the two user intents of a session:
//! - submit: validate → predicting → evaluate → publish
//! - expand: NotRequested → Loading → Loaded | Failed, at most once
//!
//! The two flows share only the session container. Each owns its own slice,
//! so a failed explanation never blocks predictions and vice versa.

mod controller;
mod outcome;
mod session;

pub use controller::{CoordinatorConfig, RequestCoordinator, GATEWAY_FAILURE_NOTICE};
pub use outcome::{ExplanationOutcome, PredictionOutcome};
pub use session::{PredictionState, Session};
