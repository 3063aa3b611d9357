//! Explanation Subsystem
//!
//! - The explanation state machine (`ExplanationState`)
//! - The gateway seam to the text-generation backend
//!
//! States are explicit and enumerable. Whether a transition is taken is
//! decided by the coordinator; this module only says which ones exist.

mod errors;
mod gateway;
mod state;

pub use errors::{GatewayError, GatewayResult, TransitionError, TransitionResult};
pub use gateway::{ExplanationGateway, StaticGateway, UnavailableGateway, DEFAULT_EXPLANATION};
pub use state::ExplanationState;
