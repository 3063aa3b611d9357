//! regression-reactor - a linear-regression prediction session with an
//! on-demand explanation of the model
//!
//! Subsystems:
//! - `model`: input validation and the fixed linear evaluator
//! - `explanation`: explanation state machine and the gateway seam
//! - `coordinator`: per-session request coordination
//! - `config`, `observability`, `cli`: the process around them

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod explanation;
pub mod model;
pub mod observability;
