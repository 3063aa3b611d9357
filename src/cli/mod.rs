//! CLI module for Regression Reactor
//!
//! Provides command-line interface for:
//! - formula: Print the model formula
//! - predict: One-shot prediction
//! - explain: One-shot explanation fetch
//! - shell: Interactive session over stdin

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, formula, predict, run, run_command, shell};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_intent, render_session, render_validation_error, Intent};
