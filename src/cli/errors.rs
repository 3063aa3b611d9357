//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero status.

use std::fmt;
use std::io;

use crate::config::ConfigError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Submitted input was rejected
    ValidationFailed,
    /// Explanation could not be fetched
    ExplanationFailed,
    /// A newer submission replaced this one before it published
    PredictionSuperseded,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "REACTOR_CLI_CONFIG_ERROR",
            Self::IoError => "REACTOR_CLI_IO_ERROR",
            Self::ValidationFailed => "REACTOR_CLI_VALIDATION_FAILED",
            Self::ExplanationFailed => "REACTOR_CLI_EXPLANATION_FAILED",
            Self::PredictionSuperseded => "REACTOR_CLI_PREDICTION_SUPERSEDED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn validation_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ValidationFailed, msg)
    }

    pub fn explanation_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ExplanationFailed, msg)
    }

    pub fn prediction_superseded() -> Self {
        Self::new(
            CliErrorCode::PredictionSuperseded,
            "prediction was superseded by a newer submission",
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::validation_failed("param1: Value must be non-negative");
        assert_eq!(
            err.to_string(),
            "REACTOR_CLI_VALIDATION_FAILED: param1: Value must be non-negative"
        );
        assert_eq!(err.code(), &CliErrorCode::ValidationFailed);
    }

    #[test]
    fn test_superseded_has_own_code() {
        let err = CliError::prediction_superseded();
        assert_eq!(err.code(), &CliErrorCode::PredictionSuperseded);
        assert!(err.to_string().starts_with("REACTOR_CLI_PREDICTION_SUPERSEDED"));
    }

    #[test]
    fn test_from_config_error() {
        let config_err = crate::config::Config::from_json("not json").unwrap_err();
        let err: CliError = config_err.into();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
        assert!(err.message().contains("parse"));
    }
}
