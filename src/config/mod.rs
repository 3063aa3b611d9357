//! # Configuration
//!
//! A single JSON file. Every field is optional and falls back to the default
//! below; running without a file is the same as an empty object.
//!
//! ```json
//! {
//!   "prediction_delay_ms": 750,
//!   "log_level": "info",
//!   "require_non_empty_explanation": true,
//!   "allow_explanation_retry": false,
//!   "gateway": { "kind": "static", "latency_ms": 400 }
//! }
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coordinator::CoordinatorConfig;
use crate::explanation::{ExplanationGateway, StaticGateway, UnavailableGateway, DEFAULT_EXPLANATION};
use crate::observability::Severity;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Which in-process gateway the shell wires up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayKind {
    /// Fixed explanation text
    #[default]
    Static,
    /// Every call fails
    Unavailable,
}

/// Gateway section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub kind: GatewayKind,

    /// Text returned by the static gateway
    #[serde(default = "default_gateway_text")]
    pub text: String,

    /// Simulated backend latency
    #[serde(default)]
    pub latency_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            kind: GatewayKind::default(),
            text: default_gateway_text(),
            latency_ms: 0,
        }
    }
}

impl GatewayConfig {
    /// Build the configured gateway.
    pub fn build(&self) -> Arc<dyn ExplanationGateway> {
        match self.kind {
            GatewayKind::Static => Arc::new(
                StaticGateway::new(self.text.clone())
                    .with_latency(Duration::from_millis(self.latency_ms)),
            ),
            GatewayKind::Unavailable => Arc::new(UnavailableGateway::default()),
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum time a prediction stays in the predicting state
    #[serde(default = "default_prediction_delay_ms")]
    pub prediction_delay_ms: u64,

    /// trace | info | warn | error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Treat blank gateway text as a failure
    #[serde(default = "default_true")]
    pub require_non_empty_explanation: bool,

    /// Allow an explicit retry after a failed explanation fetch
    #[serde(default)]
    pub allow_explanation_retry: bool,

    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_prediction_delay_ms() -> u64 {
    750
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_gateway_text() -> String {
    DEFAULT_EXPLANATION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prediction_delay_ms: default_prediction_delay_ms(),
            log_level: default_log_level(),
            require_non_empty_explanation: true,
            allow_explanation_retry: false,
            gateway: GatewayConfig::default(),
        }
    }
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Load from an optional path; `None` yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate JSON text.
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        self.severity()?;
        Ok(())
    }

    /// Parsed log level.
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(|reason| ConfigError::Invalid {
                field: "log_level",
                reason,
            })
    }

    /// Coordinator settings derived from this file.
    pub fn coordinator(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            prediction_delay: Duration::from_millis(self.prediction_delay_ms),
            require_non_empty_explanation: self.require_non_empty_explanation,
            allow_explanation_retry: self.allow_explanation_retry,
        }
    }
}
