//! # Explanation Gateway
//!
//! Turns a formula description into natural-language text. The real
//! text-generation backend lives outside this crate; implementations here are
//! in-process stand-ins.

use std::time::Duration;

use async_trait::async_trait;

use super::errors::{GatewayError, GatewayResult};

/// Async request/response capability: formula in, explanation out.
///
/// Timeouts are the implementation's concern. The coordinator never cancels a
/// call once issued.
#[async_trait]
pub trait ExplanationGateway: Send + Sync {
    async fn explain(&self, formula: &str) -> GatewayResult<String>;
}

/// Text returned by [`StaticGateway::default`].
pub const DEFAULT_EXPLANATION: &str = "This formula predicts an outcome y from two inputs. \
It starts from a baseline of 10, which is the prediction when both inputs are zero. \
Every extra unit of x1 adds 0.5 to the prediction, and every extra unit of x2 adds 1.2, \
so x2 has more than twice the influence of x1.";

/// Returns fixed text after an optional simulated latency.
#[derive(Debug, Clone)]
pub struct StaticGateway {
    text: String,
    latency: Duration,
}

impl Default for StaticGateway {
    fn default() -> Self {
        Self::new(DEFAULT_EXPLANATION)
    }
}

impl StaticGateway {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            latency: Duration::ZERO,
        }
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl ExplanationGateway for StaticGateway {
    async fn explain(&self, _formula: &str) -> GatewayResult<String> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.text.clone())
    }
}

/// Always fails. Stands in for an unreachable backend.
#[derive(Debug, Clone)]
pub struct UnavailableGateway {
    reason: String,
}

impl Default for UnavailableGateway {
    fn default() -> Self {
        Self::new("no text-generation backend configured")
    }
}

impl UnavailableGateway {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ExplanationGateway for UnavailableGateway {
    async fn explain(&self, _formula: &str) -> GatewayResult<String> {
        Err(GatewayError::Unavailable(self.reason.clone()))
    }
}
