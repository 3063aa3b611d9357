//! Session metrics
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only when a new registry is created

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for one coordinator
///
/// Relaxed ordering throughout; counters are observational only.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    predictions_published: AtomicU64,
    predictions_rejected: AtomicU64,
    predictions_superseded: AtomicU64,
    explanation_intents: AtomicU64,
    explanation_suppressed: AtomicU64,
    gateway_calls: AtomicU64,
    gateway_failures: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    // Prediction metrics

    pub fn increment_predictions_published(&self) {
        self.predictions_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_predictions_rejected(&self) {
        self.predictions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_predictions_superseded(&self) {
        self.predictions_superseded.fetch_add(1, Ordering::Relaxed);
    }

    // Explanation metrics

    /// Every expand or retry intent, suppressed or not
    pub fn increment_explanation_intents(&self) {
        self.explanation_intents.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_explanation_suppressed(&self) {
        self.explanation_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_gateway_calls(&self) {
        self.gateway_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_gateway_failures(&self) {
        self.gateway_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of gateway calls issued so far
    pub fn gateway_calls(&self) -> u64 {
        self.gateway_calls.load(Ordering::Relaxed)
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            predictions_published: self.predictions_published.load(Ordering::Relaxed),
            predictions_rejected: self.predictions_rejected.load(Ordering::Relaxed),
            predictions_superseded: self.predictions_superseded.load(Ordering::Relaxed),
            explanation_intents: self.explanation_intents.load(Ordering::Relaxed),
            explanation_suppressed: self.explanation_suppressed.load(Ordering::Relaxed),
            gateway_calls: self.gateway_calls.load(Ordering::Relaxed),
            gateway_failures: self.gateway_failures.load(Ordering::Relaxed),
        }
    }

    /// Current counters as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub predictions_published: u64,
    pub predictions_rejected: u64,
    pub predictions_superseded: u64,
    pub explanation_intents: u64,
    pub explanation_suppressed: u64,
    pub gateway_calls: u64,
    pub gateway_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_zero() {
        let metrics = MetricsRegistry::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_counters_increment() {
        let metrics = MetricsRegistry::new();

        metrics.increment_predictions_published();
        metrics.increment_predictions_published();
        metrics.increment_predictions_rejected();
        metrics.increment_gateway_calls();
        metrics.increment_gateway_failures();
        metrics.increment_explanation_intents();
        metrics.increment_explanation_suppressed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.predictions_published, 2);
        assert_eq!(snapshot.predictions_rejected, 1);
        assert_eq!(snapshot.predictions_superseded, 0);
        assert_eq!(snapshot.gateway_calls, 1);
        assert_eq!(snapshot.gateway_failures, 1);
        assert_eq!(snapshot.explanation_intents, 1);
        assert_eq!(snapshot.explanation_suppressed, 1);
        assert_eq!(metrics.gateway_calls(), 1);
    }

    #[test]
    fn test_to_json() {
        let metrics = MetricsRegistry::new();
        metrics.increment_gateway_calls();

        let parsed: serde_json::Value = serde_json::from_str(&metrics.to_json()).unwrap();
        assert_eq!(parsed["gateway_calls"], 1);
        assert_eq!(parsed["predictions_published"], 0);
    }
}
