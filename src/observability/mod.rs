//! Observability for prediction sessions
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Counter metrics
//!
//! Observability is read-only: it describes what the coordinator did and
//! never feeds back into a decision.
//!
//! ```ignore
//! use regression_reactor::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::PredictionPublished, &[("value", "18.00")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ConfigLoaded, &[("path", "/tmp/reactor.json")]);
    }
}
