//! Request Coordinator
//!
//! Responsibilities:
//! - Validate submissions before anything else sees them
//! - Run the evaluator and publish the latest result
//! - Issue at most one gateway call per session for the explanation
//! - Turn gateway failures into a generic notice; log the cause
//!
//! Non-Responsibilities:
//! - Does not retry automatically
//! - Does not time out or cancel gateway calls
//! - Does not render anything
//!
//! The session lives inside a `watch` channel. Every check-and-set happens in
//! the sender's modify closure, which holds the channel lock, so the Loading
//! guard is atomic with respect to every other intent.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use uuid::Uuid;

use super::outcome::{ExplanationOutcome, PredictionOutcome};
use super::session::Session;
use crate::explanation::{
    ExplanationGateway, ExplanationState, GatewayError, GatewayResult, TransitionResult,
};
use crate::model::{evaluate, PredictionResult, RawPredictionInput, ValidationResult, COEFFICIENTS};
use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};

/// Notice shown when the explanation could not be fetched.
pub const GATEWAY_FAILURE_NOTICE: &str =
    "Failed to get explanation from AI. Please try again later.";

/// Coordinator settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Minimum time spent in Predicting before a result is published
    pub prediction_delay: Duration,

    /// Treat blank gateway text as a failure
    pub require_non_empty_explanation: bool,

    /// Allow `retry_explanation` out of Failed
    pub allow_explanation_retry: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            prediction_delay: Duration::from_millis(750),
            require_non_empty_explanation: true,
            allow_explanation_retry: false,
        }
    }
}

impl CoordinatorConfig {
    /// No artificial latency. Handy for tests and batch use.
    pub fn immediate() -> Self {
        Self {
            prediction_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

type BeginTransition = fn(ExplanationState) -> TransitionResult<ExplanationState>;

struct Inner {
    session: watch::Sender<Session>,
    session_id: String,
    gateway: Arc<dyn ExplanationGateway>,
    config: CoordinatorConfig,
    metrics: MetricsRegistry,
}

/// Coordinates the prediction and explanation flows of one session.
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct RequestCoordinator {
    inner: Arc<Inner>,
}

impl RequestCoordinator {
    /// Start a fresh session backed by `gateway`.
    pub fn new(gateway: Arc<dyn ExplanationGateway>, config: CoordinatorConfig) -> Self {
        let session = Session::new();
        let session_id = session.id().to_string();
        let (sender, _) = watch::channel(session);

        log_event_with_fields(Event::SessionStart, &[("session", session_id.as_str())]);

        Self {
            inner: Arc::new(Inner {
                session: sender,
                session_id,
                gateway,
                config,
                metrics: MetricsRegistry::new(),
            }),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.inner.session.borrow().id()
    }

    /// Current session state.
    pub fn snapshot(&self) -> Session {
        self.inner.session.borrow().clone()
    }

    /// Receive every subsequent session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.session.subscribe()
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.inner.metrics
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    // =========================================================================
    // PREDICTION
    // =========================================================================

    /// Validate, evaluate, wait out the minimum latency, publish.
    ///
    /// A validation failure leaves the session untouched. When a newer
    /// submission starts before this one publishes, this one is discarded.
    pub async fn submit_prediction(
        &self,
        raw: &RawPredictionInput,
    ) -> ValidationResult<PredictionOutcome> {
        let inner = &self.inner;

        let input = match raw.validate() {
            Ok(input) => input,
            Err(err) => {
                inner.metrics.increment_predictions_rejected();
                let fields = err
                    .fields()
                    .iter()
                    .map(|e| e.field.name())
                    .collect::<Vec<_>>()
                    .join(",");
                log_event_with_fields(
                    Event::PredictionRejected,
                    &[("session", inner.session_id.as_str()), ("fields", fields.as_str())],
                );
                return Err(err);
            }
        };

        let mut ticket = 0;
        inner.session.send_modify(|session| {
            ticket = session.begin_prediction();
        });
        log_event_with_fields(
            Event::PredictionBegin,
            &[("session", inner.session_id.as_str()), ("ticket", ticket.to_string().as_str())],
        );

        let result = evaluate(input);

        // The wait and publish run to completion even if this future is dropped
        let task = Arc::clone(inner);
        match tokio::spawn(async move { task.finish_prediction(ticket, result).await }).await {
            Ok(outcome) => Ok(outcome),
            Err(_) => Ok(inner.publish_prediction(ticket, result)),
        }
    }

    // =========================================================================
    // EXPLANATION
    // =========================================================================

    /// Expand intent: fetch the explanation if it was never requested.
    ///
    /// While Loading, or once Loaded/Failed, this is a no-op.
    pub async fn request_explanation(&self) -> ExplanationOutcome {
        self.inner.metrics.increment_explanation_intents();
        self.fetch(ExplanationState::begin_fetch).await
    }

    /// Retry intent: Failed → Loading, only when enabled.
    pub async fn retry_explanation(&self) -> ExplanationOutcome {
        self.inner.metrics.increment_explanation_intents();

        if !self.inner.config.allow_explanation_retry {
            let state = self.inner.session.borrow().explanation().state_name();
            return self.inner.suppressed(state);
        }

        self.fetch(ExplanationState::begin_retry).await
    }

    async fn fetch(&self, begin: BeginTransition) -> ExplanationOutcome {
        let inner = &self.inner;

        // Check-and-set under the channel lock
        let mut refused_from = None;
        let started = inner.session.send_if_modified(|session| {
            let current = session.explanation_mut();
            match begin(current.clone()) {
                Ok(next) => {
                    *current = next;
                    true
                }
                Err(err) => {
                    refused_from = Some(err.from);
                    false
                }
            }
        });

        if !started {
            return inner.suppressed(refused_from.unwrap_or("Unknown"));
        }

        inner.metrics.increment_gateway_calls();
        log_event_with_fields(Event::ExplanationRequested, &[("session", inner.session_id.as_str())]);

        // The call runs to completion even if this future is dropped
        let task = Arc::clone(inner);
        match tokio::spawn(async move { task.call_gateway().await }).await {
            Ok(outcome) => outcome,
            Err(join_error) => inner.resolve_failure(&GatewayError::Backend(format!(
                "gateway task aborted: {}",
                join_error
            ))),
        }
    }
}

impl Inner {
    async fn finish_prediction(&self, ticket: u64, result: PredictionResult) -> PredictionOutcome {
        if !self.config.prediction_delay.is_zero() {
            tokio::time::sleep(self.config.prediction_delay).await;
        }
        self.publish_prediction(ticket, result)
    }

    fn publish_prediction(&self, ticket: u64, result: PredictionResult) -> PredictionOutcome {
        let published = self
            .session
            .send_if_modified(|session| session.publish_prediction(ticket, result));

        if published {
            self.metrics.increment_predictions_published();
            log_event_with_fields(
                Event::PredictionPublished,
                &[
                    ("session", self.session_id.as_str()),
                    ("ticket", ticket.to_string().as_str()),
                    ("value", result.to_string().as_str()),
                ],
            );
            PredictionOutcome::Published(result)
        } else {
            self.metrics.increment_predictions_superseded();
            log_event_with_fields(
                Event::PredictionSuperseded,
                &[("session", self.session_id.as_str()), ("ticket", ticket.to_string().as_str())],
            );
            PredictionOutcome::Superseded
        }
    }

    async fn call_gateway(&self) -> ExplanationOutcome {
        let formula = COEFFICIENTS.formula();
        let result = self
            .gateway
            .explain(&formula)
            .await
            .and_then(|text| self.check_text(text));

        match result {
            Ok(text) => {
                self.resolve(|state| state.complete(text.clone()));
                log_event_with_fields(
                    Event::ExplanationLoaded,
                    &[
                        ("session", self.session_id.as_str()),
                        ("chars", text.chars().count().to_string().as_str()),
                    ],
                );
                ExplanationOutcome::Loaded(text)
            }
            Err(err) => self.resolve_failure(&err),
        }
    }

    fn check_text(&self, text: String) -> GatewayResult<String> {
        if self.config.require_non_empty_explanation && text.trim().is_empty() {
            return Err(GatewayError::EmptyExplanation);
        }
        Ok(text)
    }

    fn resolve_failure(&self, err: &GatewayError) -> ExplanationOutcome {
        self.metrics.increment_gateway_failures();
        log_event_with_fields(
            Event::ExplanationFailed,
            &[
                ("session", self.session_id.as_str()),
                ("cause", err.cause_code()),
                ("detail", err.to_string().as_str()),
            ],
        );
        self.resolve(|state| state.fail(GATEWAY_FAILURE_NOTICE.to_string()));
        ExplanationOutcome::Failed(GATEWAY_FAILURE_NOTICE.to_string())
    }

    /// Apply the Loading → Loaded/Failed transition.
    fn resolve(&self, transition: impl FnOnce(ExplanationState) -> TransitionResult<ExplanationState>) {
        self.session.send_if_modified(|session| {
            let current = session.explanation_mut();
            match transition(current.clone()) {
                Ok(next) => {
                    *current = next;
                    true
                }
                Err(err) => {
                    // Only the holder of the Loading guard resolves
                    Logger::error(
                        "EXPLANATION_TRANSITION_REFUSED",
                        &[("session", self.session_id.as_str()), ("error", err.to_string().as_str())],
                    );
                    false
                }
            }
        });
    }

    fn suppressed(&self, state: &'static str) -> ExplanationOutcome {
        self.metrics.increment_explanation_suppressed();
        log_event_with_fields(
            Event::ExplanationSuppressed,
            &[("session", self.session_id.as_str()), ("state", state)],
        );
        ExplanationOutcome::Suppressed { state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explanation::{StaticGateway, UnavailableGateway};
    use crate::model::Field;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and replays scripted responses in order, then repeats the last.
    struct ScriptedGateway {
        calls: AtomicUsize,
        responses: Vec<GatewayResult<String>>,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<GatewayResult<String>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                responses,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ExplanationGateway for ScriptedGateway {
        async fn explain(&self, formula: &str) -> GatewayResult<String> {
            assert_eq!(formula, "y = 10 + 0.5 * x1 + 1.2 * x2");
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let idx = n.min(self.responses.len() - 1);
            self.responses[idx].clone()
        }
    }

    fn coordinator(gateway: Arc<dyn ExplanationGateway>) -> RequestCoordinator {
        RequestCoordinator::new(gateway, CoordinatorConfig::immediate())
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let c = coordinator(Arc::new(StaticGateway::default()));
        let session = c.snapshot();

        assert_eq!(session.prediction().state_name(), "Idle");
        assert_eq!(session.explanation().state_name(), "NotRequested");
        assert_eq!(c.session_id(), session.id());
    }

    #[tokio::test]
    async fn test_submit_publishes_result() {
        let c = coordinator(Arc::new(StaticGateway::default()));

        let outcome = c
            .submit_prediction(&RawPredictionInput::new("4", "5"))
            .await
            .unwrap();

        let result = outcome.result().unwrap();
        assert!((result.value - 18.0).abs() < 1e-9);
        assert_eq!(c.snapshot().prediction_result(), Some(result));
        assert!(!c.snapshot().is_predicting());
        assert_eq!(c.metrics().snapshot().predictions_published, 1);
    }

    #[tokio::test]
    async fn test_validation_error_leaves_session_untouched() {
        let c = coordinator(Arc::new(StaticGateway::default()));
        c.submit_prediction(&RawPredictionInput::new("0", "0"))
            .await
            .unwrap();

        let err = c
            .submit_prediction(&RawPredictionInput::from_numbers(-1.0, 3.0))
            .await
            .unwrap_err();

        assert!(err.names(Field::Param1));
        assert!(!err.names(Field::Param2));
        assert_eq!(c.snapshot().prediction_result().map(|r| r.value), Some(10.0));
        assert_eq!(c.metrics().snapshot().predictions_rejected, 1);
    }

    #[tokio::test]
    async fn test_explanation_loaded_once() {
        let gateway = ScriptedGateway::new(vec![Ok("first".to_string())]);
        let c = coordinator(gateway.clone());

        assert_eq!(
            c.request_explanation().await,
            ExplanationOutcome::Loaded("first".to_string())
        );
        assert_eq!(
            c.request_explanation().await,
            ExplanationOutcome::Suppressed { state: "Loaded" }
        );

        assert_eq!(gateway.calls(), 1);
        assert_eq!(c.snapshot().explanation().text(), Some("first"));
    }

    #[tokio::test]
    async fn test_gateway_failure_becomes_generic_notice() {
        let c = coordinator(Arc::new(UnavailableGateway::new("connection refused")));

        let outcome = c.request_explanation().await;

        assert_eq!(outcome, ExplanationOutcome::Failed(GATEWAY_FAILURE_NOTICE.to_string()));
        let session = c.snapshot();
        let message = session.explanation().failure_message().unwrap();
        assert!(!message.is_empty());
        assert!(!message.contains("connection refused"));
        assert_eq!(c.metrics().snapshot().gateway_failures, 1);
    }

    #[tokio::test]
    async fn test_blank_text_is_failure() {
        let gateway = ScriptedGateway::new(vec![Ok("   ".to_string())]);
        let c = coordinator(gateway);

        assert!(matches!(
            c.request_explanation().await,
            ExplanationOutcome::Failed(_)
        ));
        assert_eq!(c.snapshot().explanation().state_name(), "Failed");
    }

    #[tokio::test]
    async fn test_blank_text_accepted_when_check_disabled() {
        let gateway = ScriptedGateway::new(vec![Ok(String::new())]);
        let config = CoordinatorConfig {
            require_non_empty_explanation: false,
            ..CoordinatorConfig::immediate()
        };
        let c = RequestCoordinator::new(gateway, config);

        assert_eq!(c.request_explanation().await, ExplanationOutcome::Loaded(String::new()));
    }

    #[tokio::test]
    async fn test_retry_disabled_by_default() {
        let gateway = ScriptedGateway::new(vec![
            Err(GatewayError::Backend("500".to_string())),
            Ok("second".to_string()),
        ]);
        let c = coordinator(gateway.clone());

        c.request_explanation().await;
        let outcome = c.retry_explanation().await;

        assert_eq!(outcome, ExplanationOutcome::Suppressed { state: "Failed" });
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_retry_after_failure_when_enabled() {
        let gateway = ScriptedGateway::new(vec![
            Err(GatewayError::Backend("500".to_string())),
            Ok("second".to_string()),
        ]);
        let config = CoordinatorConfig {
            allow_explanation_retry: true,
            ..CoordinatorConfig::immediate()
        };
        let c = RequestCoordinator::new(gateway.clone(), config);

        c.request_explanation().await;
        assert_eq!(
            c.retry_explanation().await,
            ExplanationOutcome::Loaded("second".to_string())
        );

        // Loaded is terminal for retry too
        assert!(!c.retry_explanation().await.fetched());
        // Expand never re-fetches
        assert!(!c.request_explanation().await.fetched());
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_retry_before_any_request_is_suppressed() {
        let config = CoordinatorConfig {
            allow_explanation_retry: true,
            ..CoordinatorConfig::immediate()
        };
        let gateway = ScriptedGateway::new(vec![Ok("t".to_string())]);
        let c = RequestCoordinator::new(gateway.clone(), config);

        assert_eq!(
            c.retry_explanation().await,
            ExplanationOutcome::Suppressed { state: "NotRequested" }
        );
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_sees_changes() {
        let c = coordinator(Arc::new(StaticGateway::new("text")));
        let mut rx = c.subscribe();

        c.request_explanation().await;

        assert!(rx.has_changed().unwrap());
        let session = rx.borrow_and_update().clone();
        assert_eq!(session.explanation().text(), Some("text"));
    }
}
