//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock collaborators injected, so the HTTP surface can be tested
//! without a real topic, queue or payment provider.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use orderflow_core::{
    testing::{MockMessageSource, MockPaymentProcessor, MockPublisher},
    Config, ConsumerConfig, MessageSource, OrderPublisher, PaymentProcessor, WorkerPoolConsumer,
};
use orderflow_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use orderflow_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// Provides an in-process router with fully controllable mocks for:
/// - Payment processing (MockPaymentProcessor)
/// - Order publishing (MockPublisher)
/// - The queue consumer's source (MockMessageSource)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_sync_order() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/orders/sync", json!({
///         "order_id": "ord-1",
///         "customer_id": 1,
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Shared state behind the router
    pub state: Arc<AppState>,
    /// Mock payment processor - control duration and failures
    pub processor: Arc<MockPaymentProcessor>,
    /// Mock publisher - inspect published orders (if enabled)
    pub publisher: Option<Arc<MockPublisher>>,
    /// Mock consumer source (if a consumer is attached)
    pub source: Option<Arc<MockMessageSource>>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// Body parsed as JSON, or `Null` if it is not JSON.
    pub body: Value,
    /// Raw body text.
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    /// Create a test fixture with custom configuration.
    pub fn with_config(test_config: TestConfig) -> Self {
        let mut config = Config::default();
        config.receiver.payment_concurrency = test_config.payment_concurrency;
        config.receiver.async_test_mode = test_config.async_test_mode;
        config.receiver.publish_timeout_secs = 1;
        config.queue.url = Some("memory://orders".to_string());

        let processor = Arc::new(MockPaymentProcessor::with_duration(
            test_config.payment_duration,
        ));

        let mut state = AppState::new(
            config.clone(),
            Arc::clone(&processor) as Arc<dyn PaymentProcessor>,
        );

        let publisher = test_config.enable_publisher.then(|| Arc::new(MockPublisher::new()));
        if let Some(publisher) = &publisher {
            state = state.with_publisher(Arc::clone(publisher) as Arc<dyn OrderPublisher>);
        }

        let source = test_config
            .enable_consumer
            .then(|| Arc::new(MockMessageSource::new()));
        if let Some(source) = &source {
            let consumer = WorkerPoolConsumer::new(
                ConsumerConfig::default().with_concurrency(4),
                Arc::clone(source) as Arc<dyn MessageSource>,
                Arc::clone(&processor) as Arc<dyn PaymentProcessor>,
            );
            state = state.with_consumer(Arc::new(consumer));
        }

        let state = Arc::new(state);
        let router = create_router(Arc::clone(&state));

        Self {
            router,
            state,
            processor,
            publisher,
            source,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, Body::empty()).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Body::from(serde_json::to_vec(&body).unwrap()))
            .await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request("POST", path, Body::from(body.to_string())).await
    }

    /// Send a request to the test server.
    pub async fn request(&self, method: &str, path: &str, body: Body) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(body)
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Attach a MockPublisher for asynchronous submission
    pub enable_publisher: bool,
    /// Attach a (not running) consumer over a MockMessageSource
    pub enable_consumer: bool,
    /// Accept asynchronous orders without publishing
    pub async_test_mode: bool,
    /// Synchronous payment gate capacity
    pub payment_concurrency: usize,
    /// Mock payment duration
    pub payment_duration: Duration,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            enable_publisher: true,
            enable_consumer: false,
            async_test_mode: false,
            payment_concurrency: 20,
            payment_duration: Duration::from_millis(10),
        }
    }
}

impl TestConfig {
    /// Fixture without a publisher (asynchronous submission unconfigured).
    pub fn without_publisher() -> Self {
        Self {
            enable_publisher: false,
            ..Self::default()
        }
    }

    /// Fixture with a consumer attached.
    pub fn with_consumer() -> Self {
        Self {
            enable_consumer: true,
            ..Self::default()
        }
    }
}
