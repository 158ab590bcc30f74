//! HTTP API integration tests.
//!
//! These tests exercise the receiver routes in-process with mock
//! collaborators: synchronous and asynchronous order submission, the
//! notification batch endpoint, and the status/metrics surface.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::{fixtures, TestConfig, TestFixture};
use orderflow_core::{OrderStatus, PaymentError, PublishError};

fn order_json(order_id: &str) -> serde_json::Value {
    json!({
        "order_id": order_id,
        "customer_id": 42,
        "items": [
            { "product_id": "prod-1", "quantity": 2, "price": 5.0 }
        ]
    })
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_returns_ok() {
    let fixture = TestFixture::new();
    let response = fixture.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "OK");
}

// ============================================================================
// Synchronous orders
// ============================================================================

#[tokio::test]
async fn test_sync_order_completes() {
    let fixture = TestFixture::new();

    let response = fixture.post("/orders/sync", order_json("ord-123")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["order_id"], "ord-123");
    assert_eq!(response.body["customer_id"], 42);
    assert_eq!(response.body["status"], "completed");
    assert!(response.body["created_at"].is_string());
    assert_eq!(response.body["items"][0]["price"], 5.0);

    let processed = fixture.processor.processed_orders().await;
    assert_eq!(processed.len(), 1);
    assert_eq!(processed[0].status, OrderStatus::Processing);
}

#[tokio::test]
async fn test_sync_order_waits_for_payment() {
    let fixture = TestFixture::with_config(TestConfig {
        payment_duration: Duration::from_millis(200),
        ..TestConfig::default()
    });

    let start = std::time::Instant::now();
    let response = fixture.post("/orders/sync", order_json("ord-slow")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(start.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_sync_order_invalid_body() {
    let fixture = TestFixture::new();

    let response = fixture.post_raw("/orders/sync", "{ not json").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Invalid request");
    assert_eq!(fixture.processor.invocation_count(), 0);
}

#[tokio::test]
async fn test_sync_order_payment_failure() {
    let fixture = TestFixture::new();
    fixture
        .processor
        .set_next_error(PaymentError::Declined {
            order_id: "ord-1".to_string(),
            reason: "insufficient funds".to_string(),
        })
        .await;

    let response = fixture.post("/orders/sync", order_json("ord-1")).await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("insufficient funds"));
}

#[tokio::test]
async fn test_sync_order_rejects_get() {
    let fixture = TestFixture::new();
    let response = fixture.get("/orders/sync").await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_sync_orders_respect_payment_concurrency() {
    let fixture = TestFixture::with_config(TestConfig {
        payment_concurrency: 2,
        payment_duration: Duration::from_millis(100),
        ..TestConfig::default()
    });

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let router = fixture.router.clone();
            let body = serde_json::to_vec(&order_json(&format!("ord-{}", i))).unwrap();
            tokio::spawn(async move {
                let request = Request::builder()
                    .method("POST")
                    .uri("/orders/sync")
                    .body(Body::from(body))
                    .unwrap();
                router.oneshot(request).await.unwrap().status()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    assert_eq!(fixture.processor.completed_count(), 5);
    assert!(fixture.processor.max_concurrency() <= 2);
    assert_eq!(fixture.state.payment_gate().status().active, 0);
}

// ============================================================================
// Asynchronous orders
// ============================================================================

#[tokio::test]
async fn test_async_order_is_published() {
    let fixture = TestFixture::new();

    let response = fixture.post("/orders/async", order_json("ord-async-1")).await;

    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body["order_id"], "ord-async-1");
    assert_eq!(response.body["status"], "pending");
    assert_eq!(response.body["message_id"], "mock-msg-1");

    let publisher = fixture.publisher.as_ref().unwrap();
    let published = publisher.published_orders().await;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].status, OrderStatus::Pending);
    assert_eq!(fixture.processor.invocation_count(), 0);
}

#[tokio::test]
async fn test_async_order_keeps_created_at_and_resets_status() {
    let fixture = TestFixture::new();
    let mut body = order_json("ord-async-2");
    body["created_at"] = json!("2024-03-01T12:00:00Z");
    body["status"] = json!("completed");

    let response = fixture.post("/orders/async", body).await;

    assert_eq!(response.status, StatusCode::ACCEPTED);
    let published = fixture.publisher.as_ref().unwrap().published_orders().await;
    assert_eq!(published[0].status, OrderStatus::Pending);
    assert_eq!(published[0].created_at.to_rfc3339(), "2024-03-01T12:00:00+00:00");
}

#[tokio::test]
async fn test_async_order_without_publisher() {
    let fixture = TestFixture::with_config(TestConfig::without_publisher());

    let response = fixture.post("/orders/async", order_json("ord-1")).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["error"], "async endpoint not configured");
}

#[tokio::test]
async fn test_async_order_publish_failure() {
    let fixture = TestFixture::new();
    fixture
        .publisher
        .as_ref()
        .unwrap()
        .set_next_error(PublishError::Transport("connection refused".to_string()))
        .await;

    let response = fixture.post("/orders/async", order_json("ord-1")).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["error"], "Failed to accept order");
}

#[tokio::test]
async fn test_async_order_publish_timeout() {
    let fixture = TestFixture::new();
    let publisher = fixture.publisher.as_ref().unwrap();
    publisher.set_delay(Duration::from_secs(3)).await;

    let start = std::time::Instant::now();
    let response = fixture.post("/orders/async", order_json("ord-1")).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(start.elapsed() < Duration::from_secs(3));
    assert_eq!(publisher.publish_count().await, 0);
}

#[tokio::test]
async fn test_async_order_invalid_body() {
    let fixture = TestFixture::new();

    let response = fixture.post_raw("/orders/async", "[1, 2").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(fixture.publisher.as_ref().unwrap().publish_count().await, 0);
}

#[tokio::test]
async fn test_async_test_mode_skips_publishing() {
    let fixture = TestFixture::with_config(TestConfig {
        async_test_mode: true,
        ..TestConfig::without_publisher()
    });

    let response = fixture.post("/orders/async", order_json("ord-test")).await;

    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body["order_id"], "ord-test");
    assert!(response.body.get("message_id").is_none());
}

// ============================================================================
// Notification batches
// ============================================================================

#[tokio::test]
async fn test_notification_batch_processed() {
    let fixture = TestFixture::new();
    let event = fixtures::notification_event(&fixtures::orders(2));

    let response = fixture
        .post("/events/notifications", serde_json::to_value(&event).unwrap())
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["processed"], 2);
    assert_eq!(fixture.processor.completed_count(), 2);
}

#[tokio::test]
async fn test_notification_batch_with_malformed_record() {
    let fixture = TestFixture::new();
    let mut event = serde_json::to_value(fixtures::notification_event(&fixtures::orders(1))).unwrap();
    event["Records"][0]["Sns"]["Message"] = json!("not an order");

    let response = fixture.post("/events/notifications", event).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(fixture.processor.invocation_count(), 0);
}

#[tokio::test]
async fn test_notification_batch_invalid_body() {
    let fixture = TestFixture::new();
    let response = fixture.post_raw("/events/notifications", "nope").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Status, config and metrics
// ============================================================================

#[tokio::test]
async fn test_consumer_status_unavailable() {
    let fixture = TestFixture::new();

    let response = fixture.get("/consumer/status").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["available"], false);
    assert!(response.body.get("running").is_none());
}

#[tokio::test]
async fn test_consumer_status_available() {
    let fixture = TestFixture::with_config(TestConfig::with_consumer());

    let response = fixture.get("/consumer/status").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["available"], true);
    assert_eq!(response.body["source"], "mock");
    assert_eq!(response.body["running"], false);
    assert_eq!(response.body["in_flight"], 0);
    assert_eq!(response.body["gate"]["capacity"], 4);
    assert_eq!(response.body["stats"]["received"], 0);
}

#[tokio::test]
async fn test_config_endpoint() {
    let fixture = TestFixture::new();

    let response = fixture.get("/config").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["server"]["port"], 8080);
    assert_eq!(response.body["receiver"]["payment_concurrency"], 20);
    assert_eq!(response.body["queue"]["configured"], true);
    assert_eq!(response.body["topic"]["configured"], false);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::with_config(TestConfig::with_consumer());
    fixture.post("/orders/sync", order_json("ord-metrics")).await;

    let response = fixture.get("/metrics").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text.contains("orderflow_payment_gate_capacity"));
    assert!(response.text.contains("orderflow_consumer_pool_capacity"));
    assert!(response.text.contains("orderflow_sync_orders_total"));
    assert!(response.text.contains("orderflow_http_requests_total"));
}
