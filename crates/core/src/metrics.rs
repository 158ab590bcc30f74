//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Queue consumer (receives, per-message outcomes, poison messages)
//! - Payment processing
//! - Order submission (synchronous and published)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Consumer Metrics
// =============================================================================

/// Messages delivered to the consumer.
pub static MESSAGES_RECEIVED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "orderflow_messages_received_total",
        "Total messages received from the queue",
    )
    .unwrap()
});

/// Per-message outcomes.
pub static MESSAGE_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "orderflow_message_outcomes_total",
            "Outcome of each processed message",
        ),
        &["result"], // "acknowledged", "poisoned", "processor_failed", "ack_failed"
    )
    .unwrap()
});

/// Poison messages deleted without processing, by decode stage.
pub static POISON_MESSAGES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "orderflow_poison_messages_total",
            "Messages deleted because they could not be decoded",
        ),
        &["kind"], // "envelope_malformed", "order_malformed"
    )
    .unwrap()
});

/// Failed receive calls (each followed by a back-off).
pub static RECEIVE_ERRORS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "orderflow_receive_errors_total",
        "Total failed receive calls",
    )
    .unwrap()
});

/// Failed delete calls.
pub static DELETE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "orderflow_delete_failures_total",
        "Total failed message deletions",
    )
    .unwrap()
});

// =============================================================================
// Payment Metrics
// =============================================================================

/// Payment processing duration in seconds.
pub static PAYMENT_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "orderflow_payment_duration_seconds",
            "Duration of payment processing",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["processor"],
    )
    .unwrap()
});

// =============================================================================
// Submission Metrics
// =============================================================================

/// Synchronous orders by result.
pub static SYNC_ORDERS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "orderflow_sync_orders_total",
            "Orders processed through the synchronous endpoint",
        ),
        &["result"], // "completed", "failed"
    )
    .unwrap()
});

/// Orders published to the topic.
pub static ORDERS_PUBLISHED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "orderflow_orders_published_total",
        "Total orders published for asynchronous processing",
    )
    .unwrap()
});

/// Notification records handled by the event handler.
pub static NOTIFICATION_RECORDS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "orderflow_notification_records_total",
            "Notification records handled by the event handler",
        ),
        &["result"], // "processed", "malformed", "failed"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Consumer
        Box::new(MESSAGES_RECEIVED.clone()),
        Box::new(MESSAGE_OUTCOMES.clone()),
        Box::new(POISON_MESSAGES.clone()),
        Box::new(RECEIVE_ERRORS.clone()),
        Box::new(DELETE_FAILURES.clone()),
        // Payment
        Box::new(PAYMENT_DURATION.clone()),
        // Submission
        Box::new(SYNC_ORDERS.clone()),
        Box::new(ORDERS_PUBLISHED.clone()),
        Box::new(NOTIFICATION_RECORDS.clone()),
    ]
}
