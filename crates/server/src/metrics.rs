//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the orderflow server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Queue consumer and worker pool status (collected dynamically)
//! - Synchronous payment gate status (collected dynamically)
//! - In-process queue depth (collected dynamically)
//!
//! Counters owned by the core crate (message outcomes, payments, publishes)
//! are registered here as well.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};

use crate::state::AppState;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "orderflow_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("orderflow_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "orderflow_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Consumer Metrics (collected dynamically)
// =============================================================================

/// Consumer running state (1 = running, 0 = stopped).
pub static CONSUMER_RUNNING: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "orderflow_consumer_running",
        "Whether the queue consumer is running (1) or stopped (0)",
    )
    .unwrap()
});

/// Messages admitted to the worker pool and not yet finished.
pub static CONSUMER_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "orderflow_consumer_in_flight",
        "Number of messages currently being processed by the consumer",
    )
    .unwrap()
});

/// Worker pool size.
pub static CONSUMER_POOL_CAPACITY: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "orderflow_consumer_pool_capacity",
        "Maximum concurrent messages in the consumer worker pool",
    )
    .unwrap()
});

// =============================================================================
// Payment Gate Metrics (collected dynamically)
// =============================================================================

/// Synchronous payments in progress.
pub static PAYMENT_GATE_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "orderflow_payment_gate_active",
        "Number of synchronous payments in progress",
    )
    .unwrap()
});

/// Synchronous requests waiting for a payment slot.
pub static PAYMENT_GATE_WAITING: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "orderflow_payment_gate_waiting",
        "Number of synchronous requests waiting for a payment slot",
    )
    .unwrap()
});

/// Synchronous payment gate capacity.
pub static PAYMENT_GATE_CAPACITY: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "orderflow_payment_gate_capacity",
        "Maximum concurrent synchronous payments",
    )
    .unwrap()
});

// =============================================================================
// Queue Metrics (collected dynamically)
// =============================================================================

/// Messages in the in-process queue by state.
pub static QUEUE_MESSAGES: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("orderflow_queue_messages", "Messages in the queue by state"),
        &["state"], // "visible", "in_flight"
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Consumer
    registry
        .register(Box::new(CONSUMER_RUNNING.clone()))
        .unwrap();
    registry
        .register(Box::new(CONSUMER_IN_FLIGHT.clone()))
        .unwrap();
    registry
        .register(Box::new(CONSUMER_POOL_CAPACITY.clone()))
        .unwrap();

    // Payment gate
    registry
        .register(Box::new(PAYMENT_GATE_ACTIVE.clone()))
        .unwrap();
    registry
        .register(Box::new(PAYMENT_GATE_WAITING.clone()))
        .unwrap();
    registry
        .register(Box::new(PAYMENT_GATE_CAPACITY.clone()))
        .unwrap();

    // Queue
    registry.register(Box::new(QUEUE_MESSAGES.clone())).unwrap();

    // Core metrics (consumer outcomes, payments, publishing)
    for metric in orderflow_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// This is called before encoding metrics to update gauges with current values
/// from the consumer, the payment gate and the queue.
pub fn collect_dynamic_metrics(state: &AppState) {
    if let Some(consumer) = state.consumer() {
        let status = consumer.status();
        CONSUMER_RUNNING.set(if status.running { 1 } else { 0 });
        CONSUMER_IN_FLIGHT.set(status.in_flight as i64);
        CONSUMER_POOL_CAPACITY.set(status.gate.capacity as i64);
    }

    let gate = state.payment_gate().status();
    PAYMENT_GATE_ACTIVE.set(gate.active as i64);
    PAYMENT_GATE_WAITING.set(gate.waiting as i64);
    PAYMENT_GATE_CAPACITY.set(gate.capacity as i64);

    if let Some(queue) = state.queue() {
        let depth = queue.depth();
        QUEUE_MESSAGES
            .with_label_values(&["visible"])
            .set(depth.visible as i64);
        QUEUE_MESSAGES
            .with_label_values(&["in_flight"])
            .set(depth.in_flight as i64);
    }
}
