//! Worker pool consumer implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::admission::AdmissionGate;
use crate::codec;
use crate::metrics;
use crate::payment::{PaymentError, PaymentProcessor};
use crate::source::{MessageSource, ReceivedMessage};

use super::config::ConsumerConfig;
use super::types::{ConsumerCounters, ConsumerError, ConsumerStatus, MessageOutcome};

/// Drains a message source through a fixed-size pool of worker tasks.
pub struct WorkerPoolConsumer {
    config: ConsumerConfig,
    source: Arc<dyn MessageSource>,
    processor: Arc<dyn PaymentProcessor>,
    gate: AdmissionGate,
    tasks: TaskTracker,
    counters: Arc<ConsumerCounters>,
    running: AtomicBool,
    draining: AtomicBool,
}

impl WorkerPoolConsumer {
    /// Create a new consumer. Nothing is received until [`run`](Self::run).
    pub fn new(
        config: ConsumerConfig,
        source: Arc<dyn MessageSource>,
        processor: Arc<dyn PaymentProcessor>,
    ) -> Self {
        let gate = AdmissionGate::new("consumer", config.concurrency);
        Self {
            config,
            source,
            processor,
            gate,
            tasks: TaskTracker::new(),
            counters: Arc::new(ConsumerCounters::default()),
            running: AtomicBool::new(false),
            draining: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// Get current consumer status.
    pub fn status(&self) -> ConsumerStatus {
        ConsumerStatus {
            source: self.source.name().to_string(),
            running: self.running.load(Ordering::Relaxed),
            draining: self.draining.load(Ordering::Relaxed),
            in_flight: self.tasks.len(),
            gate: self.gate.status(),
            stats: self.counters.snapshot(),
        }
    }

    /// Runs the poll loop until `shutdown` is cancelled, then drains.
    ///
    /// Returns only after every admitted task has finished.
    ///
    /// # Errors
    ///
    /// Returns [`ConsumerError::AlreadyRunning`] if another `run` is active.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), ConsumerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Consumer already running");
            return Err(ConsumerError::AlreadyRunning);
        }
        self.tasks.reopen();

        info!(
            source = self.source.name(),
            concurrency = self.gate.capacity(),
            batch_size = self.config.batch_size,
            wait_time_secs = self.config.wait_time_secs,
            visibility_timeout_secs = self.config.visibility_timeout_secs,
            "Consumer started"
        );

        self.poll_loop(&shutdown).await;

        self.draining.store(true, Ordering::SeqCst);
        info!(
            in_flight = self.tasks.len(),
            "Shutdown requested, waiting for in-flight messages"
        );
        self.tasks.close();
        self.tasks.wait().await;

        self.draining.store(false, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
        info!("Consumer shutdown complete");
        Ok(())
    }

    async fn poll_loop(&self, shutdown: &CancellationToken) {
        let request = self.config.receive_request();
        let backoff = self.config.receive_backoff();

        loop {
            if shutdown.is_cancelled() {
                return;
            }

            let received = tokio::select! {
                biased;
                _ = shutdown.cancelled() => return,
                result = self.source.receive(&request) => result,
            };

            let messages = match received {
                Ok(messages) => messages,
                Err(e) => {
                    warn!(error = %e, backoff_ms = backoff.as_millis() as u64, "Receive failed, backing off");
                    self.counters.add_receive_error();
                    metrics::RECEIVE_ERRORS.inc();
                    tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => return,
                        _ = tokio::time::sleep(backoff) => continue,
                    }
                }
            };

            if messages.is_empty() {
                // Long polling bounds the wait; yield so a zero-wait source cannot hog the thread.
                tokio::task::yield_now().await;
                continue;
            }

            debug!(count = messages.len(), "Received message batch");
            self.counters.add_received(messages.len());
            metrics::MESSAGES_RECEIVED.inc_by(messages.len() as u64);

            if !self.admit_batch(messages, shutdown).await {
                return;
            }
        }
    }

    /// Admits each message into the pool, blocking while it is full.
    ///
    /// Returns `false` when shutdown interrupted admission. Messages left
    /// unadmitted are not deleted and come back after their visibility timeout.
    async fn admit_batch(&self, messages: Vec<ReceivedMessage>, shutdown: &CancellationToken) -> bool {
        let total = messages.len();

        for (admitted, message) in messages.into_iter().enumerate() {
            let permit = tokio::select! {
                biased;
                _ = shutdown.cancelled() => None,
                permit = self.gate.acquire() => permit.ok(),
            };

            let Some(permit) = permit else {
                info!(
                    left_for_redelivery = total - admitted,
                    "Stopped admitting messages"
                );
                return false;
            };

            let source = Arc::clone(&self.source);
            let processor = Arc::clone(&self.processor);
            let counters = Arc::clone(&self.counters);
            let timeout = self.config.processing_timeout();

            self.tasks.spawn(async move {
                let _permit = permit;
                let outcome =
                    process_message(source.as_ref(), processor.as_ref(), &message, timeout).await;
                counters.record(outcome);
                metrics::MESSAGE_OUTCOMES
                    .with_label_values(&[outcome.as_str()])
                    .inc();
            });
        }

        true
    }
}

/// Processes one delivered message: decode, pay, delete.
///
/// Never panics and never returns an error; every failure is logged and
/// reported through the returned [`MessageOutcome`].
pub async fn process_message(
    source: &dyn MessageSource,
    processor: &dyn PaymentProcessor,
    message: &ReceivedMessage,
    timeout: Option<Duration>,
) -> MessageOutcome {
    let mut order = match codec::decode(&message.body) {
        Ok(order) => order,
        Err(e) => {
            // No dead-letter queue: the payload is only kept in this log line.
            error!(
                message_id = %message.message_id,
                kind = e.kind(),
                error = %e,
                body = %message.body_lossy(),
                "Deleting undecodable message"
            );
            metrics::POISON_MESSAGES.with_label_values(&[e.kind()]).inc();
            if let Err(de) = source.delete(&message.handle).await {
                error!(message_id = %message.message_id, error = %de, "Failed to delete malformed message");
                metrics::DELETE_FAILURES.inc();
            }
            return MessageOutcome::Poisoned { kind: e.kind() };
        }
    };

    // A replayed order may already be ahead; its status stays put and it is paid anyway.
    if let Err(e) = order.start_processing() {
        debug!(order_id = %order.order_id, error = %e, "Order status already ahead");
    }

    info!(
        order_id = %order.order_id,
        customer_id = order.customer_id,
        receive_count = message.receive_count,
        "Processing order"
    );

    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, processor.process(&order))
            .await
            .unwrap_or(Err(PaymentError::TimedOut(limit))),
        None => processor.process(&order).await,
    };

    if let Err(e) = result {
        warn!(
            order_id = %order.order_id,
            error = %e,
            "Payment failed, leaving message for redelivery"
        );
        return MessageOutcome::ProcessorFailed;
    }

    if let Err(e) = order.complete() {
        warn!(order_id = %order.order_id, error = %e, "Unexpected status transition");
    }
    info!(order_id = %order.order_id, "Completed order");

    match source.delete(&message.handle).await {
        Ok(()) => MessageOutcome::Acknowledged,
        Err(e) => {
            error!(order_id = %order.order_id, error = %e, "Failed to delete message");
            metrics::DELETE_FAILURES.inc();
            MessageOutcome::AckFailed
        }
    }
}
